// scene.rs — sphere, markers and camera owned by one viewer

use crate::camera::OrbitCamera;
use crate::config::{ViewerConfig, MAX_PANORAMAS};
use crate::marker::{Marker, MarkerId};
use glam::{Vec2, Vec3};
use std::f32::consts::{PI, TAU};
use std::path::PathBuf;

/// Inward-facing panorama sphere with up to two texture slots.
#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    pub radius: f32,
    pub panoramas: Vec<PathBuf>,
    blend: f32,
    current: usize,
}

impl Sphere {
    pub fn new(radius: f32, panoramas: Vec<PathBuf>) -> Self {
        Self {
            radius,
            panoramas,
            blend: 0.0,
            current: 0,
        }
    }

    /// 0 shows texture 0, 1 shows texture 1.
    pub fn blend(&self) -> f32 {
        self.blend
    }

    pub fn set_blend(&mut self, blend: f32) {
        self.blend = blend.clamp(0.0, 1.0);
    }

    pub fn current_texture(&self) -> usize {
        self.current
    }

    /// Settle on `index` after a finished cross-fade.
    pub fn settle_on(&mut self, index: usize) {
        self.current = index.min(MAX_PANORAMAS - 1);
        self.blend = self.current as f32;
    }

    pub fn texture_count(&self) -> usize {
        self.panoramas.len().clamp(1, MAX_PANORAMAS)
    }

    pub fn can_cross_fade(&self) -> bool {
        self.texture_count() == MAX_PANORAMAS
    }

    /// Equirect texture coordinate seen along `dir` from the center.
    /// The fragment shader samples with the same mapping.
    pub fn uv_of(dir: Vec3) -> Vec2 {
        let p = dir.normalize_or(Vec3::NEG_Z);
        let u = (p.x.atan2(-p.z) / TAU + 0.75).rem_euclid(1.0);
        let v = p.y.clamp(-1.0, 1.0).acos() / PI;
        Vec2::new(u, v)
    }
}

#[derive(Debug)]
pub struct Scene {
    pub sphere: Sphere,
    pub markers: Vec<Marker>,
    pub camera: OrbitCamera,
}

impl Scene {
    pub fn new(config: &ViewerConfig) -> Self {
        let mut scene = Self {
            sphere: Sphere::new(config.sphere_radius, config.panoramas.clone()),
            markers: Vec::with_capacity(config.markers.len()),
            camera: OrbitCamera::new(&config.camera),
        };

        for m in &config.markers {
            let mut marker = Marker::new(MarkerId(0), Vec3::from(m.position), m.shape, m.action);
            if let Some(label) = &m.label {
                marker = marker.with_label(label.clone());
            }
            if let Some(icon) = &m.icon {
                marker = marker.with_icon(icon.clone());
            }
            let uv = Sphere::uv_of(marker.position);
            let id = scene.add_marker(marker);
            log::debug!("marker {:?} over texel uv ({:.3}, {:.3})", id, uv.x, uv.y);
        }
        scene
    }

    pub fn marker_mut(&mut self, id: MarkerId) -> Option<&mut Marker> {
        self.markers.iter_mut().find(|m| m.id == id)
    }

    /// Append a marker, returning its id.
    pub fn add_marker(&mut self, mut marker: Marker) -> MarkerId {
        let id = MarkerId(self.markers.iter().map(|m| m.id.0 + 1).max().unwrap_or(0));
        marker.id = id;
        self.markers.push(marker);
        id
    }
}
