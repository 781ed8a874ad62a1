// marker.rs — clickable markers placed inside the panorama sphere

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::camera::{CameraBasis, Ray};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MarkerShape {
    /// Camera-facing billboard, `size` is width/height in world units.
    Sprite { size: [f32; 2] },
    /// Flat arrow lying in the plane tangent to the sphere, approximated by a disc.
    Arrow { radius: f32 },
}

impl Default for MarkerShape {
    fn default() -> Self {
        MarkerShape::Sprite { size: [40.0, 40.0] }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerAction {
    /// Turn the camera to face the marker.
    Recenter,
    /// Cross-fade to the other panorama.
    CrossFade,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(pub usize);

/// Emitted once per qualifying click on a marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerActivated {
    pub id: MarkerId,
    pub position: Vec3,
    pub action: MarkerAction,
}

pub type ActivationCallback = Box<dyn FnMut(&MarkerActivated)>;

pub struct Marker {
    pub id: MarkerId,
    pub position: Vec3,
    pub shape: MarkerShape,
    pub action: MarkerAction,
    pub label: Option<String>,
    pub icon: Option<PathBuf>,
    on_activate: Option<ActivationCallback>,
}

impl fmt::Debug for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Marker")
            .field("id", &self.id)
            .field("position", &self.position)
            .field("shape", &self.shape)
            .field("action", &self.action)
            .field("label", &self.label)
            .field("icon", &self.icon)
            .field("bound", &self.on_activate.is_some())
            .finish()
    }
}

impl Marker {
    pub fn new(id: MarkerId, position: Vec3, shape: MarkerShape, action: MarkerAction) -> Self {
        Self {
            id,
            position,
            shape,
            action,
            label: None,
            icon: None,
            on_activate: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<PathBuf>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn bind(&mut self, callback: impl FnMut(&MarkerActivated) + 'static) {
        self.on_activate = Some(Box::new(callback));
    }

    /// Unit normal of the sphere at the marker, pointing back toward the center.
    pub fn inward_normal(&self) -> Vec3 {
        -self.position.normalize_or(Vec3::NEG_Z)
    }

    /// Fire the bound callback and produce the activation event.
    pub fn activate(&mut self) -> MarkerActivated {
        let event = MarkerActivated {
            id: self.id,
            position: self.position,
            action: self.action,
        };
        if let Some(cb) = self.on_activate.as_mut() {
            cb(&event);
        }
        event
    }

    /// Distance along `ray` to the marker surface, if hit.
    pub fn intersect(&self, ray: &Ray, basis: &CameraBasis) -> Option<f32> {
        match self.shape {
            MarkerShape::Sprite { size } => {
                let t = ray_plane(ray, self.position, -basis.forward)?;
                let local = ray.at(t) - self.position;
                let inside = local.dot(basis.right).abs() <= size[0] * 0.5
                    && local.dot(basis.up).abs() <= size[1] * 0.5;
                inside.then_some(t)
            }
            MarkerShape::Arrow { radius } => {
                let t = ray_plane(ray, self.position, self.inward_normal())?;
                (ray.at(t).distance(self.position) <= radius).then_some(t)
            }
        }
    }
}

/// Two-sided ray/plane intersection; only hits in front of the origin count.
pub fn ray_plane(ray: &Ray, point: Vec3, normal: Vec3) -> Option<f32> {
    let denom = normal.dot(ray.dir);
    if denom.abs() < 1e-6 {
        return None;
    }
    let t = (point - ray.origin).dot(normal) / denom;
    (t > 0.0).then_some(t)
}

/// Index of the nearest marker hit by `ray`.
pub fn pick(markers: &[Marker], ray: &Ray, basis: &CameraBasis) -> Option<usize> {
    markers
        .iter()
        .enumerate()
        .filter_map(|(i, m)| m.intersect(ray, basis).map(|t| (i, t)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forward_basis() -> CameraBasis {
        CameraBasis {
            right: Vec3::X,
            up: Vec3::Y,
            forward: Vec3::NEG_Z,
        }
    }

    fn ray_forward() -> Ray {
        Ray {
            origin: Vec3::ZERO,
            dir: Vec3::NEG_Z,
        }
    }

    #[test]
    fn sprite_hit_and_miss() {
        let basis = forward_basis();
        let hit = Marker::new(
            MarkerId(0),
            Vec3::new(5.0, 0.0, -100.0),
            MarkerShape::Sprite { size: [20.0, 20.0] },
            MarkerAction::Recenter,
        );
        let miss = Marker::new(
            MarkerId(1),
            Vec3::new(50.0, 0.0, -100.0),
            MarkerShape::Sprite { size: [20.0, 20.0] },
            MarkerAction::Recenter,
        );
        assert_eq!(hit.intersect(&ray_forward(), &basis), Some(100.0));
        assert!(miss.intersect(&ray_forward(), &basis).is_none());
    }

    #[test]
    fn marker_behind_camera_is_not_hit() {
        let m = Marker::new(
            MarkerId(0),
            Vec3::new(0.0, 0.0, 100.0),
            MarkerShape::Arrow { radius: 10.0 },
            MarkerAction::Recenter,
        );
        assert!(m.intersect(&ray_forward(), &forward_basis()).is_none());
    }

    #[test]
    fn pick_prefers_nearest() {
        let basis = forward_basis();
        let markers = vec![
            Marker::new(
                MarkerId(0),
                Vec3::new(0.0, 0.0, -300.0),
                MarkerShape::Sprite { size: [40.0, 40.0] },
                MarkerAction::Recenter,
            ),
            Marker::new(
                MarkerId(1),
                Vec3::new(0.0, 0.0, -150.0),
                MarkerShape::Arrow { radius: 5.0 },
                MarkerAction::CrossFade,
            ),
        ];
        assert_eq!(pick(&markers, &ray_forward(), &basis), Some(1));
    }

    #[test]
    fn activate_runs_bound_callback() {
        use std::cell::Cell;
        use std::rc::Rc;

        let fired = Rc::new(Cell::new(0));
        let counter = fired.clone();
        let mut m = Marker::new(
            MarkerId(3),
            Vec3::new(1.0, 2.0, 3.0),
            MarkerShape::default(),
            MarkerAction::Recenter,
        );
        m.bind(move |e| {
            assert_eq!(e.id, MarkerId(3));
            counter.set(counter.get() + 1);
        });
        let e = m.activate();
        assert_eq!(e.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(fired.get(), 1);
    }
}
