// camera.rs — orbit camera at the center of the panorama sphere
//
// The camera orbits the sphere center on a small radius and always looks at
// the center, so the view direction is the negated camera position.

use crate::config::CameraConfig;
use glam::{Mat4, Vec2, Vec3, Vec4};
use std::f32::consts::PI;

/// Keeps the camera off the poles so look-at never degenerates.
const POLAR_EPSILON: f32 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }
}

/// World-space camera axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraBasis {
    pub right: Vec3,
    pub up: Vec3,
    pub forward: Vec3,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    pub position: Vec3,
    fov: f32,
    pub min_fov: f32,
    pub max_fov: f32,
    pub orbit_radius: f32,
    pub near: f32,
    pub far: f32,
    pub aspect: f32,
}

impl OrbitCamera {
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, config.orbit_radius),
            fov: config.fov.clamp(config.min_fov, config.max_fov),
            min_fov: config.min_fov,
            max_fov: config.max_fov,
            orbit_radius: config.orbit_radius,
            near: config.near,
            far: config.far,
            aspect: 16.0 / 9.0,
        }
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn set_fov(&mut self, fov: f32) {
        self.fov = fov.clamp(self.min_fov, self.max_fov);
    }

    /// Azimuth around +Y measured from +Z, in radians.
    pub fn azimuth(&self) -> f32 {
        self.position.x.atan2(self.position.z)
    }

    /// Angle from +Y, in radians.
    pub fn polar(&self) -> f32 {
        let r = self.position.length();
        if r <= f32::EPSILON {
            return PI / 2.0;
        }
        (self.position.y / r).clamp(-1.0, 1.0).acos()
    }

    pub fn set_spherical(&mut self, azimuth: f32, polar: f32) {
        let polar = polar.clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
        let s = polar.sin();
        self.position = Vec3::new(
            self.orbit_radius * s * azimuth.sin(),
            self.orbit_radius * polar.cos(),
            self.orbit_radius * s * azimuth.cos(),
        );
    }

    pub fn rotate(&mut self, d_azimuth: f32, d_polar: f32) {
        self.set_spherical(self.azimuth() + d_azimuth, self.polar() + d_polar);
    }

    /// Move toward `target` by `factor`, staying on the orbit.
    pub fn lerp_toward(&mut self, target: Vec3, factor: f32) {
        let next = self.position.lerp(target, factor);
        // antipodal start: nudge sideways instead of collapsing onto the center
        let dir = next
            .try_normalize()
            .unwrap_or_else(|| self.position.normalize_or(Vec3::Z).any_orthonormal_vector());
        self.position = dir * self.orbit_radius;
        let polar = self.polar();
        if !(POLAR_EPSILON..=PI - POLAR_EPSILON).contains(&polar) {
            self.set_spherical(self.azimuth(), polar);
        }
    }

    pub fn reset(&mut self, fov: f32) {
        self.position = Vec3::new(0.0, 0.0, self.orbit_radius);
        self.set_fov(fov);
    }

    pub fn forward(&self) -> Vec3 {
        -self.position.normalize_or(Vec3::Z)
    }

    pub fn basis(&self) -> CameraBasis {
        let forward = self.forward();
        let right = forward.cross(Vec3::Y).normalize_or(Vec3::X);
        let up = right.cross(forward);
        CameraBasis { right, up, forward }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, Vec3::ZERO, Vec3::Y)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// Pixel coordinates to normalized device coordinates (+y up).
    pub fn ndc(pixel: Vec2, viewport: Vec2) -> Vec2 {
        Vec2::new(
            pixel.x / viewport.x * 2.0 - 1.0,
            -(pixel.y / viewport.y) * 2.0 + 1.0,
        )
    }

    /// World-space ray from the camera through a pixel.
    pub fn screen_ray(&self, pixel: Vec2, viewport: Vec2) -> Ray {
        let ndc = Self::ndc(pixel, viewport);
        let inv = self.view_projection().inverse();
        let p_far = inv * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);
        let far = p_far.truncate() / p_far.w;
        Ray {
            origin: self.position,
            dir: (far - self.position).normalize_or(self.forward()),
        }
    }

    /// Pixel position of a world point, `None` when behind the camera.
    pub fn project(&self, world: Vec3, viewport: Vec2) -> Option<Vec2> {
        let clip = self.view_projection() * world.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        Some(Vec2::new(
            (ndc.x + 1.0) * 0.5 * viewport.x,
            (1.0 - ndc.y) * 0.5 * viewport.y,
        ))
    }

    /// Screen pixels covered by one world unit at the depth of `world`.
    pub fn pixels_per_unit(&self, world: Vec3, viewport: Vec2) -> f32 {
        let depth = (world - self.position).dot(self.forward()).max(self.near);
        viewport.y * 0.5 / ((self.fov.to_radians() * 0.5).tan() * depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn camera() -> OrbitCamera {
        OrbitCamera::new(&CameraConfig::default())
    }

    #[test]
    fn starts_looking_down_negative_z() {
        let cam = camera();
        assert_relative_eq!(cam.forward(), Vec3::NEG_Z);
        assert_relative_eq!(cam.azimuth(), 0.0);
        assert_relative_eq!(cam.polar(), PI / 2.0);
    }

    #[test]
    fn center_ray_matches_forward() {
        let cam = camera();
        let viewport = Vec2::new(800.0, 600.0);
        let ray = cam.screen_ray(viewport * 0.5, viewport);
        assert_relative_eq!(ray.dir, cam.forward(), epsilon = 1e-4);
    }

    #[test]
    fn project_inverts_screen_ray() {
        let mut cam = camera();
        cam.rotate(0.4, -0.2);
        let viewport = Vec2::new(1280.0, 720.0);
        let pixel = Vec2::new(300.0, 200.0);
        let ray = cam.screen_ray(pixel, viewport);
        let projected = cam.project(ray.at(200.0), viewport).unwrap();
        assert_relative_eq!(projected.x, pixel.x, epsilon = 0.5);
        assert_relative_eq!(projected.y, pixel.y, epsilon = 0.5);
    }

    #[test]
    fn polar_is_clamped_away_from_poles() {
        let mut cam = camera();
        cam.rotate(0.0, -10.0);
        assert!(cam.polar() >= POLAR_EPSILON * 0.99);
        cam.rotate(0.0, 20.0);
        assert!(cam.polar() <= PI - POLAR_EPSILON * 0.99);
    }

    #[test]
    fn lerp_stays_on_orbit() {
        let mut cam = camera();
        let target = Vec3::new(0.1, 0.0, 0.0);
        for _ in 0..10 {
            cam.lerp_toward(target, 0.05);
            assert_relative_eq!(cam.position.length(), cam.orbit_radius, epsilon = 1e-5);
        }
    }

    #[test]
    fn antipodal_lerp_does_not_collapse() {
        let mut cam = camera();
        let target = -cam.position;
        cam.lerp_toward(target, 0.5);
        assert_relative_eq!(cam.position.length(), cam.orbit_radius, epsilon = 1e-5);
    }
}
