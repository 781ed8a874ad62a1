//! Per-frame animation driver.
//!
//! Exactly one [`AnimationMode`] is active at a time. Recentering moves the
//! orbit camera toward a marker, transitioning cross-fades the sphere's two
//! textures, and auto-rotation spins the view after a period without input.

use crate::camera::OrbitCamera;
use crate::config::AnimationConfig;
use crate::scene::Sphere;
use glam::Vec3;

/// Direction of a cross-fade between texture 0 and texture 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeDirection {
    /// 0 → 1
    Forward,
    /// 1 → 0
    Backward,
}

impl FadeDirection {
    /// Direction away from the texture currently shown.
    pub fn from_current(current: usize) -> Self {
        if current == 0 {
            FadeDirection::Forward
        } else {
            FadeDirection::Backward
        }
    }

    pub fn target_index(self) -> usize {
        match self {
            FadeDirection::Forward => 1,
            FadeDirection::Backward => 0,
        }
    }

    pub fn target_blend(self) -> f32 {
        self.target_index() as f32
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationMode {
    Idle,
    Recentering { target: Vec3 },
    AutoRotating,
    Transitioning { direction: FadeDirection },
}

impl AnimationMode {
    pub fn name(&self) -> &'static str {
        match self {
            AnimationMode::Idle => "idle",
            AnimationMode::Recentering { .. } => "recentering",
            AnimationMode::AutoRotating => "auto-rotating",
            AnimationMode::Transitioning { .. } => "transitioning",
        }
    }
}

/// Something that finished during a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameEvent {
    RecenterFinished,
    TransitionFinished { current: usize },
    AutoRotateStarted,
}

#[derive(Debug, Clone)]
pub struct AnimationDriver {
    mode: AnimationMode,
    pub lerp_factor: f32,
    pub recenter_epsilon: f32,
    pub blend_epsilon: f32,
    pub auto_rotate: bool,
    pub auto_rotate_speed: f32,
    pub auto_rotate_delay: f32,
    idle_elapsed: f32,
}

impl AnimationDriver {
    pub fn new(config: &AnimationConfig) -> Self {
        Self {
            mode: AnimationMode::Idle,
            lerp_factor: config.lerp_factor,
            recenter_epsilon: config.recenter_epsilon,
            blend_epsilon: config.blend_epsilon,
            auto_rotate: config.auto_rotate,
            auto_rotate_speed: config.auto_rotate_speed,
            auto_rotate_delay: config.auto_rotate_delay,
            idle_elapsed: 0.0,
        }
    }

    pub fn mode(&self) -> AnimationMode {
        self.mode
    }

    fn set_mode(&mut self, mode: AnimationMode) {
        if self.mode != mode {
            log::debug!("animation mode {} -> {}", self.mode.name(), mode.name());
        }
        self.mode = mode;
    }

    /// Any user input resets the idle timer and stops auto-rotation.
    pub fn note_interaction(&mut self) {
        self.idle_elapsed = 0.0;
        if self.mode == AnimationMode::AutoRotating {
            self.set_mode(AnimationMode::Idle);
        }
    }

    /// A drag cancels recentering as well as auto-rotation. Cross-fades keep running.
    pub fn cancel_for_drag(&mut self) {
        self.note_interaction();
        if matches!(self.mode, AnimationMode::Recentering { .. }) {
            self.set_mode(AnimationMode::Idle);
        }
    }

    pub fn begin_recenter(&mut self, target: Vec3) -> bool {
        if matches!(self.mode, AnimationMode::Transitioning { .. }) {
            log::debug!("recenter ignored during cross-fade");
            return false;
        }
        self.set_mode(AnimationMode::Recentering { target });
        true
    }

    /// Start a cross-fade away from the shown texture. Needs two textures.
    pub fn begin_transition(&mut self, sphere: &Sphere) -> bool {
        if !sphere.can_cross_fade() {
            log::warn!("cross-fade requested with a single panorama");
            return false;
        }
        if matches!(self.mode, AnimationMode::Transitioning { .. }) {
            log::debug!("cross-fade already in progress");
            return false;
        }
        let direction = FadeDirection::from_current(sphere.current_texture());
        self.set_mode(AnimationMode::Transitioning { direction });
        true
    }

    pub fn toggle_auto_rotate(&mut self) {
        self.auto_rotate = !self.auto_rotate;
        if !self.auto_rotate && self.mode == AnimationMode::AutoRotating {
            self.set_mode(AnimationMode::Idle);
        }
    }

    /// Advance one frame of `dt` seconds.
    pub fn update(
        &mut self,
        dt: f32,
        camera: &mut OrbitCamera,
        sphere: &mut Sphere,
        dragging: bool,
    ) -> Option<FrameEvent> {
        match self.mode {
            AnimationMode::Idle => {
                if dragging {
                    self.idle_elapsed = 0.0;
                    return None;
                }
                self.idle_elapsed += dt;
                if self.auto_rotate && self.idle_elapsed >= self.auto_rotate_delay {
                    self.set_mode(AnimationMode::AutoRotating);
                    return Some(FrameEvent::AutoRotateStarted);
                }
                None
            }
            AnimationMode::AutoRotating => {
                if dragging {
                    self.set_mode(AnimationMode::Idle);
                    return None;
                }
                camera.rotate(self.auto_rotate_speed * dt, 0.0);
                None
            }
            AnimationMode::Recentering { target } => {
                camera.lerp_toward(target, self.lerp_factor);
                if camera.position.distance(target) < self.recenter_epsilon {
                    self.finish();
                    return Some(FrameEvent::RecenterFinished);
                }
                None
            }
            AnimationMode::Transitioning { direction } => {
                let goal = direction.target_blend();
                let blend = sphere.blend() + (goal - sphere.blend()) * self.lerp_factor;
                sphere.set_blend(blend);
                if (sphere.blend() - goal).abs() < self.blend_epsilon {
                    sphere.settle_on(direction.target_index());
                    self.finish();
                    return Some(FrameEvent::TransitionFinished {
                        current: sphere.current_texture(),
                    });
                }
                None
            }
        }
    }

    fn finish(&mut self) {
        self.idle_elapsed = 0.0;
        self.set_mode(AnimationMode::Idle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CameraConfig;

    fn fixtures() -> (AnimationDriver, OrbitCamera, Sphere) {
        (
            AnimationDriver::new(&AnimationConfig::default()),
            OrbitCamera::new(&CameraConfig::default()),
            Sphere::new(500.0, vec!["a.jpg".into(), "b.jpg".into()]),
        )
    }

    #[test]
    fn auto_rotate_waits_for_delay() {
        let (mut driver, mut camera, mut sphere) = fixtures();
        let start = camera.azimuth();
        for _ in 0..60 {
            driver.update(1.0 / 60.0, &mut camera, &mut sphere, false);
        }
        assert_eq!(driver.mode(), AnimationMode::Idle);
        assert_eq!(camera.azimuth(), start);

        let mut started = false;
        for _ in 0..200 {
            if driver.update(1.0 / 60.0, &mut camera, &mut sphere, false)
                == Some(FrameEvent::AutoRotateStarted)
            {
                started = true;
            }
        }
        assert!(started);
        assert_eq!(driver.mode(), AnimationMode::AutoRotating);
        assert!(camera.azimuth() != start);
    }

    #[test]
    fn dragging_holds_idle_timer() {
        let (mut driver, mut camera, mut sphere) = fixtures();
        for _ in 0..1000 {
            driver.update(1.0 / 60.0, &mut camera, &mut sphere, true);
        }
        assert_eq!(driver.mode(), AnimationMode::Idle);
    }

    #[test]
    fn disabled_auto_rotate_never_starts() {
        let (mut driver, mut camera, mut sphere) = fixtures();
        driver.toggle_auto_rotate();
        for _ in 0..1000 {
            driver.update(1.0 / 60.0, &mut camera, &mut sphere, false);
        }
        assert_eq!(driver.mode(), AnimationMode::Idle);
    }

    #[test]
    fn drag_cancels_recenter_but_not_cross_fade() {
        let (mut driver, _camera, sphere) = fixtures();
        driver.begin_recenter(Vec3::new(0.1, 0.0, 0.0));
        driver.cancel_for_drag();
        assert_eq!(driver.mode(), AnimationMode::Idle);

        assert!(driver.begin_transition(&sphere));
        driver.cancel_for_drag();
        assert!(matches!(driver.mode(), AnimationMode::Transitioning { .. }));
    }

    #[test]
    fn second_cross_fade_request_is_ignored() {
        let (mut driver, _camera, sphere) = fixtures();
        assert!(driver.begin_transition(&sphere));
        assert!(!driver.begin_transition(&sphere));
    }
}
