// viewer.rs — the panorama viewer: scene + input + animation in one frame loop

use crate::animation::{AnimationDriver, AnimationMode, FrameEvent};
use crate::config::ViewerConfig;
use crate::input::InputController;
use crate::marker::{pick, MarkerAction, MarkerActivated};
use crate::scene::Scene;
use glam::{Mat4, Vec2, Vec3};

/// Everything the renderer and UI need to draw one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameState {
    pub inv_view_proj: Mat4,
    pub camera_position: Vec3,
    pub sphere_radius: f32,
    pub blend: f32,
    pub current_texture: usize,
    pub fov: f32,
    pub azimuth: f32,
    pub polar: f32,
    pub mode: AnimationMode,
    pub event: Option<FrameEvent>,
}

#[derive(Debug)]
pub struct PanoramaViewer {
    pub scene: Scene,
    pub input: InputController,
    pub driver: AnimationDriver,
    viewport: Vec2,
    default_fov: f32,
}

impl PanoramaViewer {
    pub fn new(config: &ViewerConfig) -> Self {
        let mut viewer = Self {
            scene: Scene::new(config),
            input: InputController::new(&config.input),
            driver: AnimationDriver::new(&config.animation),
            viewport: Vec2::new(1280.0, 720.0),
            default_fov: config.camera.fov,
        };
        viewer.resize(viewer.viewport);
        viewer
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn resize(&mut self, viewport: Vec2) {
        if viewport.x > 0.0 && viewport.y > 0.0 {
            self.viewport = viewport;
            self.scene.camera.aspect = viewport.x / viewport.y;
        }
    }

    pub fn mode(&self) -> AnimationMode {
        self.driver.mode()
    }

    pub fn pointer_down(&mut self, pos: Vec2) {
        self.input.pointer_down(pos);
        self.driver.cancel_for_drag();
    }

    pub fn pointer_move(&mut self, pos: Vec2) {
        if let Some(delta) = self.input.pointer_move(pos) {
            self.driver.note_interaction();
            self.scene.camera.rotate(-delta.x, -delta.y);
        }
    }

    /// Release the pointer; a press released within the click tolerance
    /// is a click at `pos`.
    pub fn pointer_up(&mut self, pos: Vec2) -> Option<MarkerActivated> {
        self.input.pointer_up();
        self.click(pos)
    }

    pub fn pointer_leave(&mut self) {
        self.input.pointer_leave();
    }

    pub fn wheel(&mut self, delta_y: f32) {
        self.driver.note_interaction();
        let fov = self.scene.camera.fov() + self.input.wheel(delta_y);
        self.scene.camera.set_fov(fov);
    }

    /// Hit-test markers under `pos` and activate the nearest one. Only the
    /// click left pending by the last release is honored; repeated or
    /// unpaired clicks do nothing.
    pub fn click(&mut self, pos: Vec2) -> Option<MarkerActivated> {
        if !self.input.accept_click() {
            return None;
        }
        self.driver.note_interaction();

        let camera = &self.scene.camera;
        let ray = camera.screen_ray(pos, self.viewport);
        let index = pick(&self.scene.markers, &ray, &camera.basis())?;
        let event = self.scene.markers[index].activate();
        log::debug!("marker {:?} activated ({:?})", event.id, event.action);

        match event.action {
            MarkerAction::Recenter => {
                let target = -event.position.normalize_or(Vec3::NEG_Z) * camera.orbit_radius;
                self.driver.begin_recenter(target);
            }
            MarkerAction::CrossFade => {
                self.driver.begin_transition(&self.scene.sphere);
            }
        }
        Some(event)
    }

    /// Keyboard "reset view": back to the start orientation and default fov.
    pub fn reset_view(&mut self) {
        self.driver.cancel_for_drag();
        self.scene.camera.reset(self.default_fov);
    }

    /// Advance animations by `dt` seconds and snapshot the result.
    pub fn frame(&mut self, dt: f32) -> FrameState {
        let dragging = self.input.is_dragging();
        let event = self.driver.update(
            dt,
            &mut self.scene.camera,
            &mut self.scene.sphere,
            dragging,
        );
        if let Some(e) = event {
            log::debug!("frame event {:?}", e);
        }
        self.snapshot(event)
    }

    pub fn snapshot(&self, event: Option<FrameEvent>) -> FrameState {
        let camera = &self.scene.camera;
        let sphere = &self.scene.sphere;
        FrameState {
            inv_view_proj: camera.view_projection().inverse(),
            camera_position: camera.position,
            sphere_radius: sphere.radius,
            blend: sphere.blend(),
            current_texture: sphere.current_texture(),
            fov: camera.fov(),
            azimuth: camera.azimuth(),
            polar: camera.polar(),
            mode: self.driver.mode(),
            event,
        }
    }
}
