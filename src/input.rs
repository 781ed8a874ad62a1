// input.rs — pointer/wheel state machine
//
// Pure state: the controller turns raw pointer events into rotation and zoom
// deltas and decides whether a release is a click. Applying those deltas to
// the camera is the viewer's job.

use crate::config::InputConfig;
use glam::Vec2;

#[derive(Debug, Clone)]
pub struct InputController {
    pub rotate_sensitivity: f32,
    pub zoom_sensitivity: f32,
    pub click_tolerance: f32,
    dragging: bool,
    last_pointer: Vec2,
    travel: f32,
    click_pending: bool,
}

impl InputController {
    pub fn new(config: &InputConfig) -> Self {
        Self {
            rotate_sensitivity: config.rotate_sensitivity,
            zoom_sensitivity: config.zoom_sensitivity,
            click_tolerance: config.click_tolerance_px,
            dragging: false,
            last_pointer: Vec2::ZERO,
            travel: 0.0,
            click_pending: false,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn pointer_down(&mut self, pos: Vec2) {
        self.dragging = true;
        self.last_pointer = pos;
        self.travel = 0.0;
        self.click_pending = false;
    }

    /// Rotation delta in radians (x = horizontal, y = vertical), `None` unless dragging.
    pub fn pointer_move(&mut self, pos: Vec2) -> Option<Vec2> {
        if !self.dragging {
            return None;
        }
        let delta = pos - self.last_pointer;
        self.last_pointer = pos;
        self.travel += delta.length();
        Some(delta * self.rotate_sensitivity)
    }

    /// Pointer released. Ending a press that stayed within the tolerance
    /// leaves exactly one click pending.
    pub fn pointer_up(&mut self) {
        self.click_pending = self.dragging && self.travel <= self.click_tolerance;
        self.dragging = false;
    }

    /// Pointer left the surface; the press is abandoned without a click.
    pub fn pointer_leave(&mut self) {
        self.click_pending = false;
        self.dragging = false;
    }

    /// Field-of-view change in degrees for a wheel delta (positive zooms out).
    pub fn wheel(&self, delta_y: f32) -> f32 {
        delta_y * self.zoom_sensitivity
    }

    /// Consume the pending click, if any.
    pub fn accept_click(&mut self) -> bool {
        std::mem::take(&mut self.click_pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> InputController {
        InputController::new(&InputConfig::default())
    }

    #[test]
    fn move_without_press_is_ignored() {
        let mut input = controller();
        assert!(input.pointer_move(Vec2::new(10.0, 10.0)).is_none());
    }

    #[test]
    fn delta_is_scaled_by_sensitivity() {
        let mut input = controller();
        input.pointer_down(Vec2::new(100.0, 100.0));
        let d = input.pointer_move(Vec2::new(120.0, 90.0)).unwrap();
        assert_eq!(d, Vec2::new(20.0 * 0.005, -10.0 * 0.005));
        let d = input.pointer_move(Vec2::new(121.0, 90.0)).unwrap();
        assert_eq!(d, Vec2::new(0.005, 0.0));
    }

    #[test]
    fn long_drag_suppresses_click() {
        let mut input = controller();
        input.pointer_down(Vec2::ZERO);
        input.pointer_move(Vec2::new(50.0, 0.0));
        input.pointer_up();
        assert!(!input.accept_click());
    }

    #[test]
    fn jitter_within_tolerance_is_still_a_click() {
        let mut input = controller();
        input.pointer_down(Vec2::ZERO);
        input.pointer_move(Vec2::new(1.0, 1.0));
        input.pointer_up();
        assert!(input.accept_click());
        assert!(!input.accept_click());
    }

    #[test]
    fn click_needs_a_press() {
        let mut input = controller();
        assert!(!input.accept_click());
        input.pointer_up();
        assert!(!input.accept_click());
    }

    #[test]
    fn leaving_abandons_the_press() {
        let mut input = controller();
        input.pointer_down(Vec2::ZERO);
        input.pointer_leave();
        input.pointer_up();
        assert!(!input.accept_click());
    }

    #[test]
    fn no_click_while_dragging() {
        let mut input = controller();
        input.pointer_down(Vec2::ZERO);
        assert!(!input.accept_click());
    }
}
