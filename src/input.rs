use winit::event::{ElementState, KeyEvent, MouseButton};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::controls::ControlAction;
use crate::rotation::RotationPlane;

/// One 5 degree step of a rotation control.
pub const ROTATION_STEP: f32 = 1.0 / 72.0;
pub const WINDOW_STEP: f32 = 0.05;

pub struct InputState {
    active_plane: RotationPlane,
    actions: Vec<ControlAction>,
    orbit_held: bool,
    cursor: Option<(f64, f64)>,
    drag_dx: f64,
    drag_dy: f64,
    scroll_accumulated: f32,
    exit_requested: bool,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            active_plane: RotationPlane::Zw,
            actions: Vec::new(),
            orbit_held: false,
            cursor: None,
            drag_dx: 0.0,
            drag_dy: 0.0,
            scroll_accumulated: 0.0,
            exit_requested: false,
        }
    }

    pub fn active_plane(&self) -> RotationPlane {
        self.active_plane
    }

    pub fn handle_key_event(&mut self, event: &KeyEvent) {
        if let PhysicalKey::Code(code) = event.physical_key {
            self.handle_key_code(code, event.state.is_pressed());
        }
    }

    pub fn handle_key_code(&mut self, code: KeyCode, pressed: bool) {
        if !pressed {
            return;
        }
        let plane = self.active_plane;
        match code {
            KeyCode::Digit1 => self.active_plane = RotationPlane::Zw,
            KeyCode::Digit2 => self.active_plane = RotationPlane::Yw,
            KeyCode::Digit3 => self.active_plane = RotationPlane::Yz,
            KeyCode::Digit4 => self.active_plane = RotationPlane::Xw,
            KeyCode::Digit5 => self.active_plane = RotationPlane::Xz,
            KeyCode::Digit6 => self.active_plane = RotationPlane::Xy,
            KeyCode::ArrowLeft => self.actions.push(ControlAction::NudgeRotation {
                plane,
                delta: -ROTATION_STEP,
            }),
            KeyCode::ArrowRight => self.actions.push(ControlAction::NudgeRotation {
                plane,
                delta: ROTATION_STEP,
            }),
            KeyCode::KeyC => self.actions.push(ControlAction::CycleCollapse),
            KeyCode::KeyV => self.actions.push(ControlAction::ToggleColoring),
            KeyCode::BracketLeft => self.actions.push(ControlAction::NudgeWindowMin(-WINDOW_STEP)),
            KeyCode::BracketRight => self.actions.push(ControlAction::NudgeWindowMin(WINDOW_STEP)),
            KeyCode::Minus => self.actions.push(ControlAction::NudgeWindowMax(-WINDOW_STEP)),
            KeyCode::Equal => self.actions.push(ControlAction::NudgeWindowMax(WINDOW_STEP)),
            KeyCode::KeyR => self.actions.push(ControlAction::Reset),
            KeyCode::Space => self.actions.push(ControlAction::Regenerate),
            KeyCode::Escape => self.exit_requested = true,
            _ => {}
        }
    }

    pub fn handle_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        if button == MouseButton::Right {
            self.orbit_held = state.is_pressed();
        }
    }

    /// Absolute cursor position; only movement while orbiting is accumulated.
    pub fn handle_cursor_moved(&mut self, x: f64, y: f64) {
        if let Some((last_x, last_y)) = self.cursor {
            if self.orbit_held {
                self.drag_dx += x - last_x;
                self.drag_dy += y - last_y;
            }
        }
        self.cursor = Some((x, y));
    }

    pub fn handle_cursor_left(&mut self) {
        self.cursor = None;
        self.orbit_held = false;
    }

    pub fn handle_scroll(&mut self, delta_y: f32) {
        self.scroll_accumulated += delta_y;
    }

    pub fn take_actions(&mut self) -> Vec<ControlAction> {
        std::mem::take(&mut self.actions)
    }

    pub fn take_drag_delta(&mut self) -> (f32, f32) {
        let d = (self.drag_dx as f32, self.drag_dy as f32);
        self.drag_dx = 0.0;
        self.drag_dy = 0.0;
        d
    }

    pub fn take_scroll(&mut self) -> f32 {
        std::mem::take(&mut self.scroll_accumulated)
    }

    pub fn take_exit(&mut self) -> bool {
        std::mem::take(&mut self.exit_requested)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_select_plane_for_arrow_nudges() {
        let mut input = InputState::new();
        input.handle_key_code(KeyCode::Digit6, true);
        input.handle_key_code(KeyCode::ArrowRight, true);
        input.handle_key_code(KeyCode::Digit4, true);
        input.handle_key_code(KeyCode::ArrowLeft, true);

        assert_eq!(input.active_plane(), RotationPlane::Xw);
        assert_eq!(
            input.take_actions(),
            vec![
                ControlAction::NudgeRotation { plane: RotationPlane::Xy, delta: ROTATION_STEP },
                ControlAction::NudgeRotation { plane: RotationPlane::Xw, delta: -ROTATION_STEP },
            ]
        );
        assert!(input.take_actions().is_empty(), "actions should drain");
    }

    #[test]
    fn releases_are_ignored() {
        let mut input = InputState::new();
        input.handle_key_code(KeyCode::KeyC, false);
        input.handle_key_code(KeyCode::Escape, false);
        assert!(input.take_actions().is_empty());
        assert!(!input.take_exit());
    }

    #[test]
    fn window_keys_map_to_bound_nudges() {
        let mut input = InputState::new();
        for code in [KeyCode::BracketRight, KeyCode::Minus, KeyCode::KeyV, KeyCode::Space] {
            input.handle_key_code(code, true);
        }
        assert_eq!(
            input.take_actions(),
            vec![
                ControlAction::NudgeWindowMin(WINDOW_STEP),
                ControlAction::NudgeWindowMax(-WINDOW_STEP),
                ControlAction::ToggleColoring,
                ControlAction::Regenerate,
            ]
        );
    }

    #[test]
    fn drag_only_counts_while_right_button_held() {
        let mut input = InputState::new();
        input.handle_cursor_moved(10.0, 10.0);
        input.handle_cursor_moved(20.0, 15.0);
        assert_eq!(input.take_drag_delta(), (0.0, 0.0));

        input.handle_mouse_button(MouseButton::Right, ElementState::Pressed);
        input.handle_cursor_moved(25.0, 5.0);
        input.handle_cursor_moved(30.0, 8.0);
        assert_eq!(input.take_drag_delta(), (10.0, -7.0));

        input.handle_mouse_button(MouseButton::Right, ElementState::Released);
        input.handle_cursor_moved(100.0, 100.0);
        assert_eq!(input.take_drag_delta(), (0.0, 0.0));
    }

    #[test]
    fn scroll_accumulates_until_taken() {
        let mut input = InputState::new();
        input.handle_scroll(1.0);
        input.handle_scroll(0.5);
        assert_eq!(input.take_scroll(), 1.5);
        assert_eq!(input.take_scroll(), 0.0);
    }

    #[test]
    fn escape_requests_exit_once() {
        let mut input = InputState::new();
        input.handle_key_code(KeyCode::Escape, true);
        assert!(input.take_exit());
        assert!(!input.take_exit());
    }
}
