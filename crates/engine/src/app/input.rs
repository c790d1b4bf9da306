use winit::event::{ElementState, MouseButton};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::sim::{PointerEvent, PointerKind, Vec2};

/// What one window key event means to the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Key(KeyCode),
    Quit,
}

/// Turns window events into engine pointer events and key presses.
#[derive(Debug, Default)]
pub(crate) struct InputCollector {
    cursor_position_px: Option<Vec2>,
    left_mouse_is_down: bool,
    quit_requested: bool,
}

impl InputCollector {
    pub(crate) fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub(crate) fn mark_quit_requested(&mut self) {
        self.quit_requested = true;
    }

    pub(crate) fn cursor_moved(&mut self, position_px: Vec2) -> PointerEvent {
        self.cursor_position_px = Some(position_px);
        PointerEvent {
            kind: PointerKind::Move,
            position_px,
        }
    }

    /// Left button edges at the last cursor position. Nothing is reported
    /// before the cursor has entered the window.
    pub(crate) fn mouse_input(
        &mut self,
        button: MouseButton,
        state: ElementState,
    ) -> Option<PointerEvent> {
        if button != MouseButton::Left {
            return None;
        }
        let kind = match state {
            ElementState::Pressed if self.left_mouse_is_down => return None,
            ElementState::Pressed => {
                self.left_mouse_is_down = true;
                PointerKind::Press
            }
            ElementState::Released => {
                self.left_mouse_is_down = false;
                PointerKind::Release
            }
        };
        let position_px = self.cursor_position_px?;
        Some(PointerEvent { kind, position_px })
    }

    pub(crate) fn key_input(
        &mut self,
        key: PhysicalKey,
        state: ElementState,
        repeat: bool,
    ) -> Option<InputAction> {
        if state != ElementState::Pressed || repeat {
            return None;
        }
        match key {
            PhysicalKey::Code(KeyCode::Escape) => {
                self.mark_quit_requested();
                Some(InputAction::Quit)
            }
            PhysicalKey::Code(code) => Some(InputAction::Key(code)),
            PhysicalKey::Unidentified(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_motion_becomes_move_event() {
        let mut input = InputCollector::default();
        let event = input.cursor_moved(Vec2::new(12.0, 34.0));
        assert_eq!(event, PointerEvent::moved(12.0, 34.0));
    }

    #[test]
    fn left_click_reports_press_and_release_at_cursor() {
        let mut input = InputCollector::default();
        input.cursor_moved(Vec2::new(5.0, 6.0));

        let press = input
            .mouse_input(MouseButton::Left, ElementState::Pressed)
            .expect("press");
        let release = input
            .mouse_input(MouseButton::Left, ElementState::Released)
            .expect("release");

        assert_eq!(press, PointerEvent::press(5.0, 6.0));
        assert_eq!(release, PointerEvent::release(5.0, 6.0));
    }

    #[test]
    fn held_left_click_does_not_repeat_press() {
        let mut input = InputCollector::default();
        input.cursor_moved(Vec2::new(1.0, 1.0));
        assert!(input
            .mouse_input(MouseButton::Left, ElementState::Pressed)
            .is_some());
        assert!(input
            .mouse_input(MouseButton::Left, ElementState::Pressed)
            .is_none());
    }

    #[test]
    fn other_buttons_and_unknown_cursor_are_ignored() {
        let mut input = InputCollector::default();
        assert!(input
            .mouse_input(MouseButton::Left, ElementState::Pressed)
            .is_none());
        input.cursor_moved(Vec2::new(1.0, 1.0));
        assert!(input
            .mouse_input(MouseButton::Right, ElementState::Pressed)
            .is_none());
    }

    #[test]
    fn key_presses_forward_codes_and_skip_repeats_and_releases() {
        let mut input = InputCollector::default();
        let arrow = PhysicalKey::Code(KeyCode::ArrowLeft);
        assert_eq!(
            input.key_input(arrow, ElementState::Pressed, false),
            Some(InputAction::Key(KeyCode::ArrowLeft))
        );
        assert_eq!(input.key_input(arrow, ElementState::Pressed, true), None);
        assert_eq!(input.key_input(arrow, ElementState::Released, false), None);
    }

    #[test]
    fn escape_requests_quit() {
        let mut input = InputCollector::default();
        let action = input.key_input(
            PhysicalKey::Code(KeyCode::Escape),
            ElementState::Pressed,
            false,
        );
        assert_eq!(action, Some(InputAction::Quit));
        assert!(input.quit_requested());
    }
}
