use bitflags::bitflags;
use winit::event::{ElementState, KeyboardInput, VirtualKeyCode, WindowEvent};

bitflags! {
    /// Logical buttons the demo reacts to.
    #[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct Buttons: u8 {
        const LEFT = 1 << 0;
        const RIGHT = 1 << 1;
        const UP = 1 << 2;
        const DOWN = 1 << 3;
        const RESET_TRANSFORM = 1 << 4;
        const QUIT = 1 << 5;
    }
}

impl Buttons {
    pub fn from_keycode(keycode: VirtualKeyCode) -> Option<Self> {
        match keycode {
            VirtualKeyCode::Left | VirtualKeyCode::A => Some(Buttons::LEFT),
            VirtualKeyCode::Right | VirtualKeyCode::D => Some(Buttons::RIGHT),
            VirtualKeyCode::Up | VirtualKeyCode::W => Some(Buttons::UP),
            VirtualKeyCode::Down | VirtualKeyCode::S => Some(Buttons::DOWN),
            VirtualKeyCode::Minus
            | VirtualKeyCode::NumpadSubtract
            | VirtualKeyCode::Back
            | VirtualKeyCode::R => Some(Buttons::RESET_TRANSFORM),
            VirtualKeyCode::Escape
            | VirtualKeyCode::Equals
            | VirtualKeyCode::Plus
            | VirtualKeyCode::NumpadAdd => Some(Buttons::QUIT),
            _ => None,
        }
    }
}

/// Input as seen by one frame.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct PadSnapshot {
    pub held: Buttons,
    pub just_pressed: Buttons,
}

impl PadSnapshot {
    pub fn new(held: Buttons, just_pressed: Buttons) -> Self {
        Self { held, just_pressed }
    }
}

/// Folds window events into button state between frames.
#[derive(Debug, Default)]
pub struct InputState {
    held: Buttons,
    just_pressed: Buttons,
}

impl InputState {
    pub fn new() -> Self {
        Default::default()
    }

    /// Returns true if the event was consumed.
    pub fn process_events(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::KeyboardInput {
                input:
                    KeyboardInput {
                        state,
                        virtual_keycode: Some(keycode),
                        ..
                    },
                ..
            } => match Buttons::from_keycode(*keycode) {
                Some(button) => {
                    self.update_button(button, *state == ElementState::Pressed);
                    true
                }
                None => false,
            },
            WindowEvent::Focused(false) => {
                self.held = Buttons::empty();
                false
            }
            _ => false,
        }
    }

    pub fn update_button(&mut self, button: Buttons, pressed: bool) {
        if pressed {
            // key repeat
            if !self.held.contains(button) {
                self.just_pressed.insert(button);
            }
            self.held.insert(button);
        } else {
            self.held.remove(button);
        }
    }

    /// Takes the state for the coming frame and clears the press edges.
    pub fn snapshot(&mut self) -> PadSnapshot {
        let snapshot = PadSnapshot::new(self.held, self.just_pressed);
        self.just_pressed = Buttons::empty();
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_is_reported_once() {
        let mut input = InputState::new();
        input.update_button(Buttons::QUIT, true);
        let first = input.snapshot();
        assert!(first.held.contains(Buttons::QUIT));
        assert!(first.just_pressed.contains(Buttons::QUIT));

        let second = input.snapshot();
        assert!(second.held.contains(Buttons::QUIT));
        assert!(second.just_pressed.is_empty());
    }

    #[test]
    fn repeats_are_not_new_presses() {
        let mut input = InputState::new();
        input.update_button(Buttons::RESET_TRANSFORM, true);
        input.snapshot();
        input.update_button(Buttons::RESET_TRANSFORM, true);
        assert!(input.snapshot().just_pressed.is_empty());
    }

    #[test]
    fn tap_between_frames_still_counts() {
        let mut input = InputState::new();
        input.update_button(Buttons::RESET_TRANSFORM, true);
        input.update_button(Buttons::RESET_TRANSFORM, false);
        let snapshot = input.snapshot();
        assert!(snapshot.held.is_empty());
        assert_eq!(snapshot.just_pressed, Buttons::RESET_TRANSFORM);
    }

    #[test]
    fn release_clears_held() {
        let mut input = InputState::new();
        input.update_button(Buttons::LEFT, true);
        input.update_button(Buttons::UP, true);
        input.update_button(Buttons::LEFT, false);
        assert_eq!(input.snapshot().held, Buttons::UP);
    }

    #[test]
    fn keyboard_mapping() {
        assert_eq!(Buttons::from_keycode(VirtualKeyCode::A), Some(Buttons::LEFT));
        assert_eq!(Buttons::from_keycode(VirtualKeyCode::Right), Some(Buttons::RIGHT));
        assert_eq!(Buttons::from_keycode(VirtualKeyCode::W), Some(Buttons::UP));
        assert_eq!(Buttons::from_keycode(VirtualKeyCode::Down), Some(Buttons::DOWN));
        assert_eq!(Buttons::from_keycode(VirtualKeyCode::Minus), Some(Buttons::RESET_TRANSFORM));
        assert_eq!(Buttons::from_keycode(VirtualKeyCode::Escape), Some(Buttons::QUIT));
        assert_eq!(Buttons::from_keycode(VirtualKeyCode::Q), None);
    }
}
