use glam::Vec2;
use std::collections::HashSet;

/// Keys the sandbox reacts to, identified by physical location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    /// Run modifier.
    E,
    /// Reset the scene.
    Q,
    Space,
    Digit1,
    Digit2,
    Digit3,
    Digit4,
    Digit5,
    F1,
    F2,
    F3,
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
}

/// A discrete input event delivered by the window layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyPressed(Key),
    KeyReleased(Key),
    ButtonPressed(MouseButton),
    ButtonReleased(MouseButton),
    /// Relative mouse motion in window pixels.
    MouseMotion { dx: f32, dy: f32 },
}

/// Accumulated keyboard/mouse state for one frame.
///
/// Held keys persist across frames; release edges and mouse deltas are
/// per-frame and must be cleared with [`end_frame`](Self::end_frame) after
/// consumers have run.
#[derive(Debug, Default)]
pub struct InputState {
    held: HashSet<Key>,
    released: HashSet<Key>,
    buttons_released: HashSet<MouseButton>,
    mouse_delta: Vec2,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::KeyPressed(key) => {
                self.held.insert(key);
            }
            InputEvent::KeyReleased(key) => {
                self.held.remove(&key);
                self.released.insert(key);
            }
            InputEvent::ButtonPressed(_) => {}
            InputEvent::ButtonReleased(button) => {
                self.buttons_released.insert(button);
            }
            InputEvent::MouseMotion { dx, dy } => {
                self.mouse_delta += Vec2::new(dx, dy);
            }
        }
    }

    /// Instantaneous keyboard state.
    pub fn held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    /// True if `key` was released since the last `end_frame`.
    pub fn released(&self, key: Key) -> bool {
        self.released.contains(&key)
    }

    /// True if `button` was released since the last `end_frame`.
    pub fn button_released(&self, button: MouseButton) -> bool {
        self.buttons_released.contains(&button)
    }

    /// Accumulated mouse motion since the last call; resets on read.
    pub fn take_mouse_delta(&mut self) -> Vec2 {
        std::mem::take(&mut self.mouse_delta)
    }

    /// Drop the per-frame edges. Call once per frame after all consumers.
    pub fn end_frame(&mut self) {
        self.released.clear();
        self.buttons_released.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_tracks_press_and_release() {
        let mut input = InputState::new();
        input.apply(InputEvent::KeyPressed(Key::W));
        assert!(input.held(Key::W));
        input.apply(InputEvent::KeyReleased(Key::W));
        assert!(!input.held(Key::W));
    }

    #[test]
    fn release_edge_lasts_one_frame() {
        let mut input = InputState::new();
        input.apply(InputEvent::KeyPressed(Key::Digit3));
        input.apply(InputEvent::KeyReleased(Key::Digit3));
        assert!(input.released(Key::Digit3));
        input.end_frame();
        assert!(!input.released(Key::Digit3));
    }

    #[test]
    fn button_release_edge_lasts_one_frame() {
        let mut input = InputState::new();
        input.apply(InputEvent::ButtonReleased(MouseButton::Left));
        assert!(input.button_released(MouseButton::Left));
        assert!(!input.button_released(MouseButton::Right));
        input.end_frame();
        assert!(!input.button_released(MouseButton::Left));
    }

    #[test]
    fn mouse_delta_accumulates_and_resets_on_take() {
        let mut input = InputState::new();
        input.apply(InputEvent::MouseMotion { dx: 2.0, dy: -1.0 });
        input.apply(InputEvent::MouseMotion { dx: 3.0, dy: 4.0 });
        assert_eq!(input.take_mouse_delta(), Vec2::new(5.0, 3.0));
        assert_eq!(input.take_mouse_delta(), Vec2::ZERO);
    }
}
