//! Input state tracking

use std::collections::HashSet;
use tracing::trace;
use winit::event::{ElementState, KeyEvent, MouseButton};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Tracks the current state of input devices
#[derive(Debug, Clone)]
pub struct InputState {
    /// Currently pressed keys
    pub keys_pressed: HashSet<KeyCode>,
    /// Mouse position in window coordinates
    pub mouse_position: (f32, f32),
    /// Mouse movement delta since last frame
    pub mouse_delta: (f32, f32),
    /// Currently pressed mouse buttons
    pub mouse_buttons_pressed: HashSet<MouseButton>,
}

impl InputState {
    /// Create a new empty input state
    pub fn new() -> Self {
        Self {
            keys_pressed: HashSet::new(),
            mouse_position: (0.0, 0.0),
            mouse_delta: (0.0, 0.0),
            mouse_buttons_pressed: HashSet::new(),
        }
    }

    /// Clear per-frame data (like mouse delta)
    pub fn clear_frame_data(&mut self) {
        self.mouse_delta = (0.0, 0.0);
    }

    /// Handle a keyboard event
    pub fn handle_keyboard_event(&mut self, event: &KeyEvent) {
        if let PhysicalKey::Code(key_code) = event.physical_key {
            match event.state {
                ElementState::Pressed => {
                    self.keys_pressed.insert(key_code);
                    trace!("Key pressed: {:?}", key_code);
                }
                ElementState::Released => {
                    self.keys_pressed.remove(&key_code);
                    trace!("Key released: {:?}", key_code);
                }
            }
        }
    }

    /// Update mouse position
    pub fn set_mouse_position(&mut self, x: f32, y: f32) {
        self.mouse_position = (x, y);
    }

    /// Add mouse movement delta
    pub fn add_mouse_delta(&mut self, dx: f32, dy: f32) {
        self.mouse_delta.0 += dx;
        self.mouse_delta.1 += dy;
        trace!("Mouse delta: ({}, {})", dx, dy);
    }

    /// Handle a mouse button event
    pub fn handle_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        match state {
            ElementState::Pressed => {
                self.mouse_buttons_pressed.insert(button);
                trace!("Mouse button pressed: {:?}", button);
            }
            ElementState::Released => {
                self.mouse_buttons_pressed.remove(&button);
                trace!("Mouse button released: {:?}", button);
            }
        }
    }

    /// Check if a key is currently pressed
    pub fn is_key_pressed(&self, key_code: KeyCode) -> bool {
        self.keys_pressed.contains(&key_code)
    }

    /// Check if a mouse button is currently pressed
    pub fn is_mouse_button_pressed(&self, button: MouseButton) -> bool {
        self.mouse_buttons_pressed.contains(&button)
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mouse_button_tracking() {
        let mut input = InputState::new();
        input.handle_mouse_button(MouseButton::Left, ElementState::Pressed);
        assert!(input.is_mouse_button_pressed(MouseButton::Left));

        input.handle_mouse_button(MouseButton::Left, ElementState::Released);
        assert!(!input.is_mouse_button_pressed(MouseButton::Left));
    }

    #[test]
    fn test_clear_frame_data_resets_delta() {
        let mut input = InputState::new();
        input.add_mouse_delta(3.0, -2.0);
        assert_eq!(input.mouse_delta, (3.0, -2.0));

        input.clear_frame_data();
        assert_eq!(input.mouse_delta, (0.0, 0.0));
        // Position is not per-frame data
        input.set_mouse_position(10.0, 20.0);
        input.clear_frame_data();
        assert_eq!(input.mouse_position, (10.0, 20.0));
    }
}
