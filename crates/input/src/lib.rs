//! Keyboard input for the shooter.

use std::collections::HashSet;

/// Player intent for one tick, read from the keyboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Controls {
    pub left: bool,
    pub right: bool,
    /// Move toward the top of the screen.
    pub up: bool,
    pub down: bool,
    /// Edge-triggered: true only on the tick the key went down.
    pub fire: bool,
}

/// Manages keyboard state between frames.
#[derive(Debug, Default)]
pub struct InputState {
    /// Keys currently held down.
    keys_held: HashSet<KeyCode>,
    /// Keys pressed since the last `end_frame`.
    keys_pressed: HashSet<KeyCode>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear per-frame state. Call once the frame's update has consumed it.
    pub fn end_frame(&mut self) {
        self.keys_pressed.clear();
    }

    /// Process a keyboard event. Auto-repeat does not count as a new press.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if self.keys_held.insert(key) {
                    self.keys_pressed.insert(key);
                }
            }
            ElementState::Released => {
                self.keys_held.remove(&key);
            }
        }
    }

    /// Check if a key is currently held.
    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    /// Check if a key was pressed this frame.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    fn any_held(&self, keys: &[KeyCode]) -> bool {
        keys.iter().any(|&k| self.is_key_held(k))
    }

    /// Arrow keys or WASD steer, Space fires.
    pub fn controls(&self) -> Controls {
        Controls {
            left: self.any_held(&[KeyCode::ArrowLeft, KeyCode::KeyA]),
            right: self.any_held(&[KeyCode::ArrowRight, KeyCode::KeyD]),
            up: self.any_held(&[KeyCode::ArrowUp, KeyCode::KeyW]),
            down: self.any_held(&[KeyCode::ArrowDown, KeyCode::KeyS]),
            fire: self.is_key_pressed(KeyCode::Space),
        }
    }
}

// Re-export for convenience
pub use winit::event::ElementState;
pub use winit::keyboard::KeyCode;
