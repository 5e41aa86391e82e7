//! # Input Module
//!
//! The directional key snapshot consumed by the simulation. The host
//! delivers key events asynchronously; the frame loop samples them into a
//! [`KeyState`] exactly once per step, so a whole tick sees one consistent
//! view of the keyboard.

use macroquad::prelude::{is_key_down, KeyCode};
use serde::{Deserialize, Serialize};

/// Snapshot of the currently-held directional keys.
///
/// # Examples
///
/// ```
/// use bramble::input::KeyState;
///
/// let keys = KeyState::default();
/// assert!(keys.is_idle());
///
/// let keys = KeyState {
///     right: true,
///     ..Default::default()
/// };
/// assert!(!keys.is_idle());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeyState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl KeyState {
    /// Whether no directional key is held.
    pub fn is_idle(&self) -> bool {
        !(self.up || self.down || self.left || self.right)
    }

    /// Samples the held keys from macroquad. WASD and the arrow keys are
    /// equivalent.
    pub fn sample() -> Self {
        Self {
            up: is_key_down(KeyCode::W) || is_key_down(KeyCode::Up),
            down: is_key_down(KeyCode::S) || is_key_down(KeyCode::Down),
            left: is_key_down(KeyCode::A) || is_key_down(KeyCode::Left),
            right: is_key_down(KeyCode::D) || is_key_down(KeyCode::Right),
        }
    }
}
