//! # Hearts Module
//!
//! The player's health rendered as a row of heart indicators. Hearts are
//! not simulated; the combat bookkeeping in the game state empties them one
//! at a time as the player takes contact damage.

use serde::{Deserialize, Serialize};

/// Atlas frame shown for a filled heart.
pub const HEART_FILLED_FRAME: usize = 0;

/// Atlas frame shown for an empty heart.
pub const HEART_EMPTY_FRAME: usize = 4;

/// Horizontal spacing between hearts in the HUD row.
const HEART_SPACING: f32 = 22.0;

/// One heart indicator: a HUD position plus the atlas frame to draw.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Heart {
    pub x: f32,
    pub y: f32,
    pub current_frame: usize,
}

impl Heart {
    /// Creates a filled heart at the given HUD position.
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            current_frame: HEART_FILLED_FRAME,
        }
    }

    /// Whether the heart still shows as filled.
    pub fn is_filled(&self) -> bool {
        self.current_frame == HEART_FILLED_FRAME
    }
}

/// The HUD row of hearts and its damage bookkeeping.
///
/// # Examples
///
/// ```
/// use bramble::game::HeartRow;
///
/// let mut hearts = HeartRow::new(3, 10.0, 10.0);
/// assert_eq!(hearts.filled_count(), 3);
/// assert!(hearts.empty_one());
/// assert_eq!(hearts.filled_count(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeartRow {
    hearts: Vec<Heart>,
}

impl HeartRow {
    /// Creates `count` filled hearts laid out left to right from `(x, y)`.
    pub fn new(count: usize, x: f32, y: f32) -> Self {
        let hearts = (0..count)
            .map(|i| Heart::new(x + i as f32 * HEART_SPACING, y))
            .collect();
        Self { hearts }
    }

    /// The hearts, for drawing.
    pub fn hearts(&self) -> &[Heart] {
        &self.hearts
    }

    /// Number of hearts still filled.
    pub fn filled_count(&self) -> usize {
        self.hearts.iter().filter(|heart| heart.is_filled()).count()
    }

    /// Empties the filled heart with the highest index. Returns `false`
    /// when no filled heart was left to empty.
    pub fn empty_one(&mut self) -> bool {
        if let Some(heart) = self.hearts.iter_mut().rev().find(|heart| heart.is_filled()) {
            heart.current_frame = HEART_EMPTY_FRAME;
            true
        } else {
            false
        }
    }

    /// Whether the row is down to its last filled heart (or none), the
    /// condition a landing hit turns into a game over.
    pub fn on_last_heart(&self) -> bool {
        self.filled_count() <= 1
    }
}
