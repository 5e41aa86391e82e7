//! # Sprite Module
//!
//! Sprite-atlas regions and the walk-cycle animation timer shared by every
//! animated entity.

use crate::config;
use crate::game::Facing;
use serde::{Deserialize, Serialize};

/// A rectangular region of a sprite atlas holding one animation strip.
///
/// `(x, y)` is the top-left of frame 0; the remaining frames are stacked
/// vertically below it, so frame `n` starts at `y + n * height`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpriteRegion {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Number of frames in the strip
    pub frame_count: usize,
}

impl SpriteRegion {
    /// Creates a region at `(x, y)` with the given cell size and frame count.
    pub fn new(x: f32, y: f32, size: f32, frame_count: usize) -> Self {
        Self {
            x,
            y,
            width: size,
            height: size,
            frame_count,
        }
    }
}

/// The four directional walk strips of a character sheet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CharacterSprites {
    pub walk_down: SpriteRegion,
    pub walk_up: SpriteRegion,
    pub walk_left: SpriteRegion,
    pub walk_right: SpriteRegion,
}

impl CharacterSprites {
    /// The standard character sheet layout: four 4-frame columns of
    /// tile-sized cells, ordered down, up, left, right.
    pub fn standard() -> Self {
        let size = config::TILE_SIZE;
        Self {
            walk_down: SpriteRegion::new(0.0, 0.0, size, 4),
            walk_up: SpriteRegion::new(size, 0.0, size, 4),
            walk_left: SpriteRegion::new(size * 2.0, 0.0, size, 4),
            walk_right: SpriteRegion::new(size * 3.0, 0.0, size, 4),
        }
    }

    /// The strip for a facing.
    pub fn region(&self, facing: Facing) -> &SpriteRegion {
        match facing {
            Facing::Down => &self.walk_down,
            Facing::Up => &self.walk_up,
            Facing::Left => &self.walk_left,
            Facing::Right => &self.walk_right,
        }
    }
}

/// Frame counter for a walk cycle.
///
/// Accumulated time past [`config::FRAME_DURATION`] advances the frame and
/// carries the overshoot into the next frame rather than resetting, so the
/// cycle keeps smooth timing under a variable frame rate.
///
/// # Examples
///
/// ```
/// use bramble::game::Animation;
///
/// let mut anim = Animation::new();
/// anim.advance(0.31, 4);
/// anim.advance(0.31, 4);
/// // 0.62s of accumulated time at 0.15s per frame: four advances, back to
/// // frame 0, with 0.02s carried over.
/// assert_eq!(anim.current_frame, 0);
/// assert!((anim.elapsed - 0.02).abs() < 1e-5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Animation {
    /// Index of the frame currently shown, always in `[0, frame_count)`
    pub current_frame: usize,
    /// Time accumulated toward the next frame advance
    pub elapsed: f32,
}

impl Animation {
    /// Creates an animation at frame 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulates `dt` seconds and advances the frame modulo `frame_count`
    /// for each elapsed frame duration.
    pub fn advance(&mut self, dt: f32, frame_count: usize) {
        self.elapsed += dt;

        while frame_count > 0 && self.elapsed > config::FRAME_DURATION {
            self.current_frame = (self.current_frame + 1) % frame_count;
            self.elapsed -= config::FRAME_DURATION;
        }
    }
}
