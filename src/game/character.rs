//! # Character Module
//!
//! The shared character body and its per-frame update: timers, axis-separated
//! collision resolution against static geometry, and map-boundary clamping.
//!
//! There is no entity class hierarchy. Player and monster both own a
//! [`Character`] and differ only in how velocity is produced and in the
//! [`CollisionResponse`] tag consulted when a block contact resolves.

use crate::config;
use crate::game::{Animation, CharacterSprites, EdgeDirection, Facing, SpriteRegion, Vec2};
use serde::{Deserialize, Serialize};

/// An immutable axis-aligned static obstacle in map pixel space.
///
/// Built in bulk from a level's collision grid and discarded wholesale when
/// the level changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionBlock {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl CollisionBlock {
    /// Creates a square block of the given edge length.
    pub fn new(x: f32, y: f32, size: f32) -> Self {
        Self {
            x,
            y,
            width: size,
            height: size,
        }
    }
}

/// Pixel extent of the active map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapBounds {
    pub width: f32,
    pub height: f32,
}

impl MapBounds {
    /// Creates bounds for a `cols` by `rows` grid of `tile_size` tiles.
    ///
    /// # Examples
    ///
    /// ```
    /// use bramble::game::MapBounds;
    ///
    /// let bounds = MapBounds::from_grid(50, 50, 16.0);
    /// assert_eq!(bounds.width, 800.0);
    /// assert_eq!(bounds.height, 800.0);
    /// ```
    pub fn from_grid(cols: usize, rows: usize, tile_size: f32) -> Self {
        Self {
            width: cols as f32 * tile_size,
            height: rows as f32 * tile_size,
        }
    }
}

/// What a body does with its velocity when a block contact resolves.
///
/// The positional snap-out is identical for every entity; the tag only
/// decides what happens to the velocity component on the colliding axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionResponse {
    /// Leave velocity untouched. The snap already halted motion, and the
    /// player's input handler re-zeroes velocity every frame anyway.
    Stop,
    /// Negate the velocity component on the colliding axis.
    Bounce,
}

/// Two-state damage timer: vulnerable, or invincible for a fixed interval.
///
/// Not re-entrant — triggering while already invincible is ignored and does
/// not extend the window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Invincibility {
    pub active: bool,
    pub elapsed: f32,
    pub interval: f32,
}

impl Invincibility {
    /// Creates a vulnerable timer with the given window length.
    pub fn new(interval: f32) -> Self {
        Self {
            active: false,
            elapsed: 0.0,
            interval,
        }
    }

    /// Starts the invincibility window. Returns `false` if the window was
    /// already running, in which case the trigger is ignored.
    pub fn trigger(&mut self) -> bool {
        if self.active {
            return false;
        }
        self.active = true;
        true
    }

    /// Accumulates time while active and clears the window once the
    /// interval has fully elapsed.
    pub fn advance(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        self.elapsed += dt;
        if self.elapsed >= self.interval {
            self.active = false;
            self.elapsed = 0.0;
        }
    }
}

/// Shared state and update algorithm of every moving entity.
///
/// Invariant: `center` is always `position` plus half the bounding box; it
/// is recomputed at the end of every movement step and never stored
/// independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    /// Top-left corner of the bounding box
    pub position: Vec2,
    /// Edge length of the square bounding box
    pub size: f32,
    pub velocity: Vec2,
    /// Derived: position plus half-extent
    pub center: Vec2,
    pub facing: Facing,
    /// Walking characters cycle 4 frames; idle characters hold frame 0
    pub walking: bool,
    pub animation: Animation,
    pub invincibility: Invincibility,
    pub sprites: CharacterSprites,
    pub response: CollisionResponse,
}

impl Character {
    /// Creates a character at rest.
    pub fn new(
        position: Vec2,
        size: f32,
        invincibility_interval: f32,
        sprites: CharacterSprites,
        response: CollisionResponse,
    ) -> Self {
        let half = size / 2.0;
        Self {
            position,
            size,
            velocity: Vec2::ZERO,
            center: position + Vec2::new(half, half),
            facing: Facing::Down,
            walking: true,
            animation: Animation::new(),
            invincibility: Invincibility::new(invincibility_interval),
            sprites,
            response,
        }
    }

    /// The atlas strip for the current facing.
    pub fn active_region(&self) -> &SpriteRegion {
        self.sprites.region(self.facing)
    }

    /// Frames in the active cycle: the full strip while walking, a single
    /// held frame while idle.
    pub fn frame_count(&self) -> usize {
        if self.walking {
            self.active_region().frame_count
        } else {
            1
        }
    }

    /// Whether the invincibility window is currently running.
    pub fn is_invincible(&self) -> bool {
        self.invincibility.active
    }

    /// Advances the invincibility and animation timers.
    pub fn advance_timers(&mut self, dt: f32) {
        self.invincibility.advance(dt);
        let frame_count = self.frame_count();
        self.animation.advance(dt, frame_count);
    }

    /// Integrates velocity and resolves collisions, one axis at a time.
    ///
    /// The x axis is fully integrated, block-resolved, and boundary-clamped
    /// before the y axis begins. This ordering avoids diagonal tunneling at
    /// the cost of a minor directional bias.
    ///
    /// Returns the map edge the body pressed past this frame, if any, with
    /// the horizontal axis reported first.
    pub fn integrate(
        &mut self,
        dt: f32,
        blocks: &[CollisionBlock],
        bounds: MapBounds,
    ) -> Option<EdgeDirection> {
        self.position.x += self.velocity.x * dt;
        self.resolve_horizontal(blocks);
        let horizontal = self.clamp_horizontal(bounds);

        self.position.y += self.velocity.y * dt;
        self.resolve_vertical(blocks);
        let vertical = self.clamp_vertical(bounds);

        let half = self.size / 2.0;
        self.center = self.position + Vec2::new(half, half);

        horizontal.or(vertical)
    }

    /// Re-derives `center` after an external reposition.
    pub fn refresh_center(&mut self) {
        let half = self.size / 2.0;
        self.center = self.position + Vec2::new(half, half);
    }

    /// Inclusive AABB overlap test; exact edge contact counts.
    fn overlaps(&self, block: &CollisionBlock) -> bool {
        self.position.x <= block.x + block.width
            && self.position.x + self.size >= block.x
            && self.position.y + self.size >= block.y
            && self.position.y <= block.y + block.height
    }

    /// Snaps out of the first block penetrated on the x axis.
    ///
    /// Single-contact resolution: the loop stops at the first block that
    /// registers, it does not solve against every overlapping block.
    fn resolve_horizontal(&mut self, blocks: &[CollisionBlock]) {
        for block in blocks {
            if !self.overlaps(block) {
                continue;
            }

            if self.velocity.x < 0.0 {
                self.position.x = block.x + block.width + config::EDGE_BUFFER;
            } else if self.velocity.x > 0.0 {
                self.position.x = block.x - self.size - config::EDGE_BUFFER;
            } else {
                continue;
            }

            if self.response == CollisionResponse::Bounce {
                self.velocity.x = -self.velocity.x;
            }
            break;
        }
    }

    /// Snaps out of the first block penetrated on the y axis.
    fn resolve_vertical(&mut self, blocks: &[CollisionBlock]) {
        for block in blocks {
            if !self.overlaps(block) {
                continue;
            }

            if self.velocity.y < 0.0 {
                self.position.y = block.y + block.height + config::EDGE_BUFFER;
            } else if self.velocity.y > 0.0 {
                self.position.y = block.y - self.size - config::EDGE_BUFFER;
            } else {
                continue;
            }

            if self.response == CollisionResponse::Bounce {
                self.velocity.y = -self.velocity.y;
            }
            break;
        }
    }

    /// Keeps the body inside the left/right map edges, zeroing horizontal
    /// velocity on contact. Runs after block resolution.
    fn clamp_horizontal(&mut self, bounds: MapBounds) -> Option<EdgeDirection> {
        if self.position.x <= 0.0 {
            self.position.x = config::EDGE_BUFFER;
            self.velocity.x = 0.0;
            return Some(EdgeDirection::Left);
        }
        if self.position.x + self.size >= bounds.width {
            self.position.x = bounds.width - self.size - config::EDGE_BUFFER;
            self.velocity.x = 0.0;
            return Some(EdgeDirection::Right);
        }
        None
    }

    /// Keeps the body inside the top/bottom map edges.
    fn clamp_vertical(&mut self, bounds: MapBounds) -> Option<EdgeDirection> {
        if self.position.y <= 0.0 {
            self.position.y = config::EDGE_BUFFER;
            self.velocity.y = 0.0;
            return Some(EdgeDirection::Up);
        }
        if self.position.y + self.size >= bounds.height {
            self.position.y = bounds.height - self.size - config::EDGE_BUFFER;
            self.velocity.y = 0.0;
            return Some(EdgeDirection::Down);
        }
        None
    }
}

/// Inclusive AABB overlap between two character bounding boxes.
pub fn characters_overlap(a: &Character, b: &Character) -> bool {
    a.position.x + a.size >= b.position.x
        && a.position.x <= b.position.x + b.size
        && a.position.y + a.size >= b.position.y
        && a.position.y <= b.position.y + b.size
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EDGE_BUFFER;

    fn test_character(x: f32, y: f32) -> Character {
        Character::new(
            Vec2::new(x, y),
            15.0,
            0.8,
            CharacterSprites::standard(),
            CollisionResponse::Stop,
        )
    }

    fn bounds() -> MapBounds {
        MapBounds::from_grid(50, 50, 16.0)
    }

    #[test]
    fn test_horizontal_block_resolution() {
        let blocks = vec![CollisionBlock::new(16.0, 16.0, 16.0)];
        let mut character = test_character(2.0, 20.0);
        character.velocity = Vec2::new(150.0, 0.0);

        character.integrate(0.1, &blocks, bounds());

        // Moving right: flush against the block's left edge.
        assert!((character.position.x - (16.0 - 15.0 - EDGE_BUFFER)).abs() < 1e-5);
        assert_eq!(character.position.y, 20.0);
        // Stop response leaves velocity untouched.
        assert_eq!(character.velocity.x, 150.0);
    }

    #[test]
    fn test_axis_separated_diagonal_resolution() {
        // Diagonal motion into a block resolves horizontally first, then
        // vertically, not as a combined solve.
        let blocks = vec![CollisionBlock::new(16.0, 16.0, 16.0)];
        let mut character = test_character(2.0, 2.0);
        character.velocity = Vec2::new(150.0, 150.0);

        character.integrate(0.1, &blocks, bounds());

        // x moved into the block's row and snapped back out...
        assert!((character.position.x - (16.0 - 15.0 - EDGE_BUFFER)).abs() < 1e-5);
        // ...after which the body no longer overlaps horizontally, so y
        // integrates freely.
        assert!((character.position.y - 17.0).abs() < 1e-4);
    }

    #[test]
    fn test_resolution_converges_across_frames() {
        // Pushing into the same block for several frames re-resolves to the
        // same clamped position, it never oscillates.
        let blocks = vec![CollisionBlock::new(16.0, 16.0, 16.0)];
        let mut character = test_character(2.0, 20.0);
        character.velocity = Vec2::new(150.0, 0.0);

        character.integrate(0.1, &blocks, bounds());
        let first = character.position;

        for _ in 0..3 {
            character.velocity = Vec2::new(150.0, 0.0);
            character.integrate(0.1, &blocks, bounds());
            assert!((character.position.x - first.x).abs() < 1e-5);
            assert_eq!(character.position.y, first.y);
        }
    }

    #[test]
    fn test_only_first_block_resolves() {
        // Two blocks side by side: resolution snaps against the first in
        // iteration order and stops.
        let blocks = vec![
            CollisionBlock::new(32.0, 16.0, 16.0),
            CollisionBlock::new(48.0, 16.0, 16.0),
        ];
        let mut character = test_character(20.0, 20.0);
        character.velocity = Vec2::new(150.0, 0.0);

        character.integrate(0.1, &blocks, bounds());

        assert!((character.position.x - (32.0 - 15.0 - EDGE_BUFFER)).abs() < 1e-5);
    }

    #[test]
    fn test_bounce_response_negates_velocity() {
        let blocks = vec![CollisionBlock::new(16.0, 16.0, 16.0)];
        let mut character = test_character(2.0, 20.0);
        character.response = CollisionResponse::Bounce;
        character.velocity = Vec2::new(20.0, 0.0);

        character.integrate(0.5, &blocks, bounds());

        assert_eq!(character.velocity.x, -20.0);
    }

    #[test]
    fn test_boundary_clamp_left() {
        let mut character = test_character(5.0, 100.0);
        character.velocity = Vec2::new(-150.0, 0.0);

        let edge = character.integrate(0.1, &[], bounds());

        assert_eq!(edge, Some(EdgeDirection::Left));
        assert_eq!(character.position.x, EDGE_BUFFER);
        assert_eq!(character.velocity.x, 0.0);
    }

    #[test]
    fn test_boundary_clamp_bottom() {
        let map = bounds();
        let mut character = test_character(100.0, map.height - 20.0);
        character.velocity = Vec2::new(0.0, 150.0);

        let edge = character.integrate(0.1, &[], map);

        assert_eq!(edge, Some(EdgeDirection::Down));
        assert!((character.position.y - (map.height - 15.0 - EDGE_BUFFER)).abs() < 1e-4);
        assert_eq!(character.velocity.y, 0.0);
    }

    #[test]
    fn test_center_tracks_position() {
        let mut character = test_character(10.0, 10.0);
        character.velocity = Vec2::new(30.0, 0.0);
        character.integrate(0.5, &[], bounds());

        assert_eq!(character.center.x, character.position.x + 7.5);
        assert_eq!(character.center.y, character.position.y + 7.5);
    }

    #[test]
    fn test_invincibility_window() {
        let mut invincibility = Invincibility::new(0.8);
        assert!(invincibility.trigger());
        invincibility.advance(0.79);
        // Still inside the window: a second hit is ignored.
        assert!(!invincibility.trigger());
        invincibility.advance(0.02);
        // 0.81s total: the window has closed and a new hit registers.
        assert!(invincibility.trigger());
    }

    #[test]
    fn test_invincibility_does_not_accumulate_while_vulnerable() {
        let mut invincibility = Invincibility::new(0.3);
        invincibility.advance(10.0);
        assert!(!invincibility.active);
        assert_eq!(invincibility.elapsed, 0.0);
    }

    #[test]
    fn test_characters_overlap_inclusive_edges() {
        let a = test_character(0.0, 0.0);
        // Exactly edge-to-edge contact counts as overlap.
        let b = test_character(15.0, 0.0);
        assert!(characters_overlap(&a, &b));

        let c = test_character(15.1, 0.0);
        assert!(!characters_overlap(&a, &c));
    }

    #[test]
    fn test_stationary_overlap_is_not_resolved() {
        // A body resting inside a block with zero velocity is left alone;
        // resolution only acts against the direction of motion.
        let blocks = vec![CollisionBlock::new(0.0, 0.0, 16.0)];
        let mut character = test_character(8.0, 8.0);

        character.integrate(0.1, &blocks, bounds());

        assert_eq!(character.position, Vec2::new(8.0, 8.0));
    }
}
