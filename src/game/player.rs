//! # Player Module
//!
//! The input-driven character: velocity from the key snapshot, plus
//! map-edge exit detection that feeds the level-transition machine.

use crate::config;
use crate::game::{
    Character, CharacterSprites, CollisionBlock, CollisionResponse, EdgeDirection, Facing,
    MapBounds, Vec2,
};
use crate::input::KeyState;
use serde::{Deserialize, Serialize};

/// The player character.
///
/// Health is not stored here — it is externalized as the heart row owned by
/// the game state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub character: Character,
}

impl Player {
    /// Creates the player at the given position.
    ///
    /// # Examples
    ///
    /// ```
    /// use bramble::game::{Player, Vec2};
    ///
    /// let player = Player::new(Vec2::new(100.0, 400.0));
    /// assert!(!player.is_invincible());
    /// assert_eq!(player.character.size, 15.0);
    /// ```
    pub fn new(position: Vec2) -> Self {
        Self {
            character: Character::new(
                position,
                config::PLAYER_SIZE,
                config::PLAYER_INVINCIBILITY_INTERVAL,
                CharacterSprites::standard(),
                CollisionResponse::Stop,
            ),
        }
    }

    /// Applies the key snapshot to velocity and facing.
    ///
    /// Both components are zeroed first, then at most one direction wins,
    /// in priority order right, left, up, down. With no key held the walk
    /// cycle collapses to its idle frame.
    pub fn handle_input(&mut self, keys: &KeyState) {
        self.character.velocity = Vec2::ZERO;
        self.character.walking = true;

        if keys.right {
            self.character.facing = Facing::Right;
            self.character.velocity.x = config::PLAYER_SPEED;
        } else if keys.left {
            self.character.facing = Facing::Left;
            self.character.velocity.x = -config::PLAYER_SPEED;
        } else if keys.up {
            self.character.facing = Facing::Up;
            self.character.velocity.y = -config::PLAYER_SPEED;
        } else if keys.down {
            self.character.facing = Facing::Down;
            self.character.velocity.y = config::PLAYER_SPEED;
        } else {
            self.character.walking = false;
        }
    }

    /// Runs one frame of the shared character algorithm.
    ///
    /// Returns the map edge crossed this frame — `None` when the player
    /// stayed inside the map. The return value drives level transitions.
    pub fn update(
        &mut self,
        dt: f32,
        blocks: &[CollisionBlock],
        bounds: MapBounds,
    ) -> Option<EdgeDirection> {
        if dt <= 0.0 {
            return None;
        }

        self.character.advance_timers(dt);
        self.character.integrate(dt, blocks, bounds)
    }

    /// Enters the invincibility window. A no-op while already invincible.
    pub fn receive_hit(&mut self) {
        self.character.invincibility.trigger();
    }

    /// Whether the player currently ignores hits.
    pub fn is_invincible(&self) -> bool {
        self.character.is_invincible()
    }
}
