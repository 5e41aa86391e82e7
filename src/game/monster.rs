//! # Monster Module
//!
//! Autonomous wandering characters that deal contact damage. A monster
//! orbits drunkenly around its spawn anchor: every retarget interval it
//! picks a fresh point on a fixed-radius circle around the anchor and heads
//! toward it at constant speed.

use crate::config;
use crate::game::{
    Character, CharacterSprites, CollisionBlock, CollisionResponse, Facing, MapBounds, Vec2,
};
use crate::{BrambleError, BrambleResult};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Authored spawn record for one monster.
///
/// `texture` and `sprites` are required; a spawn without them cannot
/// produce a drawable monster and construction fails outright rather than
/// proceeding half-initialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonsterSpawn {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub size: Option<f32>,
    #[serde(default)]
    pub health: Option<i32>,
    /// Asset key of the sprite sheet image
    #[serde(default)]
    pub texture: Option<String>,
    #[serde(default)]
    pub sprites: Option<CharacterSprites>,
}

impl MonsterSpawn {
    /// A spawn record with the standard sheet layout and defaults filled.
    pub fn new(x: f32, y: f32, texture: &str) -> Self {
        Self {
            x,
            y,
            size: None,
            health: None,
            texture: Some(texture.to_string()),
            sprites: Some(CharacterSprites::standard()),
        }
    }
}

/// A wandering monster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Monster {
    pub character: Character,
    /// Spawn point the wander circle is centered on
    pub anchor: Vec2,
    pub health: i32,
    /// Accumulator gating wander retargets
    pub elapsed_movement: f32,
    /// Asset key of the sprite sheet image
    pub texture: String,
}

impl Monster {
    /// Builds a monster from its spawn record.
    ///
    /// Fails with [`BrambleError::InvalidData`] when the record names no
    /// texture or no sprite sheet.
    pub fn from_spawn(spawn: &MonsterSpawn) -> BrambleResult<Self> {
        let texture = spawn
            .texture
            .clone()
            .ok_or_else(|| BrambleError::InvalidData("monster spawn has no texture".to_string()))?;
        let sprites = spawn
            .sprites
            .ok_or_else(|| BrambleError::InvalidData("monster spawn has no sprites".to_string()))?;

        let position = Vec2::new(spawn.x, spawn.y);
        Ok(Self {
            character: Character::new(
                position,
                spawn.size.unwrap_or(config::MONSTER_SIZE),
                config::MONSTER_INVINCIBILITY_INTERVAL,
                sprites,
                CollisionResponse::Bounce,
            ),
            anchor: position,
            health: spawn.health.unwrap_or(config::MONSTER_HEALTH),
            elapsed_movement: 0.0,
            texture,
        })
    }

    /// Runs one frame: timers, wander retargeting, then the shared
    /// character integration. Map-edge contact is ignored for monsters.
    pub fn update(
        &mut self,
        dt: f32,
        blocks: &[CollisionBlock],
        bounds: MapBounds,
        rng: &mut impl Rng,
    ) {
        if dt <= 0.0 {
            return;
        }

        self.character.advance_timers(dt);
        self.set_wander_velocity(dt, rng);
        self.character.integrate(dt, blocks, bounds);
    }

    /// Decrements health and enters the invincibility window. A no-op
    /// while already invincible. Health may go non-positive; the game
    /// state despawns the monster at the end of the tick.
    pub fn receive_hit(&mut self) {
        if !self.character.invincibility.trigger() {
            return;
        }
        self.health -= 1;
    }

    /// Whether the monster currently ignores hits.
    pub fn is_invincible(&self) -> bool {
        self.character.is_invincible()
    }

    /// Retargets when the accumulator fires and picks the facing strip.
    ///
    /// The accumulator also fires at exactly zero, so a freshly spawned
    /// monster starts moving on its first update. Subtracting the interval
    /// carries overshoot like the animation timer does.
    fn set_wander_velocity(&mut self, dt: f32, rng: &mut impl Rng) {
        if self.elapsed_movement > config::WANDER_INTERVAL || self.elapsed_movement == 0.0 {
            self.elapsed_movement -= config::WANDER_INTERVAL;

            let angle = rng.gen_range(0.0..std::f32::consts::TAU);
            if let Some(velocity) = wander_velocity(self.character.position, self.anchor, angle) {
                self.character.velocity = velocity;
            }
        }

        // Monsters only have left/right strips worth showing; facing follows
        // the horizontal velocity sign.
        self.character.facing = if self.character.velocity.x > 0.0 {
            Facing::Right
        } else if self.character.velocity.x < 0.0 {
            Facing::Left
        } else {
            Facing::Down
        };

        self.elapsed_movement += dt;
    }
}

/// Velocity toward the point at `angle` on the wander circle around
/// `anchor`, with constant magnitude [`config::WANDER_RADIUS`].
///
/// Returns `None` when the body already sits exactly on the target point;
/// the caller skips this cycle's update instead of normalizing a
/// zero-length vector.
fn wander_velocity(position: Vec2, anchor: Vec2, angle: f32) -> Option<Vec2> {
    let target = Vec2::new(
        anchor.x + angle.cos() * config::WANDER_RADIUS,
        anchor.y + angle.sin() * config::WANDER_RADIUS,
    );

    let delta = target - position;
    let distance = delta.length();
    if distance == 0.0 {
        return None;
    }

    Some(delta * (config::WANDER_RADIUS / distance))
}
