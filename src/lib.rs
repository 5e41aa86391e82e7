//! # Bramble
//!
//! A 2D top-down tile adventure: a player character explores scrolling maps,
//! collides with static geometry, is hunted by wandering monsters, loses hit
//! points represented as hearts, and walks off map edges into neighboring
//! levels.
//!
//! ## Architecture Overview
//!
//! The crate is split along the seams of the frame loop:
//!
//! - **Game Core**: frame-timed simulation — movement, animation and
//!   invincibility timers, axis-separated collision resolution, monster
//!   wandering, contact damage, and the level-transition state machine
//! - **Input**: a queryable snapshot of the held directional keys, sampled
//!   once per frame
//! - **Rendering**: one-shot static-layer compositing plus per-frame draw
//!   calls behind a scale-and-scroll camera
//! - **Levels**: static authored map data and the directional connectivity
//!   table between levels
//!
//! All simulation state mutates synchronously inside
//! [`GameState::tick`](game::GameState::tick); the only yield point is
//! between frames.

pub mod game;
pub mod input;
pub mod levels;
pub mod rendering;

// Core module re-exports
pub use game::*;
pub use input::*;
pub use rendering::*;

/// Core error type for the Bramble game engine.
#[derive(thiserror::Error, Debug)]
pub enum BrambleError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Image decoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Game state is invalid
    #[error("Invalid game state: {0}")]
    InvalidState(String),

    /// Required construction data is missing or malformed
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A level edge or lookup names a level that does not exist
    #[error("Unknown level: {0}")]
    UnknownLevel(String),
}

/// Result type used throughout the Bramble codebase.
pub type BrambleResult<T> = Result<T, BrambleError>;

/// Version information for the game.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Game configuration constants.
pub mod config {
    /// Edge length of one map tile in world units
    pub const TILE_SIZE: f32 = 16.0;

    /// Buffer applied when snapping out of a collision, so floating-point
    /// residue cannot re-trigger the same contact next frame
    pub const EDGE_BUFFER: f32 = 0.0001;

    /// Seconds each animation frame stays on screen
    pub const FRAME_DURATION: f32 = 0.15;

    /// Player speed on each axis, world units per second
    pub const PLAYER_SPEED: f32 = 150.0;

    /// Player bounding-box edge length
    pub const PLAYER_SIZE: f32 = 15.0;

    /// Seconds the player ignores further hits after taking one
    pub const PLAYER_INVINCIBILITY_INTERVAL: f32 = 0.8;

    /// Default monster bounding-box edge length
    pub const MONSTER_SIZE: f32 = 15.0;

    /// Seconds a monster ignores further hits after taking one
    pub const MONSTER_INVINCIBILITY_INTERVAL: f32 = 0.3;

    /// Default monster starting health
    pub const MONSTER_HEALTH: i32 = 3;

    /// Radius of the circle around its anchor a monster wanders on; also
    /// its speed in world units per second
    pub const WANDER_RADIUS: f32 = 20.0;

    /// Seconds between wander retargets
    pub const WANDER_INTERVAL: f32 = 1.0;

    /// Number of hearts in the player's health row
    pub const HEART_COUNT: usize = 3;

    /// Frame deltas above this are treated as a host suspension and
    /// discarded, so a resumed process never integrates one huge step
    pub const PAUSE_RESET_THRESHOLD: f64 = 1.0;

    /// Uniform scale applied to the world before drawing
    pub const MAP_SCALE: f32 = 2.5;

    /// Window width in pixels
    pub const WINDOW_WIDTH: i32 = 1024;

    /// Window height in pixels
    pub const WINDOW_HEIGHT: i32 = 576;
}
