//! # World Module
//!
//! Static level data, the directional connectivity graph between levels,
//! and the world that tracks which level is active. The core never mutates
//! level data; it only selects which level's data currently drives the
//! simulation.

use crate::config;
use crate::game::{CollisionBlock, EdgeDirection, MapBounds, MonsterSpawn};
use crate::{BrambleError, BrambleResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One static tile layer: a name (binding it to a tileset) and a 2D grid
/// of 1-based tile indices, 0 meaning empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub name: String,
    pub tiles: Vec<Vec<u16>>,
}

/// Tileset binding for a layer: which image to cut tiles from and the tile
/// edge length inside that image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TilesetInfo {
    pub image: String,
    pub tile_size: u32,
}

/// Everything a level contributes: composited layers, collision grid, and
/// the monster roster spawned when the level becomes active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelData {
    pub name: String,
    /// Background layers, composited bottom-up in order
    pub layers: Vec<Layer>,
    /// Layers drawn after entities, for occlusion
    pub front_layers: Vec<Layer>,
    /// Layer name to tileset binding
    pub tilesets: HashMap<String, TilesetInfo>,
    /// Binary grid; cell value 1 marks a solid tile
    pub collisions: Vec<Vec<u8>>,
    pub monsters: Vec<MonsterSpawn>,
}

impl LevelData {
    /// Pixel extent of this level's map, from the collision grid shape.
    pub fn bounds(&self) -> MapBounds {
        let rows = self.collisions.len();
        let cols = self.collisions.first().map_or(0, |row| row.len());
        MapBounds::from_grid(cols, rows, config::TILE_SIZE)
    }

    /// Builds the collision-block set for this level.
    ///
    /// One tile-sized block per cell holding the value 1; every other value
    /// is passable.
    pub fn collision_blocks(&self) -> Vec<CollisionBlock> {
        let mut blocks = Vec::new();
        for (y, row) in self.collisions.iter().enumerate() {
            for (x, symbol) in row.iter().enumerate() {
                if *symbol == 1 {
                    blocks.push(CollisionBlock::new(
                        x as f32 * config::TILE_SIZE,
                        y as f32 * config::TILE_SIZE,
                        config::TILE_SIZE,
                    ));
                }
            }
        }
        blocks
    }
}

/// Directional connectivity between levels.
///
/// Edges are independent and directed: an A-right-to-B edge implies nothing
/// about B's left edge. Symmetry is an authoring convention, not an
/// invariant this type enforces.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelGraph {
    edges: HashMap<String, HashMap<EdgeDirection, String>>,
}

impl LevelGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a directed edge from `from` toward `to` across `direction`.
    pub fn connect(&mut self, from: &str, direction: EdgeDirection, to: &str) {
        self.edges
            .entry(from.to_string())
            .or_default()
            .insert(direction, to.to_string());
    }

    /// The level connected to `from` across `direction`, if any.
    pub fn neighbor(&self, from: &str, direction: EdgeDirection) -> Option<&str> {
        self.edges
            .get(from)
            .and_then(|connections| connections.get(&direction))
            .map(String::as_str)
    }

    /// Iterates every `(from, direction, to)` edge.
    pub fn iter(&self) -> impl Iterator<Item = (&str, EdgeDirection, &str)> {
        self.edges.iter().flat_map(|(from, connections)| {
            connections
                .iter()
                .map(move |(direction, to)| (from.as_str(), *direction, to.as_str()))
        })
    }
}

/// All levels by name, their connectivity, and the active level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct World {
    levels: HashMap<String, LevelData>,
    graph: LevelGraph,
    current: String,
}

impl World {
    /// Assembles a world and validates its configuration: the starting
    /// level must exist, and every graph edge must connect two levels that
    /// exist. A dangling edge is a data-authoring error surfaced here, not
    /// a runtime crash later.
    pub fn new(levels: Vec<LevelData>, graph: LevelGraph, start: &str) -> BrambleResult<Self> {
        let levels: HashMap<String, LevelData> = levels
            .into_iter()
            .map(|level| (level.name.clone(), level))
            .collect();

        if !levels.contains_key(start) {
            return Err(BrambleError::UnknownLevel(start.to_string()));
        }

        for (from, _, to) in graph.iter() {
            if !levels.contains_key(from) {
                return Err(BrambleError::UnknownLevel(from.to_string()));
            }
            if !levels.contains_key(to) {
                return Err(BrambleError::UnknownLevel(to.to_string()));
            }
        }

        Ok(Self {
            levels,
            graph,
            current: start.to_string(),
        })
    }

    /// Name of the active level.
    pub fn current_name(&self) -> &str {
        &self.current
    }

    /// Data of the active level.
    pub fn current_level(&self) -> &LevelData {
        // Validated at construction and on every change.
        &self.levels[&self.current]
    }

    /// The level connected to the active one across `direction`, if any.
    pub fn neighbor(&self, direction: EdgeDirection) -> Option<&str> {
        self.graph.neighbor(&self.current, direction)
    }

    /// Makes `name` the active level.
    pub fn set_current(&mut self, name: &str) -> BrambleResult<()> {
        if !self.levels.contains_key(name) {
            return Err(BrambleError::UnknownLevel(name.to_string()));
        }
        self.current = name.to_string();
        Ok(())
    }
}
