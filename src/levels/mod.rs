//! # Levels Module
//!
//! The authored map data: tile layers, collision grids, monster spawns,
//! and the directional connectivity between levels. Purely static — the
//! simulation selects which level's data is active but never mutates it.

use crate::game::{EdgeDirection, Layer, LevelData, LevelGraph, MonsterSpawn, TilesetInfo, Vec2};
use crate::{BrambleResult, World};
use std::collections::HashMap;

/// Map width of every built-in level, in tiles.
const COLS: usize = 50;

/// Map height of every built-in level, in tiles.
const ROWS: usize = 50;

/// Where the player first appears in the starting level.
pub const PLAYER_START: Vec2 = Vec2 { x: 100.0, y: 400.0 };

/// Assembles the built-in world: two connected levels, validated.
pub fn builtin_world() -> BrambleResult<World> {
    let mut graph = LevelGraph::new();
    graph.connect("meadow", EdgeDirection::Right, "orchard");
    graph.connect("orchard", EdgeDirection::Left, "meadow");

    World::new(vec![meadow(), orchard()], graph, "meadow")
}

/// The starting level: open grassland with a pond and a few tree stands.
fn meadow() -> LevelData {
    let mut collisions = grid(0u8);
    // Pond
    fill(&mut collisions, 10, 8, 6, 4, 1);
    // Tree stands
    fill(&mut collisions, 24, 20, 3, 3, 1);
    fill(&mut collisions, 36, 30, 4, 2, 1);
    fill(&mut collisions, 8, 38, 2, 5, 1);

    let mut trees = grid(0u16);
    fill(&mut trees, 24, 20, 3, 3, 5);
    fill(&mut trees, 36, 30, 4, 2, 5);
    fill(&mut trees, 8, 38, 2, 5, 5);

    let mut front = grid(0u16);
    // Canopies hang one row above their trunks and draw over entities.
    fill(&mut front, 24, 19, 3, 1, 21);
    fill(&mut front, 36, 29, 4, 1, 21);
    fill(&mut front, 8, 37, 2, 1, 21);

    LevelData {
        name: "meadow".to_string(),
        layers: vec![
            Layer {
                name: "terrain".to_string(),
                tiles: grid(1u16),
            },
            Layer {
                name: "trees".to_string(),
                tiles: trees,
            },
        ],
        front_layers: vec![Layer {
            name: "front".to_string(),
            tiles: front,
        }],
        tilesets: standard_tilesets(),
        collisions,
        monsters: vec![MonsterSpawn::new(380.0, 480.0, "images/owl.png")],
    }
}

/// The second level: planted tree rows with wider monster coverage.
fn orchard() -> LevelData {
    let mut collisions = grid(0u8);
    for row in [10, 20, 30, 40] {
        fill(&mut collisions, 6, row, 14, 1, 1);
        fill(&mut collisions, 28, row, 14, 1, 1);
    }

    let mut trees = grid(0u16);
    for row in [10, 20, 30, 40] {
        fill(&mut trees, 6, row, 14, 1, 6);
        fill(&mut trees, 28, row, 14, 1, 6);
    }

    let mut front = grid(0u16);
    for row in [9, 19, 29, 39] {
        fill(&mut front, 6, row, 14, 1, 22);
        fill(&mut front, 28, row, 14, 1, 22);
    }

    LevelData {
        name: "orchard".to_string(),
        layers: vec![
            Layer {
                name: "terrain".to_string(),
                tiles: grid(2u16),
            },
            Layer {
                name: "trees".to_string(),
                tiles: trees,
            },
        ],
        front_layers: vec![Layer {
            name: "front".to_string(),
            tiles: front,
        }],
        tilesets: standard_tilesets(),
        collisions,
        monsters: vec![
            MonsterSpawn::new(200.0, 250.0, "images/owl.png"),
            MonsterSpawn::new(550.0, 600.0, "images/owl.png"),
        ],
    }
}

/// The tileset bindings every built-in level shares.
fn standard_tilesets() -> HashMap<String, TilesetInfo> {
    let mut tilesets = HashMap::new();
    tilesets.insert(
        "terrain".to_string(),
        TilesetInfo {
            image: "images/terrain.png".to_string(),
            tile_size: 16,
        },
    );
    tilesets.insert(
        "trees".to_string(),
        TilesetInfo {
            image: "images/decorations.png".to_string(),
            tile_size: 16,
        },
    );
    tilesets.insert(
        "front".to_string(),
        TilesetInfo {
            image: "images/decorations.png".to_string(),
            tile_size: 16,
        },
    );
    tilesets
}

/// A map-sized grid filled with one symbol.
fn grid<T: Copy>(symbol: T) -> Vec<Vec<T>> {
    vec![vec![symbol; COLS]; ROWS]
}

/// Fills a `width` by `height` rectangle of cells starting at `(x, y)`.
fn fill<T: Copy>(grid: &mut [Vec<T>], x: usize, y: usize, width: usize, height: usize, symbol: T) {
    for row in grid.iter_mut().skip(y).take(height) {
        for cell in row.iter_mut().skip(x).take(width) {
            *cell = symbol;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_world_validates() {
        let world = builtin_world().unwrap();
        assert_eq!(world.current_name(), "meadow");
        assert_eq!(world.neighbor(EdgeDirection::Right), Some("orchard"));
        assert_eq!(world.neighbor(EdgeDirection::Up), None);
    }

    #[test]
    fn test_levels_have_collision_geometry() {
        for level in [meadow(), orchard()] {
            assert!(!level.collision_blocks().is_empty());
            assert_eq!(level.bounds().width, 800.0);
            assert_eq!(level.bounds().height, 800.0);
        }
    }

    #[test]
    fn test_player_start_is_clear_of_geometry() {
        let level = meadow();
        let blocks = level.collision_blocks();
        for block in blocks {
            let clear_x = PLAYER_START.x + 15.0 < block.x || PLAYER_START.x > block.x + block.width;
            let clear_y =
                PLAYER_START.y + 15.0 < block.y || PLAYER_START.y > block.y + block.height;
            assert!(clear_x || clear_y);
        }
    }

    #[test]
    fn test_monster_spawns_are_complete() {
        for level in [meadow(), orchard()] {
            for spawn in &level.monsters {
                assert!(spawn.texture.is_some());
                assert!(spawn.sprites.is_some());
            }
        }
    }

    #[test]
    fn test_every_layer_has_a_tileset() {
        for level in [meadow(), orchard()] {
            for layer in level.layers.iter().chain(level.front_layers.iter()) {
                assert!(level.tilesets.contains_key(&layer.name));
            }
        }
    }
}
