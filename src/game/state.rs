//! # Game State Module
//!
//! Central coordination of the simulation: the per-frame tick that moves
//! the player and monsters, resolves contact damage into the heart row,
//! and drives the level-transition state machine when the player walks off
//! a connected map edge.

use crate::config;
use crate::game::{
    characters_overlap, CollisionBlock, EdgeDirection, HeartRow, MapBounds, Monster, Player, Vec2,
    World,
};
use crate::input::KeyState;
use crate::BrambleResult;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Terminal-state tracking for the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompletionState {
    /// The run is in progress
    Playing,
    /// The player lost their last heart
    GameOver,
}

/// Events raised by one tick, for consumers to react to: the renderer
/// recomposites on `LevelChanged`, a frontend may end the session on
/// `GameOver`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// The active level was swapped
    LevelChanged {
        from: String,
        to: String,
        direction: EdgeDirection,
    },
    /// A monster contact got through and emptied a heart
    PlayerHit { hearts_remaining: usize },
    /// A monster's health ran out and it was removed from the roster
    MonsterDied { position: Vec2 },
    /// The player lost their last heart. Raised exactly once per run.
    GameOver,
}

/// Central game state: the world, the entities simulated against the
/// active level, and the per-frame tick.
///
/// The active level's collision blocks and monster roster live here, not in
/// the level data — they are rebuilt wholesale whenever a level becomes
/// active, so stale geometry from a previous level can never leak into the
/// current one.
#[derive(Debug)]
pub struct GameState {
    pub world: World,
    pub player: Player,
    pub hearts: HeartRow,
    pub monsters: Vec<Monster>,
    pub blocks: Vec<CollisionBlock>,
    pub bounds: MapBounds,
    pub completion: CompletionState,
    rng: StdRng,
}

impl GameState {
    /// Creates the game state for `world` with the player at
    /// `player_start`, activating the world's starting level.
    pub fn new(world: World, player_start: Vec2, seed: u64) -> BrambleResult<Self> {
        let mut state = Self {
            world,
            player: Player::new(player_start),
            hearts: HeartRow::new(config::HEART_COUNT, 10.0, 10.0),
            monsters: Vec::new(),
            blocks: Vec::new(),
            bounds: MapBounds {
                width: 0.0,
                height: 0.0,
            },
            completion: CompletionState::Playing,
            rng: StdRng::seed_from_u64(seed),
        };
        state.activate_current_level()?;
        Ok(state)
    }

    /// Runs one simulation step.
    ///
    /// Order within the step: player input and movement, monster movement,
    /// contact damage, monster despawns, then at most one level transition.
    /// Everything happens synchronously inside this call; a consumer never
    /// observes a half-swapped level.
    pub fn tick(&mut self, dt: f32, keys: &KeyState) -> BrambleResult<Vec<GameEvent>> {
        let mut events = Vec::new();

        if dt <= 0.0 {
            return Ok(events);
        }

        self.player.handle_input(keys);
        let edge_exit = self.player.update(dt, &self.blocks, self.bounds);

        for monster in self.monsters.iter_mut().rev() {
            monster.update(dt, &self.blocks, self.bounds, &mut self.rng);
        }

        self.resolve_contacts(&mut events);
        self.despawn_dead_monsters(&mut events);

        if let Some(direction) = edge_exit {
            self.try_transition(direction, &mut events)?;
        }

        Ok(events)
    }

    /// Tests every monster against the player and books damage into the
    /// heart row.
    fn resolve_contacts(&mut self, events: &mut Vec<GameEvent>) {
        for monster in self.monsters.iter().rev() {
            if self.player.is_invincible() {
                break;
            }
            if !characters_overlap(&self.player.character, &monster.character) {
                continue;
            }

            self.player.receive_hit();

            // The game ends when a hit lands with one heart or none left
            // to lose; checked before the heart is emptied.
            let on_last_heart = self.hearts.on_last_heart();
            self.hearts.empty_one();

            events.push(GameEvent::PlayerHit {
                hearts_remaining: self.hearts.filled_count(),
            });
            debug!(
                "player hit, {} heart(s) remaining",
                self.hearts.filled_count()
            );

            if on_last_heart && self.completion == CompletionState::Playing {
                self.completion = CompletionState::GameOver;
                events.push(GameEvent::GameOver);
                info!("game over");
            }
        }
    }

    /// Removes monsters whose health ran out.
    fn despawn_dead_monsters(&mut self, events: &mut Vec<GameEvent>) {
        self.monsters.retain(|monster| {
            if monster.health > 0 {
                return true;
            }
            events.push(GameEvent::MonsterDied {
                position: monster.character.position,
            });
            debug!("monster despawned at {:?}", monster.character.position);
            false
        });
    }

    /// Swaps the active level if the crossed edge is connected.
    ///
    /// An unconnected edge is the defined "no transition" outcome: the
    /// boundary clamp has already pinned the player at the map edge.
    fn try_transition(
        &mut self,
        direction: EdgeDirection,
        events: &mut Vec<GameEvent>,
    ) -> BrambleResult<()> {
        let Some(next) = self.world.neighbor(direction) else {
            return Ok(());
        };
        let from = self.world.current_name().to_string();
        let to = next.to_string();

        self.world.set_current(&to)?;
        self.activate_current_level()?;

        // Arrive at the opposite edge of the new map, on the same axis the
        // player left on.
        let size = self.player.character.size;
        match direction {
            EdgeDirection::Right => self.player.character.position.x = config::EDGE_BUFFER,
            EdgeDirection::Left => {
                self.player.character.position.x = self.bounds.width - size - config::EDGE_BUFFER;
            }
            EdgeDirection::Down => self.player.character.position.y = config::EDGE_BUFFER,
            EdgeDirection::Up => {
                self.player.character.position.y = self.bounds.height - size - config::EDGE_BUFFER;
            }
        }
        self.player.character.refresh_center();

        info!("level transition: {} -> {}", from, to);
        events.push(GameEvent::LevelChanged {
            from,
            to,
            direction,
        });
        Ok(())
    }

    /// Rebuilds the collision blocks and the monster roster from the
    /// active level's static data, discarding the previous level's set.
    fn activate_current_level(&mut self) -> BrambleResult<()> {
        let level = self.world.current_level();
        self.bounds = level.bounds();
        self.blocks = level.collision_blocks();
        self.monsters = level
            .monsters
            .iter()
            .map(Monster::from_spawn)
            .collect::<BrambleResult<Vec<_>>>()?;

        debug!(
            "activated level '{}': {} block(s), {} monster(s)",
            level.name,
            self.blocks.len(),
            self.monsters.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Layer, LevelData, LevelGraph, MonsterSpawn};
    use std::collections::HashMap;

    fn open_level(name: &str, monsters: Vec<MonsterSpawn>) -> LevelData {
        LevelData {
            name: name.to_string(),
            layers: vec![Layer {
                name: "terrain".to_string(),
                tiles: vec![vec![1; 16]; 12],
            }],
            front_layers: Vec::new(),
            tilesets: HashMap::new(),
            collisions: vec![vec![0; 16]; 12],
            monsters,
        }
    }

    fn two_level_world() -> World {
        let mut graph = LevelGraph::new();
        graph.connect("a", EdgeDirection::Right, "b");
        graph.connect("b", EdgeDirection::Left, "a");
        World::new(
            vec![open_level("a", Vec::new()), open_level("b", Vec::new())],
            graph,
            "a",
        )
        .unwrap()
    }

    fn held(right: bool, down: bool) -> KeyState {
        KeyState {
            up: false,
            down,
            left: false,
            right,
        }
    }

    #[test]
    fn test_zero_delta_tick_is_a_no_op() {
        let mut state = GameState::new(two_level_world(), Vec2::new(50.0, 50.0), 1).unwrap();
        let events = state.tick(0.0, &held(true, false)).unwrap();
        assert!(events.is_empty());
        assert_eq!(state.player.character.position, Vec2::new(50.0, 50.0));
    }

    #[test]
    fn test_connected_edge_transitions() {
        let mut state = GameState::new(two_level_world(), Vec2::new(50.0, 50.0), 1).unwrap();
        // Park the player against the right edge and walk into it.
        state.player.character.position = Vec2::new(state.bounds.width - 16.0, 50.0);

        let events = state.tick(0.1, &held(true, false)).unwrap();

        assert_eq!(state.world.current_name(), "b");
        assert!((state.player.character.position.x - config::EDGE_BUFFER).abs() < 1e-6);
        assert!(events.iter().any(|event| matches!(
            event,
            GameEvent::LevelChanged { from, to, direction }
                if from == "a" && to == "b" && *direction == EdgeDirection::Right
        )));
    }

    #[test]
    fn test_unconnected_edge_clamps_in_place() {
        let mut state = GameState::new(two_level_world(), Vec2::new(50.0, 50.0), 1).unwrap();
        state.player.character.position = Vec2::new(50.0, state.bounds.height - 16.0);

        let events = state.tick(0.1, &held(false, true)).unwrap();

        assert_eq!(state.world.current_name(), "a");
        assert!(events.is_empty());
        let expected = state.bounds.height - state.player.character.size - config::EDGE_BUFFER;
        assert!((state.player.character.position.y - expected).abs() < 1e-4);
        assert_eq!(state.player.character.velocity.y, 0.0);
    }

    #[test]
    fn test_transition_rebuilds_roster_and_blocks() {
        let mut level_a = open_level("a", Vec::new());
        level_a.collisions[5][5] = 1;
        let level_b = open_level("b", vec![MonsterSpawn::new(100.0, 100.0, "owl")]);

        let mut graph = LevelGraph::new();
        graph.connect("a", EdgeDirection::Right, "b");
        let world = World::new(vec![level_a, level_b], graph, "a").unwrap();

        let mut state = GameState::new(world, Vec2::new(50.0, 50.0), 1).unwrap();
        assert_eq!(state.blocks.len(), 1);
        assert!(state.monsters.is_empty());

        state.player.character.position = Vec2::new(state.bounds.width - 16.0, 50.0);
        state.tick(0.1, &held(true, false)).unwrap();

        // The old level's geometry is gone and the new roster is live.
        assert!(state.blocks.is_empty());
        assert_eq!(state.monsters.len(), 1);
    }

    #[test]
    fn test_contact_damage_and_invincibility() {
        let world = World::new(
            vec![open_level(
                "a",
                vec![MonsterSpawn::new(50.0, 50.0, "owl")],
            )],
            LevelGraph::new(),
            "a",
        )
        .unwrap();
        let mut state = GameState::new(world, Vec2::new(50.0, 50.0), 1).unwrap();

        let events = state.tick(0.016, &held(false, false)).unwrap();
        assert!(events
            .iter()
            .any(|event| matches!(event, GameEvent::PlayerHit { hearts_remaining: 2 })));
        assert_eq!(state.hearts.filled_count(), 2);

        // Still overlapping next frame, but the invincibility window holds.
        let events = state.tick(0.016, &held(false, false)).unwrap();
        assert!(!events
            .iter()
            .any(|event| matches!(event, GameEvent::PlayerHit { .. })));
        assert_eq!(state.hearts.filled_count(), 2);
    }

    #[test]
    fn test_game_over_fires_exactly_once() {
        let world = World::new(
            vec![open_level(
                "a",
                vec![MonsterSpawn::new(50.0, 50.0, "owl")],
            )],
            LevelGraph::new(),
            "a",
        )
        .unwrap();
        let mut state = GameState::new(world, Vec2::new(50.0, 50.0), 1).unwrap();

        let mut game_overs = 0;
        let mut hits = 0;
        // Long frames step past the 0.8s invincibility window, so each
        // iteration can land a fresh hit. Holding the retarget gate closed
        // keeps the monster motionless on top of the player.
        for _ in 0..8 {
            state.monsters[0].elapsed_movement = 0.05;
            let events = state.tick(0.9, &held(false, false)).unwrap();
            for event in &events {
                match event {
                    GameEvent::GameOver => game_overs += 1,
                    GameEvent::PlayerHit { .. } => hits += 1,
                    _ => {}
                }
            }
        }

        assert!(hits >= 3);
        assert_eq!(state.hearts.filled_count(), 0);
        assert_eq!(game_overs, 1);
        assert_eq!(state.completion, CompletionState::GameOver);
    }

    #[test]
    fn test_dead_monster_despawns() {
        let world = World::new(
            vec![open_level(
                "a",
                vec![MonsterSpawn::new(150.0, 50.0, "owl")],
            )],
            LevelGraph::new(),
            "a",
        )
        .unwrap();
        let mut state = GameState::new(world, Vec2::new(10.0, 10.0), 1).unwrap();

        state.monsters[0].health = 0;
        let events = state.tick(0.016, &held(false, false)).unwrap();

        assert!(state.monsters.is_empty());
        assert!(events
            .iter()
            .any(|event| matches!(event, GameEvent::MonsterDied { .. })));
    }
}
