//! # Display Management
//!
//! Per-frame drawing via macroquad: the level composites, the entities cut
//! from their sprite atlases, and the heart HUD, all behind a uniform
//! scale-and-scroll camera. The display owns no simulation state; it reads
//! the game state and issues draw calls.

use crate::config;
use crate::game::{GameState, Heart, LevelData, MapBounds, Monster, Player, SpriteRegion, Vec2};
use crate::rendering::compositor::{composite_layers, TilesetImage};
use log::warn;
use macroquad::prelude::*;
use std::collections::HashMap;

/// Drawn edge length of one HUD heart.
const HEART_SIZE: f32 = 20.0;

/// Uniform world-to-screen transform: a scale factor plus a scroll clamped
/// so the viewport never shows beyond the map bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub scale: f32,
    /// Viewport extent in world units
    pub viewport_width: f32,
    pub viewport_height: f32,
}

impl Camera {
    /// Creates a camera for a screen of the given pixel size.
    pub fn new(scale: f32, screen_width: f32, screen_height: f32) -> Self {
        Self {
            scale,
            viewport_width: screen_width / scale,
            viewport_height: screen_height / scale,
        }
    }

    /// Scroll distance keeping `focus` centered where possible, clamped to
    /// `[0, map extent - viewport extent]` on each axis.
    pub fn scroll(&self, focus: Vec2, bounds: MapBounds) -> Vec2 {
        let max_x = (bounds.width - self.viewport_width).max(0.0);
        let max_y = (bounds.height - self.viewport_height).max(0.0);
        Vec2::new(
            (focus.x - self.viewport_width / 2.0).clamp(0.0, max_x),
            (focus.y - self.viewport_height / 2.0).clamp(0.0, max_y),
        )
    }
}

/// Macroquad display manager.
///
/// Textures load asynchronously at startup and level load; anything whose
/// image is not available yet is silently skipped that frame and appears
/// once loaded.
pub struct Display {
    pub camera: Camera,
    background: Option<Texture2D>,
    foreground: Option<Texture2D>,
    player_texture: Option<Texture2D>,
    monster_textures: HashMap<String, Texture2D>,
    heart_texture: Option<Texture2D>,
    heart_sprite: SpriteRegion,
}

impl Display {
    /// Creates the display and loads the entity textures.
    pub async fn new() -> Self {
        Self {
            camera: Camera::new(config::MAP_SCALE, screen_width(), screen_height()),
            background: None,
            foreground: None,
            player_texture: load_texture_or_warn("images/princess.png").await,
            monster_textures: HashMap::new(),
            heart_texture: load_texture_or_warn("images/heart.png").await,
            heart_sprite: SpriteRegion::new(0.0, 0.0, 16.0, 4),
        }
    }

    /// Rebuilds the static composites and monster textures for a level.
    ///
    /// Called once before the frame loop starts and again on every level
    /// change, so the drawn geometry always matches the active level.
    pub async fn load_level(&mut self, level: &LevelData) {
        let mut tilesets = HashMap::new();
        for (layer_name, info) in &level.tilesets {
            match load_tileset(&info.image, info.tile_size).await {
                Some(tileset) => {
                    tilesets.insert(layer_name.clone(), tileset);
                }
                None => warn!("tileset '{}' unavailable for '{}'", info.image, layer_name),
            }
        }

        let bounds = level.bounds();
        let cols = (bounds.width / config::TILE_SIZE) as u32;
        let rows = (bounds.height / config::TILE_SIZE) as u32;
        let tile = config::TILE_SIZE as u32;

        let background = composite_layers(&level.layers, &tilesets, cols, rows, tile);
        let foreground = composite_layers(&level.front_layers, &tilesets, cols, rows, tile);
        self.background = Some(texture_from_rgba(&background));
        self.foreground = Some(texture_from_rgba(&foreground));

        for spawn in &level.monsters {
            if let Some(key) = &spawn.texture {
                if !self.monster_textures.contains_key(key) {
                    if let Some(texture) = load_texture_or_warn(key).await {
                        self.monster_textures.insert(key.clone(), texture);
                    }
                }
            }
        }
    }

    /// Draws one frame of the game state.
    pub fn draw(&self, state: &GameState) {
        clear_background(BLACK);

        let scroll = self.camera.scroll(state.player.character.center, state.bounds);

        if let Some(background) = &self.background {
            self.draw_composite(background, scroll);
        }

        self.draw_player(&state.player, scroll);

        for monster in state.monsters.iter().rev() {
            self.draw_monster(monster, scroll);
        }

        if let Some(foreground) = &self.foreground {
            self.draw_composite(foreground, scroll);
        }

        for heart in state.hearts.hearts() {
            self.draw_heart(heart);
        }
    }

    fn draw_composite(&self, texture: &Texture2D, scroll: Vec2) {
        let scale = self.camera.scale;
        draw_texture_ex(
            texture,
            -scroll.x * scale,
            -scroll.y * scale,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(
                    texture.width() * scale,
                    texture.height() * scale,
                )),
                ..Default::default()
            },
        );
    }

    fn draw_player(&self, player: &Player, scroll: Vec2) {
        let Some(texture) = &self.player_texture else {
            return;
        };
        let character = &player.character;
        let region = character.active_region();

        self.draw_character_frame(
            texture,
            region,
            character.animation.current_frame,
            character.position,
            character.size,
            scroll,
            WHITE,
        );
    }

    fn draw_monster(&self, monster: &Monster, scroll: Vec2) {
        let Some(texture) = self.monster_textures.get(&monster.texture) else {
            return;
        };
        let character = &monster.character;
        let region = character.active_region();

        // Half alpha while the invincibility window runs.
        let color = if monster.is_invincible() {
            Color::new(1.0, 1.0, 1.0, 0.5)
        } else {
            WHITE
        };

        self.draw_character_frame(
            texture,
            region,
            character.animation.current_frame,
            character.position,
            character.size,
            scroll,
            color,
        );
    }

    /// Draws one frame of a vertical character strip at a world position.
    #[allow(clippy::too_many_arguments)]
    fn draw_character_frame(
        &self,
        texture: &Texture2D,
        region: &SpriteRegion,
        frame: usize,
        position: Vec2,
        size: f32,
        scroll: Vec2,
        color: Color,
    ) {
        let scale = self.camera.scale;
        draw_texture_ex(
            texture,
            (position.x - scroll.x) * scale,
            (position.y - scroll.y) * scale,
            color,
            DrawTextureParams {
                dest_size: Some(vec2(size * scale, size * scale)),
                source: Some(Rect::new(
                    region.x,
                    region.y + region.height * frame as f32,
                    region.width,
                    region.height,
                )),
                ..Default::default()
            },
        );
    }

    /// Draws one HUD heart. Heart frames run horizontally in the atlas,
    /// and the HUD scales without scrolling.
    fn draw_heart(&self, heart: &Heart) {
        let Some(texture) = &self.heart_texture else {
            return;
        };
        let scale = self.camera.scale;
        let region = &self.heart_sprite;

        draw_texture_ex(
            texture,
            heart.x * scale,
            heart.y * scale,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(HEART_SIZE * scale, HEART_SIZE * scale)),
                source: Some(Rect::new(
                    region.x + region.width * heart.current_frame as f32,
                    region.y,
                    region.width,
                    region.height,
                )),
                ..Default::default()
            },
        );
    }
}

/// Loads a texture, warning and returning `None` on failure so a missing
/// asset degrades to an invisible entity instead of a crash.
async fn load_texture_or_warn(path: &str) -> Option<Texture2D> {
    match load_texture(path).await {
        Ok(texture) => {
            texture.set_filter(FilterMode::Nearest);
            Some(texture)
        }
        Err(err) => {
            warn!("failed to load texture '{}': {:?}", path, err);
            None
        }
    }
}

/// Loads and decodes a tileset image for the compositor.
async fn load_tileset(path: &str, tile_size: u32) -> Option<TilesetImage> {
    let bytes = match load_file(path).await {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!("failed to load tileset '{}': {:?}", path, err);
            return None;
        }
    };

    match image::load_from_memory(&bytes) {
        Ok(decoded) => Some(TilesetImage {
            image: decoded.to_rgba8(),
            tile_size,
        }),
        Err(err) => {
            warn!("failed to decode tileset '{}': {}", path, err);
            None
        }
    }
}

/// Uploads a composited image to the GPU.
fn texture_from_rgba(image: &image::RgbaImage) -> Texture2D {
    let texture = Texture2D::from_rgba8(
        image.width() as u16,
        image.height() as u16,
        image.as_raw(),
    );
    texture.set_filter(FilterMode::Nearest);
    texture
}
