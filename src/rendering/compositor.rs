//! # Static-Layer Compositor
//!
//! One-shot batch rasterization of a level's tile layers into a single
//! drawable image. Pure aside from logging: decoded tileset images go in,
//! one flattened RGBA image sized to the full map comes out. Invoked once
//! per level load for the background composite and again for the
//! front-rendered composite.

use crate::game::Layer;
use image::imageops::{crop_imm, overlay};
use image::RgbaImage;
use log::warn;
use std::collections::HashMap;

/// A decoded tileset: the atlas image plus the tile edge length used to
/// cut it.
#[derive(Debug, Clone)]
pub struct TilesetImage {
    pub image: RgbaImage,
    pub tile_size: u32,
}

impl TilesetImage {
    /// Tiles per atlas row; tile indices wrap row-major at this width.
    fn tiles_per_row(&self) -> u32 {
        let width = self.image.width();
        (width + self.tile_size - 1) / self.tile_size
    }
}

/// Flattens `layers` into one map-sized image, bottom layer first.
///
/// Tile index 0 means empty; index `n` (n >= 1) selects source tile `n - 1`
/// in row-major order within the layer's tileset. A layer whose tileset is
/// missing from `tilesets` (its image failed to load) is skipped with a
/// warning; the composite proceeds without it.
pub fn composite_layers(
    layers: &[Layer],
    tilesets: &HashMap<String, TilesetImage>,
    cols: u32,
    rows: u32,
    tile_size: u32,
) -> RgbaImage {
    let mut canvas = RgbaImage::new(cols * tile_size, rows * tile_size);

    for layer in layers {
        let Some(tileset) = tilesets.get(&layer.name) else {
            warn!("no tileset for layer '{}', skipping", layer.name);
            continue;
        };

        render_layer(&mut canvas, layer, tileset, tile_size);
    }

    canvas
}

/// Stamps one layer's tiles onto the canvas.
fn render_layer(canvas: &mut RgbaImage, layer: &Layer, tileset: &TilesetImage, tile_size: u32) {
    let tiles_per_row = tileset.tiles_per_row();
    let source_size = tileset.tile_size;

    for (y, row) in layer.tiles.iter().enumerate() {
        for (x, symbol) in row.iter().enumerate() {
            if *symbol == 0 {
                continue;
            }

            let index = u32::from(*symbol - 1);
            let src_x = (index % tiles_per_row) * source_size;
            let src_y = (index / tiles_per_row) * source_size;

            if src_x + source_size > tileset.image.width()
                || src_y + source_size > tileset.image.height()
            {
                warn!(
                    "tile index {} out of range in layer '{}'",
                    symbol, layer.name
                );
                continue;
            }

            let tile = crop_imm(&tileset.image, src_x, src_y, source_size, source_size).to_image();
            overlay(
                canvas,
                &tile,
                i64::from(x as u32 * tile_size),
                i64::from(y as u32 * tile_size),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const GREEN: Rgba<u8> = Rgba([0, 255, 0, 255]);

    /// A 2-tile atlas: tile 0 solid red, tile 1 solid green.
    fn two_tile_set(tile_size: u32) -> TilesetImage {
        let image = RgbaImage::from_fn(tile_size * 2, tile_size, |x, _| {
            if x < tile_size {
                RED
            } else {
                GREEN
            }
        });
        TilesetImage { image, tile_size }
    }

    fn terrain(tiles: Vec<Vec<u16>>) -> Layer {
        Layer {
            name: "terrain".to_string(),
            tiles,
        }
    }

    #[test]
    fn test_composite_places_tiles_row_major() {
        let mut tilesets = HashMap::new();
        tilesets.insert("terrain".to_string(), two_tile_set(16));

        let layer = terrain(vec![vec![1, 2], vec![0, 1]]);
        let composite = composite_layers(&[layer], &tilesets, 2, 2, 16);

        assert_eq!(composite.dimensions(), (32, 32));
        assert_eq!(*composite.get_pixel(0, 0), RED);
        assert_eq!(*composite.get_pixel(16, 0), GREEN);
        // Index 0 leaves the cell untouched.
        assert_eq!(composite.get_pixel(0, 16)[3], 0);
        assert_eq!(*composite.get_pixel(16, 16), RED);
    }

    #[test]
    fn test_missing_tileset_skips_layer() {
        let tilesets = HashMap::new();
        let layer = terrain(vec![vec![1]]);

        let composite = composite_layers(&[layer], &tilesets, 1, 1, 16);

        // Fully transparent: the layer was dropped, not an error.
        assert!(composite.pixels().all(|pixel| pixel[3] == 0));
    }

    #[test]
    fn test_out_of_range_index_is_skipped() {
        let mut tilesets = HashMap::new();
        tilesets.insert("terrain".to_string(), two_tile_set(16));

        let layer = terrain(vec![vec![9]]);
        let composite = composite_layers(&[layer], &tilesets, 1, 1, 16);

        assert!(composite.pixels().all(|pixel| pixel[3] == 0));
    }

    #[test]
    fn test_layers_stack_in_order() {
        let mut tilesets = HashMap::new();
        tilesets.insert("terrain".to_string(), two_tile_set(16));
        tilesets.insert("trees".to_string(), two_tile_set(16));

        let bottom = terrain(vec![vec![1]]);
        let top = Layer {
            name: "trees".to_string(),
            tiles: vec![vec![2]],
        };

        let composite = composite_layers(&[bottom, top], &tilesets, 1, 1, 16);

        // The later layer draws over the earlier one.
        assert_eq!(*composite.get_pixel(0, 0), GREEN);
    }
}
