//! Builds arenas from map images and text layouts.
//!
//! Map images are read pixel by pixel: every RGB triplet is resolved through
//! the tile catalog, and rows are flipped so that the top image row becomes
//! the highest `y` in arena coordinates.

use std::{
    io,
    path::{Path, PathBuf},
};

use image::{ImageError, RgbImage};
use orb_arena_core::{tile_for_color, Rgb, TileKind};
use thiserror::Error;
use tracing::{debug, info};

use crate::World;

/// Failures that abort arena construction.
#[derive(Debug, Error)]
pub enum MapLoadError {
    /// The named map image does not exist.
    #[error("map image '{}' not found", path.display())]
    AssetMissing {
        /// Location that was probed.
        path: PathBuf,
    },
    /// The map image exists but could not be decoded.
    #[error("failed to decode map image '{}'", path.display())]
    Decode {
        /// Location of the image.
        path: PathBuf,
        /// Underlying decoder error.
        #[source]
        source: ImageError,
    },
    /// The map has no fields at all.
    #[error("map has no fields")]
    Empty,
    /// A text layout row differs in length from the first row.
    #[error("map row {row} has {found} fields, expected {expected}")]
    RaggedRows {
        /// Zero-based row counted from the top of the layout.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        found: usize,
    },
    /// The tile list does not cover the declared dimensions exactly.
    #[error("map declares {expected} fields but provides {found}")]
    SizeMismatch {
        /// Fields implied by width and height.
        expected: usize,
        /// Fields supplied.
        found: usize,
    },
}

/// Location of a named map inside a map folder.
#[must_use]
pub fn map_path(folder: &Path, name: &str) -> PathBuf {
    folder.join(format!("{name}.png"))
}

/// Loads the named map from the folder.
pub fn load_named(folder: &Path, name: &str) -> Result<World, MapLoadError> {
    load_image(&map_path(folder, name))
}

/// Loads a map image from disk.
pub fn load_image(path: &Path) -> Result<World, MapLoadError> {
    let image = match image::open(path) {
        Ok(image) => image.to_rgb8(),
        Err(ImageError::IoError(error)) if error.kind() == io::ErrorKind::NotFound => {
            return Err(MapLoadError::AssetMissing {
                path: path.to_path_buf(),
            });
        }
        Err(source) => {
            return Err(MapLoadError::Decode {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let world = from_rgb_image(&image)?;
    let (width, height) = image.dimensions();
    info!(path = %path.display(), width, height, "map_loaded");
    Ok(world)
}

/// Builds an arena from decoded pixels.
pub fn from_rgb_image(image: &RgbImage) -> Result<World, MapLoadError> {
    let (width, height) = image.dimensions();
    let mut tiles = vec![TileKind::Unknown; width as usize * height as usize];

    for (x, row, pixel) in image.enumerate_pixels() {
        let [red, green, blue] = pixel.0;
        let y = height - 1 - row;
        let index = y as usize * width as usize + x as usize;
        let tile = tile_for_color(Rgb::new(red, green, blue));
        if tile.kind() == TileKind::Unknown {
            debug!(x, y, red, green, blue, tile = tile.name(), "unmatched_map_color");
        }
        tiles[index] = tile.kind();
    }

    World::from_tiles(width, height, tiles)
}

/// Builds an arena from a text layout, first line being the top row.
///
/// Blank lines are skipped and every line is trimmed.
pub fn parse_ascii(layout: &str) -> Result<World, MapLoadError> {
    let rows: Vec<Vec<TileKind>> = layout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| line.chars().map(tile_for_glyph).collect())
        .collect();

    let Some(expected) = rows.first().map(Vec::len) else {
        return Err(MapLoadError::Empty);
    };
    if let Some((row, found)) = rows
        .iter()
        .map(Vec::len)
        .enumerate()
        .find(|(_, len)| *len != expected)
    {
        return Err(MapLoadError::RaggedRows {
            row,
            expected,
            found,
        });
    }

    let width = u32::try_from(expected).map_err(|_| MapLoadError::Empty)?;
    let height = u32::try_from(rows.len()).map_err(|_| MapLoadError::Empty)?;
    let tiles = rows.into_iter().rev().flatten().collect();
    World::from_tiles(width, height, tiles)
}

/// Glyph used for a tile kind in text layouts and frames.
#[must_use]
pub const fn glyph_for_tile(kind: TileKind) -> char {
    match kind {
        TileKind::Wall => '#',
        TileKind::Floor => '.',
        TileKind::OrbSpawn => 'o',
        TileKind::RedSpawn => 'r',
        TileKind::BlueSpawn => 'b',
        TileKind::Unknown => '?',
    }
}

/// Tile kind for a text layout glyph. Unrecognised glyphs are `UNKNOWN`.
#[must_use]
pub const fn tile_for_glyph(glyph: char) -> TileKind {
    match glyph {
        '#' => TileKind::Wall,
        '.' => TileKind::Floor,
        'o' => TileKind::OrbSpawn,
        'r' => TileKind::RedSpawn,
        'b' => TileKind::BlueSpawn,
        _ => TileKind::Unknown,
    }
}
