//! JSON dump of a conversion.

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::convert::Conversion;
use crate::error::{AssetError, Result};
use crate::types::{Layout, Placement, TileMap};

/// Render a conversion as pretty-printed JSON.
pub fn render_json(conversion: &Conversion, name: &str) -> Result<String> {
    let output = AssetJson::from_conversion(conversion, name);
    serde_json::to_string_pretty(&output).map_err(|e| AssetError::Build {
        message: format!("Failed to serialize asset: {}", e),
        help: None,
    })
}

/// Write a conversion as JSON.
pub fn write_json(conversion: &Conversion, name: &str, path: &Path) -> Result<()> {
    let json = render_json(conversion, name)?;
    fs::write(path, json).map_err(|e| AssetError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to write JSON: {}", e),
    })?;
    Ok(())
}

// --- JSON serialization types ---

#[derive(Serialize)]
struct AssetJson<'a> {
    name: &'a str,
    tile_height: u32,
    /// Each palette as `#RRGGBB` / `#RRGGBBAA` strings.
    palettes: Vec<Vec<String>>,
    /// Packed tile bytes, one entry per tile.
    tiles: Vec<&'a [u8]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sprite: Option<SpriteJson<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    map: Option<&'a TileMap>,
    meta: MetaJson,
}

#[derive(Serialize)]
struct SpriteJson<'a> {
    width: u32,
    height: u32,
    pivot_x: i32,
    pivot_y: i32,
    collision_width: u32,
    collision_height: u32,
    metasprites: Vec<&'a [Placement]>,
}

#[derive(Serialize)]
struct MetaJson {
    app: String,
    version: String,
}

impl<'a> AssetJson<'a> {
    fn from_conversion(conversion: &'a Conversion, name: &'a str) -> Self {
        let palettes = conversion
            .palettes()
            .iter()
            .map(|group| group.iter().map(|c| c.to_string()).collect())
            .collect();

        let (sprite, map) = match &conversion.layout {
            Layout::Map(map) => (None, Some(map)),
            Layout::Sprites(sprites) => {
                let geometry = &conversion.geometry;
                let sprite = SpriteJson {
                    width: geometry.cells.width,
                    height: geometry.cells.height,
                    pivot_x: geometry.cells.pivot_x,
                    pivot_y: geometry.cells.pivot_y,
                    collision_width: geometry.collision_width,
                    collision_height: geometry.collision_height,
                    metasprites: sprites.iter().map(|s| s.placements.as_slice()).collect(),
                };
                (Some(sprite), None)
            }
        };

        AssetJson {
            name,
            tile_height: conversion.tile_height.pixels(),
            palettes,
            tiles: conversion.tiles.iter().map(|t| t.bytes()).collect(),
            sprite,
            map,
            meta: MetaJson {
                app: "gbasset".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        }
    }
}
