//! Project file (gbasset.yaml) parsing.
//!
//! The project file holds default conversion settings for a directory of
//! assets. Every field is optional; command-line flags override it.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{ConvertConfig, Mode, SourceMode, SpriteOptions};
use crate::error::{AssetError, Result};
use crate::types::TileHeight;

/// File name looked up next to the converted image.
pub const MANIFEST_FILENAME: &str = "gbasset.yaml";

/// Project settings loaded from gbasset.yaml.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    /// Directory generated files are written to.
    pub output: Option<PathBuf>,

    /// Sprite tile height (8 or 16).
    pub tile_height: Option<TileHeight>,

    /// Match tiles against their mirrored copies.
    pub flip: Option<bool>,

    /// Default property bits for every tile.
    pub props: Option<u8>,

    /// Export a background map instead of metasprites.
    pub map: Option<bool>,

    /// Emit a per-cell attribute grid (implies `map`).
    pub map_attributes: Option<bool>,

    /// Read the source as an indexed PNG and keep its palette order.
    pub keep_palette_order: Option<bool>,

    /// Also emit MetaSpriteInfo / MapInfo structs.
    pub structs: Option<bool>,

    /// ROM bank for `#pragma bank`.
    pub bank: Option<u8>,

    /// Also write a JSON dump.
    pub json: Option<bool>,

    /// Also write a quantized preview PNG.
    pub preview: Option<bool>,

    /// Sprite cell, pivot and collision box.
    pub sprite: SpriteOptions,
}

impl Manifest {
    /// Load a manifest from a gbasset.yaml file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AssetError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read project file: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Parse a manifest from a YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| AssetError::Parse {
            message: format!("Invalid project file: {}", e),
            help: Some(format!("Check {} syntax", MANIFEST_FILENAME)),
        })
    }

    /// Load `dir/gbasset.yaml` if it exists.
    pub fn find(dir: &Path) -> Result<Option<Self>> {
        let path = dir.join(MANIFEST_FILENAME);
        if path.is_file() {
            Self::load(&path).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Conversion settings described by this file, built-in defaults elsewhere.
    pub fn convert_config(&self) -> ConvertConfig {
        let defaults = ConvertConfig::default();
        // `map_attributes` implies `map`, as on the command line
        let attributes = self.map_attributes.unwrap_or(false);
        let mode = if self.map.unwrap_or(false) || attributes {
            Mode::Map { attributes }
        } else {
            Mode::Sprites(self.sprite)
        };
        let source = if self.keep_palette_order.unwrap_or(false) {
            SourceMode::Indexed
        } else {
            SourceMode::TrueColour
        };

        ConvertConfig {
            tile_height: self.tile_height.unwrap_or(defaults.tile_height),
            mirror_tiles: self.flip.unwrap_or(defaults.mirror_tiles),
            default_props: self.props.unwrap_or(defaults.default_props),
            source,
            mode,
        }
    }
}
