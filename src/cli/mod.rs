pub mod completions;
pub mod convert;
pub mod palette;

use clap::{Parser, Subcommand};

use crate::types::TileHeight;

/// gbasset - Game Boy tile, map and metasprite converter
#[derive(Parser, Debug)]
#[command(name = "gbasset")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Print detail lines
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert an image into C tile, map or metasprite data
    Convert(convert::ConvertArgs),

    /// Print the palettes an image quantizes to
    Palette(palette::PaletteArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Parse a `--tile-height` value.
fn parse_tile_height(s: &str) -> std::result::Result<TileHeight, String> {
    let value: u32 = s.parse().map_err(|_| format!("'{}' is not a number", s))?;
    TileHeight::try_from(value)
}
