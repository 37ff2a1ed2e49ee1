//! Palette command implementation.
//!
//! Clusters an image and prints the palette table without writing assets.

use std::path::PathBuf;

use clap::Args;

use crate::config::SourceMode;
use crate::diagnostics::ValidationResult;
use crate::error::Result;
use crate::output::{display_path, plural, Printer};
use crate::quantize::cluster;
use crate::source::{self, SourceImage};
use crate::types::{PaletteTable, TileHeight};

use super::parse_tile_height;

/// Print the palettes an image quantizes to
#[derive(Args, Debug)]
pub struct PaletteArgs {
    /// Image to read colours from
    #[arg(required = true)]
    pub file: PathBuf,

    /// Band height used for clustering: 8 or 16
    #[arg(long, default_value = "16", value_parser = parse_tile_height)]
    pub tile_height: TileHeight,

    /// Read an indexed PNG and print its palette as stored
    #[arg(long)]
    pub keep_palette_order: bool,

    /// Print CGB RGB() entries instead of hex colours
    #[arg(long)]
    pub rgb555: bool,
}

pub fn run(args: PaletteArgs, printer: &Printer) -> Result<PaletteTable> {
    let display = display_path(&args.file);
    let mode = if args.keep_palette_order {
        SourceMode::Indexed
    } else {
        SourceMode::TrueColour
    };

    let mut diagnostics = ValidationResult::new();
    let palettes = match source::load(&args.file, mode)? {
        SourceImage::TrueColour(image) => cluster(&image, args.tile_height, &mut diagnostics)?
            .palettes()
            .clone(),
        SourceImage::Indexed(pixels) => pixels.palettes().clone(),
    };

    for diagnostic in diagnostics.iter() {
        printer.diagnostic(diagnostic);
    }
    printer.status(
        "Clustered",
        &format!("{} from {}", plural(palettes.len(), "palette", "palettes"), display),
    );

    // Palette lines go to stdout
    for line in format_palettes(&palettes, args.rgb555) {
        println!("{}", line);
    }

    Ok(palettes)
}

/// One line per palette: its number followed by its 4 colours.
fn format_palettes(palettes: &PaletteTable, rgb555: bool) -> Vec<String> {
    palettes
        .iter()
        .enumerate()
        .map(|(i, group)| {
            let colours: Vec<String> = group
                .iter()
                .map(|c| {
                    if rgb555 {
                        let (r, g, b) = c.to_rgb555();
                        format!("RGB({}, {}, {})", r, g, b)
                    } else {
                        c.to_string()
                    }
                })
                .collect();
            format!("{}: {}", i, colours.join(" "))
        })
        .collect()
}
