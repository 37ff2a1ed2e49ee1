//! Convert command implementation.
//!
//! Converts one image into GBDK C data, optionally with a JSON dump and a
//! preview PNG.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;

use crate::config::{ConvertConfig, Mode, SourceMode};
use crate::convert::{convert, Conversion};
use crate::error::{AssetError, Result};
use crate::export::{data_name, write_c, write_json, write_preview, ExportOptions};
use crate::manifest::Manifest;
use crate::output::{display_path, plural, Printer};
use crate::source;
use crate::types::{Layout, TileHeight};

use super::parse_tile_height;

/// Convert an image into tiles plus a map or metasprites
#[derive(Args, Debug, Default)]
pub struct ConvertArgs {
    /// Image to convert
    #[arg(required = true)]
    pub input: PathBuf,

    /// Output C file (the header is written next to it)
    #[arg(long, short = 'c')]
    pub output: Option<PathBuf>,

    /// Project file (default: gbasset.yaml next to the image)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Sprite cell width (default: image width)
    #[arg(long)]
    pub sprite_width: Option<u32>,

    /// Sprite cell height (default: image height)
    #[arg(long)]
    pub sprite_height: Option<u32>,

    /// Pivot x inside the cell (default: half the cell width)
    #[arg(long, allow_hyphen_values = true)]
    pub pivot_x: Option<i32>,

    /// Pivot y inside the cell (default: half the cell height)
    #[arg(long, allow_hyphen_values = true)]
    pub pivot_y: Option<i32>,

    /// Collision box width (default: cell width)
    #[arg(long)]
    pub collision_width: Option<u32>,

    /// Collision box height (default: cell height)
    #[arg(long)]
    pub collision_height: Option<u32>,

    /// Default property bits, decimal or 0x-prefixed hex
    #[arg(long, value_parser = parse_props)]
    pub props: Option<u8>,

    /// Sprite tile height: 8 or 16
    #[arg(long, value_parser = parse_tile_height)]
    pub tile_height: Option<TileHeight>,

    /// ROM bank for the generated data
    #[arg(long, short)]
    pub bank: Option<u8>,

    /// Read an indexed PNG and keep its palette order
    #[arg(long)]
    pub keep_palette_order: bool,

    /// Do not match tiles against their mirrored copies
    #[arg(long)]
    pub no_flip: bool,

    /// Export a background map instead of metasprites
    #[arg(long)]
    pub map: bool,

    /// Emit a per-cell attribute grid (implies --map)
    #[arg(long)]
    pub map_attributes: bool,

    /// Emit MetaSpriteInfo / MapInfo structs
    #[arg(long)]
    pub structs: bool,

    /// Also write a JSON dump
    #[arg(long)]
    pub json: bool,

    /// Also write a preview PNG of the quantized image
    #[arg(long)]
    pub preview: bool,

    /// Integer scale of the preview PNG
    #[arg(long, default_value = "1")]
    pub scale: u32,
}

/// Parse property bits given as decimal or `0x` hex.
fn parse_props(s: &str) -> std::result::Result<u8, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|_| format!("'{}' is not a byte value (e.g. 0x80)", s))
}

/// Command-line flags layered over the project file. Relative paths in the
/// project file are taken from `base`, the directory holding it.
fn resolve(args: &ConvertArgs, manifest: &Manifest, base: &Path) -> (ConvertConfig, ExportOptions, PathBuf) {
    let mut config = manifest.convert_config();

    if let Some(tile_height) = args.tile_height {
        config.tile_height = tile_height;
    }
    if args.no_flip {
        config.mirror_tiles = false;
    }
    if let Some(props) = args.props {
        config.default_props = props;
    }
    if args.keep_palette_order {
        config.source = SourceMode::Indexed;
    }
    if args.map || args.map_attributes {
        let attributes = match config.mode {
            Mode::Map { attributes } => attributes,
            Mode::Sprites(_) => false,
        };
        config.mode = Mode::Map {
            attributes: attributes || args.map_attributes,
        };
    }
    if let Mode::Sprites(sprite) = &mut config.mode {
        sprite.width = args.sprite_width.or(sprite.width);
        sprite.height = args.sprite_height.or(sprite.height);
        sprite.pivot_x = args.pivot_x.or(sprite.pivot_x);
        sprite.pivot_y = args.pivot_y.or(sprite.pivot_y);
        sprite.collision_width = args.collision_width.or(sprite.collision_width);
        sprite.collision_height = args.collision_height.or(sprite.collision_height);
    }

    let output = args.output.clone().unwrap_or_else(|| {
        let stem = args.input.file_stem().unwrap_or_default().to_string_lossy();
        let dir = match &manifest.output {
            Some(dir) => base.join(dir),
            None => args.input.parent().map(Path::to_path_buf).unwrap_or_default(),
        };
        dir.join(format!("{}.c", stem))
    });

    let export = ExportOptions {
        name: data_name(&output),
        bank: args.bank.or(manifest.bank).unwrap_or(0),
        structs: args.structs || manifest.structs.unwrap_or(false),
    };

    (config, export, output)
}

/// The project file and the directory it was found in.
fn load_manifest(args: &ConvertArgs) -> Result<(Manifest, PathBuf)> {
    if let Some(path) = &args.config {
        let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
        return Ok((Manifest::load(path)?, base));
    }
    let dir = args.input.parent().map(Path::to_path_buf).unwrap_or_default();
    let manifest = Manifest::find(&dir)?.unwrap_or_default();
    Ok((manifest, dir))
}

/// Run the conversion. Returns every file written.
pub fn run(args: ConvertArgs, printer: &Printer) -> Result<Vec<PathBuf>> {
    let (manifest, base) = load_manifest(&args)?;
    let (config, export, output) = resolve(&args, &manifest, &base);
    let display = display_path(&args.input);

    let kind = if config.is_map() { "map" } else { "sprites" };
    printer.status(
        "Converting",
        &format!("{} ({}, {})", display, kind, config.effective_tile_height()),
    );

    let image = source::load(&args.input, config.source)?;
    let (width, height) = image.dimensions();
    printer.verbose("Image", &format!("{}x{}", width, height));

    let conversion = convert(image, &config)?;
    for diagnostic in conversion.diagnostics.iter() {
        printer.diagnostic(diagnostic);
    }
    report(&conversion, printer);

    if let Some(dir) = output.parent().filter(|d| !d.as_os_str().is_empty()) {
        if !dir.exists() {
            fs::create_dir_all(dir).map_err(|e| AssetError::Io {
                path: dir.to_path_buf(),
                message: format!("Failed to create output directory: {}", e),
            })?;
        }
    }

    let mut written = Vec::new();
    if let Err(e) = write_outputs(&conversion, &export, &output, &args, &manifest, &mut written) {
        discard(&written);
        return Err(e);
    }

    for path in &written {
        printer.info("Wrote", &printer.cyan(&display_path(path)));
    }

    let warnings = conversion.diagnostics.warning_count();
    let mut summary = plural(conversion.tiles.len(), "tile", "tiles");
    if warnings > 0 {
        summary.push_str(&format!(", {}", plural(warnings, "warning", "warnings")));
    }
    printer.success("Finished", &summary);

    Ok(written)
}

/// Write every requested file. Each path is recorded before its write starts.
fn write_outputs(
    conversion: &Conversion,
    export: &ExportOptions,
    output: &Path,
    args: &ConvertArgs,
    manifest: &Manifest,
    written: &mut Vec<PathBuf>,
) -> Result<()> {
    written.push(output.to_path_buf());
    written.push(output.with_extension("h"));
    write_c(conversion, export, output)?;

    if args.json || manifest.json.unwrap_or(false) {
        let path = output.with_extension("json");
        written.push(path.clone());
        write_json(conversion, &export.name, &path)?;
    }
    if args.preview || manifest.preview.unwrap_or(false) {
        let path = output.with_extension("preview.png");
        written.push(path.clone());
        write_preview(&conversion.pixels, &path, args.scale)?;
    }
    Ok(())
}

/// Remove the files of a run that failed part way through.
fn discard(paths: &[PathBuf]) {
    for path in paths {
        if path.is_file() {
            let _ = fs::remove_file(path);
        }
    }
}

fn report(conversion: &Conversion, printer: &Printer) {
    printer.verbose("Palettes", &conversion.palettes().len().to_string());
    printer.verbose("Tiles", &format!("{} ({})", conversion.tiles.len(), conversion.tile_height));
    match &conversion.layout {
        Layout::Map(map) => printer.verbose("Map", &format!("{}x{} tiles", map.width, map.height)),
        Layout::Sprites(sprites) => {
            let placements: usize = sprites.iter().map(|s| s.len()).sum();
            printer.verbose(
                "Metasprites",
                &format!("{} ({})", sprites.len(), plural(placements, "placement", "placements")),
            );
        }
    }
}
