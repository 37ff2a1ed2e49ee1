//! GBDK-style C source and header emission.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use crate::convert::Conversion;
use crate::error::{AssetError, Result};
use crate::types::{Layout, MetaSprite, TileMap};

/// Naming and placement of the generated C data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// Prefix of every emitted symbol.
    pub name: String,
    /// ROM bank; 0 means no `#pragma bank`.
    pub bank: u8,
    /// Emit MetaSpriteInfo / TilesInfo / MapInfo structs instead of defines.
    pub structs: bool,
}

impl ExportOptions {
    /// Options named after an output file.
    pub fn for_path(path: &Path) -> Self {
        Self {
            name: data_name(path),
            bank: 0,
            structs: false,
        }
    }
}

/// Symbol prefix for an output file: its stem with `-` replaced by `_`.
pub fn data_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().replace('-', "_"))
        .unwrap_or_default()
}

/// Write `path` and the header next to it. Returns the header path.
pub fn write_c(conversion: &Conversion, options: &ExportOptions, path: &Path) -> Result<PathBuf> {
    let header_path = path.with_extension("h");

    write_file(path, &render_source(conversion, options)?)?;
    write_file(&header_path, &render_header(conversion, options)?)?;

    Ok(header_path)
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| AssetError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to write C output: {}", e),
    })
}

/// Render the header file.
pub fn render_header(conversion: &Conversion, options: &ExportOptions) -> Result<String> {
    let mut out = String::new();
    header(&mut out, conversion, options).map_err(format_error)?;
    Ok(out)
}

/// Render the source file.
pub fn render_source(conversion: &Conversion, options: &ExportOptions) -> Result<String> {
    let mut out = String::new();
    source(&mut out, conversion, options).map_err(format_error)?;
    Ok(out)
}

fn format_error(e: std::fmt::Error) -> AssetError {
    AssetError::Build {
        message: format!("Failed to format C output: {}", e),
        help: None,
    }
}

fn header(out: &mut String, conversion: &Conversion, options: &ExportOptions) -> std::fmt::Result {
    let name = &options.name;
    let geometry = &conversion.geometry;

    writeln!(out, "//AUTOGENERATED FILE FROM gbasset")?;
    writeln!(out, "#ifndef METASPRITE_{}_H", name)?;
    writeln!(out, "#define METASPRITE_{}_H", name)?;
    writeln!(out)?;
    writeln!(out, "#include <stdint.h>")?;
    writeln!(out, "#include <gbdk/platform.h>")?;
    writeln!(out, "#include <gbdk/metasprites.h>")?;
    writeln!(out)?;

    if options.structs {
        match &conversion.layout {
            Layout::Map(_) => {
                writeln!(out, "#include \"TilesInfo.h\"")?;
                writeln!(out, "#include \"MapInfo.h\"")?;
                writeln!(out)?;
                writeln!(out, "extern const struct TilesInfo {}_tiles_info;", name)?;
                writeln!(out, "extern const struct MapInfo {};", name)?;
            }
            Layout::Sprites(_) => {
                writeln!(out, "#include \"MetaSpriteInfo.h\"")?;
                writeln!(out)?;
                writeln!(out, "extern const struct MetaSpriteInfo {};", name)?;
            }
        }
    } else {
        writeln!(out, "#define {}_TILE_H {}", name, conversion.tile_height.pixels())?;
        writeln!(out, "#define {}_WIDTH {}", name, geometry.cells.width)?;
        writeln!(out, "#define {}_HEIGHT {}", name, geometry.cells.height)?;
        match &conversion.layout {
            Layout::Map(map) => {
                let (attributes, tile_pals) = if map.attributes.is_some() {
                    (format!("{}_map_attributes", name), "0".to_string())
                } else {
                    ("0".to_string(), format!("{}_tile_pals", name))
                };
                writeln!(out, "#define {}_MAP_ATTRIBUTES {}", name, attributes)?;
                writeln!(out, "#define {}_TILE_PALS {}", name, tile_pals)?;
            }
            Layout::Sprites(_) => {
                writeln!(out, "#define {}_PIVOT_X {}", name, geometry.cells.pivot_x)?;
                writeln!(out, "#define {}_PIVOT_Y {}", name, geometry.cells.pivot_y)?;
                writeln!(out, "#define {}_PIVOT_W {}", name, geometry.collision_width)?;
                writeln!(out, "#define {}_PIVOT_H {}", name, geometry.collision_height)?;
            }
        }
        writeln!(out)?;
        writeln!(out, "BANKREF_EXTERN({})", name)?;
        writeln!(out)?;
        writeln!(out, "extern const uint16_t {}_palettes[{}];", name, palette_len(conversion))?;
        writeln!(out, "extern const uint8_t {}_tiles[{}];", name, tiles_len(conversion))?;
        writeln!(out)?;
        match &conversion.layout {
            Layout::Map(map) => {
                let cells = map.tiles.len();
                writeln!(out, "extern const unsigned char {}_map[{}];", name, cells)?;
                if map.attributes.is_some() {
                    writeln!(out, "extern const unsigned char {}_map_attributes[{}];", name, cells)?;
                } else {
                    writeln!(out, "extern const uint8_t {}_tile_pals[{}];", name, conversion.tiles.len())?;
                }
            }
            Layout::Sprites(sprites) => {
                writeln!(
                    out,
                    "extern const metasprite_t* const {}_metasprites[{}];",
                    name,
                    sprites.len()
                )?;
            }
        }
    }
    writeln!(out)?;
    write!(out, "#endif")
}

fn source(out: &mut String, conversion: &Conversion, options: &ExportOptions) -> std::fmt::Result {
    let name = &options.name;

    if options.bank != 0 {
        writeln!(out, "#pragma bank {}", options.bank)?;
        writeln!(out)?;
    }
    writeln!(out, "//AUTOGENERATED FILE FROM gbasset")?;
    writeln!(out)?;
    writeln!(out, "#include <stdint.h>")?;
    writeln!(out, "#include <gbdk/platform.h>")?;
    writeln!(out, "#include <gbdk/metasprites.h>")?;
    writeln!(out)?;
    writeln!(out, "BANKREF({})", name)?;
    writeln!(out)?;

    palettes(out, conversion, name)?;
    tiles(out, conversion, name)?;

    match &conversion.layout {
        Layout::Sprites(sprites) => metasprites(out, conversion, sprites, options),
        Layout::Map(map) => map_data(out, conversion, map, options),
    }
}

fn palettes(out: &mut String, conversion: &Conversion, name: &str) -> std::fmt::Result {
    writeln!(out, "const uint16_t {}_palettes[{}] = {{", name, palette_len(conversion))?;
    let groups: Vec<String> = conversion
        .palettes()
        .iter()
        .map(|group| {
            let colours: Vec<String> = group
                .iter()
                .map(|c| {
                    let (r, g, b) = c.to_rgb555();
                    format!("RGB({}, {}, {})", r, g, b)
                })
                .collect();
            format!("\t{}", colours.join(", "))
        })
        .collect();
    writeln!(out, "{}", groups.join(",\n"))?;
    writeln!(out, "}};")?;
    writeln!(out)
}

fn tiles(out: &mut String, conversion: &Conversion, name: &str) -> std::fmt::Result {
    writeln!(out, "const uint8_t {}_tiles[{}] = {{", name, tiles_len(conversion))?;
    let count = conversion.tiles.len();
    for (i, tile) in conversion.tiles.iter().enumerate() {
        let bytes: Vec<String> = tile.bytes().iter().map(|b| format!("0x{:02x}", b)).collect();
        let separator = if i + 1 == count { "" } else { "," };
        writeln!(out, "\t{}{}", bytes.join(","), separator)?;
    }
    writeln!(out, "}};")?;
    writeln!(out)
}

fn metasprites(
    out: &mut String,
    conversion: &Conversion,
    sprites: &[MetaSprite],
    options: &ExportOptions,
) -> std::fmt::Result {
    let name = &options.name;

    for (i, sprite) in sprites.iter().enumerate() {
        writeln!(out, "const metasprite_t {}_metasprite{}[] = {{", name, i)?;
        write!(out, "\t")?;
        for p in &sprite.placements {
            write!(out, "METASPR_ITEM({}, {}, {}, {}), ", p.dy, p.dx, p.tile, p.props)?;
        }
        writeln!(out, "METASPR_TERM")?;
        writeln!(out, "}};")?;
        writeln!(out)?;
    }

    let table: Vec<String> = (0..sprites.len()).map(|i| format!("{}_metasprite{}", name, i)).collect();
    writeln!(out, "const metasprite_t* const {}_metasprites[{}] = {{", name, sprites.len())?;
    writeln!(out, "\t{}", table.join(", "))?;
    writeln!(out, "}};")?;

    if options.structs {
        let geometry = &conversion.geometry;
        writeln!(out)?;
        writeln!(out, "#include \"MetaSpriteInfo.h\"")?;
        writeln!(out, "const struct MetaSpriteInfo {} = {{", name)?;
        writeln!(out, "\t{}, //width", geometry.collision_width)?;
        writeln!(out, "\t{}, //height", geometry.collision_height)?;
        writeln!(
            out,
            "\t{}, //num_tiles",
            conversion.tiles.len() * conversion.tile_height.slots()
        )?;
        writeln!(out, "\t{}_tiles, //tiles", name)?;
        writeln!(out, "\t{}, //num palettes", conversion.palettes().len())?;
        writeln!(out, "\t{}_palettes, //CGB palette", name)?;
        writeln!(out, "\t{}, //num sprites", sprites.len())?;
        writeln!(out, "\t{}_metasprites, //metasprites", name)?;
        writeln!(out, "}};")?;
    }
    Ok(())
}

fn map_data(out: &mut String, conversion: &Conversion, map: &TileMap, options: &ExportOptions) -> std::fmt::Result {
    let name = &options.name;

    if let Some(tile_palettes) = &map.tile_palettes {
        let pals: Vec<String> = tile_palettes.iter().map(u8::to_string).collect();
        writeln!(out)?;
        writeln!(out, "const uint8_t {}_tile_pals[{}] = {{", name, tile_palettes.len())?;
        writeln!(out, "\t{}", pals.join(", "))?;
        writeln!(out, "}};")?;
    }

    if options.structs {
        writeln!(out)?;
        writeln!(out, "#include \"TilesInfo.h\"")?;
        writeln!(out, "BANKREF({}_tiles_info)", name)?;
        writeln!(out, "const struct TilesInfo {}_tiles_info = {{", name)?;
        writeln!(out, "\t{}, //num tiles", conversion.tiles.len())?;
        writeln!(out, "\t{}_tiles, //tiles", name)?;
        writeln!(out, "\t{}, //num palettes", palette_len(conversion))?;
        writeln!(out, "\t{}_palettes, //palettes", name)?;
        if map.tile_palettes.is_some() {
            writeln!(out, "\t{}_tile_pals, //tile palettes", name)?;
        } else {
            writeln!(out, "\t0 //tile palettes")?;
        }
        writeln!(out, "}};")?;
    }

    grid(out, &format!("{}_map", name), &map.tiles, map.width)?;
    if let Some(attributes) = &map.attributes {
        grid(out, &format!("{}_map_attributes", name), attributes, map.width)?;
    }

    if options.structs {
        let attributes = if map.attributes.is_some() {
            format!("{}_map_attributes", name)
        } else {
            "0".to_string()
        };
        writeln!(out)?;
        writeln!(out, "#include \"MapInfo.h\"")?;
        writeln!(out, "BANKREF_EXTERN({}_tiles_info)", name)?;
        writeln!(out, "const struct MapInfo {} = {{", name)?;
        writeln!(out, "\t{}_map, //map", name)?;
        writeln!(out, "\t{}, //width", map.width)?;
        writeln!(out, "\t{}, //height", map.height)?;
        writeln!(out, "\t{}, //map attributes", attributes)?;
        writeln!(out, "\tBANK({}_tiles_info), //tiles bank", name)?;
        writeln!(out, "\t&{}_tiles_info, //tiles info", name)?;
        writeln!(out, "}};")?;
    }
    Ok(())
}

/// One row of the map per line.
fn grid(out: &mut String, symbol: &str, cells: &[u8], width: u32) -> std::fmt::Result {
    writeln!(out)?;
    writeln!(out, "const unsigned char {}[{}] = {{", symbol, cells.len())?;
    for row in cells.chunks(width.max(1) as usize) {
        write!(out, "\t")?;
        for cell in row {
            write!(out, "0x{:02x},", cell)?;
        }
        writeln!(out)?;
    }
    writeln!(out, "}};")
}

/// Number of colour entries in the palette array.
fn palette_len(conversion: &Conversion) -> usize {
    conversion.palettes().colour_count()
}

/// Number of bytes in the tile array.
fn tiles_len(conversion: &Conversion) -> usize {
    conversion.tiles.len() * conversion.tile_height.byte_len()
}
