//! Source image decoding.
//!
//! True-colour images go through the `image` crate. Indexed PNGs are read
//! with the `png` crate directly so palette indices survive untouched.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use image::RgbaImage;

use crate::config::SourceMode;
use crate::error::{AssetError, Result};
use crate::types::{Colour, PaletteTable, PixelIndexBuffer, COLOURS_PER_PALETTE, MAX_PALETTES};

/// A decoded source image.
#[derive(Debug, Clone)]
pub enum SourceImage {
    /// RGBA pixels still to be clustered into palettes.
    TrueColour(RgbaImage),
    /// Pixels already holding `(palette << 2) | colour` indices.
    Indexed(PixelIndexBuffer),
}

impl SourceImage {
    /// Width and height in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            SourceImage::TrueColour(image) => image.dimensions(),
            SourceImage::Indexed(pixels) => (pixels.width(), pixels.height()),
        }
    }
}

/// Load an image file in the given mode.
pub fn load(path: &Path, mode: SourceMode) -> Result<SourceImage> {
    match mode {
        SourceMode::TrueColour => {
            let image = image::open(path)
                .map_err(|e| AssetError::Io {
                    path: path.to_path_buf(),
                    message: format!("Failed to load image: {}", e),
                })?
                .to_rgba8();
            Ok(SourceImage::TrueColour(image))
        }
        SourceMode::Indexed => {
            let file = File::open(path).map_err(|e| AssetError::Io {
                path: path.to_path_buf(),
                message: format!("Failed to open image: {}", e),
            })?;
            read_indexed(BufReader::new(file)).map(SourceImage::Indexed)
        }
    }
}

/// Decode an indexed PNG, keeping its palette order.
///
/// The palette is read as groups of 4 colours (tRNS alpha applied, opaque
/// otherwise). The palette may hold at most 8 groups and pixel indices must
/// stay within it.
pub fn read_indexed<R: Read>(reader: R) -> Result<PixelIndexBuffer> {
    let mut decoder = png::Decoder::new(reader);
    decoder.set_transformations(png::Transformations::IDENTITY);

    let mut png = decoder.read_info().map_err(|e| unsupported(format!("decoder error {}", e)))?;
    let mut buffer = vec![0; png.output_buffer_size()];
    let frame = png
        .next_frame(&mut buffer)
        .map_err(|e| unsupported(format!("decoder error {}", e)))?;

    if frame.color_type != png::ColorType::Indexed {
        return Err(AssetError::UnsupportedSourceFormat {
            message: format!("expected an indexed PNG, found {:?}", frame.color_type),
            help: Some("Indexed mode needs a paletted PNG; drop it to cluster colours instead".to_string()),
        });
    }

    let info = png.info();
    let Some(plte) = info.palette.as_deref() else {
        return Err(unsupported("indexed PNG has no palette".to_string()));
    };
    let trns = info.trns.as_deref().unwrap_or(&[]);

    let entries = plte.len() / 3;
    let max = COLOURS_PER_PALETTE * MAX_PALETTES;
    if entries > max {
        return Err(AssetError::PaletteTooLarge { entries, max });
    }
    let colours: Vec<Colour> = plte
        .chunks_exact(3)
        .enumerate()
        .map(|(i, rgb)| Colour::new(rgb[0], rgb[1], rgb[2], trns.get(i).copied().unwrap_or(255)))
        .collect();

    let indices = unpack_indices(&buffer, frame.width, frame.height, frame.line_size, frame.bit_depth as u8);

    for (i, &index) in indices.iter().enumerate() {
        let (x, y) = (i as u32 % frame.width, i as u32 / frame.width);
        if (index >> 2) as usize >= MAX_PALETTES {
            return Err(AssetError::TooManyPalettes { x, y });
        }
        if index as usize >= entries {
            return Err(unsupported(format!(
                "pixel ({}, {}) uses colour {} but the palette has {} entries",
                x, y, index, entries
            )));
        }
    }

    Ok(PixelIndexBuffer::new(
        frame.width,
        frame.height,
        indices,
        PaletteTable::from_flat(&colours),
    ))
}

/// Expand packed rows of 1, 2, 4 or 8 bit indices to one byte per pixel.
fn unpack_indices(buffer: &[u8], width: u32, height: u32, line_size: usize, depth: u8) -> Vec<u8> {
    let mut indices = Vec::with_capacity(width as usize * height as usize);
    let per_byte = (8 / depth) as usize;
    let mask = ((1u16 << depth) - 1) as u8;

    for row in buffer.chunks(line_size).take(height as usize) {
        for x in 0..width as usize {
            if depth == 8 {
                indices.push(row[x]);
            } else {
                let byte = row[x / per_byte];
                let shift = 8 - depth as usize * (x % per_byte + 1);
                indices.push((byte >> shift) & mask);
            }
        }
    }
    indices
}

fn unsupported(message: String) -> AssetError {
    AssetError::UnsupportedSourceFormat {
        message,
        help: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn encode_indexed(width: u32, height: u32, depth: png::BitDepth, palette: &[u8], trns: &[u8], data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, width, height);
            encoder.set_color(png::ColorType::Indexed);
            encoder.set_depth(depth);
            encoder.set_palette(palette.to_vec());
            if !trns.is_empty() {
                encoder.set_trns(trns.to_vec());
            }
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(data).unwrap();
        }
        out
    }

    fn grey_palette(entries: u8) -> Vec<u8> {
        (0..entries).flat_map(|i| [i, i, i]).collect()
    }

    #[test]
    fn test_read_indexed_8bit() {
        let data: Vec<u8> = (0..64).map(|i| (i % 8) as u8).collect();
        let png = encode_indexed(8, 8, png::BitDepth::Eight, &grey_palette(8), &[0], &data);

        let pixels = read_indexed(Cursor::new(png)).unwrap();

        assert_eq!((pixels.width(), pixels.height()), (8, 8));
        assert_eq!(pixels.index(5, 0), 5);
        assert_eq!(pixels.palette_id(5, 0), 1);
        assert_eq!(pixels.palettes().len(), 2);
        // tRNS only covers entry 0
        assert_eq!(pixels.colour(0, 0), Some(Colour::new(0, 0, 0, 0)));
        assert_eq!(pixels.colour(1, 0), Some(Colour::rgb(1, 1, 1)));
    }

    #[test]
    fn test_read_indexed_2bit() {
        // Two bytes per row: indices 0 1 2 3 3 2 1 0
        let row = [0b0001_1011, 0b1110_0100];
        let data: Vec<u8> = row.iter().copied().cycle().take(16).collect();
        let png = encode_indexed(8, 8, png::BitDepth::Two, &grey_palette(4), &[], &data);

        let pixels = read_indexed(Cursor::new(png)).unwrap();

        let first_row: Vec<u8> = (0..8).map(|x| pixels.index(x, 0)).collect();
        assert_eq!(first_row, vec![0, 1, 2, 3, 3, 2, 1, 0]);
        assert_eq!(pixels.index(7, 7), 0);
    }

    #[test]
    fn test_read_rgb_png_is_unsupported() {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, 8, 8);
            encoder.set_color(png::ColorType::Rgb);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(&[0; 8 * 8 * 3]).unwrap();
        }

        let err = read_indexed(Cursor::new(out)).unwrap_err();
        assert!(matches!(err, AssetError::UnsupportedSourceFormat { .. }));
    }

    #[test]
    fn test_read_indexed_rejects_ninth_palette() {
        let mut data = vec![0u8; 64];
        data[10] = 33; // palette 8
        let png = encode_indexed(8, 8, png::BitDepth::Eight, &grey_palette(32), &[], &data);

        let err = read_indexed(Cursor::new(png)).unwrap_err();
        assert!(matches!(err, AssetError::TooManyPalettes { x: 2, y: 1 }));
    }

    #[test]
    fn test_read_indexed_rejects_oversized_palette() {
        // Only entry 1 is used, but the PLTE holds 10 groups
        let data = vec![1u8; 64];
        let png = encode_indexed(8, 8, png::BitDepth::Eight, &grey_palette(40), &[], &data);

        let err = read_indexed(Cursor::new(png)).unwrap_err();
        assert!(matches!(err, AssetError::PaletteTooLarge { entries: 40, max: 32 }));
        assert!(err.is_capacity_exceeded());
    }

    #[test]
    fn test_unpack_4bit() {
        let buffer = [0x12, 0x34];
        assert_eq!(unpack_indices(&buffer, 4, 1, 2, 4), vec![1, 2, 3, 4]);
    }
}
