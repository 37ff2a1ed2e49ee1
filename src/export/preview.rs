//! Preview PNG of the quantized image.
//!
//! Every pixel is redrawn from its palette entry, so the preview shows
//! exactly what the hardware will display.

use std::path::Path;

use image::{ImageBuffer, Rgba, RgbaImage};

use crate::error::{AssetError, Result};
use crate::types::{Colour, PixelIndexBuffer};

/// Render the indexed buffer back to RGBA, scaled by an integer factor.
pub fn render_preview(pixels: &PixelIndexBuffer, scale: u32) -> RgbaImage {
    let scale = scale.max(1);
    let mut img: RgbaImage = ImageBuffer::new(pixels.width() * scale, pixels.height() * scale);

    for y in 0..pixels.height() {
        for x in 0..pixels.width() {
            let rgba = Rgba(pixels.colour(x, y).unwrap_or(Colour::TRANSPARENT).to_rgba());

            // Fill scaled pixels
            for sy in 0..scale {
                for sx in 0..scale {
                    img.put_pixel(x * scale + sx, y * scale + sy, rgba);
                }
            }
        }
    }
    img
}

/// Write the preview to a PNG file.
pub fn write_preview(pixels: &PixelIndexBuffer, path: &Path, scale: u32) -> Result<()> {
    render_preview(pixels, scale).save(path).map_err(|e| AssetError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to write PNG: {}", e),
    })
}
