//! PDF417 symbol rasterization.
//!
//! Renders an encoded payload (see [`crate::credential::encode`]) into a
//! raster image suitable for wrapping as an image layer. Capacity overflow
//! is surfaced as [`PalimpsestError::Encoding`] - there is no retry and no
//! automatic resize; callers pick the symbol geometry.

use image::{Rgba, RgbaImage};
use pdf417::{END_PATTERN, PDF417, PDF417Encoder, START_PATTERN};

use crate::error::PalimpsestError;

/// Quiet zone around the symbol, in output pixels.
const QUIET_ZONE: u32 = 10;

/// Symbol geometry and scaling.
///
/// Defaults mirror the layout used for ID-card barcodes: 3x module scale,
/// 15 rows by 5 data columns. Note that a full credential payload does not
/// fit in the default geometry - callers rendering one should widen the
/// symbol or expect [`PalimpsestError::Encoding`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pdf417Options {
    /// Horizontal module width in pixels. Vertical module height is three
    /// times this (standard PDF417 row aspect).
    pub scale: u32,
    pub rows: u8,
    pub columns: u8,
    /// Carried for contract compatibility with the external renderer
    /// interface; this rasterizer never emits a human-readable line.
    pub include_text: bool,
}

impl Default for Pdf417Options {
    fn default() -> Self {
        Self {
            scale: 3,
            rows: 15,
            columns: 5,
            include_text: false,
        }
    }
}

/// Render a payload string as a PDF417 symbol.
///
/// Returns a white image with black modules and a [`QUIET_ZONE`] margin, or
/// [`PalimpsestError::Encoding`] when the payload does not fit the
/// configured geometry.
pub fn render_pdf417(
    payload: &str,
    options: &Pdf417Options,
) -> Result<RgbaImage, PalimpsestError> {
    let rows = options.rows;
    let cols = options.columns;

    // Symbol width in modules:
    // start(17) + left row indicator(17) + data_cols*17 + right row indicator(17) + end(18)
    let width = START_PATTERN.size() as usize
        + 17
        + (cols as usize * 17)
        + 17
        + END_PATTERN.size() as usize;
    let height = rows as usize;

    // Encode the payload into codewords
    let mut codewords = vec![0u16; rows as usize * cols as usize];
    let (level, filled) = PDF417Encoder::new(&mut codewords, false)
        .append_ascii(payload)
        .fit_seal()
        .ok_or_else(|| {
            PalimpsestError::Encoding(format!(
                "payload of {} bytes does not fit a {}x{} PDF417 symbol",
                payload.len(),
                rows,
                cols
            ))
        })?;

    // Render to a module bitmap
    let barcode = PDF417::new(filled, rows, cols, level);
    let mut modules = vec![false; width * height];
    for (i, bit) in barcode.bits().enumerate() {
        if i < modules.len() {
            modules[i] = bit;
        }
    }

    // Scale into pixels with the quiet zone
    let scale_x = options.scale.max(1);
    let scale_y = scale_x * 3;
    let pixel_width = width as u32 * scale_x + 2 * QUIET_ZONE;
    let pixel_height = height as u32 * scale_y + 2 * QUIET_ZONE;

    let mut image = RgbaImage::from_pixel(pixel_width, pixel_height, Rgba([255, 255, 255, 255]));
    for row in 0..height {
        for col in 0..width {
            if !modules[row * width + col] {
                continue;
            }
            for sy in 0..scale_y {
                for sx in 0..scale_x {
                    let px = QUIET_ZONE + col as u32 * scale_x + sx;
                    let py = QUIET_ZONE + row as u32 * scale_y + sy;
                    image.put_pixel(px, py, Rgba([0, 0, 0, 255]));
                }
            }
        }
    }

    Ok(image)
}
