//! Glyph rasterization for text layers.
//!
//! Renders a string to an anti-aliased f32 coverage buffer (0.0 = empty,
//! 1.0 = fully inked). Two paths:
//!
//! - **Built-in bitmap fonts** (Spleen PSF2): always available, fully
//!   deterministic, scaled by integer factors to approximate the requested
//!   pixel size. Used when the style's font family is empty, `"builtin"`,
//!   or not registered.
//! - **TTF faces** (ab_glyph): registered by the caller per family/weight,
//!   producing smooth anti-aliased coverage at the exact pixel size.
//!
//! Letter spacing is deliberately not applied - glyphs advance by their
//! natural widths (see [`crate::layer::LayerStyle::letter_spacing`]).

use std::collections::HashMap;

use ab_glyph::{Font, FontArc, ScaleFont};
use spleen_font::{FONT_6X12, FONT_8X16, FONT_12X24, PSF2Font};

use crate::error::PalimpsestError;
use crate::layer::LayerStyle;

/// Registered TTF faces, keyed by family name and boldness.
///
/// The built-in bitmap family needs no registration. Resolution falls back
/// from (family, bold) to (family, regular) to the built-in family.
#[derive(Default)]
pub struct FontLibrary {
    faces: HashMap<(String, bool), FontArc>,
}

impl FontLibrary {
    /// A library with only the built-in bitmap family.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a TTF face for a family/weight.
    pub fn register(&mut self, family: impl Into<String>, bold: bool, font: FontArc) {
        self.faces.insert((family.into(), bold), font);
    }

    /// Register a TTF face from raw font bytes.
    pub fn register_bytes(
        &mut self,
        family: impl Into<String>,
        bold: bool,
        bytes: Vec<u8>,
    ) -> Result<(), PalimpsestError> {
        let font = FontArc::try_from_vec(bytes)
            .map_err(|e| PalimpsestError::Font(format!("invalid font data: {}", e)))?;
        self.register(family, bold, font);
        Ok(())
    }

    /// Resolve a family/weight to a registered TTF face, if any.
    fn resolve(&self, family: &str, bold: bool) -> Option<&FontArc> {
        if family.is_empty() || family == "builtin" {
            return None;
        }
        self.faces
            .get(&(family.to_string(), bold))
            .or_else(|| self.faces.get(&(family.to_string(), false)))
    }
}

/// Rendered text as an anti-aliased coverage buffer.
pub struct TextRaster {
    pub width: usize,
    pub height: usize,
    /// Row-major coverage values: 0.0 = empty, 1.0 = fully inked.
    pub coverage: Vec<f32>,
}

/// Render a string with the given style.
///
/// Falls back to the built-in bitmap family when the style's font family is
/// not registered, so text layers always produce output.
pub fn render_text(text: &str, style: &LayerStyle, fonts: &FontLibrary) -> TextRaster {
    match fonts.resolve(&style.font_family, style.bold) {
        Some(font) => render_ttf(text, font, style.font_size),
        None => render_builtin(text, style.font_size, style.bold),
    }
}

/// The Spleen bitmap faces available for the built-in family.
const BUILTIN_FACES: &[(&[u8], usize, usize)] = &[
    (FONT_6X12, 6, 12),
    (FONT_8X16, 8, 16),
    (FONT_12X24, 12, 24),
];

/// Pick the bitmap face and integer scale whose height best matches the
/// requested pixel size.
fn best_builtin(font_size: f32) -> (&'static [u8], usize, usize, usize) {
    let target = font_size.max(1.0);
    let mut best = (BUILTIN_FACES[2].0, 12usize, 24usize, 1usize);
    let mut best_err = f32::INFINITY;
    for &(data, cw, ch) in BUILTIN_FACES {
        for scale in 1..=8usize {
            let err = (ch as f32 * scale as f32 - target).abs();
            if err < best_err {
                best_err = err;
                best = (data, cw, ch, scale);
            }
        }
    }
    best
}

fn render_builtin(text: &str, font_size: f32, bold: bool) -> TextRaster {
    let (data, char_width, char_height, scale) = best_builtin(font_size);
    let chars: Vec<char> = text.chars().collect();
    let advance = char_width * scale;
    // Bold double-strikes one pixel to the right
    let width = (chars.len() * advance + usize::from(bold)).max(1);
    let height = char_height * scale;
    let mut coverage = vec![0.0f32; width * height];

    let mut font = PSF2Font::new(data).unwrap();
    for (i, ch) in chars.iter().enumerate() {
        let cell_x = i * advance;
        let utf8 = ch.to_string();
        let Some(glyph) = font.glyph_for_utf8(utf8.as_bytes()) else {
            continue;
        };
        for (gy, row) in glyph.enumerate() {
            for (gx, on) in row.enumerate() {
                if !on {
                    continue;
                }
                for sy in 0..scale {
                    for sx in 0..scale {
                        let x = cell_x + gx * scale + sx;
                        let y = gy * scale + sy;
                        if x < width && y < height {
                            coverage[y * width + x] = 1.0;
                            if bold && x + 1 < width {
                                coverage[y * width + x + 1] = 1.0;
                            }
                        }
                    }
                }
            }
        }
    }

    TextRaster {
        width,
        height,
        coverage,
    }
}

fn render_ttf(text: &str, font: &FontArc, pixel_height: f32) -> TextRaster {
    let scaled = font.as_scaled(pixel_height);

    // Layout: compute glyph positions
    let mut glyphs = Vec::new();
    let mut caret_x = 0.0f32;
    for ch in text.chars() {
        let glyph_id = font.glyph_id(ch);
        let advance = scaled.h_advance(glyph_id);
        glyphs.push((glyph_id, caret_x));
        caret_x += advance;
    }

    let width = (caret_x.ceil() as usize).max(1);
    let ascent = scaled.ascent();
    let descent = scaled.descent();
    let height = ((ascent - descent).ceil() as usize).max(1);
    let baseline_y = ascent;

    let mut coverage = vec![0.0f32; width * height];
    for &(glyph_id, glyph_x) in &glyphs {
        let glyph = glyph_id
            .with_scale_and_position(pixel_height, ab_glyph::point(glyph_x, baseline_y));
        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|px, py, c| {
                let x = px as i32 + bounds.min.x as i32;
                let y = py as i32 + bounds.min.y as i32;
                if x >= 0 && x < width as i32 && y >= 0 && y < height as i32 {
                    let idx = y as usize * width + x as usize;
                    coverage[idx] = (coverage[idx] + c).min(1.0);
                }
            });
        }
    }

    TextRaster {
        width,
        height,
        coverage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_render_basic() {
        let raster = render_text("HELLO", &LayerStyle::default(), &FontLibrary::new());
        assert!(raster.width > 0);
        assert!(raster.height > 0);
        assert_eq!(raster.coverage.len(), raster.width * raster.height);
        assert!(raster.coverage.iter().any(|&v| v > 0.0));
    }

    #[test]
    fn test_builtin_size_scaling() {
        let mut small = LayerStyle::default();
        small.font_size = 12.0;
        let mut large = LayerStyle::default();
        large.font_size = 48.0;
        let fonts = FontLibrary::new();
        let a = render_text("X", &small, &fonts);
        let b = render_text("X", &large, &fonts);
        assert!(b.height > a.height);
        assert_eq!(a.height, 12);
        assert_eq!(b.height, 48);
    }

    #[test]
    fn test_bold_has_more_ink() {
        let regular = LayerStyle::default();
        let mut bold = LayerStyle::default();
        bold.bold = true;
        let fonts = FontLibrary::new();
        let a = render_text("TEST", &regular, &fonts);
        let b = render_text("TEST", &bold, &fonts);
        let ink = |r: &TextRaster| r.coverage.iter().sum::<f32>();
        assert!(ink(&b) > ink(&a));
    }

    #[test]
    fn test_render_is_deterministic() {
        let style = LayerStyle::default();
        let fonts = FontLibrary::new();
        let a = render_text("DETERMINISM", &style, &fonts);
        let b = render_text("DETERMINISM", &style, &fonts);
        assert_eq!(a.coverage, b.coverage);
    }

    #[test]
    fn test_unregistered_family_falls_back_to_builtin() {
        let mut style = LayerStyle::default();
        style.font_family = "Helvetica Forever".to_string();
        let fonts = FontLibrary::new();
        let raster = render_text("FALLBACK", &style, &fonts);
        assert!(raster.coverage.iter().any(|&v| v > 0.0));
    }

    #[test]
    fn test_best_builtin_prefers_close_heights() {
        let (_, _, ch, scale) = best_builtin(24.0);
        assert_eq!(ch * scale, 24);
        let (_, _, ch, scale) = best_builtin(16.0);
        assert_eq!(ch * scale, 16);
        let (_, _, ch, scale) = best_builtin(48.0);
        assert_eq!(ch * scale, 48);
    }
}
