//! Grain overlay: randomly placed high-contrast specks.
//!
//! A cheap statistical approximation of film/scan grain, not a physical
//! noise model: a fixed number of 2x2 marks, alternating pure black and pure
//! white, composited with an overlay blend at an alpha proportional to the
//! layer's noise intensity. Specks stay inside the layer's bounding box.
//!
//! Placement comes from the caller's random source, so seeded tests can
//! assert exact positions while production uses a fresh generator per call.

use image::RgbaImage;
use rand::Rng;

use crate::shader::{blend_overlay, lerp, rotate_deg};

/// Number of specks per layer.
pub const SPECK_COUNT: usize = 40;

/// Speck side length in pixels.
pub const SPECK_SIZE: u32 = 2;

/// Scatter specks over the layer's (rotated) bounding box.
///
/// `origin` and `size` describe the layer's box in its local frame (origin
/// at the anchor, see the compositor); `rotation` is in degrees. `intensity`
/// is the style's noise value (0-100); each speck blends at
/// `intensity / 200` alpha.
pub fn speckle(
    image: &mut RgbaImage,
    anchor: (f32, f32),
    origin: (f32, f32),
    size: (f32, f32),
    rotation: f32,
    intensity: f32,
    rng: &mut impl Rng,
) {
    // Keep the full 2x2 mark inside the box
    let span_x = size.0 - SPECK_SIZE as f32;
    let span_y = size.1 - SPECK_SIZE as f32;
    if intensity <= 0.0 || span_x <= 0.0 || span_y <= 0.0 {
        return;
    }
    let alpha = (intensity / 200.0).clamp(0.0, 1.0);
    let (img_w, img_h) = image.dimensions();

    for i in 0..SPECK_COUNT {
        let lx = rng.random_range(origin.0..origin.0 + span_x);
        let ly = rng.random_range(origin.1..origin.1 + span_y);
        let (dx, dy) = rotate_deg(lx, ly, rotation);
        let px = (anchor.0 + dx).floor() as i64;
        let py = (anchor.1 + dy).floor() as i64;
        let speck = if i % 2 == 0 { 0.0 } else { 1.0 };

        for oy in 0..SPECK_SIZE as i64 {
            for ox in 0..SPECK_SIZE as i64 {
                let (x, y) = (px + ox, py + oy);
                if x < 0 || y < 0 || x >= img_w as i64 || y >= img_h as i64 {
                    continue;
                }
                let pixel = image.get_pixel_mut(x as u32, y as u32);
                for c in 0..3 {
                    let base = pixel.0[c] as f32 / 255.0;
                    let blended = blend_overlay(base, speck);
                    pixel.0[c] = (lerp(base, blended, alpha) * 255.0).round() as u8;
                }
            }
        }
    }
}
