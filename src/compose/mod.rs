//! The layer compositor.
//!
//! Deterministically rasterizes an ordered list of text/image overlays onto
//! a base image. Each layer is rendered into a local premultiplied-RGBA
//! scratch buffer, optionally blurred, then drawn onto the output rotated
//! about its anchor with the style's opacity, and finally speckled with
//! grain. Later layers draw on top of earlier ones.
//!
//! The layer list is treated as an immutable snapshot for the duration of a
//! call; there is no shared state between calls. With zero noise on every
//! layer the output is a pure function of its inputs.

pub mod blur;
pub mod noise;
pub mod text;

pub use text::{FontLibrary, TextRaster};

use image::{DynamicImage, RgbaImage, imageops::FilterType};
use rand::Rng;
use tracing::warn;

use crate::error::PalimpsestError;
use crate::image_data;
use crate::layer::{Layer, LayerContent, TextAlign};
use crate::shader::rotate_deg;

/// Padding around the measured text box when a background mask is drawn.
const MASK_PADDING: usize = 4;

/// Composite layers over an already-decoded base image.
///
/// Never fails: layers whose image data cannot be decoded are logged and
/// skipped so one bad layer cannot abort the whole composite. Grain
/// placement uses a fresh random source; use [`composite_with_rng`] for
/// reproducible output.
pub fn composite(base: &DynamicImage, layers: &[Layer], fonts: &FontLibrary) -> RgbaImage {
    composite_with_rng(base, layers, fonts, &mut rand::rng())
}

/// [`composite`] with an explicit random source for grain placement.
pub fn composite_with_rng(
    base: &DynamicImage,
    layers: &[Layer],
    fonts: &FontLibrary,
    rng: &mut impl Rng,
) -> RgbaImage {
    let mut out = base.to_rgba8();
    for layer in layers {
        draw_layer(&mut out, layer, fonts, rng);
    }
    out
}

/// Composite layers over an encoded base image payload.
///
/// Fails with [`PalimpsestError::Decode`] if the *base* cannot be decoded;
/// overlay decode failures are still non-fatal.
pub fn composite_data(
    base_data: &str,
    layers: &[Layer],
    fonts: &FontLibrary,
) -> Result<RgbaImage, PalimpsestError> {
    let base = image_data::decode(base_data)?;
    Ok(composite(&base, layers, fonts))
}

/// A layer rendered into its local coordinate frame.
///
/// `data` is interleaved premultiplied RGBA. `origin` is the local-frame
/// position of the buffer's top-left texel (the anchor is the local origin).
struct Scratch {
    width: usize,
    height: usize,
    origin: (f32, f32),
    data: Vec<f32>,
}

fn draw_layer(out: &mut RgbaImage, layer: &Layer, fonts: &FontLibrary, rng: &mut impl Rng) {
    let (base_w, base_h) = out.dimensions();
    let anchor = (
        layer.x / 100.0 * base_w as f32,
        layer.y / 100.0 * base_h as f32,
    );
    let rotation = layer.style.normalized_rotation();
    let opacity = layer.style.opacity.clamp(0.0, 1.0);

    let Some(mut scratch) = build_scratch(layer, base_w, base_h, fonts) else {
        return;
    };

    // Grain covers the layer's box, not the blur-padded one
    let grain_origin = scratch.origin;
    let grain_size = (scratch.width as f32, scratch.height as f32);

    if layer.style.blur > 0.0 {
        pad_scratch(&mut scratch, (layer.style.blur * 2.0).ceil() as usize);
        blur::gaussian_blur(
            &mut scratch.data,
            scratch.width,
            scratch.height,
            layer.style.blur,
        );
    }

    draw_scratch(out, &scratch, anchor, rotation, opacity);

    if layer.style.noise > 0.0 {
        noise::speckle(
            out,
            anchor,
            grain_origin,
            grain_size,
            rotation,
            layer.style.noise,
            rng,
        );
    }
}

/// Render a layer into its local scratch buffer, or `None` when there is
/// nothing to draw (empty text, zero-size or undecodable image).
fn build_scratch(
    layer: &Layer,
    base_w: u32,
    base_h: u32,
    fonts: &FontLibrary,
) -> Option<Scratch> {
    match &layer.content {
        LayerContent::Image { data } => {
            let w = (layer.width.max(0.0) / 100.0 * base_w as f32).round() as u32;
            let h = (layer.height.max(0.0) / 100.0 * base_h as f32).round() as u32;
            if w == 0 || h == 0 {
                return None;
            }
            let source = match image_data::decode(data) {
                Ok(img) => img,
                Err(e) => {
                    warn!(layer_id = %layer.id, error = %e, "skipping undecodable image layer");
                    return None;
                }
            };
            let resized = source.resize_exact(w, h, FilterType::Lanczos3).to_rgba8();
            let mut buf = vec![0.0f32; (w * h) as usize * 4];
            for (i, pixel) in resized.pixels().enumerate() {
                let a = pixel.0[3] as f32 / 255.0;
                buf[i * 4] = pixel.0[0] as f32 / 255.0 * a;
                buf[i * 4 + 1] = pixel.0[1] as f32 / 255.0 * a;
                buf[i * 4 + 2] = pixel.0[2] as f32 / 255.0 * a;
                buf[i * 4 + 3] = a;
            }
            Some(Scratch {
                width: w as usize,
                height: h as usize,
                // Drawn centered on the anchor
                origin: (-(w as f32) / 2.0, -(h as f32) / 2.0),
                data: buf,
            })
        }
        LayerContent::Text { text } => {
            if text.is_empty() {
                return None;
            }
            let raster = text::render_text(text, &layer.style, fonts);
            if raster.width == 0 || raster.height == 0 {
                return None;
            }
            let pad = if layer.style.background_mask.is_some() {
                MASK_PADDING
            } else {
                0
            };
            let w = raster.width + 2 * pad;
            let h = raster.height + 2 * pad;
            let mut buf = vec![0.0f32; w * h * 4];

            if let Some(mask) = layer.style.background_mask {
                let a = mask.a as f32 / 255.0;
                let fill = [
                    mask.r as f32 / 255.0 * a,
                    mask.g as f32 / 255.0 * a,
                    mask.b as f32 / 255.0 * a,
                    a,
                ];
                for chunk in buf.chunks_exact_mut(4) {
                    chunk.copy_from_slice(&fill);
                }
            }

            let color = layer.style.color;
            let color_a = color.a as f32 / 255.0;
            for y in 0..raster.height {
                for x in 0..raster.width {
                    let coverage = raster.coverage[y * raster.width + x];
                    if coverage <= 0.0 {
                        continue;
                    }
                    let a = coverage * color_a;
                    let src = [
                        color.r as f32 / 255.0 * a,
                        color.g as f32 / 255.0 * a,
                        color.b as f32 / 255.0 * a,
                        a,
                    ];
                    let idx = ((y + pad) * w + x + pad) * 4;
                    over(&mut buf[idx..idx + 4], src);
                }
            }

            // Horizontal placement relative to the anchor; vertically the
            // glyph box is centered so the anchor is the visual middle.
            let text_x0 = match layer.style.text_align {
                TextAlign::Left => 0.0,
                TextAlign::Center => -(raster.width as f32) / 2.0,
                TextAlign::Right => -(raster.width as f32),
            };
            Some(Scratch {
                width: w,
                height: h,
                origin: (
                    text_x0 - pad as f32,
                    -(raster.height as f32) / 2.0 - pad as f32,
                ),
                data: buf,
            })
        }
    }
}

/// Premultiplied source-over: `dst = src + dst * (1 - src.a)`.
#[inline]
fn over(dst: &mut [f32], src: [f32; 4]) {
    let inv = 1.0 - src[3];
    for c in 0..4 {
        dst[c] = src[c] + dst[c] * inv;
    }
}

/// Grow the scratch buffer by a transparent margin so blur can bleed past
/// the original content bounds.
fn pad_scratch(scratch: &mut Scratch, pad: usize) {
    if pad == 0 {
        return;
    }
    let w = scratch.width + 2 * pad;
    let h = scratch.height + 2 * pad;
    let mut data = vec![0.0f32; w * h * 4];
    for y in 0..scratch.height {
        let src = y * scratch.width * 4;
        let dst = ((y + pad) * w + pad) * 4;
        data[dst..dst + scratch.width * 4]
            .copy_from_slice(&scratch.data[src..src + scratch.width * 4]);
    }
    scratch.width = w;
    scratch.height = h;
    scratch.origin.0 -= pad as f32;
    scratch.origin.1 -= pad as f32;
    scratch.data = data;
}

/// Draw a scratch buffer onto the output, rotated about the anchor and
/// faded by `opacity`. Uses inverse mapping with bilinear sampling.
fn draw_scratch(
    out: &mut RgbaImage,
    scratch: &Scratch,
    anchor: (f32, f32),
    rotation: f32,
    opacity: f32,
) {
    if opacity <= 0.0 {
        return;
    }
    let (base_w, base_h) = out.dimensions();

    // Axis-aligned destination bounds of the rotated scratch rectangle
    let corners = [
        (0.0, 0.0),
        (scratch.width as f32, 0.0),
        (0.0, scratch.height as f32),
        (scratch.width as f32, scratch.height as f32),
    ];
    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut max_y = f32::NEG_INFINITY;
    for (cx, cy) in corners {
        let (rx, ry) = rotate_deg(scratch.origin.0 + cx, scratch.origin.1 + cy, rotation);
        min_x = min_x.min(anchor.0 + rx);
        max_x = max_x.max(anchor.0 + rx);
        min_y = min_y.min(anchor.1 + ry);
        max_y = max_y.max(anchor.1 + ry);
    }

    let x0 = min_x.floor().max(0.0) as u32;
    let y0 = min_y.floor().max(0.0) as u32;
    let x1 = (max_x.ceil().min(base_w as f32 - 1.0)).max(0.0) as u32;
    let y1 = (max_y.ceil().min(base_h as f32 - 1.0)).max(0.0) as u32;
    if min_x >= base_w as f32 || min_y >= base_h as f32 || max_x < 0.0 || max_y < 0.0 {
        return;
    }

    for py in y0..=y1 {
        for px in x0..=x1 {
            // Destination pixel center back into the local frame
            let (lx, ly) = rotate_deg(
                px as f32 + 0.5 - anchor.0,
                py as f32 + 0.5 - anchor.1,
                -rotation,
            );
            let sx = lx - scratch.origin.0 - 0.5;
            let sy = ly - scratch.origin.1 - 0.5;
            let mut src = sample_bilinear(scratch, sx, sy);
            if src[3] <= 0.0 {
                continue;
            }
            for c in &mut src {
                *c *= opacity;
            }

            let pixel = out.get_pixel_mut(px, py);
            let da = pixel.0[3] as f32 / 255.0;
            let mut dst = [
                pixel.0[0] as f32 / 255.0 * da,
                pixel.0[1] as f32 / 255.0 * da,
                pixel.0[2] as f32 / 255.0 * da,
                da,
            ];
            over(&mut dst, src);
            let a = dst[3];
            if a > 0.0 {
                pixel.0[0] = (dst[0] / a * 255.0).round().clamp(0.0, 255.0) as u8;
                pixel.0[1] = (dst[1] / a * 255.0).round().clamp(0.0, 255.0) as u8;
                pixel.0[2] = (dst[2] / a * 255.0).round().clamp(0.0, 255.0) as u8;
                pixel.0[3] = (a * 255.0).round().clamp(0.0, 255.0) as u8;
            } else {
                pixel.0 = [0, 0, 0, 0];
            }
        }
    }
}

/// Bilinear sample of a premultiplied scratch buffer in texel coordinates.
/// Out-of-bounds taps are transparent.
fn sample_bilinear(scratch: &Scratch, x: f32, y: f32) -> [f32; 4] {
    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;
    let fx = x - x0 as f32;
    let fy = y - y0 as f32;

    let texel = |tx: i64, ty: i64| -> [f32; 4] {
        if tx < 0 || ty < 0 || tx >= scratch.width as i64 || ty >= scratch.height as i64 {
            return [0.0; 4];
        }
        let idx = (ty as usize * scratch.width + tx as usize) * 4;
        [
            scratch.data[idx],
            scratch.data[idx + 1],
            scratch.data[idx + 2],
            scratch.data[idx + 3],
        ]
    };

    let t00 = texel(x0, y0);
    let t10 = texel(x0 + 1, y0);
    let t01 = texel(x0, y0 + 1);
    let t11 = texel(x0 + 1, y0 + 1);

    let mut result = [0.0f32; 4];
    for c in 0..4 {
        let top = t00[c] * (1.0 - fx) + t10[c] * fx;
        let bottom = t01[c] * (1.0 - fx) + t11[c] * fx;
        result[c] = top * (1.0 - fy) + bottom * fy;
    }
    result
}
