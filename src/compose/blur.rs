//! Gaussian-like blur for layer scratch buffers.
//!
//! Three successive box blurs approximate a Gaussian closely enough for
//! simulated scan softness. The radius follows CSS `blur()` semantics
//! (sigma is half the radius). Buffers are interleaved premultiplied RGBA,
//! so blurring all four channels uniformly keeps edges halo-free.

/// Blur an interleaved premultiplied RGBA f32 buffer in place.
pub fn gaussian_blur(data: &mut [f32], width: usize, height: usize, radius: f32) {
    if radius <= 0.0 || width == 0 || height == 0 {
        return;
    }
    debug_assert_eq!(data.len(), width * height * 4);

    let sigma = radius * 0.5;
    let mut scratch = vec![0.0f32; data.len()];
    for r in box_radii(sigma) {
        if r == 0 {
            continue;
        }
        box_blur_horizontal(data, &mut scratch, width, height, r);
        box_blur_vertical(&scratch, data, width, height, r);
    }
}

/// Box radii for a 3-pass approximation of a Gaussian with the given sigma.
fn box_radii(sigma: f32) -> [usize; 3] {
    const N: f32 = 3.0;
    let w_ideal = (12.0 * sigma * sigma / N + 1.0).sqrt();
    let mut wl = w_ideal.floor() as i64;
    if wl % 2 == 0 {
        wl -= 1;
    }
    let wl = wl.max(1);
    let wu = wl + 2;
    let m_ideal = (12.0 * sigma * sigma - N * (wl * wl) as f32 - 4.0 * N * wl as f32 - 3.0 * N)
        / (-4.0 * wl as f32 - 4.0);
    let m = m_ideal.round() as i64;

    let mut radii = [0usize; 3];
    for (i, slot) in radii.iter_mut().enumerate() {
        let w = if (i as i64) < m { wl } else { wu };
        *slot = ((w - 1) / 2) as usize;
    }
    radii
}

fn box_blur_horizontal(src: &[f32], dst: &mut [f32], width: usize, height: usize, r: usize) {
    for y in 0..height {
        let row = y * width;
        for x in 0..width {
            let lo = x.saturating_sub(r);
            let hi = (x + r).min(width - 1);
            let norm = 1.0 / (hi - lo + 1) as f32;
            let mut acc = [0.0f32; 4];
            for sx in lo..=hi {
                let p = (row + sx) * 4;
                for c in 0..4 {
                    acc[c] += src[p + c];
                }
            }
            let q = (row + x) * 4;
            for c in 0..4 {
                dst[q + c] = acc[c] * norm;
            }
        }
    }
}

fn box_blur_vertical(src: &[f32], dst: &mut [f32], width: usize, height: usize, r: usize) {
    for x in 0..width {
        for y in 0..height {
            let lo = y.saturating_sub(r);
            let hi = (y + r).min(height - 1);
            let norm = 1.0 / (hi - lo + 1) as f32;
            let mut acc = [0.0f32; 4];
            for sy in lo..=hi {
                let p = (sy * width + x) * 4;
                for c in 0..4 {
                    acc[c] += src[p + c];
                }
            }
            let q = (y * width + x) * 4;
            for c in 0..4 {
                dst[q + c] = acc[c] * norm;
            }
        }
    }
}
