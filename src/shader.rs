//! Pixel-math primitives shared by the compositor and the grain overlay.
//!
//! Values are intensities in [0.0, 1.0]. These mirror common fragment-shader
//! operations and are kept free of any image-buffer knowledge.

use std::f32::consts::PI;

/// Linear interpolation between two values.
///
/// Returns `a` when `t=0`, `b` when `t=1`, and linear blend in between.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Overlay blend - increases contrast, combines multiply and screen.
///
/// Dark base values are multiplied toward black, light base values are
/// screened toward white.
#[inline]
pub fn blend_overlay(base: f32, blend: f32) -> f32 {
    if base < 0.5 {
        2.0 * base * blend
    } else {
        1.0 - 2.0 * (1.0 - base) * (1.0 - blend)
    }
}

/// Rotate a point around the origin.
///
/// `angle` is in radians. Positive angles rotate clockwise in raster
/// coordinates (y pointing down), matching 2D canvas rotation.
#[inline]
pub fn rotate(x: f32, y: f32, angle: f32) -> (f32, f32) {
    let cos_a = angle.cos();
    let sin_a = angle.sin();
    (x * cos_a - y * sin_a, x * sin_a + y * cos_a)
}

/// Rotate a point around the origin (angle in degrees).
#[inline]
pub fn rotate_deg(x: f32, y: f32, angle_deg: f32) -> (f32, f32) {
    rotate(x, y, angle_deg * PI / 180.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints() {
        assert!((lerp(0.2, 0.8, 0.0) - 0.2).abs() < 1e-6);
        assert!((lerp(0.2, 0.8, 1.0) - 0.8).abs() < 1e-6);
        assert!((lerp(0.0, 1.0, 0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_blend_overlay_extremes() {
        // Overlay is an identity on pure black and pure white bases
        assert!((blend_overlay(0.0, 1.0) - 0.0).abs() < 1e-6);
        assert!((blend_overlay(1.0, 0.0) - 1.0).abs() < 1e-6);
        // Mid-gray base is pushed all the way by extreme blends
        assert!((blend_overlay(0.5, 0.0) - 0.0).abs() < 1e-6);
        assert!((blend_overlay(0.5, 1.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_rotate_deg_quarter_turn() {
        // Clockwise quarter turn in y-down coordinates: +x maps to +y
        let (x, y) = rotate_deg(1.0, 0.0, 90.0);
        assert!(x.abs() < 1e-6);
        assert!((y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_rotate_full_turn_is_identity() {
        let (x, y) = rotate_deg(0.3, -0.7, 360.0);
        assert!((x - 0.3).abs() < 1e-5);
        assert!((y + 0.7).abs() < 1e-5);
    }
}
