//! Decoding of layer image payloads.
//!
//! Layers reference their image content as a string: either a
//! `data:image/...;base64,` URI (the format the editing session produces) or
//! a bare base64 payload. This module turns those into pixel buffers and
//! provides the reverse direction for baking rendered images back into
//! layer content.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::{DynamicImage, ImageFormat, RgbaImage};

use crate::error::PalimpsestError;

/// Decode a base64 or data-URI image payload into pixels.
///
/// Accepts `data:<mime>;base64,<payload>` URIs and bare base64 strings.
/// Any failure (malformed base64, unsupported or truncated image data)
/// is reported as [`PalimpsestError::Decode`].
pub fn decode(data: &str) -> Result<DynamicImage, PalimpsestError> {
    let payload = match data.strip_prefix("data:") {
        Some(rest) => rest
            .split_once(";base64,")
            .map(|(_, b64)| b64)
            .ok_or_else(|| {
                PalimpsestError::Decode("data URI is not base64-encoded".to_string())
            })?,
        None => data,
    };

    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| PalimpsestError::Decode(format!("invalid base64 payload: {}", e)))?;

    image::load_from_memory(&bytes)
        .map_err(|e| PalimpsestError::Decode(format!("failed to decode image: {}", e)))
}

/// Encode a raster image as a PNG data URI.
///
/// Used to wrap rendered output (e.g. a barcode symbol) back into layer
/// content the session can position and composite like any other image.
pub fn encode_data_uri(image: &RgbaImage) -> Result<String, PalimpsestError> {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(image.clone())
        .write_to(&mut std::io::Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| PalimpsestError::Decode(format!("failed to encode PNG: {}", e)))?;
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(&bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn checker(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            if (x + y) % 2 == 0 {
                Rgba([255, 255, 255, 255])
            } else {
                Rgba([0, 0, 0, 255])
            }
        })
    }

    #[test]
    fn test_round_trip_data_uri() {
        let img = checker(8, 6);
        let uri = encode_data_uri(&img).unwrap();
        assert!(uri.starts_with("data:image/png;base64,"));

        let decoded = decode(&uri).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (8, 6));
        assert_eq!(decoded, img);
    }

    #[test]
    fn test_bare_base64_accepted() {
        let uri = encode_data_uri(&checker(4, 4)).unwrap();
        let bare = uri.strip_prefix("data:image/png;base64,").unwrap();
        let decoded = decode(bare).unwrap();
        assert_eq!(decoded.width(), 4);
    }

    #[test]
    fn test_invalid_base64_rejected() {
        let err = decode("data:image/png;base64,@@not-base64@@").unwrap_err();
        assert!(matches!(err, PalimpsestError::Decode(_)));
    }

    #[test]
    fn test_non_base64_uri_rejected() {
        let err = decode("data:image/png,rawbytes").unwrap_err();
        assert!(matches!(err, PalimpsestError::Decode(_)));
    }

    #[test]
    fn test_garbage_image_bytes_rejected() {
        let garbage = STANDARD.encode(b"this is not an image");
        let err = decode(&garbage).unwrap_err();
        assert!(matches!(err, PalimpsestError::Decode(_)));
    }
}
