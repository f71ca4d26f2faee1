//! The layer model: positioned text and image overlays.
//!
//! All types derive `Serialize + Deserialize` so the same types work for
//! both Rust API construction and JSON interchange with the editing session.
//!
//! Coordinates are percentages of the base image's pixel dimensions, and the
//! anchor `(x, y)` is the **center** of the layer's bounding box, not its
//! top-left corner. List order defines paint order: later layers draw on top.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An RGBA color, parsed from `#rgb`, `#rrggbb` or `#rrggbbaa` hex strings.
///
/// Serializes back to `#rrggbbaa` so colors round-trip through JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a hex color string: `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn parse(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#')?;
        match hex.len() {
            3 => {
                let v = u16::from_str_radix(hex, 16).ok()?;
                let r = ((v >> 8) & 0xf) as u8;
                let g = ((v >> 4) & 0xf) as u8;
                let b = (v & 0xf) as u8;
                Some(Self::rgb(r << 4 | r, g << 4 | g, b << 4 | b))
            }
            6 => {
                let v = u32::from_str_radix(hex, 16).ok()?;
                Some(Self::rgb((v >> 16) as u8, (v >> 8) as u8, v as u8))
            }
            8 => {
                let v = u32::from_str_radix(hex, 16).ok()?;
                Some(Self::rgba(
                    (v >> 24) as u8,
                    (v >> 16) as u8,
                    (v >> 8) as u8,
                    v as u8,
                ))
            }
            _ => None,
        }
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Color::parse(&s).ok_or_else(|| format!("invalid hex color '{}'", s))
    }
}

impl From<Color> for String {
    fn from(c: Color) -> String {
        format!("#{:02x}{:02x}{:02x}{:02x}", c.r, c.g, c.b, c.a)
    }
}

/// Horizontal text alignment relative to the anchor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    /// Text begins at the anchor.
    Left,
    /// Text is centered on the anchor.
    #[default]
    Center,
    /// Text ends at the anchor.
    Right,
}

/// What a layer draws: a literal string or decodable image data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayerContent {
    /// A text overlay. The string is rendered with the layer's style.
    Text { text: String },
    /// An image overlay. `data` is a base64 / data-URI image payload
    /// (see [`crate::image_data::decode`]).
    Image { data: String },
}

/// Style attributes for a layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerStyle {
    /// Font family for text layers. Empty or `"builtin"` selects the
    /// built-in bitmap family; anything else must be registered in the
    /// [`FontLibrary`](crate::compose::FontLibrary).
    #[serde(default)]
    pub font_family: String,
    /// Font size in pixels of the base image.
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    #[serde(default)]
    pub bold: bool,
    /// Text color.
    #[serde(default = "default_color")]
    pub color: Color,
    /// Optional opaque fill drawn behind the measured text box, used to
    /// occlude original content before overlaying replacement text.
    #[serde(default)]
    pub background_mask: Option<Color>,
    /// Declared letter spacing in pixels. Carried for session round-tripping
    /// but **not** applied by the rasterizer - glyphs advance by their
    /// natural widths.
    #[serde(default)]
    pub letter_spacing: f32,
    /// Compositing alpha, clamped to [0, 1] at composite time.
    #[serde(default = "default_opacity")]
    pub opacity: f32,
    /// Rotation in degrees about the anchor, clockwise-positive. The UI
    /// produces [-180, 180] but any real value is accepted and normalized.
    #[serde(default)]
    pub rotation: f32,
    #[serde(default)]
    pub text_align: TextAlign,
    /// Blur radius in pixels, simulating scan/print softness.
    #[serde(default)]
    pub blur: f32,
    /// Grain intensity, 0-100. See [`crate::compose::noise`].
    #[serde(default)]
    pub noise: f32,
}

fn default_font_size() -> f32 {
    16.0
}

fn default_color() -> Color {
    Color::BLACK
}

fn default_opacity() -> f32 {
    1.0
}

impl Default for LayerStyle {
    fn default() -> Self {
        Self {
            font_family: String::new(),
            font_size: default_font_size(),
            bold: false,
            color: Color::BLACK,
            background_mask: None,
            letter_spacing: 0.0,
            opacity: 1.0,
            rotation: 0.0,
            text_align: TextAlign::default(),
            blur: 0.0,
            noise: 0.0,
        }
    }
}

impl LayerStyle {
    /// Rotation normalized into [0, 360).
    pub fn normalized_rotation(&self) -> f32 {
        self.rotation.rem_euclid(360.0)
    }
}

/// A positioned overlay element.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer {
    pub id: Uuid,
    #[serde(flatten)]
    pub content: LayerContent,
    /// Anchor x as a percentage (0-100) of the base image width.
    pub x: f32,
    /// Anchor y as a percentage (0-100) of the base image height.
    pub y: f32,
    /// Width as a percentage of the base image width (image layers).
    #[serde(default)]
    pub width: f32,
    /// Height as a percentage of the base image height (image layers).
    #[serde(default)]
    pub height: f32,
    #[serde(default)]
    pub style: LayerStyle,
    /// Free-form metadata from the editing session; not interpreted here.
    #[serde(default)]
    pub label: Option<String>,
}

impl Layer {
    /// Create a text layer anchored at `(x, y)` percent.
    pub fn text(text: impl Into<String>, x: f32, y: f32) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: LayerContent::Text { text: text.into() },
            x,
            y,
            width: 0.0,
            height: 0.0,
            style: LayerStyle::default(),
            label: None,
        }
    }

    /// Create an image layer anchored at `(x, y)` percent with the given
    /// size in percent of the base dimensions.
    pub fn image(data: impl Into<String>, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: LayerContent::Image { data: data.into() },
            x,
            y,
            width,
            height,
            style: LayerStyle::default(),
            label: None,
        }
    }

    /// Builder-style style override.
    pub fn with_style(mut self, style: LayerStyle) -> Self {
        self.style = style;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_color_parse_forms() {
        assert_eq!(Color::parse("#000000"), Some(Color::BLACK));
        assert_eq!(Color::parse("#fff"), Some(Color::WHITE));
        assert_eq!(Color::parse("#11223344"), Some(Color::rgba(0x11, 0x22, 0x33, 0x44)));
        assert_eq!(Color::parse("red"), None);
        assert_eq!(Color::parse("#12345"), None);
    }

    #[test]
    fn test_color_serde_round_trip() {
        let c = Color::rgba(1, 2, 3, 200);
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, "\"#010203c8\"");
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn test_rotation_normalization() {
        let mut style = LayerStyle::default();
        style.rotation = -90.0;
        assert_eq!(style.normalized_rotation(), 270.0);
        style.rotation = 450.0;
        assert_eq!(style.normalized_rotation(), 90.0);
        style.rotation = 0.0;
        assert_eq!(style.normalized_rotation(), 0.0);
    }

    #[test]
    fn test_layer_json_shape() {
        let json = r##"{
            "id": "00000000-0000-0000-0000-000000000001",
            "kind": "text",
            "text": "JOHN DOE",
            "x": 40.0,
            "y": 25.5,
            "style": { "font_size": 18.0, "color": "#102030" }
        }"##;
        let layer: Layer = serde_json::from_str(json).unwrap();
        match &layer.content {
            LayerContent::Text { text } => assert_eq!(text, "JOHN DOE"),
            _ => panic!("expected text layer"),
        }
        assert_eq!(layer.style.font_size, 18.0);
        assert_eq!(layer.style.color, Color::rgb(0x10, 0x20, 0x30));
        // Defaults fill in the rest
        assert_eq!(layer.style.opacity, 1.0);
        assert_eq!(layer.width, 0.0);
    }

    #[test]
    fn test_layer_round_trip() {
        let layer = Layer::image("data:image/png;base64,AAAA", 50.0, 50.0, 20.0, 10.0);
        let json = serde_json::to_string(&layer).unwrap();
        let back: Layer = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, layer.id);
        assert_eq!(back.width, 20.0);
        match back.content {
            LayerContent::Image { ref data } => assert!(data.starts_with("data:image/png")),
            _ => panic!("expected image layer"),
        }
    }
}
