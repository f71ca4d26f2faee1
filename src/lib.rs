//! # Palimpsest - Layered Document Image Toolkit
//!
//! Palimpsest is a Rust library for flattening layered document mockups and
//! encoding machine-readable credential data. It provides:
//!
//! - **Layer compositing**: rasterize ordered text/image overlays onto a
//!   base image, with rotation, blur, opacity, masks, and grain
//! - **Credential encoding**: map loosely labeled fields into a structured
//!   record, sanitize it, and serialize it as a driver-license-style
//!   delimited payload
//! - **Barcode rendering**: PDF417 symbol rasterization for encoded payloads
//! - **Text rendering**: built-in deterministic bitmap fonts plus optional
//!   registered TTF faces
//!
//! ## Quick Start
//!
//! ```no_run
//! use palimpsest::{
//!     compose::{self, FontLibrary},
//!     credential::{self, FieldCandidate},
//!     barcode::{render_pdf417, Pdf417Options},
//!     image_data,
//!     layer::Layer,
//! };
//!
//! // Map raw labeled fields into a credential record
//! let candidates = vec![
//!     FieldCandidate::new("FIRST NAME", "Jane"),
//!     FieldCandidate::new("DOB", "1990-01-15"),
//!     FieldCandidate::new("DL NO", "WDL123456"),
//! ];
//! let record = credential::sanitize(&credential::map_candidates(&candidates));
//! let payload = credential::encode(&record);
//!
//! // Render the payload as a PDF417 barcode image layer
//! let symbol = render_pdf417(&payload, &Pdf417Options { rows: 30, columns: 12, ..Default::default() })?;
//! let barcode_layer = Layer::image(image_data::encode_data_uri(&symbol)?, 50.0, 80.0, 40.0, 15.0);
//!
//! // Composite onto a base image
//! let base = image_data::decode("data:image/png;base64,...")?;
//! let flat = compose::composite(&base, &[barcode_layer], &FontLibrary::new());
//!
//! # Ok::<(), palimpsest::error::PalimpsestError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`compose`] | Layer compositor (text, blur, grain) |
//! | [`credential`] | Field mapping, sanitizing, payload encoding |
//! | [`barcode`] | PDF417 rasterization |
//! | [`layer`] | Layer and style types |
//! | [`image_data`] | Base64 data URI decode/encode |
//! | [`shader`] | Blend and transform primitives |
//! | [`error`] | Error types |

pub mod barcode;
pub mod compose;
pub mod credential;
pub mod error;
pub mod image_data;
pub mod layer;
pub mod shader;

pub use barcode::{Pdf417Options, render_pdf417};
pub use compose::{FontLibrary, composite, composite_data, composite_with_rng};
pub use credential::{
    CredentialRecord, FieldCandidate, PartialCredentialRecord, encode, map_candidates, sanitize,
};
pub use error::PalimpsestError;
pub use layer::{Color, Layer, LayerContent, LayerStyle, TextAlign};
