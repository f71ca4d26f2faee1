//! Structured credential encoding: freeform extracted fields in, fixed-format
//! AAMVA-style payload string out.
//!
//! Pipeline: [`map::map_candidates`] turns loosely-labeled key/value pairs
//! into a [`record::PartialCredentialRecord`]; [`sanitize::sanitize`]
//! normalizes it into a fully-populated [`record::CredentialRecord`];
//! [`encode::encode`] serializes that record into the payload string handed
//! to the PDF417 renderer ([`crate::barcode`]).
//!
//! The mapper and sanitizer are total - malformed or missing input never
//! fails, it defaults. Only the downstream barcode renderer can reject a
//! payload.

pub mod encode;
pub mod map;
pub mod record;
pub mod sanitize;

pub use encode::encode;
pub use map::{FieldCandidate, map_candidates};
pub use record::{CredentialRecord, PartialCredentialRecord};
pub use sanitize::sanitize;
