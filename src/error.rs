//! # Error Types
//!
//! This module defines error types used throughout the palimpsest library.

use thiserror::Error;

/// Main error type for palimpsest operations
#[derive(Debug, Error)]
pub enum PalimpsestError {
    /// Image data could not be decoded. Fatal for the base image;
    /// overlay layers with bad data are logged and skipped instead.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The barcode renderer rejected the payload (e.g. capacity exceeded)
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Font loading or resolution error
    #[error("Font error: {0}")]
    Font(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
