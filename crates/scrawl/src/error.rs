//! Error types for scrawl operations.
//!
//! The boundary policy follows the renderer's contract: layout and export
//! failures are caught where the shell calls in, logged, and leave the
//! previously good visible state unchanged. [`ScrawlError`] is therefore
//! mostly an internal currency; the public handle logs it and returns
//! `None` rather than surfacing a fault.

use std::io;

use thiserror::Error;

/// The main error type for scrawl operations.
#[derive(Debug, Error)]
pub enum ScrawlError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The layout engine rejected the source (malformed or unsupported).
    #[error("Layout error: {message}")]
    Layout { message: String },

    /// Vector or raster serialization failed.
    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error + Send + Sync>),

    /// A configured color string could not be parsed.
    #[error("Invalid color: {0}")]
    InvalidColor(String),
}

impl ScrawlError {
    /// Creates a new `Layout` error from an engine failure message.
    pub fn new_layout_error(message: impl Into<String>) -> Self {
        Self::Layout {
            message: message.into(),
        }
    }
}

impl From<crate::export::Error> for ScrawlError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}
