//! Error types for PDF generation.
//!
//! Configuration errors (bad font assets, drawing without a font, unknown
//! images, misplaced headers) surface immediately from the call that caused
//! them. Structural errors (an object id that never received a body) surface
//! from [`Document::output`](crate::writer::Document::output).

use std::path::PathBuf;

use crate::fonts::TrueTypeError;

/// Result type alias for PDF generation operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while building a PDF.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A font could not be parsed.
    #[error("Font '{alias}' could not be parsed: {source}")]
    TrueType {
        /// Alias the font was being registered under
        alias: String,
        /// Underlying parser failure
        #[source]
        source: TrueTypeError,
    },

    /// A font file could not be read from disk.
    #[error("Font file {} could not be read: {source}", path.display())]
    FontFile {
        /// Path that was read
        path: PathBuf,
        /// IO failure
        #[source]
        source: std::io::Error,
    },

    /// A font alias was used that was never registered.
    #[error("Unknown font alias: {0}")]
    UnknownFont(String),

    /// Text was drawn before any font was set.
    #[error("No active font: register and select a font before drawing text")]
    NoActiveFont,

    /// An image alias was not known to the image provider.
    #[error("Image not found: {0}")]
    ImageNotFound(String),

    /// Image data handed to the registry could not be understood.
    #[error("Image '{alias}' is invalid: {reason}")]
    InvalidImage {
        /// Alias the image was being registered under
        alias: String,
        /// What was wrong with it
        reason: String,
    },

    /// A header or footer was defined twice.
    #[error("Duplicate {0} definition")]
    DuplicateHeaderFooter(&'static str),

    /// A header was attached after the first page already received content.
    #[error("Header must be attached before content is written to the first page")]
    HeaderAfterContent,

    /// An allocated object id was never given a body.
    #[error("Object {0} was allocated but never given a body")]
    MissingObject(u32),

    /// Invalid caller-supplied configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A flow record could not be decoded.
    #[error("Invalid flow record: {0}")]
    FlowRecord(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
