//! Error types for topology construction and export.

use std::io;

/// Result type alias for topology operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building, transforming or exporting a
/// Topology.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input cannot be decomposed into rings and lines.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// An option has a value (or name) we don't support.
    #[error("unsupported option: {0}")]
    UnsupportedOption(String),

    /// JSON serialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Writing exported text failed.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}
