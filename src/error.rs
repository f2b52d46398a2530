//! Error types for keymap-viz operations.

use std::io;
use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in keymap-viz operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error (file operations, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// PNG encoding error.
    #[error("PNG encoding error: {0}")]
    PngEncoding(#[from] png::EncodingError),

    /// Invalid dimensions for a framebuffer or layer.
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },

    /// Matrix shape inconsistent with the axes it is indexed by.
    #[error("Data shape error: {0}")]
    DataShape(String),

    /// A matrix cell holds a value outside the valid domain.
    #[error("Domain value error: channel {channel} cell [{time_idx}][{key_idx}] = {value} (must be finite and non-negative)")]
    DomainValue {
        /// Channel name the bad cell belongs to.
        channel: &'static str,
        /// Time-bucket index of the bad cell.
        time_idx: usize,
        /// Key-bucket index of the bad cell.
        key_idx: usize,
        /// The offending value.
        value: f64,
    },

    /// Empty data provided where non-empty is required.
    #[error("Empty data provided")]
    EmptyData,

    /// Scale domain error (e.g., degenerate domain).
    #[error("Scale domain error: {0}")]
    ScaleDomain(String),
}
