//! I/O error types
//!
//! Provides a unified error type for PNM decoding, encoding and file
//! access. Header problems are split by kind so callers can tell a
//! malformed file from a short one or an unsupported one.

use thiserror::Error;

/// Error type for image I/O operations.
#[derive(Error, Debug)]
pub enum IoError {
    /// Standard I/O error (file not found, permission denied, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Bad magic number or malformed header token
    #[error("bad file format: {0}")]
    Format(String),

    /// Fewer bytes than the header promises
    #[error("unexpected end of file: {0}")]
    Truncated(String),

    /// Header value outside the supported range
    #[error("value out of range: {0}")]
    Range(String),

    /// An error from the core library (e.g. allocation failure)
    #[error("core error: {0}")]
    Core(#[from] grayline_core::Error),
}

/// Convenience alias for I/O results.
pub type IoResult<T> = Result<T, IoError>;
