//! Error types for grayline-core
//!
//! Provides a unified error type for raster construction and access.
//! Each variant captures enough context for diagnostics without exposing
//! internal implementation details.

use thiserror::Error;

/// grayline-core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid image dimensions
    #[error("invalid image dimensions: {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    /// Invalid samples-per-pixel count
    #[error("invalid channel count: {0} (expected 1 or 3)")]
    InvalidChannels(u32),

    /// Operation requires a different channel count
    #[error("channel mismatch: expected {expected} channel(s), got {actual}")]
    ChannelMismatch { expected: u32, actual: u32 },

    /// Sample buffer does not match `width * height * channels`
    #[error("sample count mismatch: expected {expected}, got {actual}")]
    SampleCountMismatch { expected: usize, actual: usize },

    /// Pixel coordinates out of bounds
    #[error("pixel ({x}, {y}) out of bounds for {width}x{height} raster")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Memory allocation failed
    #[error("memory allocation failed ({0} bytes)")]
    AllocationFailed(usize),
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;
