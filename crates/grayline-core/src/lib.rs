//! grayline-core - Basic data structures for the grayscale pipeline
//!
//! This crate provides the data model shared by every pipeline stage:
//!
//! - [`Raster`] / [`RasterMut`] - The 8-bit image container (shared / exclusive)
//! - [`Channels`] - Samples per pixel (gray or interleaved RGB)
//! - [`Histogram`] - 256-bin intensity histogram of a gray raster
//! - [`Lut`] - 256-entry lookup table for point transforms
//!
//! It also defines [`clamp_round`], the single rounding rule used when a
//! floating-point intermediate is narrowed back to an 8-bit sample.

pub mod error;
pub mod raster;

pub use error::{Error, Result};
pub use raster::{Channels, Histogram, Raster, RasterMut};

/// A 256-entry lookup table mapping input intensity to output intensity.
pub type Lut = [u8; 256];

/// Round to the nearest integer and saturate to `[0, 255]`.
///
/// NaN maps to 0.
///
/// # Examples
///
/// ```
/// use grayline_core::clamp_round;
///
/// assert_eq!(clamp_round(127.5), 128);
/// assert_eq!(clamp_round(-3.2), 0);
/// assert_eq!(clamp_round(255.7), 255);
/// ```
#[inline]
pub fn clamp_round(value: f64) -> u8 {
    // `as` saturates on float-to-int casts and sends NaN to 0
    value.round().clamp(0.0, 255.0) as u8
}
