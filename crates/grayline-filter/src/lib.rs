//! grayline-filter - Point transforms and 3x3 neighborhood filters
//!
//! This crate provides the middle stages of the pipeline:
//!
//! - Histogram equalization and gamma correction via lookup tables
//! - 3x3 convolution with arbitrary kernels
//! - Un-weighted mean filtering
//!
//! Point transforms rewrite a [`RasterMut`](grayline_core::RasterMut) in
//! place. Neighborhood transforms read a [`Raster`](grayline_core::Raster)
//! and always allocate a new output. Both neighborhood paths sample the
//! border with clamp-to-edge.
//!
//! With the `rayon` feature, output rows of the neighborhood transforms
//! are computed in parallel.

pub mod convolve;
pub mod enhance;
mod error;
pub mod kernel;

pub use error::{FilterError, FilterResult};
pub use kernel::Kernel;

pub use convolve::{convolve, mean_filter};
pub use enhance::{apply_lut, equalize, equalize_lut, gamma, gamma_lut};
