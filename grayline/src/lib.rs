//! grayline - Truecolor to grayscale conversion pipeline
//!
//! Decodes a binary PPM, reduces it to gray and runs an optional chain of
//! enhancement stages before the result is written as a binary PGM:
//!
//! ```text
//! reduce -> {equalize | gamma}* -> 3x3 filter? -> otsu threshold?
//! ```
//!
//! # Example
//!
//! ```
//! use grayline::{Channels, Pipeline, PipelineOptions, Raster, ToneStage};
//!
//! let rgb = Raster::from_samples(2, 2, Channels::Rgb, vec![128; 12]).unwrap();
//! let options = PipelineOptions {
//!     tone: vec![ToneStage::Gamma(1.0)],
//!     ..PipelineOptions::default()
//! };
//! let out = Pipeline::new(options).run(&rgb).unwrap();
//! assert_eq!(out.raster.samples(), &[128, 128, 128, 128]);
//! ```

pub mod pipeline;

// Re-export core types (primary data structures used everywhere)
pub use grayline_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use grayline_color as color;
pub use grayline_filter as filter;
pub use grayline_io as io;

pub use pipeline::{
    FilterStage, Pipeline, PipelineError, PipelineOptions, PipelineOutput, PipelineResult,
    ToneStage,
};
