//! grayline-color - Color reduction and global thresholding
//!
//! This crate provides the two stages at either end of the pipeline:
//!
//! - **Color reduction** ([`luma`]): RGB to gray via the luma weights, as a
//!   scalar double-precision path and a fixed-point lane path
//! - **Thresholding** ([`threshold`]): Otsu's method and fixed-threshold
//!   binarization

pub mod error;
pub mod luma;
pub mod threshold;

// Re-export core types
pub use grayline_core;

// Re-export error types
pub use error::{ColorError, ColorResult};

// Re-export color reduction types and functions
pub use luma::{
    // Types
    AverageReducer,
    ColorReducer,
    FixedPointReducer,
    ReducerKind,
    ScalarReducer,
    // Functions
    pixel_luma,
    pixel_luma_fixed,
    reduce_to_gray,
};

// Re-export threshold functions
pub use threshold::{
    // Types
    OtsuResult,
    // Functions
    compute_otsu_threshold,
    otsu_threshold_from_histogram,
    threshold_in_place,
    threshold_otsu,
    threshold_to_binary,
};
