//! grayline-test - Regression test framework for grayline
//!
//! This crate provides the regression harness used by the `*_reg.rs`
//! integration tests of every grayline crate, supporting two modes:
//!
//! - **Compare**: Check computed values against expectations (default)
//! - **Display**: Additionally write intermediate rasters as PNM files to
//!   `tests/regout` for visual inspection
//!
//! Test inputs are generated by [`synthetic`] instead of being loaded from
//! bundled image files.
//!
//! # Usage
//!
//! ```ignore
//! use grayline_test::{RegParams, synthetic};
//!
//! let mut rp = RegParams::new("convolve");
//! let raster = synthetic::gray_gradient(64, 48);
//! rp.compare_values(64.0, raster.width() as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: Set to "compare" or "display"

mod error;
mod params;
pub mod synthetic;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};

/// Get the path to the workspace root
fn workspace_root() -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    // grayline-test is at crates/grayline-test, so go up two directories
    format!("{}/../..", manifest_dir)
}

/// Get the path to the regout (regression output) directory
pub fn regout_dir() -> String {
    format!("{}/tests/regout", workspace_root())
}
