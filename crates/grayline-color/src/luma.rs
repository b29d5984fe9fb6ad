//! RGB to gray reduction
//!
//! Every reducer maps an interleaved RGB raster to a gray raster of the
//! same width and height. Three strategies implement [`ColorReducer`]:
//!
//! - [`ScalarReducer`]: `round(0.299 R + 0.587 G + 0.114 B)` in `f64`.
//!   This is the reference result.
//! - [`FixedPointReducer`]: the same weights scaled to 8-bit fixed point
//!   (77, 150, 29; they sum to 256), computed as widen to `u16`, multiply,
//!   sum and shift right by 8, in lanes of [`LANE_WIDTH`] pixels. Pixels
//!   that do not fill a whole lane go through the scalar path.
//! - [`AverageReducer`]: unweighted `(R + G + B) / 3`, truncating.
//!
//! # Fixed-point deviation
//!
//! Relative to the scalar path the fixed-point weights are off by
//! +0.00178 (red), -0.00109 (green) and -0.00072 (blue), which moves the
//! exact weighted sum by at most +0.46 / -0.46 levels for 8-bit inputs.
//! The shift truncates where the scalar path rounds. Together the
//! fixed-point result is never above the scalar result and at most
//! [`MAX_FIXED_POINT_DEVIATION`] level below it.
//!
//! With the `fixed-point` feature (default) the lane kernel is compiled
//! for several CPU targets and dispatched at runtime.

use crate::{ColorError, ColorResult};
use grayline_core::{Channels, Raster, clamp_round};
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "fixed-point")]
use multiversion::multiversion;

/// Red luma weight
pub const LUMA_RED: f64 = 0.299;
/// Green luma weight
pub const LUMA_GREEN: f64 = 0.587;
/// Blue luma weight
pub const LUMA_BLUE: f64 = 0.114;

/// Red weight in 8-bit fixed point (`round(0.299 * 256)`)
pub const FIXED_RED: u16 = 77;
/// Green weight in 8-bit fixed point (`round(0.587 * 256)`)
pub const FIXED_GREEN: u16 = 150;
/// Blue weight in 8-bit fixed point (`round(0.114 * 256)`)
pub const FIXED_BLUE: u16 = 29;
/// Right shift that undoes the fixed-point scale
pub const FIXED_SHIFT: u32 = 8;

/// Pixels per lane in the fixed-point path
pub const LANE_WIDTH: usize = 8;

/// Largest per-pixel difference between the scalar and fixed-point paths
pub const MAX_FIXED_POINT_DEVIATION: u8 = 1;

/// Luma of one pixel, scalar double precision.
#[inline]
pub fn pixel_luma(r: u8, g: u8, b: u8) -> u8 {
    clamp_round(LUMA_RED * r as f64 + LUMA_GREEN * g as f64 + LUMA_BLUE * b as f64)
}

/// Luma of one pixel, 8-bit fixed point.
///
/// The weighted sum peaks at `255 * 256`, which fits in `u16`.
#[inline]
pub fn pixel_luma_fixed(r: u8, g: u8, b: u8) -> u8 {
    let sum = r as u16 * FIXED_RED + g as u16 * FIXED_GREEN + b as u16 * FIXED_BLUE;
    (sum >> FIXED_SHIFT) as u8
}

/// A strategy for reducing RGB samples to gray.
pub trait ColorReducer {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Reduce interleaved RGB samples into one gray sample per pixel.
    ///
    /// `gray.len() * 3` must equal `rgb.len()`.
    fn reduce_samples(&self, rgb: &[u8], gray: &mut [u8]);

    /// Reduce an RGB raster to a newly allocated gray raster.
    ///
    /// # Errors
    ///
    /// Returns a core error if the input is not 3-channel or the output
    /// cannot be allocated.
    fn reduce(&self, raster: &Raster) -> ColorResult<Raster> {
        raster.require_channels(Channels::Rgb)?;
        let out = raster.create_template(Channels::Gray)?;
        let mut out_mut = out.into_mut()?;
        self.reduce_samples(raster.samples(), out_mut.samples_mut());
        tracing::debug!(
            reducer = self.name(),
            width = raster.width(),
            height = raster.height(),
            "reduced to gray"
        );
        Ok(out_mut.into())
    }
}

/// Double-precision luma reducer (reference path)
#[derive(Debug, Clone, Copy, Default)]
pub struct ScalarReducer;

impl ColorReducer for ScalarReducer {
    fn name(&self) -> &'static str {
        "scalar"
    }

    fn reduce_samples(&self, rgb: &[u8], gray: &mut [u8]) {
        debug_assert_eq!(rgb.len(), gray.len() * 3);
        for (px, out) in rgb.chunks_exact(3).zip(gray.iter_mut()) {
            *out = pixel_luma(px[0], px[1], px[2]);
        }
    }
}

/// Fixed-point lane reducer (throughput path)
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedPointReducer;

impl ColorReducer for FixedPointReducer {
    fn name(&self) -> &'static str {
        "fixed-point"
    }

    fn reduce_samples(&self, rgb: &[u8], gray: &mut [u8]) {
        debug_assert_eq!(rgb.len(), gray.len() * 3);
        let done = reduce_fixed_lanes(rgb, gray);
        tracing::trace!(
            lane_pixels = done,
            remainder = gray.len() - done,
            "fixed-point lanes"
        );
        ScalarReducer.reduce_samples(&rgb[done * 3..], &mut gray[done..]);
    }
}

/// Process every full lane; returns the number of pixels written.
#[cfg_attr(
    feature = "fixed-point",
    multiversion(targets("x86_64+avx2", "x86_64+sse4.1", "aarch64+neon"))
)]
fn reduce_fixed_lanes(rgb: &[u8], gray: &mut [u8]) -> usize {
    let mut done = 0;
    for (src, dst) in rgb
        .chunks_exact(LANE_WIDTH * 3)
        .zip(gray.chunks_exact_mut(LANE_WIDTH))
    {
        // Deinterleave into per-channel lanes
        let mut r = [0u16; LANE_WIDTH];
        let mut g = [0u16; LANE_WIDTH];
        let mut b = [0u16; LANE_WIDTH];
        for i in 0..LANE_WIDTH {
            r[i] = src[3 * i] as u16;
            g[i] = src[3 * i + 1] as u16;
            b[i] = src[3 * i + 2] as u16;
        }

        let mut sum = [0u16; LANE_WIDTH];
        for i in 0..LANE_WIDTH {
            sum[i] = r[i] * FIXED_RED + g[i] * FIXED_GREEN + b[i] * FIXED_BLUE;
        }

        for i in 0..LANE_WIDTH {
            dst[i] = (sum[i] >> FIXED_SHIFT) as u8;
        }
        done += LANE_WIDTH;
    }
    done
}

/// Unweighted channel average, truncating
#[derive(Debug, Clone, Copy, Default)]
pub struct AverageReducer;

impl ColorReducer for AverageReducer {
    fn name(&self) -> &'static str {
        "average"
    }

    fn reduce_samples(&self, rgb: &[u8], gray: &mut [u8]) {
        debug_assert_eq!(rgb.len(), gray.len() * 3);
        for (px, out) in rgb.chunks_exact(3).zip(gray.iter_mut()) {
            *out = ((px[0] as u16 + px[1] as u16 + px[2] as u16) / 3) as u8;
        }
    }
}

/// Selects a [`ColorReducer`] at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReducerKind {
    /// [`ScalarReducer`]
    Scalar,
    /// [`FixedPointReducer`]
    FixedPoint,
    /// [`AverageReducer`]
    Average,
}

impl Default for ReducerKind {
    /// `FixedPoint` when the `fixed-point` feature is enabled, else `Scalar`.
    fn default() -> Self {
        if cfg!(feature = "fixed-point") {
            ReducerKind::FixedPoint
        } else {
            ReducerKind::Scalar
        }
    }
}

impl ReducerKind {
    /// The reducer implementing this kind.
    pub fn reducer(self) -> &'static dyn ColorReducer {
        match self {
            ReducerKind::Scalar => &ScalarReducer,
            ReducerKind::FixedPoint => &FixedPointReducer,
            ReducerKind::Average => &AverageReducer,
        }
    }

    /// Name accepted by [`FromStr`].
    pub fn as_str(self) -> &'static str {
        self.reducer().name()
    }
}

impl fmt::Display for ReducerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReducerKind {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "scalar" => Ok(ReducerKind::Scalar),
            "fixed-point" | "fixed" => Ok(ReducerKind::FixedPoint),
            "average" | "avg" => Ok(ReducerKind::Average),
            other => Err(ColorError::InvalidParameters(format!(
                "unknown reducer '{other}' (expected scalar, fixed-point or average)"
            ))),
        }
    }
}

/// Reduce an RGB raster to gray with the selected strategy.
pub fn reduce_to_gray(raster: &Raster, kind: ReducerKind) -> ColorResult<Raster> {
    kind.reducer().reduce(raster)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_fixed_point_deviation(r in 0..=255u8, g in 0..=255u8, b in 0..=255u8) {
            let scalar = pixel_luma(r, g, b);
            let fixed = pixel_luma_fixed(r, g, b);
            prop_assert!(fixed <= scalar);
            prop_assert!(scalar - fixed <= MAX_FIXED_POINT_DEVIATION);
        }

        #[test]
        fn test_reducers_agree_within_tolerance(
            samples in prop::collection::vec(0..=255u8, 3..=300)
        ) {
            let pixels = samples.len() / 3;
            let rgb = &samples[..pixels * 3];
            let mut scalar = vec![0u8; pixels];
            let mut fixed = vec![0u8; pixels];
            ScalarReducer.reduce_samples(rgb, &mut scalar);
            FixedPointReducer.reduce_samples(rgb, &mut fixed);
            for (s, f) in scalar.iter().zip(&fixed) {
                prop_assert!(s.abs_diff(*f) <= MAX_FIXED_POINT_DEVIATION);
            }
        }
    }
}
