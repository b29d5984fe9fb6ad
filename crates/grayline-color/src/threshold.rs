//! Global thresholding
//!
//! Converts a gray raster to a two-level raster (0 or 255):
//! - Fixed threshold binarization
//! - Otsu's method (automatic threshold selection)
//!
//! Samples at or below the threshold become 0, samples above it become 255.

use crate::ColorResult;
use grayline_core::{Channels, Histogram, Raster, RasterMut};

/// Largest threshold Otsu's method can select.
///
/// A split at 255 would leave the upper class empty for every image.
pub const MAX_OTSU_THRESHOLD: u8 = 254;

/// Result of [`threshold_otsu`]
#[derive(Debug, Clone)]
pub struct OtsuResult {
    /// Selected cut point; samples `<= threshold` map to 0
    pub threshold: u8,
    /// Binarized raster (values 0 and 255 only)
    pub binary: Raster,
}

/// Running count, sum and sum of squares for one class.
#[derive(Debug, Clone, Copy, Default)]
struct ClassMoments {
    count: u128,
    sum: u128,
    sum_sq: u128,
}

impl ClassMoments {
    fn add(&mut self, value: usize, count: u64) {
        let v = value as u128;
        let n = count as u128;
        self.count += n;
        self.sum += v * n;
        self.sum_sq += v * v * n;
    }

    fn minus(self, other: ClassMoments) -> ClassMoments {
        ClassMoments {
            count: self.count - other.count,
            sum: self.sum - other.sum,
            sum_sq: self.sum_sq - other.sum_sq,
        }
    }

    /// `count * variance`, i.e. the sum of squared deviations from the mean.
    ///
    /// `count * sum_sq - sum^2` is exact in integers, so a class holding a
    /// single intensity yields exactly 0. An empty class also yields 0.
    fn scatter(self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        let numerator = self.count * self.sum_sq - self.sum * self.sum;
        numerator as f64 / self.count as f64
    }
}

/// Select the Otsu threshold from a 256-bin histogram.
///
/// For every split `t` in `[0, 254]` the within-class cost
/// `mass_bg * var_bg + mass_fg * var_fg` is evaluated, where each class
/// variance uses that class's own mean. The first `t` with the smallest
/// cost wins. An empty histogram, or one holding a single intensity,
/// yields 0.
pub fn otsu_threshold_from_histogram(hist: &Histogram) -> u8 {
    let total = hist.total();
    if total == 0 {
        return 0;
    }

    let mut all = ClassMoments::default();
    for (value, &count) in hist.counts().iter().enumerate() {
        all.add(value, count);
    }

    let total = total as f64;
    let mut background = ClassMoments::default();
    let mut best_t = 0u8;
    let mut best_cost = f64::INFINITY;

    for t in 0..=MAX_OTSU_THRESHOLD as usize {
        background.add(t, hist[t]);
        let foreground = all.minus(background);

        // mass * variance == scatter / total for each class
        let cost = (background.scatter() + foreground.scatter()) / total;
        if cost < best_cost {
            best_cost = cost;
            best_t = t as u8;
        }
    }

    best_t
}

/// Compute Otsu's threshold for a gray raster.
pub fn compute_otsu_threshold(raster: &Raster) -> ColorResult<u8> {
    let hist = raster.gray_histogram()?;
    let threshold = otsu_threshold_from_histogram(&hist);
    tracing::debug!(threshold, pixels = hist.total(), "otsu threshold");
    Ok(threshold)
}

/// Binarize a gray raster into a new raster.
///
/// Samples `<= threshold` become 0, samples `> threshold` become 255.
pub fn threshold_to_binary(raster: &Raster, threshold: u8) -> ColorResult<Raster> {
    raster.require_channels(Channels::Gray)?;
    let mut out = raster.to_mut()?;
    binarize(out.samples_mut(), threshold);
    Ok(out.into())
}

/// Binarize a gray raster in place.
pub fn threshold_in_place(raster: &mut RasterMut, threshold: u8) -> ColorResult<()> {
    raster.require_channels(Channels::Gray)?;
    binarize(raster.samples_mut(), threshold);
    Ok(())
}

fn binarize(samples: &mut [u8], threshold: u8) {
    for s in samples {
        *s = if *s <= threshold { 0 } else { 255 };
    }
}

/// Binarize a gray raster using Otsu's method.
///
/// Returns the selected cut point along with the binarized raster.
pub fn threshold_otsu(raster: &Raster) -> ColorResult<OtsuResult> {
    let threshold = compute_otsu_threshold(raster)?;
    let binary = threshold_to_binary(raster, threshold)?;
    Ok(OtsuResult { threshold, binary })
}
