//! Tone mapping through lookup tables
//!
//! Histogram equalization and gamma correction. Each transform builds a
//! [`Lut`] with a pure function and applies it with [`apply_lut`].

use crate::{FilterError, FilterResult};
use grayline_core::{Channels, Histogram, Lut, RasterMut, clamp_round};

/// Build the histogram equalization table.
///
/// With `gmin` the darkest intensity present and `hmin` the cumulative
/// count through `gmin`, entries `1..=255` are
/// `clamp_round(255 * (cum[i] - hmin) / (N - hmin))` and entry 0 is 0.
///
/// Returns `None` when `N == hmin`, i.e. every pixel shares one
/// intensity (or the histogram is empty). The image should then be left
/// unchanged.
pub fn equalize_lut(hist: &Histogram) -> Option<Lut> {
    let total = hist.total();
    let gmin = hist.min_value()?;
    let cum = hist.cumulative();
    let hmin = cum[gmin as usize];
    if total == hmin {
        return None;
    }

    let range = (total - hmin) as f64;
    let mut lut = [0u8; 256];
    for (i, entry) in lut.iter_mut().enumerate().skip(1) {
        // Below gmin the cumulative count is 0, which would go negative
        let above = cum[i].saturating_sub(hmin) as f64;
        *entry = clamp_round(255.0 * above / range);
    }
    Some(lut)
}

/// Equalize the histogram of a gray raster in place.
///
/// A constant image is left unchanged.
pub fn equalize(raster: &mut RasterMut) -> FilterResult<()> {
    raster.require_channels(Channels::Gray)?;
    let hist = Histogram::from_samples(raster.samples());
    match equalize_lut(&hist) {
        Some(lut) => {
            tracing::debug!(
                min = hist.min_value(),
                max = hist.max_value(),
                "equalizing histogram"
            );
            apply_lut(raster, &lut)
        }
        None => {
            tracing::debug!("constant image, equalization skipped");
            Ok(())
        }
    }
}

/// Build the gamma correction table `clamp_round(255 * (i / 255)^g)`.
///
/// `g > 1` darkens midtones and `g < 1` brightens them. `g == 1` yields
/// the identity table.
///
/// # Errors
///
/// Returns [`FilterError::InvalidParameters`] unless `g` is finite and
/// greater than 0.
pub fn gamma_lut(g: f64) -> FilterResult<Lut> {
    if !g.is_finite() || g <= 0.0 {
        return Err(FilterError::InvalidParameters(format!(
            "gamma must be finite and > 0, got {g}"
        )));
    }

    let mut lut = [0u8; 256];
    for (i, entry) in lut.iter_mut().enumerate() {
        *entry = clamp_round(255.0 * (i as f64 / 255.0).powf(g));
    }
    Ok(lut)
}

/// Apply gamma correction to a gray raster in place.
pub fn gamma(raster: &mut RasterMut, g: f64) -> FilterResult<()> {
    raster.require_channels(Channels::Gray)?;
    let lut = gamma_lut(g)?;
    tracing::debug!(gamma = g, "applying gamma");
    apply_lut(raster, &lut)
}

/// Remap every sample of a gray raster through `lut`.
pub fn apply_lut(raster: &mut RasterMut, lut: &Lut) -> FilterResult<()> {
    raster.require_channels(Channels::Gray)?;
    for s in raster.samples_mut() {
        *s = lut[*s as usize];
    }
    Ok(())
}
