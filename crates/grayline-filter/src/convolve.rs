//! 3x3 neighborhood filtering
//!
//! Both filters read their neighborhood through
//! [`Raster::sample_clamped`], so pixels beyond the border take the value
//! of the nearest edge pixel. Every output pixel is computed, including
//! the border rows and columns.

use crate::{FilterResult, Kernel};
use grayline_core::{Channels, Raster, clamp_round};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Offsets of the 3x3 neighborhood relative to its center.
const OFFSETS: [i64; 3] = [-1, 0, 1];

/// Convolve a gray raster with a 3x3 kernel.
///
/// Each output sample is `clamp_round(sum(kernel[ky][kx] * in(x+kx-1, y+ky-1)))`.
/// Always allocates a new raster of the same size.
pub fn convolve(raster: &Raster, kernel: &Kernel) -> FilterResult<Raster> {
    raster.require_channels(Channels::Gray)?;
    let rows = kernel.rows();

    let out = map_neighborhoods(raster, |x, y| {
        let mut sum = 0.0f64;
        for (ky, dy) in OFFSETS.iter().enumerate() {
            for (kx, dx) in OFFSETS.iter().enumerate() {
                sum += rows[ky][kx] * raster.sample_clamped(x + dx, y + dy) as f64;
            }
        }
        clamp_round(sum)
    })?;

    tracing::debug!(
        width = raster.width(),
        height = raster.height(),
        kernel_sum = kernel.sum(),
        "convolved"
    );
    Ok(out)
}

/// Un-weighted 3x3 mean filter.
///
/// Sums the nine neighbors (center included) as integers and divides by
/// 9, truncating.
pub fn mean_filter(raster: &Raster) -> FilterResult<Raster> {
    raster.require_channels(Channels::Gray)?;

    let out = map_neighborhoods(raster, |x, y| {
        let mut sum = 0u32;
        for dy in OFFSETS {
            for dx in OFFSETS {
                sum += raster.sample_clamped(x + dx, y + dy) as u32;
            }
        }
        (sum / 9) as u8
    })?;

    tracing::debug!(
        width = raster.width(),
        height = raster.height(),
        "mean filtered"
    );
    Ok(out)
}

/// Build a new gray raster whose sample at `(x, y)` is `f(x, y)`.
fn map_neighborhoods<F>(raster: &Raster, f: F) -> FilterResult<Raster>
where
    F: Fn(i64, i64) -> u8 + Sync,
{
    let mut out = raster.create_template(Channels::Gray)?.into_mut()?;
    let width = out.width() as usize;

    let fill_row = |(y, row): (usize, &mut [u8])| {
        for (x, dst) in row.iter_mut().enumerate() {
            *dst = f(x as i64, y as i64);
        }
    };

    #[cfg(feature = "rayon")]
    out.samples_mut()
        .par_chunks_mut(width)
        .enumerate()
        .for_each(fill_row);

    #[cfg(not(feature = "rayon"))]
    out.samples_mut()
        .chunks_mut(width)
        .enumerate()
        .for_each(fill_row);

    Ok(out.into())
}
