//! Histogram generation for gray rasters
//!
//! Counts how often each 8-bit intensity occurs.

use super::{Channels, Raster};
use crate::error::Result;
use std::ops::Index;

/// 256-bin intensity histogram
///
/// Index is the intensity value; the bins sum to the pixel count of the
/// raster the histogram was taken from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    counts: [u64; 256],
}

impl Histogram {
    /// Build a histogram directly from bin counts.
    pub fn from_counts(counts: [u64; 256]) -> Self {
        Self { counts }
    }

    /// Count the intensities of a sample slice.
    pub fn from_samples(samples: &[u8]) -> Self {
        let mut counts = [0u64; 256];
        for &s in samples {
            counts[s as usize] += 1;
        }
        Self { counts }
    }

    /// Get the raw bin counts.
    #[inline]
    pub fn counts(&self) -> &[u64; 256] {
        &self.counts
    }

    /// Total number of samples counted.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Smallest intensity with a nonzero count.
    pub fn min_value(&self) -> Option<u8> {
        self.counts.iter().position(|&c| c > 0).map(|i| i as u8)
    }

    /// Largest intensity with a nonzero count.
    pub fn max_value(&self) -> Option<u8> {
        self.counts.iter().rposition(|&c| c > 0).map(|i| i as u8)
    }

    /// Prefix sums: entry `i` is the number of samples with intensity `<= i`.
    pub fn cumulative(&self) -> [u64; 256] {
        let mut cum = [0u64; 256];
        let mut running = 0u64;
        for (slot, &count) in cum.iter_mut().zip(self.counts.iter()) {
            running += count;
            *slot = running;
        }
        cum
    }
}

impl Index<usize> for Histogram {
    type Output = u64;

    fn index(&self, index: usize) -> &u64 {
        &self.counts[index]
    }
}

impl Raster {
    /// Get the intensity histogram of a gray raster.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ChannelMismatch`](crate::Error::ChannelMismatch) if
    /// the raster is not single-channel.
    ///
    /// # Example
    ///
    /// ```
    /// use grayline_core::{Channels, Raster};
    ///
    /// let raster = Raster::new(100, 100, Channels::Gray).unwrap();
    /// let hist = raster.gray_histogram().unwrap();
    /// assert_eq!(hist[0], 10_000);
    /// ```
    pub fn gray_histogram(&self) -> Result<Histogram> {
        self.require_channels(Channels::Gray)?;
        Ok(Histogram::from_samples(self.samples()))
    }
}
