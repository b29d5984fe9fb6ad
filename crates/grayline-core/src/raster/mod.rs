//! Raster - The main image container
//!
//! A raster is a `width x height` grid of 8-bit samples with either one
//! channel (gray) or three interleaved channels (RGB).
//!
//! # Sample layout
//!
//! - Samples are stored row-major in a single `Vec<u8>`
//! - RGB rasters interleave channels per pixel: `R G B R G B ...`
//! - `samples.len() == width * height * channels` always holds
//!
//! # Ownership model
//!
//! `Raster` uses `Arc` for cheap cloning (shared ownership).
//! To modify samples, convert to `RasterMut` via [`Raster::try_into_mut`]
//! or [`Raster::to_mut`], then convert back with `Into<Raster>`.
//! Point transforms work on a `RasterMut` in place; neighborhood
//! transforms read a `Raster` and allocate a new one.

mod access;
mod histogram;

pub use histogram::Histogram;

use crate::error::{Error, Result};
use std::sync::Arc;

/// Samples per pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Channels {
    /// Single intensity channel
    Gray = 1,
    /// Interleaved red, green, blue
    Rgb = 3,
}

impl Channels {
    /// Create `Channels` from a raw sample count.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidChannels`] if `count` is not 1 or 3.
    pub fn from_count(count: u32) -> Result<Self> {
        match count {
            1 => Ok(Channels::Gray),
            3 => Ok(Channels::Rgb),
            _ => Err(Error::InvalidChannels(count)),
        }
    }

    /// Get the number of samples per pixel.
    #[inline]
    pub fn count(self) -> u32 {
        self as u32
    }
}

/// Allocate a zeroed sample buffer, reporting allocation failure as an error.
pub(crate) fn alloc_samples(len: usize) -> Result<Vec<u8>> {
    let mut samples = Vec::new();
    samples
        .try_reserve_exact(len)
        .map_err(|_| Error::AllocationFailed(len))?;
    samples.resize(len, 0);
    Ok(samples)
}

/// Compute `width * height * channels`, rejecting zero or overflowing sizes.
fn sample_len(width: u32, height: u32, channels: Channels) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidDimension { width, height });
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(channels.count() as usize))
        .ok_or(Error::InvalidDimension { width, height })
}

/// Internal raster data
#[derive(Debug)]
struct RasterData {
    width: u32,
    height: u32,
    channels: Channels,
    samples: Vec<u8>,
}

/// Raster - Main image container
///
/// # Examples
///
/// ```
/// use grayline_core::{Channels, Raster};
///
/// let raster = Raster::new(640, 480, Channels::Gray).unwrap();
/// assert_eq!(raster.width(), 640);
/// assert_eq!(raster.samples().len(), 640 * 480);
/// ```
#[derive(Debug, Clone)]
pub struct Raster {
    inner: Arc<RasterData>,
}

impl Raster {
    /// Create a new raster with every sample set to zero.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0 (or the
    /// sample count overflows), and [`Error::AllocationFailed`] if the
    /// sample buffer cannot be allocated.
    pub fn new(width: u32, height: u32, channels: Channels) -> Result<Self> {
        let len = sample_len(width, height, channels)?;
        let samples = alloc_samples(len)?;
        Ok(Raster {
            inner: Arc::new(RasterData {
                width,
                height,
                channels,
                samples,
            }),
        })
    }

    /// Wrap an existing sample buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SampleCountMismatch`] if `samples.len()` is not
    /// `width * height * channels`.
    pub fn from_samples(
        width: u32,
        height: u32,
        channels: Channels,
        samples: Vec<u8>,
    ) -> Result<Self> {
        let expected = sample_len(width, height, channels)?;
        if samples.len() != expected {
            return Err(Error::SampleCountMismatch {
                expected,
                actual: samples.len(),
            });
        }
        Ok(Raster {
            inner: Arc::new(RasterData {
                width,
                height,
                channels,
                samples,
            }),
        })
    }

    /// Get the width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get the samples per pixel.
    #[inline]
    pub fn channels(&self) -> Channels {
        self.inner.channels
    }

    /// Number of pixels (`width * height`).
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.inner.width as usize * self.inner.height as usize
    }

    /// Get raw access to the samples.
    #[inline]
    pub fn samples(&self) -> &[u8] {
        &self.inner.samples
    }

    /// Get the samples of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        let stride = self.stride();
        let start = y as usize * stride;
        &self.inner.samples[start..start + stride]
    }

    /// Samples per row.
    #[inline]
    pub fn stride(&self) -> usize {
        self.inner.width as usize * self.inner.channels.count() as usize
    }

    /// Get the number of strong references to this raster.
    #[inline]
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Check if two rasters have the same width, height and channel count.
    pub fn sizes_equal(&self, other: &Raster) -> bool {
        self.inner.width == other.inner.width
            && self.inner.height == other.inner.height
            && self.inner.channels == other.inner.channels
    }

    /// Create a zeroed raster with the same width and height.
    ///
    /// `channels` selects the channel count of the new raster, so a
    /// reduction stage can ask for a gray template of an RGB input.
    pub fn create_template(&self, channels: Channels) -> Result<Self> {
        Self::new(self.inner.width, self.inner.height, channels)
    }

    /// Return an error unless the raster has the given channel count.
    pub fn require_channels(&self, channels: Channels) -> Result<()> {
        if self.inner.channels != channels {
            return Err(Error::ChannelMismatch {
                expected: channels.count(),
                actual: self.inner.channels.count(),
            });
        }
        Ok(())
    }

    /// Copy the samples into a freshly allocated buffer.
    fn copy_samples(&self) -> Result<Vec<u8>> {
        let len = self.inner.samples.len();
        let mut samples = Vec::new();
        samples
            .try_reserve_exact(len)
            .map_err(|_| Error::AllocationFailed(len))?;
        samples.extend_from_slice(&self.inner.samples);
        Ok(samples)
    }

    /// Create a deep copy of this raster.
    ///
    /// Unlike `clone()` which shares data via Arc, this creates
    /// a completely independent copy.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllocationFailed`] if the copy cannot be allocated.
    pub fn deep_clone(&self) -> Result<Self> {
        Ok(Raster {
            inner: Arc::new(RasterData {
                width: self.inner.width,
                height: self.inner.height,
                channels: self.inner.channels,
                samples: self.copy_samples()?,
            }),
        })
    }

    /// Try to get mutable access to the samples.
    ///
    /// Succeeds only if there is exactly one reference to the data.
    pub fn try_into_mut(self) -> std::result::Result<RasterMut, Self> {
        match Arc::try_unwrap(self.inner) {
            Ok(data) => Ok(RasterMut { inner: data }),
            Err(arc) => Err(Raster { inner: arc }),
        }
    }

    /// Get a mutable raster, copying the samples only if they are shared.
    pub fn into_mut(self) -> Result<RasterMut> {
        match self.try_into_mut() {
            Ok(raster) => Ok(raster),
            Err(shared) => shared.to_mut(),
        }
    }

    /// Create a mutable copy of this raster.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllocationFailed`] if the copy cannot be allocated.
    pub fn to_mut(&self) -> Result<RasterMut> {
        Ok(RasterMut {
            inner: RasterData {
                width: self.inner.width,
                height: self.inner.height,
                channels: self.inner.channels,
                samples: self.copy_samples()?,
            },
        })
    }
}

/// Mutable raster
///
/// Allows modification of samples. Convert back to an immutable
/// [`Raster`] using `Into<Raster>`.
#[derive(Debug)]
pub struct RasterMut {
    inner: RasterData,
}

impl RasterMut {
    /// Get the width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get the samples per pixel.
    #[inline]
    pub fn channels(&self) -> Channels {
        self.inner.channels
    }

    /// Get raw access to the samples.
    #[inline]
    pub fn samples(&self) -> &[u8] {
        &self.inner.samples
    }

    /// Get mutable access to the samples.
    ///
    /// The slice length is fixed, so the size invariant cannot be broken
    /// through it.
    #[inline]
    pub fn samples_mut(&mut self) -> &mut [u8] {
        &mut self.inner.samples
    }

    /// Samples per row.
    #[inline]
    pub fn stride(&self) -> usize {
        self.inner.width as usize * self.inner.channels.count() as usize
    }

    /// Get mutable access to row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let stride = self.stride();
        let start = y as usize * stride;
        &mut self.inner.samples[start..start + stride]
    }

    /// Return an error unless the raster has the given channel count.
    pub fn require_channels(&self, channels: Channels) -> Result<()> {
        if self.inner.channels != channels {
            return Err(Error::ChannelMismatch {
                expected: channels.count(),
                actual: self.inner.channels.count(),
            });
        }
        Ok(())
    }
}

impl From<RasterMut> for Raster {
    fn from(raster: RasterMut) -> Self {
        Raster {
            inner: Arc::new(raster.inner),
        }
    }
}
