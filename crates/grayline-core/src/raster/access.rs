//! Pixel access functions
//!
//! Getters and setters for individual pixels, plus the clamp-to-edge
//! accessor every neighborhood operation samples through.

use super::{Channels, Raster, RasterMut};
use crate::error::{Error, Result};

/// Index of the first sample of pixel (x, y).
#[inline]
fn sample_index(width: u32, channels: Channels, x: u32, y: u32) -> usize {
    (y as usize * width as usize + x as usize) * channels.count() as usize
}

impl Raster {
    /// Get the gray value at (x, y).
    ///
    /// Returns `None` if coordinates are out of bounds or the raster is
    /// not single-channel.
    pub fn get_sample(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width() || y >= self.height() || self.channels() != Channels::Gray {
            return None;
        }
        let index = sample_index(self.width(), Channels::Gray, x, y);
        Some(self.samples()[index])
    }

    /// Get RGB values at (x, y).
    ///
    /// Only valid for 3-channel rasters.
    pub fn get_rgb(&self, x: u32, y: u32) -> Option<(u8, u8, u8)> {
        if x >= self.width() || y >= self.height() || self.channels() != Channels::Rgb {
            return None;
        }
        let i = sample_index(self.width(), Channels::Rgb, x, y);
        let s = self.samples();
        Some((s[i], s[i + 1], s[i + 2]))
    }

    /// Get the gray value at (x, y), clamping coordinates into the raster.
    ///
    /// Coordinates outside the raster are replaced by the nearest valid
    /// coordinate (clamp-to-edge), so a 3x3 neighborhood around a border
    /// pixel repeats the border row/column instead of reading zeros.
    ///
    /// For RGB rasters this returns the first (red) sample of the clamped
    /// pixel; neighborhood stages only run on gray rasters.
    ///
    /// # Examples
    ///
    /// ```
    /// use grayline_core::{Channels, Raster};
    ///
    /// let r = Raster::from_samples(2, 2, Channels::Gray, vec![1, 2, 3, 4]).unwrap();
    /// assert_eq!(r.sample_clamped(-1, -1), 1);
    /// assert_eq!(r.sample_clamped(5, 0), 2);
    /// assert_eq!(r.sample_clamped(0, 9), 3);
    /// ```
    #[inline]
    pub fn sample_clamped(&self, x: i64, y: i64) -> u8 {
        let cx = x.clamp(0, self.width() as i64 - 1) as u32;
        let cy = y.clamp(0, self.height() as i64 - 1) as u32;
        self.samples()[sample_index(self.width(), self.channels(), cx, cy)]
    }
}

impl RasterMut {
    /// Get the gray value at (x, y).
    pub fn get_sample(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width() || y >= self.height() || self.channels() != Channels::Gray {
            return None;
        }
        let index = sample_index(self.width(), Channels::Gray, x, y);
        Some(self.samples()[index])
    }

    /// Set the gray value at (x, y).
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if coordinates are out of bounds and
    /// [`Error::ChannelMismatch`] if the raster is not single-channel.
    pub fn set_sample(&mut self, x: u32, y: u32, val: u8) -> Result<()> {
        self.require_channels(Channels::Gray)?;
        self.check_bounds(x, y)?;
        let i = sample_index(self.width(), Channels::Gray, x, y);
        self.samples_mut()[i] = val;
        Ok(())
    }

    /// Set an RGB pixel at (x, y).
    ///
    /// Only valid for 3-channel rasters.
    pub fn set_rgb(&mut self, x: u32, y: u32, r: u8, g: u8, b: u8) -> Result<()> {
        self.require_channels(Channels::Rgb)?;
        self.check_bounds(x, y)?;
        let i = sample_index(self.width(), Channels::Rgb, x, y);
        self.samples_mut()[i..i + 3].copy_from_slice(&[r, g, b]);
        Ok(())
    }

    fn check_bounds(&self, x: u32, y: u32) -> Result<()> {
        if x >= self.width() || y >= self.height() {
            return Err(Error::OutOfBounds {
                x,
                y,
                width: self.width(),
                height: self.height(),
            });
        }
        Ok(())
    }
}
