//! Synthetic test images
//!
//! Deterministic generators used in place of bundled test images.
//! All generators panic on zero dimensions; they are for tests only.

use grayline_core::{Channels, Raster};

fn gray_from_fn(width: u32, height: u32, f: impl Fn(u32, u32) -> u8) -> Raster {
    let mut samples = Vec::with_capacity(width as usize * height as usize);
    for y in 0..height {
        for x in 0..width {
            samples.push(f(x, y));
        }
    }
    Raster::from_samples(width, height, Channels::Gray, samples).expect("valid gray raster")
}

fn rgb_from_fn(width: u32, height: u32, f: impl Fn(u32, u32) -> (u8, u8, u8)) -> Raster {
    let mut samples = Vec::with_capacity(width as usize * height as usize * 3);
    for y in 0..height {
        for x in 0..width {
            let (r, g, b) = f(x, y);
            samples.extend_from_slice(&[r, g, b]);
        }
    }
    Raster::from_samples(width, height, Channels::Rgb, samples).expect("valid rgb raster")
}

/// Gray raster with every sample set to `value`.
pub fn gray_constant(width: u32, height: u32, value: u8) -> Raster {
    gray_from_fn(width, height, |_, _| value)
}

/// Horizontal ramp from 0 at the left edge to 255 at the right edge.
pub fn gray_gradient(width: u32, height: u32) -> Raster {
    let span = (width.max(2) - 1) as f64;
    let level = |x: u32| (x as f64 * 255.0 / span).round() as u8;
    gray_from_fn(width, height, |x, _| level(x))
}

/// Horizontal ramp confined to `[lo, hi]`.
pub fn gray_low_contrast(width: u32, height: u32, lo: u8, hi: u8) -> Raster {
    let span = (width.max(2) - 1) as f64;
    let range = hi as f64 - lo as f64;
    gray_from_fn(width, height, |x, _| {
        (lo as f64 + (x as f64 * range / span).round()) as u8
    })
}

/// Left half `lo`, right half `hi`.
pub fn gray_two_cluster(width: u32, height: u32, lo: u8, hi: u8) -> Raster {
    gray_from_fn(width, height, |x, _| if x < width / 2 { lo } else { hi })
}

/// Busy deterministic texture covering most intensities.
pub fn gray_texture(width: u32, height: u32) -> Raster {
    gray_from_fn(width, height, |x, y| {
        (x.wrapping_mul(73) ^ y.wrapping_mul(151) ^ x.wrapping_mul(y)) as u8
    })
}

/// RGB raster with every pixel set to `(r, g, b)`.
pub fn rgb_constant(width: u32, height: u32, r: u8, g: u8, b: u8) -> Raster {
    rgb_from_fn(width, height, |_, _| (r, g, b))
}

/// RGB raster whose channels vary independently across the image.
///
/// Red follows x, green follows y and blue follows a mixed pattern, so
/// every lane of a vectorized reducer sees distinct values.
pub fn rgb_ramp(width: u32, height: u32) -> Raster {
    rgb_from_fn(width, height, |x, y| {
        (
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            (x.wrapping_mul(37) ^ y.wrapping_mul(11)) as u8,
        )
    })
}
