//! 3x3 convolution kernels
//!
//! A [`Kernel`] is a fixed 3x3 grid of `f64` weights in row-major order,
//! centered on its middle element. The weights are not required to sum
//! to 1; use [`Kernel::normalized`] to rescale them.

use crate::{FilterError, FilterResult};
use std::fmt;
use std::str::FromStr;

/// Side length of every kernel
pub const KERNEL_SIZE: usize = 3;

/// A 3x3 convolution kernel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kernel {
    /// Weights, `data[ky][kx]`
    data: [[f64; KERNEL_SIZE]; KERNEL_SIZE],
}

impl Kernel {
    /// Create a kernel from row-major weights.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidKernel`] if any weight is not finite.
    pub fn new(data: [[f64; KERNEL_SIZE]; KERNEL_SIZE]) -> FilterResult<Self> {
        if data.iter().flatten().any(|w| !w.is_finite()) {
            return Err(FilterError::InvalidKernel(
                "kernel weights must be finite".into(),
            ));
        }
        Ok(Kernel { data })
    }

    /// Create a kernel from a flat slice of nine row-major weights.
    pub fn from_slice(values: &[f64]) -> FilterResult<Self> {
        if values.len() != KERNEL_SIZE * KERNEL_SIZE {
            return Err(FilterError::InvalidKernel(format!(
                "expected {} weights, got {}",
                KERNEL_SIZE * KERNEL_SIZE,
                values.len()
            )));
        }
        let mut data = [[0.0; KERNEL_SIZE]; KERNEL_SIZE];
        for (row, chunk) in data.iter_mut().zip(values.chunks_exact(KERNEL_SIZE)) {
            row.copy_from_slice(chunk);
        }
        Self::new(data)
    }

    /// Kernel that leaves every pixel unchanged.
    pub fn identity() -> Self {
        Kernel {
            data: [[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 0.0]],
        }
    }

    /// Box (averaging) kernel; all weights are `1/9`.
    ///
    /// Unlike [`mean_filter`](crate::mean_filter), the result is rounded
    /// rather than truncated.
    pub fn box_kernel() -> Self {
        Kernel {
            data: [[1.0 / 9.0; KERNEL_SIZE]; KERNEL_SIZE],
        }
    }

    /// Gaussian approximation built from the binomial row `1 2 1`.
    pub fn gaussian() -> Self {
        Kernel {
            data: [
                [1.0 / 16.0, 2.0 / 16.0, 1.0 / 16.0],
                [2.0 / 16.0, 4.0 / 16.0, 2.0 / 16.0],
                [1.0 / 16.0, 2.0 / 16.0, 1.0 / 16.0],
            ],
        }
    }

    /// Sharpening kernel (center 5, edge neighbors -1).
    pub fn sharpen() -> Self {
        Kernel {
            data: [[0.0, -1.0, 0.0], [-1.0, 5.0, -1.0], [0.0, -1.0, 0.0]],
        }
    }

    /// Weight at column `kx`, row `ky`.
    #[inline]
    pub fn get(&self, kx: usize, ky: usize) -> Option<f64> {
        self.data.get(ky).and_then(|row| row.get(kx)).copied()
    }

    /// Row-major weights.
    pub fn rows(&self) -> &[[f64; KERNEL_SIZE]; KERNEL_SIZE] {
        &self.data
    }

    /// Sum of all weights.
    pub fn sum(&self) -> f64 {
        self.data.iter().flatten().sum()
    }

    /// Copy of this kernel scaled so its weights sum to 1.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidKernel`] if the weights sum to zero.
    pub fn normalized(&self) -> FilterResult<Self> {
        let sum = self.sum();
        if sum.abs() < f64::EPSILON {
            return Err(FilterError::InvalidKernel(
                "cannot normalize a kernel whose weights sum to zero".into(),
            ));
        }
        let mut data = self.data;
        for w in data.iter_mut().flatten() {
            *w /= sum;
        }
        Ok(Kernel { data })
    }
}

impl Default for Kernel {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Display for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.data.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{:8.4} {:8.4} {:8.4}", row[0], row[1], row[2])?;
        }
        Ok(())
    }
}

/// Named kernel presets, as accepted on the command line.
impl FromStr for Kernel {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "identity" => Ok(Self::identity()),
            "box" => Ok(Self::box_kernel()),
            "gaussian" => Ok(Self::gaussian()),
            "sharpen" => Ok(Self::sharpen()),
            other => Err(FilterError::InvalidKernel(format!(
                "unknown kernel preset '{other}'"
            ))),
        }
    }
}
