//! Stage composition
//!
//! A [`Pipeline`] runs the stages selected by [`PipelineOptions`] in a
//! fixed order: color reduction, the tone stages in the order given, one
//! optional neighborhood filter and an optional Otsu threshold. Every
//! stage keeps the width and height of its input.

use grayline_color::{ColorError, ReducerKind, threshold_otsu};
use grayline_core::{Channels, Raster};
use grayline_filter::{FilterError, Kernel, convolve, equalize, gamma, mean_filter};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while running the pipeline
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Core library error, such as a failed copy of a shared gray input
    #[error("core error: {0}")]
    Core(#[from] grayline_core::Error),

    /// Color reduction or thresholding failed
    #[error("color stage failed: {0}")]
    Color(#[from] ColorError),

    /// Tone or neighborhood stage failed
    #[error("filter stage failed: {0}")]
    Filter(#[from] FilterError),
}

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

/// A point transform applied after color reduction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToneStage {
    /// Histogram equalization
    Equalize,
    /// Gamma correction with the given exponent
    Gamma(f64),
}

/// A 3x3 neighborhood transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterStage {
    /// Un-weighted mean with integer truncation
    Mean,
    /// Convolution with an arbitrary kernel
    Convolve(Kernel),
}

impl fmt::Display for FilterStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterStage::Mean => f.write_str("mean"),
            FilterStage::Convolve(kernel) => write!(f, "convolve(sum={})", kernel.sum()),
        }
    }
}

/// `mean` or a kernel preset name (`identity`, `box`, `gaussian`, `sharpen`).
impl FromStr for FilterStage {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("mean") {
            return Ok(FilterStage::Mean);
        }
        s.parse::<Kernel>().map(FilterStage::Convolve)
    }
}

/// Which stages to run.
///
/// The default runs color reduction only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineOptions {
    /// Color reduction strategy
    pub reducer: ReducerKind,
    /// Point transforms, applied in order
    pub tone: Vec<ToneStage>,
    /// Optional neighborhood transform
    pub filter: Option<FilterStage>,
    /// Binarize with Otsu's method as the last stage
    pub threshold: bool,
}

/// Output of [`Pipeline::run`]
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Final gray raster
    pub raster: Raster,
    /// Otsu cut point, when thresholding ran
    pub threshold: Option<u8>,
}

/// Runs a configured sequence of stages.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    options: PipelineOptions,
}

impl Pipeline {
    /// Create a pipeline from options.
    pub fn new(options: PipelineOptions) -> Self {
        Pipeline { options }
    }

    /// The options this pipeline runs with.
    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Run every configured stage on `input`.
    ///
    /// RGB input is reduced with the configured reducer; gray input skips
    /// reduction.
    pub fn run(&self, input: &Raster) -> PipelineResult<PipelineOutput> {
        let opts = &self.options;
        let (width, height) = (input.width(), input.height());
        let _span = tracing::info_span!("pipeline", width, height).entered();

        let gray = match input.channels() {
            Channels::Rgb => grayline_color::reduce_to_gray(input, opts.reducer)?,
            Channels::Gray => {
                tracing::debug!("input already gray, reduction skipped");
                input.clone()
            }
        };

        let gray = if opts.tone.is_empty() {
            gray
        } else {
            let mut gray = gray.into_mut()?;
            for stage in &opts.tone {
                match *stage {
                    ToneStage::Equalize => equalize(&mut gray)?,
                    ToneStage::Gamma(g) => gamma(&mut gray, g)?,
                }
            }
            gray.into()
        };

        let gray = match &opts.filter {
            None => gray,
            Some(FilterStage::Mean) => mean_filter(&gray)?,
            Some(FilterStage::Convolve(kernel)) => convolve(&gray, kernel)?,
        };

        if opts.threshold {
            let otsu = threshold_otsu(&gray)?;
            tracing::info!(threshold = otsu.threshold, "binarized");
            return Ok(PipelineOutput {
                raster: otsu.binary,
                threshold: Some(otsu.threshold),
            });
        }

        Ok(PipelineOutput {
            raster: gray,
            threshold: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb_gray_128() -> Raster {
        Raster::from_samples(2, 2, Channels::Rgb, vec![128; 12]).unwrap()
    }

    #[test]
    fn test_default_reduces_only() {
        for reducer in [ReducerKind::Scalar, ReducerKind::FixedPoint] {
            let options = PipelineOptions {
                reducer,
                ..PipelineOptions::default()
            };
            let out = Pipeline::new(options).run(&rgb_gray_128()).unwrap();
            assert_eq!(out.raster.channels(), Channels::Gray);
            assert_eq!(out.raster.samples(), &[128; 4]);
            assert_eq!(out.threshold, None);
        }
    }

    #[test]
    fn test_tone_order_matters() {
        let input = Raster::from_samples(4, 1, Channels::Gray, vec![10, 60, 120, 200]).unwrap();
        let a = PipelineOptions {
            tone: vec![ToneStage::Gamma(2.0), ToneStage::Equalize],
            ..PipelineOptions::default()
        };
        let b = PipelineOptions {
            tone: vec![ToneStage::Equalize, ToneStage::Gamma(2.0)],
            ..PipelineOptions::default()
        };
        let out_a = Pipeline::new(a).run(&input).unwrap();
        let out_b = Pipeline::new(b).run(&input).unwrap();
        // Equalizing last spreads the four levels over the full range
        assert_eq!(out_a.raster.samples(), &[0, 85, 170, 255]);
        assert_eq!(out_b.raster.samples(), &[0, 28, 113, 255]);
        // Gray input is shared with the caller and copied, not modified
        assert_eq!(input.samples(), &[10, 60, 120, 200]);
    }

    #[test]
    fn test_core_errors_convert() {
        let err = PipelineError::from(grayline_core::Error::AllocationFailed(64));
        assert!(matches!(
            err,
            PipelineError::Core(grayline_core::Error::AllocationFailed(64))
        ));
        assert!(err.to_string().starts_with("core error: "));
    }

    #[test]
    fn test_threshold_reports_cut() {
        let input = Raster::from_samples(4, 1, Channels::Gray, vec![10, 10, 200, 200]).unwrap();
        let options = PipelineOptions {
            threshold: true,
            ..PipelineOptions::default()
        };
        let out = Pipeline::new(options).run(&input).unwrap();
        assert_eq!(out.threshold, Some(10));
        assert_eq!(out.raster.samples(), &[0, 0, 255, 255]);
    }

    #[test]
    fn test_invalid_gamma_fails() {
        let options = PipelineOptions {
            tone: vec![ToneStage::Gamma(0.0)],
            ..PipelineOptions::default()
        };
        let err = Pipeline::new(options).run(&rgb_gray_128()).unwrap_err();
        assert!(matches!(err, PipelineError::Filter(_)));
    }

    #[test]
    fn test_filter_stage_parse() {
        assert_eq!("mean".parse::<FilterStage>().unwrap(), FilterStage::Mean);
        assert_eq!(
            "sharpen".parse::<FilterStage>().unwrap(),
            FilterStage::Convolve(Kernel::sharpen())
        );
        assert!("median".parse::<FilterStage>().is_err());
    }
}
