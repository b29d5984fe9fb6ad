use anyhow::Context;
use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use grayline::color::ReducerKind;
use grayline::filter::Kernel;
use grayline::{FilterStage, Pipeline, PipelineOptions, ToneStage};

#[derive(Parser)]
#[command(name = "grayline")]
#[command(about = "Convert a binary PPM (P6) image to a grayscale PGM (P5)")]
#[command(version)]
struct Cli {
    /// Input image (P6, or P5 to skip color reduction)
    input: PathBuf,

    /// Output PGM file path
    output: PathBuf,

    /// Color reduction strategy: scalar, fixed-point or average
    #[arg(long, default_value_t = ReducerKind::default())]
    reducer: ReducerKind,

    /// Equalize the histogram
    #[arg(long)]
    equalize: bool,

    /// Apply gamma correction; may be given more than once
    #[arg(long, value_name = "G")]
    gamma: Vec<f64>,

    /// 3x3 neighborhood filter
    #[arg(long, value_enum, default_value_t = FilterArg::None)]
    filter: FilterArg,

    /// Binarize the result with Otsu's method
    #[arg(long)]
    threshold: bool,

    /// Log stage progress
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FilterArg {
    None,
    Mean,
    Box,
    Gaussian,
    Sharpen,
    Identity,
}

impl FilterArg {
    fn stage(self) -> Option<FilterStage> {
        match self {
            FilterArg::None => None,
            FilterArg::Mean => Some(FilterStage::Mean),
            FilterArg::Box => Some(FilterStage::Convolve(Kernel::box_kernel())),
            FilterArg::Gaussian => Some(FilterStage::Convolve(Kernel::gaussian())),
            FilterArg::Sharpen => Some(FilterStage::Convolve(Kernel::sharpen())),
            FilterArg::Identity => Some(FilterStage::Convolve(Kernel::identity())),
        }
    }
}

/// Tone stages ordered by their position on the command line.
fn tone_stages(cli: &Cli, matches: &ArgMatches) -> Vec<ToneStage> {
    let mut stages: Vec<(usize, ToneStage)> = Vec::new();

    if cli.equalize {
        let index = matches.index_of("equalize").unwrap_or(0);
        stages.push((index, ToneStage::Equalize));
    }
    if let Some(indices) = matches.indices_of("gamma") {
        for (index, &g) in indices.zip(&cli.gamma) {
            stages.push((index, ToneStage::Gamma(g)));
        }
    }

    stages.sort_by_key(|(index, _)| *index);
    stages.into_iter().map(|(_, stage)| stage).collect()
}

fn init_logging(verbose: bool) {
    let default = if verbose { "grayline=info" } else { "grayline=warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();
}

fn main() -> anyhow::Result<()> {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches)?;
    init_logging(cli.verbose);

    let options = PipelineOptions {
        reducer: cli.reducer,
        tone: tone_stages(&cli, &matches),
        filter: cli.filter.stage(),
        threshold: cli.threshold,
    };
    tracing::info!(?options, "starting conversion");

    let input = grayline::io::read_image(&cli.input)
        .with_context(|| format!("Failed to read {}", cli.input.display()))?;

    let output = Pipeline::new(options)
        .run(&input)
        .context("Failed to process image")?;

    grayline::io::write_image(&output.raster, &cli.output)
        .with_context(|| format!("Failed to write {}", cli.output.display()))?;

    println!("File converted successfully.");
    Ok(())
}
