//! End-to-end pipeline regression test
//!
//! Runs decode -> pipeline -> encode in memory and drives the `grayline`
//! binary on files.

use grayline::color::ReducerKind;
use grayline::filter::Kernel;
use grayline::io::{IoError, decode_pgm, decode_ppm, encode_pgm, encode_ppm, read_image};
use grayline::{Channels, FilterStage, Pipeline, PipelineOptions, Raster, ToneStage};
use grayline_test::RegParams;
use grayline_test::synthetic::{rgb_constant, rgb_ramp};
use std::path::{Path, PathBuf};
use std::process::Command;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("grayline-{}-{}", name, std::process::id()));
    std::fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_grayline"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("spawn grayline")
}

fn path_str(p: &Path) -> &str {
    p.to_str().expect("utf-8 path")
}

#[test]
fn pipeline_reg() {
    let mut rp = RegParams::new("pipeline");

    // --- Test 1: Neutral 2x2 image through every reducer ---
    let ppm = encode_ppm(&rgb_constant(2, 2, 128, 128, 128)).unwrap();
    for reducer in [ReducerKind::Scalar, ReducerKind::FixedPoint] {
        let input = decode_ppm(&ppm).expect("decode");
        let options = PipelineOptions {
            reducer,
            ..PipelineOptions::default()
        };
        let out = Pipeline::new(options).run(&input).expect("run");
        rp.check(out.raster.channels() == Channels::Gray, "gray output");
        rp.compare_values(2.0, out.raster.width() as f64, 0.0);
        rp.compare_values(2.0, out.raster.height() as f64, 0.0);
        rp.compare_strings(&[128; 4], out.raster.samples());
        let pgm = encode_pgm(&out.raster).unwrap();
        rp.compare_strings(b"P5\n2 2\n255\n\x80\x80\x80\x80", &pgm);
    }

    // --- Test 2: Decode failures ---
    let mut bad = b"P6\n2 2\n300\n".to_vec();
    bad.extend_from_slice(&[0; 12]);
    rp.check(
        matches!(decode_ppm(&bad), Err(IoError::Range(_))),
        "max value 300 is a range error",
    );
    let mut short = b"P6\n2 2\n255\n".to_vec();
    short.extend_from_slice(&[0; 5]);
    rp.check(
        matches!(decode_ppm(&short), Err(IoError::Truncated(_))),
        "short pixel data is truncated",
    );

    // --- Test 3: Full chain keeps dimensions and binarizes ---
    let ramp = rgb_ramp(50, 30);
    let options = PipelineOptions {
        reducer: ReducerKind::FixedPoint,
        tone: vec![ToneStage::Equalize, ToneStage::Gamma(0.8)],
        filter: Some(FilterStage::Convolve(Kernel::gaussian())),
        threshold: true,
    };
    let out = Pipeline::new(options).run(&ramp).expect("full chain");
    rp.compare_values(50.0, out.raster.width() as f64, 0.0);
    rp.compare_values(30.0, out.raster.height() as f64, 0.0);
    rp.check(out.threshold.is_some(), "threshold reported");
    rp.check(
        out.raster.samples().iter().all(|&v| v == 0 || v == 255),
        "binary output",
    );
    rp.write_raster(&out.raster).expect("write_raster");

    // --- Test 4: Mean filter stage ---
    let options = PipelineOptions {
        filter: Some(FilterStage::Mean),
        ..PipelineOptions::default()
    };
    let out = Pipeline::new(options)
        .run(&rgb_constant(5, 3, 90, 90, 90))
        .unwrap();
    rp.compare_strings(&[90; 15], out.raster.samples());

    // --- Test 5: Command line ---
    let dir = scratch_dir("cli");
    let input = dir.join("in.ppm");
    let output = dir.join("out.pgm");
    std::fs::write(&input, &ppm).unwrap();

    let result = run_cli(&[path_str(&input), path_str(&output)]);
    rp.check(result.status.success(), "cli exits successfully");
    let stdout = String::from_utf8_lossy(&result.stdout);
    rp.check(
        stdout.contains("File converted successfully."),
        "cli prints success message",
    );
    let written = read_image(&output).expect("read cli output");
    rp.compare_strings(&[128; 4], written.samples());
    let reread = decode_pgm(&std::fs::read(&output).unwrap()).unwrap();
    rp.compare_rasters(&written, &reread);

    let ramp_path = dir.join("ramp.ppm");
    std::fs::write(&ramp_path, encode_ppm(&ramp).unwrap()).unwrap();
    let result = run_cli(&[
        path_str(&ramp_path),
        path_str(&output),
        "--reducer",
        "scalar",
        "--gamma",
        "2.0",
        "--equalize",
        "--filter",
        "mean",
        "--threshold",
    ]);
    rp.check(result.status.success(), "cli accepts every stage flag");
    let binary = read_image(&output).unwrap();
    rp.check(
        binary.samples().iter().all(|&v| v == 0 || v == 255),
        "cli threshold output is binary",
    );

    std::fs::write(&input, &bad).unwrap();
    let failed_output = dir.join("never.pgm");
    let result = run_cli(&[path_str(&input), path_str(&failed_output)]);
    rp.check(!result.status.success(), "cli fails on bad max value");
    rp.check(!failed_output.exists(), "no output written on failure");

    let result = run_cli(&[path_str(&dir.join("missing.ppm")), path_str(&output)]);
    rp.check(!result.status.success(), "cli fails on missing input");

    let result = run_cli(&[path_str(&ramp_path), path_str(&output), "--gamma", "-1"]);
    rp.check(!result.status.success(), "cli fails on negative gamma");

    // --- Test 6: Tone stages follow command-line order ---
    let mut levels = Vec::new();
    for v in [10u8, 60, 120, 200] {
        levels.extend_from_slice(&[v, v, v]);
    }
    let levels = Raster::from_samples(4, 1, Channels::Rgb, levels).unwrap();
    let levels_path = dir.join("levels.ppm");
    std::fs::write(&levels_path, encode_ppm(&levels).unwrap()).unwrap();
    let orders: [(&[&str], Vec<ToneStage>, [u8; 4]); 2] = [
        (
            &["--gamma", "2.0", "--equalize"],
            vec![ToneStage::Gamma(2.0), ToneStage::Equalize],
            [0, 85, 170, 255],
        ),
        (
            &["--equalize", "--gamma", "2.0"],
            vec![ToneStage::Equalize, ToneStage::Gamma(2.0)],
            [0, 28, 113, 255],
        ),
    ];
    let mut cli_outputs = Vec::new();
    for (flags, tone, expected) in orders {
        let mut args = vec![
            path_str(&levels_path),
            path_str(&output),
            "--reducer",
            "scalar",
        ];
        args.extend_from_slice(flags);
        let result = run_cli(&args);
        rp.check(result.status.success(), &format!("cli accepts {flags:?}"));
        let from_cli = read_image(&output).expect("read tone output");
        rp.compare_strings(&expected, from_cli.samples());

        let options = PipelineOptions {
            reducer: ReducerKind::Scalar,
            tone,
            ..PipelineOptions::default()
        };
        let in_process = Pipeline::new(options).run(&levels).expect("tone run");
        rp.compare_rasters(&in_process.raster, &from_cli);
        eprintln!("  {:?}: {:?}", flags, from_cli.samples());
        cli_outputs.push(from_cli);
    }
    rp.check(
        cli_outputs[0].samples() != cli_outputs[1].samples(),
        "tone order changes the result",
    );

    std::fs::remove_dir_all(&dir).ok();

    assert!(rp.cleanup(), "pipeline regression test failed");
}
