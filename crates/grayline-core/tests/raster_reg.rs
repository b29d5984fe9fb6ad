//! Raster regression test
//!
//! Construction, sample access, clamp-to-edge sampling and histogram
//! statistics.

use grayline_core::{Channels, Error, Histogram, Raster};
use grayline_test::RegParams;
use grayline_test::synthetic::{gray_gradient, gray_two_cluster, rgb_ramp};

#[test]
fn raster_reg() {
    let mut rp = RegParams::new("raster");

    // --- Test 1: Construction invariants ---
    for &(w, h, channels) in &[
        (1, 1, Channels::Gray),
        (7, 3, Channels::Rgb),
        (64, 48, Channels::Gray),
    ] {
        let r = Raster::new(w, h, channels).expect("new raster");
        rp.compare_values(
            (w * h * channels.count()) as f64,
            r.samples().len() as f64,
            0.0,
        );
        rp.compare_values((w * channels.count()) as f64, r.stride() as f64, 0.0);
        eprintln!(
            "  new({}, {}, {:?}): {} samples",
            w,
            h,
            channels,
            r.samples().len()
        );
    }

    let zero = Raster::new(0, 5, Channels::Gray);
    rp.check(
        matches!(zero, Err(Error::InvalidDimension { .. })),
        "zero width rejected",
    );
    let short = Raster::from_samples(2, 2, Channels::Rgb, vec![0; 11]);
    rp.check(
        matches!(
            short,
            Err(Error::SampleCountMismatch {
                expected: 12,
                actual: 11
            })
        ),
        "sample count mismatch rejected",
    );

    // --- Test 2: Shared and exclusive handles ---
    let gradient = gray_gradient(16, 4);
    let shared = gradient.clone();
    rp.compare_values(2.0, gradient.ref_count() as f64, 0.0);
    let mut exclusive = shared.into_mut().expect("into_mut");
    exclusive.set_sample(0, 0, 99).expect("set_sample");
    rp.compare_values(0.0, gradient.get_sample(0, 0).unwrap() as f64, 0.0);
    let modified: Raster = exclusive.into();
    let copy = modified.deep_clone().expect("deep_clone");
    rp.compare_rasters(&modified, &copy);
    rp.compare_values(1.0, copy.ref_count() as f64, 0.0);
    rp.compare_values(99.0, modified.get_sample(0, 0).unwrap() as f64, 0.0);

    // --- Test 3: Clamp-to-edge sampling ---
    let r = Raster::from_samples(3, 2, Channels::Gray, vec![1, 2, 3, 4, 5, 6]).unwrap();
    rp.compare_values(1.0, r.sample_clamped(-1, -1) as f64, 0.0);
    rp.compare_values(3.0, r.sample_clamped(3, -4) as f64, 0.0);
    rp.compare_values(4.0, r.sample_clamped(-2, 9) as f64, 0.0);
    rp.compare_values(6.0, r.sample_clamped(100, 100) as f64, 0.0);
    rp.compare_values(5.0, r.sample_clamped(1, 1) as f64, 0.0);

    // --- Test 4: RGB access ---
    let rgb = rgb_ramp(9, 5);
    let (red, _, _) = rgb.get_rgb(8, 0).unwrap();
    rp.compare_values((8 * 255 / 9) as f64, red as f64, 0.0);
    rp.check(rgb.get_sample(0, 0).is_none(), "get_sample on rgb is None");
    rp.check(rgb.gray_histogram().is_err(), "histogram requires gray");

    // --- Test 5: Histogram statistics ---
    let clusters = gray_two_cluster(10, 10, 10, 200);
    let hist = clusters.gray_histogram().unwrap();
    rp.compare_values(100.0, hist.total() as f64, 0.0);
    rp.compare_values(50.0, hist[10] as f64, 0.0);
    rp.compare_values(50.0, hist[200] as f64, 0.0);
    rp.compare_values(10.0, hist.min_value().unwrap() as f64, 0.0);
    rp.compare_values(200.0, hist.max_value().unwrap() as f64, 0.0);
    let cum = hist.cumulative();
    rp.compare_values(50.0, cum[199] as f64, 0.0);
    rp.compare_values(100.0, cum[255] as f64, 0.0);

    let empty = Histogram::from_counts([0; 256]);
    rp.check(empty.min_value().is_none(), "empty histogram has no min");
    rp.check(empty.max_value().is_none(), "empty histogram has no max");

    rp.write_raster(&clusters).expect("write_raster");

    assert!(rp.cleanup(), "raster regression test failed");
}
