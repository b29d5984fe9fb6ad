//! Color reduction regression test
//!
//! Compares the scalar, fixed-point and average reducers on synthetic RGB
//! images, including widths that leave a partial lane.

use grayline_color::luma::{LANE_WIDTH, MAX_FIXED_POINT_DEVIATION};
use grayline_color::{
    AverageReducer, ColorReducer, FixedPointReducer, ReducerKind, ScalarReducer, reduce_to_gray,
};
use grayline_core::Channels;
use grayline_io::{decode_ppm, encode_ppm};
use grayline_test::RegParams;
use grayline_test::synthetic::{rgb_constant, rgb_ramp};

#[test]
fn luma_reg() {
    let mut rp = RegParams::new("luma");

    // --- Test 1: Neutral gray survives every reducer ---
    let neutral = rgb_constant(2, 2, 128, 128, 128);
    for kind in [
        ReducerKind::Scalar,
        ReducerKind::FixedPoint,
        ReducerKind::Average,
    ] {
        let gray = reduce_to_gray(&neutral, kind).expect("reduce");
        rp.check(gray.channels() == Channels::Gray, "single channel output");
        rp.compare_strings(&[128; 4], gray.samples());
        eprintln!("  {}: {:?}", kind, gray.samples());
    }

    // --- Test 2: Scalar vs fixed-point across lane boundaries ---
    for &width in &[1u32, 7, 8, 9, 15, 16, 17, 63, 64, 100] {
        let rgb = rgb_ramp(width, 13);
        let scalar = ScalarReducer.reduce(&rgb).expect("scalar");
        let fixed = FixedPointReducer.reduce(&rgb).expect("fixed");
        rp.compare_values((width * 13) as f64, fixed.samples().len() as f64, 0.0);

        let max_diff = scalar
            .samples()
            .iter()
            .zip(fixed.samples())
            .map(|(s, f)| s.abs_diff(*f))
            .max()
            .unwrap_or(0);
        let above = scalar
            .samples()
            .iter()
            .zip(fixed.samples())
            .any(|(s, f)| f > s);
        rp.check(
            max_diff <= MAX_FIXED_POINT_DEVIATION,
            &format!("width {width}: deviation {max_diff}"),
        );
        rp.check(!above, &format!("width {width}: fixed-point above scalar"));
        eprintln!(
            "  width {:3} ({} lanes + {}): max deviation {}",
            width,
            width as usize * 13 / LANE_WIDTH,
            width as usize * 13 % LANE_WIDTH,
            max_diff
        );
    }

    // --- Test 3: Average reducer ---
    let rgb = rgb_constant(3, 1, 10, 20, 31);
    let avg = AverageReducer.reduce(&rgb).expect("average");
    rp.compare_strings(&[20; 3], avg.samples());

    // --- Test 4: Decode then reduce ---
    let ramp = rgb_ramp(24, 8);
    let decoded = decode_ppm(&encode_ppm(&ramp).expect("encode")).expect("decode");
    let direct = ScalarReducer.reduce(&ramp).expect("reduce direct");
    let via_codec = ScalarReducer.reduce(&decoded).expect("reduce decoded");
    rp.compare_rasters(&direct, &via_codec);
    rp.write_raster(&direct).expect("write_raster");

    // --- Test 5: Gray input is rejected ---
    rp.check(
        ScalarReducer.reduce(&direct).is_err(),
        "reduce requires rgb input",
    );

    assert!(rp.cleanup(), "luma regression test failed");
}
