use rain_machine::controls::{ControlFrame, ControlId};
use rain_machine::layout::ControlLayout;
use rain_machine::params::{
    convert_range, scale_bucket, RenderParams, BASE_CELL_SIZE, BASE_PIXEL_SIZE, MIN_MOD_VAL,
};

// ── Range conversion ────────────────────────────────────────────────────────

#[test]
fn convert_range_hits_exact_endpoints() {
    assert_eq!(convert_range(0.0, 0.0, 1.0, 0.0, 128.0), 0.0);
    assert_eq!(convert_range(1.0, 0.0, 1.0, 0.0, 128.0), 128.0);
    assert_eq!(convert_range(0.0, 0.0, 127.0, 0.0, 2.0), 0.0);
    assert_eq!(convert_range(127.0, 0.0, 127.0, 0.0, 2.0), 2.0);
}

#[test]
fn convert_range_is_monotonic() {
    let mut prev = convert_range(0.0, 0.0, 1.0, 0.0, 0.2);
    for step in 1..=100 {
        let v = step as f32 / 100.0;
        let mapped = convert_range(v, 0.0, 1.0, 0.0, 0.2);
        assert!(mapped >= prev, "not monotonic at {v}: {mapped} < {prev}");
        prev = mapped;
    }
}

#[test]
fn convert_range_clamps_out_of_range_inputs() {
    assert_eq!(convert_range(-3.0, 0.0, 1.0, 0.0, 128.0), 0.0);
    assert_eq!(convert_range(42.0, 0.0, 1.0, 0.0, 128.0), 128.0);
}

#[test]
fn convert_range_supports_inverted_destination() {
    // The hue mapping runs 180 -> -180 on purpose.
    assert_eq!(convert_range(0.0, 0.0, 1.0, 180.0, -180.0), 180.0);
    assert_eq!(convert_range(1.0, 0.0, 1.0, 180.0, -180.0), -180.0);
    assert_eq!(convert_range(0.5, 0.0, 1.0, 180.0, -180.0), 0.0);
}

#[test]
fn convert_range_degenerate_source_maps_to_dst_lo() {
    assert_eq!(convert_range(0.7, 0.3, 0.3, 5.0, 9.0), 5.0);
}

// ── Size bucketing ──────────────────────────────────────────────────────────

#[test]
fn buckets_are_power_of_two_multiples_of_their_bases() {
    for bucket in 0..8u32 {
        let cell = BASE_CELL_SIZE << bucket;
        let pixel = BASE_PIXEL_SIZE << bucket;
        assert_eq!(cell, 32 * 2usize.pow(bucket));
        assert_eq!(pixel, 2 * 2usize.pow(bucket));
        assert!(pixel <= cell);
        assert!(cell % pixel == 0);
    }
}

#[test]
fn scale_bucket_clamps_to_valid_indices() {
    assert_eq!(scale_bucket(-1.0), 0);
    assert_eq!(scale_bucket(0.0), 0);
    assert_eq!(scale_bucket(0.125), 1);
    assert_eq!(scale_bucket(0.99), 7);
    assert_eq!(scale_bucket(1.0), 7);
    assert_eq!(scale_bucket(50.0), 7);
}

#[test]
fn cell_and_pixel_size_share_one_bucket_index() {
    let layout = ControlLayout::default();
    for step in 0..=100 {
        let mut frame = ControlFrame::default();
        frame.set(ControlId::VerticalSlider3, step as f32 / 100.0);
        let params = RenderParams::derive(&frame, &layout);
        // Same index by construction: cell/pixel ratio is the base ratio.
        assert_eq!(params.cell_size / params.pixel_size, BASE_CELL_SIZE / BASE_PIXEL_SIZE);
        assert_eq!(params.cell_size % params.pixel_size, 0);
    }
}

// ── Parameter derivation ────────────────────────────────────────────────────

#[test]
fn derive_from_empty_frame_uses_zero_defaults() {
    let params = RenderParams::derive(&ControlFrame::default(), &ControlLayout::default());
    assert_eq!(params.i_mult, 0.0);
    assert_eq!(params.j_mult, 0.0);
    assert_eq!(params.expr_mult, 0.0);
    assert_eq!(params.threshold, 0.0);
    assert_eq!(params.speed, 0.0);
    assert_eq!(params.hue, 180.0);
    assert_eq!(params.background_hue, 0.0);
    assert!(!params.mono_foreground);
    assert!(!params.mono_background);
    // Zero scale input maps to scale factor 0.125, bucket 1.
    assert_eq!(params.cell_size, 64);
    assert_eq!(params.pixel_size, 4);
}

#[test]
fn derive_keeps_mod_val_strictly_positive() {
    let params = RenderParams::derive(&ControlFrame::default(), &ControlLayout::default());
    assert!(params.mod_val >= MIN_MOD_VAL);
    assert!(params.mod_val > 0.0);
}

#[test]
fn derive_maps_midpoints() {
    let layout = ControlLayout::default();
    let mut frame = ControlFrame::default();
    frame.set(ControlId::Knob1, 0.5);
    frame.set(ControlId::Knob3, 0.5);
    frame.set(ControlId::Knob4, 0.5);
    frame.set(ControlId::HorizontalSlider, 0.5);
    frame.set(ControlId::VerticalSlider2, 0.5);
    let params = RenderParams::derive(&frame, &layout);
    assert!((params.i_mult - 1.0).abs() < 1e-6);
    assert!((params.expr_mult - 64.0).abs() < 1e-4);
    assert!((params.mod_val - 64.0).abs() < 1e-4);
    assert!((params.speed - 0.1).abs() < 1e-6);
    assert!((params.background_hue - 180.0).abs() < 1e-4);
}

#[test]
fn derive_honors_native_ranges_from_layout() {
    let layout = ControlLayout::parse("range knob_1 0 127\nrange vertical_slider_3 0 1023")
        .expect("layout parse should succeed");
    let mut frame = ControlFrame::default();
    frame.set(ControlId::Knob1, 127.0);
    frame.set(ControlId::VerticalSlider3, 1023.0);
    let params = RenderParams::derive(&frame, &layout);
    assert!((params.i_mult - 2.0).abs() < 1e-5);
    assert_eq!(params.cell_size, 32 << 7);
    assert_eq!(params.pixel_size, 2 << 7);
}

#[test]
fn derive_reads_monochrome_buttons() {
    let mut frame = ControlFrame::default();
    frame.set(ControlId::ButtonUp, 1.0);
    frame.set(ControlId::ButtonDown, 1.0);
    let params = RenderParams::derive(&frame, &ControlLayout::default());
    assert!(params.mono_foreground);
    assert!(params.mono_background);
}
