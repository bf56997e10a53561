use std::sync::Arc;

use crate::image_pipeline::color::{ALL_CURVES, LogCurve};
use crate::image_pipeline::common::buffer::PixelBuffer;
use crate::image_pipeline::common::color_math::IDENTITY;
use crate::image_pipeline::common::error::PipelineError;
use crate::image_pipeline::lut::Lut3D;
use crate::image_pipeline::render::stages;
use crate::image_pipeline::render::{
    ColorPipeline, RenderSettings, RenderedFrame, ToneParameters, compute_statistics,
    statistics_stride,
};

fn neutral_settings(curve: LogCurve) -> RenderSettings {
    RenderSettings::builder()
        .log_curve(curve)
        .working_to_target(IDENTITY)
        .build()
}

fn gray_ramp(width: usize, height: usize) -> PixelBuffer {
    let mut data = Vec::with_capacity(width * height * 3);
    for y in 0..height {
        for x in 0..width {
            let v = ((x + y * width) * 997 % 65536) as u16;
            data.extend_from_slice(&[v, v / 2, v / 3]);
        }
    }
    PixelBuffer::rgb16(width, height, data).unwrap()
}

fn assert_close3(a: [f32; 3], b: [f32; 3], tol: f32) {
    for c in 0..3 {
        assert!((a[c] - b[c]).abs() <= tol, "{:?} vs {:?}", a, b);
    }
}

#[test]
fn neutral_pipeline_is_just_the_log_curve() {
    let buffer = gray_ramp(8, 4);
    for curve in ALL_CURVES {
        let frame = ColorPipeline::new(neutral_settings(curve))
            .render(&buffer)
            .unwrap();
        for y in 0..buffer.height {
            for x in 0..buffer.width {
                let raw = buffer.pixel(x, y);
                let linear = raw.map(|v| v as f32 / 65535.0);
                let px = frame.pixel(x, y);
                assert_close3([px[0], px[1], px[2]], curve.encode_rgb(linear), 1e-5);
            }
        }
    }
}

#[test]
fn neutral_pipeline_round_trips_through_inverse() {
    let buffer = PixelBuffer::rgb16(1, 1, vec![11796, 32768, 65535]).unwrap();
    for curve in ALL_CURVES {
        let frame = ColorPipeline::new(neutral_settings(curve))
            .render(&buffer)
            .unwrap();
        let px = frame.pixel(0, 0);
        let linear = curve.decode_rgb([px[0], px[1], px[2]]);
        assert_close3(linear, [11796.0 / 65535.0, 0.5, 1.0], 1e-3);
    }
}

#[test]
fn identity_lut_is_a_no_op() {
    let buffer = gray_ramp(16, 8);
    let plain = ColorPipeline::new(RenderSettings::default());
    let with_lut = ColorPipeline::new(
        RenderSettings::builder()
            .lut(Some(Arc::new(Lut3D::identity(33).unwrap())))
            .build(),
    );
    let a = plain.render(&buffer).unwrap();
    let b = with_lut.render(&buffer).unwrap();
    for (x, y) in a.data.iter().zip(b.data.iter()) {
        assert!((x - y).abs() < 1e-5);
    }
}

#[test]
fn frame_rows_are_bottom_up_with_opaque_alpha() {
    let buffer = PixelBuffer::rgb16(1, 2, vec![65535, 65535, 65535, 0, 0, 0]).unwrap();
    let frame = ColorPipeline::new(neutral_settings(LogCurve::None))
        .render(&buffer)
        .unwrap();

    assert_eq!(frame.data.len(), 2 * RenderedFrame::CHANNELS);
    // Storage row 0 is the bottom (black) image row.
    assert_eq!(&frame.data[0..4], &[0.0, 0.0, 0.0, 1.0]);
    assert_close3([frame.data[4], frame.data[5], frame.data[6]], [1.0; 3], 1e-5);
    assert_eq!(frame.pixel(0, 0)[3], 1.0);
    assert!(frame.pixel(0, 0)[0] > 0.99);
}

#[test]
fn mono_input_broadcasts_to_rgb() {
    let mono = PixelBuffer::new(2, 1, 1, 8, vec![64, 200]).unwrap();
    let rgb = PixelBuffer::new(2, 1, 3, 8, vec![64, 64, 64, 200, 200, 200]).unwrap();
    let pipeline = ColorPipeline::default();
    let a = pipeline.render(&mono).unwrap();
    let b = pipeline.render(&rgb).unwrap();
    assert_eq!(a.data, b.data);
}

#[test]
fn white_balance_runs_before_camera_matrix() {
    // Swaps red and green.
    let swap = [0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0];
    let settings = RenderSettings::builder()
        .wb_multipliers([2.0, 1.0, 1.0])
        .cam_to_working(swap)
        .working_to_target(IDENTITY)
        .log_curve(LogCurve::None)
        .build();
    let encoded = stages::process_pixel([100, 300, 200], 1000.0, &settings);
    let linear = LogCurve::None.decode_rgb(encoded);
    assert_close3(linear, [0.3, 0.2, 0.2], 1e-4);
}

#[test]
fn exposure_runs_before_contrast() {
    let tone = ToneParameters::builder().exposure(1.0).contrast(0.5).build();
    // (0.1 * 2 - 0.18) * 0.5 + 0.18
    let out = stages::tone_adjust([0.1; 3], &tone);
    assert_close3(out, [0.19; 3], 1e-6);
}

#[test]
fn tone_stages() {
    assert_close3(stages::exposure([0.1, 0.2, 0.3], 1.0), [0.2, 0.4, 0.6], 1e-6);
    assert_close3(stages::exposure([0.2; 3], -2.0), [0.05; 3], 1e-6);

    // (0.2 + 0.05) * 1.25
    assert_close3(stages::levels([0.2; 3], 0.5, 0.5), [0.3125; 3], 1e-6);

    assert_close3(stages::contrast([0.18; 3], 1.5), [0.18; 3], 1e-6);
    assert_close3(stages::contrast([0.28; 3], 1.5), [0.33; 3], 1e-6);

    let gray = stages::saturation([0.4, 0.2, 0.1], 0.0);
    assert!((gray[0] - gray[1]).abs() < 1e-6 && (gray[1] - gray[2]).abs() < 1e-6);
    assert_close3(stages::saturation([0.4, 0.2, 0.1], 1.0), [0.4, 0.2, 0.1], 1e-6);
}

#[test]
fn shadow_and_highlight_masks() {
    // Black: full shadow mask, no highlight mask.
    assert_close3(stages::shadows_highlights([0.0; 3], 1.0, 1.0), [0.0; 3], 1e-6);
    assert_close3(stages::shadows_highlights([0.01; 3], 1.0, 0.0), [0.015; 3], 1e-4);
    // Mid luma 0.5: both masks are zero.
    assert_close3(stages::shadows_highlights([0.5; 3], 1.0, 1.0), [0.5; 3], 1e-5);
    // White: full highlight mask.
    assert_close3(stages::shadows_highlights([1.0; 3], 0.0, -1.0), [0.5; 3], 1e-5);
    assert_eq!(stages::smoothstep(0.0, 0.5, 0.25), 0.5);
}

#[test]
fn gamut_stage_clamps_negatives() {
    let m = [1.0, -2.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];
    assert_eq!(stages::to_target_gamut([0.1, 0.2, 0.3], &m), [0.0, 0.2, 0.3]);
}

#[test]
fn input_gamma_linearises() {
    let out = stages::normalize([128, 255, 0], 255.0, 2.2);
    assert!((out[0] - (128.0f32 / 255.0).powf(2.2)).abs() < 1e-6);
    assert_eq!(out[1], 1.0);
    assert_eq!(out[2], 0.0);
    let unchanged = stages::normalize([128, 255, 0], 255.0, 1.0);
    assert!((unchanged[0] - 128.0 / 255.0).abs() < 1e-7);
}

#[test]
fn out_of_range_parameters_still_render() {
    let tone = ToneParameters::builder()
        .exposure(12.0)
        .saturation(4.0)
        .contrast(-3.0)
        .highlights(9.0)
        .build();
    let frame = ColorPipeline::new(RenderSettings::builder().tone(tone).build())
        .render(&gray_ramp(4, 4))
        .unwrap();
    assert!(frame.data.iter().all(|v| v.is_finite()));
}

#[test]
fn malformed_resources_fail() {
    let broken = Lut3D {
        title: None,
        size: 2,
        data: vec![0.0; 10],
        domain_min: [0.0; 3],
        domain_max: [1.0; 3],
    };
    let pipeline = ColorPipeline::new(RenderSettings::builder().lut(Some(Arc::new(broken))).build());
    assert!(matches!(
        pipeline.render(&gray_ramp(2, 2)),
        Err(PipelineError::InsufficientLutData { expected: 24, got: 10 })
    ));

    let empty = PixelBuffer {
        width: 0,
        height: 0,
        channels: 3,
        bit_depth: 16,
        data: vec![],
    };
    assert!(ColorPipeline::default().render(&empty).is_err());
}

#[test]
fn curve_selects_matching_gamut() {
    let settings = RenderSettings::builder().log_curve(LogCurve::SLog3).build();
    assert_eq!(
        settings.working_to_target,
        LogCurve::SLog3.target_gamut().from_prophoto()
    );
}

#[test]
fn statistics_match_render() {
    let buffer = PixelBuffer::rgb16(4, 4, vec![30000; 48]).unwrap();
    let pipeline = ColorPipeline::new(neutral_settings(LogCurve::VLog));
    let stats = pipeline.render_statistics(&buffer).unwrap();
    let expected = LogCurve::VLog.encode(30000.0 / 65535.0);
    assert!((stats.mean - expected).abs() < 1e-5);
    assert!((stats.min - stats.max).abs() < 1e-6);
    assert_eq!(stats.samples, 16);

    let frame = pipeline.render(&gray_ramp(8, 8)).unwrap();
    let ramp = compute_statistics(&frame).unwrap();
    assert!(ramp.min <= ramp.mean && ramp.mean <= ramp.max);
}

#[test]
fn statistics_reject_short_frames() {
    let short = RenderedFrame {
        width: 4,
        height: 4,
        data: vec![0.5; 4 * 4],
    };
    assert!(matches!(
        compute_statistics(&short),
        Err(PipelineError::InvalidBuffer(_))
    ));

    let overflowing = RenderedFrame {
        width: usize::MAX,
        height: 2,
        data: vec![0.5; 8],
    };
    assert!(matches!(
        compute_statistics(&overflowing),
        Err(PipelineError::InvalidBuffer(_))
    ));
}

#[test]
fn metering_sees_the_working_space() {
    let settings = RenderSettings::builder()
        .wb_multipliers([2.0, 1.0, 0.5])
        .cam_to_working(IDENTITY)
        .tone(ToneParameters::builder().input_gamma(2.0).build())
        .build();
    let space = settings.working_space();
    assert_eq!(space.wb_multipliers, [2.0, 1.0, 0.5]);
    assert_eq!(space.cam_to_working, IDENTITY);
    assert_eq!(space.input_gamma, 2.0);

    let raw = [32768, 65535, 16384];
    let working = space.apply(raw, 65535.0);
    let expected = stages::white_balance(stages::normalize(raw, 65535.0, 2.0), &[2.0, 1.0, 0.5]);
    for c in 0..3 {
        assert!((working[c] - expected[c]).abs() < 1e-6);
    }
}

#[test]
fn statistics_stride_bounds_samples() {
    assert_eq!(statistics_stride(100, 100), 1);
    assert_eq!(statistics_stride(632, 632), 1);
    assert_eq!(statistics_stride(1000, 1000), 2);
    assert_eq!(statistics_stride(6000, 4000), 8);
    for (w, h) in [(6000usize, 4000usize), (8192, 5464), (1000, 1000)] {
        let s = statistics_stride(w, h);
        assert!(w.div_ceil(s) * h.div_ceil(s) <= 400_000);
    }
}
