//! Integration tests for the color pipeline.

use nodecut_color::{AlphaState, ColorService, ColorSpace};
use nodecut_core::{Frame, PixelFormat};

#[test]
fn decoded_frame_flows_through_the_cpu_color_path() {
    let frame = Frame::test_pattern(64, 36);
    let mut frame = frame.convert(PixelFormat::Rgba32F).unwrap();

    let service = ColorService::new(ColorSpace::SRGB, ColorSpace::LinearSRGB);
    let out = service
        .convert_frame(&mut frame, AlphaState::Unassociated)
        .unwrap();
    assert_eq!(out, AlphaState::Associated);

    // The bars are opaque, so every linearized value stays in [0, 1]
    let pixels = frame.as_f32().unwrap();
    assert!(pixels.iter().all(|v| (0.0..=1.0).contains(v)));
}

#[test]
fn gpu_processor_agrees_with_cpu_path_on_opaque_gray() {
    let service = ColorService::new(ColorSpace::SRGB, ColorSpace::LinearSRGB);
    let proc = service.processor();

    let mut frame = Frame::new(1, 1, PixelFormat::Rgba32F);
    let px = frame.as_f32_mut().unwrap();
    px.copy_from_slice(&[0.5, 0.5, 0.5, 1.0]);
    service
        .convert_frame(&mut frame, AlphaState::Unassociated)
        .unwrap();
    let cpu = frame.as_f32().unwrap()[0];

    // Apply the processor the way the shader does
    let linear = proc.to_linear.to_linear(0.5);
    let gpu = proc.from_linear.from_linear(
        proc.matrix[0][0] * linear + proc.matrix[0][1] * linear + proc.matrix[0][2] * linear,
    );
    assert!((cpu - gpu).abs() < 1e-5);
}

#[test]
fn reference_space_transform_is_stable_under_repetition() {
    let service = ColorService::new(ColorSpace::LinearSRGB, ColorSpace::LinearSRGB);
    let mut frame = Frame::new(2, 1, PixelFormat::Rgba32F);
    frame
        .as_f32_mut()
        .unwrap()
        .copy_from_slice(&[0.25, 0.5, 0.75, 1.0, 0.1, 0.2, 0.3, 1.0]);
    let expected = frame.as_f32().unwrap().to_vec();

    for _ in 0..3 {
        service
            .convert_frame(&mut frame, AlphaState::Associated)
            .unwrap();
    }
    let actual = frame.as_f32().unwrap();
    for (a, e) in actual.iter().zip(&expected) {
        assert!((a - e).abs() < 1e-4);
    }
}
