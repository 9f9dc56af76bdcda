// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! End-to-end runs on a real device.
//!
//! When no hardware adapter is found, the tests retry with the platform's software fallback
//! adapter (lavapipe, WARP and the like).  Only when that also reports
//! [FilterError::GpuUnavailable] do they log it and pass, since there is nothing to exercise.
#[cfg(target_arch = "wasm32")]
wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

use std::time::Duration;

use edges_and_gradients::kernel::KernelProgram;
use edges_and_gradients::{
    BoundDevice, FilterError, Options, OutputImage, SobelFilter, SourceImage, process_image, process_image_with, software,
};
use test_executors::async_test;

/// Options under which a device can be acquired: hardware first, then the fallback adapter.
async fn device_options() -> Option<Options> {
    for options in [
        Options::from_env(),
        Options::from_env().with_force_fallback_adapter(true),
    ] {
        match BoundDevice::acquire(&options).await {
            Ok(device) => {
                logwise::info_sync!(
                    "Testing on {adapter}",
                    adapter = logwise::privacy::LogIt(&device.adapter_info())
                );
                return Some(options);
            }
            Err(FilterError::GpuUnavailable) => continue,
            Err(e) => panic!("Failed to acquire a device: {e}"),
        }
    }
    println!("No compute-capable GPU or fallback adapter, skipping");
    None
}

async fn filter() -> Option<SobelFilter> {
    let options = device_options().await?;
    Some(SobelFilter::new(&options).await.unwrap())
}

/// Deterministic noise, so a failure is reproducible.
fn noise(width: u32, height: u32) -> SourceImage {
    let mut state: u32 = 0x2545_f491;
    let gray: Vec<u8> = (0..width * height)
        .map(|_| {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            (state >> 24) as u8
        })
        .collect();
    SourceImage::from_gray(width, height, &gray).unwrap()
}

/// Device and host sqrt may differ by an ulp, so channels may differ by one.
fn assert_matches_software(gpu: &OutputImage, image: &SourceImage) {
    let cpu = software::process_image(image).unwrap();
    assert_eq!((gpu.width(), gpu.height()), (cpu.width(), cpu.height()));
    for (i, (g, c)) in gpu.pixels().iter().zip(cpu.pixels()).enumerate() {
        assert!(
            g.abs_diff(*c) <= 1,
            "{}x{} byte {i}: gpu {g} cpu {c}",
            cpu.width(),
            cpu.height()
        );
    }
}

fn step_5x5() -> SourceImage {
    let mut gray = Vec::new();
    for _ in 0..5 {
        gray.extend_from_slice(&[0, 0, 255, 255, 255]);
    }
    SourceImage::from_gray(5, 5, &gray).unwrap()
}

#[async_test]
async fn flat_image_has_no_edges() {
    let Some(mut filter) = filter().await else {
        return;
    };
    let image = SourceImage::filled(20, 12, [90, 90, 90, 255]).unwrap();
    let out = filter.process(&image).await.unwrap();
    assert_eq!((out.width(), out.height()), (20, 12));
    for y in 0..12 {
        for x in 0..20 {
            assert_eq!(out.pixel(x, y), [0, 0, 0, 255], "({x},{y})");
        }
    }
}

#[async_test]
async fn step_edge_saturates_both_sides() {
    let Some(mut filter) = filter().await else {
        return;
    };
    let out = filter.process(&step_5x5()).await.unwrap();
    for y in 0..5 {
        assert_eq!(out.pixel(1, y), [255, 255, 255, 255]);
        assert_eq!(out.pixel(2, y), [255, 255, 255, 255]);
        assert_eq!(out.pixel(0, y), [0, 0, 0, 255]);
        assert_eq!(out.pixel(3, y), [0, 0, 0, 255]);
        assert_eq!(out.pixel(4, y), [0, 0, 0, 255]);
    }
}

#[async_test]
async fn matches_software_reference() {
    let Some(mut filter) = filter().await else {
        return;
    };
    // 17x33 straddles tile boundaries on both axes
    for (width, height) in [(17, 33), (64, 64), (1, 40), (3, 1)] {
        let image = noise(width, height);
        let gpu = filter.process(&image).await.unwrap();
        assert_eq!((gpu.width(), gpu.height()), (width, height));
        assert_matches_software(&gpu, &image);
    }
}

#[async_test]
async fn free_function_acquires_and_releases() {
    let Some(options) = device_options().await else {
        return;
    };
    let image = step_5x5();
    let out = process_image_with(&image, &options, &KernelProgram::sobel())
        .await
        .unwrap();
    assert_eq!(out.pixel(1, 0), [255, 255, 255, 255]);

    // the default entry point may find nothing where the fallback adapter did
    match process_image(&image).await {
        Ok(out) => assert_matches_software(&out, &image),
        Err(FilterError::GpuUnavailable) => {}
        Err(e) => panic!("process_image failed: {e}"),
    }
}

#[async_test]
async fn bad_program_fails_to_compile() {
    let Some(options) = device_options().await else {
        return;
    };
    let program = KernelProgram::new("broken", "@compute @workgroup_size(16, 16, 1) fn main( {");
    match SobelFilter::with_program(&options, &program).await {
        Err(FilterError::ShaderCompileError(message)) => assert!(!message.is_empty()),
        Err(e) => panic!("Expected a compile error, got {e}"),
        Ok(_) => panic!("Broken program compiled"),
    }
}

#[async_test]
async fn generous_timeout_does_not_fire() {
    let Some(options) = device_options().await else {
        return;
    };
    let options = options.with_map_timeout(Duration::from_secs(60));
    let mut filter = SobelFilter::new(&options).await.unwrap();
    let image = noise(33, 17);
    let out = filter.process(&image).await.unwrap();
    assert_matches_software(&out, &image);
}
