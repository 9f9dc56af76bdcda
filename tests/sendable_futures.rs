// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! Futures returned by this crate are Send, so they can be spawned onto multithreaded
//! executors.  These are compile-time checks; nothing needs a GPU.
#![cfg(not(target_arch = "wasm32"))]

use edges_and_gradients::buffer::DeviceBuffer;
use edges_and_gradients::dispatch::CompletionToken;
use edges_and_gradients::kernel::KernelProgram;
use edges_and_gradients::{BoundDevice, Options, SobelFilter, SourceImage, process_image, process_image_with};

fn assert_send<T: Send>(_: &T) {}
fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn handles_are_thread_safe() {
    assert_send_sync::<BoundDevice>();
    assert_send_sync::<SobelFilter>();
    assert_send_sync::<DeviceBuffer>();
    assert_send_sync::<CompletionToken>();
}

#[test]
fn process_futures_are_send() {
    let image = SourceImage::filled(2, 2, [0, 0, 0, 255]).unwrap();
    let options = Options::default();
    let program = KernelProgram::sobel();

    // Never polled; constructing them is enough to check the bound.
    let one_shot = process_image(&image);
    assert_send(&one_shot);
    let explicit = process_image_with(&image, &options, &program);
    assert_send(&explicit);
    let acquire = BoundDevice::acquire(&options);
    assert_send(&acquire);
    let filter = SobelFilter::new(&options);
    assert_send(&filter);
}

#[test]
fn filter_process_future_is_send() {
    fn check(filter: &mut SobelFilter, image: &SourceImage) {
        let process = filter.process(image);
        assert_send(&process);
    }
    let _ = check;
}
