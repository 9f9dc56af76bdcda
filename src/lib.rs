// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*! edges_and_gradients runs a Sobel edge detector over RGBA images on the GPU.

An invocation takes a [SourceImage], converts each pixel to a normalized intensity,
uploads it, runs one compute pass that writes the gradient magnitude `sqrt(Gx² + Gy²)`
for every pixel, reads the magnitudes back, and turns them into a grayscale [OutputImage].

```no_run
use edges_and_gradients::{SourceImage, process_image};

# test_executors::sleep_on(async {
let image = SourceImage::from_gray(3, 1, &[0, 128, 255]).unwrap();
let edges = process_image(&image).await.unwrap();
assert_eq!(edges.pixel(1, 0)[3], 255);
# });
```

# Pipeline

| Stage            | Module        | Runs on |
|------------------|---------------|---------|
| Normalize        | [image]       | host    |
| Acquire device   | [device]      | host    |
| Upload           | [buffer]      | device  |
| Compile kernel   | [kernel]      | device  |
| Dispatch         | [dispatch]    | device  |
| Readback         | [buffer]      | device  |
| Denormalize      | [image]       | host    |

[process_image] acquires a device and compiles the kernel for every call.  When several
images will be processed, hold a [SobelFilter] instead.

# Failure

Every step returns [FilterError].  Nothing is retried and nothing is silently replaced;
a caller that wants a CPU fallback can call [software::process_image], which computes the
same result on the host.

# Backends

The `backend_wgpu` feature (on by default) runs on [wgpu](https://wgpu.rs), so Vulkan,
Metal, DX12 and WebGPU are all candidates.  Without it every acquisition fails with
[FilterError::GpuUnavailable].

# Logging

Operational messages go through [logwise](https://docs.rs/logwise): acquisition and
compilation at info, per-dispatch detail at trace, failures at error.  Device waits are
wrapped in perfwarn intervals.
*/

mod entry_point;
mod filter;
mod imp;
mod sys;

pub mod buffer;
pub mod device;
pub mod dispatch;
pub mod error;
pub mod image;
pub mod kernel;
pub mod options;
pub mod params;
pub mod software;

pub use device::BoundDevice;
pub use error::FilterError;
pub use filter::{SobelFilter, process_image, process_image_with};
pub use image::{OutputImage, SourceImage};
pub use kernel::KernelProgram;
pub use options::Options;
