// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
The orchestration entry points: one image in, one edge map out.
*/
use crate::buffer::{BufferUsage, DeviceBuffer};
use crate::device::BoundDevice;
use crate::dispatch::dispatch;
use crate::error::FilterError;
use crate::image::{BYTES_PER_ELEMENT, OutputImage, ResultBuffer, SourceImage, denormalize, normalize};
use crate::kernel::{CompiledKernel, KernelProgram};
use crate::options::Options;
use crate::params::ParameterBlock;

/**
A device with a compiled Sobel kernel, reusable across images.

Acquiring a device and compiling the kernel dominate the cost of a single
[process_image] call.  Holding a `SobelFilter` pays that once.  Buffers are still
per-invocation.

[Self::process] takes `&mut self`, so invocations on one filter never overlap.
*/
#[derive(Debug)]
pub struct SobelFilter {
    device: BoundDevice,
    kernel: CompiledKernel,
}

impl SobelFilter {
    /// Acquires a device and compiles the bundled kernel.
    pub async fn new(options: &Options) -> Result<Self, FilterError> {
        Self::with_program(options, &KernelProgram::sobel()).await
    }

    /**
    Acquires a device and compiles `program` for it.

    # Errors
    Any acquisition error, or [FilterError::ShaderCompileError].
    */
    pub async fn with_program(options: &Options, program: &KernelProgram) -> Result<Self, FilterError> {
        let device = BoundDevice::acquire(options).await?;
        let kernel = CompiledKernel::compile(&device, program).await?;
        Ok(SobelFilter { device, kernel })
    }

    pub fn device(&self) -> &BoundDevice {
        &self.device
    }

    /**
    Runs the kernel over `image`.

    The output has the same dimensions as the input.  Every channel but alpha carries the
    clamped gradient magnitude; alpha is always 255.
    */
    pub async fn process(&mut self, image: &SourceImage) -> Result<OutputImage, FilterError> {
        let (width, height) = (image.width(), image.height());
        if image.is_empty() {
            logwise::info_sync!(
                "Skipping empty {width}x{height} image",
                width = width,
                height = height
            );
            return Ok(OutputImage::empty(width, height));
        }
        let process_perf = logwise::perfwarn_begin!("SobelFilter::process");

        let normalized = normalize(image);
        let input = DeviceBuffer::upload(
            &self.device,
            normalized.as_bytes(),
            BufferUsage::KernelInput,
            "sobel input",
        )
        .await?;
        let params = DeviceBuffer::upload(
            &self.device,
            ParameterBlock::new(width, height).as_bytes(),
            BufferUsage::Parameters,
            "sobel params",
        )
        .await?;
        let output_len = image.len() * BYTES_PER_ELEMENT;
        let output = DeviceBuffer::allocate_output(&self.device, output_len, "sobel output").await?;

        dispatch(&self.kernel, &input, &output, &params, width, height)?
            .wait()
            .await?;
        let bytes = output.readback(output_len).await?;
        let magnitudes = ResultBuffer::from_bytes(width, height, &bytes)?;
        let result = denormalize(&magnitudes, width, height)?;

        drop(process_perf);
        logwise::info_sync!(
            "Processed {width}x{height} image",
            width = width,
            height = height
        );
        Ok(result)
    }
}

/**
Detects edges in `image` on a freshly acquired device, with [Options::from_env] and the
bundled kernel.

The device is released before this returns, on success or failure.

```no_run
use edges_and_gradients::{SourceImage, process_image};

# test_executors::sleep_on(async {
let image = SourceImage::filled(64, 64, [128, 128, 128, 255]).unwrap();
let edges = process_image(&image).await.unwrap();
assert_eq!(edges.width(), 64);
# });
```
*/
pub async fn process_image(image: &SourceImage) -> Result<OutputImage, FilterError> {
    process_image_with(image, &Options::from_env(), &KernelProgram::sobel()).await
}

/// [process_image] with explicit options and kernel program.
pub async fn process_image_with(
    image: &SourceImage,
    options: &Options,
    program: &KernelProgram,
) -> Result<OutputImage, FilterError> {
    if image.is_empty() {
        return Ok(OutputImage::empty(image.width(), image.height()));
    }
    let mut filter = SobelFilter::with_program(options, program).await?;
    filter.process(image).await
}
