// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
Binding buffers to a compiled kernel and submitting the compute pass.

Slots and grid size come from [KernelInterface]; they are not configurable per call.
*/
use crate::buffer::DeviceBuffer;
use crate::error::FilterError;
use crate::imp;
use crate::kernel::{CompiledKernel, KernelInterface};

/**
Work that has been submitted to the device but may not have finished.

The token must be waited on, once, before reading anything the work wrote.  [Self::wait]
consumes it, so it cannot be waited on twice.
*/
#[must_use = "submitted work must be waited on before its output is read"]
#[derive(Debug)]
pub struct CompletionToken(pub(crate) imp::CompletionToken);

impl CompletionToken {
    /**
    Suspends until the device reports the submission done.

    # Errors
    [FilterError::MapTimeout] or [FilterError::MapFailed] under the same bound as readback.
    */
    pub async fn wait(self) -> Result<(), FilterError> {
        self.0.wait().await.map_err(FilterError::from)
    }
}

/**
Binds `input`, `output` and `params` to their fixed slots and submits one compute pass covering
`width` x `height` pixels.

# Errors
[FilterError::BufferAllocationFailed] when the grid exceeds the device's workgroup limit.
*/
pub fn dispatch(
    kernel: &CompiledKernel,
    input: &DeviceBuffer,
    output: &DeviceBuffer,
    params: &DeviceBuffer,
    width: u32,
    height: u32,
) -> Result<CompletionToken, FilterError> {
    let grid = KernelInterface::dispatch_grid(width, height);
    logwise::trace_sync!(
        "dispatch {width}x{height} as {gx}x{gy} workgroups",
        width = width,
        height = height,
        gx = grid.0,
        gy = grid.1
    );
    kernel
        .0
        .dispatch(&input.0, &output.0, &params.0, grid)
        .map(CompletionToken)
        .map_err(FilterError::from)
}
