// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
Device-resident buffers for one invocation.

Buffers here are single-use: created, filled or consumed, and released within one
invocation.  Nothing is pooled, so two invocations never share a buffer.

| Constructor                      | Device usage             | Kernel view          |
|----------------------------------|--------------------------|----------------------|
| [DeviceBuffer::upload] (input)   | storage                  | read-only            |
| [DeviceBuffer::upload] (params)  | uniform                  | read-only            |
| [DeviceBuffer::allocate_output]  | storage, copy source     | read-write           |

Reading a buffer back goes through a mappable staging buffer; see [DeviceBuffer::readback].
*/
use crate::device::BoundDevice;
use crate::error::FilterError;
use crate::imp;

/// How the kernel will read an uploaded buffer.  Each maps to the minimum device usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferUsage {
    /// Bound as a read-only storage buffer.
    KernelInput,
    /// Bound as a uniform buffer.
    Parameters,
}

#[derive(Debug)]
pub struct DeviceBuffer(pub(crate) imp::DeviceBuffer);

impl DeviceBuffer {
    /**
    Allocates a buffer of exactly `host_data.len()` bytes and copies `host_data` into it.

    # Errors
    [FilterError::BufferAllocationFailed] when the size exceeds the device's limits for `usage`.
    */
    pub async fn upload(
        device: &BoundDevice,
        host_data: &[u8],
        usage: BufferUsage,
        debug_name: &str,
    ) -> Result<Self, FilterError> {
        imp::DeviceBuffer::upload(&device.0, host_data, usage, debug_name)
            .await
            .map(DeviceBuffer)
            .map_err(FilterError::from)
    }

    /// Allocates a zero-initialized buffer the kernel writes into.
    pub async fn allocate_output(
        device: &BoundDevice,
        size: usize,
        debug_name: &str,
    ) -> Result<Self, FilterError> {
        imp::DeviceBuffer::allocate_output(&device.0, size, debug_name)
            .await
            .map(DeviceBuffer)
            .map_err(FilterError::from)
    }

    /**
    Copies the first `size` bytes back to the host.

    Issues a copy into a staging buffer, requests a read map, and suspends until the map
    resolves.  Queue ordering places the copy after any compute work already submitted that
    writes this buffer; callers still await that work's [crate::dispatch::CompletionToken] first.

    # Errors
    * [FilterError::MapTimeout] when the map does not resolve within the device's bound.
    * [FilterError::MapFailed] when it resolves with an error, the device is lost, or `size`
      exceeds [Self::byte_len].
    */
    pub async fn readback(&self, size: usize) -> Result<Vec<u8>, FilterError> {
        self.0.readback(size).await.map_err(FilterError::from)
    }

    pub fn byte_len(&self) -> usize {
        self.0.byte_len()
    }
}
