// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! The error type returned by every fallible operation in this crate.
//!
//! Every failure aborts the current invocation.  Nothing here is retried internally;
//! a GPU that is unavailable now will not become available by asking again.
//! Presenting these errors (or falling back to [crate::software]) is up to the caller.

use std::time::Duration;

use crate::imp;

/// Why an edge-detection invocation failed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum FilterError {
    /// The platform exposes no compute-capable backend.
    #[error("No compute-capable GPU backend is available")]
    GpuUnavailable,
    /// An adapter exists, but it refused to create a device.
    #[error("GPU device request failed: {0}")]
    DeviceRequestFailed(String),
    /// The kernel program failed to compile or link.
    #[error("Kernel program failed to compile: {0}")]
    ShaderCompileError(String),
    /// The request exceeds what the device can allocate or dispatch.
    #[error("Device allocation of {requested} exceeds the device limit of {limit}")]
    BufferAllocationFailed { requested: u64, limit: u64 },
    /// A device-to-host transfer did not resolve within the configured bound.
    #[error("Device did not finish within {0:?}")]
    MapTimeout(Duration),
    /// A device-to-host transfer resolved with an error, or the device was lost.
    #[error("Device-to-host transfer failed: {0}")]
    MapFailed(String),
    /// The declared dimensions do not match the data supplied.  `expected` is `usize::MAX`
    /// when the dimensions are too large to describe any in-memory image.
    #[error("Image is {width}x{height} and needs {expected} elements, but {actual} were supplied")]
    InvalidImage {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

impl From<imp::Error> for FilterError {
    fn from(error: imp::Error) -> Self {
        error.into_filter_error()
    }
}
