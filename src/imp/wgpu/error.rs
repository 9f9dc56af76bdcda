// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
use std::fmt::Display;
use std::time::Duration;

use crate::error::FilterError;

/// Why a wait on the device did not produce a value.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum WaitError {
    Timeout(Duration),
    Failed(String),
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum Error {
    NoBackend,
    NoSuchAdapter(#[from] wgpu::RequestAdapterError),
    NoComputeSupport(String),
    RequestDeviceError(#[from] wgpu::RequestDeviceError),
    PollThread(#[source] std::io::Error),
    ShaderCompile(String),
    ExceedsLimit { requested: u64, limit: u64 },
    ReadbackOutOfRange { requested: usize, available: usize },
    Wait(WaitError),
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::NoBackend => write!(f, "No wgpu backends enabled"),
            Error::NoSuchAdapter(e) => write!(f, "No such adapter: {}", e),
            Error::NoComputeSupport(name) => write!(f, "Adapter {} has no compute shaders", name),
            Error::RequestDeviceError(e) => write!(f, "{}", e),
            Error::PollThread(e) => write!(f, "Can't spawn polling thread: {}", e),
            Error::ShaderCompile(message) => write!(f, "{}", message),
            Error::ExceedsLimit { requested, limit } => {
                write!(f, "Requested {} exceeds limit {}", requested, limit)
            }
            Error::ReadbackOutOfRange {
                requested,
                available,
            } => write!(
                f,
                "Readback of {} bytes from a buffer of {} bytes",
                requested, available
            ),
            Error::Wait(WaitError::Timeout(d)) => write!(f, "Timed out after {:?}", d),
            Error::Wait(WaitError::Failed(message)) => write!(f, "{}", message),
        }
    }
}

impl From<WaitError> for Error {
    fn from(error: WaitError) -> Self {
        Error::Wait(error)
    }
}

impl Error {
    pub(crate) fn into_filter_error(self) -> FilterError {
        match self {
            Error::NoBackend | Error::NoSuchAdapter(_) | Error::NoComputeSupport(_) => {
                FilterError::GpuUnavailable
            }
            Error::RequestDeviceError(e) => FilterError::DeviceRequestFailed(e.to_string()),
            Error::PollThread(e) => FilterError::DeviceRequestFailed(e.to_string()),
            Error::ShaderCompile(message) => FilterError::ShaderCompileError(message),
            Error::ExceedsLimit { requested, limit } => {
                FilterError::BufferAllocationFailed { requested, limit }
            }
            //a caller asking for more than it allocated, not a device limit
            e @ Error::ReadbackOutOfRange { .. } => FilterError::MapFailed(e.to_string()),
            Error::Wait(WaitError::Timeout(d)) => FilterError::MapTimeout(d),
            Error::Wait(WaitError::Failed(message)) => FilterError::MapFailed(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oversized_readback_is_a_transfer_failure() {
        let error = Error::ReadbackOutOfRange {
            requested: 64,
            available: 16,
        };
        assert_eq!(
            error.into_filter_error(),
            FilterError::MapFailed("Readback of 64 bytes from a buffer of 16 bytes".to_string())
        );
    }

    #[test]
    fn device_limits_are_allocation_failures() {
        let error = Error::ExceedsLimit {
            requested: 1 << 40,
            limit: 1 << 30,
        };
        assert_eq!(
            error.into_filter_error(),
            FilterError::BufferAllocationFailed {
                requested: 1 << 40,
                limit: 1 << 30
            }
        );
        assert_eq!(
            Error::from(WaitError::Timeout(Duration::from_secs(2))).into_filter_error(),
            FilterError::MapTimeout(Duration::from_secs(2))
        );
    }
}
