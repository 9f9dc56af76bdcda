// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! Backend used when no GPU backend is compiled in.
//!
//! Every acquisition fails with [crate::FilterError::GpuUnavailable], so none of the device
//! types can ever be constructed; they are uninhabited.
use std::fmt::Display;
use std::sync::Arc;

use crate::buffer::BufferUsage;
use crate::device::AdapterInfo;
use crate::error::FilterError;
use crate::options::Options;

#[derive(Debug, Clone, Copy)]
enum Never {}

#[derive(Debug)]
pub(crate) enum Error {
    NoBackend,
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::NoBackend => write!(f, "No GPU backend compiled in"),
        }
    }
}

impl std::error::Error for Error {}

impl Error {
    pub(crate) fn into_filter_error(self) -> FilterError {
        match self {
            Error::NoBackend => FilterError::GpuUnavailable,
        }
    }
}

#[derive(Debug)]
pub(crate) struct EntryPoint(Never);

impl EntryPoint {
    pub(crate) fn new(_options: &Options) -> Result<Self, Error> {
        logwise::warn_sync!("No GPU backend compiled in; enable the backend_wgpu feature");
        Err(Error::NoBackend)
    }
}

pub(crate) struct UnboundDevice(Never);

impl UnboundDevice {
    pub(crate) async fn pick(
        entry_point: &crate::entry_point::EntryPoint,
        _options: &Options,
    ) -> Result<UnboundDevice, Error> {
        match entry_point.0.0 {}
    }
}

#[derive(Debug, Clone)]
pub(crate) struct BoundDevice(Never);

impl BoundDevice {
    pub(crate) async fn bind(
        unbound_device: crate::device::UnboundDevice,
        _entry_point: Arc<crate::entry_point::EntryPoint>,
        _options: &Options,
    ) -> Result<Self, Error> {
        match unbound_device.0.0 {}
    }

    pub(crate) fn adapter_info(&self) -> AdapterInfo {
        match self.0 {}
    }
}

#[derive(Debug)]
pub(crate) struct DeviceBuffer(Never);

impl DeviceBuffer {
    pub(crate) async fn upload(
        bound_device: &BoundDevice,
        _host_data: &[u8],
        _usage: BufferUsage,
        _debug_name: &str,
    ) -> Result<Self, Error> {
        match bound_device.0 {}
    }

    pub(crate) async fn allocate_output(
        bound_device: &BoundDevice,
        _size: usize,
        _debug_name: &str,
    ) -> Result<Self, Error> {
        match bound_device.0 {}
    }

    pub(crate) async fn readback(&self, _size: usize) -> Result<Vec<u8>, Error> {
        match self.0 {}
    }

    pub(crate) fn byte_len(&self) -> usize {
        match self.0 {}
    }
}

#[derive(Debug, Clone)]
pub(crate) struct CompiledKernel(Never);

impl CompiledKernel {
    pub(crate) async fn compile(bound_device: &BoundDevice, _label: &str, _wgsl_code: &str) -> Result<Self, Error> {
        match bound_device.0 {}
    }

    pub(crate) fn dispatch(
        &self,
        _input: &DeviceBuffer,
        _output: &DeviceBuffer,
        _params: &DeviceBuffer,
        _grid: (u32, u32),
    ) -> Result<CompletionToken, Error> {
        match self.0 {}
    }
}

#[derive(Debug)]
pub(crate) struct CompletionToken(Never);

impl CompletionToken {
    pub(crate) async fn wait(self) -> Result<(), Error> {
        match self.0 {}
    }
}
