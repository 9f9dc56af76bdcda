// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
mod bound_device;
mod buffer;
mod dispatch;
mod entry_point;
mod error;
mod kernel;
mod poll;
mod unbound_device;

pub(crate) use bound_device::BoundDevice;
pub(crate) use buffer::DeviceBuffer;
pub(crate) use dispatch::CompletionToken;
pub(crate) use entry_point::EntryPoint;
pub(crate) use error::Error;
pub(crate) use kernel::CompiledKernel;
pub(crate) use unbound_device::UnboundDevice;
