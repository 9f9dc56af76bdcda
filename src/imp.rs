// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//at the moment we only support wgpu
//
// Every backend exports the same set of names:
// EntryPoint, UnboundDevice, BoundDevice, DeviceBuffer, CompiledKernel, CompletionToken, Error.

#[cfg(not(feature = "backend_wgpu"))]
mod nop;
#[cfg(not(feature = "backend_wgpu"))]
pub(crate) use nop::*;

#[cfg(feature = "backend_wgpu")]
mod wgpu;

#[cfg(feature = "backend_wgpu")]
pub(crate) use wgpu::*;
