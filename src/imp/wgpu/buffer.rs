// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0

//! Buffer creation and readback for the wgpu backend.
//!
//! ## Usage flags
//!
//! Each buffer gets the minimum wgpu usage for its role:
//!
//! - kernel input: `STORAGE`, filled at creation
//! - parameters: `UNIFORM`, filled at creation
//! - kernel output: `STORAGE | COPY_SRC`, zero-initialized
//! - readback staging: `MAP_READ | COPY_DST`, created per readback
//!
//! wgpu only allows `MAP_READ` alongside `COPY_DST`, so the output can't be mapped
//! directly; readback copies it into a staging buffer first.

use wgpu::util::DeviceExt;
use wgpu::{BufferDescriptor, BufferUsages, CommandEncoderDescriptor, ErrorFilter, MapMode};

use super::Error;
use super::bound_device::BoundDevice;
use super::error::WaitError;
use super::poll::wait_for;
use crate::buffer::BufferUsage;

/// Rounds up to `wgpu::COPY_BUFFER_ALIGNMENT`, which copies and maps require.
fn aligned_size(size: u64) -> u64 {
    (size + wgpu::COPY_BUFFER_ALIGNMENT - 1) & !(wgpu::COPY_BUFFER_ALIGNMENT - 1)
}

/// Largest buffer of this usage the device will bind.
fn binding_limit(limits: &wgpu::Limits, usage: BufferUsages) -> u64 {
    let binding = if usage.contains(BufferUsages::UNIFORM) {
        u64::from(limits.max_uniform_buffer_binding_size)
    } else {
        u64::from(limits.max_storage_buffer_binding_size)
    };
    binding.min(limits.max_buffer_size)
}

fn check_limit(bound_device: &BoundDevice, requested: u64, usage: BufferUsages, debug_name: &str) -> Result<(), Error> {
    let limit = binding_limit(&bound_device.device().limits(), usage);
    if requested > limit {
        logwise::error_sync!(
            "Buffer {name} of {requested} bytes exceeds device limit {limit}",
            name = logwise::privacy::LogIt(&debug_name),
            requested = requested,
            limit = limit
        );
        return Err(Error::ExceedsLimit { requested, limit });
    }
    Ok(())
}

/// Runs `create` inside out-of-memory and validation error scopes.
async fn create_scoped<F>(bound_device: &BoundDevice, requested: u64, usage: BufferUsages, create: F) -> Result<wgpu::Buffer, Error>
where
    F: FnOnce(&wgpu::Device) -> wgpu::Buffer,
{
    let device = bound_device.device();
    device.push_error_scope(ErrorFilter::Validation);
    device.push_error_scope(ErrorFilter::OutOfMemory);
    let buffer = create(device);
    let out_of_memory = device.pop_error_scope().await;
    let validation = device.pop_error_scope().await;
    match out_of_memory.or(validation) {
        None => Ok(buffer),
        Some(e) => {
            logwise::error_sync!(
                "Device refused buffer of {requested} bytes: {err}",
                requested = requested,
                err = logwise::privacy::LogIt(&e)
            );
            Err(Error::ExceedsLimit {
                requested,
                limit: binding_limit(&device.limits(), usage),
            })
        }
    }
}

/**
A device buffer owned by one invocation.

Dropping it releases the device memory.
*/
#[derive(Debug)]
pub(crate) struct DeviceBuffer {
    buffer: wgpu::Buffer,
    byte_len: usize,
    bound_device: BoundDevice,
    debug_name: String,
}

impl DeviceBuffer {
    pub(crate) async fn upload(
        bound_device: &BoundDevice,
        host_data: &[u8],
        usage: BufferUsage,
        debug_name: &str,
    ) -> Result<Self, Error> {
        let usage = match usage {
            BufferUsage::KernelInput => BufferUsages::STORAGE,
            BufferUsage::Parameters => BufferUsages::UNIFORM,
        };
        let requested = host_data.len() as u64;
        check_limit(bound_device, requested, usage, debug_name)?;
        logwise::trace_sync!(
            "upload {name}: {requested} bytes",
            name = logwise::privacy::LogIt(&debug_name),
            requested = requested
        );
        let buffer = create_scoped(bound_device, requested, usage, |device| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(debug_name),
                contents: host_data,
                usage,
            })
        })
        .await?;
        Ok(DeviceBuffer {
            buffer,
            byte_len: host_data.len(),
            bound_device: bound_device.clone(),
            debug_name: debug_name.to_string(),
        })
    }

    pub(crate) async fn allocate_output(
        bound_device: &BoundDevice,
        size: usize,
        debug_name: &str,
    ) -> Result<Self, Error> {
        let usage = BufferUsages::STORAGE | BufferUsages::COPY_SRC;
        let requested = size as u64;
        check_limit(bound_device, requested, usage, debug_name)?;
        logwise::trace_sync!(
            "allocate_output {name}: {requested} bytes",
            name = logwise::privacy::LogIt(&debug_name),
            requested = requested
        );
        //wgpu zero-initializes buffers that are not mapped at creation
        let buffer = create_scoped(bound_device, requested, usage, |device| {
            device.create_buffer(&BufferDescriptor {
                label: Some(debug_name),
                size: aligned_size(requested),
                usage,
                mapped_at_creation: false,
            })
        })
        .await?;
        Ok(DeviceBuffer {
            buffer,
            byte_len: size,
            bound_device: bound_device.clone(),
            debug_name: debug_name.to_string(),
        })
    }

    pub(super) fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    pub(crate) fn byte_len(&self) -> usize {
        self.byte_len
    }

    pub(crate) async fn readback(&self, size: usize) -> Result<Vec<u8>, Error> {
        if size > self.byte_len {
            logwise::error_sync!(
                "Readback of {size} bytes from {name}, which holds {available}",
                size = size,
                name = logwise::privacy::LogIt(&self.debug_name),
                available = self.byte_len
            );
            return Err(Error::ReadbackOutOfRange {
                requested: size,
                available: self.byte_len,
            });
        }
        if size == 0 {
            return Ok(Vec::new());
        }
        let readback_perf = logwise::perfwarn_begin!("wgpu::DeviceBuffer::readback");
        let copy_size = aligned_size(size as u64);
        let device = self.bound_device.device();
        let staging_label = format!("{} staging", self.debug_name);
        let staging = device.create_buffer(&BufferDescriptor {
            label: Some(&staging_label),
            size: copy_size,
            usage: BufferUsages::MAP_READ | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let mut encoder = device.create_command_encoder(&CommandEncoderDescriptor {
            label: Some("readback"),
        });
        encoder.copy_buffer_to_buffer(&self.buffer, 0, &staging, 0, copy_size);
        self.bound_device.queue().submit([encoder.finish()]);

        wait_for(&self.bound_device, "readback map", |signal| {
            staging.slice(..).map_async(MapMode::Read, move |result| {
                signal.resolve(result.map_err(|e| WaitError::Failed(e.to_string())))
            });
        })
        .await?;

        let bytes = {
            let mapped = staging.slice(..).get_mapped_range();
            mapped[..size].to_vec()
        };
        staging.unmap();
        drop(readback_perf);
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aligned_size_rounds_to_four() {
        assert_eq!(aligned_size(0), 0);
        assert_eq!(aligned_size(1), 4);
        assert_eq!(aligned_size(8), 8);
        assert_eq!(aligned_size(9), 12);
    }

    #[test]
    fn uniform_limit_is_smaller_binding() {
        let limits = wgpu::Limits::default();
        assert_eq!(
            binding_limit(&limits, BufferUsages::UNIFORM),
            u64::from(limits.max_uniform_buffer_binding_size).min(limits.max_buffer_size)
        );
        assert_eq!(
            binding_limit(&limits, BufferUsages::STORAGE | BufferUsages::COPY_SRC),
            u64::from(limits.max_storage_buffer_binding_size).min(limits.max_buffer_size)
        );
    }
}
