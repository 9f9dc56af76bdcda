// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
use super::Error;
use super::bound_device::BoundDevice;
use super::buffer::DeviceBuffer;
use super::kernel::CompiledKernel;
use super::poll::wait_for;
use crate::kernel::KernelInterface;

/// Submitted work.  Awaiting it registers for the queue's "work done" callback, which fires
/// once everything submitted so far, this pass included, has finished on the device.
#[derive(Debug)]
pub(crate) struct CompletionToken {
    bound_device: BoundDevice,
    label: String,
}

impl CompletionToken {
    pub(crate) async fn wait(self) -> Result<(), Error> {
        let wait_perf = logwise::perfwarn_begin!("wgpu::CompletionToken::wait");
        wait_for(&self.bound_device, "submitted work", |signal| {
            self.bound_device
                .queue()
                .on_submitted_work_done(move || signal.resolve(Ok(())));
        })
        .await?;
        logwise::trace_sync!(
            "{label} complete",
            label = logwise::privacy::LogIt(&self.label)
        );
        drop(wait_perf);
        Ok(())
    }
}

impl CompiledKernel {
    pub(crate) fn dispatch(
        &self,
        input: &DeviceBuffer,
        output: &DeviceBuffer,
        params: &DeviceBuffer,
        grid: (u32, u32),
    ) -> Result<CompletionToken, Error> {
        let kernel = &self.resources;
        let bound_device = &kernel.bound_device;
        let device = bound_device.device();
        let limit = device.limits().max_compute_workgroups_per_dimension;
        let widest = grid.0.max(grid.1);
        if widest > limit {
            logwise::error_sync!(
                "Dispatch of {widest} workgroups exceeds device limit {limit}",
                widest = widest,
                limit = limit
            );
            return Err(Error::ExceedsLimit {
                requested: u64::from(widest),
                limit: u64::from(limit),
            });
        }

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&kernel.label),
            layout: &kernel.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: KernelInterface::INPUT_SLOT,
                    resource: input.buffer().as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: KernelInterface::OUTPUT_SLOT,
                    resource: output.buffer().as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: KernelInterface::PARAMS_SLOT,
                    resource: params.buffer().as_entire_binding(),
                },
            ],
        });
        logwise::trace_sync!("Created bindgroup");

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some(&kernel.label),
        });
        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some(&kernel.label),
                timestamp_writes: None,
            });
            pass.set_pipeline(&kernel.pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            pass.dispatch_workgroups(grid.0, grid.1, 1);
        }
        bound_device.queue().submit([encoder.finish()]);
        Ok(CompletionToken {
            bound_device: bound_device.clone(),
            label: kernel.label.clone(),
        })
    }
}
