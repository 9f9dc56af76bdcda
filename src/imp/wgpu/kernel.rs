// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
use std::borrow::Cow;
use std::sync::Arc;

use wgpu::{BindingType, BufferBindingType, ErrorFilter, ShaderStages};

use super::Error;
use super::bound_device::BoundDevice;
use crate::kernel::KernelInterface;

fn buffer_entry(binding: u32, ty: BufferBindingType) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: ShaderStages::COMPUTE,
        ty: BindingType::Buffer {
            ty,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

#[derive(Debug)]
pub(super) struct KernelResources {
    pub(super) pipeline: wgpu::ComputePipeline,
    pub(super) bind_group_layout: wgpu::BindGroupLayout,
    pub(super) bound_device: BoundDevice,
    pub(super) label: String,
}

#[derive(Debug, Clone)]
pub(crate) struct CompiledKernel {
    pub(super) resources: Arc<KernelResources>,
}

impl CompiledKernel {
    pub(crate) async fn compile(bound_device: &BoundDevice, label: &str, wgsl_code: &str) -> Result<Self, Error> {
        let compile_perf = logwise::perfwarn_begin!("wgpu::CompiledKernel::compile");
        let device = bound_device.device();
        //the layout is ours, so a program that disagrees with KernelInterface fails here
        //rather than at dispatch
        device.push_error_scope(ErrorFilter::Validation);
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(wgsl_code)),
        });
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(label),
            entries: &[
                buffer_entry(
                    KernelInterface::INPUT_SLOT,
                    BufferBindingType::Storage { read_only: true },
                ),
                buffer_entry(
                    KernelInterface::OUTPUT_SLOT,
                    BufferBindingType::Storage { read_only: false },
                ),
                buffer_entry(KernelInterface::PARAMS_SLOT, BufferBindingType::Uniform),
            ],
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(label),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });
        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some(label),
            layout: Some(&pipeline_layout),
            module: &module,
            entry_point: Some(KernelInterface::ENTRY_POINT),
            compilation_options: Default::default(),
            cache: None,
        });
        if let Some(e) = device.pop_error_scope().await {
            let message = e.to_string();
            logwise::error_sync!(
                "Kernel {label} failed to compile: {message}",
                label = logwise::privacy::LogIt(&label),
                message = logwise::privacy::LogIt(&message)
            );
            return Err(Error::ShaderCompile(message));
        }
        logwise::info_sync!(
            "Compiled kernel {label} (interface v{version})",
            label = logwise::privacy::LogIt(&label),
            version = KernelInterface::VERSION
        );
        drop(compile_perf);
        Ok(CompiledKernel {
            resources: Arc::new(KernelResources {
                pipeline,
                bind_group_layout,
                bound_device: bound_device.clone(),
                label: label.to_string(),
            }),
        })
    }
}
