// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
use crate::options::Options;

#[derive(Debug)]
pub(crate) struct EntryPoint(pub(super) wgpu::Instance);

impl EntryPoint {
    pub(crate) fn new(options: &Options) -> Result<Self, super::Error> {
        let mut descriptor = wgpu::InstanceDescriptor::from_env_or_default();
        if let Some(backends) = options.backends() {
            descriptor.backends = backends;
        }
        if descriptor.backends.is_empty() {
            logwise::warn_sync!("No wgpu backends enabled");
            return Err(super::Error::NoBackend);
        }
        let wgpu_instance = wgpu::Instance::new(&descriptor);
        Ok(EntryPoint(wgpu_instance))
    }
}
