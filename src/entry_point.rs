// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
use crate::error::FilterError;
use crate::options::Options;
///Platform-independent entrypoint implementation
///
/// On wgpu this is the instance; adapters are enumerated from it.
#[derive(Debug)]
pub(crate) struct EntryPoint(pub(crate) crate::imp::EntryPoint);

impl EntryPoint {
    /// Fails with [FilterError::GpuUnavailable] when no compute backend is compiled in
    /// or enabled by `options`.
    pub(crate) fn new(options: &Options) -> Result<Self, FilterError> {
        crate::imp::EntryPoint::new(options)
            .map(EntryPoint)
            .map_err(FilterError::from)
    }
}
