// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
use crate::options::{Options, PowerPreference};

pub(crate) struct UnboundDevice {
    pub(super) adapter: wgpu::Adapter,
}

impl UnboundDevice {
    pub(crate) async fn pick(
        entry_point: &crate::entry_point::EntryPoint,
        options: &Options,
    ) -> Result<UnboundDevice, super::Error> {
        let power_preference = match options.power_preference() {
            PowerPreference::None => wgpu::PowerPreference::None,
            PowerPreference::LowPower => wgpu::PowerPreference::LowPower,
            PowerPreference::HighPerformance => wgpu::PowerPreference::HighPerformance,
        };
        let request = wgpu::RequestAdapterOptions {
            power_preference,
            force_fallback_adapter: options.force_fallback_adapter(),
            //compute only, we never present
            compatible_surface: None,
        };
        let adapter = entry_point.0.0.request_adapter(&request).await;
        let adapter = adapter.map_err(|e| {
            logwise::warn_sync!("No adapter: {err}", err = logwise::privacy::LogIt(&e));
            super::Error::NoSuchAdapter(e)
        })?;

        //downlevel backends (WebGL2, some GLES) can't run compute at all
        let downlevel = adapter.get_downlevel_capabilities();
        if !downlevel
            .flags
            .contains(wgpu::DownlevelFlags::COMPUTE_SHADERS)
        {
            let name = adapter.get_info().name;
            logwise::warn_sync!(
                "Adapter {name} lacks compute shaders",
                name = logwise::privacy::LogIt(&name)
            );
            return Err(super::Error::NoComputeSupport(name));
        }

        Ok(UnboundDevice { adapter })
    }
}
