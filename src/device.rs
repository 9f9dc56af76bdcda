// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//!Cross-platform compute device wrappers
//!
//! Acquisition happens in two steps, mirroring the platform: pick an adapter, then bind a
//! device on it.  The first step failing means there is no GPU; the second failing means
//! there is one but it refused us.
use std::fmt::Formatter;
use std::sync::Arc;

use crate::entry_point::EntryPoint;
use crate::error::FilterError;
use crate::imp;
use crate::options::Options;

///Cross-platform unbound device (an adapter we have not opened yet)
pub(crate) struct UnboundDevice(pub(crate) crate::imp::UnboundDevice);

impl UnboundDevice {
    pub(crate) async fn pick(entry_point: &EntryPoint, options: &Options) -> Result<UnboundDevice, FilterError> {
        crate::imp::UnboundDevice::pick(entry_point, options)
            .await
            .map(UnboundDevice)
            .map_err(FilterError::from)
    }
}

/// What the platform told us about the adapter behind a [BoundDevice].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterInfo {
    pub name: String,
    pub backend: String,
    pub device_type: String,
}

impl std::fmt::Display for AdapterInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}, {})", self.name, self.backend, self.device_type)
    }
}

/**
A compute device and its queue.

Cloning is cheap and shares the same device.  The device and its polling thread are released
when the last clone is dropped, whichever path drops it.

Invocations that share one device must not overlap; [crate::SobelFilter] enforces this by
taking `&mut self`.
*/
#[derive(Debug)]
pub struct BoundDevice(pub(crate) imp::BoundDevice);

impl BoundDevice {
    /**
    Acquires a compute-capable device.

    # Errors
    * [FilterError::GpuUnavailable] when the platform exposes no compute adapter.
    * [FilterError::DeviceRequestFailed] when an adapter refuses to create a device.

    There is no retry.
    */
    pub async fn acquire(options: &Options) -> Result<Self, FilterError> {
        let entry_point = Arc::new(EntryPoint::new(options)?);
        let unbound_device = UnboundDevice::pick(&entry_point, options).await?;
        let bound = Self::bind(unbound_device, entry_point, options).await?;
        logwise::info_sync!(
            "Acquired compute device {adapter}",
            adapter = logwise::privacy::LogIt(&bound.adapter_info())
        );
        Ok(bound)
    }

    pub(crate) async fn bind(
        unbound_device: UnboundDevice,
        entry_point: Arc<EntryPoint>,
        options: &Options,
    ) -> Result<Self, FilterError> {
        crate::imp::BoundDevice::bind(unbound_device, entry_point, options)
            .await
            .map(BoundDevice)
            .map_err(FilterError::from)
    }

    pub fn adapter_info(&self) -> AdapterInfo {
        self.0.adapter_info()
    }
}

// Boilerplate implementations

impl Clone for BoundDevice {
    fn clone(&self) -> Self {
        // resources are shared via Arc in the backend implementation.
        Self(self.0.clone())
    }
}

impl AsRef<imp::BoundDevice> for BoundDevice {
    fn as_ref(&self) -> &imp::BoundDevice {
        &self.0
    }
}
