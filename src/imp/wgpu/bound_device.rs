// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
use std::sync::Arc;
#[cfg(not(target_arch = "wasm32"))]
use std::sync::mpsc::{self, Receiver, Sender};
#[cfg(not(target_arch = "wasm32"))]
use std::thread::{self, JoinHandle};
use std::time::Duration;

use wgpu::{PollType, Trace};

use super::Error;
use super::error::WaitError;
use super::poll::PollRequest;
use crate::device::AdapterInfo;
use crate::options::Options;

/// How long the polling thread sleeps between polls while a signal is pending.
#[cfg(not(target_arch = "wasm32"))]
const POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Internal resource management for BoundDevice
/// This type owns the actual GPU resources and handles cleanup
#[derive(Debug)]
struct BoundDeviceResources {
    device: wgpu::Device,
    queue: wgpu::Queue,
    adapter_info: wgpu::AdapterInfo,
    map_timeout: Duration,
    #[cfg(not(target_arch = "wasm32"))]
    poll_thread: Option<JoinHandle<()>>,
    //dropping the sender is how the polling thread learns to exit
    #[cfg(not(target_arch = "wasm32"))]
    poll_trigger: Option<Sender<PollRequest>>,
}

/// Cross-platform bound device that can be safely cloned
/// Multiple instances share the same underlying GPU resources
#[derive(Debug, Clone)]
pub(crate) struct BoundDevice {
    resources: Arc<BoundDeviceResources>,
    _entry_point: Arc<crate::entry_point::EntryPoint>,
}

impl BoundDevice {
    pub(crate) async fn bind(
        unbound_device: crate::device::UnboundDevice,
        entry_point: Arc<crate::entry_point::EntryPoint>,
        options: &Options,
    ) -> Result<Self, Error> {
        let adapter = unbound_device.0.adapter;
        let adapter_info = adapter.get_info();
        let descriptor = wgpu::DeviceDescriptor {
            label: wgpu::Label::from("Bound Device"),
            required_features: wgpu::Features::empty(),
            //the adapter's own limits are always grantable, and large images need large buffers
            required_limits: adapter.limits(),
            memory_hints: wgpu::MemoryHints::Performance,
            trace: Trace::Off,
        };
        let (device, queue) = adapter.request_device(&descriptor).await.map_err(|e| {
            logwise::error_sync!(
                "Device request refused: {err}",
                err = logwise::privacy::LogIt(&e)
            );
            Error::RequestDeviceError(e)
        })?;

        #[cfg(not(target_arch = "wasm32"))]
        {
            let poll_device = device.clone();
            let (poll_sender, poll_receiver): (Sender<PollRequest>, Receiver<PollRequest>) =
                mpsc::channel();
            let poll_thread = thread::Builder::new()
                .name("wgpu_poll".to_string())
                .spawn(move || poll_until_settled(poll_device, poll_receiver))
                .map_err(Error::PollThread)?;
            let resources = BoundDeviceResources {
                device,
                queue,
                adapter_info,
                map_timeout: options.map_timeout(),
                poll_thread: Some(poll_thread),
                poll_trigger: Some(poll_sender),
            };
            Ok(BoundDevice {
                resources: Arc::new(resources),
                _entry_point: entry_point,
            })
        }
        #[cfg(target_arch = "wasm32")]
        {
            // On wasm32 the browser drives the queue; there is no polling thread
            let resources = BoundDeviceResources {
                device,
                queue,
                adapter_info,
                map_timeout: options.map_timeout(),
            };
            Ok(BoundDevice {
                resources: Arc::new(resources),
                _entry_point: entry_point,
            })
        }
    }

    /// Hands a pending signal to the polling thread.
    pub(super) fn request_poll(&self, request: PollRequest) {
        #[cfg(not(target_arch = "wasm32"))]
        {
            let sent = match &self.resources.poll_trigger {
                Some(trigger) => trigger.send(request).map_err(|e| e.0),
                None => Err(request),
            };
            if let Err(request) = sent {
                //thread is gone, nobody will ever poll for this
                request
                    .watched
                    .expire(WaitError::Failed("device polling thread has exited".to_string()));
            }
        }
        #[cfg(target_arch = "wasm32")]
        {
            //the deadline is not enforced here; the browser resolves callbacks on its own
            drop(request);
            let _ = self.resources.device.poll(PollType::Poll);
        }
    }

    pub(super) fn device(&self) -> &wgpu::Device {
        &self.resources.device
    }

    pub(super) fn queue(&self) -> &wgpu::Queue {
        &self.resources.queue
    }

    pub(super) fn map_timeout(&self) -> Duration {
        self.resources.map_timeout
    }

    pub(crate) fn adapter_info(&self) -> AdapterInfo {
        let info = &self.resources.adapter_info;
        AdapterInfo {
            name: info.name.clone(),
            backend: format!("{:?}", info.backend),
            device_type: format!("{:?}", info.device_type),
        }
    }
}

/// Body of the `wgpu_poll` thread.  Services one request at a time until the channel closes.
#[cfg(not(target_arch = "wasm32"))]
fn poll_until_settled(device: wgpu::Device, requests: Receiver<PollRequest>) {
    while let Ok(request) = requests.recv() {
        loop {
            if let Err(e) = device.poll(PollType::Poll) {
                request.watched.expire(WaitError::Failed(e.to_string()));
                break;
            }
            if request.watched.is_settled() {
                break;
            }
            if request.is_expired() {
                request.watched.expire(WaitError::Timeout(request.timeout));
                break;
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Drop for BoundDeviceResources {
    fn drop(&mut self) {
        // Signal the polling thread to shut down
        drop(self.poll_trigger.take());

        // Wait for the polling thread to finish
        if let Some(handle) = self.poll_thread.take() {
            let _ = handle.join();
        }
    }
}
