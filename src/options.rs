// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
Configuration for device acquisition and device waits.

```
use edges_and_gradients::Options;
use std::time::Duration;

let options = Options::default()
    .with_map_timeout(Duration::from_secs(2))
    .with_force_fallback_adapter(false);
assert_eq!(options.map_timeout(), Duration::from_secs(2));
```
*/
use std::time::Duration;

/// Environment variable read by [Options::from_env], in milliseconds.
pub const MAP_TIMEOUT_ENV: &str = "EDGES_AND_GRADIENTS_MAP_TIMEOUT_MS";

/// Default bound on any single device wait.
pub const DEFAULT_MAP_TIMEOUT: Duration = Duration::from_secs(10);

/// Which adapter to prefer when several are present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PowerPreference {
    /// Let the backend decide.
    #[default]
    None,
    LowPower,
    HighPerformance,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    map_timeout: Duration,
    power_preference: PowerPreference,
    force_fallback_adapter: bool,
    /// `None` means "whatever the environment says" (`WGPU_BACKEND` and friends).
    #[cfg(feature = "backend_wgpu")]
    backends: Option<wgpu::Backends>,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            map_timeout: DEFAULT_MAP_TIMEOUT,
            power_preference: PowerPreference::default(),
            force_fallback_adapter: false,
            #[cfg(feature = "backend_wgpu")]
            backends: None,
        }
    }
}

impl Options {
    /**
    Default options, with the map timeout overridden by [MAP_TIMEOUT_ENV] when it is set
    to a valid number of milliseconds.
    */
    pub fn from_env() -> Self {
        let options = Self::default();
        match std::env::var(MAP_TIMEOUT_ENV) {
            Ok(value) => match value.trim().parse::<u64>() {
                Ok(millis) => options.with_map_timeout(Duration::from_millis(millis)),
                Err(_) => {
                    logwise::warn_sync!(
                        "Ignoring unparseable map timeout {value}",
                        value = logwise::privacy::LogIt(&value)
                    );
                    options
                }
            },
            Err(_) => options,
        }
    }

    /// Bounds each wait on the device: submission completion and the readback map.
    pub fn with_map_timeout(mut self, map_timeout: Duration) -> Self {
        self.map_timeout = map_timeout;
        self
    }

    pub fn with_power_preference(mut self, power_preference: PowerPreference) -> Self {
        self.power_preference = power_preference;
        self
    }

    /// Only accept a software/fallback adapter.
    pub fn with_force_fallback_adapter(mut self, force: bool) -> Self {
        self.force_fallback_adapter = force;
        self
    }

    /// Restricts the instance to the given backends.  An empty set means no GPU is ever found.
    #[cfg(feature = "backend_wgpu")]
    pub fn with_backends(mut self, backends: wgpu::Backends) -> Self {
        self.backends = Some(backends);
        self
    }

    pub fn map_timeout(&self) -> Duration {
        self.map_timeout
    }

    pub fn power_preference(&self) -> PowerPreference {
        self.power_preference
    }

    pub fn force_fallback_adapter(&self) -> bool {
        self.force_fallback_adapter
    }

    #[cfg(feature = "backend_wgpu")]
    pub fn backends(&self) -> Option<wgpu::Backends> {
        self.backends
    }
}
