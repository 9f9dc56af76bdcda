// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
Turns wgpu callbacks into futures with a bounded wait.

wgpu reports completion (submitted work done, buffer mapped) through callbacks that only run
while someone polls the device.  A [Signal] is the one-shot slot such a callback resolves; the
device's polling thread drives `Device::poll` until the signal settles, and resolves it with
[WaitError::Timeout] itself if the deadline passes first.  Whoever resolves first wins.
*/
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use super::bound_device::BoundDevice;
use super::error::WaitError;
use crate::sys::time::Instant;

type Resolve<T> = Box<dyn FnOnce(Result<T, WaitError>) + Send>;

pub(super) struct Signal<T> {
    resolve: Mutex<Option<Resolve<T>>>,
}

impl<T> Signal<T> {
    /// Resolves the waiting future.  Later calls are ignored.
    pub(super) fn resolve(&self, result: Result<T, WaitError>) {
        let resolve = self
            .resolve
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(resolve) = resolve {
            resolve(result);
        }
    }
}

/// What the polling thread needs to know about a pending [Signal], whatever its value type.
pub(super) trait Watched: Send + Sync {
    fn is_settled(&self) -> bool;
    fn expire(&self, error: WaitError);
}

impl<T: Send> Watched for Signal<T> {
    fn is_settled(&self) -> bool {
        self.resolve
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }

    fn expire(&self, error: WaitError) {
        self.resolve(Err(error))
    }
}

/// A pending signal and how long the polling thread may wait for it.
pub(super) struct PollRequest {
    pub(super) watched: Arc<dyn Watched>,
    pub(super) timeout: Duration,
    pub(super) started: Instant,
}

impl PollRequest {
    pub(super) fn is_expired(&self) -> bool {
        self.started.elapsed() >= self.timeout
    }
}

/**
Registers a callback with `register` and suspends until it fires, the device fails, or the
device's wait bound elapses.

`label` names the wait in logs.
*/
pub(super) async fn wait_for<T, F>(bound_device: &BoundDevice, label: &'static str, register: F) -> Result<T, WaitError>
where
    T: Send + 'static,
    F: FnOnce(Arc<Signal<T>>),
{
    let (s, r) = r#continue::continuation::<Result<T, WaitError>>();
    let signal = Arc::new(Signal {
        resolve: Mutex::new(Some(Box::new(move |result| s.send(result)) as Resolve<T>)),
    });
    register(signal.clone());
    bound_device.request_poll(PollRequest {
        watched: signal,
        timeout: bound_device.map_timeout(),
        started: Instant::now(),
    });
    let result = r.await;
    if let Err(err) = &result {
        logwise::error_sync!(
            "Wait for {label} failed: {err}",
            label = label.to_string(),
            err = logwise::privacy::LogIt(err)
        );
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_resolution_wins() {
        let (s, r) = r#continue::continuation::<Result<u32, WaitError>>();
        let signal = Signal {
            resolve: Mutex::new(Some(Box::new(move |result| s.send(result)) as Resolve<u32>)),
        };
        assert!(!signal.is_settled());
        signal.resolve(Ok(7));
        assert!(signal.is_settled());
        signal.expire(WaitError::Timeout(Duration::from_millis(1)));
        assert_eq!(test_executors::spin_on(r), Ok(7));
    }

    #[test]
    fn expiry_resolves_pending_signal() {
        let (s, r) = r#continue::continuation::<Result<(), WaitError>>();
        let signal = Signal {
            resolve: Mutex::new(Some(Box::new(move |result| s.send(result)) as Resolve<()>)),
        };
        signal.expire(WaitError::Timeout(Duration::from_millis(5)));
        signal.resolve(Ok(()));
        assert_eq!(
            test_executors::spin_on(r),
            Err(WaitError::Timeout(Duration::from_millis(5)))
        );
    }

    fn pending_request(timeout: Duration) -> PollRequest {
        let signal: Signal<()> = Signal {
            resolve: Mutex::new(Some(Box::new(|_| {}) as Resolve<()>)),
        };
        PollRequest {
            watched: Arc::new(signal),
            timeout,
            started: Instant::now(),
        }
    }

    #[test]
    fn deadline_expiry() {
        assert!(pending_request(Duration::ZERO).is_expired());
        assert!(!pending_request(Duration::from_secs(3600)).is_expired());
    }

    #[test]
    fn expired_request_settles_with_timeout() {
        let (s, r) = r#continue::continuation::<Result<(), WaitError>>();
        let signal = Arc::new(Signal {
            resolve: Mutex::new(Some(Box::new(move |result| s.send(result)) as Resolve<()>)),
        });
        let request = PollRequest {
            watched: signal.clone(),
            timeout: Duration::ZERO,
            started: Instant::now(),
        };
        // what the polling thread does once the deadline has passed
        assert!(!request.watched.is_settled());
        assert!(request.is_expired());
        request.watched.expire(WaitError::Timeout(request.timeout));
        assert!(signal.is_settled());
        assert_eq!(
            test_executors::spin_on(r),
            Err(WaitError::Timeout(Duration::ZERO))
        );
    }
}
