//! Readiness Handshake.
//!
//! ```text
//! bridge ── BRIDGE_READY ──▶ host
//! bridge ◀── PLATFORM_READY ── host
//! bridge ── getDevicePlatform / getDeviceUuid / getDeviceSerial ──▶ host
//! bridge: ready fires once with DeviceInfo
//! ```
//!
//! Listeners registered before the ready event are queued; listeners
//! registered afterwards run on the next scheduler tick, or in place when
//! there is no tokio runtime to spawn on. Either way each listener runs
//! exactly once.

use crate::dispatcher::Dispatcher;
use crate::domain::device::DeviceInfo;
use bridge_channel::Subscription;
use parking_lot::Mutex;
use serde_json::json;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::Notify;
use tracing::{debug, info, warn};

type ReadyListener = Box<dyn FnOnce(DeviceInfo) + Send + 'static>;

#[derive(Default)]
struct ReadyState {
    device: Option<DeviceInfo>,
    listeners: Vec<ReadyListener>,
}

#[derive(Default)]
struct Inner {
    state: Mutex<ReadyState>,
    notify: Notify,
}

/// Fire-once ready event with late-listener replay.
#[derive(Clone, Default)]
pub struct Readiness {
    inner: Arc<Inner>,
}

impl Readiness {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for the ready event.
    ///
    /// Before the event the listener is queued and runs when [`fire`](Self::fire)
    /// is called. After the event it is spawned on the current runtime, so it
    /// never runs inside this call. Without a runtime there is no later tick to
    /// defer to: the listener then runs synchronously before `on_ready`
    /// returns.
    pub fn on_ready<F>(&self, listener: F)
    where
        F: FnOnce(DeviceInfo) + Send + 'static,
    {
        let device = {
            let mut state = self.inner.state.lock();
            match &state.device {
                Some(device) => device.clone(),
                None => {
                    state.listeners.push(Box::new(listener));
                    return;
                }
            }
        };

        match Handle::try_current() {
            Ok(runtime) => {
                runtime.spawn(async move { listener(device) });
            }
            // Nothing to defer onto; run in place
            Err(_) => listener(device),
        }
    }

    /// Fire the ready event. Only the first call has any effect.
    pub fn fire(&self, device: DeviceInfo) -> bool {
        let listeners = {
            let mut state = self.inner.state.lock();
            if state.device.is_some() {
                debug!("Ready event already fired");
                return false;
            }
            state.device = Some(device.clone());
            std::mem::take(&mut state.listeners)
        };

        info!(
            platform = %device.platform,
            listeners = listeners.len(),
            "Bridge ready"
        );
        for listener in listeners {
            listener(device.clone());
        }
        self.inner.notify.notify_waiters();
        true
    }

    /// Wait for the ready event.
    pub async fn wait_ready(&self) -> DeviceInfo {
        loop {
            let notified = self.inner.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if let Some(device) = self.device() {
                return device;
            }
            notified.await;
        }
    }

    pub fn is_ready(&self) -> bool {
        self.inner.state.lock().device.is_some()
    }

    /// Device facts, once ready.
    pub fn device(&self) -> Option<DeviceInfo> {
        self.inner.state.lock().device.clone()
    }
}

/// Drives the handshake from the first `PLATFORM_READY` frame to the ready
/// event.
pub struct ReadinessHandshake {
    dispatcher: Arc<Dispatcher>,
    readiness: Readiness,
}

impl ReadinessHandshake {
    pub fn new(dispatcher: Arc<Dispatcher>, readiness: Readiness) -> Self {
        Self {
            dispatcher,
            readiness,
        }
    }

    /// Wait for the host's platform signal, load device facts, fire ready.
    ///
    /// `subscription` should carry `PLATFORM_READY` frames only. Signals after
    /// the first are never read.
    pub async fn run(self, mut subscription: Subscription) {
        if subscription.recv().await.is_none() {
            warn!("Channel closed before PLATFORM_READY");
            return;
        }
        debug!("PLATFORM_READY received");

        let device = self.load_device_info().await;
        self.readiness.fire(device);
    }

    /// Query the host for device facts, falling back on any failure.
    pub async fn load_device_info(&self) -> DeviceInfo {
        let result = tokio::try_join!(
            self.dispatcher.call("getDevicePlatform", json!({})),
            self.dispatcher.call("getDeviceUuid", json!({})),
            self.dispatcher.call("getDeviceSerial", json!({})),
        );

        match result {
            Ok((platform, uuid, serial)) => DeviceInfo::from_replies(&platform, &uuid, &serial),
            Err(e) => {
                warn!(error = %e, "Failed to load device info, using fallback");
                DeviceInfo::fallback()
            }
        }
    }
}
