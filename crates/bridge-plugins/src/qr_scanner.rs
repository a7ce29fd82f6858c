//! QR scanner. Only `scan` reaches the host; preview and torch state are
//! tracked locally.

use crate::error::PluginError;
use bridge_core::Dispatcher;
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

pub const QR_SCANNER_REQUEST: &str = "qrScannerRequest";

/// Scanner state after a local call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScannerStatus {
    pub authorized: bool,
    pub showing: bool,
    pub light_enabled: bool,
    pub destroyed: bool,
}

pub struct QrScanner {
    dispatcher: Arc<Dispatcher>,
    status: Mutex<ScannerStatus>,
}

impl QrScanner {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            dispatcher,
            status: Mutex::new(ScannerStatus::default()),
        }
    }

    /// Camera permission is owned by the host; always granted here.
    pub fn prepare(&self) -> ScannerStatus {
        debug!("QR scanner prepare");
        self.update(|s| {
            s.authorized = true;
            s.destroyed = false;
        })
    }

    /// Ask the host to scan one code. Empty string when nothing was read.
    pub async fn scan(&self) -> Result<String, PluginError> {
        debug!("QR scanner scan");
        let reply = self.dispatcher.call(QR_SCANNER_REQUEST, json!({})).await?;
        Ok(reply
            .get("result")
            .and_then(|r| r.as_str())
            .unwrap_or_default()
            .to_string())
    }

    pub fn show(&self) -> ScannerStatus {
        self.update(|s| s.showing = true)
    }

    pub fn hide(&self) -> ScannerStatus {
        self.update(|s| s.showing = false)
    }

    pub fn destroy(&self) -> ScannerStatus {
        self.update(|s| *s = ScannerStatus {
            destroyed: true,
            ..ScannerStatus::default()
        })
    }

    pub fn enable_light(&self) -> ScannerStatus {
        self.update(|s| s.light_enabled = true)
    }

    pub fn disable_light(&self) -> ScannerStatus {
        self.update(|s| s.light_enabled = false)
    }

    pub fn status(&self) -> ScannerStatus {
        *self.status.lock()
    }

    fn update(&self, f: impl FnOnce(&mut ScannerStatus)) -> ScannerStatus {
        let mut status = self.status.lock();
        f(&mut status);
        debug!(?status, "QR scanner state");
        *status
    }
}
