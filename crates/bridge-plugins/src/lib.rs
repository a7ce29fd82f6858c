//! # Bridge Plugins - Native Facades
//!
//! Thin wrappers that turn plugin calls into bridge commands. None of them
//! hold state the host cares about; each formats a command name and payload
//! and forwards it to the [`Dispatcher`].
//!
//! | Facade | Commands |
//! |--------|----------|
//! | [`HttpClient`] | `httpRequest` |
//! | [`Keyboard`] | `keyboardShow`, `keyboardHide` |
//! | [`QrScanner`] | `qrScannerRequest` |
//! | [`Fcm`] | `fcmSubscribe`, `fcmUnsubscribe`, `fcmRequestPermission`, `fcmGetToken` |
//! | [`App`] | `exitApp`, `getAppVersion`, `inAppBrowserOpen` |

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod app;
pub mod error;
pub mod fcm;
pub mod http;
pub mod keyboard;
pub mod qr_scanner;

pub use app::App;
pub use error::{HttpFailure, PluginError};
pub use fcm::Fcm;
pub use http::{Headers, HttpClient, HttpMethod, HttpOptions, HttpResponse};
pub use keyboard::Keyboard;
pub use qr_scanner::{QrScanner, ScannerStatus};

use bridge_core::Dispatcher;
use std::sync::Arc;

/// Every facade over one dispatcher.
pub struct Plugins {
    pub http: HttpClient,
    pub keyboard: Keyboard,
    pub qr_scanner: QrScanner,
    pub fcm: Fcm,
    pub app: App,
}

impl Plugins {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            http: HttpClient::new(Arc::clone(&dispatcher)),
            keyboard: Keyboard::new(Arc::clone(&dispatcher)),
            qr_scanner: QrScanner::new(Arc::clone(&dispatcher)),
            fcm: Fcm::new(Arc::clone(&dispatcher)),
            app: App::new(dispatcher),
        }
    }
}
