//! # Bridge Core - Request/Response Correlation Over a Message Port
//!
//! Lets code inside a sandboxed web view issue asynchronous commands to its
//! native host and receive exactly one matched reply per command.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                        BRIDGE (bridge-core)                   │
//! ├───────────────────────────────────────────────────────────────┤
//! │  caller ──send()──▶ ┌────────────┐ ──register()──▶ ┌─────────┐ │
//! │                     │ Dispatcher │                 │Registry │ │
//! │  caller ◀─future─── └─────┬──────┘ ◀──complete()── └────┬────┘ │
//! │                           │ BRIDGE_REQUEST              │      │
//! │                           ▼                             │      │
//! │                    ┌──────────────┐  BRIDGE_RESPONSE ┌──┴────┐ │
//! │                    │   Channel    │ ───────────────▶ │Router │ │
//! │                    └──────────────┘                  └───────┘ │
//! │                                                                │
//! │  PLATFORM_READY ──▶ Readiness Handshake ──▶ ready(DeviceInfo)  │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every request settles exactly once: with the host's reply, or with
//! [`BridgeError::Timeout`] when the deadline passes first. Registry removal
//! decides which one wins.
//!
//! # Usage
//!
//! ```ignore
//! use bridge_core::{Bridge, BridgeConfig};
//!
//! let mut bridge = Bridge::new(BridgeConfig::default(), channel)?;
//! bridge.start()?;
//! let exists = bridge.dispatcher().call("fileExists", json!({ "path": "/a.txt" })).await?;
//! ```

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod callback;
pub mod dispatcher;
pub mod domain;
pub mod ports;
pub mod readiness;
pub mod router;
pub mod service;

// Re-exports for public API
pub use callback::spawn_with_callbacks;
pub use dispatcher::{Dispatcher, PendingReply, SendOptions};
pub use domain::config::BridgeConfig;
pub use domain::correlation::RequestId;
pub use domain::device::DeviceInfo;
pub use domain::error::{BridgeError, BridgeResult, RegistryError};
pub use domain::pending::RequestRegistry;
pub use ports::{SystemTimeSource, TimeSource};
pub use readiness::{Readiness, ReadinessHandshake};
pub use router::ResponseRouter;
pub use service::Bridge;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
