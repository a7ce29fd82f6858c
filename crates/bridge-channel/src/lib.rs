//! # Bridge Channel - Message Port Between Web View and Host
//!
//! Models the `postMessage` boundary that separates sandboxed web view code
//! from the native host process.
//!
//! ## Shape of the Boundary
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │  Web View    │      post()        │    Host      │
//! │  (bridge)    │ ──────┐            │  (executor)  │
//! └──────────────┘       │            └──────────────┘
//!        ↑               ▼                    ↑
//!        │         ┌──────────────┐           │
//!        └──────── │   Channel    │ ──────────┘
//!    subscribe()   └──────────────┘   subscribe()
//! ```
//!
//! Every frame posted is visible to every subscriber, including the poster,
//! exactly like `window.postMessage(message, '*')`. Frames are untyped JSON;
//! [`BridgeMessage`] classifies the ones that belong to the bridge protocol
//! and subscribers use a [`FrameFilter`] to ignore everything else.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod messages;
pub mod port;
pub mod subscriber;

// Re-export main types
pub use messages::{BridgeMessage, MessageKind, RequestEnvelope, ResponseEnvelope};
pub use port::{ChannelError, InMemoryChannel, MessagePort};
pub use subscriber::{FrameFilter, FrameStream, Subscription};

/// Frames buffered per subscriber before the slowest one starts lagging.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;
