//! # Bridge Test Suite
//!
//! Unified test crate.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── mock_host.rs      # In-process host answering bridge commands
//! └── integration/      # Cross-crate flows over a real channel
//!     ├── correlation.rs
//!     ├── timeouts.rs
//!     ├── filesystem.rs
//!     ├── readiness.rs
//!     └── plugins.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p bridge-tests
//! cargo test -p bridge-tests integration::filesystem::
//! ```

#![allow(dead_code)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod integration;
pub mod mock_host;

pub use mock_host::{
    CommandHandler, DelayedHandler, FnHandler, HostReply, MockHost, RecordedRequest, SilentHandler,
    StoringHost, TestBridge,
};
