//! Domain types for the bridge.
//!
//! Configuration, correlation ids, device facts, errors and the in-flight
//! request registry.

pub mod config;
pub mod correlation;
pub mod device;
pub mod error;
pub mod pending;

// Re-exports for convenience
pub use config::{BridgeConfig, ConfigError, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_MS};
pub use correlation::{RequestId, RequestIdGenerator};
pub use device::{DeviceInfo, BRIDGE_PLATFORM_VERSION};
pub use error::{BridgeError, BridgeResult, RegistryError};
pub use pending::{PendingRequest, RegistryStats, ReplyOutcome, RequestRegistry};
