//! Ports (traits the bridge depends on).

pub mod outbound;

pub use outbound::{FixedTimeSource, SystemTimeSource, TimeSource};
