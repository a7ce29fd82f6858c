//! Cross-crate integration flows.

mod correlation;
mod readiness;
mod timeouts;
