//! Correlation ids for request tracking.
//!
//! Ids have the form `req_<unix_ms>_<sequence>`. The sequence is a
//! per-generator monotonic counter, so ids never repeat within one bridge
//! context even when the clock stands still or goes backwards.

use crate::ports::TimeSource;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

const PREFIX: &str = "req_";

/// Correlation id linking a request envelope to its response.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(String);

impl RequestId {
    /// Build an id from its parts.
    #[must_use]
    pub fn from_parts(timestamp_ms: u64, sequence: u64) -> Self {
        Self(format!("{PREFIX}{timestamp_ms}_{sequence}"))
    }

    /// Borrow the wire form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Timestamp component, if the id was produced by a generator.
    #[must_use]
    pub fn timestamp_ms(&self) -> Option<u64> {
        self.parts().map(|(ts, _)| ts)
    }

    /// Sequence component, if the id was produced by a generator.
    #[must_use]
    pub fn sequence(&self) -> Option<u64> {
        self.parts().map(|(_, seq)| seq)
    }

    fn parts(&self) -> Option<(u64, u64)> {
        let rest = self.0.strip_prefix(PREFIX)?;
        let (ts, seq) = rest.split_once('_')?;
        Some((ts.parse().ok()?, seq.parse().ok()?))
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for RequestId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<RequestId> for String {
    fn from(id: RequestId) -> Self {
        id.0
    }
}

impl AsRef<str> for RequestId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Produces unique [`RequestId`]s for one bridge context.
pub struct RequestIdGenerator {
    counter: AtomicU64,
    clock: Arc<dyn TimeSource>,
}

impl RequestIdGenerator {
    pub fn new(clock: Arc<dyn TimeSource>) -> Self {
        Self {
            counter: AtomicU64::new(0),
            clock,
        }
    }

    /// Next id. Sequence numbers start at 1.
    pub fn next_id(&self) -> RequestId {
        let sequence = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        RequestId::from_parts(self.clock.now_ms(), sequence)
    }

    /// Number of ids handed out so far.
    pub fn issued(&self) -> u64 {
        self.counter.load(Ordering::Relaxed)
    }
}
