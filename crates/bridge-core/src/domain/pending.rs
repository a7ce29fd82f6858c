//! Request Registry - tracks in-flight requests by correlation id.
//!
//! Flow:
//! 1. Dispatcher generates a [`RequestId`] and calls `register()`
//! 2. Dispatcher arms a deadline task and hands it over via `attach_timer()`
//! 3. Dispatcher posts the request envelope
//! 4. Router calls `complete()` on a reply, or the deadline calls `expire()`
//!
//! Removal from the map is the single settlement point: whichever of
//! `complete()` and `expire()` removes the entry settles the caller, the
//! other finds nothing and does nothing.

use crate::domain::correlation::RequestId;
use crate::domain::error::{BridgeError, RegistryError};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

/// Outcome delivered to a waiting caller.
pub type ReplyOutcome = Result<Value, BridgeError>;

/// A request waiting for its reply.
pub struct PendingRequest {
    /// Continuation of the caller
    sender: oneshot::Sender<ReplyOutcome>,
    /// Command name (for logging and timeout errors)
    command: String,
    /// When the request was registered
    created_at: Instant,
    /// Deadline task, if one is armed
    timeout_handle: Option<JoinHandle<()>>,
}

impl PendingRequest {
    pub fn new(command: impl Into<String>, sender: oneshot::Sender<ReplyOutcome>) -> Self {
        Self {
            sender,
            command: command.into(),
            created_at: Instant::now(),
            timeout_handle: None,
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }
}

/// Statistics for the registry
#[derive(Debug, Default)]
pub struct RegistryStats {
    /// Total requests registered
    pub total_registered: AtomicU64,
    /// Total requests settled by a reply (or a send failure)
    pub total_completed: AtomicU64,
    /// Total requests settled by their deadline
    pub total_timeouts: AtomicU64,
    /// Settlements nobody was waiting for anymore
    pub total_dropped: AtomicU64,
    /// Replies and deadlines that found no entry
    pub total_unmatched: AtomicU64,
}

/// In-flight request registry.
#[derive(Default)]
pub struct RequestRegistry {
    pending: DashMap<RequestId, PendingRequest>,
    stats: RegistryStats,
}

impl RequestRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a pending request.
    ///
    /// An id that is already present is rejected and the existing entry is
    /// left untouched.
    pub fn register(&self, id: RequestId, request: PendingRequest) -> Result<(), RegistryError> {
        match self.pending.entry(id) {
            Entry::Occupied(occupied) => {
                error!(
                    request_id = %occupied.key(),
                    command = request.command,
                    "Request id already registered"
                );
                Err(RegistryError::Duplicate(occupied.key().clone()))
            }
            Entry::Vacant(vacant) => {
                debug!(
                    request_id = %vacant.key(),
                    command = request.command,
                    "Registered pending request"
                );
                vacant.insert(request);
                self.stats.total_registered.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
        }
    }

    /// Hand the deadline task of a request to the registry.
    ///
    /// If the request already settled the task is aborted on the spot.
    pub fn attach_timer(&self, id: &RequestId, handle: JoinHandle<()>) {
        match self.pending.get_mut(id) {
            Some(mut entry) => entry.timeout_handle = Some(handle),
            None => handle.abort(),
        }
    }

    /// Settle a request with a reply.
    ///
    /// Returns `false` when the id is unknown: a late reply after the
    /// deadline, a duplicate reply, or an id this bridge never issued.
    pub fn complete(&self, id: &RequestId, outcome: ReplyOutcome) -> bool {
        let Some((_, mut pending)) = self.pending.remove(id) else {
            self.stats.total_unmatched.fetch_add(1, Ordering::Relaxed);
            warn!(request_id = %id, "No pending request for reply");
            return false;
        };

        if let Some(handle) = pending.timeout_handle.take() {
            handle.abort();
        }

        let elapsed = pending.created_at.elapsed();
        self.stats.total_completed.fetch_add(1, Ordering::Relaxed);
        debug!(
            request_id = %id,
            command = pending.command,
            response_time_ms = elapsed.as_millis() as u64,
            ok = outcome.is_ok(),
            "Completed pending request"
        );
        self.deliver(id, pending, outcome);
        true
    }

    /// Settle a request with a timeout, if it is still pending.
    pub fn expire(&self, id: &RequestId, timeout: Duration) -> bool {
        let Some((_, mut pending)) = self.pending.remove(id) else {
            self.stats.total_unmatched.fetch_add(1, Ordering::Relaxed);
            debug!(request_id = %id, "Deadline fired for settled request");
            return false;
        };

        // Called from the deadline task itself; detach instead of aborting
        drop(pending.timeout_handle.take());

        let timeout_ms = timeout.as_millis() as u64;
        self.stats.total_timeouts.fetch_add(1, Ordering::Relaxed);
        warn!(
            request_id = %id,
            command = pending.command,
            timeout_ms,
            "Pending request timed out"
        );
        let err = BridgeError::Timeout {
            command: pending.command.clone(),
            timeout_ms,
        };
        self.deliver(id, pending, Err(err));
        true
    }

    fn deliver(&self, id: &RequestId, pending: PendingRequest, outcome: ReplyOutcome) {
        if pending.sender.send(outcome).is_err() {
            // Caller dropped its reply future
            self.stats.total_dropped.fetch_add(1, Ordering::Relaxed);
            debug!(
                request_id = %id,
                command = pending.command,
                "Reply receiver dropped"
            );
        }
    }

    /// Number of requests currently in flight
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Check if a request is still in flight
    pub fn is_pending(&self, id: &RequestId) -> bool {
        self.pending.contains_key(id)
    }

    /// Command of an in-flight request
    pub fn command_of(&self, id: &RequestId) -> Option<String> {
        self.pending.get(id).map(|p| p.command.clone())
    }

    pub fn stats(&self) -> &RegistryStats {
        &self.stats
    }
}
