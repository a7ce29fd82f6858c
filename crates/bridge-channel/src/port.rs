//! # Message Port
//!
//! The posting side of the channel.

use crate::messages::BridgeMessage;
use crate::subscriber::{FrameFilter, FrameStream, Subscription};
use crate::DEFAULT_CHANNEL_CAPACITY;
use parking_lot::RwLock;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, trace};

/// Errors raised by the channel itself.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChannelError {
    /// The channel was closed; nothing can be posted anymore.
    #[error("channel closed")]
    Closed,

    /// A message could not be turned into a frame.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

/// A bidirectional message port.
///
/// Posting is synchronous and fire-and-forget, like `window.postMessage`:
/// a frame with no listeners is simply dropped.
pub trait MessagePort: Send + Sync {
    /// Post a raw frame. Returns the number of subscribers that will see it.
    fn post(&self, frame: Value) -> Result<usize, ChannelError>;

    /// Subscribe to frames matching a filter.
    fn subscribe(&self, filter: FrameFilter) -> Subscription;

    /// Total frames posted (including dropped ones).
    fn frames_posted(&self) -> u64;

    /// Post a protocol message.
    fn post_message(&self, message: &BridgeMessage) -> Result<usize, ChannelError> {
        self.post(message.to_frame()?)
    }
}

/// In-memory implementation of the channel.
///
/// Uses `tokio::sync::broadcast` so every subscriber sees every frame.
pub struct InMemoryChannel {
    /// Broadcast sender; `None` once closed.
    sender: RwLock<Option<broadcast::Sender<Value>>>,

    /// Total frames posted.
    frames_posted: AtomicU64,

    /// Channel capacity.
    capacity: usize,
}

impl InMemoryChannel {
    /// Create a channel with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a channel with the given capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender: RwLock::new(Some(sender)),
            frames_posted: AtomicU64::new(0),
            capacity,
        }
    }

    /// Convenience wrapper returning a [`FrameStream`].
    #[must_use]
    pub fn frame_stream(&self, filter: FrameFilter) -> FrameStream {
        FrameStream::new(self.subscribe(filter))
    }

    /// Close the channel. Subscribers drain what is buffered and then end;
    /// further posts fail with [`ChannelError::Closed`].
    pub fn close(&self) {
        if self.sender.write().take().is_some() {
            debug!("Channel closed");
        }
    }

    /// Whether [`close`](Self::close) was called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.sender.read().is_none()
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender
            .read()
            .as_ref()
            .map_or(0, broadcast::Sender::receiver_count)
    }

    /// Channel capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for InMemoryChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl MessagePort for InMemoryChannel {
    fn post(&self, frame: Value) -> Result<usize, ChannelError> {
        let guard = self.sender.read();
        let sender = guard.as_ref().ok_or(ChannelError::Closed)?;

        self.frames_posted.fetch_add(1, Ordering::Relaxed);

        match sender.send(frame) {
            Ok(receivers) => {
                trace!(receivers, "Frame posted");
                Ok(receivers)
            }
            Err(_) => {
                // Nobody listening, same as postMessage into an empty window
                trace!("Frame dropped (no subscribers)");
                Ok(0)
            }
        }
    }

    fn subscribe(&self, filter: FrameFilter) -> Subscription {
        let receiver = match self.sender.read().as_ref() {
            Some(sender) => sender.subscribe(),
            None => {
                // Hand out a receiver that is already closed
                let (tx, rx) = broadcast::channel(1);
                drop(tx);
                rx
            }
        };
        debug!(kinds = ?filter.kinds_ref(), "New subscription created");
        Subscription::new(receiver, filter)
    }

    fn frames_posted(&self) -> u64 {
        self.frames_posted.load(Ordering::Relaxed)
    }
}
