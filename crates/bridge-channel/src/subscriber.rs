//! # Frame Subscriber
//!
//! The listening side of the channel.

use crate::messages::MessageKind;
use serde_json::Value;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::broadcast;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::Stream;
use tracing::debug;

/// Selects which frames a subscription yields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameFilter {
    /// Accepted kinds; `None` accepts everything, foreign frames included.
    kinds: Option<Vec<MessageKind>>,
}

impl FrameFilter {
    /// Accept every frame.
    #[must_use]
    pub fn all() -> Self {
        Self { kinds: None }
    }

    /// Accept only protocol frames of the given kinds.
    #[must_use]
    pub fn kinds(kinds: Vec<MessageKind>) -> Self {
        Self { kinds: Some(kinds) }
    }

    /// Accept only protocol frames of one kind.
    #[must_use]
    pub fn only(kind: MessageKind) -> Self {
        Self::kinds(vec![kind])
    }

    /// Check a frame against the filter.
    #[must_use]
    pub fn matches(&self, frame: &Value) -> bool {
        match &self.kinds {
            None => true,
            Some(kinds) => MessageKind::of(frame).is_some_and(|k| kinds.contains(&k)),
        }
    }

    pub(crate) fn kinds_ref(&self) -> Option<&[MessageKind]> {
        self.kinds.as_deref()
    }
}

/// A subscription handle for receiving frames.
pub struct Subscription {
    receiver: broadcast::Receiver<Value>,
    filter: FrameFilter,
}

impl Subscription {
    pub(crate) fn new(receiver: broadcast::Receiver<Value>, filter: FrameFilter) -> Self {
        Self { receiver, filter }
    }

    /// Receive the next frame that matches the filter.
    ///
    /// Returns `None` once the channel is closed and drained.
    pub async fn recv(&mut self) -> Option<Value> {
        loop {
            let frame = match self.receiver.recv().await {
                Ok(f) => f,
                Err(broadcast::error::RecvError::Closed) => return None,
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    debug!(lagged = count, "Subscriber lagged, some frames dropped");
                    continue;
                }
            };

            if self.filter.matches(&frame) {
                return Some(frame);
            }
        }
    }

    /// Receive without waiting. `Ok(None)` means nothing is buffered.
    pub fn try_recv(&mut self) -> Result<Option<Value>, crate::ChannelError> {
        loop {
            let frame = match self.receiver.try_recv() {
                Ok(f) => f,
                Err(broadcast::error::TryRecvError::Empty) => return Ok(None),
                Err(broadcast::error::TryRecvError::Closed) => {
                    return Err(crate::ChannelError::Closed)
                }
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
            };

            if self.filter.matches(&frame) {
                return Ok(Some(frame));
            }
        }
    }

    /// Filter for this subscription.
    #[must_use]
    pub fn filter(&self) -> &FrameFilter {
        &self.filter
    }
}

/// A [`Stream`] over a subscription.
pub struct FrameStream {
    inner: BroadcastStream<Value>,
    filter: FrameFilter,
}

impl FrameStream {
    #[must_use]
    pub fn new(subscription: Subscription) -> Self {
        Self {
            inner: BroadcastStream::new(subscription.receiver),
            filter: subscription.filter,
        }
    }
}

impl Stream for FrameStream {
    type Item = Value;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            match Pin::new(&mut self.inner).poll_next(cx) {
                Poll::Ready(Some(Ok(frame))) => {
                    if self.filter.matches(&frame) {
                        return Poll::Ready(Some(frame));
                    }
                }
                Poll::Ready(Some(Err(BroadcastStreamRecvError::Lagged(count)))) => {
                    debug!(lagged = count, "Stream lagged, some frames dropped");
                }
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
