//! Command Dispatcher - sends commands to the host and hands back a reply
//! future.

use crate::domain::config::BridgeConfig;
use crate::domain::correlation::{RequestId, RequestIdGenerator};
use crate::domain::error::BridgeError;
use crate::domain::pending::{PendingRequest, ReplyOutcome, RequestRegistry};
use crate::ports::TimeSource;
use bridge_channel::{BridgeMessage, MessagePort, RequestEnvelope};
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tracing::{debug, error};

/// Per-call options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SendOptions {
    /// Deadline override in milliseconds; `Some(0)` disables the deadline.
    pub timeout_ms: Option<u64>,
}

impl SendOptions {
    pub fn with_timeout_ms(timeout_ms: u64) -> Self {
        Self {
            timeout_ms: Some(timeout_ms),
        }
    }

    /// Wait for the reply forever.
    pub fn no_timeout() -> Self {
        Self::with_timeout_ms(0)
    }
}

/// Future of a single reply. Settles exactly once.
#[must_use = "a reply future does nothing unless awaited"]
pub struct PendingReply {
    id: RequestId,
    rx: oneshot::Receiver<ReplyOutcome>,
}

impl PendingReply {
    /// A reply future that is already settled with an error.
    fn failed(id: RequestId, err: BridgeError) -> Self {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(Err(err));
        Self { id, rx }
    }

    /// Correlation id of the request.
    pub fn id(&self) -> &RequestId {
        &self.id
    }
}

impl Future for PendingReply {
    type Output = ReplyOutcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(Ok(outcome)) => Poll::Ready(outcome),
            Poll::Ready(Err(_)) => Poll::Ready(Err(BridgeError::Disconnected)),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Builds request envelopes, registers them and posts them on the channel.
pub struct Dispatcher {
    registry: Arc<RequestRegistry>,
    port: Arc<dyn MessagePort>,
    ids: RequestIdGenerator,
    clock: Arc<dyn TimeSource>,
    config: BridgeConfig,
}

impl Dispatcher {
    pub fn new(
        registry: Arc<RequestRegistry>,
        port: Arc<dyn MessagePort>,
        clock: Arc<dyn TimeSource>,
        config: BridgeConfig,
    ) -> Self {
        Self {
            registry,
            port,
            ids: RequestIdGenerator::new(Arc::clone(&clock)),
            clock,
            config,
        }
    }

    /// Send a command.
    ///
    /// The request is registered and posted before this returns; the returned
    /// future only waits. It settles with the host's reply, or with
    /// [`BridgeError::Timeout`] once the effective deadline elapses. No retry
    /// is attempted; callers re-send if they want one.
    pub fn send(&self, command: &str, data: Value, options: SendOptions) -> PendingReply {
        let id = self.ids.next_id();
        let (tx, rx) = oneshot::channel();

        if let Err(e) = self
            .registry
            .register(id.clone(), PendingRequest::new(command, tx))
        {
            return PendingReply::failed(id, e.into());
        }

        let timeout = self.config.effective_timeout(options.timeout_ms);
        if let Some(timeout) = timeout {
            let runtime = match Handle::try_current() {
                Ok(runtime) => runtime,
                Err(e) => {
                    self.registry
                        .complete(&id, Err(BridgeError::NoRuntime(e.to_string())));
                    return PendingReply { id, rx };
                }
            };
            let registry = Arc::clone(&self.registry);
            let deadline_id = id.clone();
            let handle = runtime.spawn(async move {
                tokio::time::sleep(timeout).await;
                registry.expire(&deadline_id, timeout);
            });
            self.registry.attach_timer(&id, handle);
        }

        if self.config.debug_logging {
            debug!(
                request_id = %id,
                command,
                timeout_ms = timeout.map_or(0, |t| t.as_millis() as u64),
                "Sending command"
            );
        }

        let envelope = BridgeMessage::BridgeRequest(RequestEnvelope {
            id: id.to_string(),
            command: command.to_string(),
            data,
            timestamp: self.clock.now_ms(),
        });

        if let Err(e) = self.port.post_message(&envelope) {
            error!(request_id = %id, command, error = %e, "Failed to post request");
            self.registry.complete(&id, Err(e.into()));
        }

        PendingReply { id, rx }
    }

    /// Send with default options and wait for the reply.
    pub async fn call(&self, command: &str, data: Value) -> ReplyOutcome {
        self.send(command, data, SendOptions::default()).await
    }

    /// Number of requests awaiting a reply.
    pub fn pending_count(&self) -> usize {
        self.registry.pending_count()
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }
}
