//! Response Router - settles pending requests from response envelopes.

use crate::domain::correlation::RequestId;
use crate::domain::error::BridgeError;
use crate::domain::pending::RequestRegistry;
use bridge_channel::{BridgeMessage, Subscription};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Listens on the channel and routes each response to its waiting caller.
pub struct ResponseRouter {
    registry: Arc<RequestRegistry>,
    debug_logging: bool,
}

impl ResponseRouter {
    pub fn new(registry: Arc<RequestRegistry>, debug_logging: bool) -> Self {
        Self {
            registry,
            debug_logging,
        }
    }

    /// Run the router loop until the channel closes.
    pub async fn run(self, mut subscription: Subscription) {
        while let Some(frame) = subscription.recv().await {
            self.handle_frame(&frame);
        }
        warn!("Channel closed, stopping response router");
    }

    /// Route one frame. Returns `true` when a pending request was settled.
    ///
    /// Frames that are not response envelopes are ignored without a trace.
    pub fn handle_frame(&self, frame: &Value) -> bool {
        let Some(BridgeMessage::BridgeResponse(response)) = BridgeMessage::from_frame(frame) else {
            return false;
        };

        let id = RequestId::from(response.id.as_str());
        let outcome = match response.host_error() {
            Some(error) => Err(BridgeError::Host(error.to_string())),
            None => Ok(response.data.clone().unwrap_or(Value::Null)),
        };

        if self.debug_logging {
            debug!(
                request_id = %id,
                ok = outcome.is_ok(),
                "Received response"
            );
        }

        self.registry.complete(&id, outcome)
    }
}
