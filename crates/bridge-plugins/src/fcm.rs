//! Push notifications (FCM).

use crate::error::PluginError;
use bridge_core::Dispatcher;
use parking_lot::RwLock;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, warn};

pub const FCM_SUBSCRIBE: &str = "fcmSubscribe";
pub const FCM_UNSUBSCRIBE: &str = "fcmUnsubscribe";
pub const FCM_REQUEST_PERMISSION: &str = "fcmRequestPermission";
pub const FCM_GET_TOKEN: &str = "fcmGetToken";

type NotificationHandler = Arc<dyn Fn(Value) + Send + Sync>;

pub struct Fcm {
    dispatcher: Arc<Dispatcher>,
    handler: RwLock<Option<NotificationHandler>>,
}

impl Fcm {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            dispatcher,
            handler: RwLock::new(None),
        }
    }

    /// Register the notification handler, replacing any previous one.
    pub fn on_notification<F>(&self, handler: F)
    where
        F: Fn(Value) + Send + Sync + 'static,
    {
        debug!("FCM notification handler registered");
        *self.handler.write() = Some(Arc::new(handler));
    }

    /// Deliver a notification pushed by the host. Returns `false` when no
    /// handler is registered.
    pub fn notify(&self, payload: Value) -> bool {
        let handler = self.handler.read().clone();
        match handler {
            Some(handler) => {
                handler(payload);
                true
            }
            None => {
                warn!("FCM notification dropped, no handler registered");
                false
            }
        }
    }

    pub async fn subscribe_to_topic(&self, topic: &str) -> Result<Value, PluginError> {
        Ok(self.dispatcher.call(FCM_SUBSCRIBE, json!({ "topic": topic })).await?)
    }

    pub async fn unsubscribe_from_topic(&self, topic: &str) -> Result<Value, PluginError> {
        Ok(self.dispatcher.call(FCM_UNSUBSCRIBE, json!({ "topic": topic })).await?)
    }

    pub async fn request_permission(&self) -> Result<Value, PluginError> {
        Ok(self.dispatcher.call(FCM_REQUEST_PERMISSION, json!({})).await?)
    }

    pub async fn get_token(&self) -> Result<Value, PluginError> {
        Ok(self.dispatcher.call(FCM_GET_TOKEN, json!({})).await?)
    }
}
