//! App lifecycle: exit, version, in-app browser.

use crate::error::PluginError;
use bridge_core::{Dispatcher, SendOptions};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

pub const EXIT_APP: &str = "exitApp";
pub const GET_APP_VERSION: &str = "getAppVersion";
pub const IN_APP_BROWSER_OPEN: &str = "inAppBrowserOpen";

/// Browser target used when none is given.
pub const DEFAULT_BROWSER_TARGET: &str = "_system";

pub struct App {
    dispatcher: Arc<Dispatcher>,
}

impl App {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    pub async fn exit_app(&self) -> Result<Value, PluginError> {
        Ok(self.dispatcher.call(EXIT_APP, json!({})).await?)
    }

    /// Application version string.
    pub async fn app_version(&self) -> Result<String, PluginError> {
        let reply = self.dispatcher.call(GET_APP_VERSION, json!({})).await?;
        match reply.get("version").unwrap_or(&reply) {
            Value::String(version) => Ok(version.clone()),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(PluginError::InvalidReply {
                command: GET_APP_VERSION.into(),
                reason: format!("no version in {other}"),
            }),
        }
    }

    /// Open `url` in a browser. Fire-and-forget: the reply is not awaited.
    pub fn open_in_app_browser(&self, url: &str, target: Option<&str>, options: Option<&str>) {
        let target = target.unwrap_or(DEFAULT_BROWSER_TARGET);
        debug!(url, target, "Opening in-app browser");
        let _ = self.dispatcher.send(
            IN_APP_BROWSER_OPEN,
            json!({ "url": url, "target": target, "options": options.unwrap_or_default() }),
            SendOptions::default(),
        );
    }
}
