//! Soft keyboard control.

use crate::error::PluginError;
use bridge_core::Dispatcher;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

pub const KEYBOARD_SHOW: &str = "keyboardShow";
pub const KEYBOARD_HIDE: &str = "keyboardHide";

pub struct Keyboard {
    dispatcher: Arc<Dispatcher>,
}

impl Keyboard {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    pub async fn show(&self) -> Result<Value, PluginError> {
        debug!("Keyboard show");
        Ok(self.dispatcher.call(KEYBOARD_SHOW, json!({})).await?)
    }

    pub async fn hide(&self) -> Result<Value, PluginError> {
        debug!("Keyboard hide");
        Ok(self.dispatcher.call(KEYBOARD_HIDE, json!({})).await?)
    }
}
