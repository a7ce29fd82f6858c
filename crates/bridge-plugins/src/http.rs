//! HTTP plugin. Requests are executed by the host (`httpRequest`).

use crate::error::HttpFailure;
use bridge_core::{spawn_with_callbacks, Dispatcher};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::debug;

pub const HTTP_REQUEST: &str = "httpRequest";

pub type Headers = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
}

/// Per-request options. Missing data is sent as `{}`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HttpOptions {
    pub method: HttpMethod,
    pub data: Option<Value>,
    pub headers: Headers,
}

/// Response as reported by the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpResponse {
    pub status: i32,
    pub data: Value,
    pub headers: Headers,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl HttpResponse {
    /// Decode the host's reply field by field.
    ///
    /// A missing or non-numeric `status` reads as 0. Header values that are
    /// not strings keep their JSON text, so `"content-length": 2` becomes `"2"`.
    pub fn from_reply(reply: &Value) -> Self {
        let status = reply
            .get("status")
            .and_then(|s| match s {
                Value::String(text) => text.trim().parse().ok(),
                other => other.as_i64(),
            })
            .and_then(|s| i32::try_from(s).ok())
            .unwrap_or(0);
        let headers = reply
            .get("headers")
            .and_then(Value::as_object)
            .map(|fields| {
                fields
                    .iter()
                    .filter(|(_, v)| !v.is_null())
                    .map(|(k, v)| {
                        let value = match v {
                            Value::String(s) => s.clone(),
                            other => other.to_string(),
                        };
                        (k.clone(), value)
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            status,
            data: reply.get("data").cloned().unwrap_or(Value::Null),
            headers,
            url: reply.get("url").and_then(Value::as_str).map(str::to_string),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP client with headers shared by every request.
#[derive(Clone)]
pub struct HttpClient {
    dispatcher: Arc<Dispatcher>,
    global_headers: Arc<RwLock<Headers>>,
}

impl HttpClient {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            dispatcher,
            global_headers: Arc::new(RwLock::new(Headers::new())),
        }
    }

    /// Set a header sent with every later request.
    pub fn set_header(&self, key: impl Into<String>, value: impl Into<String>) {
        let (key, value) = (key.into(), value.into());
        debug!(key = %key, value = %value, "HTTP header set");
        self.global_headers.write().insert(key, value);
    }

    pub fn global_headers(&self) -> Headers {
        self.global_headers.read().clone()
    }

    /// Perform a request. Per-request headers override global ones.
    pub async fn request(&self, url: &str, options: HttpOptions) -> Result<HttpResponse, HttpFailure> {
        let mut headers = self.global_headers();
        headers.extend(options.headers);

        debug!(url, method = ?options.method, "HTTP request");
        let payload = json!({
            "url": url,
            "method": options.method,
            "data": options.data.unwrap_or_else(|| json!({})),
            "headers": headers,
        });

        let reply = self
            .dispatcher
            .call(HTTP_REQUEST, payload)
            .await
            .map_err(|e| HttpFailure::from_bridge(&e))?;

        // A reply without a usable status counts as status 0, a failure
        let response = HttpResponse::from_reply(&reply);
        if response.is_success() {
            Ok(response)
        } else {
            Err(HttpFailure::from_status(response))
        }
    }

    pub async fn get(&self, url: &str, params: Option<Value>, headers: Headers) -> Result<HttpResponse, HttpFailure> {
        self.request(
            url,
            HttpOptions {
                method: HttpMethod::Get,
                data: params,
                headers,
            },
        )
        .await
    }

    pub async fn post(&self, url: &str, data: Option<Value>, headers: Headers) -> Result<HttpResponse, HttpFailure> {
        self.request(
            url,
            HttpOptions {
                method: HttpMethod::Post,
                data,
                headers,
            },
        )
        .await
    }

    /// Callback form of [`request`](Self::request).
    ///
    /// Outside a tokio runtime `on_failure` runs at once with a transport
    /// failure and no task is returned.
    pub fn request_with_callbacks<S, F>(
        &self,
        url: impl Into<String>,
        options: HttpOptions,
        on_success: S,
        on_failure: F,
    ) -> Option<JoinHandle<()>>
    where
        S: FnOnce(HttpResponse) + Send + 'static,
        F: FnOnce(HttpFailure) + Send + 'static,
    {
        let client = self.clone();
        let url = url.into();
        spawn_with_callbacks(
            async move { client.request(&url, options).await },
            on_success,
            on_failure,
        )
    }
}
