//! In-process host for integration tests.
//!
//! The mock listens on the channel like a real host would: it answers
//! `BRIDGE_REQUEST` frames through a [`CommandHandler`], records every
//! request, and notices `BRIDGE_READY`. Each request is handled on its own
//! task so handlers that delay can answer out of order.

use async_trait::async_trait;
use bridge_channel::{
    BridgeMessage, FrameFilter, InMemoryChannel, MessageKind, MessagePort, RequestEnvelope,
    ResponseEnvelope,
};
use bridge_core::{Bridge, BridgeConfig, Dispatcher};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// What the host does with one request.
#[derive(Debug, Clone, PartialEq)]
pub enum HostReply {
    /// `BRIDGE_RESPONSE` with `data`
    Data(Value),
    /// `BRIDGE_RESPONSE` with `error`
    Error(String),
    /// No response at all
    Silence,
}

/// Host-side command executor.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn handle(&self, command: &str, data: &Value) -> HostReply;
}

/// Handler from a plain function.
pub struct FnHandler<F>(F);

impl<F> FnHandler<F>
where
    F: Fn(&str, &Value) -> HostReply + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F> CommandHandler for FnHandler<F>
where
    F: Fn(&str, &Value) -> HostReply + Send + Sync,
{
    async fn handle(&self, command: &str, data: &Value) -> HostReply {
        (self.0)(command, data)
    }
}

#[async_trait]
impl<H: CommandHandler + ?Sized> CommandHandler for Arc<H> {
    async fn handle(&self, command: &str, data: &Value) -> HostReply {
        (**self).handle(command, data).await
    }
}

/// Never answers.
pub struct SilentHandler;

#[async_trait]
impl CommandHandler for SilentHandler {
    async fn handle(&self, _command: &str, _data: &Value) -> HostReply {
        HostReply::Silence
    }
}

/// Delays selected commands before handing them to `inner`.
pub struct DelayedHandler<H> {
    inner: H,
    delays: HashMap<String, Duration>,
}

impl<H: CommandHandler> DelayedHandler<H> {
    pub fn new(inner: H) -> Self {
        Self {
            inner,
            delays: HashMap::new(),
        }
    }

    pub fn delay(mut self, command: &str, delay: Duration) -> Self {
        self.delays.insert(command.to_string(), delay);
        self
    }
}

#[async_trait]
impl<H: CommandHandler> CommandHandler for DelayedHandler<H> {
    async fn handle(&self, command: &str, data: &Value) -> HostReply {
        if let Some(delay) = self.delays.get(command) {
            tokio::time::sleep(*delay).await;
        }
        self.inner.handle(command, data).await
    }
}

/// A host with a real (in-memory) file store and fixed device facts.
#[derive(Default)]
pub struct StoringHost {
    files: Mutex<HashMap<String, String>>,
}

impl StoringHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.files.lock().insert(path.to_string(), content.to_string());
        self
    }

    pub fn file(&self, path: &str) -> Option<String> {
        self.files.lock().get(path).cloned()
    }

    fn execute(&self, command: &str, data: &Value) -> HostReply {
        let path = data["path"].as_str().unwrap_or_default().to_string();
        let mut files = self.files.lock();
        match command {
            "fileExists" => HostReply::Data(json!({ "exists": files.contains_key(&path) })),
            "fileRead" => match files.get(&path) {
                Some(content) => HostReply::Data(json!({ "data": content })),
                None => HostReply::Data(json!({ "error": "File not found", "code": 1 })),
            },
            "fileWrite" => {
                let content = data["data"].as_str().unwrap_or_default().to_string();
                let size = content.len();
                files.insert(path, content);
                HostReply::Data(json!({ "success": true, "size": size }))
            }
            "fileDelete" => match files.remove(&path) {
                Some(_) => HostReply::Data(json!({ "success": true })),
                None => HostReply::Error(format!("cannot delete {path}")),
            },
            "directoryRemove" => {
                let prefix = format!("{}/", path.trim_end_matches('/'));
                files.retain(|p, _| !p.starts_with(&prefix));
                HostReply::Data(json!({ "success": true }))
            }
            "getDevicePlatform" => HostReply::Data(json!({ "platform": "Android" })),
            "getDeviceUuid" => HostReply::Data(json!({ "uuid": "mock-uuid" })),
            "getDeviceSerial" => HostReply::Data(json!({ "serial": "mock-serial" })),
            other => HostReply::Error(format!("Unknown command: {other}")),
        }
    }
}

#[async_trait]
impl CommandHandler for StoringHost {
    async fn handle(&self, command: &str, data: &Value) -> HostReply {
        self.execute(command, data)
    }
}

/// A request as seen by the host.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub id: String,
    pub command: String,
    pub data: Value,
}

impl From<&RequestEnvelope> for RecordedRequest {
    fn from(req: &RequestEnvelope) -> Self {
        Self {
            id: req.id.clone(),
            command: req.command.clone(),
            data: req.data.clone(),
        }
    }
}

/// Mock host attached to a channel.
pub struct MockHost {
    channel: Arc<InMemoryChannel>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    bridge_ready_seen: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl MockHost {
    /// Start answering requests on `channel`.
    pub fn spawn<H>(channel: Arc<InMemoryChannel>, handler: H) -> Self
    where
        H: CommandHandler + 'static,
    {
        let handler: Arc<dyn CommandHandler> = Arc::new(handler);
        let requests = Arc::new(Mutex::new(Vec::new()));
        let bridge_ready_seen = Arc::new(AtomicBool::new(false));

        let mut sub = channel.subscribe(FrameFilter::kinds(vec![
            MessageKind::BridgeRequest,
            MessageKind::BridgeReady,
        ]));
        let task = {
            let channel = Arc::clone(&channel);
            let requests = Arc::clone(&requests);
            let bridge_ready_seen = Arc::clone(&bridge_ready_seen);
            tokio::spawn(async move {
                while let Some(frame) = sub.recv().await {
                    match BridgeMessage::from_frame(&frame) {
                        Some(BridgeMessage::BridgeReady) => {
                            bridge_ready_seen.store(true, Ordering::SeqCst);
                        }
                        Some(BridgeMessage::BridgeRequest(req)) => {
                            requests.lock().push(RecordedRequest::from(&req));
                            let handler = Arc::clone(&handler);
                            let channel = Arc::clone(&channel);
                            tokio::spawn(async move {
                                let reply = handler.handle(&req.command, &req.data).await;
                                respond(&channel, &req.id, reply);
                            });
                        }
                        _ => {}
                    }
                }
            })
        };

        Self {
            channel,
            requests,
            bridge_ready_seen,
            task,
        }
    }

    /// Every request received so far, in arrival order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    pub fn commands(&self) -> Vec<String> {
        self.requests.lock().iter().map(|r| r.command.clone()).collect()
    }

    pub fn request_count(&self, command: &str) -> usize {
        self.requests.lock().iter().filter(|r| r.command == command).count()
    }

    pub fn saw_bridge_ready(&self) -> bool {
        self.bridge_ready_seen.load(Ordering::SeqCst)
    }

    /// Announce the platform.
    pub fn send_platform_ready(&self) {
        let _ = self.channel.post(json!({ "type": "PLATFORM_READY" }));
    }

    /// Post a response by hand, e.g. a late or unsolicited one.
    pub fn reply(&self, id: &str, reply: HostReply) {
        respond(&self.channel, id, reply);
    }

    /// Wait until `count` requests have arrived.
    pub async fn wait_for_requests(&self, count: usize) {
        while self.requests.lock().len() < count {
            tokio::task::yield_now().await;
        }
    }
}

impl Drop for MockHost {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn respond(channel: &InMemoryChannel, id: &str, reply: HostReply) {
    let response = match reply {
        HostReply::Data(data) => ResponseEnvelope::success(id, data),
        HostReply::Error(error) => ResponseEnvelope::failure(id, error),
        HostReply::Silence => return,
    };
    if let Ok(frame) = BridgeMessage::BridgeResponse(response).to_frame() {
        let _ = channel.post(frame);
    }
}

/// A started bridge wired to a mock host over one channel.
pub struct TestBridge {
    pub channel: Arc<InMemoryChannel>,
    pub host: MockHost,
    pub bridge: Bridge,
}

impl TestBridge {
    /// Default configuration.
    pub fn start<H>(handler: H) -> Self
    where
        H: CommandHandler + 'static,
    {
        Self::with_config(handler, BridgeConfig::default())
    }

    pub fn with_config<H>(handler: H, config: BridgeConfig) -> Self
    where
        H: CommandHandler + 'static,
    {
        bridge_telemetry::init_test_logging();

        let channel = Arc::new(InMemoryChannel::new());
        let host = MockHost::spawn(Arc::clone(&channel), handler);
        let mut bridge = Bridge::new(config, channel.clone()).expect("valid bridge config");
        bridge.start().expect("bridge starts inside a runtime");
        Self {
            channel,
            host,
            bridge,
        }
    }

    pub fn dispatcher(&self) -> Arc<Dispatcher> {
        self.bridge.dispatcher()
    }
}
