//! Bridge context - owns the registry, dispatcher, router and readiness state
//! of one channel.

use crate::dispatcher::Dispatcher;
use crate::domain::config::BridgeConfig;
use crate::domain::error::BridgeError;
use crate::domain::pending::RequestRegistry;
use crate::ports::{SystemTimeSource, TimeSource};
use crate::readiness::{Readiness, ReadinessHandshake};
use crate::router::ResponseRouter;
use bridge_channel::{BridgeMessage, FrameFilter, MessageKind, MessagePort};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::info;

/// One bridge instance bound to one channel.
pub struct Bridge {
    config: BridgeConfig,
    port: Arc<dyn MessagePort>,
    registry: Arc<RequestRegistry>,
    dispatcher: Arc<Dispatcher>,
    readiness: Readiness,
    tasks: Vec<JoinHandle<()>>,
}

impl Bridge {
    /// Create a bridge over `port`.
    pub fn new(config: BridgeConfig, port: Arc<dyn MessagePort>) -> Result<Self, BridgeError> {
        Self::with_time_source(config, port, Arc::new(SystemTimeSource))
    }

    /// Create a bridge with an injected clock.
    pub fn with_time_source(
        config: BridgeConfig,
        port: Arc<dyn MessagePort>,
        clock: Arc<dyn TimeSource>,
    ) -> Result<Self, BridgeError> {
        config.validate()?;

        let registry = Arc::new(RequestRegistry::new());
        let dispatcher = Arc::new(Dispatcher::new(
            Arc::clone(&registry),
            Arc::clone(&port),
            clock,
            config.clone(),
        ));

        Ok(Self {
            config,
            port,
            registry,
            dispatcher,
            readiness: Readiness::new(),
            tasks: Vec::new(),
        })
    }

    /// Start listening and announce the bridge to the host.
    ///
    /// Subscriptions are taken before `BRIDGE_READY` is posted so no reply
    /// can slip past the router. Calling `start` twice is a no-op.
    pub fn start(&mut self) -> Result<(), BridgeError> {
        if !self.tasks.is_empty() {
            return Ok(());
        }
        let runtime = Handle::try_current().map_err(|e| BridgeError::NoRuntime(e.to_string()))?;

        let responses = self.port.subscribe(FrameFilter::only(MessageKind::BridgeResponse));
        let platform = self.port.subscribe(FrameFilter::only(MessageKind::PlatformReady));

        let router = ResponseRouter::new(Arc::clone(&self.registry), self.config.debug_logging);
        self.tasks.push(runtime.spawn(router.run(responses)));

        let handshake = ReadinessHandshake::new(Arc::clone(&self.dispatcher), self.readiness.clone());
        self.tasks.push(runtime.spawn(handshake.run(platform)));

        self.port.post_message(&BridgeMessage::BridgeReady)?;
        info!(
            timeout_ms = self.config.default_timeout_ms,
            debug_logging = self.config.debug_logging,
            "Bridge started"
        );
        Ok(())
    }

    /// Stop the router and handshake tasks. Pending requests still settle
    /// through their deadlines.
    pub fn shutdown(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
        info!(pending = self.registry.pending_count(), "Bridge stopped");
    }

    pub fn is_running(&self) -> bool {
        !self.tasks.is_empty()
    }

    pub fn dispatcher(&self) -> Arc<Dispatcher> {
        Arc::clone(&self.dispatcher)
    }

    pub fn readiness(&self) -> Readiness {
        self.readiness.clone()
    }

    pub fn registry(&self) -> Arc<RequestRegistry> {
        Arc::clone(&self.registry)
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }
}

impl Drop for Bridge {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}
