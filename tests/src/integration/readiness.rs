//! # Readiness Flows
//!
//! BRIDGE_READY → PLATFORM_READY → device queries → ready event.

#[cfg(test)]
mod tests {
    use crate::mock_host::{DelayedHandler, FnHandler, HostReply, SilentHandler, StoringHost, TestBridge};
    use bridge_core::{BridgeConfig, DeviceInfo};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;

    async fn wait_for_bridge_ready(t: &TestBridge) {
        timeout(Duration::from_secs(1), async {
            while !t.host.saw_bridge_ready() {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("host sees BRIDGE_READY");
    }

    #[tokio::test]
    async fn test_full_handshake() {
        let t = TestBridge::start(StoringHost::new());
        wait_for_bridge_ready(&t).await;
        let readiness = t.bridge.readiness();
        assert!(!readiness.is_ready());

        t.host.send_platform_ready();
        let device = timeout(Duration::from_secs(1), readiness.wait_ready())
            .await
            .expect("ready fires");

        assert_eq!(device.platform, "Android");
        assert_eq!(device.uuid, "mock-uuid");
        assert_eq!(device.serial, "mock-serial");
        assert_eq!(device.cordova, "12.0.0-postmessage-bridge");

        let mut commands = t.host.commands();
        commands.sort();
        assert_eq!(commands, ["getDevicePlatform", "getDeviceSerial", "getDeviceUuid"]);
        for request in t.host.requests() {
            assert_eq!(request.data, json!({}));
        }
    }

    #[tokio::test]
    async fn test_listeners_before_and_after_ready_run_once() {
        let t = TestBridge::start(StoringHost::new());
        let readiness = t.bridge.readiness();
        let calls = Arc::new(AtomicUsize::new(0));

        let early = Arc::clone(&calls);
        readiness.on_ready(move |_| {
            early.fetch_add(1, Ordering::SeqCst);
        });

        t.host.send_platform_ready();
        timeout(Duration::from_secs(1), readiness.wait_ready()).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let (tx, rx) = tokio::sync::oneshot::channel();
        readiness.on_ready(move |device: DeviceInfo| {
            let _ = tx.send(device.uuid);
        });
        assert_eq!(rx.await.unwrap(), "mock-uuid");

        // A second platform signal changes nothing
        t.host.send_platform_ready();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(t.host.request_count("getDevicePlatform"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_silent_host_falls_back() {
        let config = BridgeConfig {
            default_timeout_ms: 100,
            ..BridgeConfig::default()
        };
        let t = TestBridge::with_config(SilentHandler, config);
        t.host.send_platform_ready();

        let device = t.bridge.readiness().wait_ready().await;
        assert_eq!(device, DeviceInfo::fallback());
    }

    #[tokio::test]
    async fn test_one_failed_query_falls_back_entirely() {
        let t = TestBridge::start(FnHandler::new(|command, _| match command {
            "getDeviceUuid" => HostReply::Error("no uuid".into()),
            _ => HostReply::Data(json!("iOS")),
        }));
        t.host.send_platform_ready();

        let device = timeout(Duration::from_secs(1), t.bridge.readiness().wait_ready())
            .await
            .unwrap();
        assert_eq!(device.platform, "Android");
        assert_eq!(device.uuid, "unknown");
    }

    #[tokio::test(start_paused = true)]
    async fn test_device_queries_run_concurrently() {
        let handler = DelayedHandler::new(StoringHost::new())
            .delay("getDevicePlatform", Duration::from_millis(400))
            .delay("getDeviceUuid", Duration::from_millis(400))
            .delay("getDeviceSerial", Duration::from_millis(400));
        let t = TestBridge::start(handler);
        let start = tokio::time::Instant::now();
        t.host.send_platform_ready();

        let device = t.bridge.readiness().wait_ready().await;
        assert_eq!(device.serial, "mock-serial");
        assert!(start.elapsed() < Duration::from_millis(1200));
    }
}
