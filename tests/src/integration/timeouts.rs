//! # Deadline Flows
//!
//! Time is paused in these tests; tokio advances it whenever every task is
//! idle, so deadlines fire without real waiting.

#[cfg(test)]
mod tests {
    use crate::mock_host::{DelayedHandler, FnHandler, HostReply, SilentHandler, TestBridge};
    use bridge_core::{BridgeConfig, BridgeError, SendOptions};
    use serde_json::json;
    use std::sync::atomic::Ordering;
    use std::time::Duration;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_silent_host_times_out_after_default() {
        let t = TestBridge::start(SilentHandler);
        let start = Instant::now();

        let err = t.dispatcher().call("getDeviceUuid", json!({})).await.unwrap_err();
        assert!(start.elapsed() >= Duration::from_millis(5000));
        assert_eq!(
            err,
            BridgeError::Timeout {
                command: "getDeviceUuid".into(),
                timeout_ms: 5000
            }
        );
        assert!(err.to_string().contains("getDeviceUuid"));
        assert_eq!(t.dispatcher().pending_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_per_call_timeout_overrides_default() {
        let t = TestBridge::start(SilentHandler);
        let start = Instant::now();
        let err = t
            .dispatcher()
            .send("fileRead", json!({}), SendOptions::with_timeout_ms(250))
            .await
            .unwrap_err();
        assert!(err.is_timeout());
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(250));
        assert!(elapsed < Duration::from_millis(5000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_timeout_waits_forever() {
        let config = BridgeConfig {
            default_timeout_ms: 0,
            ..BridgeConfig::default()
        };
        let handler = DelayedHandler::new(FnHandler::new(|_, _| HostReply::Data(json!("late but fine"))))
            .delay("qrScannerRequest", Duration::from_secs(600));
        let t = TestBridge::with_config(handler, config);

        let reply = t.dispatcher().call("qrScannerRequest", json!({})).await.unwrap();
        assert_eq!(reply, json!("late but fine"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_reply_after_timeout_is_noop() {
        let handler = DelayedHandler::new(FnHandler::new(|_, _| HostReply::Data(json!("too late"))))
            .delay("fileWrite", Duration::from_millis(300));
        let t = TestBridge::start(handler);

        let err = t
            .dispatcher()
            .send("fileWrite", json!({}), SendOptions::with_timeout_ms(100))
            .await
            .unwrap_err();
        assert!(err.is_timeout());

        // Let the delayed reply arrive
        tokio::time::sleep(Duration::from_millis(500)).await;
        let stats = t.bridge.registry();
        assert_eq!(stats.stats().total_timeouts.load(Ordering::Relaxed), 1);
        assert_eq!(stats.stats().total_completed.load(Ordering::Relaxed), 0);
        assert_eq!(stats.stats().total_unmatched.load(Ordering::Relaxed), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reply_before_deadline_cancels_timer() {
        let handler = DelayedHandler::new(FnHandler::new(|_, _| HostReply::Data(json!(1))))
            .delay("keyboardHide", Duration::from_millis(50));
        let t = TestBridge::start(handler);

        let reply = t
            .dispatcher()
            .send("keyboardHide", json!({}), SendOptions::with_timeout_ms(100))
            .await;
        assert_eq!(reply.unwrap(), json!(1));

        tokio::time::sleep(Duration::from_millis(200)).await;
        let registry = t.bridge.registry();
        assert_eq!(registry.stats().total_timeouts.load(Ordering::Relaxed), 0);
        assert_eq!(registry.stats().total_unmatched.load(Ordering::Relaxed), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_after_timeout_uses_fresh_id() {
        let t = TestBridge::start(SilentHandler);
        let dispatcher = t.dispatcher();
        let first = dispatcher.send("getDeviceSerial", json!({}), SendOptions::with_timeout_ms(10));
        let first_id = first.id().clone();
        assert!(first.await.unwrap_err().is_timeout());

        let second = dispatcher.send("getDeviceSerial", json!({}), SendOptions::with_timeout_ms(10));
        assert_ne!(second.id(), &first_id);
        assert!(second.await.unwrap_err().is_timeout());
    }
}
