//! # Correlation Flows
//!
//! Many requests in flight over one channel, answered in arbitrary order.

#[cfg(test)]
mod tests {
    use bridge_channel::MessagePort;
    use crate::mock_host::{DelayedHandler, FnHandler, HostReply, SilentHandler, TestBridge};
    use bridge_core::{BridgeError, RequestId, SendOptions};
    use serde_json::{json, Value};
    use std::collections::HashSet;
    use std::sync::atomic::Ordering;
    use std::time::Duration;
    use tokio::time::timeout;

    fn echo(command: &str, data: &Value) -> HostReply {
        HostReply::Data(json!({ "command": command, "n": data["n"] }))
    }

    #[tokio::test]
    async fn test_concurrent_requests_get_their_own_replies() {
        let t = TestBridge::start(FnHandler::new(echo));
        let dispatcher = t.dispatcher();

        let replies: Vec<_> = (0..50)
            .map(|n| dispatcher.send("echo", json!({ "n": n }), SendOptions::default()))
            .collect();
        let ids: HashSet<String> = replies.iter().map(|r| r.id().to_string()).collect();
        assert_eq!(ids.len(), 50);

        let results = timeout(Duration::from_secs(5), futures::future::join_all(replies))
            .await
            .expect("all replies arrive");
        for (n, result) in results.into_iter().enumerate() {
            assert_eq!(result.unwrap(), json!({ "command": "echo", "n": n }));
        }
        assert_eq!(dispatcher.pending_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_replies_in_reverse_order() {
        let handler = DelayedHandler::new(FnHandler::new(echo)).delay("slow", Duration::from_millis(200));
        let t = TestBridge::start(handler);
        let dispatcher = t.dispatcher();

        let slow = dispatcher.send("slow", json!({ "n": 1 }), SendOptions::default());
        let fast = dispatcher.send("fast", json!({ "n": 2 }), SendOptions::default());

        // The fast reply lands while the slow one is still pending
        assert_eq!(fast.await.unwrap()["command"], "fast");
        assert_eq!(dispatcher.pending_count(), 1);
        assert_eq!(slow.await.unwrap()["command"], "slow");
    }

    #[tokio::test]
    async fn test_host_error_is_verbatim() {
        let t = TestBridge::start(FnHandler::new(|_, _| HostReply::Error("Permission denied".into())));
        let err = t.dispatcher().call("keyboardShow", json!({})).await.unwrap_err();
        assert_eq!(err, BridgeError::Host("Permission denied".into()));
        assert_eq!(err.to_string(), "Permission denied");
    }

    #[tokio::test]
    async fn test_envelope_shape_on_the_wire() {
        let t = TestBridge::start(FnHandler::new(echo));
        t.dispatcher().call("fileExists", json!({ "path": "/a.txt" })).await.unwrap();

        let requests = t.host.requests();
        assert_eq!(requests.len(), 1);
        let id = RequestId::from(requests[0].id.as_str());
        assert!(id.as_str().starts_with("req_"));
        assert!(id.timestamp_ms().is_some());
        assert_eq!(id.sequence(), Some(1));
        assert_eq!(requests[0].data, json!({ "path": "/a.txt" }));
    }

    #[tokio::test]
    async fn test_unknown_and_duplicate_replies_are_ignored() {
        let t = TestBridge::start(SilentHandler);
        let dispatcher = t.dispatcher();
        let reply = dispatcher.send("getAppVersion", json!({}), SendOptions::no_timeout());
        t.host.wait_for_requests(1).await;
        let id = t.host.requests()[0].id.clone();

        t.host.reply("req_0_999", HostReply::Data(json!("stray")));
        t.host.reply(&id, HostReply::Data(json!("first")));
        t.host.reply(&id, HostReply::Data(json!("second")));

        assert_eq!(reply.await.unwrap(), json!("first"));

        // Let the router drain the stray and duplicate frames
        let registry = t.bridge.registry();
        timeout(Duration::from_secs(1), async {
            while registry.stats().total_unmatched.load(Ordering::Relaxed) < 2 {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("stray replies counted");
        assert_eq!(registry.stats().total_completed.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_foreign_traffic_does_not_disturb_pending_requests() {
        let t = TestBridge::start(SilentHandler);
        let reply = t.dispatcher().send("exitApp", json!({}), SendOptions::no_timeout());
        t.host.wait_for_requests(1).await;
        let id = t.host.requests()[0].id.clone();

        t.channel.post(json!({ "type": "SOMETHING_ELSE", "id": id })).unwrap();
        t.channel.post(json!("hello")).unwrap();
        t.channel.post(json!({ "id": id, "data": "no type" })).unwrap();
        tokio::task::yield_now().await;
        assert_eq!(t.dispatcher().pending_count(), 1);

        t.host.reply(&id, HostReply::Data(json!(true)));
        assert_eq!(reply.await.unwrap(), json!(true));
    }
}
