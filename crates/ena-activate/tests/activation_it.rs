//! End-to-end activation tests against a mock control plane.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::watch;

use ena_activate::{
    completion_channel, ActivateError, ActivationClient, ActivationController, CompletionListener,
    FingerprintCollector,
};
use ena_config::{
    sync_config_pair, AgentConfig, BatchIdentity, CloudConfig, FingerprintConfig,
    FingerprintProof, SyncConfigReader,
};
use ena_testkit::{fixtures, init_test_tracing, CountingCollector, FailingCollector, MockControlPlane};

const ACTIVE_URL: &str = "/v1/active";

fn agent_config(address: String, interval: Duration) -> AgentConfig {
    AgentConfig {
        batch: BatchIdentity {
            name: "batch-1".into(),
            namespace: "ns1".into(),
            security_type: "token".into(),
            security_key: "secret".into(),
        },
        cloud: CloudConfig {
            address,
            active_url: ACTIVE_URL.into(),
            interval,
            timeout: Duration::from_secs(5),
        },
        fingerprint: FingerprintConfig {
            proof: FingerprintProof::Input,
            value: "dev-123".into(),
        },
        attrs: HashMap::new(),
    }
}

struct Harness {
    controller: ActivationController,
    reader: SyncConfigReader,
    listener: CompletionListener,
}

fn harness(
    config: &AgentConfig,
    collector: Box<dyn FingerprintCollector>,
) -> Harness {
    let (writer, reader) = sync_config_pair();
    let (signal, listener) = completion_channel();
    let client = ActivationClient::new(&config.cloud).unwrap();
    let controller = ActivationController::new(config, client, collector, writer, signal);
    Harness {
        controller,
        reader,
        listener,
    }
}

async fn wait_for_requests(cloud: &MockControlPlane, n: usize) {
    for _ in 0..250 {
        if cloud.request_count().await >= n {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("mock control plane never saw {n} requests");
}

#[tokio::test]
async fn successful_activation_populates_sync_config_and_signals_once() {
    init_test_tracing();
    let cloud = MockControlPlane::start().await;
    cloud
        .expect_activation(ACTIVE_URL, fixtures::activation_response("node-7", "ns1"))
        .await;

    let config = agent_config(cloud.base_url(), Duration::from_secs(30));
    let mut h = harness(&config, Box::new(CountingCollector::new("dev-123")));

    h.controller.activate_once().await.unwrap();

    let sync = h.reader.snapshot().unwrap();
    assert_eq!(sync.node.name, "node-7");
    assert_eq!(sync.node.namespace, "ns1");
    assert_eq!(sync.cloud_http.ca, "CA");
    assert_eq!(sync.cloud_http.cert, "CERT");
    assert_eq!(sync.cloud_http.key, "KEY");
    assert_eq!(sync.cloud_http.name, "bundle-1");

    assert!(h.listener.try_consume());
    assert!(!h.listener.try_consume());
}

#[tokio::test]
async fn request_body_carries_batch_identity_and_fingerprint() {
    let cloud = MockControlPlane::start().await;
    cloud
        .expect_activation(ACTIVE_URL, fixtures::activation_response("node-7", "ns1"))
        .await;

    let mut config = agent_config(cloud.base_url(), Duration::from_secs(30));
    config
        .attrs
        .insert("site".to_string(), "plant-7".to_string());
    let mut h = harness(&config, Box::new(CountingCollector::new("dev-123")));

    h.controller.activate_once().await.unwrap();

    let requests = cloud.received_requests().await;
    assert_eq!(requests.len(), 1);
    let content_type = requests[0]
        .headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert_eq!(content_type, "application/json");

    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["batchName"], "batch-1");
    assert_eq!(body["namespace"], "ns1");
    assert_eq!(body["securityType"], "token");
    assert_eq!(body["securityValue"], "secret");
    assert_eq!(body["fingerprintValue"], "dev-123");
    assert_eq!(body["penetrateData"]["site"], "plant-7");
}

#[tokio::test]
async fn server_error_leaves_state_untouched() {
    let cloud = MockControlPlane::start().await;
    cloud.expect_activation_error(ACTIVE_URL, 500).await;

    let config = agent_config(cloud.base_url(), Duration::from_secs(30));
    let mut h = harness(&config, Box::new(CountingCollector::new("dev-123")));

    let err = h.controller.activate_once().await.unwrap_err();
    assert!(matches!(err, ActivateError::Endpoint { status: 500, .. }));
    assert!(h.reader.snapshot().is_none());
    assert!(!h.listener.try_consume());
}

#[tokio::test]
async fn malformed_response_leaves_state_untouched() {
    let cloud = MockControlPlane::start().await;
    cloud.expect_activation_garbage(ACTIVE_URL).await;

    let config = agent_config(cloud.base_url(), Duration::from_secs(30));
    let mut h = harness(&config, Box::new(CountingCollector::new("dev-123")));

    let err = h.controller.activate_once().await.unwrap_err();
    assert!(matches!(err, ActivateError::Parse(_)));
    assert!(h.reader.snapshot().is_none());
    assert!(!h.listener.try_consume());
}

#[tokio::test]
async fn fingerprint_failure_sends_no_request() {
    let cloud = MockControlPlane::start().await;
    cloud
        .expect_activation(ACTIVE_URL, fixtures::activation_response("node-7", "ns1"))
        .await;

    let config = agent_config(cloud.base_url(), Duration::from_secs(30));
    let collector = FailingCollector::new();
    let mut h = harness(&config, Box::new(collector.clone()));

    let err = h.controller.activate_once().await.unwrap_err();
    assert!(matches!(err, ActivateError::Fingerprint(_)));
    assert_eq!(collector.calls(), 1);
    assert_eq!(cloud.request_count().await, 0);
    assert!(h.reader.snapshot().is_none());
    assert!(!h.listener.try_consume());
}

#[tokio::test]
async fn loop_retries_until_cloud_recovers() {
    init_test_tracing();
    let cloud = MockControlPlane::start().await;
    cloud
        .fail_then_succeed(ACTIVE_URL, 3, fixtures::activation_response("node-7", "ns1"))
        .await;

    let config = agent_config(cloud.base_url(), Duration::from_millis(50));
    let collector = CountingCollector::new("dev-123");
    let mut h = harness(&config, Box::new(collector.clone()));
    let (_shutdown_tx, shutdown_rx) = watch::channel(false);

    let task = tokio::spawn(h.controller.run(shutdown_rx));

    // Success terminates the loop on its own.
    tokio::time::timeout(Duration::from_secs(10), task)
        .await
        .expect("activation loop should stop after success")
        .unwrap();

    // Three failed attempts plus the one that succeeded, each with a
    // freshly collected fingerprint.
    assert_eq!(cloud.request_count().await, 4);
    assert_eq!(collector.calls(), 4);

    let sync = h.reader.snapshot().unwrap();
    assert_eq!(sync.node.name, "node-7");
    assert!(h.listener.wait().await);
}

#[tokio::test]
async fn shutdown_during_timer_wait_stops_the_loop() {
    let cloud = MockControlPlane::start().await;
    cloud.expect_activation_error(ACTIVE_URL, 500).await;

    // Interval long enough that the loop parks on its timer after the
    // first attempt.
    let config = agent_config(cloud.base_url(), Duration::from_secs(60));
    let mut h = harness(&config, Box::new(CountingCollector::new("dev-123")));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let task = tokio::spawn(h.controller.run(shutdown_rx));
    wait_for_requests(&cloud, 1).await;

    shutdown_tx.send(true).unwrap();
    tokio::time::timeout(Duration::from_secs(5), task)
        .await
        .expect("activation loop should observe shutdown promptly")
        .unwrap();

    // No further attempt was started after shutdown.
    assert_eq!(cloud.request_count().await, 1);
    assert!(h.reader.snapshot().is_none());
    assert!(!h.listener.try_consume());
}

#[tokio::test]
async fn shutdown_before_start_suppresses_all_attempts() {
    let cloud = MockControlPlane::start().await;
    cloud
        .expect_activation(ACTIVE_URL, fixtures::activation_response("node-7", "ns1"))
        .await;

    let config = agent_config(cloud.base_url(), Duration::from_millis(50));
    let h = harness(&config, Box::new(CountingCollector::new("dev-123")));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    shutdown_tx.send(true).unwrap();

    tokio::time::timeout(Duration::from_secs(5), h.controller.run(shutdown_rx))
        .await
        .expect("loop should exit without attempting");

    assert_eq!(cloud.request_count().await, 0);
}

#[tokio::test]
async fn repeated_success_overwrites_the_whole_config() {
    let cloud = MockControlPlane::start().await;
    // First grant names node-7; the re-activation grant names node-8.
    wiremock::Mock::given(wiremock::matchers::method("POST"))
        .and(wiremock::matchers::path(ACTIVE_URL))
        .respond_with(
            wiremock::ResponseTemplate::new(200)
                .set_body_json(fixtures::activation_response("node-7", "ns1")),
        )
        .up_to_n_times(1)
        .mount(cloud.inner())
        .await;
    cloud
        .expect_activation(ACTIVE_URL, fixtures::activation_response("node-8", "ns2"))
        .await;

    let config = agent_config(cloud.base_url(), Duration::from_secs(30));
    let mut h = harness(&config, Box::new(CountingCollector::new("dev-123")));

    h.controller.activate_once().await.unwrap();
    assert_eq!(h.reader.snapshot().unwrap().node.name, "node-7");

    h.controller.activate_once().await.unwrap();

    let sync = h.reader.snapshot().unwrap();
    assert_eq!(sync.node.name, "node-8");
    assert_eq!(sync.node.namespace, "ns2");

    // The capacity-one signal absorbed the second success.
    assert!(h.listener.try_consume());
    assert!(!h.listener.try_consume());
}
