//! End-to-end poll cycles against a stubbed scratchpad server.

use std::time::Duration;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use padtop_core::{PollConfig, PollError, Poller, WATCHED_METRICS, shared_dashboard};

fn config_for(server: &MockServer) -> PollConfig {
    PollConfig {
        base_url: server.uri(),
        interval: Duration::from_millis(50),
        timeout: Duration::from_secs(2),
        ..Default::default()
    }
}

fn poller_for(server: &MockServer) -> Poller {
    let config = config_for(server);
    let shared = shared_dashboard(config.capacity);
    Poller::new(&config, shared).expect("client builds")
}

/// Exposition body covering every watched metric, plus lines the parser
/// must skip or drop.
fn full_metrics_body() -> String {
    "\
# HELP scratchpad:num_requests_running Requests currently scheduled.\n\
scratchpad:num_requests_running{engine=\"0\"} 4\n\
scratchpad:num_requests_waiting{} 3\n\
scratchpad:num_used_tokens 5120\n\
scratchpad:mempool_usage_percent 42.5\n\
scratchpad:gen_throughput 187.4\n\
scratchpad:cache_hit_rate 0.93\n\
scratchpad:uncharted_extra 1\n\
scratchpad:bad_metric notanumber\n\
process:cpu_seconds_total 9.0\n"
        .to_string()
}

async fn mount_metrics(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/metrics"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body.to_string()))
        .mount(server)
        .await;
}

async fn mount_system_info(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/system_info"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(body.to_string(), "application/json"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn first_cycle_appends_one_point_per_watched_metric() {
    let server = MockServer::start().await;
    mount_metrics(&server, &full_metrics_body()).await;

    let poller = poller_for(&server);
    let stats = poller.run_metrics_cycle().await.expect("cycle succeeds");

    assert_eq!(stats.appended, WATCHED_METRICS.len());
    assert_eq!(stats.unregistered, 1);

    let state = poller.shared().lock().unwrap();
    for info in &WATCHED_METRICS {
        assert_eq!(state.registry.get(info.name).unwrap().len(), 1, "{}", info.name);
    }
    assert_eq!(state.cycle_count, 1);
    assert_eq!(state.unparseable_total, 1);
    assert_eq!(state.unregistered_total, 1);
    assert!(state.last_scrape_error.is_none());

    let mempool = state.registry.get("mempool_usage_percent").unwrap();
    assert_eq!(mempool.latest().unwrap().value, 42.5);
}

#[tokio::test]
async fn scrape_omitting_a_metric_keeps_that_history_unchanged() {
    let server = MockServer::start().await;
    mount_metrics(&server, &full_metrics_body()).await;

    let poller = poller_for(&server);
    poller.run_metrics_cycle().await.expect("first cycle");

    // Second scrape no longer reports gen_throughput.
    let trimmed: String = full_metrics_body()
        .lines()
        .filter(|l| !l.contains("gen_throughput"))
        .map(|l| format!("{l}\n"))
        .collect();
    server.reset().await;
    mount_metrics(&server, &trimmed).await;

    poller.run_metrics_cycle().await.expect("second cycle");

    let state = poller.shared().lock().unwrap();
    assert_eq!(state.registry.get("gen_throughput").unwrap().len(), 1);
    assert_eq!(state.registry.get("num_requests_waiting").unwrap().len(), 2);
    assert_eq!(state.cycle_count, 2);
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let config = PollConfig {
        // Port 1 is essentially never listening; connect fails fast.
        base_url: "http://127.0.0.1:1".to_string(),
        timeout: Duration::from_secs(2),
        ..Default::default()
    };
    let shared = shared_dashboard(config.capacity);
    let poller = Poller::new(&config, shared.clone()).unwrap();

    let err = poller.run_metrics_cycle().await.expect_err("no listener");
    assert!(matches!(err, PollError::Transport(_)));

    let state = shared.lock().unwrap();
    assert!(state.last_scrape_error.is_some());
    assert_eq!(state.cycle_count, 0);
}

#[tokio::test]
async fn failed_scrape_records_error_and_preserves_series() {
    let server = MockServer::start().await;
    mount_metrics(&server, &full_metrics_body()).await;

    let poller = poller_for(&server);
    poller.run_metrics_cycle().await.expect("seed cycle");

    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/metrics"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = poller.run_metrics_cycle().await.expect_err("cycle fails");
    assert!(matches!(err, PollError::Status { status: 503, .. }));

    {
        let state = poller.shared().lock().unwrap();
        assert!(state.last_scrape_error.as_deref().unwrap().contains("503"));
        // Failed cycle neither appends nor counts as a completed scrape.
        assert_eq!(state.cycle_count, 1);
        assert_eq!(state.registry.get("num_requests_running").unwrap().len(), 1);
    }

    // The next good scrape clears the error: the interval is the retry.
    server.reset().await;
    mount_metrics(&server, &full_metrics_body()).await;
    poller.run_metrics_cycle().await.expect("recovered cycle");

    let state = poller.shared().lock().unwrap();
    assert!(state.last_scrape_error.is_none());
    assert_eq!(state.cycle_count, 2);
    assert_eq!(state.registry.get("num_requests_running").unwrap().len(), 2);
}

#[tokio::test]
async fn system_info_failure_keeps_previous_snapshot() {
    let server = MockServer::start().await;
    mount_system_info(
        &server,
        r#"{"system_info": {"model_path": "llama-3-8b", "chat_template": null, "tp_size": 2}}"#,
    )
    .await;

    let poller = poller_for(&server);
    poller.run_system_info_cycle().await.expect("first fetch");

    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/system_info"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    poller
        .run_system_info_cycle()
        .await
        .expect_err("second fetch fails");

    let state = poller.shared().lock().unwrap();
    let snapshot = state.system_info.as_ref().expect("snapshot survives");
    assert_eq!(snapshot.len(), 3);
    assert_eq!(
        snapshot.properties["model_path"],
        serde_json::Value::String("llama-3-8b".into())
    );
    assert!(state.last_info_error.as_deref().unwrap().contains("404"));
}

#[tokio::test]
async fn malformed_system_info_body_is_a_decode_error() {
    let server = MockServer::start().await;
    mount_system_info(&server, "{\"nope\": 1}").await;

    let poller = poller_for(&server);
    let err = poller
        .run_system_info_cycle()
        .await
        .expect_err("envelope mismatch");
    assert!(matches!(err, PollError::Decode(_)));
    assert!(poller.shared().lock().unwrap().system_info.is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn run_loop_scrapes_at_startup_and_stops_on_signal() {
    let server = MockServer::start().await;
    mount_metrics(&server, &full_metrics_body()).await;
    mount_system_info(&server, r#"{"system_info": {"tp_size": 1}}"#).await;

    let config = config_for(&server);
    let shared = shared_dashboard(config.capacity);
    let poller = Poller::new(&config, shared.clone()).unwrap();

    let (stop_tx, stop_rx) = tokio::sync::watch::channel(false);
    let handle = tokio::spawn(poller.run(stop_rx));

    tokio::time::sleep(Duration::from_millis(300)).await;
    {
        let state = shared.lock().unwrap();
        assert!(state.cycle_count >= 2, "got {} cycles", state.cycle_count);
        assert!(state.system_info.is_some());
    }

    stop_tx.send(true).unwrap();
    tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .expect("loop exits after stop")
        .unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn paused_loop_skips_metric_cycles() {
    let server = MockServer::start().await;
    mount_metrics(&server, &full_metrics_body()).await;
    mount_system_info(&server, r#"{"system_info": {}}"#).await;

    let config = config_for(&server);
    let shared = shared_dashboard(config.capacity);
    shared.lock().unwrap().paused = true;
    let poller = Poller::new(&config, shared.clone()).unwrap();

    let (stop_tx, stop_rx) = tokio::sync::watch::channel(false);
    let handle = tokio::spawn(poller.run(stop_rx));

    tokio::time::sleep(Duration::from_millis(250)).await;
    assert_eq!(shared.lock().unwrap().cycle_count, 0);

    stop_tx.send(true).unwrap();
    let _ = tokio::time::timeout(Duration::from_secs(1), handle).await;
}
