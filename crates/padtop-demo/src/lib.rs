//! Synthetic scratchpad endpoints.
//!
//! Serves `/metrics` and `/system_info` with plausible, slowly drifting
//! values so the dashboard can be exercised without a live inference server.
//! Each `/metrics` request advances a bounded random walk, which makes the
//! charts move at whatever rate the dashboard polls.

use std::fmt::Write as _;
use std::sync::Arc;

use axum::{Router, extract::State, response::Json, routing::get};
use rand::Rng;
use tokio::sync::Mutex;

use padtop_core::DEFAULT_NAMESPACE;

/// Shared server state.
struct AppState {
    engine: Mutex<DemoEngine>,
}

/// Bounded random walk over the watched scratchpad metrics.
struct DemoEngine {
    num_requests_running: f64,
    num_requests_waiting: f64,
    num_used_tokens: f64,
    mempool_usage_percent: f64,
    gen_throughput: f64,
    cache_hit_rate: f64,
    scrape_total: u64,
}

impl DemoEngine {
    fn new() -> Self {
        Self {
            num_requests_running: 2.0,
            num_requests_waiting: 0.0,
            num_used_tokens: 4096.0,
            mempool_usage_percent: 35.0,
            gen_throughput: 150.0,
            cache_hit_rate: 0.9,
            scrape_total: 0,
        }
    }

    /// Advance every metric one step, keeping each in its plausible range.
    fn step(&mut self) {
        let mut rng = rand::rng();
        self.num_requests_running =
            (self.num_requests_running + rng.random_range(-1.0..=1.0)).round().clamp(0.0, 64.0);
        self.num_requests_waiting =
            (self.num_requests_waiting + rng.random_range(-2.0..=2.0)).round().clamp(0.0, 128.0);
        self.num_used_tokens =
            (self.num_used_tokens + rng.random_range(-512.0..=512.0)).round().max(0.0);
        self.mempool_usage_percent =
            (self.mempool_usage_percent + rng.random_range(-3.0..=3.0)).clamp(0.0, 100.0);
        self.gen_throughput =
            (self.gen_throughput + rng.random_range(-15.0..=15.0)).clamp(0.0, 400.0);
        self.cache_hit_rate =
            (self.cache_hit_rate + rng.random_range(-0.05..=0.05)).clamp(0.0, 1.0);
        self.scrape_total += 1;
    }

    /// Render the exposition body.
    ///
    /// Includes a comment line, labeled and bare sample lines, and a
    /// foreign-namespace line, the same mix a real exporter produces.
    fn render_exposition(&self) -> String {
        let ns = DEFAULT_NAMESPACE;
        let mut out = String::new();
        let _ = writeln!(out, "# {ns} demo metrics");
        let _ = writeln!(
            out,
            "{ns}:num_requests_running{{engine=\"demo\"}} {:.0}",
            self.num_requests_running
        );
        let _ = writeln!(
            out,
            "{ns}:num_requests_waiting{{engine=\"demo\"}} {:.0}",
            self.num_requests_waiting
        );
        let _ = writeln!(out, "{ns}:num_used_tokens {:.0}", self.num_used_tokens);
        let _ = writeln!(
            out,
            "{ns}:mempool_usage_percent {:.1}",
            self.mempool_usage_percent
        );
        let _ = writeln!(out, "{ns}:gen_throughput {:.1}", self.gen_throughput);
        let _ = writeln!(out, "{ns}:cache_hit_rate {:.3}", self.cache_hit_rate);
        let _ = writeln!(out, "demo:scrape_total {}", self.scrape_total);
        out
    }

    fn system_info(&self) -> serde_json::Value {
        serde_json::json!({
            "system_info": {
                "model_path": "demo/llama-3-8b-instruct",
                "tokenizer_path": "demo/llama-3-8b-instruct",
                "chat_template": null,
                "tp_size": 1,
                "mem_fraction_static": 0.88,
                "context_length": 8192,
                "engine": {
                    "schedule_policy": "lpm",
                    "version": env!("CARGO_PKG_VERSION"),
                },
            }
        })
    }
}

async fn handle_metrics(State(state): State<Arc<AppState>>) -> String {
    let mut engine = state.engine.lock().await;
    engine.step();
    engine.render_exposition()
}

async fn handle_system_info(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let engine = state.engine.lock().await;
    Json(engine.system_info())
}

/// Build the axum router.
pub fn build_router() -> Router {
    let state = Arc::new(AppState {
        engine: Mutex::new(DemoEngine::new()),
    });

    Router::new()
        .route("/metrics", get(handle_metrics))
        .route("/system_info", get(handle_system_info))
        .with_state(state)
}

/// Run the demo server until the process ends.
pub async fn run_server(host: &str, port: u16) -> std::io::Result<()> {
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, build_router()).await
}
