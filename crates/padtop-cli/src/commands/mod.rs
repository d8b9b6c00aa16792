pub mod demo;
pub mod info;
pub mod scrape;
pub mod watch;

use std::time::Duration;

use padtop_core::PollConfig;

/// Build one `PollConfig` from the shared CLI flags.
pub fn poll_config(url: &str, namespace: &str, interval_ms: u64, history: usize) -> PollConfig {
    PollConfig {
        base_url: url.to_string(),
        namespace: namespace.to_string(),
        interval: Duration::from_millis(interval_ms.max(1)),
        capacity: history.max(1),
        ..Default::default()
    }
}

/// One-shot commands share a runtime built on demand.
pub fn runtime() -> tokio::runtime::Runtime {
    match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("failed to start async runtime: {e}");
            std::process::exit(1);
        }
    }
}
