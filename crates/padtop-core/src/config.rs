//! Poll configuration: which server to watch, how often, how much history.

use std::time::Duration;

use crate::series::DEFAULT_CAPACITY;

/// Default scratchpad server address.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:30000";

/// Metric namespace whose lines the parser keeps.
pub const DEFAULT_NAMESPACE: &str = "scratchpad";

/// Wall-clock period between scrape cycles.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(1000);

/// Per-request timeout for both endpoints.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Everything the scrape client and poll scheduler need to run.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Base URL of the watched server, e.g. `http://127.0.0.1:30000`.
    pub base_url: String,
    /// Namespace prefix selecting exposition lines (without the `:`).
    pub namespace: String,
    /// Period between scrape cycles.
    pub interval: Duration,
    /// Maximum points retained per series.
    pub capacity: usize,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            interval: DEFAULT_INTERVAL,
            capacity: DEFAULT_CAPACITY,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl PollConfig {
    pub fn metrics_url(&self) -> String {
        format!("{}/metrics", self.base_url.trim_end_matches('/'))
    }

    pub fn system_info_url(&self) -> String {
        format!("{}/system_info", self.base_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_points_at_local_scratchpad() {
        let cfg = PollConfig::default();
        assert_eq!(cfg.metrics_url(), "http://127.0.0.1:30000/metrics");
        assert_eq!(cfg.system_info_url(), "http://127.0.0.1:30000/system_info");
        assert_eq!(cfg.namespace, "scratchpad");
        assert_eq!(cfg.capacity, DEFAULT_CAPACITY);
    }

    #[test]
    fn url_join_tolerates_trailing_slash() {
        let cfg = PollConfig {
            base_url: "http://10.0.0.5:30000/".to_string(),
            ..Default::default()
        };
        assert_eq!(cfg.metrics_url(), "http://10.0.0.5:30000/metrics");
        assert_eq!(cfg.system_info_url(), "http://10.0.0.5:30000/system_info");
    }
}
