//! HTTP access to the two watched endpoints.

use reqwest::Client;

use crate::config::PollConfig;
use crate::system::SystemInfoSnapshot;

/// Why one fetch cycle produced nothing.
///
/// Every variant is scoped to a single cycle; the scheduler's fixed interval
/// is the retry mechanism.
#[derive(Debug, thiserror::Error)]
pub enum PollError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("system info body is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Thin wrapper over `reqwest::Client` bound to one server's endpoints.
#[derive(Debug, Clone)]
pub struct ScrapeClient {
    http: Client,
    metrics_url: String,
    system_info_url: String,
}

impl ScrapeClient {
    pub fn new(config: &PollConfig) -> Result<Self, PollError> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            metrics_url: config.metrics_url(),
            system_info_url: config.system_info_url(),
        })
    }

    pub fn metrics_url(&self) -> &str {
        &self.metrics_url
    }

    pub fn system_info_url(&self) -> &str {
        &self.system_info_url
    }

    /// Fetch the raw exposition body.
    pub async fn fetch_metrics(&self) -> Result<String, PollError> {
        let body = self.get_text(&self.metrics_url).await?;
        Ok(body)
    }

    /// Fetch and decode one system-info snapshot.
    pub async fn fetch_system_info(&self) -> Result<SystemInfoSnapshot, PollError> {
        let body = self.get_text(&self.system_info_url).await?;
        Ok(SystemInfoSnapshot::from_json(&body)?)
    }

    async fn get_text(&self, url: &str) -> Result<String, PollError> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PollError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.text().await?)
    }
}
