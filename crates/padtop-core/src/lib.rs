//! # padtop-core
//!
//! Scrape-and-chart engine for the padtop dashboard.
//!
//! A scratchpad inference server exposes `GET /metrics` (line-oriented text
//! exposition, namespaced `scratchpad:`) and `GET /system_info` (a JSON
//! snapshot). This crate polls both, parses the exposition text into typed
//! samples, and maintains a bounded sliding-window history per watched
//! metric for a renderer to chart.
//!
//! ## Quick start
//!
//! ```no_run
//! use padtop_core::{PollConfig, Poller, shared_dashboard};
//!
//! # async fn demo() -> Result<(), padtop_core::PollError> {
//! let config = PollConfig::default();
//! let shared = shared_dashboard(config.capacity);
//! let poller = Poller::new(&config, shared.clone())?;
//!
//! let (_stop_tx, stop_rx) = tokio::sync::watch::channel(false);
//! tokio::spawn(poller.run(stop_rx));
//!
//! // Renderer side: read completed history under one lock.
//! let state = shared.lock().unwrap();
//! for series in state.registry.series() {
//!     println!("{}: {} points", series.info().label, series.len());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! Scheduler → fetch → exposition parser → series registry → renderer.
//!
//! The registry is built once from a fixed metric catalog; samples for
//! unknown names drop silently, malformed lines drop individually, and a
//! failed cycle logs and waits for the next tick. Nothing in a scrape is an
//! abort.

pub mod client;
pub mod config;
pub mod expo;
pub mod poller;
pub mod series;
pub mod system;

pub use client::{PollError, ScrapeClient};
pub use config::{DEFAULT_BASE_URL, DEFAULT_INTERVAL, DEFAULT_NAMESPACE, DEFAULT_TIMEOUT, PollConfig};
pub use expo::{ExpoScrape, LineOutcome, parse_exposition, parse_line};
pub use poller::{DashboardState, Poller, SharedDashboard, epoch_seconds, shared_dashboard};
pub use series::{
    AppendOutcome, DEFAULT_CAPACITY, MetricInfo, Point, ScrapeStats, Series, SeriesRegistry,
    WATCHED_METRICS,
};
pub use system::{NULL_MARKER, SystemInfoSnapshot, render_value};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
