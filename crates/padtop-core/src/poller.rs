//! Poll scheduling and shared dashboard state.
//!
//! One scrape cycle is fetch → parse → append, with every append of that
//! cycle applied under a single lock so readers never see a half-applied
//! scrape. Cycles are fire-and-forget: the interval keeps its cadence no
//! matter how long an individual cycle takes, and a failed cycle only logs
//! and records its error; the next tick is the retry.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use log::{debug, warn};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use crate::client::{PollError, ScrapeClient};
use crate::config::PollConfig;
use crate::expo::parse_exposition;
use crate::series::{ScrapeStats, SeriesRegistry, WATCHED_METRICS};
use crate::system::SystemInfoSnapshot;

/// Sample capture instant as epoch seconds.
pub fn epoch_seconds() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}

/// Everything the renderer reads. Mutated only by completed cycles.
#[derive(Debug)]
pub struct DashboardState {
    pub registry: SeriesRegistry,
    pub system_info: Option<SystemInfoSnapshot>,
    /// Completed metric scrapes.
    pub cycle_count: u64,
    pub last_scrape_at: Option<f64>,
    pub last_scrape_error: Option<String>,
    pub last_info_error: Option<String>,
    pub unparseable_total: u64,
    pub unregistered_total: u64,
    /// While set, scheduled ticks skip their cycle.
    pub paused: bool,
}

impl DashboardState {
    pub fn new(capacity: usize) -> Self {
        Self {
            registry: SeriesRegistry::new(&WATCHED_METRICS, capacity),
            system_info: None,
            cycle_count: 0,
            last_scrape_at: None,
            last_scrape_error: None,
            last_info_error: None,
            unparseable_total: 0,
            unregistered_total: 0,
            paused: false,
        }
    }
}

/// Dashboard state shared between the poller and the renderer.
pub type SharedDashboard = Arc<Mutex<DashboardState>>;

pub fn shared_dashboard(capacity: usize) -> SharedDashboard {
    Arc::new(Mutex::new(DashboardState::new(capacity)))
}

/// Timer-driven scrape loop.
#[derive(Clone)]
pub struct Poller {
    client: ScrapeClient,
    shared: SharedDashboard,
    namespace: String,
    interval: Duration,
}

impl Poller {
    pub fn new(config: &PollConfig, shared: SharedDashboard) -> Result<Self, PollError> {
        Ok(Self {
            client: ScrapeClient::new(config)?,
            shared,
            namespace: config.namespace.clone(),
            interval: config.interval,
        })
    }

    pub fn shared(&self) -> &SharedDashboard {
        &self.shared
    }

    fn lock(&self) -> MutexGuard<'_, DashboardState> {
        self.shared
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// One metrics fetch-parse-append cycle.
    pub async fn run_metrics_cycle(&self) -> Result<ScrapeStats, PollError> {
        match self.try_metrics_cycle().await {
            Ok(stats) => Ok(stats),
            Err(e) => {
                warn!("metrics scrape failed: {e}");
                self.lock().last_scrape_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    async fn try_metrics_cycle(&self) -> Result<ScrapeStats, PollError> {
        let body = self.client.fetch_metrics().await?;
        let scrape = parse_exposition(&body, &self.namespace);
        if scrape.unparseable > 0 {
            debug!("dropped {} unparseable metric line(s)", scrape.unparseable);
        }
        let timestamp = epoch_seconds();

        let mut state = self.lock();
        let stats = state.registry.record_scrape(timestamp, &scrape.values);
        state.cycle_count += 1;
        state.last_scrape_at = Some(timestamp);
        state.last_scrape_error = None;
        state.unparseable_total += scrape.unparseable as u64;
        state.unregistered_total += stats.unregistered as u64;
        Ok(stats)
    }

    /// One system-info fetch. On failure the previous snapshot stays.
    pub async fn run_system_info_cycle(&self) -> Result<(), PollError> {
        match self.client.fetch_system_info().await {
            Ok(snapshot) => {
                let mut state = self.lock();
                state.system_info = Some(snapshot);
                state.last_info_error = None;
                Ok(())
            }
            Err(e) => {
                warn!("system info fetch failed: {e}");
                self.lock().last_info_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Run until `stop` flips to true or its sender drops.
    ///
    /// The first interval tick completes immediately, so the initial metrics
    /// cycle and the one-time system-info cycle both run at startup. Each
    /// tick spawns its cycle detached, so a slow response never delays the
    /// next tick; overlapping cycles are safe because appends are serialized
    /// by the state lock.
    pub async fn run(self, mut stop: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Burst);

        {
            let poller = self.clone();
            tokio::spawn(async move {
                let _ = poller.run_system_info_cycle().await;
            });
        }

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if self.lock().paused {
                        continue;
                    }
                    let poller = self.clone();
                    tokio::spawn(async move {
                        let _ = poller.run_metrics_cycle().await;
                    });
                }
                changed = stop.changed() => {
                    if changed.is_err() || *stop.borrow() {
                        break;
                    }
                }
            }
        }
    }
}
