//! Bounded per-metric history.
//!
//! The dashboard watches a fixed catalog of scratchpad metrics. Each one owns
//! a sliding window of `(timestamp, value)` points: appends go to the back,
//! and once the window is over capacity the oldest points fall off the front.
//! Samples for names outside the catalog are dropped; the server exposes far
//! more than the dashboard charts.

use std::collections::HashMap;
use std::collections::VecDeque;

/// Points retained per series.
pub const DEFAULT_CAPACITY: usize = 20;

/// Static description of one watched metric.
#[derive(Debug, Clone, Copy)]
pub struct MetricInfo {
    /// Bare exposition name (after the namespace separator).
    pub name: &'static str,
    /// Human-readable chart label.
    pub label: &'static str,
    /// Unit shown on the chart's Y axis.
    pub unit: &'static str,
}

/// The scratchpad metrics the dashboard charts.
pub static WATCHED_METRICS: [MetricInfo; 6] = [
    MetricInfo {
        name: "num_requests_running",
        label: "Running requests",
        unit: "reqs",
    },
    MetricInfo {
        name: "num_requests_waiting",
        label: "Waiting requests",
        unit: "reqs",
    },
    MetricInfo {
        name: "num_used_tokens",
        label: "Used tokens",
        unit: "tokens",
    },
    MetricInfo {
        name: "mempool_usage_percent",
        label: "Mempool usage",
        unit: "%",
    },
    MetricInfo {
        name: "gen_throughput",
        label: "Generation throughput",
        unit: "tok/s",
    },
    MetricInfo {
        name: "cache_hit_rate",
        label: "Cache hit rate",
        unit: "ratio",
    },
];

/// One retained sample: capture instant as epoch seconds, plus the value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub timestamp: f64,
    pub value: f64,
}

/// Sliding-window history for one metric.
#[derive(Debug, Clone)]
pub struct Series {
    info: &'static MetricInfo,
    points: VecDeque<Point>,
}

impl Series {
    fn new(info: &'static MetricInfo) -> Self {
        Self {
            info,
            points: VecDeque::new(),
        }
    }

    pub fn info(&self) -> &'static MetricInfo {
        self.info
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn latest(&self) -> Option<Point> {
        self.points.back().copied()
    }

    pub fn oldest(&self) -> Option<Point> {
        self.points.front().copied()
    }

    /// Points oldest-first.
    pub fn points(&self) -> impl Iterator<Item = &Point> {
        self.points.iter()
    }

    fn push(&mut self, point: Point, capacity: usize) {
        self.points.push_back(point);
        while self.points.len() > capacity {
            self.points.pop_front();
        }
    }
}

/// Result of appending one sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    Appended,
    /// Name not in the catalog; the sample is dropped, not an error.
    Unregistered,
}

/// Per-scrape append accounting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrapeStats {
    pub appended: usize,
    pub unregistered: usize,
}

/// The fixed set of charted series, keyed by metric name.
///
/// Built once at startup; series are never added or removed afterwards.
#[derive(Debug, Clone)]
pub struct SeriesRegistry {
    series: Vec<Series>,
    capacity: usize,
}

impl SeriesRegistry {
    pub fn new(catalog: &'static [MetricInfo], capacity: usize) -> Self {
        Self {
            series: catalog.iter().map(Series::new).collect(),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Series in catalog order (the chart grid renders in this order).
    pub fn series(&self) -> impl Iterator<Item = &Series> {
        self.series.iter()
    }

    pub fn get(&self, name: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.info.name == name)
    }

    /// Append one sample. Unknown names are a silent no-op.
    pub fn append(&mut self, name: &str, timestamp: f64, value: f64) -> AppendOutcome {
        let capacity = self.capacity;
        match self.series.iter_mut().find(|s| s.info.name == name) {
            Some(series) => {
                series.push(Point { timestamp, value }, capacity);
                AppendOutcome::Appended
            }
            None => AppendOutcome::Unregistered,
        }
    }

    /// Apply one parsed scrape: every sample appended with the shared capture
    /// timestamp. Metrics absent from `values` keep their history untouched.
    pub fn record_scrape(&mut self, timestamp: f64, values: &HashMap<String, f64>) -> ScrapeStats {
        let mut stats = ScrapeStats::default();
        for (name, &value) in values {
            match self.append(name, timestamp, value) {
                AppendOutcome::Appended => stats.appended += 1,
                AppendOutcome::Unregistered => stats.unregistered += 1,
            }
        }
        stats
    }

    /// Completed history for one series, oldest first.
    pub fn snapshot(&self, name: &str) -> Option<Vec<Point>> {
        self.get(name).map(|s| s.points().copied().collect())
    }
}
