//! Logging and metrics for pointradius hosts
//!
//! This crate provides:
//! - `tracing` subscriber setup driven by the `[logging]` config section
//! - A process-wide metrics registry (counters, gauges, load durations)
//! - Duration timers for the async load paths

use once_cell::sync::Lazy;
use pointradius_core::config::LoggingConfig;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Layer, Registry};
use uuid::Uuid;

#[cfg(feature = "wasm")]
mod console;

#[cfg(feature = "wasm")]
pub use console::init_console;

static METRICS: Lazy<MetricsRegistry> = Lazy::new(MetricsRegistry::new);

/// Correlates log lines and metric snapshots from one process.
static SESSION_ID: Lazy<String> = Lazy::new(|| Uuid::new_v4().to_string());

/// Metric names recorded by the session crate.
pub mod names {
    pub const QUERIES: &str = "queries";
    pub const LOADS_OK: &str = "loads_ok";
    pub const LOADS_FAILED: &str = "loads_failed";
    pub const GEOLOCATION_FAILED: &str = "geolocation_failed";
    pub const GATE_ATTACH: &str = "gate_attach";
    pub const GATE_DETACH: &str = "gate_detach";
    pub const POINTS_LOADED: &str = "points_loaded";
    pub const LOAD_DURATION_MS: &str = "load_duration_ms";
}

/// Initialize logging with the default configuration
pub fn init() -> anyhow::Result<()> {
    init_with_config(&LoggingConfig::default())
}

/// Initialize terminal logging from the `[logging]` configuration section
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_with_config(config: &LoggingConfig) -> anyhow::Result<()> {
    init_with_writer(config, std::io::stdout, false)
}

/// Installs the global subscriber with a custom writer.
///
/// `plain` drops timestamps and ANSI colors, for hosts without a wall clock
/// or a terminal.
pub fn init_with_writer<W>(config: &LoggingConfig, writer: W, plain: bool) -> anyhow::Result<()>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing::subscriber::set_global_default(build_subscriber(config, writer, plain)?)
        .map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))?;

    tracing::info!(
        session_id = %session_id(),
        version = env!("CARGO_PKG_VERSION"),
        json = config.json,
        "Telemetry initialized"
    );

    Ok(())
}

fn build_subscriber<W>(
    config: &LoggingConfig,
    writer: W,
    plain: bool,
) -> anyhow::Result<Box<dyn tracing::Subscriber + Send + Sync>>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| anyhow::anyhow!("Invalid log filter {:?}: {}", config.level, e))?;

    Ok(Box::new(
        tracing_subscriber::registry()
            .with(format_layer(config, writer, plain))
            .with(filter),
    ))
}

fn format_layer<W>(config: &LoggingConfig, writer: W, plain: bool) -> Box<dyn Layer<Registry> + Send + Sync>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let base = fmt::layer()
        .with_writer(writer)
        .with_target(config.show_target)
        .with_ansi(!plain);

    match (config.json, plain) {
        (true, false) => base.json().boxed(),
        (true, true) => base.json().without_time().boxed(),
        (false, false) => base.compact().boxed(),
        (false, true) => base.compact().without_time().boxed(),
    }
}

/// Get the current session ID
pub fn session_id() -> &'static str {
    &SESSION_ID
}

/// Get the global metrics registry
pub fn metrics() -> &'static MetricsRegistry {
    &METRICS
}

/// In-process counters, gauges and duration samples.
pub struct MetricsRegistry {
    counters: RwLock<HashMap<String, AtomicU64>>,
    gauges: RwLock<HashMap<String, AtomicU64>>,
    durations: RwLock<HashMap<String, Vec<f64>>>,
}

impl MetricsRegistry {
    fn new() -> Self {
        Self {
            counters: RwLock::new(HashMap::new()),
            gauges: RwLock::new(HashMap::new()),
            durations: RwLock::new(HashMap::new()),
        }
    }

    /// Adds one to a counter.
    pub fn increment(&self, name: &str) {
        let counters = self.counters.read().unwrap_or_else(|e| e.into_inner());
        if let Some(counter) = counters.get(name) {
            counter.fetch_add(1, Ordering::Relaxed);
            return;
        }
        drop(counters);

        let mut counters = self.counters.write().unwrap_or_else(|e| e.into_inner());
        counters
            .entry(name.to_string())
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(1, Ordering::Relaxed);
    }

    /// Sets a gauge to `value`.
    pub fn gauge(&self, name: &str, value: u64) {
        let mut gauges = self.gauges.write().unwrap_or_else(|e| e.into_inner());
        gauges
            .entry(name.to_string())
            .or_insert_with(|| AtomicU64::new(0))
            .store(value, Ordering::Relaxed);
    }

    /// Records one duration sample in milliseconds.
    pub fn duration_ms(&self, name: &str, millis: f64) {
        let mut durations = self.durations.write().unwrap_or_else(|e| e.into_inner());
        durations.entry(name.to_string()).or_default().push(millis);
    }

    /// Copies the current values into a serialisable snapshot.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let counters = self.counters.read().unwrap_or_else(|e| e.into_inner());
        let gauges = self.gauges.read().unwrap_or_else(|e| e.into_inner());
        let durations = self.durations.read().unwrap_or_else(|e| e.into_inner());

        MetricsSnapshot {
            session_id: session_id().to_string(),
            counters: counters
                .iter()
                .map(|(name, value)| (name.clone(), value.load(Ordering::Relaxed)))
                .collect(),
            gauges: gauges
                .iter()
                .map(|(name, value)| (name.clone(), value.load(Ordering::Relaxed)))
                .collect(),
            durations: durations
                .iter()
                .filter_map(|(name, samples)| {
                    DurationSummary::from_samples(samples).map(|summary| (name.clone(), summary))
                })
                .collect(),
        }
    }
}

/// Point-in-time copy of the metrics registry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub session_id: String,
    pub counters: BTreeMap<String, u64>,
    pub gauges: BTreeMap<String, u64>,
    pub durations: BTreeMap<String, DurationSummary>,
}

impl MetricsSnapshot {
    /// Counter value, 0 if it was never incremented.
    pub fn counter(&self, name: &str) -> u64 {
        self.counters.get(name).copied().unwrap_or(0)
    }
}

/// Summary of the duration samples recorded under one name.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DurationSummary {
    pub count: usize,
    pub last_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
    pub mean_ms: f64,
}

impl DurationSummary {
    fn from_samples(samples: &[f64]) -> Option<Self> {
        let last_ms = *samples.last()?;
        let min_ms = samples.iter().copied().fold(f64::INFINITY, f64::min);
        let max_ms = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean_ms = samples.iter().sum::<f64>() / samples.len() as f64;

        Some(Self {
            count: samples.len(),
            last_ms,
            min_ms,
            max_ms,
            mean_ms,
        })
    }
}

/// Timer for measuring operation duration
///
/// Relies on `Instant`, so only use it on native targets.
pub struct Timer {
    name: String,
    start: Instant,
}

impl Timer {
    /// Start a new timer
    pub fn start(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            start: Instant::now(),
        }
    }

    /// Stop the timer and record the duration in milliseconds
    pub fn stop(self) -> Duration {
        let duration = self.start.elapsed();
        metrics().duration_ms(&self.name, duration.as_secs_f64() * 1000.0);
        tracing::debug!(
            metric = %self.name,
            duration_ms = duration.as_millis(),
            "Timer completed"
        );
        duration
    }
}
