//! Prometheus metrics for Exchange-Chain subsystems.
//!
//! All metrics follow the naming convention: `xc_<subsystem>_<metric>_<unit>`
//!
//! ## Metric Types
//!
//! - **Counter**: Monotonically increasing value (e.g., bridges_completed_total)
//! - **Gauge**: Value that can go up or down (e.g., block_height)

use lazy_static::lazy_static;
use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();
}

/// Handles to every metric the node records. Cheap to clone.
#[derive(Clone)]
pub struct ChainMetrics {
    // =========================================================================
    // PRICES (Subsystem 1)
    // =========================================================================
    /// Markets created
    pub markets_created: IntCounter,
    /// Price updates written
    pub price_updates_applied: IntCounter,
    /// Price updates below the ppm threshold
    pub price_updates_skipped: IntCounter,

    // =========================================================================
    // BRIDGE (Subsystem 2)
    // =========================================================================
    /// Bridge events acknowledged
    pub bridges_acknowledged: IntCounter,
    /// Bridge events completed
    pub bridges_completed: IntCounter,
    /// Bridge events rejected, by reason
    pub bridges_rejected: IntCounterVec,

    // =========================================================================
    // BLOCK LIFECYCLE
    // =========================================================================
    /// Events shipped to the indexer
    pub indexer_events_emitted: IntCounter,
    /// Blocks committed
    pub blocks_produced: IntCounter,
    /// Blocks aborted
    pub blocks_aborted: IntCounter,
    /// Transactions discarded, by message type
    pub transactions_failed: IntCounterVec,
    /// Last committed height
    pub current_height: IntGauge,
}

impl ChainMetrics {
    /// Create the metrics without registering them.
    pub fn new() -> Result<Self, TelemetryError> {
        Ok(Self {
            markets_created: counter(
                "xc_prices_markets_created_total",
                "Total number of markets created",
            )?,
            price_updates_applied: counter(
                "xc_prices_updates_applied_total",
                "Total price updates that cleared the change threshold",
            )?,
            price_updates_skipped: counter(
                "xc_prices_updates_skipped_total",
                "Total price updates skipped below the change threshold",
            )?,
            bridges_acknowledged: counter(
                "xc_bridge_events_acknowledged_total",
                "Total bridge events acknowledged",
            )?,
            bridges_completed: counter(
                "xc_bridge_events_completed_total",
                "Total bridge events completed",
            )?,
            bridges_rejected: IntCounterVec::new(
                Opts::new("xc_bridge_events_rejected_total", "Total bridge events rejected"),
                &["reason"],
            )
            .map_err(metrics_err)?,
            indexer_events_emitted: counter(
                "xc_indexer_events_emitted_total",
                "Total events shipped to the indexer",
            )?,
            blocks_produced: counter("xc_runtime_blocks_produced_total", "Total blocks committed")?,
            blocks_aborted: counter("xc_runtime_blocks_aborted_total", "Total blocks aborted")?,
            transactions_failed: IntCounterVec::new(
                Opts::new("xc_runtime_transactions_failed_total", "Total transactions discarded"),
                &["msg"],
            )
            .map_err(metrics_err)?,
            current_height: IntGauge::new("xc_runtime_block_height", "Last committed block height")
                .map_err(metrics_err)?,
        })
    }

    /// Create and register into `registry`.
    pub fn register(registry: &Registry) -> Result<Self, TelemetryError> {
        let metrics = Self::new()?;
        let collectors: Vec<Box<dyn prometheus::core::Collector>> = vec![
            Box::new(metrics.markets_created.clone()),
            Box::new(metrics.price_updates_applied.clone()),
            Box::new(metrics.price_updates_skipped.clone()),
            Box::new(metrics.bridges_acknowledged.clone()),
            Box::new(metrics.bridges_completed.clone()),
            Box::new(metrics.bridges_rejected.clone()),
            Box::new(metrics.indexer_events_emitted.clone()),
            Box::new(metrics.blocks_produced.clone()),
            Box::new(metrics.blocks_aborted.clone()),
            Box::new(metrics.transactions_failed.clone()),
            Box::new(metrics.current_height.clone()),
        ];
        for collector in collectors {
            registry.register(collector).map_err(metrics_err)?;
        }
        Ok(metrics)
    }

    /// Register into the global [`REGISTRY`].
    pub fn register_global() -> Result<Self, TelemetryError> {
        Self::register(&REGISTRY)
    }
}

fn counter(name: &str, help: &str) -> Result<IntCounter, TelemetryError> {
    IntCounter::new(name, help).map_err(metrics_err)
}

fn metrics_err(e: prometheus::Error) -> TelemetryError {
    TelemetryError::MetricsInit(e.to_string())
}

/// Encode all metrics of `registry` as Prometheus text format.
pub fn encode_metrics(registry: &Registry) -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = registry.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer).map_err(metrics_err)?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}
