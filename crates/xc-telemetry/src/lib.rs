//! # Exchange-Chain Telemetry
//!
//! Structured logs through `tracing` and Prometheus metrics for the node.
//! The keeper crates only emit `tracing` events; this crate decides where
//! they go and owns the metric handles the lifecycle driver updates.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use xc_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let config = TelemetryConfig::from_env();
//! let telemetry = init_telemetry(&config)?;
//! telemetry.metrics.blocks_produced.inc();
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `XC_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `XC_JSON_LOGS` | `false` | JSON log lines |
//! | `XC_CONSOLE_OUTPUT` | `true` | Write logs to stdout |
//! | `XC_METRICS_PORT` | `9100` | Prometheus scrape port |
//! | `XC_NETWORK` | `testnet` | Network name |

#![warn(missing_docs)]

mod config;
pub mod metrics;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use metrics::{encode_metrics, ChainMetrics, REGISTRY};
pub use tracing_setup::{env_filter, init_tracing};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TelemetryError {
    /// Subscriber could not be built or installed.
    #[error("Failed to initialize tracing: {0}")]
    TracerInit(String),

    /// Metric creation or registration failed.
    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),
}

/// Installed telemetry: the global subscriber plus registered metrics.
pub struct Telemetry {
    /// Metric handles registered in [`REGISTRY`].
    pub metrics: ChainMetrics,
}

/// Register metrics in the global registry and install the subscriber.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<Telemetry, TelemetryError> {
    let metrics = ChainMetrics::register_global()?;
    init_tracing(config)?;
    Ok(Telemetry { metrics })
}

/// Convenience macro for creating a span with subsystem context.
///
/// # Example
///
/// ```rust,ignore
/// use xc_telemetry::subsystem_span;
///
/// let _span = subsystem_span!("end_block", subsystem = "bridge", height = 12345).entered();
/// ```
#[macro_export]
macro_rules! subsystem_span {
    ($name:expr, $($field:tt)*) => {
        tracing::info_span!($name, $($field)*)
    };
}

/// Convenience macro for recording a metric increment.
#[macro_export]
macro_rules! metric_inc {
    ($metric:expr) => {
        $metric.inc()
    };
    ($metric:expr, $labels:expr) => {
        $metric.with_label_values($labels).inc()
    };
}
