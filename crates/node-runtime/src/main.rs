//! # Exchange-Chain Node
//!
//! Local single-validator node: applies genesis, runs the price and bridge
//! daemons against simulated sources and produces a block every
//! `block_time_ms`.
//!
//! ## Environment
//!
//! - `XC_*` flags, see `node_runtime::container::config`
//! - `XC_GENESIS_FILE`: JSON genesis document (default: built-in)
//! - telemetry variables, see `xc_telemetry::TelemetryConfig`

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;

use node_runtime::{GenesisConfig, NodeConfig, NodeRuntime};
use xc_telemetry::{init_telemetry, TelemetryConfig};

/// Genesis from `XC_GENESIS_FILE`, or the built-in one for the network.
fn load_genesis(network: &str) -> Result<GenesisConfig> {
    match std::env::var("XC_GENESIS_FILE") {
        Ok(path) => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read genesis file {}", path))?;
            Ok(GenesisConfig::from_json(&raw)?)
        }
        Err(_) if network == "devnet" => Ok(GenesisConfig::devnet()),
        Err(_) => Ok(GenesisConfig::default()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let telemetry_config = TelemetryConfig::from_env();
    let telemetry = init_telemetry(&telemetry_config)?;

    let config = NodeConfig::from_env()?;
    let genesis = load_genesis(&telemetry_config.network)?;

    info!("===========================================");
    info!("  Exchange-Chain Node v{}", env!("CARGO_PKG_VERSION"));
    info!("===========================================");
    info!(
        network = %telemetry_config.network,
        authorities = ?config.encoded_authorities(),
        block_time_ms = config.block_time_ms,
        "[runtime] configuration loaded"
    );

    let mut runtime = NodeRuntime::new(config, genesis, telemetry.metrics)?;

    let listener = TcpListener::bind(("0.0.0.0", telemetry_config.metrics_port))
        .await
        .with_context(|| format!("failed to bind metrics port {}", telemetry_config.metrics_port))?;
    runtime.start_metrics_server(listener);
    runtime.start_background_tasks();

    info!("Node is running. Press Ctrl+C to stop.");
    tokio::select! {
        _ = runtime.run_block_producer() => {}
        signal = tokio::signal::ctrl_c() => {
            signal.context("failed to listen for ctrl-c")?;
        }
    }

    runtime.shutdown().await;
    Ok(())
}
