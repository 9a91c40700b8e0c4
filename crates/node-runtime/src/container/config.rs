//! # Node Configuration
//!
//! Unified configuration for the daemons, the keepers and the block driver.
//!
//! Values come from an [`AppOptions`] key/value source keyed by flag name
//! (`price-daemon-enabled`, `bridge-daemon-loop-delay-ms`, ...). A flag
//! that is absent or does not parse keeps its default. The environment
//! source maps each flag to `XC_<FLAG_IN_SCREAMING_SNAKE_CASE>`.

use shared_types::{decode_address, encode_address, module_address, Address, AddressError};
use std::collections::HashMap;
use thiserror::Error;
use tracing::warn;

// Daemon flags.
/// Unix socket the daemons report through.
pub const FLAG_UNIX_SOCKET_ADDRESS: &str = "unix-socket-address";
/// Whether the price daemon runs.
pub const FLAG_PRICE_DAEMON_ENABLED: &str = "price-daemon-enabled";
/// Price daemon loop delay.
pub const FLAG_PRICE_DAEMON_LOOP_DELAY_MS: &str = "price-daemon-loop-delay-ms";
/// Whether the bridge daemon runs.
pub const FLAG_BRIDGE_DAEMON_ENABLED: &str = "bridge-daemon-enabled";
/// Bridge daemon loop delay.
pub const FLAG_BRIDGE_DAEMON_LOOP_DELAY_MS: &str = "bridge-daemon-loop-delay-ms";
/// External chain RPC endpoint the bridge daemon polls.
pub const FLAG_BRIDGE_DAEMON_ETH_RPC_ENDPOINT: &str = "bridge-daemon-eth-rpc-endpoint";
/// Whether the liquidation daemon runs.
pub const FLAG_LIQUIDATION_DAEMON_ENABLED: &str = "liquidation-daemon-enabled";
/// Liquidation daemon loop delay.
pub const FLAG_LIQUIDATION_DAEMON_LOOP_DELAY_MS: &str = "liquidation-daemon-loop-delay-ms";
/// Subaccounts fetched per page.
pub const FLAG_LIQUIDATION_DAEMON_SUBACCOUNT_PAGE_LIMIT: &str =
    "liquidation-daemon-subaccount-page-limit";
/// Subaccounts per liquidatable check request.
pub const FLAG_LIQUIDATION_DAEMON_REQUEST_CHUNK_SIZE: &str =
    "liquidation-daemon-request-chunk-size";

// Clob flags.
/// Maximum liquidation orders per block.
pub const FLAG_MAX_LIQUIDATION_ORDERS_PER_BLOCK: &str = "max-liquidation-orders-per-block";
/// Whether MEV telemetry is collected.
pub const FLAG_MEV_TELEMETRY_ENABLED: &str = "mev-telemetry-enabled";
/// Comma-delimited MEV telemetry hosts.
pub const FLAG_MEV_TELEMETRY_HOSTS: &str = "mev-telemetry-hosts";
/// Identifier reported to MEV telemetry hosts.
pub const FLAG_MEV_TELEMETRY_IDENTIFIER: &str = "mev-telemetry-identifier";

// Keeper and driver flags.
/// Max age of a cached exchange price.
pub const FLAG_PRICES_MAX_PRICE_AGE_MS: &str = "prices-max-price-age-ms";
/// Smoothed price history length.
pub const FLAG_PRICES_SMOOTHED_HISTORY_LENGTH: &str = "prices-smoothed-history-length";
/// Price ingestion burst.
pub const FLAG_PRICES_INGEST_BURST: &str = "prices-ingest-burst";
/// Price ingestion refill rate.
pub const FLAG_PRICES_INGEST_RATE_PER_SEC: &str = "prices-ingest-rate-per-sec";
/// Max bridge events acknowledged per block.
pub const FLAG_BRIDGE_MAX_EVENTS_PER_BLOCK: &str = "bridge-max-events-per-block";
/// Daemon submission retry attempts.
pub const FLAG_BRIDGE_RETRY_MAX_ATTEMPTS: &str = "bridge-retry-max-attempts";
/// Daemon submission retry base delay.
pub const FLAG_BRIDGE_RETRY_BASE_DELAY_MS: &str = "bridge-retry-base-delay-ms";
/// Block interval of the local block producer.
pub const FLAG_BLOCK_TIME_MS: &str = "block-time-ms";
/// Comma-delimited authority addresses.
pub const FLAG_AUTHORITIES: &str = "authorities";

/// Key/value source of flag values.
pub trait AppOptions {
    /// Raw value of `key`, if set.
    fn get(&self, key: &str) -> Option<String>;
}

impl AppOptions for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

/// Reads `XC_<FLAG>` environment variables.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvOptions;

impl EnvOptions {
    /// Environment variable name for a flag.
    pub fn env_key(flag: &str) -> String {
        format!("XC_{}", flag.replace('-', "_").to_uppercase())
    }
}

impl AppOptions for EnvOptions {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(Self::env_key(key)).ok()
    }
}

/// Complete node configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeConfig {
    /// Shared daemon flags.
    pub shared: SharedFlags,
    /// Price daemon flags.
    pub price: PriceFlags,
    /// Bridge daemon flags.
    pub bridge_daemon: BridgeFlags,
    /// Liquidation daemon flags.
    pub liquidation: LiquidationFlags,
    /// Order book flags.
    pub clob: ClobFlags,
    /// Oracle price keeper and ingestion.
    pub prices: PricesConfig,
    /// Bridge keeper and ingestion.
    pub bridge: BridgeConfig,
    /// Block interval of the local block producer.
    pub block_time_ms: u64,
    /// Identities allowed to change governance-controlled params.
    pub authorities: Vec<Address>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            shared: SharedFlags::default(),
            price: PriceFlags::default(),
            bridge_daemon: BridgeFlags::default(),
            liquidation: LiquidationFlags::default(),
            clob: ClobFlags::default(),
            prices: PricesConfig::default(),
            bridge: BridgeConfig::default(),
            block_time_ms: 1_000,
            authorities: vec![module_address("gov")],
        }
    }
}

/// Shared daemon flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedFlags {
    /// Socket the daemons report through.
    pub socket_address: String,
}

impl Default for SharedFlags {
    fn default() -> Self {
        Self {
            socket_address: "/tmp/daemons.sock".to_string(),
        }
    }
}

/// Price daemon flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceFlags {
    /// Run the price daemon.
    pub enabled: bool,
    /// Delay between polls.
    pub loop_delay_ms: u64,
}

impl Default for PriceFlags {
    fn default() -> Self {
        Self {
            enabled: true,
            loop_delay_ms: 3_000,
        }
    }
}

/// Bridge daemon flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeFlags {
    /// Run the bridge daemon.
    pub enabled: bool,
    /// Delay between polls.
    pub loop_delay_ms: u64,
    /// External chain RPC endpoint.
    pub eth_rpc_endpoint: String,
}

impl Default for BridgeFlags {
    fn default() -> Self {
        Self {
            enabled: true,
            loop_delay_ms: 30_000,
            eth_rpc_endpoint: "https://eth-sepolia.g.alchemy.com/v2/demo".to_string(),
        }
    }
}

/// Liquidation daemon flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiquidationFlags {
    /// Run the liquidation daemon.
    pub enabled: bool,
    /// Delay between polls.
    pub loop_delay_ms: u64,
    /// Subaccounts fetched per page.
    pub subaccount_page_limit: u64,
    /// Subaccounts per liquidatable check request.
    pub request_chunk_size: u64,
}

impl Default for LiquidationFlags {
    fn default() -> Self {
        Self {
            enabled: true,
            loop_delay_ms: 1_600,
            subaccount_page_limit: 1_000,
            request_chunk_size: 50,
        }
    }
}

/// Order book flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClobFlags {
    /// Maximum liquidation orders per block.
    pub max_liquidation_orders_per_block: u32,
    /// Collect MEV telemetry.
    pub mev_telemetry_enabled: bool,
    /// MEV telemetry collection hosts.
    pub mev_telemetry_hosts: Vec<String>,
    /// Identifier reported to MEV telemetry hosts.
    pub mev_telemetry_identifier: String,
}

impl Default for ClobFlags {
    fn default() -> Self {
        Self {
            max_liquidation_orders_per_block: 35,
            mev_telemetry_enabled: false,
            mev_telemetry_hosts: Vec::new(),
            mev_telemetry_identifier: String::new(),
        }
    }
}

/// Oracle price keeper and ingestion configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricesConfig {
    /// Max age of a cached exchange price.
    pub max_price_age_ms: u64,
    /// Smoothed price history length.
    pub smoothed_history_length: usize,
    /// Ingestion token bucket capacity.
    pub ingest_burst: u64,
    /// Ingestion token bucket refill per second.
    pub ingest_rate_per_sec: u64,
}

impl Default for PricesConfig {
    fn default() -> Self {
        Self {
            max_price_age_ms: 30_000,
            smoothed_history_length: xc_01_prices::SMOOTHED_PRICE_HISTORY_LENGTH,
            ingest_burst: 100,
            ingest_rate_per_sec: 50,
        }
    }
}

impl PricesConfig {
    /// Keeper-side view of this config.
    pub fn keeper_config(&self) -> xc_01_prices::PricesConfig {
        xc_01_prices::PricesConfig {
            smoothed_history_length: self.smoothed_history_length,
        }
    }
}

/// Bridge keeper and ingestion configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Max events acknowledged per block.
    pub max_events_per_block: usize,
    /// Daemon submission retry attempts.
    pub retry_max_attempts: u32,
    /// Daemon submission retry base delay, doubled per attempt.
    pub retry_base_delay_ms: u64,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            max_events_per_block: 100,
            retry_max_attempts: 5,
            retry_base_delay_ms: 200,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// An authority address did not decode.
    #[error("invalid authority address {value:?}: {source}")]
    InvalidAuthority {
        /// Raw value.
        value: String,
        /// Decode failure.
        source: AddressError,
    },

    /// No authority configured.
    #[error("at least one authority is required")]
    NoAuthorities,

    /// Smoothed price history must hold at least one price.
    #[error("prices smoothed history length must be at least 1")]
    ZeroHistoryLength,

    /// An enabled daemon has no loop delay.
    #[error("{daemon} daemon is enabled with a zero loop delay")]
    ZeroLoopDelay {
        /// Daemon name.
        daemon: &'static str,
    },

    /// The block producer needs a positive interval.
    #[error("block time must be positive")]
    ZeroBlockTime,
}

impl NodeConfig {
    /// Read every flag from `opts`, falling back to defaults.
    pub fn from_options(opts: &impl AppOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        set_string(opts, FLAG_UNIX_SOCKET_ADDRESS, &mut config.shared.socket_address);

        set_parsed(opts, FLAG_PRICE_DAEMON_ENABLED, &mut config.price.enabled);
        set_parsed(opts, FLAG_PRICE_DAEMON_LOOP_DELAY_MS, &mut config.price.loop_delay_ms);

        set_parsed(opts, FLAG_BRIDGE_DAEMON_ENABLED, &mut config.bridge_daemon.enabled);
        set_parsed(
            opts,
            FLAG_BRIDGE_DAEMON_LOOP_DELAY_MS,
            &mut config.bridge_daemon.loop_delay_ms,
        );
        set_string(
            opts,
            FLAG_BRIDGE_DAEMON_ETH_RPC_ENDPOINT,
            &mut config.bridge_daemon.eth_rpc_endpoint,
        );

        set_parsed(opts, FLAG_LIQUIDATION_DAEMON_ENABLED, &mut config.liquidation.enabled);
        set_parsed(
            opts,
            FLAG_LIQUIDATION_DAEMON_LOOP_DELAY_MS,
            &mut config.liquidation.loop_delay_ms,
        );
        set_parsed(
            opts,
            FLAG_LIQUIDATION_DAEMON_SUBACCOUNT_PAGE_LIMIT,
            &mut config.liquidation.subaccount_page_limit,
        );
        set_parsed(
            opts,
            FLAG_LIQUIDATION_DAEMON_REQUEST_CHUNK_SIZE,
            &mut config.liquidation.request_chunk_size,
        );

        set_parsed(
            opts,
            FLAG_MAX_LIQUIDATION_ORDERS_PER_BLOCK,
            &mut config.clob.max_liquidation_orders_per_block,
        );
        set_parsed(opts, FLAG_MEV_TELEMETRY_ENABLED, &mut config.clob.mev_telemetry_enabled);
        if let Some(hosts) = opts.get(FLAG_MEV_TELEMETRY_HOSTS) {
            config.clob.mev_telemetry_hosts = split_list(&hosts);
        }
        set_string(
            opts,
            FLAG_MEV_TELEMETRY_IDENTIFIER,
            &mut config.clob.mev_telemetry_identifier,
        );

        set_parsed(opts, FLAG_PRICES_MAX_PRICE_AGE_MS, &mut config.prices.max_price_age_ms);
        set_parsed(
            opts,
            FLAG_PRICES_SMOOTHED_HISTORY_LENGTH,
            &mut config.prices.smoothed_history_length,
        );
        set_parsed(opts, FLAG_PRICES_INGEST_BURST, &mut config.prices.ingest_burst);
        set_parsed(opts, FLAG_PRICES_INGEST_RATE_PER_SEC, &mut config.prices.ingest_rate_per_sec);

        set_parsed(opts, FLAG_BRIDGE_MAX_EVENTS_PER_BLOCK, &mut config.bridge.max_events_per_block);
        set_parsed(opts, FLAG_BRIDGE_RETRY_MAX_ATTEMPTS, &mut config.bridge.retry_max_attempts);
        set_parsed(opts, FLAG_BRIDGE_RETRY_BASE_DELAY_MS, &mut config.bridge.retry_base_delay_ms);

        set_parsed(opts, FLAG_BLOCK_TIME_MS, &mut config.block_time_ms);

        if let Some(raw) = opts.get(FLAG_AUTHORITIES) {
            config.authorities = split_list(&raw)
                .into_iter()
                .map(|value| {
                    decode_address(&value)
                        .map_err(|source| ConfigError::InvalidAuthority { value, source })
                })
                .collect::<Result<_, _>>()?;
        }

        Ok(config)
    }

    /// Read every flag from `XC_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_options(&EnvOptions)
    }

    /// Reject configurations the node cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.authorities.is_empty() {
            return Err(ConfigError::NoAuthorities);
        }
        if self.prices.smoothed_history_length == 0 {
            return Err(ConfigError::ZeroHistoryLength);
        }
        if self.price.enabled && self.price.loop_delay_ms == 0 {
            return Err(ConfigError::ZeroLoopDelay { daemon: "price" });
        }
        if self.bridge_daemon.enabled && self.bridge_daemon.loop_delay_ms == 0 {
            return Err(ConfigError::ZeroLoopDelay { daemon: "bridge" });
        }
        if self.liquidation.enabled && self.liquidation.loop_delay_ms == 0 {
            return Err(ConfigError::ZeroLoopDelay {
                daemon: "liquidation",
            });
        }
        if self.block_time_ms == 0 {
            return Err(ConfigError::ZeroBlockTime);
        }
        Ok(())
    }

    /// Authorities in their encoded form, for logging.
    pub fn encoded_authorities(&self) -> Vec<String> {
        self.authorities.iter().map(encode_address).collect()
    }
}

fn set_string(opts: &impl AppOptions, key: &str, target: &mut String) {
    if let Some(v) = opts.get(key) {
        *target = v;
    }
}

fn set_parsed<T: std::str::FromStr>(opts: &impl AppOptions, key: &str, target: &mut T) {
    if let Some(raw) = opts.get(key) {
        match raw.trim().parse() {
            Ok(v) => *target = v,
            Err(_) => warn!("[runtime] ignoring unparsable value {:?} for {}", raw, key),
        }
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = NodeConfig::default();
        assert_eq!(config.shared.socket_address, "/tmp/daemons.sock");
        assert!(config.price.enabled);
        assert_eq!(config.price.loop_delay_ms, 3_000);
        assert!(config.bridge_daemon.enabled);
        assert_eq!(config.bridge_daemon.loop_delay_ms, 30_000);
        assert_eq!(
            config.bridge_daemon.eth_rpc_endpoint,
            "https://eth-sepolia.g.alchemy.com/v2/demo"
        );
        assert!(config.liquidation.enabled);
        assert_eq!(config.liquidation.loop_delay_ms, 1_600);
        assert_eq!(config.liquidation.subaccount_page_limit, 1_000);
        assert_eq!(config.liquidation.request_chunk_size, 50);
        assert_eq!(config.clob.max_liquidation_orders_per_block, 35);
        assert!(!config.clob.mev_telemetry_enabled);
        assert!(config.clob.mev_telemetry_hosts.is_empty());
        assert_eq!(config.clob.mev_telemetry_identifier, "");
        assert_eq!(config.prices.max_price_age_ms, 30_000);
        assert_eq!(config.prices.smoothed_history_length, 5);
        assert_eq!(config.bridge.max_events_per_block, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_options_give_defaults() {
        assert_eq!(
            NodeConfig::from_options(&opts(&[])).unwrap(),
            NodeConfig::default()
        );
    }

    #[test]
    fn test_options_override() {
        let config = NodeConfig::from_options(&opts(&[
            (FLAG_UNIX_SOCKET_ADDRESS, "/run/xc.sock"),
            (FLAG_PRICE_DAEMON_ENABLED, "false"),
            (FLAG_BRIDGE_DAEMON_LOOP_DELAY_MS, "1234"),
            (FLAG_BRIDGE_DAEMON_ETH_RPC_ENDPOINT, "http://localhost:8545"),
            (FLAG_MAX_LIQUIDATION_ORDERS_PER_BLOCK, "12"),
            (FLAG_MEV_TELEMETRY_ENABLED, "true"),
            (FLAG_MEV_TELEMETRY_HOSTS, "http://a:1, http://b:2"),
            (FLAG_MEV_TELEMETRY_IDENTIFIER, "node-7"),
            (FLAG_PRICES_SMOOTHED_HISTORY_LENGTH, "9"),
        ]))
        .unwrap();

        assert_eq!(config.shared.socket_address, "/run/xc.sock");
        assert!(!config.price.enabled);
        assert_eq!(config.bridge_daemon.loop_delay_ms, 1_234);
        assert_eq!(config.bridge_daemon.eth_rpc_endpoint, "http://localhost:8545");
        assert_eq!(config.clob.max_liquidation_orders_per_block, 12);
        assert!(config.clob.mev_telemetry_enabled);
        assert_eq!(config.clob.mev_telemetry_hosts, vec!["http://a:1", "http://b:2"]);
        assert_eq!(config.clob.mev_telemetry_identifier, "node-7");
        assert_eq!(config.prices.smoothed_history_length, 9);
    }

    #[test]
    fn test_liquidation_flags_override() {
        let config = NodeConfig::from_options(&opts(&[
            (FLAG_LIQUIDATION_DAEMON_ENABLED, "false"),
            (FLAG_LIQUIDATION_DAEMON_LOOP_DELAY_MS, "800"),
            (FLAG_LIQUIDATION_DAEMON_SUBACCOUNT_PAGE_LIMIT, "250"),
            (FLAG_LIQUIDATION_DAEMON_REQUEST_CHUNK_SIZE, "10"),
        ]))
        .unwrap();

        assert_eq!(
            config.liquidation,
            LiquidationFlags {
                enabled: false,
                loop_delay_ms: 800,
                subaccount_page_limit: 250,
                request_chunk_size: 10,
            }
        );
        assert_eq!(
            EnvOptions::env_key(FLAG_LIQUIDATION_DAEMON_SUBACCOUNT_PAGE_LIMIT),
            "XC_LIQUIDATION_DAEMON_SUBACCOUNT_PAGE_LIMIT"
        );
    }

    #[test]
    fn test_unparsable_value_keeps_default() {
        let config = NodeConfig::from_options(&opts(&[
            (FLAG_PRICE_DAEMON_LOOP_DELAY_MS, "soon"),
            (FLAG_BRIDGE_DAEMON_ENABLED, "maybe"),
        ]))
        .unwrap();
        assert_eq!(config.price.loop_delay_ms, 3_000);
        assert!(config.bridge_daemon.enabled);
    }

    #[test]
    fn test_authorities_parsed() {
        let gov = module_address("gov");
        let other = [0x11u8; 20];
        let raw = format!("{},{}", encode_address(&gov), encode_address(&other));
        let config = NodeConfig::from_options(&opts(&[(FLAG_AUTHORITIES, &raw)])).unwrap();
        assert_eq!(config.authorities, vec![gov, other]);
    }

    #[test]
    fn test_bad_authority_rejected() {
        let err = NodeConfig::from_options(&opts(&[(FLAG_AUTHORITIES, "gov")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidAuthority { .. }));
    }

    #[test]
    fn test_validate() {
        let mut config = NodeConfig::default();
        config.authorities.clear();
        assert_eq!(config.validate(), Err(ConfigError::NoAuthorities));

        let mut config = NodeConfig::default();
        config.prices.smoothed_history_length = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroHistoryLength));

        let mut config = NodeConfig::default();
        config.price.loop_delay_ms = 0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroLoopDelay { daemon: "price" })
        );
        config.price.enabled = false;
        assert!(config.validate().is_ok());

        let mut config = NodeConfig::default();
        config.liquidation.loop_delay_ms = 0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroLoopDelay {
                daemon: "liquidation"
            })
        );
        config.liquidation.enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_key() {
        assert_eq!(
            EnvOptions::env_key(FLAG_PRICE_DAEMON_LOOP_DELAY_MS),
            "XC_PRICE_DAEMON_LOOP_DELAY_MS"
        );
    }
}
