//! # Domain Value Objects
//!
//! Governance-controlled parameters and per-event lifecycle status.

use serde::{Deserialize, Serialize};

/// Kill switch and completion delay.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyParams {
    /// When set, acknowledgement and completion fail.
    pub is_disabled: bool,
    /// Blocks between acknowledgement and completion.
    pub delay_blocks: u64,
}

impl Default for SafetyParams {
    fn default() -> Self {
        Self {
            is_disabled: false,
            delay_blocks: 86_400,
        }
    }
}

/// Which external contract and token the bridge mirrors.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventParams {
    /// Denom minted to recipients on this chain.
    pub denom: String,
    /// Chain id of the external network.
    pub eth_chain_id: u64,
    /// Address of the bridge contract on the external network.
    pub eth_address: String,
}

impl Default for EventParams {
    fn default() -> Self {
        Self {
            denom: "bridge-token".to_string(),
            eth_chain_id: 11_155_111,
            eth_address: "0xEf01c3A30eB57c91c40C52E996d29c202ae72193".to_string(),
        }
    }
}

/// Progress of acknowledgement on this chain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeEventInfo {
    /// Id the next acknowledged event must carry.
    pub next_id: u32,
    /// External height of the last acknowledged event.
    pub eth_block_height: u64,
}

/// Bridge event state machine.
///
/// `Observed -> Validated -> Completed | Rejected`, terminal on first outcome.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BridgeEventStatus {
    /// Acknowledged on chain, waiting for its completion height.
    Observed,
    /// Due for completion, validation in progress.
    Validated,
    /// Funds moved to the recipient.
    Completed,
    /// Completion failed; never retried.
    Rejected(String),
}

impl BridgeEventStatus {
    /// Completed or rejected.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Rejected(_))
    }
}
