//! # Node Runtime Library
//!
//! Wires the keepers into a block lifecycle, feeds them from the daemons
//! and installs telemetry. The binary in `main.rs` is a thin shell over
//! [`NodeRuntime`].
//!
//! ## Modules
//!
//! - `container/` - node configuration, consensus state and daemon caches
//! - `genesis/` - height-0 state
//! - `handlers/` - transaction message dispatch
//! - `driver/` - block lifecycle with per-transaction branching
//! - `daemons/` - price and bridge daemons, metrics endpoint
//! - `runtime` - startup, block production loop and shutdown

#![warn(missing_docs)]

pub mod container;
pub mod daemons;
pub mod driver;
pub mod genesis;
pub mod handlers;
pub mod runtime;

pub use container::{AppState, DaemonCaches, NodeConfig};
pub use driver::{BlockDriver, BlockResult, DriverError, TxResult};
pub use genesis::{GenesisBuilder, GenesisConfig};
pub use handlers::{HandlerError, Msg, MsgResponse};
pub use runtime::NodeRuntime;
