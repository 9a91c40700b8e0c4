//! # Genesis Module
//!
//! Chain initialization: the initial markets, the custodial bridge balance
//! and the bridge params.
//!
//! ## Initialization Sequence
//!
//! 1. Build an empty `AppState` with the genesis bridge params
//! 2. Fund the custodial bridge account
//! 3. Create every genesis market, in order (ids are assigned sequentially)
//! 4. Produce the height-0 indexer batch with the market-create events

pub mod builder;

pub use builder::{Genesis, GenesisBuilder, GenesisConfig, GenesisError, GenesisMarket};
