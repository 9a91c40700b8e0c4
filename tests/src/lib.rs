//! # Exchange-Chain Test Suite
//!
//! Cross-module block flows: keepers, indexer stream and block driver
//! exercised together through `node-runtime`.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── price_flows.rs    # Oracle markets through full blocks
//!     ├── bridge_flows.rs   # Acknowledge, delay, complete
//!     └── indexer_flows.rs  # Ordering, atomicity, determinism
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p xc-tests
//! cargo test -p xc-tests integration::bridge_flows::
//! ```

pub mod integration;
