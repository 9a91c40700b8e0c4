//! # Adapters
//!
//! Ledger and daemon-facing implementations.

pub mod in_memory_bank;
pub mod recognized_event_cache;

pub use in_memory_bank::InMemoryBank;
pub use recognized_event_cache::{RecognizeError, RecognizeOutcome, RecognizedEventCache};
