//! # Domain Module
//!
//! Core domain types for Oracle Prices.

pub mod entities;
pub mod errors;
pub mod invariants;
pub mod smoothed;

pub use entities::*;
pub use errors::*;
pub use invariants::*;
pub use smoothed::*;
