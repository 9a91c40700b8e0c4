//! # Shared Types Crate
//!
//! Primitive types used across every Exchange-Chain crate.
//!
//! ## Contents
//!
//! - **Addresses**: 20-byte account identities and their EIP-55 checksummed
//!   string form, plus deterministic module account derivation.
//! - **Coins**: denom + signed amount, with the syntactic checks every
//!   ledger mutation depends on.
//! - **Authority**: the explicit allow-list of identities permitted to mutate
//!   governance-controlled parameters.
//! - **Rate limiting**: token bucket guarding daemon ingestion points.

pub mod address;
pub mod authority;
pub mod coin;
pub mod errors;
pub mod rate_limiter;

pub use address::{decode_address, encode_address, module_address, Address};
pub use authority::AuthoritySet;
pub use coin::{validate_denom, Coin};
pub use errors::*;
pub use rate_limiter::RateLimiter;

/// A 32-byte hash.
pub type Hash = [u8; 32];

/// Block height on the native chain.
pub type BlockHeight = u64;
