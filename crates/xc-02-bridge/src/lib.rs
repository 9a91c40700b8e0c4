//! # XC-02 Bridge Completion
//!
//! Finalizes transfers observed on an external chain into the native ledger.
//!
//! **Subsystem ID:** 2
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Lifecycle
//!
//! ```text
//!  bridge daemon ──add_events──▶ RecognizedEventCache      (per validator)
//!                                        │ get_events_to_acknowledge
//!                                        ▼
//!                       acknowledge_bridges  ──▶ OBSERVED, scheduled at h + delay
//!                                        │
//!                       complete_due_bridges (end block at h + delay)
//!                                        ▼
//!                       VALIDATED ──complete_bridge──▶ COMPLETED | REJECTED
//! ```
//!
//! ## Safety Controls
//!
//! | Control | Effect |
//! |---------|--------|
//! | `is_disabled` | acknowledgement and completion fail |
//! | `delay_blocks` | window between acknowledgement and completion |
//! | consecutive ids | every event id consumed exactly once |
//! | validate-then-transfer | coin, address and balance checked before any mutation |

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod events;
pub mod ports;
pub mod service;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use adapters::{InMemoryBank, RecognizeError, RecognizeOutcome, RecognizedEventCache};
pub use domain::{
    invariant_acknowledgeable, invariant_bridging_enabled, BankError, BridgeError, BridgeEvent,
    BridgeEventInfo, BridgeEventStatus, BridgeOutcome, EventParams, SafetyParams,
};
pub use events::{BridgeCompletedEvent, BRIDGE_EVENT_VERSION};
pub use ports::{BankKeeper, BridgeApi};
pub use service::BridgeKeeper;

/// Module name; also seeds the custodial account address.
pub const MODULE_NAME: &str = "bridge";
