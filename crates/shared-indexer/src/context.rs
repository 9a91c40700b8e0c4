//! # Block Context
//!
//! Carried through every state transition of a block: header data plus the
//! transient event log. The lifecycle driver owns exactly one context and
//! re-opens it for each height.

use crate::errors::IndexerError;
use crate::transient::TransientEventLog;

/// Which part of the block is currently executing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecPhase {
    /// Begin-block hooks.
    BeginBlock,
    /// Transaction at the given index.
    Transaction(u32),
    /// End-block hooks.
    EndBlock,
}

/// Execution context for one block.
#[derive(Debug, Clone)]
pub struct BlockContext {
    height: u64,
    time_ms: u64,
    phase: ExecPhase,
    log: TransientEventLog,
}

impl BlockContext {
    /// Context for a fresh block at `height`.
    pub fn new(height: u64, time_ms: u64) -> Self {
        Self {
            height,
            time_ms,
            phase: ExecPhase::BeginBlock,
            log: TransientEventLog::new(height),
        }
    }

    /// Advance to the next block. The previous block's log must be cleared.
    pub fn begin_block(&mut self, height: u64, time_ms: u64) -> Result<(), IndexerError> {
        self.log.open(height)?;
        self.height = height;
        self.time_ms = time_ms;
        self.phase = ExecPhase::BeginBlock;
        Ok(())
    }

    /// Current block height.
    pub fn height(&self) -> u64 {
        self.height
    }

    /// Current block time (unix milliseconds).
    pub fn time_ms(&self) -> u64 {
        self.time_ms
    }

    /// Current execution phase.
    pub fn phase(&self) -> ExecPhase {
        self.phase
    }

    /// Switch execution phase.
    pub fn set_phase(&mut self, phase: ExecPhase) {
        self.phase = phase;
    }

    /// Read access to the block's event log.
    pub fn log(&self) -> &TransientEventLog {
        &self.log
    }

    /// Write access to the block's event log.
    pub fn log_mut(&mut self) -> &mut TransientEventLog {
        &mut self.log
    }
}
