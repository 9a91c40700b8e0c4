//! # Block Lifecycle Driver
//!
//! Drives the keepers through `begin_block -> apply_transaction* ->
//! end_block -> commit` and owns the block context.
//!
//! ## Atomicity
//!
//! ```text
//!  committed ──clone──▶ pending ──clone──▶ tx branch
//!      ▲                   ▲                  │ ok: becomes pending
//!      │                   └──────────────────┘ err: dropped, log rolled back
//!      │ commit: produce_block, send, swap in, clear log
//!      └──────────────── pending
//! ```
//!
//! - A failed user transaction discards its branch and log suffix and is
//!   reported in the block result.
//! - A failed proposer-injected message or end-block failure aborts the
//!   block: pending state and the log are dropped, committed state is
//!   untouched, and the same height may be retried.

mod proposer;


pub use proposer::propose_injected_msgs;

use shared_indexer::{BlockContext, ExecPhase, IndexerBlock, IndexerError, IndexerEventManager};
use thiserror::Error;
use tracing::{debug, info, warn};
use xc_02_bridge::{BridgeApi, BridgeEventStatus, BridgeOutcome};
use xc_telemetry::{metric_inc, subsystem_span, ChainMetrics};

use crate::container::AppState;
use crate::handlers::{dispatch, HandlerError, Msg, MsgResponse};

/// Block driver errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DriverError {
    /// Heights must advance by exactly one.
    #[error("unexpected block height: expected {expected}, got {got}")]
    HeightMismatch {
        /// Next height.
        expected: u64,
        /// Height supplied.
        got: u64,
    },

    /// `begin_block` called while a block is open.
    #[error("block {0} is still in progress")]
    BlockInProgress(u64),

    /// Lifecycle call without an open block.
    #[error("no block in progress")]
    NoBlockInProgress,

    /// The block was aborted; nothing was committed.
    #[error("block {height} aborted: {reason}")]
    BlockAborted {
        /// Aborted height.
        height: u64,
        /// Cause.
        reason: String,
    },

    /// Event log failure outside any transaction.
    #[error(transparent)]
    Indexer(#[from] IndexerError),
}

/// Result of one transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxResult {
    /// Position in the block.
    pub index: u32,
    /// Message type name.
    pub msg_type: &'static str,
    /// Handler outcome; on error the transaction left no trace.
    pub result: Result<MsgResponse, HandlerError>,
}

impl TxResult {
    /// Whether the transaction was applied.
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// A committed block.
#[derive(Debug, Clone)]
pub struct BlockResult {
    /// Committed height.
    pub height: u64,
    /// Per-transaction results, in order.
    pub tx_results: Vec<TxResult>,
    /// Bridge events processed at end block.
    pub bridge_outcomes: Vec<BridgeOutcome>,
    /// Batch shipped to the indexer.
    pub indexer_block: IndexerBlock,
}

/// Single-threaded block lifecycle driver.
pub struct BlockDriver {
    committed: AppState,
    pending: Option<AppState>,
    ctx: BlockContext,
    indexer: IndexerEventManager,
    metrics: ChainMetrics,
    last_height: u64,
    tx_results: Vec<TxResult>,
    bridge_outcomes: Vec<BridgeOutcome>,
}

impl BlockDriver {
    /// Driver over `state`, committed at `last_height`.
    pub fn new(
        state: AppState,
        last_height: u64,
        indexer: IndexerEventManager,
        metrics: ChainMetrics,
    ) -> Self {
        metrics.current_height.set(height_gauge(last_height));
        Self {
            committed: state,
            pending: None,
            ctx: BlockContext::new(last_height, 0),
            indexer,
            metrics,
            last_height,
            tx_results: Vec::new(),
            bridge_outcomes: Vec::new(),
        }
    }

    /// Last committed state.
    pub fn committed(&self) -> &AppState {
        &self.committed
    }

    /// State of the open block, if any.
    pub fn pending(&self) -> Option<&AppState> {
        self.pending.as_ref()
    }

    /// Last committed height.
    pub fn last_height(&self) -> u64 {
        self.last_height
    }

    /// Current block context.
    pub fn context(&self) -> &BlockContext {
        &self.ctx
    }

    /// Open block `height`.
    pub fn begin_block(&mut self, height: u64, time_ms: u64) -> Result<(), DriverError> {
        let _span = subsystem_span!("begin_block", subsystem = "runtime", height = height).entered();

        if self.pending.is_some() {
            return Err(DriverError::BlockInProgress(self.ctx.height()));
        }
        let expected = self.last_height.saturating_add(1);
        if height != expected {
            return Err(DriverError::HeightMismatch {
                expected,
                got: height,
            });
        }
        self.ctx.begin_block(height, time_ms)?;
        self.pending = Some(self.committed.clone());
        self.tx_results.clear();
        self.bridge_outcomes.clear();
        debug!(height, time_ms, "[runtime] block opened");
        Ok(())
    }

    /// Execute one transaction on a branch of the pending state.
    ///
    /// Returns the transaction result for user messages, including
    /// failures. A failing proposer-injected message aborts the block.
    pub fn apply_transaction(&mut self, msg: Msg) -> Result<TxResult, DriverError> {
        let pending = self.pending.as_ref().ok_or(DriverError::NoBlockInProgress)?;
        let index = self.tx_results.len() as u32;
        let msg_type = msg.type_name();
        let injected = msg.is_proposer_injected();
        let candidates = match &msg {
            Msg::UpdateMarketPrices { updates } => updates.len(),
            _ => 0,
        };

        let _span = subsystem_span!(
            "apply_transaction",
            subsystem = "runtime",
            height = self.ctx.height(),
            tx = index,
            msg = msg_type
        )
        .entered();

        self.ctx.set_phase(ExecPhase::Transaction(index));
        let checkpoint = self.ctx.log().checkpoint();
        let mut branch = pending.clone();

        let result = match dispatch(&mut branch, &mut self.ctx, msg) {
            Ok(response) => {
                self.pending = Some(branch);
                self.record_response(&response, candidates);
                Ok(response)
            }
            Err(e) => {
                self.ctx.log_mut().rollback_to(checkpoint);
                if injected {
                    return Err(self.abort_block(format!("{} failed: {}", msg_type, e)));
                }
                warn!(tx = index, msg = msg_type, "[runtime] transaction failed: {}", e);
                metric_inc!(self.metrics.transactions_failed, &[msg_type]);
                Err(e)
            }
        };

        let tx_result = TxResult {
            index,
            msg_type,
            result,
        };
        self.tx_results.push(tx_result.clone());
        Ok(tx_result)
    }

    /// Run end-block hooks: complete every bridge event due at this height.
    pub fn end_block(&mut self) -> Result<Vec<BridgeOutcome>, DriverError> {
        let height = self.ctx.height();
        let _span = subsystem_span!("end_block", subsystem = "runtime", height = height).entered();

        let pending = self.pending.as_mut().ok_or(DriverError::NoBlockInProgress)?;
        self.ctx.set_phase(ExecPhase::EndBlock);

        let outcomes = match pending.bridge.complete_due_bridges(&mut self.ctx) {
            Ok(outcomes) => outcomes,
            Err(e) => return Err(self.abort_block(format!("end block failed: {}", e))),
        };

        for outcome in &outcomes {
            match (&outcome.status, outcome.reason) {
                (BridgeEventStatus::Completed, _) => metric_inc!(self.metrics.bridges_completed),
                (_, Some(reason)) => metric_inc!(self.metrics.bridges_rejected, &[reason]),
                (_, None) => {}
            }
        }
        self.bridge_outcomes = outcomes.clone();
        Ok(outcomes)
    }

    /// Produce and ship the indexer batch, then make the pending state
    /// the committed state and clear the log.
    pub fn commit(&mut self) -> Result<BlockResult, DriverError> {
        let height = self.ctx.height();
        let _span = subsystem_span!("commit", subsystem = "runtime", height = height).entered();

        let pending = self.pending.take().ok_or(DriverError::NoBlockInProgress)?;

        let indexer_block = self.indexer.produce_block(&self.ctx);
        self.indexer.send_onchain_data(indexer_block.clone());

        self.committed = pending;
        self.ctx.log_mut().clear();
        self.last_height = height;

        self.metrics
            .indexer_events_emitted
            .inc_by(indexer_block.events.len() as u64);
        metric_inc!(self.metrics.blocks_produced);
        self.metrics.current_height.set(height_gauge(height));

        let tx_results = std::mem::take(&mut self.tx_results);
        let failed = tx_results.iter().filter(|r| !r.is_ok()).count();
        info!(
            height,
            txs = tx_results.len(),
            failed,
            events = indexer_block.events.len(),
            "[runtime] block committed"
        );

        Ok(BlockResult {
            height,
            tx_results,
            bridge_outcomes: std::mem::take(&mut self.bridge_outcomes),
            indexer_block,
        })
    }

    /// Drop the open block. Committed state and height are unchanged.
    pub fn abort_block(&mut self, reason: String) -> DriverError {
        let height = self.ctx.height();
        self.pending = None;
        self.ctx.log_mut().clear();
        self.tx_results.clear();
        self.bridge_outcomes.clear();
        metric_inc!(self.metrics.blocks_aborted);
        warn!(height, "[runtime] block aborted: {}", reason);
        DriverError::BlockAborted { height, reason }
    }

    /// Run a whole block.
    pub fn execute_block(
        &mut self,
        height: u64,
        time_ms: u64,
        txs: Vec<Msg>,
    ) -> Result<BlockResult, DriverError> {
        self.begin_block(height, time_ms)?;
        for msg in txs {
            self.apply_transaction(msg)?;
        }
        self.end_block()?;
        self.commit()
    }

    fn record_response(&self, response: &MsgResponse, candidates: usize) {
        match response {
            MsgResponse::MarketCreated(_) => metric_inc!(self.metrics.markets_created),
            MsgResponse::PricesUpdated(applied) => {
                self.metrics.price_updates_applied.inc_by(applied.len() as u64);
                self.metrics
                    .price_updates_skipped
                    .inc_by(candidates.saturating_sub(applied.len()) as u64);
            }
            MsgResponse::BridgesAcknowledged(n) => {
                self.metrics.bridges_acknowledged.inc_by(*n as u64)
            }
            MsgResponse::MarketParamUpdated(_) | MsgResponse::ParamsUpdated => {}
        }
    }
}

fn height_gauge(height: u64) -> i64 {
    i64::try_from(height).unwrap_or(i64::MAX)
}
