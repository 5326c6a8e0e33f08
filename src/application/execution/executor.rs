//! Order submission with deduplication and dry-run support.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use super::dedup::{DedupConfig, IntentDeduplicator};
use crate::domain::{ExecutionHandle, Side, TradeIntent, SIMULATED_PREFIX};
use crate::error::ExecutionError;
use crate::port::{Clock, OrderSubmitter};

/// Executor settings.
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Synthesize handles instead of calling the submitter.
    pub dry_run: bool,
    /// How long to wait on the submitter before giving up.
    pub timeout: Duration,
    pub dedup: DedupConfig,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            dry_run: false,
            timeout: Duration::from_secs(30),
            dedup: DedupConfig::default(),
        }
    }
}

/// Result of a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The order went out (or was simulated).
    Executed(ExecutionHandle),
    /// The same intent was submitted within the dedup window; nothing was sent.
    Duplicate,
    /// Submission was attempted and failed.
    Failed(ExecutionError),
}

impl SubmitOutcome {
    /// The execution handle, if the order went out.
    #[must_use]
    pub const fn handle(&self) -> Option<&ExecutionHandle> {
        match self {
            Self::Executed(handle) => Some(handle),
            Self::Duplicate | Self::Failed(_) => None,
        }
    }
}

/// Submits trade intents, at most once per intent identity per window.
///
/// Never touches the position ledger; callers record positions once they
/// hold a handle.
pub struct OrderExecutor {
    submitter: Arc<dyn OrderSubmitter>,
    dedup: IntentDeduplicator,
    clock: Arc<dyn Clock>,
    dry_run: bool,
    timeout: Duration,
    open_positions: AtomicUsize,
}

impl OrderExecutor {
    #[must_use]
    pub fn new(
        submitter: Arc<dyn OrderSubmitter>,
        config: &ExecutorConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            submitter,
            dedup: IntentDeduplicator::new(&config.dedup, Arc::clone(&clock)),
            clock,
            dry_run: config.dry_run,
            timeout: config.timeout,
            open_positions: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub const fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Number of positions the executor believes are open.
    #[must_use]
    pub fn open_positions(&self) -> usize {
        self.open_positions.load(Ordering::SeqCst)
    }

    /// Seed the open-position counter, typically from the ledger at startup.
    pub fn seed_open_positions(&self, count: usize) {
        self.open_positions.store(count, Ordering::SeqCst);
    }

    /// Garbage-collect the dedup cache.
    pub fn gc(&self) {
        self.dedup.gc();
    }

    /// Submit an intent.
    ///
    /// Execution failures come back as [`SubmitOutcome::Failed`]; they are
    /// never returned as errors.
    pub async fn submit(&self, intent: TradeIntent) -> SubmitOutcome {
        let key = intent.key();
        if self.dedup.check_and_record(key.clone()) {
            info!(intent = %key, "Duplicate intent skipped");
            return SubmitOutcome::Duplicate;
        }

        if self.dry_run {
            let handle = self.simulated_handle(&intent);
            info!(intent = %key, handle = %handle, "Dry-run order simulated");
            self.record_fill(intent.side);
            return SubmitOutcome::Executed(handle);
        }

        match tokio::time::timeout(self.timeout, self.submitter.submit(&intent)).await {
            Ok(Ok(handle)) => {
                info!(intent = %key, handle = %handle, "Order submitted");
                self.record_fill(intent.side);
                SubmitOutcome::Executed(handle)
            }
            Ok(Err(err)) => {
                error!(intent = %key, error = %err, "Order submission failed");
                SubmitOutcome::Failed(err)
            }
            Err(_) => {
                let err = ExecutionError::Timeout {
                    secs: self.timeout.as_secs(),
                };
                error!(intent = %key, error = %err, "Order submission timed out");
                SubmitOutcome::Failed(err)
            }
        }
    }

    /// `dryrun-{side}-{token}-{millis}`, where token is the non-quote side.
    fn simulated_handle(&self, intent: &TradeIntent) -> ExecutionHandle {
        let token = match intent.side {
            Side::Buy => &intent.token_out,
            Side::Sell => &intent.token_in,
        };
        ExecutionHandle::new(format!(
            "{SIMULATED_PREFIX}{}-{}-{}",
            intent.side,
            token,
            self.clock.now().timestamp_millis()
        ))
    }

    fn record_fill(&self, side: Side) {
        match side {
            Side::Buy => {
                self.open_positions.fetch_add(1, Ordering::SeqCst);
            }
            Side::Sell => {
                let _ = self
                    .open_positions
                    .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                        Some(n.saturating_sub(1))
                    });
            }
        }
    }
}
