//! Risk-gated execution: the only path trading logic uses to place orders.

use std::sync::Arc;

use tracing::info;

use super::executor::{OrderExecutor, SubmitOutcome};
use crate::domain::{ExecutionHandle, OrderLeg, Side, TradeContext, TradeIntent};
use crate::error::{ExecutionError, RiskError};
use crate::port::outbound::notifier::{BlockedEvent, FailedEvent, TradeEvent};
use crate::port::{Event, NotifierRegistry, RiskCheckResult, RiskGate};

/// Result of a risk-gated trade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TradeOutcome {
    /// The order went out.
    Executed(ExecutionHandle),
    /// The risk policy said no; nothing was submitted.
    Denied(RiskError),
    /// Same intent already submitted within the dedup window.
    Duplicate,
    /// Submission was attempted and failed.
    Failed(ExecutionError),
}

impl TradeOutcome {
    /// The execution handle, if the order went out.
    #[must_use]
    pub const fn handle(&self) -> Option<&ExecutionHandle> {
        match self {
            Self::Executed(handle) => Some(handle),
            Self::Denied(_) | Self::Duplicate | Self::Failed(_) => None,
        }
    }

    #[must_use]
    pub const fn is_executed(&self) -> bool {
        matches!(self, Self::Executed(_))
    }

    /// The denial, if the risk policy blocked the trade.
    #[must_use]
    pub const fn denial(&self) -> Option<&RiskError> {
        match self {
            Self::Denied(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SubmitOutcome> for TradeOutcome {
    fn from(outcome: SubmitOutcome) -> Self {
        match outcome {
            SubmitOutcome::Executed(handle) => Self::Executed(handle),
            SubmitOutcome::Duplicate => Self::Duplicate,
            SubmitOutcome::Failed(err) => Self::Failed(err),
        }
    }
}

/// Composes the risk gate and the order executor.
///
/// Every caller (entry handler, exit monitor, manual close) trades through
/// one instance of this type, so there is exactly one enforcement path.
pub struct RiskGatedExecutor {
    gate: Arc<dyn RiskGate>,
    executor: Arc<OrderExecutor>,
    notifiers: Arc<NotifierRegistry>,
}

impl RiskGatedExecutor {
    #[must_use]
    pub fn new(
        gate: Arc<dyn RiskGate>,
        executor: Arc<OrderExecutor>,
        notifiers: Arc<NotifierRegistry>,
    ) -> Self {
        Self {
            gate,
            executor,
            notifiers,
        }
    }

    #[must_use]
    pub fn gate(&self) -> &Arc<dyn RiskGate> {
        &self.gate
    }

    #[must_use]
    pub fn executor(&self) -> &Arc<OrderExecutor> {
        &self.executor
    }

    /// Buy through the risk gate. The context's direction is forced to buy.
    pub async fn buy(&self, context: TradeContext, leg: OrderLeg) -> TradeOutcome {
        self.trade(Side::Buy, context, leg).await
    }

    /// Sell through the risk gate. The context's direction is forced to sell.
    pub async fn sell(&self, context: TradeContext, leg: OrderLeg) -> TradeOutcome {
        self.trade(Side::Sell, context, leg).await
    }

    async fn trade(&self, side: Side, context: TradeContext, leg: OrderLeg) -> TradeOutcome {
        let context = context.with_direction(side);

        if let RiskCheckResult::Rejected(err) = self.gate.can_trade(&context) {
            self.notifiers
                .notify_all(Event::TradeBlocked(BlockedEvent::new(&context.pair, side, &err)));
            return TradeOutcome::Denied(err);
        }

        let outcome = TradeOutcome::from(self.executor.submit(TradeIntent::new(side, leg)).await);

        // Every attempt counts toward cooldown and loss streak, not only fills.
        self.gate
            .register_trade(outcome.is_executed(), &context.pair, side, context.timestamp);

        match &outcome {
            TradeOutcome::Executed(handle) => {
                self.notifiers.notify_all(Event::TradeExecuted(TradeEvent {
                    pair: context.pair.clone(),
                    side,
                    handle: handle.clone(),
                }));
            }
            TradeOutcome::Failed(error) => {
                self.notifiers.notify_all(Event::TradeFailed(FailedEvent {
                    pair: context.pair.clone(),
                    side,
                    error: error.clone(),
                }));
            }
            TradeOutcome::Duplicate => {
                info!(pair = %context.pair, side = %side, "Trade skipped as duplicate");
            }
            TradeOutcome::Denied(_) => {}
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::execution::ExecutorConfig;
    use crate::application::risk::{RiskLimits, RiskManager};
    use crate::testkit::clock::ManualClock;
    use crate::testkit::domain::{buy_leg, trade_context};
    use crate::testkit::exchange::ScriptedSubmitter;
    use crate::testkit::notifier::RecordingNotifier;

    struct Fixture {
        risk: Arc<RiskManager>,
        submitter: Arc<ScriptedSubmitter>,
        notifier: RecordingNotifier,
        gated: RiskGatedExecutor,
        clock: Arc<ManualClock>,
    }

    fn fixture(submitter: ScriptedSubmitter) -> Fixture {
        let clock = Arc::new(ManualClock::default());
        let risk = Arc::new(RiskManager::new(RiskLimits::default()));
        let submitter = Arc::new(submitter);
        let executor = Arc::new(OrderExecutor::new(
            submitter.clone(),
            &ExecutorConfig::default(),
            clock.clone(),
        ));
        let notifier = RecordingNotifier::new();
        let mut registry = NotifierRegistry::new();
        registry.register(Box::new(notifier.clone()));
        let gated = RiskGatedExecutor::new(risk.clone(), executor, Arc::new(registry));
        Fixture {
            risk,
            submitter,
            notifier,
            gated,
            clock,
        }
    }

    #[tokio::test]
    async fn denied_trade_never_reaches_submitter() {
        let f = fixture(ScriptedSubmitter::succeeding());
        let mut ctx = trade_context("0xa", Side::Buy, f.clock.now());
        ctx.not_honeypot = false;

        let outcome = f.gated.buy(ctx, buy_leg("0xa")).await;
        assert_eq!(outcome, TradeOutcome::Denied(RiskError::Honeypot));
        assert_eq!(f.submitter.calls(), 0);
        assert_eq!(f.risk.snapshot().trades_registered, 0);
        assert!(matches!(f.notifier.events()[0], Event::TradeBlocked(_)));
    }

    #[tokio::test]
    async fn executed_trade_registers_success() {
        let f = fixture(ScriptedSubmitter::succeeding());
        let ctx = trade_context("0xa", Side::Sell, f.clock.now());

        // Direction comes from the call, not the context.
        let outcome = f.gated.buy(ctx, buy_leg("0xa")).await;
        assert!(outcome.is_executed());
        assert_eq!(f.submitter.intents()[0].side, Side::Buy);

        let snapshot = f.risk.snapshot();
        assert_eq!(snapshot.trades_registered, 1);
        assert_eq!(snapshot.trades_succeeded, 1);
        assert!(matches!(f.notifier.events()[0], Event::TradeExecuted(_)));
    }

    #[tokio::test]
    async fn failed_trade_registers_failure() {
        let f = fixture(ScriptedSubmitter::failing("nonce too low"));
        let ctx = trade_context("0xa", Side::Buy, f.clock.now());

        let outcome = f.gated.buy(ctx, buy_leg("0xa")).await;
        assert!(matches!(outcome, TradeOutcome::Failed(_)));
        assert_eq!(outcome.handle(), None);

        let snapshot = f.risk.snapshot();
        assert_eq!(snapshot.trades_failed, 1);
        assert_eq!(snapshot.loss_streak, 1);
        assert!(matches!(f.notifier.events()[0], Event::TradeFailed(_)));
    }
}
