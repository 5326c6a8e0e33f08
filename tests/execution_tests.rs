//! Integration tests for the risk-gated execution path.

use std::sync::Arc;
use std::time::Duration;

use pairsniper::application::execution::{
    DedupConfig, ExecutorConfig, OrderExecutor, RiskGatedExecutor, TradeOutcome,
};
use pairsniper::application::risk::{RiskLimits, RiskManager};
use pairsniper::domain::{RiskOutcome, Side};
use pairsniper::error::ExecutionError;
use pairsniper::port::NotifierRegistry;
use pairsniper::testkit::clock::ManualClock;
use pairsniper::testkit::domain::{buy_leg, sell_leg, trade_context};
use pairsniper::testkit::exchange::ScriptedSubmitter;
use pairsniper::testkit::notifier::RecordingNotifier;

struct Rig {
    gated: RiskGatedExecutor,
    risk: Arc<RiskManager>,
    submitter: Arc<ScriptedSubmitter>,
    clock: Arc<ManualClock>,
    recorder: RecordingNotifier,
}

fn rig(dry_run: bool, limits: RiskLimits, submitter: ScriptedSubmitter) -> Rig {
    let clock = Arc::new(ManualClock::default());
    let submitter = Arc::new(submitter);
    let risk = Arc::new(RiskManager::new(limits));
    let recorder = RecordingNotifier::new();
    let mut notifiers = NotifierRegistry::new();
    notifiers.register(Box::new(recorder.clone()));

    let executor = Arc::new(OrderExecutor::new(
        submitter.clone(),
        &ExecutorConfig {
            dry_run,
            timeout: Duration::from_secs(1),
            dedup: DedupConfig {
                ttl_secs: 5,
                max_entries: 100,
            },
        },
        clock.clone(),
    ));
    let gated = RiskGatedExecutor::new(risk.clone(), executor, Arc::new(notifiers));
    Rig {
        gated,
        risk,
        submitter,
        clock,
        recorder,
    }
}

fn no_cooldown() -> RiskLimits {
    RiskLimits {
        cooldown_secs: 0,
        ..RiskLimits::default()
    }
}

#[tokio::test]
async fn denied_trade_never_reaches_submitter() {
    let r = rig(false, RiskLimits::default(), ScriptedSubmitter::succeeding());
    let mut context = trade_context("0xaaa", Side::Buy, r.clock.now());
    context.observed_liquidity = rust_decimal::Decimal::ZERO;

    let outcome = r.gated.buy(context, buy_leg("0xaaa")).await;

    assert_eq!(outcome.denial().map(|e| e.code()), Some("liquidity"));
    assert_eq!(r.submitter.calls(), 0);
    assert_eq!(r.risk.snapshot().trades_registered, 0);
    assert_eq!(r.recorder.len(), 1);
}

#[tokio::test]
async fn repeated_intent_inside_window_is_a_duplicate() {
    let r = rig(false, no_cooldown(), ScriptedSubmitter::succeeding());

    let first = r
        .gated
        .buy(trade_context("0xaaa", Side::Buy, r.clock.now()), buy_leg("0xaaa"))
        .await;
    let second = r
        .gated
        .buy(trade_context("0xaaa", Side::Buy, r.clock.now()), buy_leg("0xaaa"))
        .await;

    assert!(first.is_executed());
    assert_eq!(second, TradeOutcome::Duplicate);
    assert_eq!(r.submitter.calls(), 1);

    // The opposite direction is a different intent.
    let sell = r
        .gated
        .sell(trade_context("0xaaa", Side::Sell, r.clock.now()), sell_leg("0xaaa"))
        .await;
    assert!(sell.is_executed());

    r.clock.advance(chrono::Duration::seconds(6));
    let later = r
        .gated
        .buy(trade_context("0xaaa", Side::Buy, r.clock.now()), buy_leg("0xaaa"))
        .await;
    assert!(later.is_executed());
    assert_eq!(r.submitter.calls(), 3);
}

#[tokio::test]
async fn concurrent_identical_intents_submit_once() {
    let r = Arc::new(rig(false, no_cooldown(), ScriptedSubmitter::succeeding()));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let r = r.clone();
        handles.push(tokio::spawn(async move {
            r.gated
                .buy(trade_context("0xaaa", Side::Buy, r.clock.now()), buy_leg("0xaaa"))
                .await
        }));
    }
    let mut executed = 0;
    for handle in handles {
        if handle.await.unwrap().is_executed() {
            executed += 1;
        }
    }

    assert_eq!(executed, 1);
    assert_eq!(r.submitter.calls(), 1);
}

#[tokio::test]
async fn failures_build_a_loss_streak_that_halts_trading() {
    let r = rig(false, no_cooldown(), ScriptedSubmitter::failing("reverted"));

    for token in ["0x1", "0x2", "0x3"] {
        let outcome = r
            .gated
            .buy(trade_context(token, Side::Buy, r.clock.now()), buy_leg(token))
            .await;
        assert_eq!(
            outcome,
            TradeOutcome::Failed(ExecutionError::SubmissionFailed("reverted".into()))
        );
    }

    let halted = r
        .gated
        .buy(trade_context("0x4", Side::Buy, r.clock.now()), buy_leg("0x4"))
        .await;
    assert_eq!(halted.denial().map(|e| e.code()), Some("loss_streak"));
    assert_eq!(r.submitter.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn slow_submitter_times_out() {
    let r = rig(
        false,
        RiskLimits::default(),
        ScriptedSubmitter::succeeding().with_delay(Duration::from_secs(5)),
    );

    let outcome = r
        .gated
        .buy(trade_context("0xaaa", Side::Buy, r.clock.now()), buy_leg("0xaaa"))
        .await;

    assert_eq!(outcome, TradeOutcome::Failed(ExecutionError::Timeout { secs: 1 }));
    assert_eq!(r.risk.snapshot().loss_streak, 1);
}

#[tokio::test]
async fn dry_run_makes_the_same_risk_decisions() {
    async fn drive(r: &Rig) -> Vec<(RiskOutcome, &'static str)> {
        let now = r.clock.now();
        r.gated
            .buy(trade_context("0xaaa", Side::Buy, now), buy_leg("0xaaa"))
            .await;
        // Cooldown denial on the same pair and direction.
        r.gated
            .buy(trade_context("0xaaa", Side::Buy, now), buy_leg("0xaaa"))
            .await;
        let mut oversized = trade_context("0xbbb", Side::Buy, now);
        oversized.trade_size = rust_decimal::Decimal::TEN;
        r.gated.buy(oversized, buy_leg("0xbbb")).await;
        r.gated
            .sell(trade_context("0xaaa", Side::Sell, now), sell_leg("0xaaa"))
            .await;
        r.risk
            .events()
            .iter()
            .map(|e| (e.outcome(), e.reason()))
            .collect()
    }

    let live = rig(false, RiskLimits::default(), ScriptedSubmitter::succeeding());
    let dry = rig(true, RiskLimits::default(), ScriptedSubmitter::succeeding());

    let live_decisions = drive(&live).await;
    let dry_decisions = drive(&dry).await;

    assert_eq!(live_decisions, dry_decisions);
    assert_eq!(
        live_decisions.iter().map(|(_, reason)| *reason).collect::<Vec<_>>(),
        vec!["approved", "cooldown", "exposure", "approved"]
    );
    assert_eq!(live.submitter.calls(), 2);
    assert_eq!(dry.submitter.calls(), 0);
    assert_eq!(live.risk.snapshot(), dry.risk.snapshot());
}
