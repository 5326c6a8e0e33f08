//! Exit monitor scenarios against an in-memory ledger.

mod harness;

use chrono::Duration;
use harness::engine::{test_config, TestEngine};
use pairsniper::application::execution::TradeOutcome;
use pairsniper::application::position::ScanSummary;
use pairsniper::domain::{ExitReason, PairId, Side};
use pairsniper::port::RiskGate;
use pairsniper::testkit::domain::{trade_context, QUOTE};
use rust_decimal_macros::dec;

fn engine_with_position(pair: &str) -> TestEngine {
    let t = TestEngine::new(&test_config());
    t.engine
        .ledger
        .upsert(PairId::from(pair), 1000, dec!(1.0))
        .unwrap();
    t
}

#[tokio::test]
async fn take_profit_closes_position() {
    let t = engine_with_position("0xaaa");
    t.prices.set("0xaaa", dec!(1.31));

    let summary = t.engine.monitor.scan_once().await.unwrap();

    assert_eq!(
        summary,
        ScanSummary {
            scanned: 1,
            skipped: 0,
            closed: 1,
            retained: 0
        }
    );
    assert!(t.engine.ledger.get(&PairId::from("0xaaa")).unwrap().is_none());

    let closed = t.closed_events();
    assert_eq!(closed.len(), 1);
    assert_eq!(closed[0].reason, ExitReason::TakeProfit);
    assert_eq!(closed[0].threshold_pct, Some(dec!(30)));
    assert_eq!(closed[0].change_pct, Some(dec!(31)));
    assert_eq!(closed[0].entry_price, dec!(1.0));
    assert_eq!(closed[0].exit_price, dec!(1.31));

    let intent = &t.submitter.intents()[0];
    assert_eq!(intent.side, Side::Sell);
    assert_eq!(intent.token_in.as_str(), "0xaaa");
    assert_eq!(intent.token_out.as_str(), QUOTE);
    assert_eq!(intent.amount_in, 1000);
    // 1310 quote base units less 5% slippage
    assert_eq!(intent.min_out, 1244);
}

#[tokio::test]
async fn stop_loss_closes_position_and_records_loss() {
    let t = engine_with_position("0xbbb");
    t.prices.set("0xbbb", dec!(0.84));

    let summary = t.engine.monitor.scan_once().await.unwrap();

    assert_eq!(summary.closed, 1);
    let closed = t.closed_events();
    assert_eq!(closed[0].reason, ExitReason::StopLoss);
    assert_eq!(closed[0].threshold_pct, Some(dec!(-15)));
    assert_eq!(closed[0].change_pct, Some(dec!(-16)));

    let snapshot = t.engine.risk.snapshot();
    assert!(snapshot.daily_realized_pnl < dec!(0));
    assert_eq!(snapshot.trades_succeeded, 1);
}

#[tokio::test]
async fn price_inside_band_keeps_position() {
    let t = engine_with_position("0xccc");
    t.prices.set("0xccc", dec!(1.10));

    let summary = t.engine.monitor.scan_once().await.unwrap();

    assert_eq!(summary.retained, 1);
    assert_eq!(summary.closed, 0);
    assert!(t.engine.ledger.get(&PairId::from("0xccc")).unwrap().is_some());
    assert_eq!(t.submitter.calls(), 0);
    assert!(t.closed_events().is_empty());
}

#[tokio::test]
async fn missing_quote_skips_position() {
    let t = engine_with_position("0xddd");

    let summary = t.engine.monitor.scan_once().await.unwrap();
    assert_eq!(summary.skipped, 1);

    t.prices.set("0xddd", dec!(1.31));
    t.prices.set_failing(true);
    let summary = t.engine.monitor.scan_once().await.unwrap();
    assert_eq!(summary.skipped, 1);
    assert_eq!(t.submitter.calls(), 0);
}

#[tokio::test]
async fn failed_sell_is_retried_on_a_later_scan() {
    let t = engine_with_position("0xeee");
    t.prices.set("0xeee", dec!(1.40));
    t.submitter.set_failure(Some("relay down"));

    let first = t.engine.monitor.scan_once().await.unwrap();
    assert_eq!(first.closed, 0);
    assert_eq!(first.retained, 1);
    assert!(t.engine.ledger.get(&PairId::from("0xeee")).unwrap().is_some());
    assert_eq!(t.engine.risk.snapshot().loss_streak, 1);

    // Still inside the sell cooldown: denied, not resubmitted.
    let second = t.engine.monitor.scan_once().await.unwrap();
    assert_eq!(second.retained, 1);
    assert_eq!(t.submitter.calls(), 1);
    assert_eq!(t.blocked_reasons(), vec!["cooldown"]);

    t.submitter.set_failure(None);
    t.clock.advance(Duration::seconds(31));
    let third = t.engine.monitor.scan_once().await.unwrap();
    assert_eq!(third.closed, 1);
    assert_eq!(t.submitter.calls(), 2);
    assert!(t.engine.ledger.get(&PairId::from("0xeee")).unwrap().is_none());
    assert_eq!(t.engine.risk.snapshot().loss_streak, 0);
}

#[tokio::test]
async fn exit_recovers_after_a_relay_outage() {
    let t = engine_with_position("0xaaa");
    t.prices.set("0xaaa", dec!(0.50));
    t.submitter.set_failure(Some("relay down"));

    for _ in 0..3 {
        let summary = t.engine.monitor.scan_once().await.unwrap();
        assert_eq!(summary.retained, 1);
        t.clock.advance(Duration::seconds(31));
    }
    assert_eq!(t.engine.risk.snapshot().loss_streak, 3);
    assert_eq!(t.submitter.calls(), 3);

    // New entries stay halted by the streak.
    let buy = t
        .engine
        .risk
        .can_trade(&trade_context("0xbbb", Side::Buy, t.clock.now()));
    assert_eq!(buy.rejection_error().map(|e| e.code()), Some("loss_streak"));

    t.submitter.set_failure(None);
    let summary = t.engine.monitor.scan_once().await.unwrap();
    assert_eq!(summary.closed, 1);
    assert!(t.engine.ledger.get(&PairId::from("0xaaa")).unwrap().is_none());
    assert_eq!(t.engine.risk.snapshot().loss_streak, 0);
}

#[tokio::test]
async fn stop_losses_keep_closing_past_the_daily_loss_limit() {
    let t = TestEngine::new(&test_config());
    // 0.1 quote each, the largest size the default limits allow.
    for pair in ["0x301", "0x302", "0x303"] {
        t.engine
            .ledger
            .upsert(PairId::from(pair), 100_000_000_000_000_000, dec!(1.0))
            .unwrap();
        t.prices.set(pair, dec!(0.10));
    }

    let summary = t.engine.monitor.scan_once().await.unwrap();

    assert_eq!(summary.closed, 3);
    assert!(t.engine.ledger.list_all().unwrap().is_empty());
    assert!(t.blocked_reasons().is_empty());
    // Three losses of 0.09 each, well past the 0.15 daily limit.
    assert_eq!(t.engine.risk.snapshot().daily_realized_pnl, dec!(-0.27));
    let buy = t
        .engine
        .risk
        .can_trade(&trade_context("0x304", Side::Buy, t.clock.now()));
    assert_eq!(buy.rejection_error().map(|e| e.code()), Some("daily_loss"));
}

#[tokio::test]
async fn exit_closes_after_the_daily_trade_count_is_spent() {
    let mut config = test_config();
    config.risk.max_trades_per_day = 1;
    let t = TestEngine::new(&config);
    t.engine
        .ledger
        .upsert(PairId::from("0x401"), 1000, dec!(1.0))
        .unwrap();
    t.engine
        .risk
        .register_trade(true, &PairId::from("0x401"), Side::Buy, t.clock.now());
    t.prices.set("0x401", dec!(1.50));

    let summary = t.engine.monitor.scan_once().await.unwrap();

    assert_eq!(summary.closed, 1);
    assert_eq!(t.engine.risk.snapshot().daily_trades, 2);
}

#[tokio::test]
async fn position_larger_than_the_trade_limit_still_exits() {
    let t = TestEngine::new(&test_config());
    // Cost basis of 5 quote against a 0.1 trade limit.
    t.engine
        .ledger
        .upsert(PairId::from("0x501"), 5_000_000_000_000_000_000, dec!(1.0))
        .unwrap();
    t.prices.set("0x501", dec!(2.0));

    let summary = t.engine.monitor.scan_once().await.unwrap();

    assert_eq!(summary.closed, 1);
    assert!(t.blocked_reasons().is_empty());
    let intent = &t.submitter.intents()[0];
    assert_eq!(intent.side, Side::Sell);
    assert_eq!(intent.amount_in, 5_000_000_000_000_000_000);
}

#[tokio::test]
async fn trailing_stop_follows_the_peak() {
    let mut config = test_config();
    config.exit.trailing_pct = Some(dec!(0.10));
    let t = TestEngine::new(&config);
    t.engine
        .ledger
        .upsert(PairId::from("0xfff"), 1000, dec!(1.0))
        .unwrap();

    t.prices.set("0xfff", dec!(1.25));
    assert_eq!(t.engine.monitor.scan_once().await.unwrap().retained, 1);

    // 10% under the 1.25 peak, still above entry.
    t.prices.set("0xfff", dec!(1.12));
    assert_eq!(t.engine.monitor.scan_once().await.unwrap().closed, 1);
    assert_eq!(t.closed_events()[0].reason, ExitReason::TrailingStop);
    assert_eq!(t.closed_events()[0].threshold_pct, Some(dec!(-10)));
}

#[tokio::test]
async fn manual_close_sells_through_the_gate() {
    let t = engine_with_position("0x111");

    let err = t
        .engine
        .monitor
        .close_position(&PairId::from("0x111"))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("quote unavailable"));

    t.prices.set("0x111", dec!(1.05));
    let outcome = t
        .engine
        .monitor
        .close_position(&PairId::from("0x111"))
        .await
        .unwrap();
    assert!(matches!(outcome, Some(TradeOutcome::Executed(_))));
    assert_eq!(t.closed_events()[0].reason, ExitReason::Manual);
    assert_eq!(t.closed_events()[0].threshold_pct, None);

    let again = t
        .engine
        .monitor
        .close_position(&PairId::from("0x111"))
        .await
        .unwrap();
    assert!(again.is_none());
}

#[tokio::test]
async fn dry_run_exit_closes_without_submitting() {
    let mut config = test_config();
    config.dry_run = true;
    let t = TestEngine::new(&config);
    t.engine
        .ledger
        .upsert(PairId::from("0x222"), 1000, dec!(1.0))
        .unwrap();
    t.prices.set("0x222", dec!(2.0));

    assert_eq!(t.engine.monitor.scan_once().await.unwrap().closed, 1);
    assert_eq!(t.submitter.calls(), 0);
    assert!(t.closed_events()[0].handle.is_simulated());
}
