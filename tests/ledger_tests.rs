//! SQLite-backed ledger behavior across process restarts.

mod harness;

use harness::engine::{test_config, TestEngine};
use harness::temp_db::TempDb;
use pairsniper::application::position::PositionLedger;
use pairsniper::domain::PairId;
use pairsniper::testkit::exchange::{ScriptedSubmitter, StaticScreener};
use rust_decimal_macros::dec;

#[test]
fn positions_survive_reopen() {
    let db = TempDb::create();
    {
        let ledger = PositionLedger::new(db.open());
        ledger.upsert(PairId::from("0xaaa"), 1000, dec!(1.0)).unwrap();
        ledger
            .upsert(PairId::from("0xbbb"), u128::from(u64::MAX) * 4, dec!(0.000000000123))
            .unwrap();
    }

    let ledger = PositionLedger::new(db.open());
    let positions = ledger.list_all().unwrap();
    assert_eq!(positions.len(), 2);
    assert_eq!(positions[0].pair().as_str(), "0xaaa");
    assert_eq!(positions[1].amount(), u128::from(u64::MAX) * 4);
    assert_eq!(positions[1].avg_price(), dec!(0.000000000123));
}

#[test]
fn upsert_replaces_and_remove_is_idempotent() {
    let db = TempDb::create();
    let ledger = PositionLedger::new(db.open());
    let pair = PairId::from("0xaaa");

    ledger.upsert(pair.clone(), 1000, dec!(1.0)).unwrap();
    ledger.upsert(pair.clone(), 500, dec!(2.0)).unwrap();
    let position = ledger.get(&pair).unwrap().unwrap();
    assert_eq!(position.amount(), 500);
    assert_eq!(position.avg_price(), dec!(2.0));

    assert!(ledger.remove(&pair).unwrap());
    assert!(!ledger.remove(&pair).unwrap());
    assert!(ledger.get(&pair).unwrap().is_none());
}

#[test]
fn clear_all_empties_the_ledger() {
    let db = TempDb::create();
    let ledger = PositionLedger::new(db.open());
    for pair in ["0x1", "0x2", "0x3"] {
        ledger.upsert(PairId::from(pair), 1, dec!(1)).unwrap();
    }

    assert_eq!(ledger.clear_all().unwrap(), 3);
    assert!(ledger.list_all().unwrap().is_empty());
    assert_eq!(ledger.clear_all().unwrap(), 0);
}

#[tokio::test]
async fn restarted_engine_resumes_exits_from_disk() {
    let db = TempDb::create();
    PositionLedger::new(db.open())
        .upsert(PairId::from("0xaaa"), 1000, dec!(1.0))
        .unwrap();

    let t = TestEngine::build(
        &test_config(),
        db.open(),
        ScriptedSubmitter::succeeding(),
        StaticScreener::passing(),
    );
    assert_eq!(t.engine.executor.open_positions(), 1);

    t.prices.set("0xaaa", dec!(1.5));
    assert_eq!(t.engine.monitor.scan_once().await.unwrap().closed, 1);
    assert_eq!(t.engine.executor.open_positions(), 0);

    let reopened = PositionLedger::new(db.open());
    assert!(reopened.list_all().unwrap().is_empty());
}
