//! CLI smoke tests against the built binary.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use pairsniper::application::position::PositionLedger;
use pairsniper::infrastructure::bootstrap::open_store;
use pairsniper::infrastructure::config::Config;
use pairsniper::infrastructure::lock::{lock_path, LedgerLock};
use predicates::prelude::*;
use rust_decimal_macros::dec;
use tempfile::TempDir;

fn write_config(dir: &Path, extra: &str) -> PathBuf {
    let db = dir.join("ledger.db");
    let path = dir.join("config.toml");
    let content = format!("database = {:?}\ndry_run = true\n{extra}", db.display().to_string());
    std::fs::write(&path, content).unwrap();
    path
}

fn pairsniper() -> Command {
    Command::cargo_bin("pairsniper").unwrap()
}

#[test]
fn check_reports_effective_settings() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), "");

    pairsniper()
        .args(["check", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration OK"))
        .stdout(predicate::str::contains("dry-run"))
        .stdout(predicate::str::contains("+30% / -15%"));
}

#[test]
fn check_rejects_invalid_config() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), "[risk]\ncapital = 0\n");

    pairsniper()
        .args(["check", "--config"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value for capital"));
}

#[test]
fn positions_lists_the_ledger() {
    let dir = TempDir::new().unwrap();
    let config_path = write_config(dir.path(), "");

    pairsniper()
        .args(["positions", "--config"])
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("No open positions."));

    let config = Config::load(&config_path).unwrap();
    let ledger = PositionLedger::new(open_store(&config).unwrap());
    ledger.upsert("0xabc".into(), 1000, dec!(1.0)).unwrap();

    pairsniper()
        .args(["positions", "--config"])
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("0xabc"))
        .stdout(predicate::str::contains("Take Profit"));
}

#[test]
fn clear_requires_confirmation() {
    let dir = TempDir::new().unwrap();
    let config_path = write_config(dir.path(), "");
    let config = Config::load(&config_path).unwrap();
    PositionLedger::new(open_store(&config).unwrap())
        .upsert("0xabc".into(), 1000, dec!(1.0))
        .unwrap();

    pairsniper()
        .args(["clear", "--config"])
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--yes"));

    pairsniper()
        .args(["clear", "--yes", "--config"])
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleared 1 position(s)."));

    let ledger = PositionLedger::new(open_store(&config).unwrap());
    assert!(ledger.list_all().unwrap().is_empty());
}

#[test]
fn close_and_clear_refuse_a_ledger_in_use() {
    let dir = TempDir::new().unwrap();
    let config_path = write_config(dir.path(), "");
    let config = Config::load(&config_path).unwrap();
    PositionLedger::new(open_store(&config).unwrap())
        .upsert("0xabc".into(), 1000, dec!(1.0))
        .unwrap();
    let lock = LedgerLock::acquire(&config.database, "run").unwrap();

    pairsniper()
        .args(["close", "0xabc", "--config"])
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("in use by `run`"));

    pairsniper()
        .args(["clear", "--yes", "--config"])
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("in use by `run`"));

    let ledger = PositionLedger::new(open_store(&config).unwrap());
    assert_eq!(ledger.list_all().unwrap().len(), 1);

    drop(lock);
    pairsniper()
        .args(["clear", "--yes", "--config"])
        .arg(&config_path)
        .assert()
        .success();
    assert!(!lock_path(&config.database).exists());
}

#[test]
fn missing_subcommand_prints_usage() {
    pairsniper()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}
