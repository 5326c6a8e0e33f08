//! Handler for the `close` command.

use std::path::Path;

use crate::adapter::inbound::cli::command::CloseArgs;
use crate::application::execution::TradeOutcome;
use crate::domain::PairId;
use crate::error::Result;
use crate::infrastructure::bootstrap::{
    build_engine, build_notifier_registry, open_store, relay_collaborators,
};
use crate::infrastructure::config::Config;
use crate::infrastructure::lock::LedgerLock;

/// Execute the close command.
///
/// The sell goes through the same risk gate as automatic exits. The audit
/// report for this process is printed afterwards. Refused while another
/// process holds the ledger.
pub async fn execute(config_path: &Path, args: &CloseArgs) -> Result<()> {
    let config = Config::load(config_path)?;
    config.init_logging();

    let _lock = LedgerLock::acquire(&config.database, "close")?;
    let store = open_store(&config)?;
    let collaborators = relay_collaborators(&config, store)?;
    let engine = build_engine(&config, collaborators, build_notifier_registry(&config))?;

    let pair = PairId::from(args.pair.trim().to_ascii_lowercase());
    match engine.monitor.close_position(&pair).await? {
        None => println!("No open position for {pair}."),
        Some(TradeOutcome::Executed(handle)) => println!("Closed {pair}: {handle}"),
        Some(TradeOutcome::Denied(err)) => println!("Close of {pair} blocked: {err}"),
        Some(TradeOutcome::Duplicate) => {
            println!("Close of {pair} skipped: same order submitted moments ago");
        }
        Some(TradeOutcome::Failed(err)) => println!("Close of {pair} failed: {err}"),
    }

    println!();
    println!("{}", engine.risk.report(args.verbose));
    Ok(())
}
