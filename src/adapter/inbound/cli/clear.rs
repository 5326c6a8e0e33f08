//! Handler for the `clear` command.

use std::path::Path;

use tracing::warn;

use crate::application::position::PositionLedger;
use crate::error::Result;
use crate::infrastructure::bootstrap::open_store;
use crate::infrastructure::config::Config;
use crate::infrastructure::lock::LedgerLock;

/// Execute the clear command. Returns the number of positions removed.
///
/// Refused while another process holds the ledger.
pub fn execute(config_path: &Path) -> Result<usize> {
    let config = Config::load(config_path)?;
    let _lock = LedgerLock::acquire(&config.database, "clear")?;
    let ledger = PositionLedger::new(open_store(&config)?);
    let removed = ledger.clear_all()?;
    warn!(removed, "Position ledger cleared");
    println!("Cleared {removed} position(s).");
    Ok(removed)
}
