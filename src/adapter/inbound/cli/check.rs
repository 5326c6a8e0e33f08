//! Handler for the `check` command.

use std::path::Path;

use crate::error::Result;
use crate::infrastructure::config::Config;
use crate::port::outbound::notifier::signed_pct;

/// Load and validate the configuration, then print its effective values.
pub fn execute(config_path: &Path) -> Result<()> {
    let config = Config::load(config_path)?;
    let hundred = rust_decimal::Decimal::ONE_HUNDRED;

    println!("Configuration OK: {}", config_path.display());
    println!("  mode          {}", if config.dry_run { "dry-run" } else { "live" });
    println!("  database      {}", config.database);
    println!("  quote token   {} ({} decimals)", config.quote_token(), config.execution.quote_decimals);
    println!(
        "  trade size    {} (max {})",
        config.execution.trade_size,
        config.risk.capital * config.risk.max_exposure_pct
    );
    println!(
        "  exits         {} / {}",
        signed_pct(config.exit.take_profit_pct * hundred),
        signed_pct(-config.exit.stop_loss_pct * hundred)
    );
    if let Some(trailing) = config.exit.trailing_pct {
        println!("  trailing      {}", signed_pct(-trailing * hundred));
    }
    println!("  relay         {}", config.relay.base_url);
    println!("  discovery     {}", config.discovery.ws_url);
    println!(
        "  telegram      {}",
        if config.telegram.enabled { "enabled" } else { "disabled" }
    );
    Ok(())
}
