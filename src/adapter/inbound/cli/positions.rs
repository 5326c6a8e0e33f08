//! Handler for the `positions` command.

use std::path::Path;

use tabled::{Table, Tabled};

use crate::application::position::PositionLedger;
use crate::domain::Position;
use crate::error::Result;
use crate::infrastructure::bootstrap::open_store;
use crate::infrastructure::config::Config;

#[derive(Tabled)]
struct PositionRow {
    #[tabled(rename = "Pair")]
    pair: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Entry")]
    entry: String,
    #[tabled(rename = "Take Profit")]
    take_profit: String,
    #[tabled(rename = "Stop Loss")]
    stop_loss: String,
}

fn row(position: &Position, config: &Config) -> PositionRow {
    PositionRow {
        pair: position.pair().to_string(),
        amount: position.amount().to_string(),
        entry: position.avg_price().normalize().to_string(),
        take_profit: position
            .take_profit_price(config.exit.take_profit_pct)
            .normalize()
            .to_string(),
        stop_loss: position
            .stop_loss_price(config.exit.stop_loss_pct)
            .normalize()
            .to_string(),
    }
}

/// Render the ledger as a table, or a one-line notice when it is empty.
#[must_use]
pub fn render(positions: &[Position], config: &Config) -> String {
    if positions.is_empty() {
        return "No open positions.".to_string();
    }
    let rows: Vec<_> = positions.iter().map(|p| row(p, config)).collect();
    Table::new(rows).to_string()
}

/// Execute the positions command.
pub fn execute(config_path: &Path) -> Result<()> {
    let config = Config::load(config_path)?;
    let ledger = PositionLedger::new(open_store(&config)?);
    let positions = ledger.list_all()?;
    println!("{}", render(&positions, &config));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::domain::position;
    use rust_decimal_macros::dec;

    #[test]
    fn renders_thresholds_per_position() {
        let table = render(&[position("0xabc", 1000, dec!(1.0))], &Config::default());
        assert!(table.contains("Take Profit"));
        assert!(table.contains("0xabc"));
        assert!(table.contains("1.3"));
        assert!(table.contains("0.85"));
    }

    #[test]
    fn empty_ledger_has_notice() {
        assert_eq!(render(&[], &Config::default()), "No open positions.");
    }
}
