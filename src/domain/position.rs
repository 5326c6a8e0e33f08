//! Open positions held by the engine.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::PairId;
use super::money::{quote_value, Amount, Price};

/// An open trade, keyed by pair.
///
/// At most one live position exists per pair. A position is only ever
/// replaced whole; there is no partial update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pair: PairId,
    amount: Amount,
    avg_price: Price,
}

impl Position {
    /// Create a new position.
    #[must_use]
    pub fn new(pair: PairId, amount: Amount, avg_price: Price) -> Self {
        Self {
            pair,
            amount,
            avg_price,
        }
    }

    /// The traded pair.
    #[must_use]
    pub const fn pair(&self) -> &PairId {
        &self.pair
    }

    /// Quantity held, in token base units.
    #[must_use]
    pub const fn amount(&self) -> Amount {
        self.amount
    }

    /// Entry price, quote base units per token base unit.
    #[must_use]
    pub const fn avg_price(&self) -> Price {
        self.avg_price
    }

    /// Price at or above which the position takes profit.
    #[must_use]
    pub fn take_profit_price(&self, take_profit_pct: Decimal) -> Price {
        self.avg_price * (Decimal::ONE + take_profit_pct)
    }

    /// Price at or below which the position is stopped out.
    #[must_use]
    pub fn stop_loss_price(&self, stop_loss_pct: Decimal) -> Price {
        self.avg_price * (Decimal::ONE - stop_loss_pct)
    }

    /// Entry cost in quote base units.
    #[must_use]
    pub fn cost_basis(&self) -> Option<Amount> {
        quote_value(self.amount, self.avg_price)
    }

    /// Relative move of `price` against entry (0.31 for +31%).
    #[must_use]
    pub fn change_pct(&self, price: Price) -> Option<Decimal> {
        if self.avg_price.is_zero() {
            return None;
        }
        price
            .checked_sub(self.avg_price)?
            .checked_div(self.avg_price)
    }

    /// Profit or loss in quote base units if sold at `price`.
    #[must_use]
    pub fn pnl_at(&self, price: Price) -> Option<Decimal> {
        let amount = super::money::to_decimal(self.amount)?;
        price.checked_sub(self.avg_price)?.checked_mul(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn position() -> Position {
        Position::new(PairId::from("X"), 1000, dec!(1.0))
    }

    #[test]
    fn thresholds_follow_entry_price() {
        let p = position();
        assert_eq!(p.take_profit_price(dec!(0.30)), dec!(1.30));
        assert_eq!(p.stop_loss_price(dec!(0.15)), dec!(0.85));
    }

    #[test]
    fn change_and_pnl() {
        let p = position();
        assert_eq!(p.change_pct(dec!(1.31)), Some(dec!(0.31)));
        assert_eq!(p.pnl_at(dec!(0.84)), Some(dec!(-160)));
        assert_eq!(p.cost_basis(), Some(1000));
    }

    #[test]
    fn zero_entry_price_has_no_change() {
        let p = Position::new(PairId::from("Z"), 10, Decimal::ZERO);
        assert_eq!(p.change_pct(dec!(1)), None);
    }
}
