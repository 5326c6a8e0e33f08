//! Exit triggers evaluated against open positions.

use std::fmt;

use rust_decimal::Decimal;

use super::money::Price;
use super::position::Position;

/// Why a position is being closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    TakeProfit,
    StopLoss,
    TrailingStop,
    Manual,
}

impl ExitReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TakeProfit => "take_profit",
            Self::StopLoss => "stop_loss",
            Self::TrailingStop => "trailing_stop",
            Self::Manual => "manual",
        }
    }

    /// True for exits that realize a gain by construction.
    #[must_use]
    pub const fn is_profit(self) -> bool {
        matches!(self, Self::TakeProfit)
    }
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Percent thresholds relative to entry price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitThresholds {
    pub take_profit_pct: Decimal,
    pub stop_loss_pct: Decimal,
    /// Trailing stop below the highest observed price; `None` disables it.
    pub trailing_pct: Option<Decimal>,
}

impl ExitThresholds {
    /// Decide whether `price` triggers an exit.
    ///
    /// Take-profit wins over stop-loss, which wins over the trailing stop.
    #[must_use]
    pub fn evaluate(&self, position: &Position, price: Price, peak: Price) -> Option<ExitReason> {
        if price >= position.take_profit_price(self.take_profit_pct) {
            return Some(ExitReason::TakeProfit);
        }
        if price <= position.stop_loss_price(self.stop_loss_pct) {
            return Some(ExitReason::StopLoss);
        }
        if let Some(trail) = self.trailing_pct {
            if price <= peak * (Decimal::ONE - trail) {
                return Some(ExitReason::TrailingStop);
            }
        }
        None
    }

    /// Signed threshold percent for display (`+30`, `-15`).
    #[must_use]
    pub fn threshold_pct(&self, reason: ExitReason) -> Option<Decimal> {
        let hundred = Decimal::ONE_HUNDRED;
        match reason {
            ExitReason::TakeProfit => Some((self.take_profit_pct * hundred).normalize()),
            ExitReason::StopLoss => Some((-self.stop_loss_pct * hundred).normalize()),
            ExitReason::TrailingStop => self.trailing_pct.map(|t| (-t * hundred).normalize()),
            ExitReason::Manual => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::id::PairId;
    use rust_decimal_macros::dec;

    fn thresholds(trailing_pct: Option<Decimal>) -> ExitThresholds {
        ExitThresholds {
            take_profit_pct: dec!(0.30),
            stop_loss_pct: dec!(0.15),
            trailing_pct,
        }
    }

    fn position() -> Position {
        Position::new(PairId::from("X"), 1000, dec!(1.0))
    }

    #[test]
    fn take_profit_and_stop_loss_boundaries() {
        let t = thresholds(None);
        let p = position();
        assert_eq!(t.evaluate(&p, dec!(1.31), dec!(1.0)), Some(ExitReason::TakeProfit));
        assert_eq!(t.evaluate(&p, dec!(1.30), dec!(1.0)), Some(ExitReason::TakeProfit));
        assert_eq!(t.evaluate(&p, dec!(0.85), dec!(1.0)), Some(ExitReason::StopLoss));
        assert_eq!(t.evaluate(&p, dec!(0.84), dec!(1.0)), Some(ExitReason::StopLoss));
        assert_eq!(t.evaluate(&p, dec!(1.10), dec!(1.0)), None);
    }

    #[test]
    fn trailing_stop_follows_peak() {
        let t = thresholds(Some(dec!(0.10)));
        let p = position();
        assert_eq!(t.evaluate(&p, dec!(1.10), dec!(1.25)), Some(ExitReason::TrailingStop));
        assert_eq!(t.evaluate(&p, dec!(1.20), dec!(1.25)), None);
    }

    #[test]
    fn threshold_percent_is_signed() {
        let t = thresholds(Some(dec!(0.05)));
        assert_eq!(t.threshold_pct(ExitReason::TakeProfit).unwrap().to_string(), "30");
        assert_eq!(t.threshold_pct(ExitReason::StopLoss).unwrap().to_string(), "-15");
        assert_eq!(t.threshold_pct(ExitReason::TrailingStop).unwrap().to_string(), "-5");
        assert_eq!(t.threshold_pct(ExitReason::Manual), None);
    }
}
