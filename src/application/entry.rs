//! Buy path for newly discovered pairs.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::application::execution::{RiskGatedExecutor, TradeOutcome};
use crate::application::position::PositionLedger;
use crate::domain::money::{amount_for, to_base_units, with_slippage};
use crate::domain::{NewPair, OrderLeg, PairId, Side, TokenAddress, TradeContext};
use crate::error::Result;
use crate::port::outbound::notifier::OpenedEvent;
use crate::port::{Clock, Event, NotifierRegistry, PairScreener, PriceSource};

/// Sizing and tolerances for entries.
#[derive(Debug, Clone)]
pub struct EntrySettings {
    pub quote_token: TokenAddress,
    pub quote_decimals: u32,
    /// Quote spent per entry, in whole units.
    pub trade_size: Decimal,
    /// Minimum pool liquidity, in whole quote units.
    pub required_liquidity: Decimal,
    pub max_slippage: Decimal,
}

/// Turns discovered pairs into risk-gated buys and records the fills.
pub struct EntryHandler {
    gated: Arc<RiskGatedExecutor>,
    ledger: Arc<PositionLedger>,
    prices: Arc<dyn PriceSource>,
    screener: Arc<dyn PairScreener>,
    notifiers: Arc<NotifierRegistry>,
    clock: Arc<dyn Clock>,
    settings: EntrySettings,
}

impl EntryHandler {
    #[must_use]
    pub fn new(
        gated: Arc<RiskGatedExecutor>,
        ledger: Arc<PositionLedger>,
        prices: Arc<dyn PriceSource>,
        screener: Arc<dyn PairScreener>,
        notifiers: Arc<NotifierRegistry>,
        clock: Arc<dyn Clock>,
        settings: EntrySettings,
    ) -> Self {
        Self {
            gated,
            ledger,
            prices,
            screener,
            notifiers,
            clock,
            settings,
        }
    }

    /// Try to enter a newly discovered pair.
    ///
    /// Returns `Ok(None)` when the pair is skipped before reaching the risk
    /// gate: it does not trade against the quote token, or no price or
    /// screening figures are available.
    ///
    /// # Errors
    ///
    /// Returns a storage error if a confirmed buy cannot be recorded.
    pub async fn on_new_pair(&self, new_pair: NewPair) -> Result<Option<TradeOutcome>> {
        let Some(target) = new_pair.target_token(&self.settings.quote_token).cloned() else {
            debug!(pair = %new_pair.pair, "Pair does not trade against the quote token");
            return Ok(None);
        };
        let pair = PairId::from(&target);

        let price = match self.prices.price(&target, &self.settings.quote_token).await {
            Ok(Some(price)) if price > Decimal::ZERO => price,
            Ok(_) => {
                info!(pair = %pair, "No quote for new pair, skipping");
                return Ok(None);
            }
            Err(e) => {
                warn!(pair = %pair, error = %e, "Quote lookup failed, skipping");
                return Ok(None);
            }
        };

        let screening = match self.screener.screen(&new_pair, &target).await {
            Ok(Some(screening)) => screening,
            Ok(None) => {
                info!(pair = %pair, "No screening data for new pair, skipping");
                return Ok(None);
            }
            Err(e) => {
                warn!(pair = %pair, error = %e, "Screening failed, skipping");
                return Ok(None);
            }
        };

        let last_price = self.ledger.get(&pair)?.map(|p| p.avg_price());

        let amount_in = to_base_units(self.settings.trade_size, self.settings.quote_decimals);
        let expected_out = amount_in.and_then(|amount| amount_for(amount, price));
        let (Some(amount_in), Some(expected_out)) = (amount_in, expected_out) else {
            warn!(pair = %pair, price = %price, "Trade size does not fit base units, skipping");
            return Ok(None);
        };
        let min_out = with_slippage(expected_out, self.settings.max_slippage).unwrap_or(0);

        let context = TradeContext {
            pair: pair.clone(),
            direction: Side::Buy,
            trade_size: self.settings.trade_size,
            current_price: price,
            last_price,
            required_liquidity: self.settings.required_liquidity,
            observed_liquidity: screening.liquidity,
            max_slippage: self.settings.max_slippage,
            observed_slippage: screening.slippage,
            observed_spread: screening.spread,
            not_honeypot: screening.not_honeypot,
            timestamp: self.clock.now(),
        };
        let leg = OrderLeg {
            token_in: self.settings.quote_token.clone(),
            token_out: target,
            amount_in,
            min_out,
        };

        let outcome = self.gated.buy(context, leg).await;
        if let TradeOutcome::Executed(handle) = &outcome {
            if let Err(e) = self.ledger.upsert(pair.clone(), expected_out, price) {
                self.notifiers.notify_all(Event::StorageFailure {
                    operation: "upsert",
                    error: e.to_string(),
                });
                return Err(e);
            }
            self.notifiers.notify_all(Event::PositionOpened(OpenedEvent {
                pair,
                amount: expected_out,
                price,
                handle: handle.clone(),
            }));
        }

        Ok(Some(outcome))
    }
}
