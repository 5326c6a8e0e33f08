//! Exit monitor.
//!
//! Periodically re-prices every open position and sells through the risk
//! gate once a take-profit, stop-loss or trailing-stop threshold is crossed.
//! A sell that is denied or fails leaves the position open; the next scan
//! tries again.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use rust_decimal::Decimal;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use super::ledger::PositionLedger;
use crate::application::execution::{RiskGatedExecutor, TradeOutcome};
use crate::domain::money::{quote_value, to_decimal, whole_units, with_slippage};
use crate::domain::{
    ExitReason, ExitThresholds, OrderLeg, PairId, Position, Price, Side, TokenAddress, TradeContext,
};
use crate::error::{Error, Result};
use crate::port::outbound::notifier::ClosedEvent;
use crate::port::{Clock, Event, NotifierRegistry, PriceSource};

/// Exit monitor settings.
#[derive(Debug, Clone)]
pub struct ExitSettings {
    pub thresholds: ExitThresholds,
    pub poll_interval: Duration,
    /// Asset every position is priced and sold against.
    pub quote_token: TokenAddress,
    pub quote_decimals: u32,
    /// Slippage tolerance applied to the expected sell proceeds.
    pub max_slippage: Decimal,
    /// Largest trade size the risk gate allows, in whole quote units.
    /// Sell contexts are capped here so an oversized position can still exit.
    pub max_trade_size: Decimal,
}

/// Counts from one scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub scanned: usize,
    /// No price this cycle.
    pub skipped: usize,
    pub closed: usize,
    /// Still open after the scan, including exits that were denied or failed.
    pub retained: usize,
}

/// Recurring task supervising open positions until exit.
pub struct ExitMonitor {
    ledger: Arc<PositionLedger>,
    gated: Arc<RiskGatedExecutor>,
    prices: Arc<dyn PriceSource>,
    notifiers: Arc<NotifierRegistry>,
    clock: Arc<dyn Clock>,
    settings: ExitSettings,
    /// Highest price seen per pair, for the trailing stop.
    peaks: DashMap<PairId, Price>,
}

impl ExitMonitor {
    #[must_use]
    pub fn new(
        ledger: Arc<PositionLedger>,
        gated: Arc<RiskGatedExecutor>,
        prices: Arc<dyn PriceSource>,
        notifiers: Arc<NotifierRegistry>,
        clock: Arc<dyn Clock>,
        settings: ExitSettings,
    ) -> Self {
        Self {
            ledger,
            gated,
            prices,
            notifiers,
            clock,
            settings,
            peaks: DashMap::new(),
        }
    }

    #[must_use]
    pub const fn settings(&self) -> &ExitSettings {
        &self.settings
    }

    /// Run scans on the poll interval until `shutdown` flips to `true`.
    ///
    /// A scan in progress always completes before the loop exits.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = tokio::time::interval(self.settings.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(
            poll_interval_ms = self.settings.poll_interval.as_millis() as u64,
            "Exit monitor started"
        );

        loop {
            if *shutdown.borrow() {
                break;
            }
            tokio::select! {
                result = shutdown.changed() => {
                    if result.is_err() {
                        break;
                    }
                }
                _ = interval.tick() => {
                    match self.scan_once().await {
                        Ok(summary) => debug!(
                            scanned = summary.scanned,
                            skipped = summary.skipped,
                            closed = summary.closed,
                            retained = summary.retained,
                            "Exit scan complete"
                        ),
                        Err(e) => error!(error = %e, "Exit scan failed"),
                    }
                }
            }
        }

        info!("Exit monitor stopped");
    }

    /// Scan every open position once.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the ledger cannot be read, or cannot be
    /// updated after a confirmed sell.
    pub async fn scan_once(&self) -> Result<ScanSummary> {
        self.gated.executor().gc();

        let positions = match self.ledger.list_all() {
            Ok(positions) => positions,
            Err(e) => {
                self.storage_failure("list", &e);
                return Err(e);
            }
        };
        self.peaks
            .retain(|pair, _| positions.iter().any(|p| p.pair() == pair));

        let mut summary = ScanSummary {
            scanned: positions.len(),
            ..ScanSummary::default()
        };

        for position in positions {
            let Some(price) = self.fetch_price(position.pair()).await else {
                summary.skipped += 1;
                continue;
            };

            let peak = self.observe_peak(&position, price);
            let Some(reason) = self.settings.thresholds.evaluate(&position, price, peak) else {
                summary.retained += 1;
                continue;
            };

            info!(
                pair = %position.pair(),
                reason = %reason,
                price = %price,
                entry = %position.avg_price(),
                "Exit threshold crossed"
            );
            if self.exit(&position, price, reason).await?.is_executed() {
                summary.closed += 1;
            } else {
                info!(pair = %position.pair(), "Exit deferred to next scan");
                summary.retained += 1;
            }
        }

        Ok(summary)
    }

    /// Sell one position now at the current quote, through the risk gate.
    ///
    /// Returns `Ok(None)` if the pair has no open position.
    ///
    /// # Errors
    ///
    /// Returns [`Error::QuoteUnavailable`] when no price can be fetched, or a
    /// storage error from the ledger.
    pub async fn close_position(&self, pair: &PairId) -> Result<Option<TradeOutcome>> {
        let Some(position) = self.ledger.get(pair)? else {
            return Ok(None);
        };
        let price = self
            .fetch_price(pair)
            .await
            .ok_or_else(|| Error::QuoteUnavailable {
                token: pair.to_string(),
                reason: "no quote from price source".into(),
            })?;
        self.exit(&position, price, ExitReason::Manual).await.map(Some)
    }

    async fn exit(&self, position: &Position, price: Price, reason: ExitReason) -> Result<TradeOutcome> {
        let now = self.clock.now();
        let context = self.sell_context(position, price, now);
        let leg = self.sell_leg(position, price);

        let outcome = self.gated.sell(context, leg).await;
        let TradeOutcome::Executed(handle) = &outcome else {
            return Ok(outcome);
        };

        if let Err(e) = self.ledger.remove(position.pair()) {
            self.storage_failure("remove", &e);
            return Err(e);
        }
        self.peaks.remove(position.pair());

        let pnl = position
            .pnl_at(price)
            .and_then(|pnl| whole_units(pnl, self.settings.quote_decimals));
        if let Some(pnl) = pnl {
            self.gated.gate().record_realized_pnl(pnl, now);
        }

        self.notifiers.notify_all(Event::PositionClosed(ClosedEvent {
            pair: position.pair().clone(),
            reason,
            threshold_pct: self.settings.thresholds.threshold_pct(reason),
            entry_price: position.avg_price(),
            exit_price: price,
            change_pct: position
                .change_pct(price)
                .map(|change| (change * Decimal::ONE_HUNDRED).normalize()),
            handle: handle.clone(),
        }));

        Ok(outcome)
    }

    fn sell_context(
        &self,
        position: &Position,
        price: Price,
        timestamp: chrono::DateTime<chrono::Utc>,
    ) -> TradeContext {
        // Sells only reduce exposure. A cost basis too large to represent is
        // oversized by definition.
        let trade_size = to_decimal(position.amount())
            .and_then(|amount| amount.checked_mul(position.avg_price()))
            .and_then(|cost| whole_units(cost, self.settings.quote_decimals))
            .map_or(self.settings.max_trade_size, |cost| {
                cost.min(self.settings.max_trade_size)
            });

        TradeContext {
            pair: position.pair().clone(),
            direction: Side::Sell,
            trade_size,
            current_price: price,
            last_price: Some(position.avg_price()),
            required_liquidity: Decimal::ZERO,
            observed_liquidity: Decimal::ZERO,
            max_slippage: self.settings.max_slippage,
            observed_slippage: Decimal::ZERO,
            observed_spread: Decimal::ZERO,
            not_honeypot: true,
            timestamp,
        }
    }

    fn sell_leg(&self, position: &Position, price: Price) -> OrderLeg {
        let min_out = quote_value(position.amount(), price)
            .and_then(|expected| with_slippage(expected, self.settings.max_slippage))
            .unwrap_or(0);
        OrderLeg {
            token_in: position.pair().token(),
            token_out: self.settings.quote_token.clone(),
            amount_in: position.amount(),
            min_out,
        }
    }

    async fn fetch_price(&self, pair: &PairId) -> Option<Price> {
        match self
            .prices
            .price(&pair.token(), &self.settings.quote_token)
            .await
        {
            Ok(Some(price)) if price > Decimal::ZERO => Some(price),
            Ok(_) => {
                debug!(pair = %pair, "No quote available, skipping this cycle");
                None
            }
            Err(e) => {
                warn!(pair = %pair, error = %e, "Quote lookup failed, skipping this cycle");
                None
            }
        }
    }

    fn observe_peak(&self, position: &Position, price: Price) -> Price {
        let mut peak = self
            .peaks
            .entry(position.pair().clone())
            .or_insert(position.avg_price());
        if price > *peak {
            *peak = price;
        }
        *peak
    }

    fn storage_failure(&self, operation: &'static str, error: &Error) {
        self.notifiers.notify_all(Event::StorageFailure {
            operation,
            error: error.to_string(),
        });
    }
}
