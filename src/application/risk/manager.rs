//! Risk management service.
//!
//! Provides the pre-trade policy every order passes through. The whole
//! decision runs inside one critical section, so the cooldown check and the
//! cooldown stamp of an approval can never be split by a concurrent caller.

use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use tracing::{info, warn};

use super::report;
use crate::domain::{PairId, RiskEvent, RiskOutcome, Side, TradeContext, APPROVED_REASON};
use crate::error::RiskError;
use crate::port::inbound::risk::{RiskCheckResult, RiskGate};

/// Longest cooldown the manager will honor.
const MAX_COOLDOWN_SECS: u64 = 7 * 24 * 60 * 60;

/// Configured risk limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskLimits {
    /// Trading capital in whole quote units.
    pub capital: Decimal,
    /// Largest single trade as a fraction of capital.
    pub max_exposure_pct: Decimal,
    pub max_trades_per_day: u32,
    /// Consecutive failed trades after which trading stops.
    pub loss_streak_limit: u32,
    /// Realized daily loss, as a fraction of capital, after which trading stops.
    pub daily_loss_pct_limit: Decimal,
    /// Minimum spacing between trades on the same pair and direction.
    pub cooldown_secs: u64,
    /// How far above the last entry price a new buy may be.
    pub max_price_run_up_pct: Decimal,
}

impl RiskLimits {
    /// Largest trade size allowed, in whole quote units.
    #[must_use]
    pub fn max_trade_size(&self) -> Decimal {
        self.capital
            .checked_mul(self.max_exposure_pct)
            .unwrap_or(Decimal::MAX)
    }

    /// Realized loss that halts trading for the rest of the UTC day.
    #[must_use]
    pub fn daily_loss_limit(&self) -> Decimal {
        self.capital
            .checked_mul(self.daily_loss_pct_limit)
            .unwrap_or(Decimal::MAX)
    }
}

impl Default for RiskLimits {
    fn default() -> Self {
        Self {
            capital: Decimal::ONE,
            max_exposure_pct: Decimal::new(10, 2),
            max_trades_per_day: 10,
            loss_streak_limit: 3,
            daily_loss_pct_limit: Decimal::new(15, 2),
            cooldown_secs: 30,
            max_price_run_up_pct: Decimal::new(10, 2),
        }
    }
}

/// Point-in-time view of the manager's counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RiskSnapshot {
    /// UTC day the daily counters belong to.
    pub day: Option<NaiveDate>,
    pub daily_trades: u32,
    pub loss_streak: u32,
    pub daily_realized_pnl: Decimal,
    pub total_realized_pnl: Decimal,
    pub trades_registered: u64,
    pub trades_succeeded: u64,
    pub trades_failed: u64,
    pub released: usize,
    pub blocked: usize,
}

#[derive(Debug, Default)]
struct RiskState {
    cooldowns: HashMap<(PairId, Side), DateTime<Utc>>,
    day: Option<NaiveDate>,
    daily_trades: u32,
    daily_realized_pnl: Decimal,
    total_realized_pnl: Decimal,
    loss_streak: u32,
    trades_registered: u64,
    trades_succeeded: u64,
    events: Vec<RiskEvent>,
}

impl RiskState {
    /// Reset the daily counters once `timestamp` reaches a new UTC day.
    fn roll_day(&mut self, timestamp: DateTime<Utc>) {
        let today = timestamp.date_naive();
        if matches!(self.day, Some(day) if day >= today) {
            return;
        }
        self.day = Some(today);
        self.daily_trades = 0;
        self.daily_realized_pnl = Decimal::ZERO;
    }

    /// Whole seconds left on the cooldown for `key`, rounded up.
    fn cooldown_remaining(
        &self,
        key: &(PairId, Side),
        now: DateTime<Utc>,
        cooldown: Duration,
    ) -> Option<i64> {
        if cooldown <= Duration::zero() {
            return None;
        }
        let last = self.cooldowns.get(key)?;
        let elapsed = now.signed_duration_since(*last);
        if elapsed >= cooldown {
            return None;
        }
        let remaining_ms = (cooldown - elapsed).num_milliseconds();
        Some(((remaining_ms + 999) / 1000).max(1))
    }

    fn snapshot(&self) -> RiskSnapshot {
        let blocked = self.events.iter().filter(|e| e.is_blocked()).count();
        RiskSnapshot {
            day: self.day,
            daily_trades: self.daily_trades,
            loss_streak: self.loss_streak,
            daily_realized_pnl: self.daily_realized_pnl,
            total_realized_pnl: self.total_realized_pnl,
            trades_registered: self.trades_registered,
            trades_succeeded: self.trades_succeeded,
            trades_failed: self.trades_registered - self.trades_succeeded,
            released: self.events.len() - blocked,
            blocked,
        }
    }
}

/// Risk manager that validates trades before execution.
///
/// Checks run in a fixed order and the first failure is reported:
/// exposure, context sanity, price run-up (buys only), liquidity, honeypot,
/// cooldown, slippage, then for buys only daily trade count, loss streak
/// and daily loss.
///
/// Every decision appends one [`RiskEvent`] to an in-memory audit log.
pub struct RiskManager {
    limits: RiskLimits,
    cooldown: Duration,
    state: Mutex<RiskState>,
}

impl RiskManager {
    /// Create a new risk manager with the given limits.
    #[must_use]
    pub fn new(limits: RiskLimits) -> Self {
        let secs = i64::try_from(limits.cooldown_secs.min(MAX_COOLDOWN_SECS)).unwrap_or_default();
        Self {
            cooldown: Duration::seconds(secs),
            limits,
            state: Mutex::new(RiskState::default()),
        }
    }

    #[must_use]
    pub const fn limits(&self) -> &RiskLimits {
        &self.limits
    }

    /// Copy of the audit log, oldest first.
    #[must_use]
    pub fn events(&self) -> Vec<RiskEvent> {
        self.state.lock().events.clone()
    }

    #[must_use]
    pub fn snapshot(&self) -> RiskSnapshot {
        self.state.lock().snapshot()
    }

    /// Render the audit log as a human-readable report.
    ///
    /// Never fails; an empty log yields an explicit "no events" message.
    #[must_use]
    pub fn report(&self, verbose: bool) -> String {
        let state = self.state.lock();
        report::render(&state.events, &state.snapshot(), verbose)
    }

    fn evaluate(&self, state: &RiskState, context: &TradeContext) -> Result<(), RiskError> {
        let limits = &self.limits;

        let max_size = limits.max_trade_size();
        if context.trade_size > max_size {
            return Err(RiskError::ExposureLimitExceeded {
                size: context.trade_size,
                limit: max_size,
            });
        }

        if let Some(reason) = invalid_reason(context) {
            return Err(RiskError::InvalidContext { reason });
        }

        if context.direction == Side::Buy {
            if let Some(last) = context.last_price {
                let ceiling = (Decimal::ONE + limits.max_price_run_up_pct).checked_mul(last);
                if let Some(ceiling) = ceiling {
                    if context.current_price > ceiling {
                        return Err(RiskError::PriceRunUp {
                            current: context.current_price,
                            last,
                            ceiling,
                        });
                    }
                }
            }
        }

        if context.observed_liquidity < context.required_liquidity {
            return Err(RiskError::InsufficientLiquidity {
                observed: context.observed_liquidity,
                required: context.required_liquidity,
            });
        }

        if !context.not_honeypot {
            return Err(RiskError::Honeypot);
        }

        let key = (context.pair.clone(), context.direction);
        if let Some(remaining_secs) =
            state.cooldown_remaining(&key, context.timestamp, self.cooldown)
        {
            return Err(RiskError::CooldownActive { remaining_secs });
        }

        if context.observed_slippage > context.max_slippage {
            return Err(RiskError::SlippageTooHigh {
                observed: context.observed_slippage,
                max: context.max_slippage,
            });
        }

        // Entry budgets never block an exit.
        if context.direction == Side::Sell {
            return Ok(());
        }

        if state.daily_trades >= limits.max_trades_per_day {
            return Err(RiskError::DailyTradeLimit {
                count: state.daily_trades,
                limit: limits.max_trades_per_day,
            });
        }

        if state.loss_streak >= limits.loss_streak_limit {
            return Err(RiskError::LossStreak {
                streak: state.loss_streak,
                limit: limits.loss_streak_limit,
            });
        }

        let loss = (-state.daily_realized_pnl).max(Decimal::ZERO);
        let loss_limit = limits.daily_loss_limit();
        if loss > Decimal::ZERO && loss >= loss_limit {
            return Err(RiskError::DailyLossLimit {
                loss,
                limit: loss_limit,
            });
        }

        Ok(())
    }
}

/// Describe the first malformed figure in `context`, if any.
fn invalid_reason(context: &TradeContext) -> Option<String> {
    if context.trade_size <= Decimal::ZERO {
        return Some(format!("trade size {} must be positive", context.trade_size));
    }
    if context.current_price <= Decimal::ZERO {
        return Some(format!("price {} must be positive", context.current_price));
    }
    if let Some(last) = context.last_price {
        if last <= Decimal::ZERO {
            return Some(format!("last price {last} must be positive"));
        }
    }
    [
        ("required liquidity", context.required_liquidity),
        ("observed liquidity", context.observed_liquidity),
        ("max slippage", context.max_slippage),
        ("observed slippage", context.observed_slippage),
        ("spread", context.observed_spread),
    ]
    .into_iter()
    .find(|(_, value)| *value < Decimal::ZERO)
    .map(|(name, value)| format!("{name} {value} is negative"))
}

impl RiskGate for RiskManager {
    fn can_trade(&self, context: &TradeContext) -> RiskCheckResult {
        let mut state = self.state.lock();
        state.roll_day(context.timestamp);

        let key = (context.pair.clone(), context.direction);
        let remaining = state.cooldown_remaining(&key, context.timestamp, self.cooldown);
        let decision = self.evaluate(&state, context);

        let event = match &decision {
            Ok(()) => {
                state.cooldowns.insert(key, context.timestamp);
                info!(
                    pair = %context.pair,
                    direction = %context.direction,
                    size = %context.trade_size,
                    price = %context.current_price,
                    "Trade released by risk check"
                );
                RiskEvent::new(
                    RiskOutcome::Released,
                    APPROVED_REASON,
                    "all checks passed",
                    context.clone(),
                    remaining,
                )
            }
            Err(err) => {
                warn!(
                    pair = %context.pair,
                    direction = %context.direction,
                    reason = err.code(),
                    detail = %err,
                    "Trade blocked by risk check"
                );
                RiskEvent::new(
                    RiskOutcome::Blocked,
                    err.code(),
                    err.to_string(),
                    context.clone(),
                    remaining,
                )
            }
        };
        state.events.push(event);

        match decision {
            Ok(()) => RiskCheckResult::Approved,
            Err(err) => RiskCheckResult::Rejected(err),
        }
    }

    fn register_trade(&self, success: bool, pair: &PairId, direction: Side, timestamp: DateTime<Utc>) {
        let mut state = self.state.lock();
        state.roll_day(timestamp);

        let key = (pair.clone(), direction);
        let stamp = state
            .cooldowns
            .get(&key)
            .map_or(timestamp, |last| (*last).max(timestamp));
        state.cooldowns.insert(key, stamp);

        state.daily_trades = state.daily_trades.saturating_add(1);
        state.trades_registered += 1;
        if success {
            state.loss_streak = 0;
            state.trades_succeeded += 1;
        } else {
            state.loss_streak = state.loss_streak.saturating_add(1);
        }

        info!(
            pair = %pair,
            direction = %direction,
            success,
            daily_trades = state.daily_trades,
            loss_streak = state.loss_streak,
            "Trade registered"
        );
    }

    fn record_realized_pnl(&self, pnl: Decimal, timestamp: DateTime<Utc>) {
        let mut state = self.state.lock();
        state.roll_day(timestamp);
        state.daily_realized_pnl += pnl;
        state.total_realized_pnl += pnl;
        info!(
            pnl = %pnl,
            daily = %state.daily_realized_pnl,
            "Realized PnL recorded"
        );
    }
}
