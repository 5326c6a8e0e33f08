//! Notifier port for event notifications.
//!
//! Notifications are best-effort: nothing a notifier does can change a
//! trading decision.

use std::fmt;

use rust_decimal::Decimal;

use crate::domain::{Amount, ExecutionHandle, ExitReason, PairId, Price, Side};
use crate::error::{ExecutionError, RiskError};

/// Events that can trigger notifications.
#[derive(Debug, Clone)]
pub enum Event {
    /// An order went through.
    TradeExecuted(TradeEvent),
    /// The risk gate denied a trade.
    TradeBlocked(BlockedEvent),
    /// Submission was attempted and failed.
    TradeFailed(FailedEvent),
    /// A position was written to the ledger after a buy.
    PositionOpened(OpenedEvent),
    /// A position was sold and removed from the ledger.
    PositionClosed(ClosedEvent),
    /// A ledger read or write failed.
    StorageFailure {
        operation: &'static str,
        error: String,
    },
    /// Rendered risk audit report.
    Report(String),
}

/// Executed order.
#[derive(Debug, Clone)]
pub struct TradeEvent {
    pub pair: PairId,
    pub side: Side,
    pub handle: ExecutionHandle,
}

/// Denied order.
#[derive(Debug, Clone)]
pub struct BlockedEvent {
    pub pair: PairId,
    pub side: Side,
    pub reason: &'static str,
    pub detail: String,
}

impl BlockedEvent {
    #[must_use]
    pub fn new(pair: &PairId, side: Side, error: &RiskError) -> Self {
        Self {
            pair: pair.clone(),
            side,
            reason: error.code(),
            detail: error.to_string(),
        }
    }
}

/// Failed order.
#[derive(Debug, Clone)]
pub struct FailedEvent {
    pub pair: PairId,
    pub side: Side,
    pub error: ExecutionError,
}

/// Newly opened position.
#[derive(Debug, Clone)]
pub struct OpenedEvent {
    pub pair: PairId,
    pub amount: Amount,
    pub price: Price,
    pub handle: ExecutionHandle,
}

/// Closed position.
#[derive(Debug, Clone)]
pub struct ClosedEvent {
    pub pair: PairId,
    pub reason: ExitReason,
    /// Configured trigger in percent (`30` for take-profit at +30%).
    pub threshold_pct: Option<Decimal>,
    pub entry_price: Price,
    pub exit_price: Price,
    /// Realized move in percent.
    pub change_pct: Option<Decimal>,
    pub handle: ExecutionHandle,
}

/// Format a percentage with an explicit sign (`+30%`, `-15%`).
#[must_use]
pub fn signed_pct(pct: Decimal) -> String {
    let pct = pct.round_dp(2).normalize();
    if pct.is_sign_positive() && !pct.is_zero() {
        format!("+{pct}%")
    } else {
        format!("{pct}%")
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::TradeExecuted(e) => {
                write!(f, "Executed {} {} ({})", e.side, e.pair, e.handle)
            }
            Event::TradeBlocked(e) => {
                write!(f, "Blocked {} {}: {}", e.side, e.pair, e.detail)
            }
            Event::TradeFailed(e) => write!(f, "Failed {} {}: {}", e.side, e.pair, e.error),
            Event::PositionOpened(e) => write!(
                f,
                "Opened {}: {} @ {} ({})",
                e.pair, e.amount, e.price, e.handle
            ),
            Event::PositionClosed(e) => {
                let label = match e.reason {
                    ExitReason::TakeProfit => "Take profit",
                    ExitReason::StopLoss => "Stop loss",
                    ExitReason::TrailingStop => "Trailing stop",
                    ExitReason::Manual => "Manual close",
                };
                write!(f, "{label} on {}", e.pair)?;
                if let Some(threshold) = e.threshold_pct {
                    write!(f, " at {}", signed_pct(threshold))?;
                }
                write!(f, ": entry {} exit {}", e.entry_price, e.exit_price)?;
                if let Some(change) = e.change_pct {
                    write!(f, " ({})", signed_pct(change))?;
                }
                write!(f, " tx {}", e.handle)
            }
            Event::StorageFailure { operation, error } => {
                write!(f, "Ledger {operation} failed: {error}")
            }
            Event::Report(report) => f.write_str(report),
        }
    }
}

/// Trait for notification handlers.
///
/// # Implementation Notes
///
/// - Implementations must be thread-safe (`Send + Sync`)
/// - `notify` must return quickly; slow delivery belongs on a background task
/// - Delivery failures are logged by the implementation, never returned
pub trait Notifier: Send + Sync {
    /// Handle an event.
    fn notify(&self, event: Event);
}

/// Registry of notifiers (composite pattern).
///
/// Broadcasts events to all registered notifiers.
#[derive(Default)]
pub struct NotifierRegistry {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl NotifierRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self { notifiers: vec![] }
    }

    /// Register a notifier.
    pub fn register(&mut self, notifier: Box<dyn Notifier>) {
        self.notifiers.push(notifier);
    }

    /// Notify all registered notifiers.
    pub fn notify_all(&self, event: Event) {
        for notifier in &self.notifiers {
            notifier.notify(event.clone());
        }
    }

    /// Number of registered notifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.notifiers.len()
    }

    /// Check if registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn signed_pct_formats_sign() {
        assert_eq!(signed_pct(dec!(30)), "+30%");
        assert_eq!(signed_pct(dec!(-15)), "-15%");
        assert_eq!(signed_pct(dec!(0)), "0%");
        assert_eq!(signed_pct(dec!(31.004)), "+31%");
    }

    #[test]
    fn closed_event_mentions_threshold() {
        let event = Event::PositionClosed(ClosedEvent {
            pair: PairId::from("X"),
            reason: ExitReason::TakeProfit,
            threshold_pct: Some(dec!(30)),
            entry_price: dec!(1.0),
            exit_price: dec!(1.31),
            change_pct: Some(dec!(31)),
            handle: ExecutionHandle::new("0xabc"),
        });
        let text = event.to_string();
        assert!(text.starts_with("Take profit on X at +30%"), "{text}");
        assert!(text.contains("(+31%)"), "{text}");
    }

    #[test]
    fn empty_registry_accepts_events() {
        let registry = NotifierRegistry::new();
        assert!(registry.is_empty());
        registry.notify_all(Event::Report("nothing".into()));
    }
}
