//! Notification adapters.
//!
//! Implements the `port::Notifier` trait for various notification backends.

use tracing::{error, info, warn};

use crate::port::{Event, Notifier};

#[cfg(feature = "telegram")]
pub mod telegram;

/// Notifier that writes every event to the structured log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, event: Event) {
        match &event {
            Event::TradeExecuted(e) => {
                info!(pair = %e.pair, side = %e.side, handle = %e.handle, "Trade executed");
            }
            Event::TradeBlocked(e) => {
                warn!(pair = %e.pair, side = %e.side, reason = e.reason, detail = %e.detail, "Trade blocked");
            }
            Event::TradeFailed(e) => {
                error!(pair = %e.pair, side = %e.side, error = %e.error, "Trade failed");
            }
            Event::PositionOpened(e) => {
                info!(pair = %e.pair, amount = %e.amount, price = %e.price, "Position opened");
            }
            Event::PositionClosed(e) => {
                info!(
                    pair = %e.pair,
                    reason = %e.reason,
                    entry = %e.entry_price,
                    exit = %e.exit_price,
                    handle = %e.handle,
                    "Position closed"
                );
            }
            Event::StorageFailure { operation, error } => {
                error!(operation, error = %error, "Ledger storage failure");
            }
            Event::Report(report) => info!("{report}"),
        }
    }
}
