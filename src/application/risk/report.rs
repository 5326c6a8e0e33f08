//! Human-readable rendering of the risk audit log.

use std::collections::BTreeMap;
use std::fmt::Write;

use super::manager::RiskSnapshot;
use crate::domain::RiskEvent;

/// Report text when nothing has been decided yet.
pub const EMPTY_REPORT: &str = "No risk events recorded.";

/// Render the audit log.
///
/// Lists totals, blocked counts per reason and one line per blocked trade.
/// `verbose` appends every event, released ones included.
#[must_use]
pub fn render(events: &[RiskEvent], snapshot: &RiskSnapshot, verbose: bool) -> String {
    if events.is_empty() {
        return EMPTY_REPORT.to_string();
    }

    let blocked: Vec<&RiskEvent> = events.iter().filter(|e| e.is_blocked()).collect();
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(
        out,
        "Risk report: {} events ({} released, {} blocked)",
        events.len(),
        events.len() - blocked.len(),
        blocked.len()
    );

    if !blocked.is_empty() {
        let mut by_reason: BTreeMap<&str, usize> = BTreeMap::new();
        for event in &blocked {
            *by_reason.entry(event.reason()).or_default() += 1;
        }
        let _ = writeln!(out, "Blocked by reason:");
        for (reason, count) in by_reason {
            let _ = writeln!(out, "  {reason}: {count}");
        }
        let _ = writeln!(out, "Blocked trades:");
        for event in &blocked {
            let _ = writeln!(out, "  {}", event_line(event));
        }
    }

    let _ = writeln!(
        out,
        "Registered trades: {} ({} ok, {} failed), loss streak {}",
        snapshot.trades_registered,
        snapshot.trades_succeeded,
        snapshot.trades_failed,
        snapshot.loss_streak
    );
    let _ = writeln!(
        out,
        "Realized PnL: {} today, {} total",
        snapshot.daily_realized_pnl, snapshot.total_realized_pnl
    );

    if verbose {
        let _ = writeln!(out, "All events:");
        for event in events {
            let _ = writeln!(out, "  {}", event_line(event));
        }
    }

    out.truncate(out.trim_end().len());
    out
}

/// `[HH:MM:SS] BLOCKED sell X -> cooldown: cooldown active: 5s remaining`
#[must_use]
pub fn event_line(event: &RiskEvent) -> String {
    let context = event.context();
    format!(
        "[{}] {} {} {} -> {}: {}",
        event.timestamp().format("%H:%M:%S"),
        event.outcome(),
        context.direction,
        context.pair,
        event.reason(),
        event.detail()
    )
}
