//! Message formatting for Telegram notifications.

use crate::domain::ExitReason;
use crate::port::Event;

use super::notifier::TelegramConfig;

/// Format an event into a Telegram message, or None if the event should be skipped.
pub fn format_event_message(event: &Event, config: &TelegramConfig) -> Option<String> {
    let title = match event {
        Event::TradeExecuted(_) => "✅ *Trade Executed*",
        Event::TradeBlocked(_) if config.notify_blocked => "⚠️ *Trade Blocked*",
        Event::TradeBlocked(_) => return None,
        Event::TradeFailed(_) => "❌ *Trade Failed*",
        Event::PositionOpened(_) => "🟢 *Position Opened*",
        Event::PositionClosed(e) if e.reason.is_profit() => "💰 *Position Closed*",
        Event::PositionClosed(e) if e.reason == ExitReason::Manual => "✋ *Position Closed*",
        Event::PositionClosed(_) => "🔻 *Position Closed*",
        Event::StorageFailure { .. } => "🛑 *Ledger Failure*",
        Event::Report(_) => "📊 *Risk Report*",
    };

    Some(match event {
        // Multi-line reports read better fixed-width.
        Event::Report(report) => format!("{title}\n\n```\n{}\n```", escape_code(report)),
        _ => format!("{title}\n\n{}", escape_markdown(&event.to_string())),
    })
}

/// Escape special characters for Telegram `MarkdownV2`.
pub fn escape_markdown(text: &str) -> String {
    let special_chars = [
        '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
    ];
    let mut result = String::with_capacity(text.len() * 2);

    for c in text.chars() {
        if special_chars.contains(&c) {
            result.push('\\');
        }
        result.push(c);
    }

    result
}

/// Escape text placed inside a `MarkdownV2` code block.
fn escape_code(text: &str) -> String {
    text.replace('\\', "\\\\").replace('`', "\\`")
}
