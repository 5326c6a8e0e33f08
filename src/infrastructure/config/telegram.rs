//! Telegram notification configuration.

use serde::Deserialize;

/// Telegram notification configuration (`[telegram]`).
///
/// Bot token and chat come from `TELEGRAM_BOT_TOKEN` and `TELEGRAM_CHAT_ID`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TelegramAppConfig {
    /// Enable telegram notifications.
    #[serde(default)]
    pub enabled: bool,
    /// Send risk denial alerts (can be noisy).
    #[serde(default)]
    pub notify_blocked: bool,
}
