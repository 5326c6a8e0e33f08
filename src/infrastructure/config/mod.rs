//! Infrastructure configuration modules.

pub mod discovery;
pub mod execution;
pub mod exit;
pub mod logging;
pub mod relay;
pub mod risk;
pub mod settings;
pub mod telegram;

pub use discovery::DiscoveryConfig;
pub use execution::ExecutionConfig;
pub use exit::ExitConfig;
pub use logging::LoggingConfig;
pub use relay::RelayConfig;
pub use risk::RiskConfig;
pub use settings::Config;
pub use telegram::TelegramAppConfig;
