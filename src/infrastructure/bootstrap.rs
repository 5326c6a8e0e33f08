//! Composition root.
//!
//! Builds exactly one risk manager, one risk-gated executor, one ledger and
//! one exit monitor per process and hands them out explicitly. Nothing here
//! is global.

use std::sync::Arc;

use tracing::{info, warn};

use crate::adapter::outbound::notifier::LogNotifier;
#[cfg(feature = "telegram")]
use crate::adapter::outbound::notifier::telegram::{TelegramConfig, TelegramNotifier};
use crate::adapter::outbound::relay::RelayClient;
use crate::adapter::outbound::sqlite::{create_pool, SqlitePositionStore};
use crate::application::entry::EntryHandler;
use crate::application::execution::{OrderExecutor, RiskGatedExecutor};
use crate::application::position::{ExitMonitor, PositionLedger};
use crate::application::risk::{RiskLimits, RiskManager};
use crate::error::Result;
use crate::infrastructure::config::Config;
use crate::port::{
    Clock, NotifierRegistry, OrderSubmitter, PairScreener, PositionStore, PriceSource, SystemClock,
};

/// Everything the engine talks to outside the process.
pub struct Collaborators {
    pub prices: Arc<dyn PriceSource>,
    pub screener: Arc<dyn PairScreener>,
    pub submitter: Arc<dyn OrderSubmitter>,
    pub store: Arc<dyn PositionStore>,
    pub clock: Arc<dyn Clock>,
}

/// The wired trading engine.
pub struct Engine {
    pub risk: Arc<RiskManager>,
    pub executor: Arc<OrderExecutor>,
    pub gated: Arc<RiskGatedExecutor>,
    pub ledger: Arc<PositionLedger>,
    pub monitor: Arc<ExitMonitor>,
    pub entry: Arc<EntryHandler>,
    pub notifiers: Arc<NotifierRegistry>,
}

/// Build notifier registry from configuration.
///
/// Must be called from within a tokio runtime when Telegram is enabled.
#[cfg(feature = "telegram")]
pub fn build_notifier_registry(config: &Config) -> NotifierRegistry {
    let mut registry = NotifierRegistry::new();
    registry.register(Box::new(LogNotifier));

    if config.telegram.enabled {
        if let Some(tg_config) = TelegramConfig::from_env(config.telegram.notify_blocked) {
            registry.register(Box::new(TelegramNotifier::new(tg_config)));
            info!("Telegram notifier enabled");
        } else {
            warn!("Telegram enabled but TELEGRAM_BOT_TOKEN or TELEGRAM_CHAT_ID not set");
        }
    }

    registry
}

/// Build notifier registry from configuration (non-telegram variant).
#[cfg(not(feature = "telegram"))]
pub fn build_notifier_registry(config: &Config) -> NotifierRegistry {
    let mut registry = NotifierRegistry::new();
    registry.register(Box::new(LogNotifier));
    if config.telegram.enabled {
        warn!("Telegram enabled in config but the telegram feature is not compiled in");
    }
    registry
}

/// Open the SQLite position store, creating its schema if needed.
///
/// # Errors
/// Returns a storage error if the database cannot be opened or migrated.
pub fn open_store(config: &Config) -> Result<Arc<dyn PositionStore>> {
    let pool = create_pool(&config.database)?;
    let store = SqlitePositionStore::new(pool)?;
    info!(database = %config.database, "Position ledger opened");
    Ok(Arc::new(store))
}

/// Relay-backed collaborators over the given store, on the system clock.
///
/// # Errors
/// Returns an error if the relay URL is invalid.
pub fn relay_collaborators(config: &Config, store: Arc<dyn PositionStore>) -> Result<Collaborators> {
    let relay = Arc::new(RelayClient::from_config(&config.relay)?);
    Ok(Collaborators {
        prices: relay.clone(),
        screener: relay.clone(),
        submitter: relay,
        store,
        clock: Arc::new(SystemClock),
    })
}

/// Wire the engine.
///
/// The executor's open-position counter is seeded from the ledger.
///
/// # Errors
/// Returns a storage error if the ledger cannot be read.
pub fn build_engine(
    config: &Config,
    collaborators: Collaborators,
    notifiers: NotifierRegistry,
) -> Result<Engine> {
    let Collaborators {
        prices,
        screener,
        submitter,
        store,
        clock,
    } = collaborators;
    let notifiers = Arc::new(notifiers);

    let risk = Arc::new(RiskManager::new(RiskLimits::from(&config.risk)));
    let executor = Arc::new(OrderExecutor::new(
        submitter,
        &config.executor_config(),
        Arc::clone(&clock),
    ));
    let gated = Arc::new(RiskGatedExecutor::new(
        risk.clone(),
        Arc::clone(&executor),
        Arc::clone(&notifiers),
    ));
    let ledger = Arc::new(PositionLedger::new(store));

    let open = ledger.list_all()?.len();
    executor.seed_open_positions(open);

    let monitor = Arc::new(ExitMonitor::new(
        Arc::clone(&ledger),
        Arc::clone(&gated),
        Arc::clone(&prices),
        Arc::clone(&notifiers),
        Arc::clone(&clock),
        config.exit_settings(),
    ));
    let entry = Arc::new(EntryHandler::new(
        Arc::clone(&gated),
        Arc::clone(&ledger),
        prices,
        screener,
        Arc::clone(&notifiers),
        clock,
        config.entry_settings(),
    ));

    info!(
        dry_run = config.dry_run,
        open_positions = open,
        "Engine ready"
    );

    Ok(Engine {
        risk,
        executor,
        gated,
        ledger,
        monitor,
        entry,
        notifiers,
    })
}
