//! Runtime lifecycle: feed loop, exit monitor task and graceful shutdown.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use crate::adapter::inbound::feed::WsPairFeed;
use crate::error::Result;
use crate::infrastructure::bootstrap::{
    build_engine, build_notifier_registry, open_store, relay_collaborators, Engine,
};
use crate::infrastructure::config::Config;
use crate::infrastructure::lock::LedgerLock;
use crate::port::{Event, PairFeed};

/// Run until Ctrl-C.
pub async fn run(config: Config) -> Result<()> {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown signal received");
            let _ = shutdown_tx.send(true);
        }
    });
    run_with_shutdown(config, shutdown_rx).await
}

/// Run with externally controlled shutdown signal.
///
/// Holds the ledger lock until the engine stops.
pub async fn run_with_shutdown(config: Config, shutdown: watch::Receiver<bool>) -> Result<()> {
    info!(dry_run = config.dry_run, "Starting pairsniper");

    let _lock = LedgerLock::acquire(&config.database, "run")?;
    let store = open_store(&config)?;
    let collaborators = relay_collaborators(&config, store)?;
    let notifiers = build_notifier_registry(&config);
    info!(notifiers = notifiers.len(), "Notifiers initialized");

    let engine = build_engine(&config, collaborators, notifiers)?;
    let feed = WsPairFeed::new(
        config.discovery.ws_url.clone(),
        Duration::from_millis(config.discovery.reconnect_delay_ms),
    );

    run_engine(engine, feed, shutdown).await
}

/// Drive a wired engine from `feed` until shutdown.
///
/// Each discovered pair is handled on its own task. On shutdown the feed is
/// dropped, in-flight entries and the current exit scan finish, and the
/// risk report is emitted.
pub async fn run_engine<F: PairFeed>(
    engine: Engine,
    mut feed: F,
    mut shutdown: watch::Receiver<bool>,
) -> Result<()> {
    let monitor = Arc::clone(&engine.monitor);
    let monitor_shutdown = shutdown.clone();
    let monitor_handle = tokio::spawn(async move { monitor.run(monitor_shutdown).await });

    let mut entries = JoinSet::new();
    let mut feed_open = true;
    info!("Listening for new pairs...");

    loop {
        if *shutdown.borrow() {
            break;
        }
        tokio::select! {
            result = shutdown.changed() => {
                if result.is_err() {
                    info!("Shutdown channel closed");
                    break;
                }
            }
            pair = feed.next_pair(), if feed_open => {
                let Some(pair) = pair else {
                    warn!("Discovery feed ended");
                    feed_open = false;
                    continue;
                };
                let entry = Arc::clone(&engine.entry);
                entries.spawn(async move {
                    let pair_id = pair.pair.clone();
                    if let Err(e) = entry.on_new_pair(pair).await {
                        error!(pair = %pair_id, error = %e, "Entry failed");
                    }
                });
            }
            Some(joined) = entries.join_next(), if !entries.is_empty() => {
                if let Err(e) = joined {
                    error!(error = %e, "Entry task panicked");
                }
            }
        }
    }

    drop(feed);
    while let Some(joined) = entries.join_next().await {
        if let Err(e) = joined {
            error!(error = %e, "Entry task panicked");
        }
    }
    if let Err(e) = monitor_handle.await {
        error!(error = %e, "Exit monitor task panicked");
    }

    engine
        .notifiers
        .notify_all(Event::Report(engine.risk.report(false)));
    info!("Shutdown complete");
    Ok(())
}
