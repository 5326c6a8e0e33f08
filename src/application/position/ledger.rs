//! Position ledger.
//!
//! Wraps a [`PositionStore`] behind one lock so that no two ledger
//! operations interleave. Callers must not hold ledger results across slow
//! I/O expecting them to stay current: `list_all` is a snapshot.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, error, info};

use crate::domain::{Amount, PairId, Position, Price};
use crate::error::Result;
use crate::port::PositionStore;

/// Serialized access to the open-position store.
pub struct PositionLedger {
    store: Arc<dyn PositionStore>,
    lock: Mutex<()>,
}

impl PositionLedger {
    #[must_use]
    pub fn new(store: Arc<dyn PositionStore>) -> Self {
        Self {
            store,
            lock: Mutex::new(()),
        }
    }

    /// Record a position, replacing any existing one for the pair.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the write fails.
    pub fn upsert(&self, pair: PairId, amount: Amount, avg_price: Price) -> Result<Position> {
        let position = Position::new(pair, amount, avg_price);
        let _guard = self.lock.lock();
        if let Err(e) = self.store.upsert(&position) {
            error!(pair = %position.pair(), error = %e, "Ledger upsert failed");
            return Err(e);
        }
        info!(
            pair = %position.pair(),
            amount = position.amount(),
            avg_price = %position.avg_price(),
            "Position recorded"
        );
        Ok(position)
    }

    /// Remove the position for `pair`.
    ///
    /// Removing an absent pair is a no-op that returns `Ok(false)`.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the delete fails.
    pub fn remove(&self, pair: &PairId) -> Result<bool> {
        let _guard = self.lock.lock();
        let removed = match self.store.remove(pair) {
            Ok(removed) => removed,
            Err(e) => {
                error!(pair = %pair, error = %e, "Ledger remove failed");
                return Err(e);
            }
        };
        if removed {
            info!(pair = %pair, "Position removed");
        } else {
            debug!(pair = %pair, "Position already absent");
        }
        Ok(removed)
    }

    /// Look up one position.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the read fails.
    pub fn get(&self, pair: &PairId) -> Result<Option<Position>> {
        let _guard = self.lock.lock();
        self.store.get(pair)
    }

    /// Snapshot of every open position.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the read fails.
    pub fn list_all(&self) -> Result<Vec<Position>> {
        let _guard = self.lock.lock();
        self.store.list_all().map_err(|e| {
            error!(error = %e, "Ledger listing failed");
            e
        })
    }

    /// Remove every position. Returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the delete fails.
    pub fn clear_all(&self) -> Result<usize> {
        let _guard = self.lock.lock();
        let removed = self.store.clear_all()?;
        info!(removed, "Ledger cleared");
        Ok(removed)
    }
}
