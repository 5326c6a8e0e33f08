//! In-memory position store for testing.

use std::collections::BTreeMap;

use parking_lot::RwLock;

use crate::domain::{PairId, Position};
use crate::error::Result;
use crate::port::PositionStore;

/// In-memory store; contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryPositionStore {
    positions: RwLock<BTreeMap<PairId, Position>>,
}

impl MemoryPositionStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl PositionStore for MemoryPositionStore {
    fn upsert(&self, position: &Position) -> Result<()> {
        self.positions
            .write()
            .insert(position.pair().clone(), position.clone());
        Ok(())
    }

    fn remove(&self, pair: &PairId) -> Result<bool> {
        Ok(self.positions.write().remove(pair).is_some())
    }

    fn get(&self, pair: &PairId) -> Result<Option<Position>> {
        Ok(self.positions.read().get(pair).cloned())
    }

    fn list_all(&self) -> Result<Vec<Position>> {
        Ok(self.positions.read().values().cloned().collect())
    }

    fn clear_all(&self) -> Result<usize> {
        let mut positions = self.positions.write();
        let removed = positions.len();
        positions.clear();
        Ok(removed)
    }
}
