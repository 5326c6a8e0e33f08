//! Persistence port for the position ledger.

use crate::domain::{PairId, Position};
use crate::error::Result;

/// Backing store for open positions.
///
/// Implementations need atomic single-key writes and must create their
/// schema if it is absent. Callers serialize access; implementations do not
/// have to.
pub trait PositionStore: Send + Sync {
    /// Insert or fully replace the position for its pair.
    fn upsert(&self, position: &Position) -> Result<()>;

    /// Delete the position for `pair`. Returns `false` if there was none.
    fn remove(&self, pair: &PairId) -> Result<bool>;

    /// Get the position for `pair`.
    fn get(&self, pair: &PairId) -> Result<Option<Position>>;

    /// All open positions, ordered by pair.
    fn list_all(&self) -> Result<Vec<Position>>;

    /// Delete every position. Returns the number removed.
    fn clear_all(&self) -> Result<usize>;
}
