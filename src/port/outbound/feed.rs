//! New-pair discovery port.

use async_trait::async_trait;

use crate::domain::NewPair;

/// Stream of newly listed pairs.
#[async_trait]
pub trait PairFeed: Send {
    /// Wait for the next discovered pair.
    ///
    /// Returns `None` once the feed has ended for good.
    async fn next_pair(&mut self) -> Option<NewPair>;
}
