//! Time-windowed deduplication of trade intents.
//!
//! Guards against the same trigger firing twice (re-delivered discovery
//! events, overlapping exit scans). The window lives in memory only and does
//! not survive a restart.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::debug;

use crate::domain::IntentKey;
use crate::port::Clock;

/// Configuration for intent deduplication.
#[derive(Debug, Clone)]
pub struct DedupConfig {
    /// Window in seconds during which a repeated intent is a duplicate.
    pub ttl_secs: u64,

    /// Maximum number of entries to retain in the cache.
    pub max_entries: usize,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 5,
            max_entries: 10_000,
        }
    }
}

/// Tracks recently submitted intents by identity.
pub struct IntentDeduplicator {
    seen: DashMap<IntentKey, DateTime<Utc>>,
    ttl: Duration,
    max_entries: usize,
    clock: Arc<dyn Clock>,
}

impl IntentDeduplicator {
    #[must_use]
    pub fn new(config: &DedupConfig, clock: Arc<dyn Clock>) -> Self {
        let secs = i64::try_from(config.ttl_secs.min(u64::from(u32::MAX))).unwrap_or_default();
        Self {
            seen: DashMap::new(),
            ttl: Duration::seconds(secs),
            max_entries: config.max_entries.max(1),
            clock,
        }
    }

    /// Check whether `key` was seen within the window, recording it if not.
    ///
    /// The check and the record happen under the same shard lock, so two
    /// concurrent callers with the same key never both get `false`.
    pub fn check_and_record(&self, key: IntentKey) -> bool {
        let now = self.clock.now();
        let duplicate = match self.seen.entry(key) {
            Entry::Occupied(mut entry) => {
                if now.signed_duration_since(*entry.get()) < self.ttl {
                    true
                } else {
                    entry.insert(now);
                    false
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(now);
                false
            }
        };

        if !duplicate && self.seen.len() > self.max_entries {
            self.gc();
        }
        duplicate
    }

    /// Drop expired entries, then the oldest ones while over capacity.
    pub fn gc(&self) {
        let now = self.clock.now();
        let before = self.seen.len();
        self.seen
            .retain(|_, seen_at| now.signed_duration_since(*seen_at) < self.ttl);

        let excess = self.seen.len().saturating_sub(self.max_entries);
        if excess > 0 {
            let mut entries: Vec<(IntentKey, DateTime<Utc>)> = self
                .seen
                .iter()
                .map(|e| (e.key().clone(), *e.value()))
                .collect();
            entries.sort_by_key(|(_, seen_at)| *seen_at);
            for (key, _) in entries.into_iter().take(excess) {
                self.seen.remove(&key);
            }
        }

        debug!(before, after = self.seen.len(), "Intent dedup cache collected");
    }

    /// Current number of entries in the cache.
    #[must_use]
    pub fn cache_size(&self) -> usize {
        self.seen.len()
    }
}
