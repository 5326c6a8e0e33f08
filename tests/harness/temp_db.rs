use std::path::PathBuf;
use std::sync::Arc;

use pairsniper::adapter::outbound::sqlite::{create_pool, SqlitePositionStore};
use pairsniper::port::PositionStore;
use tempfile::TempDir;

/// Temporary SQLite ledger for integration tests. Removed on drop.
pub struct TempDb {
    _dir: TempDir,
    path: PathBuf,
}

impl TempDb {
    pub fn create() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("ledger.db");
        Self { _dir: dir, path }
    }

    pub fn path(&self) -> String {
        self.path.display().to_string()
    }

    /// Open a fresh store over the same file, as a restarted process would.
    pub fn open(&self) -> Arc<dyn PositionStore> {
        let pool = create_pool(&self.path()).expect("create sqlite pool");
        Arc::new(SqlitePositionStore::new(pool).expect("open position store"))
    }
}
