//! Exclusive ownership of the position ledger.
//!
//! `run`, `close` and `clear` all sell from or rewrite the ledger, so only
//! one of them may hold it at a time. Ownership is a lock file created next
//! to the database and removed when the guard drops. A process that dies
//! without dropping leaves the file behind; the error names it so an
//! operator can remove it.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result, StorageError};

/// In-memory databases are private to one process and need no lock.
const IN_MEMORY: &str = ":memory:";

/// Contents of the lock file.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LockOwner {
    pid: u32,
    command: String,
    acquired_at: DateTime<Utc>,
}

/// Guard holding the ledger lock until dropped.
#[derive(Debug)]
pub struct LedgerLock {
    path: Option<PathBuf>,
}

impl LedgerLock {
    /// Take the lock for `database` on behalf of `command`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Locked`] if another process holds the lock,
    /// or an IO error if the lock file cannot be written.
    pub fn acquire(database: &str, command: &str) -> Result<Self> {
        if database == IN_MEMORY {
            return Ok(Self { path: None });
        }
        let path = lock_path(database);
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                return Err(StorageError::Locked {
                    path: path.display().to_string(),
                    holder: describe_holder(&path),
                }
                .into());
            }
            Err(err) => return Err(err.into()),
        };

        let owner = LockOwner {
            pid: std::process::id(),
            command: command.to_string(),
            acquired_at: Utc::now(),
        };
        let written = serde_json::to_vec(&owner)
            .map_err(Error::from)
            .and_then(|json| file.write_all(&json).map_err(Error::from));
        if let Err(err) = written {
            let _ = fs::remove_file(&path);
            return Err(err);
        }

        debug!(path = %path.display(), command, "Ledger lock acquired");
        Ok(Self { path: Some(path) })
    }

    /// Lock file path, if one was created.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl Drop for LedgerLock {
    fn drop(&mut self) {
        if let Some(path) = &self.path {
            if let Err(err) = fs::remove_file(path) {
                warn!(path = %path.display(), error = %err, "Failed to remove ledger lock");
            }
        }
    }
}

/// Lock file that guards `database`.
#[must_use]
pub fn lock_path(database: &str) -> PathBuf {
    PathBuf::from(format!("{database}.lock"))
}

fn describe_holder(path: &Path) -> String {
    fs::read(path)
        .ok()
        .and_then(|bytes| serde_json::from_slice::<LockOwner>(&bytes).ok())
        .map_or_else(
            || "unknown process".to_string(),
            |owner| format!("`{}` pid {} since {}", owner.command, owner.pid, owner.acquired_at),
        )
}
