//! Storage backends for the state store.
//!
//! The store persists two independent string-keyed JSON blobs (progress and
//! flags). A backend only has to move opaque strings under stable keys; all
//! serialization and merge logic lives above it in [`crate::store`].
//!
//! `SqliteBackend` is the durable production backend (one key/value table in
//! a single database file). `MemoryBackend` backs tests and any context
//! where durable storage is unavailable.

use rusqlite::{params, Connection};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

/// Error at the storage-adapter boundary.
///
/// Public fail-open operations on the store never surface these; the strict
/// `try_*` variants do, so callers that care (state export, tests) can see
/// exactly why a read or write failed.
#[derive(Debug)]
pub enum StorageError {
    /// The backing store cannot be reached (lock poisoned, file unopenable)
    Unavailable,
    /// Read or write against the backing store failed
    Io(String),
    /// Stored content is not valid JSON for the expected shape
    Parse(String),
    /// A value could not be serialized for storage
    Serialize(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Unavailable => write!(f, "Storage unavailable"),
            StorageError::Io(err) => write!(f, "Storage IO error: {}", err),
            StorageError::Parse(err) => write!(f, "Stored data unparseable: {}", err),
            StorageError::Serialize(err) => write!(f, "Serialization failed: {}", err),
        }
    }
}

impl StorageError {
    /// User-facing message without internal details.
    pub fn user_message(&self) -> &str {
        match self {
            StorageError::Unavailable => "Progress storage is unavailable",
            StorageError::Io(_) => "Failed to access progress storage",
            StorageError::Parse(_) => "Stored progress data is corrupted",
            StorageError::Serialize(_) => "Failed to save progress data",
        }
    }
}

impl std::error::Error for StorageError {}

/// A string key/value store the state store persists through.
pub trait StorageBackend: Send + Sync {
    /// Read the value under `key`; `None` when the key was never written.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `value` under `key`, replacing any prior value.
    fn put(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

// ==================== SQLite ====================

/// Durable backend: one key/value table in a single SQLite file.
#[derive(Debug)]
pub struct SqliteBackend {
    conn: Mutex<Connection>,
}

impl SqliteBackend {
    /// Open (or create) the database at `path` and ensure the schema.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StorageError::Io(format!("creating {}: {}", parent.display(), e))
            })?;
        }
        let conn = Connection::open(path).map_err(|e| StorageError::Io(e.to_string()))?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS store (
              key TEXT PRIMARY KEY,
              value TEXT NOT NULL
            );
            "#,
        )
        .map_err(|e| StorageError::Io(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, StorageError> {
        self.conn.lock().map_err(|_| {
            tracing::warn!("store mutex poisoned; treating storage as unavailable");
            StorageError::Unavailable
        })
    }
}

impl StorageBackend for SqliteBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT value FROM store WHERE key = ?1")
            .map_err(|e| StorageError::Io(e.to_string()))?;
        let mut rows = stmt
            .query(params![key])
            .map_err(|e| StorageError::Io(e.to_string()))?;
        match rows.next().map_err(|e| StorageError::Io(e.to_string()))? {
            Some(row) => {
                let value: String = row.get(0).map_err(|e| StorageError::Io(e.to_string()))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO store (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )
        .map_err(|e| StorageError::Io(e.to_string()))?;
        Ok(())
    }
}

// ==================== In-memory ====================

/// Non-durable backend for tests and storage-less contexts.
///
/// The mutex exists only so `&self` methods can mutate the map; there is no
/// concurrency guarantee in the store contract.
#[derive(Default)]
pub struct MemoryBackend {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a raw value, bypassing serialization (corruption tests).
    pub fn seed(&self, key: &str, value: &str) {
        if let Ok(mut values) = self.values.lock() {
            values.insert(key.to_string(), value.to_string());
        }
    }
}

impl StorageBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let values = self.values.lock().map_err(|_| StorageError::Unavailable)?;
        Ok(values.get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = self.values.lock().map_err(|_| StorageError::Unavailable)?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Backend that fails every operation; models disabled storage.
#[cfg(test)]
pub struct UnavailableBackend;

#[cfg(test)]
impl StorageBackend for UnavailableBackend {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable)
    }

    fn put(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable)
    }
}
