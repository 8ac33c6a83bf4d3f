//! The learner state store: durable, synchronous persistence of curriculum
//! progress and flagged key points.
//!
//! Two independent logical tables live behind stable storage keys
//! ([`crate::config::PROGRESS_KEY`], [`crate::config::FLAGS_KEY`]), each a
//! JSON blob. Every mutation is read-modify-write over the whole blob and
//! persists synchronously before returning.
//!
//! Failure policy is fail-open: unavailable or corrupted storage reads as
//! empty, failed writes are dropped after a `warn` log, and no operation on
//! the default-facing surface ever returns an error. Losing best-effort
//! progress data must never take the application down with it. Callers that
//! need to see failures (state export, tests) use the strict `try_*`
//! variants instead.

pub mod backend;
mod flags;
mod progress;

pub use backend::{MemoryBackend, SqliteBackend, StorageBackend, StorageError};

/// Extension trait for logging errors before discarding them
pub trait LogOnError<T> {
    /// Log the error at warn level and return None
    fn log_warn(self, context: &str) -> Option<T>;
    /// Log the error at warn level and return the default
    fn log_warn_default(self, context: &str) -> T
    where
        T: Default;
}

impl<T, E: std::fmt::Display> LogOnError<T> for std::result::Result<T, E> {
    fn log_warn(self, context: &str) -> Option<T> {
        match self {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!("{}: {}", context, e);
                None
            }
        }
    }

    fn log_warn_default(self, context: &str) -> T
    where
        T: Default,
    {
        match self {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!("{}: {}", context, e);
                T::default()
            }
        }
    }
}

/// The state store: an explicit service object injected into views.
///
/// One instance per profile; a single logical writer. There is no
/// module-level singleton, so tests substitute a [`MemoryBackend`] freely.
pub struct StateStore {
    backend: Box<dyn StorageBackend>,
}

impl StateStore {
    /// Build a store over any backend.
    pub fn new(backend: impl StorageBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    /// Open the durable store at the configured data directory.
    pub fn open_default() -> Result<Self, StorageError> {
        let backend = SqliteBackend::open(&crate::paths::store_db_path())?;
        Ok(Self::new(backend))
    }

    /// Store backed by process memory only (no durability).
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    fn backend(&self) -> &dyn StorageBackend {
        self.backend.as_ref()
    }
}
