//! Flag table operations on the state store.

use chrono::Utc;

use super::{LogOnError, StateStore, StorageError};
use crate::config::FLAGS_KEY;
use crate::domain::{flag_id, FlagCandidate, FlaggedItem};

impl StateStore {
    /// All flagged items; strict variant surfacing storage errors.
    pub fn try_read_flags(&self) -> Result<Vec<FlaggedItem>, StorageError> {
        match self.backend().get(FLAGS_KEY)? {
            Some(raw) => {
                serde_json::from_str(&raw).map_err(|e| StorageError::Parse(e.to_string()))
            }
            None => Ok(Vec::new()),
        }
    }

    /// All flagged items, or empty on unavailable/corrupted storage.
    pub fn read_flags(&self) -> Vec<FlaggedItem> {
        self.try_read_flags().log_warn_default("reading flags")
    }

    /// Toggle a flag for the candidate's (module, section, key point) triple.
    ///
    /// Returns the resulting state: `true` if the item is now flagged,
    /// `false` if the toggle removed an existing flag. A single
    /// read-modify-write, so no intermediate state is observable.
    pub fn toggle_flag(&self, candidate: FlagCandidate) -> bool {
        let id = candidate.id();
        let mut flags = self.read_flags();
        let flagged = if flags.iter().any(|f| f.id == id) {
            flags.retain(|f| f.id != id);
            false
        } else {
            flags.push(candidate.into_flag(Utc::now()));
            true
        };
        self.persist_flags(&flags);
        flagged
    }

    /// Remove a flag by id; no-op when absent.
    pub fn remove_flag_by_id(&self, id: &str) {
        let mut flags = self.read_flags();
        let before = flags.len();
        flags.retain(|f| f.id != id);
        if flags.len() != before {
            self.persist_flags(&flags);
        }
    }

    /// Whether the triple is currently flagged; pure over stored content.
    pub fn is_flagged(&self, module_id: &str, section_title: &str, key_point: &str) -> bool {
        let id = flag_id(module_id, section_title, key_point);
        self.read_flags().iter().any(|f| f.id == id)
    }

    /// Replace the whole stored list; strict (state import path).
    pub(crate) fn try_replace_flags(&self, flags: &[FlaggedItem]) -> Result<(), StorageError> {
        let raw =
            serde_json::to_string(flags).map_err(|e| StorageError::Serialize(e.to_string()))?;
        self.backend().put(FLAGS_KEY, &raw)
    }

    fn persist_flags(&self, flags: &[FlaggedItem]) {
        self.try_replace_flags(flags).log_warn("persisting flags");
    }
}
