//! View-facing subscription handles over the state store.
//!
//! A handle loads a snapshot of its table once at creation and keeps it in
//! memory so views never re-read storage on every render. The snapshot only
//! changes through the handle's own mutation wrappers (which write to the
//! store and immediately refresh) or an explicit `refresh()` call: it is
//! never stale relative to the last write issued through the same handle,
//! but writes made elsewhere (another handle, another process) are not
//! observed until this handle reads again. There is no background polling.

use std::sync::Arc;

use crate::domain::{
    section_percent, CurriculumProgress, FlagCandidate, FlaggedItem, ModuleProgress, OverallStats,
    ProgressUpdate,
};
use crate::quiz::QuizOutcome;
use crate::store::StateStore;

/// Subscription handle over the progress table.
pub struct ProgressHandle {
    store: Arc<StateStore>,
    snapshot: CurriculumProgress,
}

impl ProgressHandle {
    /// Create the handle and load the initial snapshot.
    pub fn new(store: Arc<StateStore>) -> Self {
        let snapshot = store.read_all();
        Self { store, snapshot }
    }

    /// The current in-memory snapshot.
    pub fn snapshot(&self) -> &CurriculumProgress {
        &self.snapshot
    }

    /// One module's record from the snapshot.
    pub fn module(&self, module_id: &str) -> Option<&ModuleProgress> {
        self.snapshot.get(module_id)
    }

    /// Re-read storage into the snapshot.
    pub fn refresh(&mut self) {
        self.snapshot = self.store.read_all();
    }

    /// Merge a partial update and resynchronize the snapshot.
    pub fn update(&mut self, module_id: &str, update: ProgressUpdate) {
        self.store.write_module_progress(module_id, update);
        self.refresh();
    }

    pub fn mark_section_read(&mut self, module_id: &str, section_index: u32) {
        self.store.mark_section_read(module_id, section_index);
        self.refresh();
    }

    pub fn complete_slides(&mut self, module_id: &str) {
        self.store.complete_slides(module_id);
        self.refresh();
    }

    pub fn record_quiz_result(&mut self, module_id: &str, outcome: &QuizOutcome) {
        self.store.record_quiz_result(module_id, outcome);
        self.refresh();
    }

    /// Reading-completion percentage, computed over the snapshot.
    pub fn section_percent(&self, module_id: &str, total_sections: usize) -> u32 {
        section_percent(self.snapshot.get(module_id), total_sections)
    }

    /// Curriculum-wide stats, computed over the snapshot.
    pub fn overall_stats(&self, total_module_count: usize) -> OverallStats {
        crate::domain::overall_stats(&self.snapshot, total_module_count)
    }
}

/// Subscription handle over the flags table.
pub struct FlagsHandle {
    store: Arc<StateStore>,
    snapshot: Vec<FlaggedItem>,
}

impl FlagsHandle {
    /// Create the handle and load the initial snapshot.
    pub fn new(store: Arc<StateStore>) -> Self {
        let snapshot = store.read_flags();
        Self { store, snapshot }
    }

    /// The current in-memory snapshot.
    pub fn snapshot(&self) -> &[FlaggedItem] {
        &self.snapshot
    }

    /// Re-read storage into the snapshot.
    pub fn refresh(&mut self) {
        self.snapshot = self.store.read_flags();
    }

    /// Toggle a flag and resynchronize; returns the resulting flag state.
    pub fn toggle(&mut self, candidate: FlagCandidate) -> bool {
        let flagged = self.store.toggle_flag(candidate);
        self.refresh();
        flagged
    }

    /// Remove a flag by id and resynchronize.
    pub fn remove(&mut self, id: &str) {
        self.store.remove_flag_by_id(id);
        self.refresh();
    }

    /// Whether the triple is flagged, checked against the snapshot.
    pub fn is_flagged(&self, module_id: &str, section_title: &str, key_point: &str) -> bool {
        let id = crate::domain::flag_id(module_id, section_title, key_point);
        self.snapshot.iter().any(|f| f.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate() -> FlagCandidate {
        FlagCandidate {
            module_id: "ataxia".into(),
            module_title: "Ataxia".into(),
            section_title: "Genetics".into(),
            key_point: "SCA1 is CAG repeat".into(),
        }
    }

    #[test]
    fn test_progress_handle_snapshot_follows_own_writes() {
        let store = Arc::new(StateStore::in_memory());
        let mut handle = ProgressHandle::new(Arc::clone(&store));
        assert!(handle.snapshot().is_empty());

        handle.mark_section_read("ataxia", 0);
        handle.mark_section_read("ataxia", 3);

        // Snapshot reflects the writes without an explicit refresh
        assert_eq!(handle.module("ataxia").unwrap().sections_read, vec![0, 3]);
        assert_eq!(handle.section_percent("ataxia", 8), 25);
    }

    #[test]
    fn test_progress_handle_misses_external_writes_until_refresh() {
        let store = Arc::new(StateStore::in_memory());
        let mut handle_a = ProgressHandle::new(Arc::clone(&store));
        let mut handle_b = ProgressHandle::new(Arc::clone(&store));

        handle_b.mark_section_read("ataxia", 0);

        // A's snapshot was loaded before B's write and does not move
        assert!(handle_a.module("ataxia").is_none());

        handle_a.refresh();
        assert!(handle_a.module("ataxia").is_some());
    }

    #[test]
    fn test_progress_handle_update_and_stats() {
        let store = Arc::new(StateStore::in_memory());
        let mut handle = ProgressHandle::new(Arc::clone(&store));

        handle.complete_slides("ataxia");
        handle.record_quiz_result("ataxia", &QuizOutcome::new(8, 8));
        handle.update(
            "epilepsy",
            ProgressUpdate {
                current_slide: Some(2),
                ..Default::default()
            },
        );

        let stats = handle.overall_stats(4);
        assert_eq!(stats.started, 2);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.percent, 25);
        assert_eq!(handle.section_percent("ataxia", 8), 100);
    }

    #[test]
    fn test_flags_handle_toggle_round_trip() {
        let store = Arc::new(StateStore::in_memory());
        let mut handle = FlagsHandle::new(Arc::clone(&store));

        assert!(handle.toggle(candidate()));
        assert!(handle.is_flagged("ataxia", "Genetics", "SCA1 is CAG repeat"));
        assert_eq!(handle.snapshot().len(), 1);

        assert!(!handle.toggle(candidate()));
        assert!(!handle.is_flagged("ataxia", "Genetics", "SCA1 is CAG repeat"));
        assert!(handle.snapshot().is_empty());
    }

    #[test]
    fn test_flags_handle_remove_resynchronizes() {
        let store = Arc::new(StateStore::in_memory());
        let mut handle = FlagsHandle::new(Arc::clone(&store));

        handle.toggle(candidate());
        let id = handle.snapshot()[0].id.clone();
        handle.remove(&id);
        assert!(handle.snapshot().is_empty());
    }
}
