//! Progress table operations on the state store.

use chrono::Utc;

use super::{LogOnError, StateStore, StorageError};
use crate::config::PROGRESS_KEY;
use crate::domain::{
    overall_stats, section_percent, CurriculumProgress, ModuleProgress, OverallStats,
    ProgressUpdate,
};
use crate::quiz::QuizOutcome;

impl StateStore {
    /// Full progress mapping; strict variant surfacing storage errors.
    pub fn try_read_all(&self) -> Result<CurriculumProgress, StorageError> {
        match self.backend().get(PROGRESS_KEY)? {
            Some(raw) => {
                serde_json::from_str(&raw).map_err(|e| StorageError::Parse(e.to_string()))
            }
            None => Ok(CurriculumProgress::new()),
        }
    }

    /// Full progress mapping, or empty when storage is unavailable or the
    /// stored blob is malformed. A corrupted blob must never crash the
    /// application; its data is silently lost instead.
    pub fn read_all(&self) -> CurriculumProgress {
        self.try_read_all().log_warn_default("reading progress")
    }

    /// One module's record; absence means no progress yet, a normal state.
    pub fn read_module_progress(&self, module_id: &str) -> Option<ModuleProgress> {
        self.read_all().remove(module_id)
    }

    /// Merge a partial update onto the module's record (or a zero-value
    /// default) and persist the whole mapping.
    ///
    /// Shallow overwrite: fields absent from the update keep their stored
    /// values; `sections_read`, when present, replaces the stored array
    /// wholesale.
    pub fn write_module_progress(&self, module_id: &str, update: ProgressUpdate) {
        let mut all = self.read_all();
        all.entry(module_id.to_string()).or_default().apply(update);
        self.persist_progress(&all);
    }

    /// Record a section as read; idempotent.
    ///
    /// An already-present index issues no storage write at all. On first
    /// insert only, an unset `started_at` is stamped with now, so
    /// re-reading a module never resets its start time.
    pub fn mark_section_read(&self, module_id: &str, section_index: u32) {
        let mut all = self.read_all();
        let record = all.entry(module_id.to_string()).or_default();
        if record.mark_section_read(section_index, Utc::now()) {
            self.persist_progress(&all);
        }
    }

    /// Reading-completion percentage for one module.
    pub fn section_percent(&self, module_id: &str, total_sections: usize) -> u32 {
        section_percent(self.read_all().get(module_id), total_sections)
    }

    /// Aggregate started/completed counts over the stored mapping.
    pub fn overall_stats(&self, total_module_count: usize) -> OverallStats {
        overall_stats(&self.read_all(), total_module_count)
    }

    /// Mark the module's reading explicitly complete.
    ///
    /// Stamps `completed_at` once when the quiz is already done and the
    /// module has no completion time yet.
    pub fn complete_slides(&self, module_id: &str) {
        let mut all = self.read_all();
        let record = all.entry(module_id.to_string()).or_default();
        record.slides_completed = true;
        if record.quiz_completed && record.completed_at.is_none() {
            record.completed_at = Some(Utc::now());
        }
        self.persist_progress(&all);
    }

    /// Record a graded quiz attempt.
    ///
    /// Always overwrites `quiz_score` with the latest attempt. Stamps
    /// `completed_at` once when reading is already complete and no
    /// completion time is set.
    pub fn record_quiz_result(&self, module_id: &str, outcome: &QuizOutcome) {
        let mut all = self.read_all();
        let record = all.entry(module_id.to_string()).or_default();
        record.quiz_completed = true;
        record.quiz_score = Some(outcome.correct);
        if record.slides_completed && record.completed_at.is_none() {
            record.completed_at = Some(Utc::now());
        }
        self.persist_progress(&all);
    }

    /// Replace the whole stored mapping; strict (state import path).
    pub(crate) fn try_replace_progress(
        &self,
        progress: &CurriculumProgress,
    ) -> Result<(), StorageError> {
        let raw = serde_json::to_string(progress)
            .map_err(|e| StorageError::Serialize(e.to_string()))?;
        self.backend().put(PROGRESS_KEY, &raw)
    }

    /// Persist the mapping, dropping the write on failure after a warn.
    fn persist_progress(&self, progress: &CurriculumProgress) {
        self.try_replace_progress(progress)
            .log_warn("persisting progress");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::backend::UnavailableBackend;
    use crate::store::{MemoryBackend, StorageBackend};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Backend that counts writes, to observe which operations persist.
    struct CountingBackend {
        inner: MemoryBackend,
        puts: Arc<AtomicUsize>,
    }

    impl StorageBackend for CountingBackend {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get(key)
        }

        fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.puts.fetch_add(1, Ordering::SeqCst);
            self.inner.put(key, value)
        }
    }

    #[test]
    fn test_read_all_empty_store() {
        let store = StateStore::in_memory();
        assert!(store.read_all().is_empty());
        assert!(store.read_module_progress("ataxia").is_none());
    }

    #[test]
    fn test_read_all_malformed_blob_fails_open() {
        let backend = MemoryBackend::new();
        backend.seed(PROGRESS_KEY, "not json");
        let store = StateStore::new(backend);

        // The corrupted blob reads as empty rather than erroring
        assert!(store.read_all().is_empty());
        assert!(store.try_read_all().is_err());
    }

    #[test]
    fn test_read_all_unavailable_storage_fails_open() {
        let store = StateStore::new(UnavailableBackend);
        assert!(store.read_all().is_empty());
        assert_eq!(store.overall_stats(10).percent, 0);
    }

    #[test]
    fn test_write_then_read_module_progress() {
        let store = StateStore::in_memory();
        store.write_module_progress(
            "ataxia",
            ProgressUpdate {
                current_slide: Some(4),
                last_section: Some(2),
                ..Default::default()
            },
        );

        let record = store.read_module_progress("ataxia").unwrap();
        assert_eq!(record.current_slide, 4);
        assert_eq!(record.last_section, Some(2));
        assert!(record.sections_read.is_empty());
    }

    #[test]
    fn test_write_merges_onto_existing_record() {
        let store = StateStore::in_memory();
        store.mark_section_read("ataxia", 0);
        store.mark_section_read("ataxia", 1);

        store.write_module_progress(
            "ataxia",
            ProgressUpdate {
                quiz_score: Some(6),
                ..Default::default()
            },
        );

        let record = store.read_module_progress("ataxia").unwrap();
        // Fields absent from the update survive the merge
        assert_eq!(record.sections_read, vec![0, 1]);
        assert_eq!(record.quiz_score, Some(6));
    }

    #[test]
    fn test_mark_section_read_scenario() {
        // Module "ataxia" has 8 sections; reading 0, 3, 3 yields [0, 3] and 25%
        let store = StateStore::in_memory();
        store.mark_section_read("ataxia", 0);
        store.mark_section_read("ataxia", 3);
        store.mark_section_read("ataxia", 3);

        let record = store.read_module_progress("ataxia").unwrap();
        assert_eq!(record.sections_read, vec![0, 3]);
        assert_eq!(store.section_percent("ataxia", 8), 25);
    }

    #[test]
    fn test_mark_section_read_keeps_started_at() {
        let store = StateStore::in_memory();
        store.mark_section_read("ataxia", 0);
        let first = store.read_module_progress("ataxia").unwrap().started_at;
        assert!(first.is_some());

        store.mark_section_read("ataxia", 0);
        let second = store.read_module_progress("ataxia").unwrap().started_at;
        assert_eq!(first, second);
    }

    #[test]
    fn test_duplicate_mark_issues_no_write() {
        let puts = Arc::new(AtomicUsize::new(0));
        let store = StateStore::new(CountingBackend {
            inner: MemoryBackend::new(),
            puts: Arc::clone(&puts),
        });

        store.mark_section_read("ataxia", 0);
        assert_eq!(puts.load(Ordering::SeqCst), 1);

        // The duplicate is skipped before storage is touched, not
        // rewritten with an identical value
        store.mark_section_read("ataxia", 0);
        assert_eq!(puts.load(Ordering::SeqCst), 1);
        assert_eq!(
            store.read_module_progress("ataxia").unwrap().sections_read,
            vec![0]
        );
    }

    #[test]
    fn test_section_percent_zero_sections() {
        let store = StateStore::in_memory();
        store.complete_slides("ataxia");
        assert_eq!(store.section_percent("ataxia", 0), 0);
    }

    #[test]
    fn test_complete_slides_overrides_percent() {
        let store = StateStore::in_memory();
        store.complete_slides("ataxia");
        assert_eq!(store.section_percent("ataxia", 8), 100);
        assert!(store
            .read_module_progress("ataxia")
            .unwrap()
            .sections_read
            .is_empty());
    }

    #[test]
    fn test_completed_at_stamped_once_either_order() {
        // Reading done first, then quiz
        let store = StateStore::in_memory();
        store.complete_slides("ataxia");
        assert!(store
            .read_module_progress("ataxia")
            .unwrap()
            .completed_at
            .is_none());

        let outcome = QuizOutcome::new(7, 8);
        store.record_quiz_result("ataxia", &outcome);
        let stamped = store.read_module_progress("ataxia").unwrap().completed_at;
        assert!(stamped.is_some());

        // Re-recording the quiz must not move the completion time
        store.record_quiz_result("ataxia", &QuizOutcome::new(8, 8));
        let record = store.read_module_progress("ataxia").unwrap();
        assert_eq!(record.completed_at, stamped);
        assert_eq!(record.quiz_score, Some(8));

        // Quiz done first, then reading
        let store = StateStore::in_memory();
        store.record_quiz_result("epilepsy", &QuizOutcome::new(5, 8));
        assert!(store
            .read_module_progress("epilepsy")
            .unwrap()
            .completed_at
            .is_none());
        store.complete_slides("epilepsy");
        assert!(store
            .read_module_progress("epilepsy")
            .unwrap()
            .completed_at
            .is_some());
    }

    #[test]
    fn test_overall_stats_over_store() {
        let store = StateStore::in_memory();
        store.complete_slides("ataxia");
        store.record_quiz_result("ataxia", &QuizOutcome::new(8, 8));
        store.mark_section_read("epilepsy", 0);

        let stats = store.overall_stats(4);
        assert_eq!(stats.started, 2);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.percent, 25);
    }

    #[test]
    fn test_writes_dropped_silently_when_unavailable() {
        let store = StateStore::new(UnavailableBackend);
        // Must not panic or error; the write is simply lost
        store.mark_section_read("ataxia", 0);
        store.complete_slides("ataxia");
        assert!(store.read_module_progress("ataxia").is_none());
    }
}
