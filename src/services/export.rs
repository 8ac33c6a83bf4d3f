//! Portable export/import of learner state.
//!
//! The bundle is one JSON document holding both store tables plus metadata
//! for compatibility checks. Export uses the strict store reads: a corrupt
//! store must surface as an error, never silently export as empty state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::APP_VERSION;
use crate::domain::{CurriculumProgress, FlaggedItem};
use crate::store::{StateStore, StorageError};

/// Export format version
pub const FORMAT_VERSION: u32 = 1;

/// The exported state document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle {
    /// Format version for future compatibility
    pub format_version: u32,
    /// Timestamp of export
    pub exported_at: DateTime<Utc>,
    /// Application version at export time
    pub app_version: String,
    pub progress: CurriculumProgress,
    pub flags: Vec<FlaggedItem>,
}

/// Result of an import operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportSummary {
    /// Modules taken from the bundle (no local record existed)
    pub modules_added: usize,
    /// Modules skipped because a local record exists (local wins)
    pub modules_skipped: usize,
    /// Flags taken from the bundle (id not present locally)
    pub flags_added: usize,
    /// Flags skipped because the id is already flagged locally
    pub flags_skipped: usize,
    /// True when the bundle came from an incompatible-looking app version
    pub version_warning: bool,
}

/// Error exporting or importing state.
#[derive(Debug)]
pub enum ExportError {
    Storage(StorageError),
    ParseError(String),
    UnsupportedVersion(u32),
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::Storage(e) => write!(f, "Storage error: {}", e),
            ExportError::ParseError(e) => write!(f, "Invalid export bundle: {}", e),
            ExportError::UnsupportedVersion(v) => {
                write!(f, "Unsupported export format version: {}", v)
            }
        }
    }
}

impl ExportError {
    /// Returns a user-facing error message without internal details.
    pub fn user_message(&self) -> &str {
        match self {
            ExportError::Storage(e) => e.user_message(),
            ExportError::ParseError(_) => "The file is not a valid progress export",
            ExportError::UnsupportedVersion(_) => {
                "The export was created by an incompatible version"
            }
        }
    }
}

impl std::error::Error for ExportError {}

impl From<StorageError> for ExportError {
    fn from(e: StorageError) -> Self {
        ExportError::Storage(e)
    }
}

/// Export the full learner state as a JSON document.
pub fn export_state(store: &StateStore) -> Result<String, ExportError> {
    let bundle = ExportBundle {
        format_version: FORMAT_VERSION,
        exported_at: Utc::now(),
        app_version: APP_VERSION.to_string(),
        progress: store.try_read_all()?,
        flags: store.try_read_flags()?,
    };
    serde_json::to_string_pretty(&bundle)
        .map_err(|e| ExportError::Storage(StorageError::Serialize(e.to_string())))
}

/// Import a previously exported bundle, merging into the local store.
///
/// Merge policy: local wins for modules that already have a record; flags
/// are unioned by id. An unknown format version is rejected; a different
/// application major version is logged and flagged on the summary but does
/// not block the import.
pub fn import_state(store: &StateStore, json: &str) -> Result<ImportSummary, ExportError> {
    let bundle: ExportBundle =
        serde_json::from_str(json).map_err(|e| ExportError::ParseError(e.to_string()))?;

    if bundle.format_version != FORMAT_VERSION {
        return Err(ExportError::UnsupportedVersion(bundle.format_version));
    }

    let version_warning = !versions_compatible(APP_VERSION, &bundle.app_version);
    if version_warning {
        tracing::warn!(
            "Importing state from app version {} into {}",
            bundle.app_version,
            APP_VERSION
        );
    }

    let mut summary = ImportSummary {
        version_warning,
        ..Default::default()
    };

    // Read both tables strictly before writing either, so a failed read
    // aborts with the store untouched rather than half-merged
    let mut progress = store.try_read_all()?;
    let mut flags = store.try_read_flags()?;

    // Local records win; only missing modules come from the bundle
    for (module_id, record) in bundle.progress {
        if progress.contains_key(&module_id) {
            summary.modules_skipped += 1;
        } else {
            progress.insert(module_id, record);
            summary.modules_added += 1;
        }
    }

    // Flags union by id
    for flag in bundle.flags {
        if flags.iter().any(|f| f.id == flag.id) {
            summary.flags_skipped += 1;
        } else {
            flags.push(flag);
            summary.flags_added += 1;
        }
    }

    store.try_replace_progress(&progress)?;
    store.try_replace_flags(&flags)?;

    Ok(summary)
}

/// Same-major compatibility; all 0.x versions are treated as compatible.
fn versions_compatible(ours: &str, theirs: &str) -> bool {
    let major = |v: &str| v.split('.').next().and_then(|s| s.parse::<u32>().ok());
    match (major(ours), major(theirs)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PROGRESS_KEY;
    use crate::domain::FlagCandidate;
    use crate::store::MemoryBackend;

    fn candidate(key_point: &str) -> FlagCandidate {
        FlagCandidate {
            module_id: "ataxia".into(),
            module_title: "Ataxia".into(),
            section_title: "Genetics".into(),
            key_point: key_point.into(),
        }
    }

    #[test]
    fn test_export_import_round_trip() {
        let source = StateStore::in_memory();
        source.mark_section_read("ataxia", 0);
        source.mark_section_read("ataxia", 3);
        source.toggle_flag(candidate("SCA1 is CAG repeat"));

        let json = export_state(&source).unwrap();

        let target = StateStore::in_memory();
        let summary = import_state(&target, &json).unwrap();
        assert_eq!(summary.modules_added, 1);
        assert_eq!(summary.flags_added, 1);
        assert!(!summary.version_warning);

        assert_eq!(
            target.read_module_progress("ataxia").unwrap().sections_read,
            vec![0, 3]
        );
        assert!(target.is_flagged("ataxia", "Genetics", "SCA1 is CAG repeat"));
    }

    #[test]
    fn test_import_local_record_wins() {
        let source = StateStore::in_memory();
        source.mark_section_read("ataxia", 0);
        let json = export_state(&source).unwrap();

        let target = StateStore::in_memory();
        target.mark_section_read("ataxia", 5);
        let summary = import_state(&target, &json).unwrap();

        assert_eq!(summary.modules_added, 0);
        assert_eq!(summary.modules_skipped, 1);
        assert_eq!(
            target.read_module_progress("ataxia").unwrap().sections_read,
            vec![5]
        );
    }

    #[test]
    fn test_import_unions_flags_by_id() {
        let source = StateStore::in_memory();
        source.toggle_flag(candidate("SCA1 is CAG repeat"));
        source.toggle_flag(candidate("SCA3 is the most common SCA"));
        let json = export_state(&source).unwrap();

        let target = StateStore::in_memory();
        target.toggle_flag(candidate("SCA1 is CAG repeat"));
        let summary = import_state(&target, &json).unwrap();

        assert_eq!(summary.flags_added, 1);
        assert_eq!(summary.flags_skipped, 1);
        assert_eq!(target.read_flags().len(), 2);
    }

    #[test]
    fn test_import_rejects_unknown_format_version() {
        let target = StateStore::in_memory();
        let json = r#"{"formatVersion": 99, "exportedAt": "2026-01-10T00:00:00Z",
                       "appVersion": "0.2.0", "progress": {}, "flags": []}"#;
        let err = import_state(&target, json).unwrap_err();
        assert!(matches!(err, ExportError::UnsupportedVersion(99)));
    }

    #[test]
    fn test_import_rejects_invalid_json() {
        let target = StateStore::in_memory();
        assert!(matches!(
            import_state(&target, "not json").unwrap_err(),
            ExportError::ParseError(_)
        ));
    }

    #[test]
    fn test_export_surfaces_corrupt_store() {
        // Unlike the fail-open reads, export must not pretend a corrupt
        // store is empty state
        let backend = MemoryBackend::new();
        backend.seed(PROGRESS_KEY, "not json");
        let store = StateStore::new(backend);

        assert!(matches!(
            export_state(&store).unwrap_err(),
            ExportError::Storage(StorageError::Parse(_))
        ));
    }

    #[test]
    fn test_import_corrupt_flags_leaves_store_untouched() {
        let source = StateStore::in_memory();
        source.mark_section_read("epilepsy", 0);
        let json = export_state(&source).unwrap();

        // Progress is readable but the flags table is corrupt
        let backend = MemoryBackend::new();
        backend.seed(crate::config::FLAGS_KEY, "not json");
        let target = StateStore::new(backend);
        target.mark_section_read("ataxia", 2);

        let err = import_state(&target, &json).unwrap_err();
        assert!(matches!(err, ExportError::Storage(StorageError::Parse(_))));

        // A failed import must not have merged anything
        assert!(target.read_module_progress("epilepsy").is_none());
        assert_eq!(
            target.read_module_progress("ataxia").unwrap().sections_read,
            vec![2]
        );
    }

    #[test]
    fn test_versions_compatible() {
        assert!(versions_compatible("0.2.0", "0.9.7"));
        assert!(versions_compatible("1.2.0", "1.0.0"));
        assert!(!versions_compatible("1.0.0", "2.0.0"));
        assert!(!versions_compatible("1.0.0", "garbage"));
    }
}
