//! Test utilities for store and content setup.
//!
//! Provides a disposable environment with a durable sqlite-backed store and
//! content fixtures, so tests never share state or duplicate the schema.

use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

use crate::content::{ModuleContent, ModuleSection, QuizQuestion};
use crate::store::{SqliteBackend, StateStore, StorageError};

/// Test environment: a temporary data directory with a sqlite-backed store.
///
/// The directory (and with it the database) is removed when dropped.
pub struct TestEnv {
    /// Temporary directory (kept alive for database file persistence)
    pub temp: TempDir,
    /// Store backed by `notebook.db` inside the temporary directory
    pub store: Arc<StateStore>,
}

impl TestEnv {
    pub fn new() -> Result<Self, StorageError> {
        let temp = TempDir::new().map_err(|e| StorageError::Io(e.to_string()))?;
        let backend = SqliteBackend::open(&temp.path().join("notebook.db"))?;
        Ok(Self {
            temp,
            store: Arc::new(StateStore::new(backend)),
        })
    }

    /// Get the temporary directory path for creating test files.
    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    /// Directory for module content fixtures (`<temp>/modules`).
    pub fn modules_dir(&self) -> std::path::PathBuf {
        self.temp.path().join("modules")
    }

    /// Write a module fixture as `modules/module_<id>.json`.
    pub fn write_module_file(&self, module: &ModuleContent) -> std::io::Result<()> {
        let dir = self.modules_dir();
        std::fs::create_dir_all(&dir)?;
        let json = serde_json::to_string_pretty(module)
            .map_err(|e| std::io::Error::other(e.to_string()))?;
        std::fs::write(dir.join(format!("module_{}.json", module.id)), json)
    }
}

/// A minimal valid module with `section_count` sections and one quiz
/// question, for tests that only care about structure.
pub fn sample_module(id: &str, section_count: usize) -> ModuleContent {
    ModuleContent {
        id: id.to_string(),
        title: format!("Module {id}"),
        description: "Test module".into(),
        tags: vec!["test".into()],
        difficulty: "intermediate".into(),
        duration: "30 min".into(),
        color: "#4a6fa5".into(),
        learning_objectives: vec!["Recognize the core genetics".into()],
        sections: (0..section_count)
            .map(|i| ModuleSection {
                title: format!("Section {i}"),
                content: format!("Content for section {i}."),
                key_points: vec![format!("Key point {i}")],
            })
            .collect(),
        quiz: vec![QuizQuestion {
            question: "Which option is correct?".into(),
            options: vec!["a".into(), "b".into(), "c".into()],
            answer: 1,
            explanation: "b is correct".into(),
        }],
    }
}
