//! Static module content catalog.
//!
//! Modules are authored as `module_<id>.json` files in the data directory.
//! The store and its consumers only depend on `id`, the section count, and
//! the quiz length; everything else is opaque display data owned by content
//! authors, so loading is tolerant of extra and missing display fields.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One unit of curriculum content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleContent {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub learning_objectives: Vec<String>,
    #[serde(default)]
    pub sections: Vec<ModuleSection>,
    #[serde(default)]
    pub quiz: Vec<QuizQuestion>,
}

/// One sub-unit of a module's textual content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleSection {
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub key_points: Vec<String>,
}

/// One multiple-choice quiz question.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    /// Index into `options` of the correct answer
    pub answer: usize,
    #[serde(default)]
    pub explanation: String,
}

/// Error loading or validating module content.
#[derive(Debug)]
pub enum ContentError {
    IoError(String, String),
    ParseError(String, String),
    ValidationError(String, String),
}

impl std::fmt::Display for ContentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentError::IoError(path, err) => write!(f, "IO error reading {}: {}", path, err),
            ContentError::ParseError(path, err) => {
                write!(f, "Parse error in {}: {}", path, err)
            }
            ContentError::ValidationError(id, err) => {
                write!(f, "Validation error for module '{}': {}", id, err)
            }
        }
    }
}

impl ContentError {
    /// Returns a user-facing error message without exposing filesystem paths.
    pub fn user_message(&self) -> &str {
        match self {
            ContentError::IoError(_, _) => "Failed to read module content",
            ContentError::ParseError(_, _) => "Failed to parse module content",
            ContentError::ValidationError(_, _) => "Module content is invalid",
        }
    }
}

impl std::error::Error for ContentError {}

impl ModuleContent {
    /// Light structural checks on load; display fields stay unvalidated.
    fn validate(&self) -> Result<(), ContentError> {
        if self.id.is_empty() {
            return Err(ContentError::ValidationError(
                self.id.clone(),
                "module id is empty".into(),
            ));
        }
        if self.title.is_empty() {
            return Err(ContentError::ValidationError(
                self.id.clone(),
                "module title is empty".into(),
            ));
        }
        for (i, q) in self.quiz.iter().enumerate() {
            if q.answer >= q.options.len() {
                return Err(ContentError::ValidationError(
                    self.id.clone(),
                    format!("quiz question {} answer index out of range", i),
                ));
            }
        }
        Ok(())
    }
}

/// Load and validate a single module content file.
pub fn load_module_from_file(path: &Path) -> Result<ModuleContent, ContentError> {
    let display = path.display().to_string();
    let raw =
        fs::read_to_string(path).map_err(|e| ContentError::IoError(display.clone(), e.to_string()))?;
    let module: ModuleContent =
        serde_json::from_str(&raw).map_err(|e| ContentError::ParseError(display, e.to_string()))?;
    module.validate()?;
    Ok(module)
}

/// The loaded curriculum: all modules, sorted by id.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    modules: Vec<ModuleContent>,
}

impl Catalog {
    pub fn new(mut modules: Vec<ModuleContent>) -> Self {
        modules.sort_by(|a, b| a.id.cmp(&b.id));
        Self { modules }
    }

    pub fn modules(&self) -> &[ModuleContent] {
        &self.modules
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn find(&self, module_id: &str) -> Option<&ModuleContent> {
        self.modules.iter().find(|m| m.id == module_id)
    }

    /// Section count for one module; 0 for an unknown id.
    pub fn section_count(&self, module_id: &str) -> usize {
        self.find(module_id).map_or(0, |m| m.sections.len())
    }

    /// Quiz length for one module; 0 for an unknown id.
    pub fn quiz_len(&self, module_id: &str) -> usize {
        self.find(module_id).map_or(0, |m| m.quiz.len())
    }
}

/// Scan a directory for `module_*.json` files and load the catalog.
///
/// Unreadable or invalid entries are logged and skipped; a missing
/// directory yields an empty catalog. Content problems never prevent the
/// application from starting.
pub fn load_catalog_from_directory(dir: &Path) -> Catalog {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("Module directory {} unreadable: {}", dir.display(), e);
            return Catalog::default();
        }
    };

    let mut modules = Vec::new();
    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if !name.starts_with("module_") || !name.ends_with(".json") {
            continue;
        }
        match load_module_from_file(&path) {
            Ok(module) => modules.push(module),
            Err(e) => {
                tracing::warn!("Skipping invalid module at {}: {}", path.display(), e);
            }
        }
    }

    tracing::info!("Loaded {} curriculum modules from {}", modules.len(), dir.display());
    Catalog::new(modules)
}

/// Load the catalog from the configured data directory.
pub fn load_catalog() -> Catalog {
    load_catalog_from_directory(&crate::paths::modules_dir())
}
