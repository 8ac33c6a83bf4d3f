//! Project path functions - single source of truth for all file paths.
//!
//! This module centralizes path definitions to avoid hardcoded strings
//! scattered throughout the codebase. The base directory is resolved once
//! via `config::load_data_dir()` (config.toml > NEURO_DATA_DIR > "data")
//! and cached for the life of the process.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Lazily initialized base data directory
static DATA_DIR_VALUE: OnceLock<PathBuf> = OnceLock::new();

/// Get the base data directory (resolved once, then cached)
pub fn data_dir() -> &'static Path {
    DATA_DIR_VALUE.get_or_init(crate::config::load_data_dir)
}

/// SQLite database holding the learner state store (progress + flags)
pub fn store_db_path() -> PathBuf {
    data_dir().join("notebook.db")
}

// ==================== Module Content Paths ====================

/// Directory containing the static module content catalog
pub fn modules_dir() -> PathBuf {
    data_dir().join("modules")
}

/// Content file for a single module (e.g. `modules/module_ataxia.json`)
pub fn module_file(module_id: &str) -> PathBuf {
    modules_dir().join(format!("module_{module_id}.json"))
}

// ==================== Slide Deck Paths ====================

/// Base directory for per-module slide decks
pub fn slides_dir() -> PathBuf {
    data_dir().join("slides")
}

/// Directory holding one module's slide images and manifest
pub fn slide_deck_dir(module_id: &str) -> PathBuf {
    slides_dir().join(module_id)
}

/// Slide deck manifest for a module (`slides/<module_id>/manifest.json`)
pub fn slide_manifest_path(module_id: &str) -> PathBuf {
    slide_deck_dir(module_id).join("manifest.json")
}

/// Full path to a named slide image within a module's deck
pub fn slide_image_path(module_id: &str, file_name: &str) -> PathBuf {
    slide_deck_dir(module_id).join(file_name)
}

// ==================== Tests ====================
