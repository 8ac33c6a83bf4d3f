//! Optional per-module slide decks.
//!
//! A deck is a manifest (`slides/<module_id>/manifest.json`) plus `count`
//! sequentially numbered image files. Decks are optional content: an absent
//! manifest, or one with `count == 0`, is the explicit "no slides" empty
//! state and never an error.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

fn default_format() -> String {
    "webp".to_string()
}

/// On-disk slide deck descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideManifest {
    pub module_id: String,
    pub count: u32,
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,
}

/// Error loading a slide manifest; callers degrade to the empty deck.
#[derive(Debug)]
pub enum SlideManifestError {
    IoError(String, String),
    ParseError(String, String),
}

impl std::fmt::Display for SlideManifestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SlideManifestError::IoError(path, err) => {
                write!(f, "IO error reading {}: {}", path, err)
            }
            SlideManifestError::ParseError(path, err) => {
                write!(f, "Parse error in {}: {}", path, err)
            }
        }
    }
}

impl SlideManifestError {
    /// Returns a user-facing error message without exposing filesystem paths.
    pub fn user_message(&self) -> &str {
        match self {
            SlideManifestError::IoError(_, _) => "Failed to read slide manifest",
            SlideManifestError::ParseError(_, _) => "Failed to parse slide manifest",
        }
    }
}

impl std::error::Error for SlideManifestError {}

/// Load a manifest file; strict variant.
pub fn load_manifest(path: &Path) -> Result<SlideManifest, SlideManifestError> {
    let display = path.display().to_string();
    let raw = fs::read_to_string(path)
        .map_err(|e| SlideManifestError::IoError(display.clone(), e.to_string()))?;
    serde_json::from_str(&raw).map_err(|e| SlideManifestError::ParseError(display, e.to_string()))
}

/// A module's slide deck as the presenter consumes it.
#[derive(Debug, Clone)]
pub struct SlideDeck {
    pub module_id: String,
    pub count: u32,
    pub format: String,
}

impl SlideDeck {
    /// The empty "no slides" state for a module.
    pub fn empty(module_id: &str) -> Self {
        Self {
            module_id: module_id.to_string(),
            count: 0,
            format: default_format(),
        }
    }

    /// Load the deck for a module from the configured data directory.
    ///
    /// An absent manifest is the normal no-slides case and loads silently;
    /// a present but unreadable one is logged before degrading.
    pub fn load(module_id: &str) -> Self {
        Self::load_from(module_id, &crate::paths::slide_manifest_path(module_id))
    }

    /// Load from an explicit manifest path (tests, alternate layouts).
    pub fn load_from(module_id: &str, manifest_path: &Path) -> Self {
        if !manifest_path.exists() {
            return Self::empty(module_id);
        }
        match load_manifest(manifest_path) {
            Ok(manifest) => Self {
                module_id: module_id.to_string(),
                count: manifest.count,
                format: manifest.format,
            },
            Err(e) => {
                tracing::warn!("Corrupt slide manifest for '{}': {}", module_id, e);
                Self::empty(module_id)
            }
        }
    }

    pub fn has_slides(&self) -> bool {
        self.count > 0
    }

    /// File name of the slide at a 0-based index (`slide_01.webp`, ...).
    ///
    /// Names are 1-based and zero-padded to two digits to match the
    /// generated image files.
    pub fn image_file(&self, index: u32) -> Option<String> {
        if index >= self.count {
            return None;
        }
        Some(format!("slide_{:02}.{}", index + 1, self.format))
    }

    /// Full path to the slide image at a 0-based index.
    pub fn image_path(&self, index: u32) -> Option<PathBuf> {
        self.image_file(index)
            .map(|name| crate::paths::slide_image_path(&self.module_id, &name))
    }
}

/// Clamp a stored slide position to a deck's current bounds.
///
/// A regenerated deck may be shorter than the one the learner last viewed;
/// resuming lands on the last slide rather than past the end.
pub fn clamp_slide_index(stored: u32, count: u32) -> u32 {
    if count == 0 {
        0
    } else {
        stored.min(count - 1)
    }
}
