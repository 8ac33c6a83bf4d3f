//! Application configuration constants.
//!
//! This module centralizes all configurable values and the stable names the
//! persistence layer depends on.

use serde::Deserialize;
use std::path::PathBuf;

// ==================== Storage Configuration ====================

/// Configuration file structure for config.toml
#[derive(Debug, Deserialize)]
struct AppConfig {
    storage: Option<StorageConfig>,
}

#[derive(Debug, Deserialize)]
struct StorageConfig {
    dir: Option<String>,
}

/// Load the data directory with priority: config.toml > .env > default
pub fn load_data_dir() -> PathBuf {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    // Priority 1: config.toml
    if let Ok(contents) = std::fs::read_to_string("config.toml") {
        if let Ok(config) = toml::from_str::<AppConfig>(&contents) {
            if let Some(storage) = config.storage {
                if let Some(dir) = storage.dir {
                    tracing::info!("Using data directory from config.toml: {}", dir);
                    return PathBuf::from(dir);
                }
            }
        }
    }

    // Priority 2: .env NEURO_DATA_DIR
    if let Ok(dir) = std::env::var("NEURO_DATA_DIR") {
        tracing::info!("Using data directory from NEURO_DATA_DIR env: {}", dir);
        return PathBuf::from(dir);
    }

    // Default
    let default = PathBuf::from("data");
    tracing::info!("Using default data directory: {}", default.display());
    default
}

// ==================== Storage Keys ====================

// These key names are the on-disk contract: changing either one discards
// all previously recorded learner state.

/// Storage key holding the JSON-serialized curriculum progress mapping
pub const PROGRESS_KEY: &str = "neuro_progress";

/// Storage key holding the JSON-serialized array of flagged key points
pub const FLAGS_KEY: &str = "neuro_flags";

// ==================== Quiz Configuration ====================

/// Minimum score percentage to pass a module quiz
pub const QUIZ_PASS_PERCENT: u32 = 70;

// ==================== Export Configuration ====================

/// Application version stamped into exported state bundles
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
