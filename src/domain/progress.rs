//! Per-module learner progress records and the pure metrics derived
//! from them.
//!
//! Records serialize with the camelCase field names used by the persisted
//! JSON blobs, so stored state is interchangeable across releases.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Full curriculum progress: module id -> per-module record.
///
/// Bounded in practice by the number of curriculum modules (tens).
pub type CurriculumProgress = HashMap<String, ModuleProgress>;

/// Learner state for a single curriculum module.
///
/// Created lazily on first write; a module with no record simply has no
/// progress yet, which is a valid, expected state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModuleProgress {
    /// Last slide index viewed (slide-deck mode), 0-based
    pub current_slide: u32,
    /// Indices of content sections the learner has viewed.
    /// Membership-checked before insert, so duplicates cannot occur.
    pub sections_read: Vec<u32>,
    /// True once the learner explicitly marks the module's reading complete
    pub slides_completed: bool,
    pub quiz_completed: bool,
    /// Correct answers on the most recent quiz attempt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiz_score: Option<u32>,
    /// Set exactly once, on the first section read; never overwritten
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    /// Set once both reading and quiz are complete
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    /// Most recently viewed section index, used to resume reading
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_section: Option<u32>,
}

impl ModuleProgress {
    /// Record a section as read. Returns true if the record changed.
    ///
    /// Idempotent: an index already present leaves the record untouched
    /// (callers use the return value to skip a redundant storage write).
    /// `started_at` is stamped only when unset, so re-reading a module
    /// never resets its start time.
    pub fn mark_section_read(&mut self, section_index: u32, now: DateTime<Utc>) -> bool {
        if self.sections_read.contains(&section_index) {
            return false;
        }
        self.sections_read.push(section_index);
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
        true
    }

    /// Apply a partial update via shallow field overwrite.
    ///
    /// Fields absent from the update are preserved; fields present fully
    /// replace the prior value. `sections_read` in particular is replaced
    /// wholesale, not merged element-wise.
    pub fn apply(&mut self, update: ProgressUpdate) {
        if let Some(v) = update.current_slide {
            self.current_slide = v;
        }
        if let Some(v) = update.sections_read {
            self.sections_read = v;
        }
        if let Some(v) = update.slides_completed {
            self.slides_completed = v;
        }
        if let Some(v) = update.quiz_completed {
            self.quiz_completed = v;
        }
        if let Some(v) = update.quiz_score {
            self.quiz_score = Some(v);
        }
        if let Some(v) = update.started_at {
            self.started_at = Some(v);
        }
        if let Some(v) = update.completed_at {
            self.completed_at = Some(v);
        }
        if let Some(v) = update.last_section {
            self.last_section = Some(v);
        }
    }
}

/// Partial update for a module record: `None` preserves the stored value,
/// `Some` replaces it.
#[derive(Debug, Clone, Default)]
pub struct ProgressUpdate {
    pub current_slide: Option<u32>,
    pub sections_read: Option<Vec<u32>>,
    pub slides_completed: Option<bool>,
    pub quiz_completed: Option<bool>,
    pub quiz_score: Option<u32>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub last_section: Option<u32>,
}

/// Aggregate progress across the whole curriculum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OverallStats {
    /// Modules with any progress record at all
    pub started: usize,
    /// Modules where both reading and quiz are complete
    pub completed: usize,
    /// Rounded completion percentage over the full curriculum
    pub percent: u32,
}

/// Completion percentage for one module's reading.
///
/// A zero section count always yields 0 (avoids division by zero, even for
/// a module marked complete). Otherwise an explicit "mark complete" forces
/// 100 regardless of how many sections were individually recorded.
pub fn section_percent(progress: Option<&ModuleProgress>, total_sections: usize) -> u32 {
    if total_sections == 0 {
        return 0;
    }
    let Some(record) = progress else {
        return 0;
    };
    if record.slides_completed {
        return 100;
    }
    ((record.sections_read.len() as f64 / total_sections as f64) * 100.0).round() as u32
}

/// Aggregate started/completed counts over the full progress mapping.
pub fn overall_stats(progress: &CurriculumProgress, total_module_count: usize) -> OverallStats {
    let started = progress.len();
    let completed = progress
        .values()
        .filter(|p| p.slides_completed && p.quiz_completed)
        .count();
    let percent = if total_module_count == 0 {
        0
    } else {
        ((completed as f64 / total_module_count as f64) * 100.0).round() as u32
    };
    OverallStats {
        started,
        completed,
        percent,
    }
}
