//! Flagged key points saved for spaced review.
//!
//! A flag denormalizes its display data (module and section titles, the
//! key point text) at flag time; it is deliberately not kept in sync with
//! later content edits. Identity comes from a deterministic hash of the
//! (module, section, key point) triple, so toggling the same concept is
//! idempotent across sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A key point the learner marked for review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlaggedItem {
    /// Deterministic id derived from the (module, section, key point) triple
    pub id: String,
    pub module_id: String,
    pub module_title: String,
    pub section_title: String,
    pub key_point: String,
    /// Creation timestamp; assigned once, never mutated
    pub flagged_at: DateTime<Utc>,
}

/// The identifying and display data for a flag before it is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagCandidate {
    pub module_id: String,
    pub module_title: String,
    pub section_title: String,
    pub key_point: String,
}

impl FlagCandidate {
    /// The deterministic id this candidate would receive as a flag.
    pub fn id(&self) -> String {
        flag_id(&self.module_id, &self.section_title, &self.key_point)
    }

    /// Materialize the candidate into a stored flag record.
    pub fn into_flag(self, flagged_at: DateTime<Utc>) -> FlaggedItem {
        FlaggedItem {
            id: self.id(),
            module_id: self.module_id,
            module_title: self.module_title,
            section_title: self.section_title,
            key_point: self.key_point,
            flagged_at,
        }
    }
}

/// Separator between the triple's parts; part of the persisted id contract.
const ID_SEPARATOR: &str = "::";

/// Deterministic, non-cryptographic flag id.
///
/// Folds the UTF-16 code units of `moduleId::sectionTitle::keyPoint` into a
/// 32-bit signed integer (`hash = hash * 31 + unit`, wrapping each step),
/// then renders the absolute value in lowercase base-36. Stable across
/// sessions and releases; collisions are tolerated (two colliding key
/// points merely toggle each other's flag).
pub fn flag_id(module_id: &str, section_title: &str, key_point: &str) -> String {
    let combined =
        format!("{module_id}{ID_SEPARATOR}{section_title}{ID_SEPARATOR}{key_point}");
    let mut hash: i32 = 0;
    for unit in combined.encode_utf16() {
        hash = hash.wrapping_mul(31).wrapping_add(unit as i32);
    }
    // Widen before abs so i32::MIN doesn't overflow
    to_base36((hash as i64).unsigned_abs())
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}
