//! Full-text search over the module catalog.
//!
//! Each section flattens into one searchable entry; matching is
//! case-insensitive substring search with title hits outranking body hits.

use serde::Serialize;

use crate::content::ModuleContent;

/// One searchable unit: a module section with its display context.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchEntry {
    /// `moduleId-sectionIndex`, stable across rebuilds of the same catalog
    pub id: String,
    pub module_id: String,
    pub module_title: String,
    pub section_title: String,
    /// Section content plus joined key points
    pub body: String,
    pub tags: Vec<String>,
}

/// A matched entry with its relevance score.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub entry: SearchEntry,
    pub score: u32,
}

/// Flatten the catalog's modules into searchable entries.
pub fn build_search_entries(modules: &[ModuleContent]) -> Vec<SearchEntry> {
    let mut entries = Vec::new();
    for module in modules {
        for (idx, section) in module.sections.iter().enumerate() {
            let mut body = section.content.clone();
            if !section.key_points.is_empty() {
                if !body.is_empty() {
                    body.push(' ');
                }
                body.push_str(&section.key_points.join(" "));
            }
            entries.push(SearchEntry {
                id: format!("{}-{}", module.id, idx),
                module_id: module.id.clone(),
                module_title: module.title.clone(),
                section_title: section.title.clone(),
                body,
                tags: module.tags.clone(),
            });
        }
    }
    entries
}

// Score contributions per matched field; titles dominate body text.
const SCORE_SECTION_TITLE: u32 = 4;
const SCORE_MODULE_TITLE: u32 = 3;
const SCORE_TAG: u32 = 2;
const SCORE_BODY: u32 = 1;

/// Case-insensitive substring search, scored and sorted by relevance.
///
/// A blank query matches nothing. Ties sort by entry id so results are
/// stable across calls.
pub fn search(entries: &[SearchEntry], query: &str) -> Vec<SearchHit> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let mut hits: Vec<SearchHit> = entries
        .iter()
        .filter_map(|entry| {
            let mut score = 0;
            if entry.section_title.to_lowercase().contains(&needle) {
                score += SCORE_SECTION_TITLE;
            }
            if entry.module_title.to_lowercase().contains(&needle) {
                score += SCORE_MODULE_TITLE;
            }
            if entry.tags.iter().any(|t| t.to_lowercase().contains(&needle)) {
                score += SCORE_TAG;
            }
            if entry.body.to_lowercase().contains(&needle) {
                score += SCORE_BODY;
            }
            (score > 0).then(|| SearchHit {
                entry: entry.clone(),
                score,
            })
        })
        .collect();

    hits.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.entry.id.cmp(&b.entry.id))
    });
    hits
}

/// Entries as a JSON array, for embedding in a search page.
pub fn search_entries_json(entries: &[SearchEntry]) -> Result<String, serde_json::Error> {
    serde_json::to_string(entries)
}
