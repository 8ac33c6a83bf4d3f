//! Spaced review of flagged key points.
//!
//! Selection favors older flags (the learner has had longer to forget
//! them) via weighted random choice, avoids showing the same flag twice in
//! a row, and re-surfaces items the learner got wrong after a few others
//! have been shown.

use chrono::{DateTime, Utc};
use rand::Rng;
use std::collections::VecDeque;

use crate::domain::FlaggedItem;

/// A flag with its calculated selection weight
#[derive(Debug, Clone)]
pub struct FlagWeight {
    pub id: String,
    pub weight: f64,
}

/// Session state for one review sitting.
///
/// Flags answered incorrectly go into the reinforcement queue and are shown
/// again after at least 3 other items.
#[derive(Debug, Clone, Default)]
pub struct ReviewSession {
    /// Queue of flag ids that need reinforcement (recently missed)
    pub reinforcement_queue: VecDeque<String>,
    /// Counter since the last reinforcement item was shown
    pub items_since_reinforce: u32,
    /// Last flag id shown (to avoid immediate repeats)
    pub last_id: Option<String>,
}

impl ReviewSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a missed flag for reinforcement; duplicates are ignored.
    pub fn add_missed(&mut self, id: &str) {
        if !self.reinforcement_queue.iter().any(|q| q == id) {
            self.reinforcement_queue.push_back(id.to_string());
        }
    }

    /// Drop a flag from the reinforcement queue (answered correctly).
    pub fn clear_missed(&mut self, id: &str) {
        self.reinforcement_queue.retain(|q| q != id);
    }

    fn should_show_reinforcement(&self) -> bool {
        !self.reinforcement_queue.is_empty() && self.items_since_reinforce >= 3
    }

    fn pop_reinforcement(&mut self) -> Option<String> {
        if self.should_show_reinforcement() {
            self.items_since_reinforce = 0;
            self.reinforcement_queue.pop_front()
        } else {
            None
        }
    }
}

/// Selection weight for one flag, based on its age.
///
/// Older flags weigh more, from 1.0 for a just-created flag up to a 3.0
/// cap at 20 days. A clock-skewed future timestamp gets the base weight.
pub fn flag_weight(flag: &FlaggedItem, now: DateTime<Utc>) -> f64 {
    let days = (now - flag.flagged_at).num_days().max(0) as f64;
    1.0 + (days * 0.1).min(2.0)
}

/// Weights for a whole flag list.
pub fn calculate_weights(flags: &[FlaggedItem], now: DateTime<Utc>) -> Vec<FlagWeight> {
    flags
        .iter()
        .map(|f| FlagWeight {
            id: f.id.clone(),
            weight: flag_weight(f, now),
        })
        .collect()
}

/// Weighted random selection; higher weight = more likely.
pub fn weighted_random_select(weights: &[FlagWeight], exclude_id: Option<&str>) -> Option<String> {
    let available: Vec<_> = weights
        .iter()
        .filter(|w| exclude_id.is_none_or(|id| w.id != id))
        .collect();

    if available.is_empty() {
        return None;
    }
    if available.len() == 1 {
        return Some(available[0].id.clone());
    }

    let total_weight: f64 = available.iter().map(|w| w.weight).sum();
    if total_weight <= 0.0 {
        let idx = rand::rng().random_range(0..available.len());
        return Some(available[idx].id.clone());
    }

    let mut rng = rand::rng();
    let mut target = rng.random_range(0.0..total_weight);
    for w in &available {
        target -= w.weight;
        if target <= 0.0 {
            return Some(w.id.clone());
        }
    }

    available.last().map(|w| w.id.clone())
}

/// Next flag to review, considering the reinforcement queue and weights.
///
/// Pure over the flag list and session state; an empty list yields `None`.
pub fn select_next(session: &mut ReviewSession, flags: &[FlaggedItem]) -> Option<String> {
    if let Some(reinforce_id) = session.pop_reinforcement() {
        // The flag may have been unflagged mid-session
        if flags.iter().any(|f| f.id == reinforce_id) {
            session.last_id = Some(reinforce_id.clone());
            return Some(reinforce_id);
        }
    }

    let weights = calculate_weights(flags, Utc::now());
    if let Some(id) = weighted_random_select(&weights, session.last_id.as_deref()) {
        session.items_since_reinforce += 1;
        session.last_id = Some(id.clone());
        Some(id)
    } else {
        None
    }
}
