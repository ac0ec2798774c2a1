mod engine;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::achievement::{AchievementKind, AchievementState};

pub use engine::ProgressEngine;

/// Derived streak view, recomputed from the event log
///
/// Never persisted as a source of truth; a stored copy is only a cache
/// of the latest evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakState {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_completions: u64,
}

/// Output of one engine evaluation
#[derive(Debug, Clone)]
pub struct ProgressSnapshot {
    pub streak: StreakState,
    pub achievements: HashMap<AchievementKind, AchievementState>,
}

impl ProgressSnapshot {
    /// Kinds that are unlocked in this snapshot but were not before.
    pub fn newly_unlocked(
        &self,
        prior: &HashMap<AchievementKind, AchievementState>,
    ) -> Vec<AchievementKind> {
        let mut kinds: Vec<AchievementKind> = self
            .achievements
            .values()
            .filter(|state| {
                state.is_unlocked()
                    && !prior
                        .get(&state.kind())
                        .map(|p| p.is_unlocked())
                        .unwrap_or(false)
            })
            .map(|state| state.kind())
            .collect();

        kinds.sort_by_key(|k| k.as_str());
        kinds
    }
}
