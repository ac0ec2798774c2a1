mod repository;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::DomainError;

pub use repository::AchievementStateRepository;

/// Achievement kinds, fixed at catalog definition time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementKind {
    FirstCompletion,
    VolumeThreshold,
    CategoryDiversity,
    StreakThreshold,
    EarlyCompletion,
    CategoryCount,
    ConsistencyStreak,
}

impl AchievementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AchievementKind::FirstCompletion => "first_completion",
            AchievementKind::VolumeThreshold => "volume_threshold",
            AchievementKind::CategoryDiversity => "category_diversity",
            AchievementKind::StreakThreshold => "streak_threshold",
            AchievementKind::EarlyCompletion => "early_completion",
            AchievementKind::CategoryCount => "category_count",
            AchievementKind::ConsistencyStreak => "consistency_streak",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "first_completion" => Ok(AchievementKind::FirstCompletion),
            "volume_threshold" => Ok(AchievementKind::VolumeThreshold),
            "category_diversity" => Ok(AchievementKind::CategoryDiversity),
            "streak_threshold" => Ok(AchievementKind::StreakThreshold),
            "early_completion" => Ok(AchievementKind::EarlyCompletion),
            "category_count" => Ok(AchievementKind::CategoryCount),
            "consistency_streak" => Ok(AchievementKind::ConsistencyStreak),
            other => Err(DomainError::Validation(format!(
                "Unknown achievement kind: {}",
                other
            ))),
        }
    }
}

impl std::fmt::Display for AchievementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Static achievement rule, immutable after catalog construction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AchievementDefinition {
    pub kind: AchievementKind,
    pub required_progress: u32,
    pub description: String,
}

impl AchievementDefinition {
    pub fn new(kind: AchievementKind, required_progress: u32, description: &str) -> Self {
        Self {
            kind,
            required_progress,
            description: description.to_string(),
        }
    }
}

/// The fixed rule set shipped with the application
pub fn default_catalog() -> Vec<AchievementDefinition> {
    vec![
        AchievementDefinition::new(
            AchievementKind::FirstCompletion,
            1,
            "Complete your first chore",
        ),
        AchievementDefinition::new(AchievementKind::VolumeThreshold, 50, "Complete 50 chores"),
        AchievementDefinition::new(
            AchievementKind::CategoryDiversity,
            5,
            "Complete chores in 5 different categories",
        ),
        AchievementDefinition::new(
            AchievementKind::StreakThreshold,
            7,
            "Keep a 7-day completion streak",
        ),
        AchievementDefinition::new(
            AchievementKind::EarlyCompletion,
            1,
            "Complete a chore before it is due",
        ),
        AchievementDefinition::new(AchievementKind::CategoryCount, 3, "Create 3 categories"),
        AchievementDefinition::new(
            AchievementKind::ConsistencyStreak,
            30,
            "Keep a 30-day completion streak",
        ),
    ]
}

/// Derived per-definition progress state
///
/// `unlocked` is a one-way transition and `unlocked_at` is set exactly
/// once. Re-evaluation over an edited event log may produce a lower
/// progress value, but an unlocked state is never revoked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AchievementState {
    kind: AchievementKind,
    progress: u32,
    unlocked: bool,
    unlocked_at: Option<DateTime<Utc>>,
}

impl AchievementState {
    /// Fresh locked state with zero progress
    pub fn locked(kind: AchievementKind) -> Self {
        Self {
            kind,
            progress: 0,
            unlocked: false,
            unlocked_at: None,
        }
    }

    /// Restore state from persistence
    pub fn restore(
        kind: AchievementKind,
        progress: u32,
        unlocked: bool,
        unlocked_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            kind,
            progress,
            unlocked,
            unlocked_at,
        }
    }

    /// Record recomputed progress and unlock when the threshold is met.
    ///
    /// Already-unlocked states keep their original `unlocked_at` and
    /// never drop below the unlock threshold.
    pub fn advance(&mut self, progress: u32, required_progress: u32, now: DateTime<Utc>) {
        if self.unlocked {
            self.progress = progress.max(required_progress);
            return;
        }

        self.progress = progress;

        if progress >= required_progress {
            self.unlocked = true;
            self.unlocked_at = Some(now);
        }
    }

    // Getters
    pub fn kind(&self) -> AchievementKind {
        self.kind
    }

    pub fn progress(&self) -> u32 {
        self.progress
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    pub fn unlocked_at(&self) -> Option<DateTime<Utc>> {
        self.unlocked_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locked_state_starts_at_zero() {
        let state = AchievementState::locked(AchievementKind::VolumeThreshold);
        assert_eq!(state.progress(), 0);
        assert!(!state.is_unlocked());
        assert!(state.unlocked_at().is_none());
    }

    #[test]
    fn test_advance_below_threshold_stays_locked() {
        let mut state = AchievementState::locked(AchievementKind::VolumeThreshold);
        state.advance(49, 50, Utc::now());

        assert_eq!(state.progress(), 49);
        assert!(!state.is_unlocked());
    }

    #[test]
    fn test_advance_unlocks_at_threshold() {
        let now = Utc::now();
        let mut state = AchievementState::locked(AchievementKind::VolumeThreshold);
        state.advance(50, 50, now);

        assert!(state.is_unlocked());
        assert_eq!(state.unlocked_at(), Some(now));
    }

    #[test]
    fn test_unlock_is_one_way() {
        let unlock_time = Utc::now();
        let mut state = AchievementState::locked(AchievementKind::VolumeThreshold);
        state.advance(50, 50, unlock_time);

        // Event-log edits can shrink recomputed progress; the unlock
        // and its timestamp must survive.
        let later = unlock_time + chrono::Duration::hours(1);
        state.advance(10, 50, later);

        assert!(state.is_unlocked());
        assert_eq!(state.unlocked_at(), Some(unlock_time));
        assert_eq!(state.progress(), 50);
    }

    #[test]
    fn test_kind_string_round_trip() {
        for kind in [
            AchievementKind::FirstCompletion,
            AchievementKind::VolumeThreshold,
            AchievementKind::CategoryDiversity,
            AchievementKind::StreakThreshold,
            AchievementKind::EarlyCompletion,
            AchievementKind::CategoryCount,
            AchievementKind::ConsistencyStreak,
        ] {
            assert_eq!(AchievementKind::from_str(kind.as_str()).unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let result = AchievementKind::from_str("night_owl");
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_default_catalog_covers_every_kind_once() {
        let catalog = default_catalog();
        assert_eq!(catalog.len(), 7);

        let mut kinds: Vec<&str> = catalog.iter().map(|d| d.kind.as_str()).collect();
        kinds.sort_unstable();
        kinds.dedup();
        assert_eq!(kinds.len(), 7);
    }
}
