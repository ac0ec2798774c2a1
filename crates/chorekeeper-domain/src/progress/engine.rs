use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use std::collections::{BTreeSet, HashMap, HashSet};

use super::{ProgressSnapshot, StreakState};
use crate::achievement::{default_catalog, AchievementDefinition, AchievementKind, AchievementState};
use crate::completion::CompletionEvent;

/// Streak & achievement evaluation engine
///
/// Pure function of the event log: no clock reads, no storage, no side
/// effects. `reference_now` is injected by the caller and its timezone
/// drives calendar-day bucketing, so the same inputs always produce the
/// same snapshot. The host serializes access and persists results.
pub struct ProgressEngine {
    catalog: Vec<AchievementDefinition>,
}

impl ProgressEngine {
    pub fn new(catalog: Vec<AchievementDefinition>) -> Self {
        Self { catalog }
    }

    pub fn with_default_catalog() -> Self {
        Self::new(default_catalog())
    }

    pub fn catalog(&self) -> &[AchievementDefinition] {
        &self.catalog
    }

    /// Evaluate the full event log.
    ///
    /// `categories_created` is host-supplied (the category-count
    /// achievement tracks categories ever created, which the event log
    /// cannot derive). `prior` carries previously persisted states so
    /// unlocks stay one-way across re-evaluations.
    pub fn evaluate<Tz: TimeZone>(
        &self,
        events: &[CompletionEvent],
        categories_created: u32,
        prior: &HashMap<AchievementKind, AchievementState>,
        reference_now: DateTime<Tz>,
    ) -> ProgressSnapshot {
        let streak = compute_streak(events, &reference_now);
        let now_utc = reference_now.with_timezone(&Utc);

        let mut achievements = HashMap::with_capacity(self.catalog.len());
        for definition in &self.catalog {
            let progress = match definition.kind {
                AchievementKind::FirstCompletion => u32::from(!events.is_empty()),
                AchievementKind::VolumeThreshold => clamp_count(events.len()),
                AchievementKind::CategoryDiversity => distinct_categories(events),
                AchievementKind::StreakThreshold | AchievementKind::ConsistencyStreak => {
                    streak.longest_streak
                }
                AchievementKind::EarlyCompletion => {
                    clamp_count(events.iter().filter(|e| e.is_early()).count())
                }
                AchievementKind::CategoryCount => categories_created,
            };

            let mut state = prior
                .get(&definition.kind)
                .cloned()
                .unwrap_or_else(|| AchievementState::locked(definition.kind));
            state.advance(progress, definition.required_progress, now_utc);

            achievements.insert(definition.kind, state);
        }

        ProgressSnapshot {
            streak,
            achievements,
        }
    }
}

fn clamp_count(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}

fn distinct_categories(events: &[CompletionEvent]) -> u32 {
    let categories: HashSet<&str> = events
        .iter()
        .filter_map(|e| e.category_id().map(|c| c.as_str()))
        .collect();
    clamp_count(categories.len())
}

fn compute_streak<Tz: TimeZone>(
    events: &[CompletionEvent],
    reference_now: &DateTime<Tz>,
) -> StreakState {
    let tz = reference_now.timezone();
    let today = reference_now.date_naive();

    // Distinct active days; a completion stamped after the reference
    // time is clamped into the reference day rather than rejected.
    let active_days: BTreeSet<NaiveDate> = events
        .iter()
        .map(|e| e.completed_at().with_timezone(&tz).date_naive().min(today))
        .collect();
    let days: Vec<NaiveDate> = active_days.into_iter().collect();

    let mut longest_streak = 0u32;
    let mut run = 0u32;
    let mut prev: Option<NaiveDate> = None;
    for day in &days {
        run = match prev {
            Some(p) if (*day - p).num_days() == 1 => run + 1,
            _ => 1,
        };
        longest_streak = longest_streak.max(run);
        prev = Some(*day);
    }

    // A streak survives only while the last active day is today or
    // yesterday relative to the reference time.
    let current_streak = match days.last() {
        Some(&last) if (today - last).num_days() <= 1 => {
            let mut streak = 1u32;
            for pair in days.windows(2).rev() {
                if (pair[1] - pair[0]).num_days() == 1 {
                    streak += 1;
                } else {
                    break;
                }
            }
            streak
        }
        _ => 0,
    };

    StreakState {
        current_streak,
        longest_streak,
        total_completions: events.len() as u64,
    }
}
