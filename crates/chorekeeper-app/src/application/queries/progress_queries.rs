use chrono::{DateTime, Datelike, NaiveDate, TimeZone};
use log::{info, warn};
use std::collections::HashMap;
use std::sync::Arc;

use crate::application::dtos::{
    AchievementDto, ActivityCalendarDto, ActivityDayDto, MonthStatsDto, StreakStatsDto,
};
use chorekeeper_domain::achievement::AchievementStateRepository;
use chorekeeper_domain::completion::CompletionEventRepository;
use chorekeeper_domain::progress::ProgressEngine;
use chorekeeper_domain::shared::DomainError;

/// Read-side queries for streak, achievement, and calendar views
pub struct ProgressQueries {
    event_repo: Arc<dyn CompletionEventRepository>,
    state_repo: Arc<dyn AchievementStateRepository>,
    engine: ProgressEngine,
}

impl ProgressQueries {
    pub fn new(
        event_repo: Arc<dyn CompletionEventRepository>,
        state_repo: Arc<dyn AchievementStateRepository>,
    ) -> Self {
        Self {
            event_repo,
            state_repo,
            engine: ProgressEngine::with_default_catalog(),
        }
    }

    /// Get streak statistics derived from the full event log
    pub async fn get_streak_stats<Tz>(
        &self,
        reference_now: DateTime<Tz>,
    ) -> Result<StreakStatsDto, DomainError>
    where
        Tz: TimeZone + Send + Sync,
        Tz::Offset: Send + Sync,
    {
        let events = self.event_repo.find_all().await?;
        let tz = reference_now.timezone();

        let last_active_date = events
            .iter()
            .map(|e| e.completed_at().with_timezone(&tz).date_naive())
            .max();

        // Read path: achievement states are not touched, so prior
        // states and the category count are irrelevant here.
        let snapshot = self
            .engine
            .evaluate(&events, 0, &HashMap::new(), reference_now);

        let dto = StreakStatsDto {
            current_streak: snapshot.streak.current_streak,
            longest_streak: snapshot.streak.longest_streak,
            total_completions: snapshot.streak.total_completions,
            last_active_date: last_active_date.map(|d| d.format("%Y-%m-%d").to_string()),
        };

        info!(
            "[progress] get_streak_stats current={} longest={} total={}",
            dto.current_streak, dto.longest_streak, dto.total_completions
        );

        Ok(dto)
    }

    /// List every catalog achievement with its persisted state
    pub async fn get_achievements(&self) -> Result<Vec<AchievementDto>, DomainError> {
        let states: HashMap<_, _> = self
            .state_repo
            .find_all()
            .await?
            .into_iter()
            .map(|s| (s.kind(), s))
            .collect();

        let dtos = self
            .engine
            .catalog()
            .iter()
            .map(|definition| {
                let state = states.get(&definition.kind);
                AchievementDto {
                    kind: definition.kind.as_str().to_string(),
                    description: definition.description.clone(),
                    required_progress: definition.required_progress,
                    progress: state.map(|s| s.progress()).unwrap_or(0),
                    unlocked: state.map(|s| s.is_unlocked()).unwrap_or(false),
                    unlocked_at: state
                        .and_then(|s| s.unlocked_at())
                        .map(|at| at.to_rfc3339()),
                }
            })
            .collect();

        Ok(dtos)
    }

    /// Get the activity calendar for a specific month
    pub async fn get_calendar<Tz>(
        &self,
        year: i32,
        month: u32,
        tz: &Tz,
    ) -> Result<ActivityCalendarDto, DomainError>
    where
        Tz: TimeZone + Send + Sync,
    {
        if !(1..=12).contains(&month) {
            return Err(DomainError::Validation("Invalid month".to_string()));
        }

        let first_day = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| DomainError::Validation("Invalid date".to_string()))?;

        let first_day_next_month = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        };
        let last_day = first_day_next_month
            .and_then(|d| d.pred_opt())
            .ok_or_else(|| DomainError::Validation("Invalid date".to_string()))?;

        let events = self.event_repo.find_all().await?;

        // Completion counts per local calendar day
        let mut daily_counts: HashMap<NaiveDate, u32> = HashMap::new();
        for event in &events {
            let day = event.completed_at().with_timezone(tz).date_naive();
            if day >= first_day && day <= last_day {
                *daily_counts.entry(day).or_insert(0) += 1;
            }
        }

        if daily_counts.is_empty() {
            warn!(
                "[progress] calendar query empty result month={:04}-{:02}",
                year, month
            );
        }

        let total_days = last_day.day();
        let mut days = Vec::with_capacity(total_days as usize);
        let mut active_days = 0u32;

        for day in 1..=total_days {
            let date = NaiveDate::from_ymd_opt(year, month, day)
                .ok_or_else(|| DomainError::Validation("Invalid date".to_string()))?;
            let completions = daily_counts.get(&date).copied().unwrap_or(0);

            if completions > 0 {
                active_days += 1;
            }

            days.push(ActivityDayDto {
                date: date.format("%Y-%m-%d").to_string(),
                is_active: completions > 0,
                completions,
            });
        }

        let activity_rate = if total_days > 0 {
            (active_days as f64 / total_days as f64) * 100.0
        } else {
            0.0
        };

        let dto = ActivityCalendarDto {
            year,
            month,
            days,
            month_stats: MonthStatsDto {
                total_days,
                active_days,
                activity_rate,
            },
        };

        info!(
            "[progress] calendar result month={:04}-{:02} active_days={} rate={:.2}%",
            year, month, dto.month_stats.active_days, dto.month_stats.activity_rate
        );

        Ok(dto)
    }
}
