use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreakStatsDto {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_completions: u64,
    pub last_active_date: Option<String>, // ISO 8601 date (YYYY-MM-DD)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AchievementDto {
    pub kind: String,
    pub description: String,
    pub required_progress: u32,
    pub progress: u32,
    pub unlocked: bool,
    pub unlocked_at: Option<String>, // ISO 8601 timestamp
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityDayDto {
    pub date: String, // YYYY-MM-DD
    pub is_active: bool,
    pub completions: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityCalendarDto {
    pub year: i32,
    pub month: u32,
    pub days: Vec<ActivityDayDto>,
    pub month_stats: MonthStatsDto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthStatsDto {
    pub total_days: u32,
    pub active_days: u32,
    pub activity_rate: f64, // percentage of days with activity (0.0 - 100.0)
}
