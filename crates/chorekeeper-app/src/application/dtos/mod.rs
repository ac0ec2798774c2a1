mod entitlement_dto;
mod progress_dto;

pub use entitlement_dto::EntitlementDto;
pub use progress_dto::{
    AchievementDto, ActivityCalendarDto, ActivityDayDto, MonthStatsDto, StreakStatsDto,
};
