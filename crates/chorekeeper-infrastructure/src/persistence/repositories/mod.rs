mod achievement_state_repo;
mod completion_event_repo;
mod entitlement_repo;

pub use achievement_state_repo::SqliteAchievementStateRepository;
pub use completion_event_repo::SqliteCompletionEventRepository;
pub use entitlement_repo::SqliteEntitlementLedgerRepository;
