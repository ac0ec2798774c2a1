use async_trait::async_trait;

use super::{AchievementKind, AchievementState};
use crate::shared::DomainError;

#[async_trait]
pub trait AchievementStateRepository: Send + Sync {
    /// Save (upsert) a single achievement state.
    async fn save(&self, state: &AchievementState) -> Result<(), DomainError>;

    /// Save (upsert) a batch of achievement states.
    async fn save_all(&self, states: &[AchievementState]) -> Result<(), DomainError>;

    /// Find the persisted state for one achievement kind.
    async fn find_by_kind(
        &self,
        kind: AchievementKind,
    ) -> Result<Option<AchievementState>, DomainError>;

    /// List all persisted achievement states.
    async fn find_all(&self) -> Result<Vec<AchievementState>, DomainError>;
}
