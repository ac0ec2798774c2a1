use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use std::sync::Arc;

use crate::persistence::SqliteRepositoryBase;
use chorekeeper_domain::achievement::{
    AchievementKind, AchievementState, AchievementStateRepository,
};
use chorekeeper_domain::shared::DomainError;

#[derive(FromRow)]
struct AchievementStateRow {
    kind: String,
    progress: u32,
    unlocked: bool,
    unlocked_at: Option<DateTime<Utc>>,
}

impl AchievementStateRow {
    fn into_state(self) -> Result<AchievementState, DomainError> {
        let kind = AchievementKind::from_str(&self.kind)
            .map_err(|e| DomainError::DataIntegrity(e.to_string()))?;

        Ok(AchievementState::restore(
            kind,
            self.progress,
            self.unlocked,
            self.unlocked_at,
        ))
    }
}

pub struct SqliteAchievementStateRepository {
    base: SqliteRepositoryBase,
}

impl SqliteAchievementStateRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self {
            base: SqliteRepositoryBase::new(pool),
        }
    }
}

const UPSERT_QUERY: &str = r#"
    INSERT INTO achievement_states (kind, progress, unlocked, unlocked_at)
    VALUES (?1, ?2, ?3, ?4)
    ON CONFLICT(kind) DO UPDATE SET
        progress = ?2,
        unlocked = ?3,
        unlocked_at = ?4
"#;

#[async_trait]
impl AchievementStateRepository for SqliteAchievementStateRepository {
    async fn save(&self, state: &AchievementState) -> Result<(), DomainError> {
        self.base
            .execute(
                sqlx::query(UPSERT_QUERY)
                    .bind(state.kind().as_str())
                    .bind(state.progress())
                    .bind(state.is_unlocked())
                    .bind(state.unlocked_at()),
                "Save achievement state",
            )
            .await?;

        Ok(())
    }

    async fn save_all(&self, states: &[AchievementState]) -> Result<(), DomainError> {
        for state in states {
            self.save(state).await?;
        }
        Ok(())
    }

    async fn find_by_kind(
        &self,
        kind: AchievementKind,
    ) -> Result<Option<AchievementState>, DomainError> {
        let query =
            "SELECT kind, progress, unlocked, unlocked_at FROM achievement_states WHERE kind = ?1";

        let row: Option<AchievementStateRow> = self
            .base
            .fetch_optional(
                sqlx::query_as(query).bind(kind.as_str()),
                "Find achievement state by kind",
            )
            .await?;

        row.map(|r| r.into_state()).transpose()
    }

    async fn find_all(&self) -> Result<Vec<AchievementState>, DomainError> {
        let query = "SELECT kind, progress, unlocked, unlocked_at FROM achievement_states ORDER BY kind ASC";

        let rows: Vec<AchievementStateRow> = self
            .base
            .fetch_all(sqlx::query_as(query), "Find all achievement states")
            .await?;

        rows.into_iter().map(|r| r.into_state()).collect()
    }
}
