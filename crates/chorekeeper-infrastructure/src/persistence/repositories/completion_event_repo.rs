use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use std::sync::Arc;

use crate::persistence::{ResultExt, SqliteRepositoryBase};
use chorekeeper_domain::completion::{CompletionEvent, CompletionEventRepository};
use chorekeeper_domain::shared::{CategoryId, CompletionId, DomainError, TaskId};

#[derive(FromRow)]
struct CompletionEventRow {
    id: String,
    task_id: String,
    category_id: Option<String>,
    completed_at: DateTime<Utc>,
    due_at: Option<DateTime<Utc>>,
}

impl CompletionEventRow {
    fn into_event(self) -> CompletionEvent {
        CompletionEvent::restore(
            CompletionId::from_string(&self.id),
            TaskId::from_string(&self.task_id),
            self.category_id.map(|c| CategoryId::from_string(&c)),
            self.completed_at,
            self.due_at,
        )
    }
}

pub struct SqliteCompletionEventRepository {
    base: SqliteRepositoryBase,
}

impl SqliteCompletionEventRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self {
            base: SqliteRepositoryBase::new(pool),
        }
    }
}

#[async_trait]
impl CompletionEventRepository for SqliteCompletionEventRepository {
    async fn save(&self, event: &CompletionEvent) -> Result<(), DomainError> {
        let query = r#"
            INSERT INTO completion_events (id, task_id, category_id, completed_at, due_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
        "#;

        self.base
            .execute(
                sqlx::query(query)
                    .bind(event.id().as_str())
                    .bind(event.task_id().as_str())
                    .bind(event.category_id().map(|c| c.as_str().to_string()))
                    .bind(event.completed_at())
                    .bind(event.due_at()),
                "Save completion event",
            )
            .await?;

        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<CompletionEvent>, DomainError> {
        let query = "SELECT id, task_id, category_id, completed_at, due_at FROM completion_events ORDER BY completed_at ASC";

        let rows: Vec<CompletionEventRow> = self
            .base
            .fetch_all(sqlx::query_as(query), "Find all completion events")
            .await?;

        Ok(rows.into_iter().map(|r| r.into_event()).collect())
    }

    async fn count_all(&self) -> Result<u64, DomainError> {
        let query = "SELECT COUNT(*) FROM completion_events";

        let count: i64 = sqlx::query_scalar(query)
            .fetch_one(self.base.pool())
            .await
            .map_repo_error("Count completion events")?;

        Ok(count as u64)
    }

    async fn delete_by_task_id(&self, task_id: &TaskId) -> Result<(), DomainError> {
        let query = "DELETE FROM completion_events WHERE task_id = ?1";

        self.base
            .execute(
                sqlx::query(query).bind(task_id.as_str()),
                "Delete completion events for task",
            )
            .await?;

        Ok(())
    }
}
