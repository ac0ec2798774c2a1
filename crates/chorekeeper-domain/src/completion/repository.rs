use async_trait::async_trait;

use super::CompletionEvent;
use crate::shared::{DomainError, TaskId};

#[async_trait]
pub trait CompletionEventRepository: Send + Sync {
    /// Append a completion event to the log.
    async fn save(&self, event: &CompletionEvent) -> Result<(), DomainError>;

    /// List the full event log ordered by completion time ascending.
    async fn find_all(&self) -> Result<Vec<CompletionEvent>, DomainError>;

    /// Count all events in the log.
    async fn count_all(&self) -> Result<u64, DomainError>;

    /// Remove all events for a task (host deletes the task itself).
    async fn delete_by_task_id(&self, task_id: &TaskId) -> Result<(), DomainError>;
}
