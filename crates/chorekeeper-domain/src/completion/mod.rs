mod repository;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::{CategoryId, CompletionId, TaskId};

pub use repository::CompletionEventRepository;

/// Completion event value object
///
/// One immutable record per completed chore. `completed_at` is
/// authoritative for streak day-bucketing; `due_at` only feeds the
/// early-completion achievement. The event log owned by the host is the
/// source of truth for all derived progress state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionEvent {
    id: CompletionId,
    task_id: TaskId,
    category_id: Option<CategoryId>,
    completed_at: DateTime<Utc>,
    due_at: Option<DateTime<Utc>>,
}

impl CompletionEvent {
    /// Record a new completion
    pub fn new(
        task_id: TaskId,
        category_id: Option<CategoryId>,
        completed_at: DateTime<Utc>,
        due_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id: CompletionId::new(),
            task_id,
            category_id,
            completed_at,
            due_at,
        }
    }

    /// Restore an event from persistence
    pub fn restore(
        id: CompletionId,
        task_id: TaskId,
        category_id: Option<CategoryId>,
        completed_at: DateTime<Utc>,
        due_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            task_id,
            category_id,
            completed_at,
            due_at,
        }
    }

    /// Completed strictly before its due time.
    ///
    /// The comparison is completion time against due time. The source
    /// application compared creation time instead, which never reflects
    /// when the chore was actually done.
    pub fn is_early(&self) -> bool {
        match self.due_at {
            Some(due_at) => self.completed_at < due_at,
            None => false,
        }
    }

    // Getters
    pub fn id(&self) -> &CompletionId {
        &self.id
    }

    pub fn task_id(&self) -> &TaskId {
        &self.task_id
    }

    pub fn category_id(&self) -> Option<&CategoryId> {
        self.category_id.as_ref()
    }

    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    pub fn due_at(&self) -> Option<DateTime<Utc>> {
        self.due_at
    }
}
