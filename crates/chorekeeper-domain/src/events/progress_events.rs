use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::any::Any;

use crate::achievement::AchievementKind;
use crate::events::DomainEvent;
use crate::shared::{CategoryId, CompletionId, TaskId};

/// Macro to implement DomainEvent trait with type name
macro_rules! impl_domain_event {
    ($type:ty) => {
        impl DomainEvent for $type {
            fn as_any(&self) -> &(dyn Any + Send + Sync) {
                self
            }

            fn event_type_name(&self) -> &'static str {
                std::any::type_name::<Self>()
            }
        }
    };
}

/// Event fired when a completion is appended to the log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRecorded {
    pub completion_id: CompletionId,
    pub task_id: TaskId,
    pub category_id: Option<CategoryId>,
    pub completed_at: DateTime<Utc>,
    pub occurred_at: DateTime<Utc>,
}

impl_domain_event!(CompletionRecorded);

/// Event fired when an achievement transitions to unlocked
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AchievementUnlocked {
    pub kind: AchievementKind,
    pub progress: u32,
    pub occurred_at: DateTime<Utc>,
}

impl_domain_event!(AchievementUnlocked);

/// Event fired when verified purchased credits are added to the ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditsPurchased {
    pub count: u32,
    pub purchased_balance: u32,
    pub occurred_at: DateTime<Utc>,
}

impl_domain_event!(CreditsPurchased);

/// Event fired when one prompt is deducted from the ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptConsumed {
    pub remaining: u32,
    pub occurred_at: DateTime<Utc>,
}

impl_domain_event!(PromptConsumed);
