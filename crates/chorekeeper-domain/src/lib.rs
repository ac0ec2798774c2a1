// Domain layer - Pure business logic
// No dependencies on infrastructure or presentation layers

pub mod achievement;
pub mod completion;
pub mod entitlement;
pub mod events;
pub mod progress;
pub mod shared;

// Re-exports for convenience
pub use events::DomainEvent;
pub use shared::{CategoryId, CompletionId, DomainError, TaskId};
