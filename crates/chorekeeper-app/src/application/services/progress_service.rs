use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use chorekeeper_domain::achievement::{
    AchievementDefinition, AchievementKind, AchievementState, AchievementStateRepository,
};
use chorekeeper_domain::completion::{CompletionEvent, CompletionEventRepository};
use chorekeeper_domain::events::{AchievementUnlocked, CompletionRecorded, EventBus};
use chorekeeper_domain::progress::{ProgressEngine, ProgressSnapshot};
use chorekeeper_domain::shared::{CategoryId, DomainError, TaskId};

/// Orchestrates completion recording and progress evaluation
///
/// The single evaluation path for every surface that renders streaks or
/// achievements; the engine stays pure and this service owns loading
/// the log, persisting derived state, and publishing unlock events.
pub struct ProgressService {
    event_repo: Arc<dyn CompletionEventRepository>,
    state_repo: Arc<dyn AchievementStateRepository>,
    event_bus: Arc<dyn EventBus>,
    engine: ProgressEngine,
}

impl ProgressService {
    pub fn new(
        event_repo: Arc<dyn CompletionEventRepository>,
        state_repo: Arc<dyn AchievementStateRepository>,
        event_bus: Arc<dyn EventBus>,
    ) -> Self {
        Self {
            event_repo,
            state_repo,
            event_bus,
            engine: ProgressEngine::with_default_catalog(),
        }
    }

    pub fn with_catalog(
        event_repo: Arc<dyn CompletionEventRepository>,
        state_repo: Arc<dyn AchievementStateRepository>,
        event_bus: Arc<dyn EventBus>,
        catalog: Vec<AchievementDefinition>,
    ) -> Self {
        Self {
            event_repo,
            state_repo,
            event_bus,
            engine: ProgressEngine::new(catalog),
        }
    }

    pub fn catalog(&self) -> &[AchievementDefinition] {
        self.engine.catalog()
    }

    /// Append a completion to the log and re-evaluate all progress.
    ///
    /// `categories_created` is the host's count of categories ever
    /// created (it feeds the category-count achievement and is not
    /// derivable from the event log).
    pub async fn record_completion<Tz>(
        &self,
        task_id: TaskId,
        category_id: Option<CategoryId>,
        completed_at: DateTime<Utc>,
        due_at: Option<DateTime<Utc>>,
        categories_created: u32,
        reference_now: DateTime<Tz>,
    ) -> Result<ProgressSnapshot, DomainError>
    where
        Tz: TimeZone + Send + Sync,
        Tz::Offset: Send + Sync,
    {
        let event = CompletionEvent::new(task_id, category_id, completed_at, due_at);
        self.event_repo.save(&event).await?;

        debug!(
            completion_id = %event.id(),
            task_id = %event.task_id(),
            "Completion recorded"
        );

        self.event_bus
            .publish(Box::new(CompletionRecorded {
                completion_id: event.id().clone(),
                task_id: event.task_id().clone(),
                category_id: event.category_id().cloned(),
                completed_at: event.completed_at(),
                occurred_at: reference_now.with_timezone(&Utc),
            }))
            .await?;

        self.evaluate(categories_created, reference_now).await
    }

    /// Re-evaluate the full event log and persist the derived states.
    ///
    /// Also the read-refresh path for widget/analytics surfaces; calling
    /// it twice with the same inputs yields the same snapshot.
    pub async fn evaluate<Tz>(
        &self,
        categories_created: u32,
        reference_now: DateTime<Tz>,
    ) -> Result<ProgressSnapshot, DomainError>
    where
        Tz: TimeZone + Send + Sync,
        Tz::Offset: Send + Sync,
    {
        let events = self.event_repo.find_all().await?;
        let prior = self.load_prior_states().await?;
        let now_utc = reference_now.with_timezone(&Utc);

        let snapshot = self
            .engine
            .evaluate(&events, categories_created, &prior, reference_now);

        let states: Vec<AchievementState> = snapshot.achievements.values().cloned().collect();
        self.state_repo.save_all(&states).await?;

        for kind in snapshot.newly_unlocked(&prior) {
            let state = &snapshot.achievements[&kind];
            debug!(kind = %kind, progress = state.progress(), "Achievement unlocked");

            self.event_bus
                .publish(Box::new(AchievementUnlocked {
                    kind,
                    progress: state.progress(),
                    occurred_at: state.unlocked_at().unwrap_or(now_utc),
                }))
                .await?;
        }

        Ok(snapshot)
    }

    async fn load_prior_states(
        &self,
    ) -> Result<HashMap<AchievementKind, AchievementState>, DomainError> {
        let states = self.state_repo.find_all().await?;
        Ok(states.into_iter().map(|s| (s.kind(), s)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use chorekeeper_domain::events::DomainEvent;
    use mockall::mock;
    use std::sync::Mutex;

    mock! {
        EventRepo {}

        #[async_trait]
        impl CompletionEventRepository for EventRepo {
            async fn save(&self, event: &CompletionEvent) -> Result<(), DomainError>;
            async fn find_all(&self) -> Result<Vec<CompletionEvent>, DomainError>;
            async fn count_all(&self) -> Result<u64, DomainError>;
            async fn delete_by_task_id(&self, task_id: &TaskId) -> Result<(), DomainError>;
        }
    }

    mock! {
        StateRepo {}

        #[async_trait]
        impl AchievementStateRepository for StateRepo {
            async fn save(&self, state: &AchievementState) -> Result<(), DomainError>;
            async fn save_all(&self, states: &[AchievementState]) -> Result<(), DomainError>;
            async fn find_by_kind(
                &self,
                kind: AchievementKind,
            ) -> Result<Option<AchievementState>, DomainError>;
            async fn find_all(&self) -> Result<Vec<AchievementState>, DomainError>;
        }
    }

    /// Captures published event type names for assertions
    struct RecordingBus {
        published: Mutex<Vec<&'static str>>,
    }

    impl RecordingBus {
        fn new() -> Self {
            Self {
                published: Mutex::new(Vec::new()),
            }
        }

        fn published(&self) -> Vec<&'static str> {
            self.published.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl EventBus for RecordingBus {
        async fn publish(&self, event: Box<dyn DomainEvent>) -> Result<(), DomainError> {
            self.published.lock().unwrap().push(event.event_type_name());
            Ok(())
        }
    }

    fn noon(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_default_catalog_is_used() {
        let service = ProgressService::new(
            Arc::new(MockEventRepo::new()),
            Arc::new(MockStateRepo::new()),
            Arc::new(RecordingBus::new()),
        );
        assert_eq!(service.catalog().len(), 7);
    }

    #[tokio::test]
    async fn test_record_completion_saves_evaluates_and_publishes() {
        let mut event_repo = MockEventRepo::new();
        event_repo.expect_save().times(1).returning(|_| Ok(()));
        event_repo.expect_find_all().times(1).returning(|| {
            Ok(vec![CompletionEvent::new(
                TaskId::new(),
                None,
                noon(10),
                None,
            )])
        });

        let mut state_repo = MockStateRepo::new();
        state_repo.expect_find_all().times(1).returning(|| Ok(vec![]));
        state_repo
            .expect_save_all()
            .times(1)
            .withf(|states| states.len() == 7)
            .returning(|_| Ok(()));

        let bus = Arc::new(RecordingBus::new());
        let service = ProgressService::new(Arc::new(event_repo), Arc::new(state_repo), bus.clone());

        let snapshot = service
            .record_completion(TaskId::new(), None, noon(10), None, 0, noon(10))
            .await
            .unwrap();

        assert_eq!(snapshot.streak.current_streak, 1);
        assert!(snapshot.achievements[&AchievementKind::FirstCompletion].is_unlocked());

        let published = bus.published();
        assert!(published
            .iter()
            .any(|name| name.ends_with("CompletionRecorded")));
        assert!(published
            .iter()
            .any(|name| name.ends_with("AchievementUnlocked")));
    }

    #[tokio::test]
    async fn test_already_unlocked_achievement_not_republished() {
        let mut event_repo = MockEventRepo::new();
        event_repo.expect_find_all().times(1).returning(|| {
            Ok(vec![CompletionEvent::new(
                TaskId::new(),
                None,
                noon(10),
                None,
            )])
        });

        let mut unlocked = AchievementState::locked(AchievementKind::FirstCompletion);
        unlocked.advance(1, 1, noon(9));

        let mut state_repo = MockStateRepo::new();
        state_repo
            .expect_find_all()
            .times(1)
            .returning(move || Ok(vec![unlocked.clone()]));
        state_repo.expect_save_all().times(1).returning(|_| Ok(()));

        let bus = Arc::new(RecordingBus::new());
        let service = ProgressService::new(Arc::new(event_repo), Arc::new(state_repo), bus.clone());

        let snapshot = service.evaluate(0, noon(10)).await.unwrap();

        // Still unlocked with the original timestamp, but no new event.
        let state = &snapshot.achievements[&AchievementKind::FirstCompletion];
        assert!(state.is_unlocked());
        assert_eq!(state.unlocked_at(), Some(noon(9)));
        assert!(bus.published().is_empty());
    }

    #[tokio::test]
    async fn test_repository_failure_propagates() {
        let mut event_repo = MockEventRepo::new();
        event_repo
            .expect_find_all()
            .returning(|| Err(DomainError::Repository("db gone".to_string())));

        let service = ProgressService::new(
            Arc::new(event_repo),
            Arc::new(MockStateRepo::new()),
            Arc::new(RecordingBus::new()),
        );

        let result = service.evaluate(0, noon(10)).await;
        assert!(matches!(result, Err(DomainError::Repository(_))));
    }
}
