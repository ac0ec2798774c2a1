use chrono::{Duration, TimeZone, Utc};
use std::sync::Arc;

use chorekeeper_domain::completion::{CompletionEvent, CompletionEventRepository};
use chorekeeper_domain::shared::{CategoryId, TaskId};
use chorekeeper_infrastructure::persistence::repositories::SqliteCompletionEventRepository;


#[tokio::test]
async fn completion_event_repo_append_list_and_delete_integration() {
    let pool = test_helpers::setup_in_memory_db().await;
    let repo = SqliteCompletionEventRepository::new(Arc::new(pool));

    let base = Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap();
    let task_a = TaskId::new();
    let task_b = TaskId::new();

    // Insert out of completion order; find_all must sort ascending.
    let later = CompletionEvent::new(
        task_a.clone(),
        Some(CategoryId::from_string("kitchen")),
        base + Duration::hours(6),
        None,
    );
    let earlier = CompletionEvent::new(
        task_b.clone(),
        None,
        base,
        Some(base + Duration::hours(2)),
    );

    repo.save(&later).await.expect("save later event");
    repo.save(&earlier).await.expect("save earlier event");

    assert_eq!(repo.count_all().await.expect("count"), 2);

    let events = repo.find_all().await.expect("find all");
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].id(), earlier.id());
    assert_eq!(events[1].id(), later.id());

    // Round-tripped fields survive intact.
    assert_eq!(events[0].completed_at(), base);
    assert_eq!(events[0].due_at(), Some(base + Duration::hours(2)));
    assert!(events[0].is_early());
    assert_eq!(
        events[1].category_id().map(|c| c.as_str()),
        Some("kitchen")
    );

    // Deleting one task's events leaves the other log intact.
    repo.delete_by_task_id(&task_a)
        .await
        .expect("delete task events");

    let remaining = repo.find_all().await.expect("find after delete");
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].task_id(), &task_b);
    assert_eq!(repo.count_all().await.expect("count after delete"), 1);
}
