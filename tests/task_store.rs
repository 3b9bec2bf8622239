use std::sync::Arc;

use agency_dashboard_lib::{
    tasks::{
        fixtures::{sample_anchor, sample_tasks},
        NewTask, TaskCounts, TaskFilter, TaskPatch, TaskPriority, TaskStatus, TaskStore,
    },
    DashboardEvent, NullBus, RecordingBus,
};
use chrono::{Duration, Utc};

fn seeded_store() -> TaskStore {
    TaskStore::with_tasks(Arc::new(NullBus), sample_tasks())
}

fn draft() -> NewTask {
    let mut data = NewTask::new(
        "Summarise call transcripts",
        TaskStatus::InProgress,
        TaskPriority::Medium,
        "research",
    );
    data.description = "Weekly digest for the sales team".to_string();
    data.progress = 10;
    data.due_date = Some(Utc::now() + Duration::days(2));
    data.tags = vec!["digest".to_string()];
    data
}

#[test]
fn add_then_get_returns_input_plus_assigned_fields() {
    let store = TaskStore::new(Arc::new(NullBus));
    let before = Utc::now();
    let input = draft();

    let created = store.add_task(input.clone());
    let loaded = store.get_task_by_id(&created.id).unwrap();

    assert_eq!(loaded, created);
    assert!(!loaded.id.is_empty());
    assert!(loaded.created_at >= before);
    assert_eq!(loaded.created_at, loaded.updated_at);
    assert_eq!(loaded.title, input.title);
    assert_eq!(loaded.description, input.description);
    assert_eq!(loaded.status, input.status);
    assert_eq!(loaded.progress, input.progress);
    assert_eq!(loaded.priority, input.priority);
    assert_eq!(loaded.division, input.division);
    assert_eq!(loaded.due_date, input.due_date);
    assert_eq!(loaded.tags, input.tags);
}

#[test]
fn ids_are_unique_and_appended_in_order() {
    let store = TaskStore::new(Arc::new(NullBus));
    let first = store.add_task(draft());
    let second = store.add_task(draft());
    assert_ne!(first.id, second.id);

    let ids: Vec<_> = store.list().into_iter().map(|task| task.id).collect();
    assert_eq!(ids, vec![first.id, second.id]);
}

#[test]
fn unknown_ids_leave_the_list_untouched() {
    let store = seeded_store();
    let before = store.list();

    assert!(!store.update_task("no-such-task", TaskPatch::status(TaskStatus::Failed)));
    assert!(!store.delete_task("no-such-task"));
    assert!(store.get_task_by_id("no-such-task").is_none());
    assert!(store.add_comment("no-such-task", "ops", "hello").is_none());

    assert_eq!(store.list(), before);
}

#[test]
fn progress_above_one_hundred_is_capped() {
    let store = seeded_store();
    let mut data = draft();
    data.progress = 180;
    let task = store.add_task(data);
    assert_eq!(task.progress, 100);

    assert!(store.update_task("task-4", TaskPatch::progress(255)));
    assert_eq!(store.get_task_by_id("task-4").unwrap().progress, 100);

    assert!(store.update_task("task-4", TaskPatch::progress(40)));
    assert_eq!(store.get_task_by_id("task-4").unwrap().progress, 40);
}

#[test]
fn status_update_touches_only_status_and_updated_at() {
    let store = seeded_store();
    let before = store.get_task_by_id("task-1").unwrap();

    assert!(store.update_task("task-1", TaskPatch::status(TaskStatus::Completed)));
    let after = store.get_task_by_id("task-1").unwrap();

    assert_eq!(after.status, TaskStatus::Completed);
    assert!(after.updated_at >= before.updated_at);
    // Progress is not forced to 100 when a task completes.
    assert_eq!(after.progress, before.progress);

    let mut expected = before.clone();
    expected.status = TaskStatus::Completed;
    expected.updated_at = after.updated_at;
    assert_eq!(after, expected);
}

#[test]
fn patch_can_clear_the_due_date() {
    let store = seeded_store();
    let patch = TaskPatch {
        due_date: Some(None),
        ..TaskPatch::default()
    };
    assert!(store.update_task("task-1", patch));
    assert!(store.get_task_by_id("task-1").unwrap().due_date.is_none());
}

#[test]
fn patch_json_distinguishes_null_from_missing() {
    let clear: TaskPatch = serde_json::from_str(r#"{"dueDate": null}"#).unwrap();
    assert_eq!(clear.due_date, Some(None));

    let untouched: TaskPatch = serde_json::from_str(r#"{"title": "Renamed"}"#).unwrap();
    assert_eq!(untouched.due_date, None);
    assert_eq!(untouched.title.as_deref(), Some("Renamed"));
}

#[test]
fn delete_removes_only_the_matching_task() {
    let store = seeded_store();
    assert!(store.delete_task("task-3"));
    assert!(!store.delete_task("task-3"));

    let ids: Vec<_> = store.list().into_iter().map(|task| task.id).collect();
    assert_eq!(ids, vec!["task-1", "task-2", "task-4", "task-5", "task-6"]);
}

#[test]
fn seeded_fixture_counts() {
    let store = seeded_store();
    assert_eq!(
        store.derive_counts_at(&sample_anchor()),
        TaskCounts {
            total: 6,
            in_progress: 3,
            completed: 1,
            paused: 1,
            failed: 1,
            due_today: 2,
        }
    );
}

#[test]
fn counts_follow_every_mutation() {
    let store = seeded_store();
    store.add_task(NewTask::new(
        "Refresh vendor list",
        TaskStatus::Paused,
        TaskPriority::Low,
        "management",
    ));
    store.update_task("task-6", TaskPatch::status(TaskStatus::InProgress));
    store.delete_task("task-3");

    let counts = store.derive_counts();
    assert_eq!(counts.total, store.len());
    assert_eq!(counts.total, 6);
    assert_eq!(counts.in_progress, 4);
    assert_eq!(counts.completed, 0);
    assert_eq!(counts.paused, 2);
    assert_eq!(counts.failed, 0);
}

#[test]
fn filtered_view_is_a_pure_function_of_list_and_filter() {
    let store = seeded_store();
    let filter = TaskFilter {
        status: Some(TaskStatus::InProgress),
        search_term: "agent".into(),
        ..TaskFilter::default()
    };
    let first = store.filtered(&filter);
    let second = store.filtered(&filter);
    assert_eq!(first, second);
    let ids: Vec<_> = first.iter().map(|task| task.id.as_str()).collect();
    assert_eq!(ids, vec!["task-5"]);
}

#[test]
fn subtasks_and_comments_bump_updated_at() {
    let store = seeded_store();
    let before = store.get_task_by_id("task-4").unwrap();

    let with_subtask = store.add_subtask("task-4", "Export runbooks").unwrap();
    assert_eq!(with_subtask.subtasks.len(), 1);
    assert!(with_subtask.updated_at >= before.updated_at);

    let subtask_id = with_subtask.subtasks[0].id.clone();
    let toggled = store.toggle_subtask("task-4", &subtask_id).unwrap();
    assert!(toggled.subtasks[0].completed);
    assert!(store.toggle_subtask("task-4", "missing").is_none());

    let commented = store
        .add_comment("task-4", "Knowledge Agent", "Blocked on access")
        .unwrap();
    assert_eq!(commented.comments.last().unwrap().author, "Knowledge Agent");
    assert_eq!(commented.created_at, before.created_at);
}

#[test]
fn only_applied_mutations_are_announced() {
    let bus = Arc::new(RecordingBus::new());
    let store = TaskStore::with_tasks(bus.clone(), sample_tasks());

    store.update_task("missing", TaskPatch::progress(50));
    store.delete_task("missing");
    assert!(bus.drain().is_empty());

    store.update_task("task-2", TaskPatch::progress(50));
    store.delete_task("task-2");
    assert_eq!(
        bus.drain(),
        vec![DashboardEvent::TasksChanged, DashboardEvent::TasksChanged]
    );
}
