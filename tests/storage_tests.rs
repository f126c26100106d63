use chrono::{Duration, Utc};
use task_manager::storage::models::{SortField, SortOrder, TaskQuery, TaskRecord, TaskStatus};
use task_manager::storage::Database;

fn test_db() -> (tempfile::TempDir, Database) {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open(dir.path().join("data")).unwrap();
    db.ensure_indexes().unwrap();
    (dir, db)
}

/// A task created `age_secs` seconds ago, so ordering tests have distinct
/// timestamps.
fn sample_task(id: &str, title: &str, status: TaskStatus, age_secs: i64) -> TaskRecord {
    let created = Utc::now() - Duration::seconds(age_secs);
    TaskRecord {
        id: id.to_string(),
        title: title.to_string(),
        description: format!("description of {title}"),
        status,
        created_at: created,
        updated_at: created,
    }
}

#[test]
fn test_put_and_get_task() {
    let (_dir, db) = test_db();
    let task = sample_task("task-1", "Write report", TaskStatus::Todo, 0);

    db.put_task(&task).unwrap();

    let retrieved = db.get_task("task-1").unwrap().expect("task should exist");
    assert_eq!(retrieved.id, "task-1");
    assert_eq!(retrieved.title, "Write report");
    assert_eq!(retrieved.description, "description of Write report");
    assert_eq!(retrieved.status, TaskStatus::Todo);
}

#[test]
fn test_get_task_not_found() {
    let (_dir, db) = test_db();
    assert!(db.get_task("nonexistent").unwrap().is_none());
}

#[test]
fn test_delete_task() {
    let (_dir, db) = test_db();
    let task = sample_task("task-2", "To delete", TaskStatus::Done, 0);
    db.put_task(&task).unwrap();

    assert!(db.delete_task("task-2").unwrap());
    assert!(db.get_task("task-2").unwrap().is_none());

    // Deleted tasks must not surface through any index scan
    let (items, total) = db.list_tasks(&TaskQuery::default()).unwrap();
    assert_eq!(total, 0);
    assert!(items.is_empty());
}

#[test]
fn test_delete_task_not_found() {
    let (_dir, db) = test_db();
    assert!(!db.delete_task("nonexistent").unwrap());
}

#[test]
fn test_update_task() {
    let (_dir, db) = test_db();
    let task = sample_task("task-3", "Original", TaskStatus::Todo, 10);
    db.put_task(&task).unwrap();

    let updated = db
        .update_task("task-3", "Renamed", "new description", TaskStatus::Done)
        .unwrap()
        .expect("task should exist");

    assert_eq!(updated.title, "Renamed");
    assert_eq!(updated.description, "new description");
    assert_eq!(updated.status, TaskStatus::Done);
    assert_eq!(updated.created_at, task.created_at);
    assert!(updated.updated_at > task.updated_at);
}

#[test]
fn test_update_task_not_found() {
    let (_dir, db) = test_db();
    assert!(db
        .update_task("nonexistent", "x", "y", TaskStatus::Todo)
        .unwrap()
        .is_none());
}

#[test]
fn test_update_task_moves_index_entries() {
    let (_dir, db) = test_db();
    db.put_task(&sample_task("task-4", "Movable", TaskStatus::Todo, 0))
        .unwrap();

    db.update_task("task-4", "Movable", "description", TaskStatus::Done)
        .unwrap()
        .unwrap();

    let todo_query = TaskQuery {
        page: 1,
        limit: 10,
        status: Some(TaskStatus::Todo),
        ..Default::default()
    };
    let (items, total) = db.list_tasks(&todo_query).unwrap();
    assert_eq!(total, 0, "stale index entry surfaced: {items:?}");

    let done_query = TaskQuery {
        status: Some(TaskStatus::Done),
        ..todo_query
    };
    let (items, total) = db.list_tasks(&done_query).unwrap();
    assert_eq!(total, 1);
    assert_eq!(items[0].id, "task-4");
}

#[test]
fn test_ensure_indexes_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open(dir.path().join("data")).unwrap();

    let first = db.ensure_indexes().unwrap();
    assert_eq!(first.created.len(), 4);
    assert!(first.skipped.is_empty());

    // Re-applying the same declarations must be a no-op, not an error
    let second = db.ensure_indexes().unwrap();
    assert!(second.created.is_empty());
    assert_eq!(second.skipped.len(), 4);
}

#[test]
fn test_ensure_indexes_backfills_existing_tasks() {
    let dir = tempfile::tempdir().unwrap();

    // Write a task before the declarations are applied; put_task creates the
    // index tables on the fly, but a fresh database reopened by the admin
    // script must still end up complete
    {
        let db = Database::open(dir.path().join("data")).unwrap();
        db.put_task(&sample_task("task-5", "Early bird", TaskStatus::Todo, 0))
            .unwrap();
    }

    let db = Database::open(dir.path().join("data")).unwrap();
    db.ensure_indexes().unwrap();

    let (items, total) = db.list_tasks(&TaskQuery::default()).unwrap();
    assert_eq!(total, 1);
    assert_eq!(items[0].id, "task-5");
}

#[test]
fn test_list_defaults_to_newest_first() {
    let (_dir, db) = test_db();
    db.put_task(&sample_task("old", "Old task", TaskStatus::Todo, 300))
        .unwrap();
    db.put_task(&sample_task("mid", "Middle task", TaskStatus::Todo, 200))
        .unwrap();
    db.put_task(&sample_task("new", "New task", TaskStatus::Todo, 100))
        .unwrap();

    let (items, total) = db
        .list_tasks(&TaskQuery {
            page: 1,
            limit: 10,
            ..Default::default()
        })
        .unwrap();

    assert_eq!(total, 3);
    let ids: Vec<&str> = items.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["new", "mid", "old"]);
}

#[test]
fn test_list_filters_by_status() {
    let (_dir, db) = test_db();
    db.put_task(&sample_task("a", "Task a", TaskStatus::Todo, 30))
        .unwrap();
    db.put_task(&sample_task("b", "Task b", TaskStatus::Done, 20))
        .unwrap();
    db.put_task(&sample_task("c", "Task c", TaskStatus::Todo, 10))
        .unwrap();

    let (items, total) = db
        .list_tasks(&TaskQuery {
            page: 1,
            limit: 10,
            status: Some(TaskStatus::Todo),
            ..Default::default()
        })
        .unwrap();

    assert_eq!(total, 2);
    let ids: Vec<&str> = items.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["c", "a"]);
}

#[test]
fn test_list_search_is_case_insensitive() {
    let (_dir, db) = test_db();
    db.put_task(&sample_task("a", "Buy Groceries", TaskStatus::Todo, 20))
        .unwrap();
    db.put_task(&sample_task("b", "File taxes", TaskStatus::Todo, 10))
        .unwrap();

    let (items, total) = db
        .list_tasks(&TaskQuery {
            page: 1,
            limit: 10,
            search: Some("groceries".to_string()),
            ..Default::default()
        })
        .unwrap();

    assert_eq!(total, 1);
    assert_eq!(items[0].id, "a");
}

#[test]
fn test_list_sorts_by_title() {
    let (_dir, db) = test_db();
    db.put_task(&sample_task("a", "banana", TaskStatus::Todo, 30))
        .unwrap();
    db.put_task(&sample_task("b", "Apple", TaskStatus::Todo, 20))
        .unwrap();
    db.put_task(&sample_task("c", "cherry", TaskStatus::Todo, 10))
        .unwrap();

    let (items, _) = db
        .list_tasks(&TaskQuery {
            page: 1,
            limit: 10,
            sort_by: Some(SortField::Title),
            order: Some(SortOrder::Asc),
            ..Default::default()
        })
        .unwrap();

    // Title index is case-insensitive
    let ids: Vec<&str> = items.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "a", "c"]);

    let (items, _) = db
        .list_tasks(&TaskQuery {
            page: 1,
            limit: 10,
            sort_by: Some(SortField::Title),
            order: Some(SortOrder::Desc),
            ..Default::default()
        })
        .unwrap();
    let ids: Vec<&str> = items.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["c", "a", "b"]);
}

#[test]
fn test_list_paginates_and_reports_total() {
    let (_dir, db) = test_db();
    for i in 0..5 {
        db.put_task(&sample_task(
            &format!("task-{i}"),
            &format!("Task {i}"),
            TaskStatus::Todo,
            (5 - i) * 10,
        ))
        .unwrap();
    }

    let (page1, total) = db
        .list_tasks(&TaskQuery {
            page: 1,
            limit: 2,
            ..Default::default()
        })
        .unwrap();
    assert_eq!(total, 5);
    assert_eq!(page1.len(), 2);

    let (page3, total) = db
        .list_tasks(&TaskQuery {
            page: 3,
            limit: 2,
            ..Default::default()
        })
        .unwrap();
    assert_eq!(total, 5);
    assert_eq!(page3.len(), 1);

    let (page4, _) = db
        .list_tasks(&TaskQuery {
            page: 4,
            limit: 2,
            ..Default::default()
        })
        .unwrap();
    assert!(page4.is_empty());
}

#[test]
fn test_list_page_far_past_the_end_is_empty() {
    let (_dir, db) = test_db();
    db.put_task(&sample_task("only", "Only task", TaskStatus::Todo, 0))
        .unwrap();

    // An absurdly large page number is a valid request; it must yield an
    // empty page with the true total, not overflow the offset arithmetic
    let (items, total) = db
        .list_tasks(&TaskQuery {
            page: u64::MAX,
            limit: 2,
            ..Default::default()
        })
        .unwrap();

    assert_eq!(total, 1);
    assert!(items.is_empty());
}

#[test]
fn test_list_status_filter_combines_with_created_at_sort() {
    let (_dir, db) = test_db();
    db.put_task(&sample_task("a", "First", TaskStatus::Done, 40))
        .unwrap();
    db.put_task(&sample_task("b", "Second", TaskStatus::Todo, 30))
        .unwrap();
    db.put_task(&sample_task("c", "Third", TaskStatus::Done, 20))
        .unwrap();
    db.put_task(&sample_task("d", "Fourth", TaskStatus::Done, 10))
        .unwrap();

    // Walks the composite status/created_at index
    let (items, total) = db
        .list_tasks(&TaskQuery {
            page: 1,
            limit: 10,
            status: Some(TaskStatus::Done),
            sort_by: Some(SortField::CreatedAt),
            order: Some(SortOrder::Desc),
            ..Default::default()
        })
        .unwrap();

    assert_eq!(total, 3);
    let ids: Vec<&str> = items.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["d", "c", "a"]);
}
