//! Todo lifecycle through `TodoService` backed by SQLite.

use chrono::{DateTime, Utc};
use todo_core::{SqliteTodoStore, StoreError, StoreResult, Todo, TodoError, TodoService, TodoStore};
use uuid::Uuid;

fn service() -> TodoService {
    TodoService::new(SqliteTodoStore::open_in_memory().unwrap())
}

#[test]
fn create_update_fetch() {
    let service = service();
    let created = service.create().unwrap();
    assert_eq!(created.content, "");

    let id = created.id.to_string();
    let updated = service.update(&id, "buy milk").unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.content, "buy milk");
    assert!(updated.updated_at >= created.updated_at);

    let fetched = service.fetch(&id).unwrap();
    assert_eq!(fetched.content, "buy milk");
    assert_eq!(fetched.created_at, created.created_at);
}

#[test]
fn last_update_wins() {
    let service = service();
    let id = service.create().unwrap().id.to_string();
    service.update(&id, "first").unwrap();
    service.update(&id, "second").unwrap();
    assert_eq!(service.fetch(&id).unwrap().content, "second");
}

#[test]
fn content_is_unconstrained() {
    let service = service();
    let id = service.create().unwrap().id.to_string();
    let content = "<b>bold</b> ünïcødé 'quotes' \"double\"\n".repeat(500);
    service.update(&id, &content).unwrap();
    assert_eq!(service.fetch(&id).unwrap().content, content);
}

#[test]
fn create_delete_list() {
    let service = service();
    let keep = service.create().unwrap();
    let gone = service.create().unwrap();

    service.delete(&gone.id.to_string()).unwrap();

    let ids: Vec<Uuid> = service.list().unwrap().iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![keep.id]);
}

#[test]
fn fetch_after_delete_is_invalid_id() {
    let service = service();
    let id = service.create().unwrap().id.to_string();
    service.delete(&id).unwrap();

    let err = service.fetch(&id).unwrap_err();
    assert!(matches!(err, TodoError::InvalidId));
    assert_eq!(err.to_string(), "invalid id");
}

#[test]
fn update_after_delete_is_invalid_id() {
    let service = service();
    let id = service.create().unwrap().id.to_string();
    service.delete(&id).unwrap();
    assert!(matches!(service.update(&id, "zombie"), Err(TodoError::InvalidId)));
}

#[test]
fn list_is_ordered_by_creation() {
    let service = service();
    let created: Vec<Uuid> = (0..10).map(|_| service.create().unwrap().id).collect();

    let listed = service.list().unwrap();
    assert_eq!(listed.iter().map(|t| t.id).collect::<Vec<_>>(), created);
    assert!(listed.windows(2).all(|w| w[0].created_at <= w[1].created_at));
}

#[test]
fn ids_are_unique() {
    let service = service();
    let mut ids: Vec<Uuid> = (0..50).map(|_| service.create().unwrap().id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 50);
}

#[test]
fn store_is_shared_across_threads() {
    let service = std::sync::Arc::new(service());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let service = service.clone();
            std::thread::spawn(move || {
                for _ in 0..5 {
                    service.create().unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(service.list().unwrap().len(), 20);
}

// --- storage failures ---

struct BrokenStore;

fn broken() -> StoreError {
    StoreError::Poisoned
}

impl TodoStore for BrokenStore {
    fn list(&self) -> StoreResult<Vec<Todo>> {
        Err(broken())
    }
    fn insert(&self, _todo: &Todo) -> StoreResult<()> {
        Err(broken())
    }
    fn get(&self, _id: Uuid) -> StoreResult<Option<Todo>> {
        Err(broken())
    }
    fn update_content(
        &self,
        _id: Uuid,
        _content: &str,
        _now: DateTime<Utc>,
    ) -> StoreResult<Option<Todo>> {
        Err(broken())
    }
    fn soft_delete(&self, _id: Uuid, _now: DateTime<Utc>) -> StoreResult<bool> {
        Err(broken())
    }
}

#[test]
fn storage_failures_are_tagged_by_operation() {
    let service = TodoService::new(BrokenStore);
    let id = Uuid::new_v4().to_string();

    let err = service.list().unwrap_err();
    assert!(matches!(err, TodoError::List(_)));
    assert_eq!(err.to_string(), "invalid request");

    assert!(matches!(service.create(), Err(TodoError::Create(_))));

    let err = service.fetch(&id).unwrap_err();
    assert!(matches!(err, TodoError::Fetch(_)));
    assert_eq!(err.to_string(), "invalid id");

    let err = service.update(&id, "x").unwrap_err();
    assert!(matches!(err, TodoError::Update(_)));
    assert_eq!(err.to_string(), "unable to update todo");

    let err = service.delete(&id).unwrap_err();
    assert!(matches!(err, TodoError::Delete(_)));
    assert_eq!(err.to_string(), "unable to delete todo");
}

#[test]
fn malformed_id_never_reaches_the_store() {
    let service = TodoService::new(BrokenStore);
    assert!(matches!(service.fetch("nope"), Err(TodoError::InvalidId)));
    assert!(matches!(service.update("nope", "x"), Err(TodoError::InvalidId)));
    assert!(matches!(service.delete("nope"), Err(TodoError::InvalidId)));
}

/// Hands back soft-deleted rows, as a store that skipped its live filter would.
struct LeakyStore {
    deleted: Todo,
}

impl LeakyStore {
    fn new() -> Self {
        let mut deleted = Todo::new(Utc::now());
        deleted.deleted_at = Some(Utc::now());
        Self { deleted }
    }
}

impl TodoStore for LeakyStore {
    fn list(&self) -> StoreResult<Vec<Todo>> {
        Ok(vec![self.deleted.clone()])
    }
    fn insert(&self, _todo: &Todo) -> StoreResult<()> {
        Ok(())
    }
    fn get(&self, _id: Uuid) -> StoreResult<Option<Todo>> {
        Ok(Some(self.deleted.clone()))
    }
    fn update_content(
        &self,
        _id: Uuid,
        _content: &str,
        _now: DateTime<Utc>,
    ) -> StoreResult<Option<Todo>> {
        Ok(None)
    }
    fn soft_delete(&self, _id: Uuid, _now: DateTime<Utc>) -> StoreResult<bool> {
        Ok(false)
    }
}

#[test]
fn deleted_rows_from_the_store_are_hidden() {
    let store = LeakyStore::new();
    let id = store.deleted.id.to_string();
    let service = TodoService::new(store);

    assert!(service.list().unwrap().is_empty());
    assert!(matches!(service.fetch(&id), Err(TodoError::InvalidId)));
}
