//! Todo persistence contract and its SQLite implementation.
//!
//! # Design
//! `TodoStore` is the seam between `TodoService` and storage. Every method is
//! a single statement (or a statement plus its read-back) against the store;
//! isolation between concurrent callers is whatever the engine provides.
//!
//! `SqliteTodoStore` keeps one `rusqlite::Connection` behind a `Mutex`. Reads
//! and writes filter on `deleted_at IS NULL`, so a soft-deleted row is
//! invisible to every operation but still reserves its id.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use crate::db;
use crate::error::{StoreError, StoreResult};
use crate::types::Todo;

const TODO_SELECT_SQL: &str = "SELECT id, content, created_at, updated_at, deleted_at FROM todos";

/// Storage operations the service needs.
pub trait TodoStore: Send + Sync {
    /// Live todos, oldest first.
    fn list(&self) -> StoreResult<Vec<Todo>>;

    fn insert(&self, todo: &Todo) -> StoreResult<()>;

    /// The live todo with `id`, if any.
    fn get(&self, id: Uuid) -> StoreResult<Option<Todo>>;

    /// Replaces the content of a live todo and returns the stored row, or
    /// `None` when no live todo has `id`.
    fn update_content(&self, id: Uuid, content: &str, now: DateTime<Utc>)
        -> StoreResult<Option<Todo>>;

    /// Marks a live todo deleted. Returns whether a row was affected.
    fn soft_delete(&self, id: Uuid, now: DateTime<Utc>) -> StoreResult<bool>;
}

/// SQLite-backed todo store.
pub struct SqliteTodoStore {
    conn: Mutex<Connection>,
}

impl SqliteTodoStore {
    /// Wraps an already migrated connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Opens the store named by a connection string (see `db::DbLocation`).
    pub fn open_url(url: &str) -> StoreResult<Self> {
        db::open_url(url).map(Self::new)
    }

    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        db::open(path).map(Self::new)
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        db::open_in_memory().map(Self::new)
    }

    fn conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl TodoStore for SqliteTodoStore {
    fn list(&self) -> StoreResult<Vec<Todo>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "{TODO_SELECT_SQL} WHERE deleted_at IS NULL ORDER BY created_at ASC, rowid ASC"
        ))?;
        let todos = stmt
            .query_map([], todo_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(todos)
    }

    fn insert(&self, todo: &Todo) -> StoreResult<()> {
        self.conn()?.execute(
            "INSERT INTO todos (id, content, created_at, updated_at, deleted_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                todo.id.to_string(),
                todo.content,
                todo.created_at,
                todo.updated_at,
                todo.deleted_at,
            ],
        )?;
        Ok(())
    }

    fn get(&self, id: Uuid) -> StoreResult<Option<Todo>> {
        let conn = self.conn()?;
        get_live(&conn, id)
    }

    fn update_content(
        &self,
        id: Uuid,
        content: &str,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<Todo>> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE todos SET content = ?1, updated_at = ?2
             WHERE id = ?3 AND deleted_at IS NULL",
            params![content, now, id.to_string()],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        get_live(&conn, id)
    }

    fn soft_delete(&self, id: Uuid, now: DateTime<Utc>) -> StoreResult<bool> {
        let changed = self.conn()?.execute(
            "UPDATE todos SET deleted_at = ?1, updated_at = ?1
             WHERE id = ?2 AND deleted_at IS NULL",
            params![now, id.to_string()],
        )?;
        Ok(changed > 0)
    }
}

fn get_live(conn: &Connection, id: Uuid) -> StoreResult<Option<Todo>> {
    let todo = conn
        .query_row(
            &format!("{TODO_SELECT_SQL} WHERE id = ?1 AND deleted_at IS NULL"),
            params![id.to_string()],
            todo_from_row,
        )
        .optional()?;
    Ok(todo)
}

fn todo_from_row(row: &Row<'_>) -> rusqlite::Result<Todo> {
    let raw_id: String = row.get(0)?;
    let id = Uuid::parse_str(&raw_id)
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(err)))?;
    Ok(Todo {
        id,
        content: row.get(1)?,
        created_at: row.get(2)?,
        updated_at: row.get(3)?,
        deleted_at: row.get(4)?,
    })
}
