//! Todo use cases.
//!
//! # Design
//! `TodoService` owns its store handle; it is built once at startup and
//! shared by reference. Ids arrive as raw strings from the transport and are
//! parsed here, so "malformed" and "missing" collapse into the same
//! `TodoError::InvalidId`. Every storage failure is returned to the caller
//! tagged with the operation that hit it.

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::error::TodoError;
use crate::store::TodoStore;
use crate::types::Todo;

pub struct TodoService {
    store: Box<dyn TodoStore>,
}

impl TodoService {
    pub fn new(store: impl TodoStore + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    /// Live todos ordered by creation time, oldest first.
    pub fn list(&self) -> Result<Vec<Todo>, TodoError> {
        let mut todos = self.store.list().map_err(TodoError::List)?;
        todos.retain(|todo| !todo.is_deleted());
        Ok(todos)
    }

    /// Inserts an empty todo with a fresh id and returns it.
    pub fn create(&self) -> Result<Todo, TodoError> {
        let todo = Todo::new(Utc::now());
        self.store.insert(&todo).map_err(TodoError::Create)?;
        debug!(id = %todo.id, "created todo");
        Ok(todo)
    }

    pub fn fetch(&self, id: &str) -> Result<Todo, TodoError> {
        let id = parse_id(id)?;
        self.store
            .get(id)
            .map_err(TodoError::Fetch)?
            .filter(|todo| !todo.is_deleted())
            .ok_or(TodoError::InvalidId)
    }

    /// Replaces a todo's content and returns the stored record.
    pub fn update(&self, id: &str, content: &str) -> Result<Todo, TodoError> {
        let id = parse_id(id)?;
        let todo = self
            .store
            .update_content(id, content, Utc::now())
            .map_err(TodoError::Update)?
            .ok_or(TodoError::InvalidId)?;
        debug!(id = %todo.id, "updated todo");
        Ok(todo)
    }

    /// Soft-deletes a todo. Deleting an id with no live todo succeeds.
    pub fn delete(&self, id: &str) -> Result<(), TodoError> {
        let id = parse_id(id)?;
        let deleted = self
            .store
            .soft_delete(id, Utc::now())
            .map_err(TodoError::Delete)?;
        debug!(%id, deleted, "deleted todo");
        Ok(())
    }
}

fn parse_id(raw: &str) -> Result<Uuid, TodoError> {
    Uuid::parse_str(raw).map_err(|_| TodoError::InvalidId)
}
