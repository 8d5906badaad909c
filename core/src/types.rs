//! Domain types for the todo service.
//!
//! # Design
//! `Todo` is the only persisted entity. Timestamps are owned by the store:
//! callers never set `created_at`, `updated_at` or `deleted_at` themselves.
//! Live records always have `deleted_at == None`; the service never hands a
//! soft-deleted record back to a caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single todo item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Todo {
    /// A fresh, empty todo stamped with `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: String::new(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Form payload for updating a todo's content. A missing `content` field
/// clears the todo.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTodo {
    #[serde(default)]
    pub content: String,
}

/// Which variant of a single todo the renderer should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TodoView {
    #[default]
    Display,
    Edit,
}

impl TodoView {
    /// Maps the `edit` query flag to a view. Only the literal `true` selects
    /// the edit variant.
    pub fn from_edit_flag(flag: Option<&str>) -> Self {
        match flag {
            Some("true") => TodoView::Edit,
            _ => TodoView::Display,
        }
    }
}
