//! Error types for the todo store and service.
//!
//! # Design
//! `StoreError` describes what went wrong inside persistence. `TodoError` is
//! what the service reports to its caller: its `Display` text is the short
//! message sent to HTTP clients, and the storage cause (if any) is kept as the
//! error `source` for logging. A malformed id and a missing record are
//! deliberately indistinguishable to callers; both are `InvalidId`.

use thiserror::Error;

/// Errors raised by a `TodoStore` implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    /// The database was migrated by a newer build.
    #[error("database schema version {db_version} is newer than supported {latest_supported}")]
    UnsupportedSchemaVersion { db_version: u32, latest_supported: u32 },

    /// A previous holder of the connection lock panicked.
    #[error("store connection lock poisoned")]
    Poisoned,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors returned by `TodoService` operations.
#[derive(Debug, Error)]
pub enum TodoError {
    /// The id did not parse as a UUID, or no live todo has that id.
    #[error("invalid id")]
    InvalidId,

    #[error("invalid request")]
    List(#[source] StoreError),

    #[error("unable to create todo")]
    Create(#[source] StoreError),

    #[error("invalid id")]
    Fetch(#[source] StoreError),

    #[error("unable to update todo")]
    Update(#[source] StoreError),

    #[error("unable to delete todo")]
    Delete(#[source] StoreError),
}

impl TodoError {
    /// The underlying storage failure, when there is one.
    pub fn store_error(&self) -> Option<&StoreError> {
        match self {
            TodoError::InvalidId => None,
            TodoError::List(err)
            | TodoError::Create(err)
            | TodoError::Fetch(err)
            | TodoError::Update(err)
            | TodoError::Delete(err) => Some(err),
        }
    }
}
