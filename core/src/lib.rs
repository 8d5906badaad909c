//! Todo service core: model, persistence and use cases.
//!
//! # Overview
//! `TodoService` turns list/create/fetch/update/delete requests into calls on
//! a `TodoStore`. `SqliteTodoStore` is the production store; it migrates its
//! schema on open and soft-deletes rows instead of removing them.
//!
//! # Design
//! - The store is injected into the service at construction; there is no
//!   global handle.
//! - The service is synchronous. Async callers run it on a blocking pool.
//! - `TodoError`'s `Display` text is the client-facing message.

pub mod db;
pub mod error;
pub mod service;
pub mod store;
pub mod types;

pub use error::{StoreError, StoreResult, TodoError};
pub use service::TodoService;
pub use store::{SqliteTodoStore, TodoStore};
pub use types::{Todo, TodoView, UpdateTodo};
