//! HTTP surface for the todo service.
//!
//! # Design
//! - Handlers are thin: parse the request, run one `TodoService` call on the
//!   blocking pool, render the result.
//! - Ids reach the service as raw path segments so a malformed id is reported
//!   as "invalid id" rather than an extractor rejection. Query and form
//!   rejections fall back to defaults for the same reason.
//! - Every `TodoError` becomes a 400 with a JSON `{"message": ...}` body.
//!   Only collaborator faults (rendering, a panicked blocking task) yield 500.

pub mod config;
pub mod telemetry;
pub mod views;

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{FormRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Form, Json, Router,
};
use serde_json::json;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing::{debug, error, info, warn};

use todo_core::{TodoError, TodoService, TodoView, UpdateTodo};

use crate::views::Views;

/// Shared handles injected into every handler.
#[derive(Clone)]
pub struct AppState {
    service: Arc<TodoService>,
    views: Arc<Views>,
}

impl AppState {
    pub fn new(service: TodoService) -> tera::Result<Self> {
        Ok(Self {
            service: Arc::new(service),
            views: Arc::new(Views::new()?),
        })
    }

    pub fn service(&self) -> &TodoService {
        &self.service
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/todo", get(list_todos).post(create_todo))
        .route("/todo/{id}", get(get_todo).put(update_todo).delete(delete_todo))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::new())
        .with_state(state)
}

pub async fn run(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutting down"),
        Err(err) => error!(error = %err, "failed to listen for shutdown signal"),
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Todo(#[from] TodoError),

    #[error("failed to render view")]
    Render(#[from] tera::Error),

    #[error("blocking task failed")]
    Task(#[from] tokio::task::JoinError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Todo(err) => {
                match err.store_error() {
                    Some(source) => warn!(error = %source, "{err}"),
                    None => debug!("{err}"),
                }
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            AppError::Render(err) => {
                error!(error = ?err, "{self}");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_string())
            }
            AppError::Task(err) => {
                error!(error = %err, "{self}");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_string())
            }
        };
        (status, Json(json!({ "message": message }))).into_response()
    }
}

/// Runs a service call on tokio's blocking pool.
async fn blocking<T, F>(state: &AppState, op: F) -> Result<T, AppError>
where
    F: FnOnce(&TodoService) -> Result<T, TodoError> + Send + 'static,
    T: Send + 'static,
{
    let service = Arc::clone(&state.service);
    let result = tokio::task::spawn_blocking(move || op(&service)).await?;
    Ok(result?)
}

/// Path ids that fail to extract (for instance, invalid UTF-8) are reported
/// the same way as ids that fail to parse.
fn path_id(path: Result<Path<String>, PathRejection>) -> Result<String, AppError> {
    match path {
        Ok(Path(id)) => Ok(id),
        Err(rejection) => {
            debug!(error = %rejection, "rejected todo id");
            Err(TodoError::InvalidId.into())
        }
    }
}

/// First `edit` value in the query string, if any.
fn edit_flag(pairs: &[(String, String)]) -> Option<&str> {
    pairs
        .iter()
        .find(|(key, _)| key == "edit")
        .map(|(_, value)| value.as_str())
}

async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    Ok(Html(state.views.index()?))
}

async fn list_todos(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let todos = blocking(&state, |service| service.list()).await?;
    Ok(Html(state.views.todos(&todos)?))
}

async fn create_todo(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let todo = blocking(&state, |service| service.create()).await?;
    Ok(Html(state.views.todo(&todo, TodoView::Edit)?))
}

async fn get_todo(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Html<String>, AppError> {
    let id = path_id(path)?;
    let pairs = query.map(|Query(pairs)| pairs).unwrap_or_default();
    let view = TodoView::from_edit_flag(edit_flag(&pairs));
    let todo = blocking(&state, move |service| service.fetch(&id)).await?;
    Ok(Html(state.views.todo(&todo, view)?))
}

async fn update_todo(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    form: Result<Form<UpdateTodo>, FormRejection>,
) -> Result<Html<String>, AppError> {
    let id = path_id(path)?;
    // A missing or non-form body clears the content.
    let input = match form {
        Ok(Form(input)) => input,
        Err(rejection) => {
            debug!(error = %rejection, "no form body, clearing content");
            UpdateTodo::default()
        }
    };
    let todo = blocking(&state, move |service| service.update(&id, &input.content)).await?;
    Ok(Html(state.views.todo(&todo, TodoView::Display)?))
}

async fn delete_todo(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let id = path_id(path)?;
    blocking(&state, move |service| service.delete(&id)).await?;
    Ok(StatusCode::OK)
}
