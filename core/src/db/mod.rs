//! SQLite connection bootstrap.
//!
//! Connections returned from here have every migration applied; nothing
//! reads or writes todos before that.

pub mod migrations;

use std::path::Path;
use std::time::{Duration, Instant};

use rusqlite::Connection;
use tracing::{error, info};

use crate::error::StoreResult;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Where a database lives, parsed from a connection string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbLocation {
    Memory,
    File(String),
}

impl DbLocation {
    /// Accepts a bare path, a `sqlite://` or `sqlite:` prefixed path, or
    /// `:memory:`.
    pub fn parse(url: &str) -> Self {
        let path = url
            .strip_prefix("sqlite://")
            .or_else(|| url.strip_prefix("sqlite:"))
            .unwrap_or(url);
        match path {
            "" | ":memory:" => DbLocation::Memory,
            path => DbLocation::File(path.to_string()),
        }
    }
}

/// Opens the database described by `url` and migrates it.
pub fn open_url(url: &str) -> StoreResult<Connection> {
    match DbLocation::parse(url) {
        DbLocation::Memory => open_in_memory(),
        DbLocation::File(path) => open(path),
    }
}

/// Opens a database file, creating it if needed, and migrates it.
pub fn open(path: impl AsRef<Path>) -> StoreResult<Connection> {
    let path = path.as_ref();
    let started_at = Instant::now();
    let conn: StoreResult<Connection> = Connection::open(path)
        .map_err(Into::into)
        .and_then(bootstrap);
    match &conn {
        Ok(_) => info!(
            path = %path.display(),
            duration_ms = started_at.elapsed().as_millis() as u64,
            "opened todo database"
        ),
        Err(err) => error!(path = %path.display(), error = %err, "failed to open todo database"),
    }
    conn
}

/// Opens a private in-memory database and migrates it.
pub fn open_in_memory() -> StoreResult<Connection> {
    let conn: StoreResult<Connection> = Connection::open_in_memory()
        .map_err(Into::into)
        .and_then(bootstrap);
    if let Err(err) = &conn {
        error!(error = %err, "failed to open in-memory todo database");
    }
    conn
}

fn bootstrap(mut conn: Connection) -> StoreResult<Connection> {
    conn.busy_timeout(BUSY_TIMEOUT)?;
    migrations::apply_migrations(&mut conn)?;
    Ok(conn)
}
