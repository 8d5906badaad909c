//! Schema for the `todos` table.
//!
//! Version 1 creates `todos` and the `(deleted_at, created_at)` index that
//! serves the live-list query. The schema version lives in
//! `PRAGMA user_version`; a fresh file starts at 0.

use rusqlite::Connection;
use tracing::info;

use crate::error::{StoreError, StoreResult};

/// Ordered by version, oldest first.
const MIGRATIONS: &[(u32, &str)] = &[(1, include_str!("0001_todos.sql"))];

/// Schema version a fully migrated database reports.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |&(version, _)| version)
}

/// Brings `conn` up to `latest_version`. Pending steps share one transaction,
/// so a failure leaves the schema where it was.
pub fn apply_migrations(conn: &mut Connection) -> StoreResult<()> {
    let from = current_version(conn)?;
    let to = latest_version();
    if from > to {
        return Err(StoreError::UnsupportedSchemaVersion {
            db_version: from,
            latest_supported: to,
        });
    }

    let pending: Vec<_> = MIGRATIONS.iter().filter(|&&(version, _)| version > from).collect();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for &&(version, sql) in &pending {
        tx.execute_batch(sql)?;
        tx.pragma_update(None, "user_version", version)?;
    }
    tx.commit()?;
    info!(from, to, "migrated todo schema");

    Ok(())
}

pub fn current_version(conn: &Connection) -> StoreResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}
