//! # SQLite Database methods
//!
//! This module contains "low-level" SQLite database interactions.
//!
//! All these interaction are maintained by simple functions (rather than stateful structs) that accept a
//! `&mut SqliteConnection` argument. Callers can obtain a connection from a pool, or create an atomic transaction and
//! pass `&mut tx` through, without any other changes. [`orders::idempotent_insert`] relies on the latter: it must be
//! run inside a transaction for the aggregate write to be all-or-nothing.
use std::{fs, path::Path, str::FromStr, time::Duration};

use log::debug;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Error as SqlxError,
    SqlitePool,
};

pub mod deliveries;
pub mod items;
pub mod orders;
pub mod payments;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// Creates a connection pool. The database file is created if it does not exist yet, and foreign keys are enforced.
///
/// Queries waiting on a locked database give up after [`BUSY_TIMEOUT`], and waiting for a free connection gives up
/// after [`ACQUIRE_TIMEOUT`], so a single stuck query never hangs a caller indefinitely.
pub async fn new_pool(url: &str, max_connections: u32) -> Result<SqlitePool, SqlxError> {
    ensure_parent_dir(url)?;
    let options = SqliteConnectOptions::from_str(url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(BUSY_TIMEOUT);
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect_with(options)
        .await?;
    Ok(pool)
}

/// SQLite creates a missing database file, but not the directory it lives in.
fn ensure_parent_dir(url: &str) -> Result<(), SqlxError> {
    let path = url.trim_start_matches("sqlite://").trim_start_matches("sqlite:");
    let path = path.split('?').next().unwrap_or_default();
    if path.is_empty() || path.starts_with(":memory:") {
        return Ok(());
    }
    match Path::new(path).parent() {
        Some(dir) if !dir.as_os_str().is_empty() && !dir.exists() => {
            debug!("Creating database directory {}", dir.display());
            fs::create_dir_all(dir)?;
            Ok(())
        },
        _ => Ok(()),
    }
}
