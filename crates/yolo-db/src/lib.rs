//! # yolo-db
//!
//! Persistence layer for the Yolo engine.
//! Manages the single SQLite database at `$YOLO_DATA_DIR/yolo.db`.
//!
//! ## Schema
//!
//! - WAL mode
//! - Foreign keys enforced; cascades are performed by the engine, not SQL
//! - All timestamps are Unix epoch seconds (u64)
//! - Identifiers are UUID v4 stored as 16-byte blobs
//! - Schema version stored in `PRAGMA user_version`
//!
//! Every query function takes a `&Connection`, so it can run against a
//! plain connection or inside a caller's `Transaction`.

pub mod migrations;
pub mod queries;
pub mod schema;
pub mod snapshot;

use rusqlite::{Connection, ErrorCode};
use std::path::Path;

/// Current schema version.
pub const SCHEMA_VERSION: u32 = 1;

/// Database error types.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("migration failed: {0}")]
    Migration(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DbError>;

impl DbError {
    /// True for UNIQUE, CHECK, PRIMARY KEY and FOREIGN KEY failures.
    pub fn is_constraint(&self) -> bool {
        matches!(
            self,
            DbError::Sqlite(rusqlite::Error::SqliteFailure(e, _))
                if e.code == ErrorCode::ConstraintViolation
        )
    }
}

/// Open or create the Yolo database at the given path.
///
/// Configures WAL mode, foreign keys, and runs any pending migrations.
pub fn open(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;
    configure(&conn)?;
    migrations::run(&conn)?;
    Ok(conn)
}

/// Open an in-memory database (for testing).
pub fn open_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    configure(&conn)?;
    migrations::run(&conn)?;
    Ok(conn)
}

/// Configure SQLite pragmas.
fn configure(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA foreign_keys = ON;
         PRAGMA busy_timeout = 5000;
         PRAGMA synchronous = NORMAL;",
    )?;
    Ok(())
}

/// Current Unix time in seconds.
pub fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
