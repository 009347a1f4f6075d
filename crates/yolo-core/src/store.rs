//! The engine handle and its unit-of-work helpers.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{Connection, TransactionBehavior};
use tracing::{debug, info};
use yolo_db::snapshot::Snapshot;

use crate::clock::{SystemTimeSource, TimeSource};
use crate::error::{CoreError, Result};

/// Owns the database connection and the clock.
///
/// Every public operation takes the connection lock and runs inside one
/// `BEGIN IMMEDIATE` transaction, so check-then-act sequences cannot
/// interleave with other writers in this process or another one.
pub struct Engine {
    conn: Mutex<Connection>,
    clock: Arc<dyn TimeSource>,
}

impl Engine {
    /// Open (or create) the database file at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = yolo_db::open(path)?;
        info!("Engine opened at {:?}", path);
        Ok(Self::from_connection(conn))
    }

    /// Open a private in-memory engine.
    pub fn open_memory() -> Result<Self> {
        Ok(Self::from_connection(yolo_db::open_memory()?))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
            clock: Arc::new(SystemTimeSource),
        }
    }

    /// Replace the clock.
    pub fn with_time_source(mut self, clock: Arc<dyn TimeSource>) -> Self {
        self.clock = clock;
        self
    }

    /// Current time according to the engine's clock.
    pub fn now(&self) -> u64 {
        self.clock.now()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| CoreError::IoFault("connection lock poisoned".into()))
    }

    /// Run `op` as one write transaction. Nothing is committed if it fails.
    pub(crate) fn write<T>(&self, op: impl FnOnce(&Connection, u64) -> Result<T>) -> Result<T> {
        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let now = self.clock.now();
        let out = op(&tx, now)?;
        tx.commit()?;
        Ok(out)
    }

    /// Run `op` against a consistent read view.
    pub(crate) fn read<T>(&self, op: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Deferred)?;
        let out = op(&tx)?;
        tx.finish()?;
        Ok(out)
    }

    /// Copy every collection out of the store.
    pub fn export_snapshot(&self) -> Result<Snapshot> {
        self.read(|conn| Ok(Snapshot::load(conn)?))
    }

    /// Replace every collection with `snapshot`. On failure the store is
    /// left as it was.
    pub fn import_snapshot(&self, snapshot: &Snapshot) -> Result<()> {
        let mut conn = self.lock()?;
        snapshot.restore(&mut conn)?;
        Ok(())
    }

    /// True when no user has registered yet.
    pub fn is_empty(&self) -> Result<bool> {
        self.read(|conn| {
            let users: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
            Ok(users == 0)
        })
    }

    /// Close the connection, flushing the WAL.
    pub fn close(self) -> Result<()> {
        let conn = self
            .conn
            .into_inner()
            .map_err(|_| CoreError::IoFault("connection lock poisoned".into()))?;
        conn.close().map_err(|(_, e)| CoreError::from(e))?;
        debug!("Engine closed");
        Ok(())
    }
}
