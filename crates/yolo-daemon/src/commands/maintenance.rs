//! Snapshot export and import.

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value;
use tracing::info;
use yolo_core::{CoreError, ReadMode, Snapshot};

use super::{str_param, Result};
use crate::DaemonState;

fn counts(snapshot: &Snapshot) -> Value {
    serde_json::json!({
        "users": snapshot.users.len(),
        "challenges": snapshot.challenges.len(),
        "comments": snapshot.comments.len(),
        "likes": snapshot.likes.len(),
        "check_ins": snapshot.check_ins.len(),
        "follows": snapshot.follows.len(),
    })
}

/// Write every collection as JSON files under `dir`.
pub fn export_snapshot(state: &Arc<DaemonState>, params: &Value) -> Result {
    let dir = PathBuf::from(str_param(params, "dir")?);
    let snapshot = state.engine.export_snapshot()?;
    snapshot.write_dir(&dir).map_err(CoreError::from)?;

    info!("Snapshot exported to {:?}", dir);
    Ok(counts(&snapshot))
}

/// Replace the store with the snapshot under `dir`. Any unreadable file
/// aborts the import before anything is written.
pub fn import_snapshot(state: &Arc<DaemonState>, params: &Value) -> Result {
    let dir = PathBuf::from(str_param(params, "dir")?);
    let snapshot = Snapshot::read_dir(&dir, ReadMode::Strict).map_err(CoreError::from)?;
    state.engine.import_snapshot(&snapshot)?;

    info!("Snapshot imported from {:?}", dir);
    Ok(counts(&snapshot))
}
