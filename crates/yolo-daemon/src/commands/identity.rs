//! Identity command handlers.

use std::sync::Arc;

use serde_json::Value;
use yolo_types::ProfileUpdate;

use super::{json, str_param, uuid_param, Result};
use crate::rpc::RpcError;
use crate::DaemonState;

/// Register an account. The credential hash is computed upstream.
pub fn register(state: &Arc<DaemonState>, params: &Value) -> Result {
    let username = str_param(params, "username")?;
    let email = str_param(params, "email")?;
    let credential_hash = str_param(params, "credential_hash")?;

    let user = state.engine.register(username, email, credential_hash)?;
    json(&user.public())
}

pub fn get_user(state: &Arc<DaemonState>, params: &Value) -> Result {
    let user_id = uuid_param(params, "user_id")?;
    let user = state.engine.get_user(&user_id)?;
    json(&user.map(|u| u.public()))
}

/// Stored credential hash for a login email, for the upstream verifier.
pub fn lookup_credentials(state: &Arc<DaemonState>, params: &Value) -> Result {
    let email = str_param(params, "email")?;
    Ok(match state.engine.credential_hash_for(email)? {
        Some((user_id, hash)) => serde_json::json!({
            "user_id": user_id,
            "credential_hash": hash,
        }),
        None => Value::Null,
    })
}

pub fn update_profile(state: &Arc<DaemonState>, params: &Value) -> Result {
    let user_id = uuid_param(params, "user_id")?;
    let update: ProfileUpdate = serde_json::from_value(params.clone())
        .map_err(|e| RpcError::invalid_params(&e.to_string()))?;

    let user = state.engine.update_profile(&user_id, &update)?;
    json(&user.public())
}

pub fn user_stats(state: &Arc<DaemonState>, params: &Value) -> Result {
    let user_id = uuid_param(params, "user_id")?;
    json(&state.engine.user_stats(&user_id)?)
}
