//! Challenge lifecycle command handlers.

use std::sync::Arc;

use serde_json::Value;
use yolo_types::ChallengeDraft;

use super::{json, opt_uuid_param, str_param, uuid_param, Result};
use crate::rpc::RpcError;
use crate::DaemonState;

/// Accept a generated suggestion as the user's active challenge.
pub fn accept_challenge(state: &Arc<DaemonState>, params: &Value) -> Result {
    let user_id = uuid_param(params, "user_id")?;
    let raw = params
        .get("challenge")
        .ok_or_else(|| RpcError::invalid_params("challenge required"))?;
    let draft: ChallengeDraft = serde_json::from_value(raw.clone())
        .map_err(|e| RpcError::invalid_params(&format!("challenge: {e}")))?;

    json(&state.engine.accept_challenge(&user_id, &draft)?)
}

pub fn complete_challenge(state: &Arc<DaemonState>, params: &Value) -> Result {
    let challenge_id = uuid_param(params, "challenge_id")?;
    let user_id = uuid_param(params, "user_id")?;
    let photo_url = str_param(params, "photo_url")?;

    let challenge = state
        .engine
        .complete_challenge(&challenge_id, &user_id, photo_url)?;
    json(&challenge)
}

pub fn delete_challenge(state: &Arc<DaemonState>, params: &Value) -> Result {
    let challenge_id = uuid_param(params, "challenge_id")?;
    let user_id = uuid_param(params, "user_id")?;
    json(&state.engine.delete_challenge(&challenge_id, &user_id)?)
}

pub fn get_active_challenge(state: &Arc<DaemonState>, params: &Value) -> Result {
    let user_id = uuid_param(params, "user_id")?;
    json(&state.engine.active_challenge(&user_id)?)
}

/// Every challenge the caller has accepted, newest first.
pub fn get_my_challenges(state: &Arc<DaemonState>, params: &Value) -> Result {
    let user_id = uuid_param(params, "user_id")?;
    json(&state.engine.challenges_for_user(&user_id)?)
}

/// Another user's completed challenges.
pub fn get_user_challenges(state: &Arc<DaemonState>, params: &Value) -> Result {
    let user_id = uuid_param(params, "user_id")?;
    json(&state.engine.completed_for_user(&user_id)?)
}

/// The public wall of completed challenges.
pub fn get_wall(state: &Arc<DaemonState>, params: &Value) -> Result {
    let limit = state
        .config
        .feed
        .page_size(params.get("limit").and_then(|v| v.as_u64()));
    let offset = params
        .get("offset")
        .and_then(|v| v.as_u64())
        .map(|o| o.min(u64::from(u32::MAX)) as u32)
        .unwrap_or(0);

    json(&state.engine.completed_feed(limit, offset)?)
}

pub fn get_challenge(state: &Arc<DaemonState>, params: &Value) -> Result {
    let challenge_id = uuid_param(params, "challenge_id")?;
    let viewer = opt_uuid_param(params, "viewer_id")?;
    json(&state.engine.challenge_detail(&challenge_id, viewer.as_ref())?)
}
