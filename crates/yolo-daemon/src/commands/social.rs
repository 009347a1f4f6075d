//! Follow graph command handlers.

use std::sync::Arc;

use serde_json::Value;

use super::{json, opt_uuid_param, uuid_param, Result};
use crate::DaemonState;

/// Follow or unfollow `target_id` as `user_id`.
pub fn toggle_follow(state: &Arc<DaemonState>, params: &Value) -> Result {
    let user_id = uuid_param(params, "user_id")?;
    let target_id = uuid_param(params, "target_id")?;
    json(&state.engine.toggle_follow(&user_id, &target_id)?)
}

pub fn get_following(state: &Arc<DaemonState>, params: &Value) -> Result {
    let user_id = uuid_param(params, "user_id")?;
    let viewer = opt_uuid_param(params, "viewer_id")?;
    json(&state.engine.following(&user_id, viewer.as_ref())?)
}

pub fn get_followers(state: &Arc<DaemonState>, params: &Value) -> Result {
    let user_id = uuid_param(params, "user_id")?;
    let viewer = opt_uuid_param(params, "viewer_id")?;
    json(&state.engine.followers(&user_id, viewer.as_ref())?)
}

pub fn get_profile(state: &Arc<DaemonState>, params: &Value) -> Result {
    let user_id = uuid_param(params, "user_id")?;
    let viewer = opt_uuid_param(params, "viewer_id")?;
    json(&state.engine.profile(&user_id, viewer.as_ref())?)
}
