//! Like, comment and check-in command handlers.

use std::sync::Arc;

use serde_json::Value;

use super::{json, str_param, uuid_param, Result};
use crate::DaemonState;

pub fn toggle_like(state: &Arc<DaemonState>, params: &Value) -> Result {
    let challenge_id = uuid_param(params, "challenge_id")?;
    let user_id = uuid_param(params, "user_id")?;
    json(&state.engine.toggle_like(&challenge_id, &user_id)?)
}

pub fn add_comment(state: &Arc<DaemonState>, params: &Value) -> Result {
    let challenge_id = uuid_param(params, "challenge_id")?;
    let user_id = uuid_param(params, "user_id")?;
    let content = str_param(params, "content")?;
    json(&state.engine.add_comment(&challenge_id, &user_id, content)?)
}

pub fn get_comments(state: &Arc<DaemonState>, params: &Value) -> Result {
    let challenge_id = uuid_param(params, "challenge_id")?;
    json(&state.engine.comments(&challenge_id)?)
}

pub fn check_in(state: &Arc<DaemonState>, params: &Value) -> Result {
    let user_id = uuid_param(params, "user_id")?;
    json(&state.engine.check_in(&user_id)?)
}

pub fn check_in_status(state: &Arc<DaemonState>, params: &Value) -> Result {
    let user_id = uuid_param(params, "user_id")?;
    json(&state.engine.check_in_status(&user_id)?)
}
