//! RPC command handlers.
//!
//! Each submodule implements the commands for one engine area. Handlers
//! only extract parameters and shape results; all rules live in the engine.

pub mod challenges;
pub mod engagement;
pub mod identity;
pub mod maintenance;
pub mod social;

use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::rpc::RpcError;

pub(crate) type Result = std::result::Result<Value, RpcError>;

pub(crate) fn str_param<'a>(
    params: &'a Value,
    key: &str,
) -> std::result::Result<&'a str, RpcError> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| RpcError::invalid_params(&format!("{key} required")))
}

pub(crate) fn uuid_param(params: &Value, key: &str) -> std::result::Result<Uuid, RpcError> {
    let raw = str_param(params, key)?;
    Uuid::parse_str(raw).map_err(|_| RpcError::invalid_params(&format!("{key} must be a UUID")))
}

/// An optional id; absent or null means no value.
pub(crate) fn opt_uuid_param(
    params: &Value,
    key: &str,
) -> std::result::Result<Option<Uuid>, RpcError> {
    match params.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(_) => uuid_param(params, key).map(Some),
    }
}

pub(crate) fn json<T: Serialize>(value: &T) -> Result {
    serde_json::to_value(value).map_err(|e| RpcError::internal_error(&format!("encode: {e}")))
}
