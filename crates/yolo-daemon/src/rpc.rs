//! JSON-RPC server over Unix socket.
//!
//! Listens on a Unix domain socket, accepts connections, and dispatches
//! newline-delimited JSON-RPC calls to the command handlers.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixListener;
use tracing::{debug, error, info, warn};
use yolo_core::CoreError;

use crate::commands;
use crate::DaemonState;

/// JSON-RPC request.
#[derive(Debug, Deserialize)]
pub struct RpcRequest {
    /// JSON-RPC version (must be "2.0").
    pub jsonrpc: String,
    pub id: serde_json::Value,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// JSON-RPC response.
#[derive(Debug, Serialize)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub id: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

/// JSON-RPC error object.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RpcError {
    pub code: i32,
    /// Stable error name.
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl RpcResponse {
    pub fn success(id: serde_json::Value, result: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: serde_json::Value, error: RpcError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }
}

impl RpcError {
    fn with_detail(code: i32, message: &str, detail: &str) -> Self {
        Self {
            code,
            message: message.to_string(),
            data: Some(serde_json::json!({"detail": detail})),
        }
    }

    // Standard JSON-RPC errors

    /// Parse error (-32700).
    pub fn parse_error() -> Self {
        Self {
            code: -32700,
            message: "PARSE_ERROR".to_string(),
            data: None,
        }
    }

    /// Invalid request (-32600).
    pub fn invalid_request() -> Self {
        Self {
            code: -32600,
            message: "INVALID_REQUEST".to_string(),
            data: None,
        }
    }

    /// Method not found (-32601).
    pub fn method_not_found(method: &str) -> Self {
        Self {
            code: -32601,
            message: "METHOD_NOT_FOUND".to_string(),
            data: Some(serde_json::json!({"method": method})),
        }
    }

    /// Invalid params (-32602).
    pub fn invalid_params(detail: &str) -> Self {
        Self::with_detail(-32602, "INVALID_PARAMS", detail)
    }

    /// Internal error (-32603).
    pub fn internal_error(detail: &str) -> Self {
        Self::with_detail(-32603, "INTERNAL_ERROR", detail)
    }

    // Engine errors

    /// Not found (-32004).
    pub fn not_found(detail: &str) -> Self {
        Self::with_detail(-32004, "NOT_FOUND", detail)
    }

    /// Forbidden (-32003).
    pub fn forbidden(detail: &str) -> Self {
        Self::with_detail(-32003, "FORBIDDEN", detail)
    }

    /// Conflict (-32009).
    pub fn conflict(detail: &str) -> Self {
        Self::with_detail(-32009, "CONFLICT", detail)
    }

    /// Invalid state (-32020).
    pub fn invalid_state(detail: &str) -> Self {
        Self::with_detail(-32020, "INVALID_STATE", detail)
    }

    /// Insufficient balance (-32040).
    pub fn insufficient_balance(required: u64, available: u64) -> Self {
        Self {
            code: -32040,
            message: "INSUFFICIENT_BALANCE".to_string(),
            data: Some(serde_json::json!({"required": required, "available": available})),
        }
    }

    /// Storage fault (-32050). Safe to retry.
    pub fn storage_fault(detail: &str) -> Self {
        Self {
            code: -32050,
            message: "STORAGE_FAULT".to_string(),
            data: Some(serde_json::json!({"detail": detail, "retryable": true})),
        }
    }
}

impl From<CoreError> for RpcError {
    fn from(err: CoreError) -> Self {
        match &err {
            CoreError::NotFound(d) => Self::not_found(d),
            CoreError::Forbidden(d) => Self::forbidden(d),
            CoreError::Conflict(d) => Self::conflict(d),
            CoreError::InvalidState(d) => Self::invalid_state(d),
            CoreError::InvalidArgument(d) => Self::invalid_params(d),
            CoreError::InsufficientBalance {
                required,
                available,
            } => Self::insufficient_balance(*required, *available),
            CoreError::IoFault(d) => {
                error!("Storage fault: {}", d);
                Self::storage_fault(d)
            }
        }
    }
}

/// The RPC server.
pub struct RpcServer {
    state: Arc<DaemonState>,
    socket_path: PathBuf,
}

impl RpcServer {
    pub fn new(state: Arc<DaemonState>, socket_path: PathBuf) -> Self {
        Self { state, socket_path }
    }

    /// Run the server, accepting connections.
    pub async fn run(&self) -> anyhow::Result<()> {
        // Remove stale socket file
        let _ = std::fs::remove_file(&self.socket_path);

        let listener = UnixListener::bind(&self.socket_path)?;
        info!("IPC server listening on {:?}", self.socket_path);

        loop {
            match listener.accept().await {
                Ok((stream, _addr)) => {
                    let state = self.state.clone();
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(state, stream).await {
                            warn!("Connection error: {}", e);
                        }
                    });
                }
                Err(e) => {
                    error!("Accept error: {}", e);
                }
            }
        }
    }
}

/// Handle a single client connection.
async fn handle_connection(
    state: Arc<DaemonState>,
    stream: tokio::net::UnixStream,
) -> anyhow::Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);
    let mut line = String::new();

    loop {
        line.clear();
        let bytes_read = reader.read_line(&mut line).await?;
        if bytes_read == 0 {
            break; // EOF
        }
        if line.trim().is_empty() {
            continue;
        }

        let response = handle_line(&state, &line).await;
        let mut response_json = serde_json::to_string(&response)?;
        response_json.push('\n');
        writer.write_all(response_json.as_bytes()).await?;
        writer.flush().await?;
    }

    Ok(())
}

/// Parse and dispatch one request line.
///
/// Engine calls hold the store lock and may wait on `SQLite`'s busy
/// timeout, so they run on the blocking pool instead of a runtime worker.
pub async fn handle_line(state: &Arc<DaemonState>, line: &str) -> RpcResponse {
    let request = match serde_json::from_str::<RpcRequest>(line) {
        Ok(request) if request.jsonrpc != "2.0" => {
            return RpcResponse::error(request.id, RpcError::invalid_request());
        }
        Ok(request) => request,
        Err(_) => return RpcResponse::error(serde_json::Value::Null, RpcError::parse_error()),
    };

    let id = request.id.clone();
    let state = state.clone();
    match tokio::task::spawn_blocking(move || dispatch_request(&state, request)).await {
        Ok(response) => response,
        Err(e) => {
            error!("Dispatch task failed: {}", e);
            RpcResponse::error(id, RpcError::internal_error("dispatch task failed"))
        }
    }
}

/// Dispatch a JSON-RPC request to the appropriate command handler.
fn dispatch_request(state: &Arc<DaemonState>, request: RpcRequest) -> RpcResponse {
    let id = request.id.clone();
    let method = request.method.as_str();
    let params = &request.params;

    debug!("Dispatching RPC method: {}", method);

    let result = match method {
        // Identity
        "register" => commands::identity::register(state, params),
        "get_user" => commands::identity::get_user(state, params),
        "lookup_credentials" => commands::identity::lookup_credentials(state, params),
        "update_profile" => commands::identity::update_profile(state, params),
        "user_stats" => commands::identity::user_stats(state, params),

        // Challenge lifecycle
        "accept_challenge" => commands::challenges::accept_challenge(state, params),
        "complete_challenge" => commands::challenges::complete_challenge(state, params),
        "delete_challenge" => commands::challenges::delete_challenge(state, params),
        "get_active_challenge" => commands::challenges::get_active_challenge(state, params),
        "get_my_challenges" => commands::challenges::get_my_challenges(state, params),
        "get_user_challenges" => commands::challenges::get_user_challenges(state, params),
        "get_wall" => commands::challenges::get_wall(state, params),
        "get_challenge" => commands::challenges::get_challenge(state, params),

        // Engagement
        "toggle_like" => commands::engagement::toggle_like(state, params),
        "add_comment" => commands::engagement::add_comment(state, params),
        "get_comments" => commands::engagement::get_comments(state, params),
        "check_in" => commands::engagement::check_in(state, params),
        "check_in_status" => commands::engagement::check_in_status(state, params),

        // Social graph
        "toggle_follow" => commands::social::toggle_follow(state, params),
        "get_following" => commands::social::get_following(state, params),
        "get_followers" => commands::social::get_followers(state, params),
        "get_profile" => commands::social::get_profile(state, params),

        // Maintenance
        "export_snapshot" => commands::maintenance::export_snapshot(state, params),
        "import_snapshot" => commands::maintenance::import_snapshot(state, params),

        _ => Err(RpcError::method_not_found(method)),
    };

    match result {
        Ok(value) => RpcResponse::success(id, value),
        Err(err) => RpcResponse::error(id, err),
    }
}
