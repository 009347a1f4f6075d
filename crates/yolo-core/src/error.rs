//! Engine error taxonomy.

use yolo_db::DbError;

/// Errors returned by every engine operation.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("insufficient balance: required {required}, available {available}")]
    InsufficientBalance { required: u64, available: u64 },

    #[error("storage fault: {0}")]
    IoFault(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// Only storage faults may succeed on a retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CoreError::IoFault(_))
    }
}

impl From<DbError> for CoreError {
    fn from(err: DbError) -> Self {
        if err.is_constraint() {
            return CoreError::Conflict(err.to_string());
        }
        match err {
            DbError::NotFound(what) => CoreError::NotFound(what),
            other => CoreError::IoFault(other.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        DbError::from(err).into()
    }
}
