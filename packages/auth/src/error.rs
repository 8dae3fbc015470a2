// ABOUTME: Error types for OAuth token lifecycle operations
// ABOUTME: Covers lock coordination, provider refresh, and configuration failures

use thiserror::Error;

use crmbridge_storage::StorageError;

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Error, Debug)]
pub enum AuthError {
    /// Waited past the lock budget for a held refresh lock to resolve. The
    /// critical section is presumed stuck; no automatic retry at this layer.
    #[error("timed out after {0}s waiting for the refresh lock to clear")]
    LockTimeout(u64),

    #[error("token refresh failed: {0}")]
    RefreshFailed(String),

    #[error("token exchange failed: {0}")]
    TokenExchange(String),

    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The persisted record vanished while this process waited on its lock.
    #[error("user record not found: {0}")]
    UserNotFound(String),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
