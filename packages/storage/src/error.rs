// ABOUTME: Error types for CRMBridge storage operations
// ABOUTME: Separates the expected lock-held conflict from real backend failures

use thiserror::Error;

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Error, Debug)]
pub enum StorageError {
    /// Conditional insert rejected: a lock record with the same key already
    /// exists. Callers treat this as "someone else holds the lock", never as
    /// a failure of the store itself.
    #[error("refresh lock already held")]
    LockHeld,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Backend failure from a non-SQL store implementation (connectivity,
    /// serialization, and the like).
    #[error("storage backend error: {0}")]
    Backend(String),
}
