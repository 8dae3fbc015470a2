// ABOUTME: Storage seam for CRMBridge credential records and refresh locks
// ABOUTME: Traits for injection plus SQLite implementations over a shared pool

pub mod error;
pub mod lock_store;
pub mod user_store;

// Re-export main types
pub use error::{StorageError, StorageResult};
pub use lock_store::{Lock, LockStore, SqliteLockStore};
pub use user_store::{SqliteUserStore, UserStore};
