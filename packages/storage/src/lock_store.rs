// ABOUTME: Refresh-lock records kept in a shared table as the distributed mutex
// ABOUTME: Atomic create-if-absent over a PRIMARY KEY; TTL is plain data judged by readers

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::error::{StorageError, StorageResult};

/// Ephemeral coordination record, one per user id, alive only for the span
/// of one guarded refresh.
///
/// `ttl` is an absolute unix timestamp set at creation to now plus the lock
/// budget. The store never interprets it; staleness is the reader's call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lock {
    pub user_id: String,
    pub ttl: i64, // Unix timestamp
}

impl Lock {
    /// A lock whose ttl has already passed is presumed abandoned by a
    /// crashed holder and may be deleted and re-acquired by an observer.
    pub fn is_stale(&self, now: i64) -> bool {
        now >= self.ttl
    }
}

/// Shared key-value medium providing atomic create-if-absent, the mutual
/// exclusion primitive for cross-process refresh coordination.
#[async_trait]
pub trait LockStore: Send + Sync {
    /// Create the lock with create-if-absent semantics, failing with
    /// [`StorageError::LockHeld`] when a record with the same key exists.
    async fn create(&self, lock: &Lock) -> StorageResult<()>;

    async fn get(&self, user_id: &str) -> StorageResult<Option<Lock>>;

    /// Delete the lock. Deleting an absent key is not an error.
    async fn delete(&self, user_id: &str) -> StorageResult<()>;
}

/// Lock store over a shared SQLite table.
pub struct SqliteLockStore {
    pool: SqlitePool,
}

impl SqliteLockStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the lock table if it does not exist yet.
    pub async fn init_schema(pool: &SqlitePool) -> StorageResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS refresh_locks (
                user_id TEXT PRIMARY KEY,
                ttl INTEGER NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl LockStore for SqliteLockStore {
    async fn create(&self, lock: &Lock) -> StorageResult<()> {
        debug!("Creating refresh lock for user {}", lock.user_id);

        // Plain INSERT: the PRIMARY KEY turns this into the atomic
        // create-if-absent the coordinator relies on.
        sqlx::query("INSERT INTO refresh_locks (user_id, ttl) VALUES (?, ?)")
            .bind(&lock.user_id)
            .bind(lock.ttl)
            .execute(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.is_unique_violation() => StorageError::LockHeld,
                _ => StorageError::Database(e),
            })?;

        Ok(())
    }

    async fn get(&self, user_id: &str) -> StorageResult<Option<Lock>> {
        let row = sqlx::query("SELECT user_id, ttl FROM refresh_locks WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(Lock {
                user_id: row.try_get("user_id")?,
                ttl: row.try_get("ttl")?,
            })),
            None => Ok(None),
        }
    }

    async fn delete(&self, user_id: &str) -> StorageResult<()> {
        debug!("Deleting refresh lock for user {}", user_id);

        sqlx::query("DELETE FROM refresh_locks WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
