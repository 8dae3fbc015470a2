// ABOUTME: Persistent storage for CRM user credential records
// ABOUTME: SQLite-backed lookup and upsert keyed by the composite user id

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crmbridge_core::UserToken;

use crate::error::StorageResult;

/// Persistent store of [`UserToken`] records.
///
/// This subsystem only ever mutates the token fields of an existing record;
/// record creation happens at first authorization and deletion is an
/// external concern.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: &str) -> StorageResult<Option<UserToken>>;
    async fn save(&self, user: &UserToken) -> StorageResult<()>;
}

/// User store over the framework's SQLite database.
pub struct SqliteUserStore {
    pool: SqlitePool,
}

impl SqliteUserStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the users table if it does not exist yet.
    pub async fn init_schema(pool: &SqlitePool) -> StorageResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                platform TEXT NOT NULL,
                access_token TEXT,
                refresh_token TEXT,
                token_expiry INTEGER,
                created_at INTEGER NOT NULL DEFAULT (unixepoch()),
                updated_at INTEGER NOT NULL DEFAULT (unixepoch())
            )
            "#,
        )
        .execute(pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl UserStore for SqliteUserStore {
    async fn find_by_id(&self, id: &str) -> StorageResult<Option<UserToken>> {
        debug!("Fetching user record {}", id);

        let row = sqlx::query(
            r#"
            SELECT id, platform, access_token, refresh_token, token_expiry
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(UserToken {
                id: row.try_get("id")?,
                platform: row.try_get("platform")?,
                access_token: row.try_get("access_token")?,
                refresh_token: row.try_get("refresh_token")?,
                token_expiry: row.try_get("token_expiry")?,
            })),
            None => Ok(None),
        }
    }

    async fn save(&self, user: &UserToken) -> StorageResult<()> {
        debug!("Saving user record {}", user.id);

        sqlx::query(
            r#"
            INSERT INTO users (
                id, platform, access_token, refresh_token, token_expiry,
                created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, unixepoch(), unixepoch())
            ON CONFLICT(id) DO UPDATE SET
                platform = excluded.platform,
                access_token = excluded.access_token,
                refresh_token = excluded.refresh_token,
                token_expiry = excluded.token_expiry,
                updated_at = unixepoch()
            "#,
        )
        .bind(&user.id)
        .bind(&user.platform)
        .bind(&user.access_token)
        .bind(&user.refresh_token)
        .bind(user.token_expiry)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
