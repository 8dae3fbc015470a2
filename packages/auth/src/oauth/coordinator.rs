// ABOUTME: Refresh coordinator guaranteeing at most one token exchange per refresh window
// ABOUTME: Cross-process mutual exclusion rides on the lock store's atomic create-if-absent

use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{debug, error, info};

use crmbridge_core::UserToken;
use crmbridge_storage::{Lock, LockStore, StorageError, UserStore};

use crate::error::{AuthError, AuthResult};
use crate::oauth::allowlist::LockAllowlist;
use crate::oauth::client::TokenRefresher;
use crate::oauth::overrides::ConnectorRegistry;

/// Default budget for one guarded refresh before waiters give up.
pub const DEFAULT_LOCK_TIMEOUT: Duration =
    Duration::from_secs(crmbridge_core::DEFAULT_LOCK_TIMEOUT_SECONDS);

/// How often a waiter re-checks a held lock. Independent of the expiry
/// buffer.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Outcome of waiting on another process's lock.
enum WaitOutcome {
    /// The holder released after persisting its result.
    Released(UserToken),
    /// The lock went stale and was cleared; acquisition should be retried.
    StaleCleared,
}

/// Orchestrates the token lifecycle: expiry check, override delegation, and
/// the guarded or unguarded refresh path.
///
/// Every collaborator is injected at construction so embedders and tests
/// control the lock store, the user store, and the per-platform overrides
/// independently. The coordinator itself keeps no mutable state.
pub struct RefreshCoordinator<L, U> {
    lock_store: L,
    user_store: U,
    overrides: ConnectorRegistry,
    allowlist: LockAllowlist,
    poll_interval: Duration,
}

impl<L: LockStore, U: UserStore> RefreshCoordinator<L, U> {
    pub fn new(
        lock_store: L,
        user_store: U,
        overrides: ConnectorRegistry,
        allowlist: LockAllowlist,
    ) -> Self {
        Self {
            lock_store,
            user_store,
            overrides,
            allowlist,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Override the waiter poll interval. Mostly useful in tests.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Pre-flight step before any authenticated CRM call: return `user` with
    /// a usable access token, refreshing at most once per lock window across
    /// all concurrent callers on allowlisted platforms.
    ///
    /// `lock_timeout` bounds the guarded path and defaults to
    /// [`DEFAULT_LOCK_TIMEOUT`].
    pub async fn check_and_refresh_access_token<R: TokenRefresher>(
        &self,
        client: &R,
        user: UserToken,
        lock_timeout: Option<Duration>,
    ) -> AuthResult<UserToken> {
        // Fresh enough: no network call, no lock
        if !user.needs_refresh() {
            return Ok(user);
        }

        // A registered override fully owns refresh semantics for its
        // platform; the generic path is never entered
        if let Some(connector) = self.overrides.get(&user.platform) {
            debug!(
                "Delegating refresh for platform {} to its override",
                user.platform
            );
            return connector.check_and_refresh_access_token(user).await;
        }

        // Expired but nothing to refresh with: terminal no-op, not an error
        if !user.has_credentials() {
            debug!("User {} has no stored credentials, skipping refresh", user.id);
            return Ok(user);
        }

        if !self.allowlist.contains(&user.platform) {
            return self.refresh_and_save(client, user).await;
        }

        let lock_timeout = lock_timeout.unwrap_or(DEFAULT_LOCK_TIMEOUT);
        self.guarded_refresh(client, user, lock_timeout).await
    }

    /// Guarded path: serialize the provider call through the lock store.
    async fn guarded_refresh<R: TokenRefresher>(
        &self,
        client: &R,
        user: UserToken,
        lock_timeout: Duration,
    ) -> AuthResult<UserToken> {
        // One monotonic clock bounds the whole invocation, re-acquisition
        // attempts included
        let started = Instant::now();

        loop {
            let lock = Lock {
                user_id: user.id.clone(),
                ttl: Utc::now().timestamp() + lock_timeout.as_secs() as i64,
            };

            match self.lock_store.create(&lock).await {
                Ok(()) => {
                    debug!("Acquired refresh lock for user {}", user.id);
                    let user_id = user.id.clone();
                    let result = self.refresh_and_save(client, user).await;

                    // Release on both exit paths
                    let released = self.lock_store.delete(&user_id).await;

                    return match result {
                        Ok(updated) => {
                            released?;
                            Ok(updated)
                        }
                        Err(refresh_err) => {
                            // The refresh error wins; a failed release here
                            // is recovered later by a waiter's staleness check
                            if let Err(delete_err) = released {
                                error!(
                                    "Failed to release refresh lock for user {}: {}",
                                    user_id, delete_err
                                );
                            }
                            Err(refresh_err)
                        }
                    };
                }
                Err(StorageError::LockHeld) => {
                    debug!("Refresh lock for user {} is held, polling", user.id);
                    match self.wait_for_release(&user.id, started, lock_timeout).await? {
                        WaitOutcome::Released(record) => return Ok(record),
                        WaitOutcome::StaleCleared => continue,
                    }
                }
                // Store connectivity failure, not a pre-existing lock: no
                // polling, propagate as-is
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Poll a held lock until it resolves, goes stale, or the budget runs
    /// out.
    async fn wait_for_release(
        &self,
        user_id: &str,
        started: Instant,
        lock_timeout: Duration,
    ) -> AuthResult<WaitOutcome> {
        loop {
            if started.elapsed() >= lock_timeout {
                error!("Gave up waiting for refresh lock on user {}", user_id);
                return Err(AuthError::LockTimeout(lock_timeout.as_secs()));
            }

            match self.lock_store.get(user_id).await? {
                None => {
                    // The holder finished and released. This process's
                    // in-memory copy is stale, so re-read the persisted
                    // record and trust it as fresh.
                    debug!("Refresh lock for user {} released, reloading record", user_id);
                    let record = self
                        .user_store
                        .find_by_id(user_id)
                        .await?
                        .ok_or_else(|| AuthError::UserNotFound(user_id.to_string()))?;
                    return Ok(WaitOutcome::Released(record));
                }
                Some(lock) if lock.is_stale(Utc::now().timestamp()) => {
                    // Holder likely crashed; clear the lock and retry
                    // acquisition instead of waiting on it
                    info!("Clearing stale refresh lock for user {}", user_id);
                    self.lock_store.delete(user_id).await?;
                    return Ok(WaitOutcome::StaleCleared);
                }
                Some(_) => tokio::time::sleep(self.poll_interval).await,
            }
        }
    }

    /// One provider round trip, then persist. On failure the stored record
    /// is left untouched and the error propagates to the caller.
    async fn refresh_and_save<R: TokenRefresher>(
        &self,
        client: &R,
        mut user: UserToken,
    ) -> AuthResult<UserToken> {
        let (Some(access_token), Some(refresh_token)) =
            (user.access_token.clone(), user.refresh_token.clone())
        else {
            return Ok(user);
        };

        let refreshed = client
            .refresh_access_token(&access_token, &refresh_token)
            .await?;

        user.access_token = Some(refreshed.access_token);
        user.refresh_token = Some(refreshed.refresh_token);
        user.token_expiry = Some(refreshed.expires_at);
        self.user_store.save(&user).await?;

        info!("Refreshed access token for user {}", user.id);
        Ok(user)
    }
}
