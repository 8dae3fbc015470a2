// ABOUTME: OAuth module wiring the client factory, override registry, allowlist, and coordinator
// ABOUTME: The coordinator's check_and_refresh_access_token is the single operation exposed to callers

pub mod allowlist;
pub mod client;
pub mod coordinator;
pub mod overrides;
pub mod types;

pub use allowlist::{LockAllowlist, LOCK_PLATFORMS_ENV};
pub use client::{OAuthClient, TokenRefresher};
pub use coordinator::{RefreshCoordinator, DEFAULT_LOCK_TIMEOUT};
pub use overrides::{ConnectorRegistry, RefreshOverride};
pub use types::{OAuthClientConfig, RefreshedTokens, TokenResponse};
