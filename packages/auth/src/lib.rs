// ABOUTME: CRMBridge authentication library coordinating OAuth token refresh
// ABOUTME: Guarantees at most one token exchange per refresh window across processes

pub mod error;
pub mod oauth;

// Re-export main types
pub use error::{AuthError, AuthResult};
pub use oauth::{
    ConnectorRegistry, LockAllowlist, OAuthClient, OAuthClientConfig, RefreshCoordinator,
    RefreshOverride, RefreshedTokens, TokenRefresher, TokenResponse, DEFAULT_LOCK_TIMEOUT,
    LOCK_PLATFORMS_ENV,
};
