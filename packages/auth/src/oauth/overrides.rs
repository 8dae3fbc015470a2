// ABOUTME: Platform override registry for connector-owned refresh implementations
// ABOUTME: Capability lookup mapping a platform name to a strategy that replaces the generic flow

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crmbridge_core::UserToken;

use crate::error::AuthResult;

/// A platform-specific refresh strategy that fully replaces the generic
/// locking/refresh flow, including whatever concurrency handling it wants.
/// Its return value goes back to the original caller unmodified.
#[async_trait]
pub trait RefreshOverride: Send + Sync {
    async fn check_and_refresh_access_token(&self, user: UserToken) -> AuthResult<UserToken>;
}

/// Explicit platform -> override lookup, built by the embedder and handed to
/// the coordinator. A platform either has a custom strategy or it doesn't;
/// there is no inheritance and no global state.
#[derive(Default, Clone)]
pub struct ConnectorRegistry {
    overrides: HashMap<String, Arc<dyn RefreshOverride>>,
}

impl ConnectorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, platform: impl Into<String>, connector: Arc<dyn RefreshOverride>) {
        self.overrides.insert(platform.into(), connector);
    }

    pub fn get(&self, platform: &str) -> Option<&Arc<dyn RefreshOverride>> {
        self.overrides.get(platform)
    }
}
