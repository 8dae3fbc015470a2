// ABOUTME: Credential state for one CRM user and the expiry policy applied to it
// ABOUTME: Tokens are opaque secrets; expiry is an absolute unix timestamp

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::constants::REFRESH_BUFFER_SECONDS;

/// One CRM user's OAuth credential state.
///
/// `access_token` and `refresh_token` are either both present or both absent;
/// API-key-auth platforms carry neither and never reach the refresh
/// coordinator. `token_expiry`, when present, belongs to the currently-active
/// access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserToken {
    pub id: String,
    pub platform: String,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub token_expiry: Option<i64>, // Unix timestamp
}

impl UserToken {
    /// Composite id joining the CRM-side user id with the platform name.
    pub fn composite_id(platform: &str, platform_user_id: &str) -> String {
        format!("{}-{}", platform_user_id, platform)
    }

    /// Whether both tokens are present.
    pub fn has_credentials(&self) -> bool {
        self.access_token.is_some() && self.refresh_token.is_some()
    }

    /// Pure expiry check against an explicit clock: true iff
    /// `token_expiry - buffer <= now`. A record without a recorded expiry
    /// counts as expired.
    pub fn is_expired_at(&self, now: i64, buffer_seconds: i64) -> bool {
        match self.token_expiry {
            Some(expiry) => expiry - buffer_seconds <= now,
            None => true,
        }
    }

    /// Whether the access token needs a proactive refresh, using the fixed
    /// two-minute buffer. Callers must not substitute their own buffer.
    pub fn needs_refresh(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp(), REFRESH_BUFFER_SECONDS)
    }
}
