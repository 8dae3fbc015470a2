// ABOUTME: Configuration and wire types for the OAuth client
// ABOUTME: Provider-agnostic request/response shapes for token grants

use serde::{Deserialize, Serialize};

/// Static provider configuration supplied by the caller; never persisted by
/// this subsystem.
///
/// Optional endpoints are passed through unset: the factory performs no
/// defaulting and no validation, so a malformed config only surfaces when
/// the handle is later used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OAuthClientConfig {
    pub client_id: String,
    pub client_secret: String,
    pub access_token_uri: Option<String>,
    pub authorization_uri: Option<String>,
    pub redirect_uri: Option<String>,
    pub scopes: Option<Vec<String>>,
}

/// Token grant response from a provider endpoint.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: i64, // Seconds
    pub token_type: Option<String>,
    pub scope: Option<String>,
}

/// Result of a completed grant, with the expiry already made absolute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshedTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: i64, // Unix timestamp
}
