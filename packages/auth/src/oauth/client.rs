// ABOUTME: Stateless OAuth client handle built from static provider configuration
// ABOUTME: Performs refresh and authorization-code grants against the token endpoint

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use tracing::{debug, error};
use url::Url;

use crate::error::{AuthError, AuthResult};
use crate::oauth::types::{OAuthClientConfig, RefreshedTokens, TokenResponse};

/// Capability to trade the current tokens for fresh ones.
///
/// The coordinator is generic over this seam so tests can script provider
/// behavior without a network.
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    async fn refresh_access_token(
        &self,
        access_token: &str,
        refresh_token: &str,
    ) -> AuthResult<RefreshedTokens>;
}

/// Stateless OAuth client handle. Cheap to build, safe to rebuild per call,
/// no side effects at construction.
pub struct OAuthClient {
    config: OAuthClientConfig,
    http: Client,
}

impl OAuthClient {
    /// Build a handle from static provider configuration. No validation;
    /// missing or malformed endpoints surface when the handle is used.
    pub fn new(config: OAuthClientConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    pub fn config(&self) -> &OAuthClientConfig {
        &self.config
    }

    fn access_token_uri(&self) -> AuthResult<&str> {
        self.config
            .access_token_uri
            .as_deref()
            .ok_or_else(|| AuthError::Configuration("access_token_uri is not set".to_string()))
    }

    /// Build the consent URL for the initial authorization redirect.
    pub fn authorize_url(&self, state: &str) -> AuthResult<String> {
        let authorization_uri = self
            .config
            .authorization_uri
            .as_deref()
            .ok_or_else(|| AuthError::Configuration("authorization_uri is not set".to_string()))?;

        let mut url = Url::parse(authorization_uri)
            .map_err(|e| AuthError::Configuration(format!("Invalid authorization URI: {}", e)))?;

        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("client_id", &self.config.client_id)
                .append_pair("response_type", "code")
                .append_pair("state", state);
            if let Some(redirect_uri) = &self.config.redirect_uri {
                pairs.append_pair("redirect_uri", redirect_uri);
            }
            if let Some(scopes) = &self.config.scopes {
                pairs.append_pair("scope", &scopes.join(" "));
            }
        }

        Ok(url.to_string())
    }

    /// Exchange an authorization code for the initial token set.
    pub async fn exchange_authorization_code(&self, code: &str) -> AuthResult<RefreshedTokens> {
        let token_uri = self.access_token_uri()?.to_string();
        debug!("Exchanging authorization code via {}", token_uri);

        let mut form = vec![
            ("grant_type", "authorization_code".to_string()),
            ("code", code.to_string()),
        ];
        if let Some(redirect_uri) = &self.config.redirect_uri {
            form.push(("redirect_uri", redirect_uri.clone()));
        }

        let response = self
            .http
            .post(&token_uri)
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            // Only log the status - response bodies can echo credentials
            error!("Token exchange failed with status {}", status);
            return Err(AuthError::TokenExchange(format!(
                "Token exchange failed with status {}",
                status
            )));
        }

        let token_response: TokenResponse = response.json().await.map_err(|e| {
            AuthError::TokenExchange(format!("Failed to parse token response: {}", e))
        })?;

        let refresh_token = token_response.refresh_token.ok_or_else(|| {
            AuthError::TokenExchange("Provider returned no refresh token".to_string())
        })?;

        Ok(RefreshedTokens {
            access_token: token_response.access_token,
            refresh_token,
            expires_at: Utc::now().timestamp() + token_response.expires_in,
        })
    }
}

#[async_trait]
impl TokenRefresher for OAuthClient {
    async fn refresh_access_token(
        &self,
        _access_token: &str,
        refresh_token: &str,
    ) -> AuthResult<RefreshedTokens> {
        let token_uri = self.access_token_uri()?.to_string();
        debug!("Refreshing access token via {}", token_uri);

        let response = self
            .http
            .post(&token_uri)
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            // Only log the status - response bodies can echo credentials
            error!("Token refresh failed with status {}", status);
            return Err(AuthError::RefreshFailed(format!(
                "Token refresh failed with status {}",
                status
            )));
        }

        let token_response: TokenResponse = response.json().await.map_err(|e| {
            AuthError::RefreshFailed(format!("Failed to parse token response: {}", e))
        })?;

        Ok(RefreshedTokens {
            access_token: token_response.access_token,
            // Providers that do not rotate refresh tokens omit the field;
            // carry the old one forward
            refresh_token: token_response
                .refresh_token
                .unwrap_or_else(|| refresh_token.to_string()),
            expires_at: Utc::now().timestamp() + token_response.expires_in,
        })
    }
}
