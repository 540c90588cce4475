//! Auth provider implementation
//!
//! Produces request headers for the configured authentication mode and
//! manages token refresh for the token-based modes. The whole header
//! computation runs under one lock, so only one refresh is ever in flight;
//! concurrent callers wait for its result.

use super::types::{
    AuthConfig, CachedToken, TokenState, DEFAULT_EXPIRES_IN_SECS, STATIC_TOKEN_LIFETIME_SECS,
};
use crate::error::{Error, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info};

/// Timeout for the best-effort connectivity probe in [`AuthProvider::validate`]
const VALIDATE_TIMEOUT: Duration = Duration::from_secs(10);

/// Dependency-injected authentication provider
pub struct AuthProvider {
    /// Auth configuration, fixed at construction
    config: AuthConfig,
    /// Upstream base URL (unversioned), used for the token endpoint and probe
    base_url: String,
    /// Mutable token state, single-flight guarded
    state: tokio::sync::Mutex<TokenState>,
    /// HTTP client for token requests and probes
    http: Client,
    /// User agent sent with every request
    user_agent: String,
}

impl AuthProvider {
    /// Create a new provider with its own HTTP client
    pub fn new(config: AuthConfig, base_url: impl Into<String>) -> Self {
        Self::with_client(config, base_url, Client::new())
    }

    /// Create a provider sharing an existing HTTP client
    pub fn with_client(config: AuthConfig, base_url: impl Into<String>, http: Client) -> Self {
        let refresh_token = match &config {
            AuthConfig::OAuth2 { refresh_token, .. } if !refresh_token.is_empty() => {
                Some(refresh_token.clone())
            }
            _ => None,
        };

        Self {
            config,
            base_url: base_url.into(),
            state: tokio::sync::Mutex::new(TokenState {
                access: None,
                refresh_token,
            }),
            http,
            user_agent: format!("weathergate/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Get the current auth config
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Generate authentication headers for an API request.
    ///
    /// Token-based modes refresh on demand when the cached token is missing,
    /// empty, or inside the 5-minute expiry buffer.
    pub async fn get_headers(&self) -> Result<HashMap<String, String>> {
        let mut state = self.state.lock().await;
        let mut headers = self.base_headers();

        match &self.config {
            AuthConfig::ApiKey { key, header_name } => {
                if key.is_empty() {
                    return Err(Error::config(
                        "API key not configured. Set the API_KEY environment variable.",
                    ));
                }
                headers.insert(header_name.clone(), key.clone());
            }

            AuthConfig::Bearer { token } => {
                let access = match state.access.as_ref().filter(|t| t.is_valid()) {
                    Some(cached) => cached.token.clone(),
                    None => {
                        if token.is_empty() {
                            return Err(Error::config(
                                "Bearer token not configured. Set the BEARER_TOKEN environment variable.",
                            ));
                        }
                        // Not a real refresh flow: the token is re-read from
                        // static configuration and given a far-future expiry.
                        let cached = CachedToken::expires_in(
                            token.clone(),
                            STATIC_TOKEN_LIFETIME_SECS,
                        );
                        let value = cached.token.clone();
                        state.access = Some(cached);
                        value
                    }
                };
                headers.insert("Authorization".to_string(), format!("Bearer {access}"));
            }

            AuthConfig::OAuth2 { .. } => {
                let access = match state.access.as_ref().filter(|t| t.is_valid()) {
                    Some(cached) => cached.token.clone(),
                    None => self.refresh_oauth2_token(&mut state).await?,
                };
                headers.insert("Authorization".to_string(), format!("Bearer {access}"));
            }

            AuthConfig::Basic { username, password } => {
                if username.is_empty() || password.is_empty() {
                    return Err(Error::config(
                        "Username and password not configured. Set the USERNAME and PASSWORD environment variables.",
                    ));
                }
                let encoded = BASE64.encode(format!("{username}:{password}"));
                headers.insert("Authorization".to_string(), format!("Basic {encoded}"));
            }
        }

        Ok(headers)
    }

    /// Perform a refresh-token grant against `<base_url>/oauth/token`.
    ///
    /// Single attempt; any failure is surfaced immediately without retry.
    async fn refresh_oauth2_token(&self, state: &mut TokenState) -> Result<String> {
        let AuthConfig::OAuth2 {
            client_id,
            client_secret,
            ..
        } = &self.config
        else {
            return Err(Error::auth("Token refresh requires oauth2 mode"));
        };

        let refresh_token = state
            .refresh_token
            .clone()
            .ok_or_else(|| Error::auth("No refresh token available. Re-authenticate."))?;

        let token_url = format!("{}/oauth/token", self.base_url.trim_end_matches('/'));
        let form = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token.as_str()),
            ("client_id", client_id.as_str()),
            ("client_secret", client_secret.as_str()),
        ];

        debug!("refreshing oauth2 token via {token_url}");
        let response = self
            .http
            .post(&token_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| Error::auth(format!("Network error during token refresh: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::TokenRefresh {
                status: status.as_u16(),
                body,
            });
        }

        let token_response: TokenResponse = response.json().await.map_err(Error::Http)?;
        let cached = CachedToken::expires_in(
            token_response.access_token,
            token_response.expires_in.unwrap_or(DEFAULT_EXPIRES_IN_SECS),
        );
        let value = cached.token.clone();
        state.access = Some(cached);

        // Rotate the refresh token when the server supplies a new one
        if let Some(new_refresh) = token_response.refresh_token {
            state.refresh_token = Some(new_refresh);
        }

        info!("oauth2 token refreshed");
        Ok(value)
    }

    /// Best-effort connectivity probe using the current headers.
    ///
    /// Never errors; any failure reduces to `false`.
    pub async fn validate(&self) -> bool {
        let headers = match self.get_headers().await {
            Ok(h) => h,
            Err(e) => {
                debug!("auth validation failed: {e}");
                return false;
            }
        };

        let mut req = self.http.get(&self.base_url).timeout(VALIDATE_TIMEOUT);
        for (key, value) in &headers {
            req = req.header(key.as_str(), value.as_str());
        }

        match req.send().await {
            Ok(response) => response.status().as_u16() < 400,
            Err(e) => {
                debug!("auth validation request failed: {e}");
                false
            }
        }
    }

    /// Non-secret diagnostic info for the configured mode
    pub async fn describe(&self) -> Value {
        let state = self.state.lock().await;
        let token_valid = state.access.as_ref().is_some_and(CachedToken::is_valid);
        let expires_at = state
            .access
            .as_ref()
            .map(|t| t.expires_at.to_rfc3339());

        match &self.config {
            AuthConfig::ApiKey { key, header_name } => json!({
                "auth_type": "api_key",
                "api_base_url": self.base_url,
                "api_key_configured": !key.is_empty(),
                "api_key_header": header_name,
            }),
            AuthConfig::Bearer { token } => json!({
                "auth_type": "bearer",
                "api_base_url": self.base_url,
                "token_configured": !token.is_empty(),
                "token_valid": token_valid,
                "expires_at": expires_at,
            }),
            AuthConfig::OAuth2 {
                client_id,
                redirect_uri,
                ..
            } => json!({
                "auth_type": "oauth2",
                "api_base_url": self.base_url,
                "access_token_configured": state.access.is_some(),
                "refresh_token_configured": state.refresh_token.is_some(),
                "token_valid": token_valid,
                "expires_at": expires_at,
                "client_id": truncate_id(client_id),
                "redirect_uri": redirect_uri,
            }),
            AuthConfig::Basic { username, password } => json!({
                "auth_type": "basic",
                "api_base_url": self.base_url,
                "username_configured": !username.is_empty(),
                "password_configured": !password.is_empty(),
            }),
        }
    }

    /// Headers common to every mode
    fn base_headers(&self) -> HashMap<String, String> {
        let mut headers = HashMap::new();
        headers.insert(
            "Content-Type".to_string(),
            "application/json".to_string(),
        );
        headers.insert("User-Agent".to_string(), self.user_agent.clone());
        headers
    }

    /// Clear cached token state (useful for testing or forced refresh)
    pub async fn clear_cache(&self) {
        let mut state = self.state.lock().await;
        state.access = None;
    }
}

impl std::fmt::Debug for AuthProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthProvider")
            .field("auth_type", &self.config.label())
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// OAuth2 token response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    #[allow(dead_code)]
    token_type: Option<String>,
}

/// Truncate a client id to its first 8 characters for diagnostics
fn truncate_id(id: &str) -> Option<String> {
    if id.is_empty() {
        None
    } else {
        Some(format!("{}...", id.chars().take(8).collect::<String>()))
    }
}
