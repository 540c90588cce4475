//! Environment-sourced configuration
//!
//! All settings come from environment variables at process start. Tests use
//! [`Config::from_vars`] with an explicit map so they never have to mutate
//! the process environment.

use crate::auth::AuthConfig;
use crate::error::{Error, Result};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

/// Authentication mode, selected once at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthType {
    /// Static API key in a configurable header
    #[default]
    ApiKey,
    /// Statically configured bearer token
    Bearer,
    /// OAuth2 refresh-token grant
    OAuth2,
    /// HTTP basic authentication
    Basic,
}

impl AuthType {
    fn parse(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "api_key" | "apikey" | "api-key" => Ok(Self::ApiKey),
            "bearer" | "bearer_token" => Ok(Self::Bearer),
            "oauth2" | "oauth" => Ok(Self::OAuth2),
            "basic" | "basic_auth" => Ok(Self::Basic),
            other => Err(Error::InvalidEnvValue {
                var: "AUTH_TYPE".to_string(),
                message: format!("unknown auth type '{other}'"),
            }),
        }
    }

    /// Human-readable label for diagnostics
    pub fn label(self) -> &'static str {
        match self {
            Self::ApiKey => "api_key",
            Self::Bearer => "bearer",
            Self::OAuth2 => "oauth2",
            Self::Basic => "basic",
        }
    }
}

/// Upstream API connection and credential settings
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL for the upstream API (required)
    pub base_url: String,
    /// API version segment appended to the base URL ("none" disables)
    pub version: String,
    /// Per-request socket timeout
    pub timeout: Duration,
    /// Selected authentication mode
    pub auth_type: AuthType,
    /// API key (api_key mode)
    pub api_key: String,
    /// Header name carrying the API key
    pub api_key_header: String,
    /// Statically configured bearer token (bearer mode)
    pub bearer_token: String,
    /// OAuth2 client id
    pub client_id: String,
    /// OAuth2 client secret
    pub client_secret: String,
    /// OAuth2 refresh token
    pub refresh_token: String,
    /// OAuth2 scope
    pub oauth_scope: String,
    /// OAuth2 redirect URI
    pub oauth_redirect_uri: String,
    /// Username (basic mode)
    pub username: String,
    /// Password (basic mode)
    pub password: String,
}

impl ApiConfig {
    /// Base URL joined with the version segment, single-slash normalized
    pub fn full_api_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        if self.version.is_empty() || self.version.eq_ignore_ascii_case("none") {
            base.to_string()
        } else {
            format!("{base}/{}", self.version.trim_matches('/'))
        }
    }
}

/// Rate limiting settings
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    /// Maximum requests admitted per window
    pub max_requests: u32,
    /// Rolling window length
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 100,
            window: Duration::from_secs(3600),
        }
    }
}

/// Complete process configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Upstream API settings
    pub api: ApiConfig,
    /// Rate limiter settings
    pub rate_limit: RateLimitConfig,
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        let vars: HashMap<String, String> = std::env::vars().collect();
        Self::from_vars(&vars)
    }

    /// Build configuration from an explicit variable map
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self> {
        let get = |key: &str| -> Option<String> {
            vars.get(key).map(String::as_str).and_then(|v| {
                if v.is_empty() {
                    None
                } else {
                    Some(v.to_string())
                }
            })
        };

        let base_url = get("API_BASE_URL").ok_or_else(|| Error::missing_env("API_BASE_URL"))?;

        let timeout_secs = parse_var(vars, "API_TIMEOUT", 30u64)?;
        let auth_type = match get("AUTH_TYPE") {
            Some(v) => AuthType::parse(&v)?,
            None => AuthType::default(),
        };

        let api = ApiConfig {
            base_url,
            version: get("API_VERSION").unwrap_or_else(|| "v1".to_string()),
            timeout: Duration::from_secs(timeout_secs),
            auth_type,
            api_key: get("API_KEY").unwrap_or_default(),
            api_key_header: get("API_KEY_HEADER").unwrap_or_else(|| "X-API-Key".to_string()),
            bearer_token: get("BEARER_TOKEN").unwrap_or_default(),
            client_id: get("CLIENT_ID").unwrap_or_default(),
            client_secret: get("CLIENT_SECRET").unwrap_or_default(),
            refresh_token: get("REFRESH_TOKEN").unwrap_or_default(),
            oauth_scope: get("OAUTH_SCOPE").unwrap_or_else(|| "read,write".to_string()),
            oauth_redirect_uri: get("OAUTH_REDIRECT_URI")
                .unwrap_or_else(|| "http://localhost:8080/callback".to_string()),
            username: get("USERNAME").unwrap_or_default(),
            password: get("PASSWORD").unwrap_or_default(),
        };

        let rate_limit = RateLimitConfig {
            max_requests: parse_var(vars, "RATE_LIMIT_REQUESTS", 100u32)?,
            window: Duration::from_secs(parse_var(vars, "RATE_LIMIT_WINDOW", 3600u64)?),
        };

        Ok(Self { api, rate_limit })
    }

    /// Validate that every variable required by the selected auth mode is set
    pub fn validate(&self) -> Result<()> {
        let mut missing = Vec::new();

        match self.api.auth_type {
            AuthType::ApiKey => {
                if self.api.api_key.is_empty() {
                    missing.push("API_KEY");
                }
            }
            AuthType::Bearer => {
                if self.api.bearer_token.is_empty() {
                    missing.push("BEARER_TOKEN");
                }
            }
            AuthType::OAuth2 => {
                if self.api.client_id.is_empty() {
                    missing.push("CLIENT_ID");
                }
                if self.api.client_secret.is_empty() {
                    missing.push("CLIENT_SECRET");
                }
                if self.api.refresh_token.is_empty() {
                    missing.push("REFRESH_TOKEN");
                }
            }
            AuthType::Basic => {
                if self.api.username.is_empty() {
                    missing.push("USERNAME");
                }
                if self.api.password.is_empty() {
                    missing.push("PASSWORD");
                }
            }
        }

        if !missing.is_empty() {
            return Err(Error::config(format!(
                "Missing required environment variables: {}",
                missing.join(", ")
            )));
        }

        Url::parse(&self.api.base_url)?;
        Ok(())
    }

    /// Build the auth configuration variant for the selected mode
    pub fn auth_config(&self) -> AuthConfig {
        match self.api.auth_type {
            AuthType::ApiKey => AuthConfig::ApiKey {
                key: self.api.api_key.clone(),
                header_name: self.api.api_key_header.clone(),
            },
            AuthType::Bearer => AuthConfig::Bearer {
                token: self.api.bearer_token.clone(),
            },
            AuthType::OAuth2 => AuthConfig::OAuth2 {
                client_id: self.api.client_id.clone(),
                client_secret: self.api.client_secret.clone(),
                refresh_token: self.api.refresh_token.clone(),
                scope: self.api.oauth_scope.clone(),
                redirect_uri: self.api.oauth_redirect_uri.clone(),
            },
            AuthType::Basic => AuthConfig::Basic {
                username: self.api.username.clone(),
                password: self.api.password.clone(),
            },
        }
    }

    /// Non-secret configuration summary for diagnostics
    pub fn debug_info(&self) -> Value {
        json!({
            "api_base_url": self.api.base_url,
            "api_version": self.api.version,
            "timeout_secs": self.api.timeout.as_secs(),
            "auth_type": self.api.auth_type.label(),
            "oauth_redirect_uri": self.api.oauth_redirect_uri,
            "rate_limit": format!(
                "{} requests per {}s",
                self.rate_limit.max_requests,
                self.rate_limit.window.as_secs()
            ),
        })
    }
}

fn parse_var<T: std::str::FromStr>(
    vars: &HashMap<String, String>,
    var: &str,
    default: T,
) -> Result<T> {
    match vars.get(var).filter(|v| !v.is_empty()) {
        Some(raw) => raw.parse().map_err(|_| Error::InvalidEnvValue {
            var: var.to_string(),
            message: format!("could not parse '{raw}'"),
        }),
        None => Ok(default),
    }
}
