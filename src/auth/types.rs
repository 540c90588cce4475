//! Auth configuration types
//!
//! These types represent the runtime auth configuration selected once at
//! construction from [`crate::config::Config`].

use chrono::{DateTime, Duration as ChronoDuration, Utc};

/// Safety buffer subtracted from a token's expiry when checking validity
pub const EXPIRY_BUFFER_SECS: i64 = 5 * 60;

/// Lifetime assigned to a statically configured bearer token
pub const STATIC_TOKEN_LIFETIME_SECS: i64 = 365 * 24 * 3600;

/// Default lifetime when a token response omits `expires_in`
pub const DEFAULT_EXPIRES_IN_SECS: i64 = 3600;

/// Authentication configuration, one variant per mode
#[derive(Debug, Clone)]
pub enum AuthConfig {
    /// Static API key placed in a configurable header
    ApiKey {
        /// The API key value
        key: String,
        /// Header name carrying the key
        header_name: String,
    },

    /// Statically configured bearer token
    Bearer {
        /// The bearer token
        token: String,
    },

    /// OAuth2 refresh-token grant against `<base_url>/oauth/token`
    OAuth2 {
        /// Client ID
        client_id: String,
        /// Client secret
        client_secret: String,
        /// Initial refresh token (rotated when the server supplies a new one)
        refresh_token: String,
        /// Requested scope
        scope: String,
        /// Redirect URI registered with the authorization server
        redirect_uri: String,
    },

    /// HTTP Basic authentication
    Basic {
        /// Username
        username: String,
        /// Password
        password: String,
    },
}

impl AuthConfig {
    /// Human-readable mode label for diagnostics
    pub fn label(&self) -> &'static str {
        match self {
            Self::ApiKey { .. } => "api_key",
            Self::Bearer { .. } => "bearer",
            Self::OAuth2 { .. } => "oauth2",
            Self::Basic { .. } => "basic",
        }
    }
}

/// Cached access token with expiry
#[derive(Debug, Clone)]
pub struct CachedToken {
    /// The access token
    pub token: String,
    /// When the token expires
    pub expires_at: DateTime<Utc>,
}

impl CachedToken {
    /// Create a token that expires `seconds` from now
    pub fn expires_in(token: String, seconds: i64) -> Self {
        Self {
            token,
            expires_at: Utc::now() + ChronoDuration::seconds(seconds),
        }
    }

    /// Valid means non-empty and not within the expiry safety buffer
    pub fn is_valid(&self) -> bool {
        if self.token.is_empty() {
            return false;
        }
        Utc::now() < self.expires_at - ChronoDuration::seconds(EXPIRY_BUFFER_SECS)
    }
}

/// Mutable token state for the token-based modes, guarded by the provider's
/// single-flight lock
#[derive(Debug, Default)]
pub struct TokenState {
    /// Cached access token, refreshed on demand
    pub access: Option<CachedToken>,
    /// Current refresh token (oauth2 mode)
    pub refresh_token: Option<String>,
}
