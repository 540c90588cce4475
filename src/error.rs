//! Error types for weathergate
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for weathergate
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors (fatal, never retried)
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required environment variable: {var}")]
    MissingEnv { var: String },

    #[error("Invalid value for '{var}': {message}")]
    InvalidEnvValue { var: String, message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Authentication Errors (surfaced, never retried by the client layer)
    // ============================================================================
    #[error("Authentication failed: {message}")]
    Auth { message: String },

    #[error("Token refresh failed with status {status}: {body}")]
    TokenRefresh { status: u16, body: String },

    // ============================================================================
    // API Errors (HTTP status >= 400, definitive rejection, never retried)
    // ============================================================================
    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    // ============================================================================
    // Transport Errors
    // ============================================================================
    #[error("Request failed after {attempts} attempts: {source}")]
    Connection {
        attempts: u32,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing environment variable error
    pub fn missing_env(var: impl Into<String>) -> Self {
        Self::MissingEnv { var: var.into() }
    }

    /// Create an auth error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Create an API status error
    pub fn api(status: u16, body: impl Into<String>) -> Self {
        Self::Api {
            status,
            body: body.into(),
        }
    }

    /// HTTP status carried by this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } | Error::TokenRefresh { status, .. } => Some(*status),
            _ => None,
        }
    }

}

/// Result type alias for weathergate
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::missing_env("API_KEY");
        assert_eq!(
            err.to_string(),
            "Missing required environment variable: API_KEY"
        );

        let err = Error::api(404, "Not found");
        assert_eq!(err.to_string(), "API error 404: Not found");
    }

    #[test]
    fn test_status() {
        assert_eq!(Error::api(500, "boom").status(), Some(500));
        assert_eq!(
            Error::TokenRefresh {
                status: 401,
                body: "denied".into()
            }
            .status(),
            Some(401)
        );
        assert_eq!(Error::config("x").status(), None);
    }
}
