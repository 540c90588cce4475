//! Authentication module
//!
//! Supports: API Key, Bearer, OAuth2 (refresh-token grant), Basic
//!
//! The [`AuthProvider`] generates request headers for the configured mode
//! and caches tokens for the modes that require refresh.

mod provider;
mod types;

pub use provider::AuthProvider;
pub use types::{AuthConfig, CachedToken, TokenState};
