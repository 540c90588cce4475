//! # weathergate
//!
//! A thin, resilient proxy client for a weather REST API. The core is the
//! HTTP client layer: pluggable authentication, process-local rate limiting,
//! and retry with exponential backoff wrapping outbound REST calls. On top of
//! it sit a typed weather service and a structured tool-result boundary that
//! never lets an error escape as a fault.
//!
//! ## Features
//!
//! - **Pluggable Auth**: API key, bearer token, OAuth2 refresh grant, basic
//! - **Rate Limiting**: sliding-window admission per `(max_requests, window)`
//! - **Transport Retries**: exponential backoff; HTTP error statuses are
//!   definitive and never retried
//! - **Typed Weather Operations**: current conditions, forecast, city search
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use weathergate::{ApiClient, Config, Result, WeatherService};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::from_env()?;
//!     config.validate()?;
//!
//!     let client = Arc::new(ApiClient::from_config(&config));
//!     let service = WeatherService::new(Arc::clone(&client), config.api.api_key.clone());
//!
//!     let weather = service.current_weather("London", "metric").await?;
//!     println!("{} {}°", weather.city, weather.temperature);
//!
//!     client.close().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       Tool Boundary                          │
//! │  current_weather    forecast    search_cities    api_status  │
//! └──────────────────────────────────────────────────────────────┘
//!                               │
//! ┌───────────────┬─────────────┴──────────────┬────────────────┐
//! │ WeatherService│          ApiClient         │  AuthProvider  │
//! ├───────────────┼────────────────────────────┼────────────────┤
//! │ /weather      │ rate gate → auth headers → │ API Key        │
//! │ /forecast     │ retry loop → normalize     │ Bearer         │
//! │ /find         │ health_check / close       │ OAuth2 / Basic │
//! └───────────────┴────────────────────────────┴────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the crate
pub mod error;

/// Environment-sourced configuration
pub mod config;

/// Authentication implementations
pub mod auth;

/// HTTP client with retry and rate limiting
pub mod http;

/// Typed weather API operations
pub mod weather;

/// Tool-result boundary
pub mod tools;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use auth::{AuthConfig, AuthProvider};
pub use config::Config;
pub use error::{Error, Result};
pub use http::{ApiClient, ClientConfig, RequestOptions};
pub use weather::WeatherService;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
