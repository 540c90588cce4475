//! HTTP client module
//!
//! Provides the upstream API client with retry, rate limiting, and response
//! normalization.
//!
//! # Features
//!
//! - **Transport Retries**: exponential backoff, HTTP statuses never retried
//! - **Rate Limiting**: sliding-window timestamp log
//! - **Authentication**: headers injected from the auth module
//! - **Session Reuse**: lazily created, explicitly closeable session handle

mod client;
mod rate_limit;

pub use client::{ApiClient, ClientConfig, RequestOptions};
pub use rate_limit::RateLimiter;

#[cfg(test)]
mod tests;
