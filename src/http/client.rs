//! HTTP client with retry and rate limiting
//!
//! Issues authenticated, rate-limited, retried calls against the upstream
//! API and normalizes responses. Retries apply to transport-level failures
//! only; an HTTP error status is a definitive rejection and is surfaced
//! immediately.

use super::rate_limit::RateLimiter;
use crate::auth::AuthProvider;
use crate::config::{Config, RateLimitConfig};
use crate::error::{Error, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, Response};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Health probe candidates, tried in order
const HEALTH_ENDPOINTS: [&str; 4] = ["/health", "/status", "/ping", "/"];

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL for all requests (version-qualified)
    pub base_url: String,
    /// Per-request socket timeout
    pub timeout: Duration,
    /// Maximum number of retries after the initial attempt
    pub max_retries: u32,
    /// Backoff base: delay is `initial_backoff * 2^attempt`
    pub initial_backoff: Duration,
    /// Rate limiter settings, `None` disables rate gating
    pub rate_limit: Option<RateLimitConfig>,
    /// User agent string
    pub user_agent: String,
}

impl ClientConfig {
    /// Create a config with defaults: 30 s timeout, 3 retries,
    /// 1 s exponential backoff base, rate limiting enabled
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(30),
            max_retries: 3,
            initial_backoff: Duration::from_secs(1),
            rate_limit: Some(RateLimitConfig::default()),
            user_agent: format!("weathergate/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Set the request timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set max retries
    #[must_use]
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the backoff base delay
    #[must_use]
    pub fn initial_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff = backoff;
        self
    }

    /// Set rate limiter settings
    #[must_use]
    pub fn rate_limit(mut self, config: RateLimitConfig) -> Self {
        self.rate_limit = Some(config);
        self
    }

    /// Disable rate limiting
    #[must_use]
    pub fn no_rate_limit(mut self) -> Self {
        self.rate_limit = None;
        self
    }
}

/// Options for a single request
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Query parameters
    pub query: HashMap<String, String>,
    /// Extra headers; these win over auth headers on key collision
    pub headers: HashMap<String, String>,
    /// JSON body
    pub body: Option<Value>,
}

impl RequestOptions {
    /// Create empty request options
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set JSON body
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// HTTP client for the upstream REST API
pub struct ApiClient {
    config: ClientConfig,
    auth: Arc<AuthProvider>,
    rate_limiter: Option<RateLimiter>,
    /// Lazily created session, acquire-or-create under the lock. The lock is
    /// held only while checking/creating the handle, never across a request.
    session: tokio::sync::Mutex<Option<Client>>,
}

impl ApiClient {
    /// Create a new client with an injected auth provider
    pub fn new(config: ClientConfig, auth: Arc<AuthProvider>) -> Self {
        let rate_limiter = config.rate_limit.map(RateLimiter::new);
        Self {
            config,
            auth,
            rate_limiter,
            session: tokio::sync::Mutex::new(None),
        }
    }

    /// Compose a client from process configuration.
    ///
    /// Requests go to the version-qualified URL; the auth provider keeps the
    /// unversioned base for its token endpoint and connectivity probe.
    pub fn from_config(config: &Config) -> Self {
        let auth = Arc::new(AuthProvider::new(
            config.auth_config(),
            config.api.base_url.clone(),
        ));
        let client_config = ClientConfig::new(config.api.full_api_url())
            .timeout(config.api.timeout)
            .rate_limit(config.rate_limit);
        Self::new(client_config, auth)
    }

    /// The auth provider backing this client
    pub fn auth(&self) -> &Arc<AuthProvider> {
        &self.auth
    }

    /// Make a GET request
    pub async fn get(&self, endpoint: &str, opts: RequestOptions) -> Result<Value> {
        self.request(Method::GET, endpoint, opts).await
    }

    /// Make a POST request
    pub async fn post(&self, endpoint: &str, opts: RequestOptions) -> Result<Value> {
        self.request(Method::POST, endpoint, opts).await
    }

    /// Make a PUT request
    pub async fn put(&self, endpoint: &str, opts: RequestOptions) -> Result<Value> {
        self.request(Method::PUT, endpoint, opts).await
    }

    /// Make a PATCH request
    pub async fn patch(&self, endpoint: &str, opts: RequestOptions) -> Result<Value> {
        self.request(Method::PATCH, endpoint, opts).await
    }

    /// Make a DELETE request
    pub async fn delete(&self, endpoint: &str, opts: RequestOptions) -> Result<Value> {
        self.request(Method::DELETE, endpoint, opts).await
    }

    /// Issue one rate-gated, authenticated request with transport retries
    async fn request(
        &self,
        method: Method,
        endpoint: &str,
        opts: RequestOptions,
    ) -> Result<Value> {
        if let Some(ref limiter) = self.rate_limiter {
            limiter.acquire().await;
        }

        let url = self.build_url(endpoint);

        // Caller-supplied headers win on key collision
        let mut headers = self.auth.get_headers().await?;
        headers.extend(opts.headers.clone());

        debug!("{method} {url}");

        let attempts = self.config.max_retries + 1;
        for attempt in 0..attempts {
            let session = self.session().await?;

            let mut req = session.request(method.clone(), &url);
            for (key, value) in &headers {
                req = req.header(key.as_str(), value.as_str());
            }
            if !opts.query.is_empty() {
                req = req.query(&opts.query);
            }
            if let Some(ref body) = opts.body {
                req = req.json(body);
            }

            match req.send().await {
                Ok(response) => return self.parse_response(response).await,
                Err(e) => {
                    // Transport failure (connect error, timeout). HTTP error
                    // statuses never reach this arm.
                    if attempt + 1 == attempts {
                        return Err(Error::Connection {
                            attempts,
                            source: e,
                        });
                    }
                    let delay = self.config.initial_backoff * 2u32.saturating_pow(attempt);
                    warn!(
                        "request failed (attempt {}/{attempts}), retrying in {delay:?}: {e}",
                        attempt + 1
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }

        Err(Error::Other("retry loop exhausted".to_string()))
    }

    /// Normalize a response: status >= 400 is a terminal API error; JSON
    /// bodies parse as structured data; anything else is wrapped with its
    /// content type.
    async fn parse_response(&self, response: Response) -> Result<Value> {
        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        if status.as_u16() >= 400 {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        if content_type.contains("application/json") {
            let value = response.json().await.map_err(Error::Http)?;
            Ok(value)
        } else {
            let text = response.text().await.map_err(Error::Http)?;
            Ok(json!({
                "content": text,
                "content_type": content_type,
            }))
        }
    }

    /// Check whether the API is accessible.
    ///
    /// Tries well-known health endpoints in order. A 404 means "try the next
    /// candidate"; any other failure is an immediate `false`. When every
    /// candidate 404s the API is answering authenticated requests but exposes
    /// no health endpoint, which is deliberately treated as healthy.
    pub async fn health_check(&self) -> bool {
        for endpoint in HEALTH_ENDPOINTS {
            match self.get(endpoint, RequestOptions::new()).await {
                Ok(_) => {
                    debug!("health check passed: {endpoint}");
                    return true;
                }
                Err(Error::Api { status: 404, .. }) => continue,
                Err(e) => {
                    debug!("health check failed at {endpoint}: {e}");
                    return false;
                }
            }
        }

        debug!("no health endpoint found, but authentication is working");
        true
    }

    /// API client information and capabilities
    pub async fn api_info(&self) -> Value {
        let mut rate_limiting = json!({ "enabled": self.rate_limiter.is_some() });
        if let Some(ref limiter) = self.rate_limiter {
            rate_limiting["max_requests"] = json!(limiter.max_requests());
            rate_limiting["window_secs"] = json!(limiter.window().as_secs());
        }

        json!({
            "base_url": self.config.base_url,
            "timeout_secs": self.config.timeout.as_secs(),
            "auth_type": self.auth.config().label(),
            "rate_limiting": rate_limiting,
            "client_info": {
                "user_agent": self.config.user_agent,
                "session_active": self.session.lock().await.is_some(),
            },
        })
    }

    /// Close the session. Idempotent; a later request recreates it.
    pub async fn close(&self) {
        let mut session = self.session.lock().await;
        *session = None;
    }

    /// Get or lazily create the session handle
    async fn session(&self) -> Result<Client> {
        let mut guard = self.session.lock().await;
        match guard.as_ref() {
            Some(client) => Ok(client.clone()),
            None => {
                let client = Client::builder()
                    .timeout(self.config.timeout)
                    .user_agent(&self.config.user_agent)
                    .build()
                    .map_err(Error::Http)?;
                *guard = Some(client.clone());
                Ok(client)
            }
        }
    }

    /// Join the base URL and an endpoint path with single-slash normalization
    fn build_url(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            return endpoint.to_string();
        }
        let base = self.config.base_url.trim_end_matches('/');
        let path = endpoint.trim_start_matches('/');
        format!("{base}/{path}")
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &self.config)
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}
