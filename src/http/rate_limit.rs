//! Rate limiting implementation
//!
//! Sliding-window rate limiter over a timestamp log. Admission is bounded to
//! `max_requests` per trailing `window`, observed per limiter instance; there
//! is no cross-process coordination.

use crate::config::RateLimitConfig;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

/// Sliding-window rate limiter
#[derive(Clone)]
pub struct RateLimiter {
    max_requests: usize,
    window: Duration,
    timestamps: Arc<Mutex<Vec<Instant>>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the given config
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            max_requests: config.max_requests.max(1) as usize,
            window: config.window,
            timestamps: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Wait until a request slot is available, then record the admission.
    ///
    /// Entries older than the window are pruned before each check. When the
    /// log is at capacity the caller sleeps until the oldest entry exits the
    /// window and re-evaluates from scratch, so multiple waiters racing for
    /// the freed slot are handled correctly. No cancellation support: a
    /// caller that is abandoned upstream still records its timestamp once it
    /// eventually runs.
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut stamps = self.timestamps.lock().await;
                let now = Instant::now();
                stamps.retain(|t| now.duration_since(*t) < self.window);

                if stamps.len() < self.max_requests {
                    stamps.push(now);
                    return;
                }

                // Entries are appended in order, so the front is the oldest
                self.window - now.duration_since(stamps[0])
            };

            debug!("rate limit reached, waiting {wait:?}");
            tokio::time::sleep(wait).await;
        }
    }

    /// Check whether a slot is available without recording an admission
    pub async fn check(&self) -> bool {
        let mut stamps = self.timestamps.lock().await;
        let now = Instant::now();
        stamps.retain(|t| now.duration_since(*t) < self.window);
        stamps.len() < self.max_requests
    }

    /// Maximum requests admitted per window
    pub fn max_requests(&self) -> usize {
        self.max_requests
    }

    /// Window length
    pub fn window(&self) -> Duration {
        self.window
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("max_requests", &self.max_requests)
            .field("window", &self.window)
            .finish()
    }
}
