/// Outbound HTTP plumbing for the media client
///
/// The relay makes at most one media call at a time; the limiter serializes
/// callers and spaces calls to the configured requests-per-minute budget.
use reqwest::Client;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, OwnedSemaphorePermit, Semaphore};

use crate::config::MediaConfig;
use crate::core::{RelayError, RelayResult};

/// Build the reqwest client used for all media calls
pub fn build_http_client(config: &MediaConfig) -> RelayResult<Client> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(RelayError::Http)
}

/// Single-permit rate limiter for media calls
///
/// A budget of zero means unlimited (calls are still serialized).
pub struct RateLimiter {
    gate: Arc<Semaphore>,
    last_call: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl RateLimiter {
    pub fn new(config: &MediaConfig) -> Self {
        let min_interval = if config.max_requests_per_minute > 0 {
            Duration::from_secs_f64(60.0 / config.max_requests_per_minute as f64)
        } else {
            Duration::ZERO
        };

        Self {
            gate: Arc::new(Semaphore::new(1)),
            last_call: Mutex::new(None),
            min_interval,
        }
    }

    /// Wait until the previous call has finished and the spacing interval
    /// has elapsed. Hold the guard for the duration of the call.
    pub async fn acquire(&self) -> RelayResult<RateLimitGuard> {
        let permit = self
            .gate
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| RelayError::Server(format!("Rate limiter closed: {}", e)))?;

        if !self.min_interval.is_zero() {
            // The permit already serializes callers; at most one task is
            // ever inside this block.
            let mut last_call = self.last_call.lock().await;
            if let Some(last) = *last_call {
                let elapsed = last.elapsed();
                if elapsed < self.min_interval {
                    tokio::time::sleep(self.min_interval - elapsed).await;
                }
            }
            *last_call = Some(Instant::now());
        }

        Ok(RateLimitGuard { _permit: permit })
    }
}

/// RAII guard returned by [`RateLimiter::acquire`]
pub struct RateLimitGuard {
    _permit: OwnedSemaphorePermit,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn media_config(max_per_minute: usize) -> MediaConfig {
        let mut config = Config::default().media;
        config.max_requests_per_minute = max_per_minute;
        config
    }

    #[tokio::test]
    async fn test_acquire_spaces_requests() {
        // 600 per minute = 100ms between calls
        let limiter = RateLimiter::new(&media_config(600));
        let start = Instant::now();

        drop(limiter.acquire().await.unwrap());
        drop(limiter.acquire().await.unwrap());

        assert!(start.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_unlimited_budget_does_not_sleep() {
        let limiter = RateLimiter::new(&media_config(0));
        let start = Instant::now();

        for _ in 0..3 {
            drop(limiter.acquire().await.unwrap());
        }

        assert!(start.elapsed() < Duration::from_millis(50));
    }
}
