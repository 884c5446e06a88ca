//! Login attempt limiter
//!
//! In-process sliding-window limiter keyed by the login identifier. A key
//! that exhausts its window is banned for a fixed duration; a successful
//! login clears the key so earlier failed attempts stop counting.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::info;

/// Rate limiter configuration
#[derive(Debug, Clone)]
pub struct RateLimiterConfig {
    /// Maximum number of attempts allowed per window
    pub max_attempts: u32,
    /// Attempt window in seconds
    pub window_seconds: u64,
    /// Ban duration in seconds once the window is exhausted
    pub ban_duration_seconds: u64,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            window_seconds: 300,       // 5 minutes
            ban_duration_seconds: 900, // 15 minutes
        }
    }
}

#[derive(Debug)]
struct AttemptEntry {
    attempts: u32,
    last_attempt: Instant,
    ban_expires: Option<Instant>,
}

/// In-process login attempt limiter
#[derive(Debug, Clone)]
pub struct RateLimiter {
    config: RateLimiterConfig,
    entries: Arc<Mutex<HashMap<String, AttemptEntry>>>,
}

impl RateLimiter {
    /// Create a new rate limiter
    pub fn new(config: RateLimiterConfig) -> Self {
        Self {
            config,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Record an attempt for `key` and report whether it is allowed
    pub async fn check(&self, key: &str) -> bool {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();

        let entry = entries.entry(key.to_string()).or_insert(AttemptEntry {
            attempts: 0,
            last_attempt: now,
            ban_expires: None,
        });

        if let Some(ban_expires) = entry.ban_expires {
            if now >= ban_expires {
                entry.attempts = 0;
                entry.ban_expires = None;
            } else {
                return false;
            }
        }

        if now.duration_since(entry.last_attempt) >= Duration::from_secs(self.config.window_seconds)
        {
            entry.attempts = 0;
        }

        if entry.attempts >= self.config.max_attempts {
            entry.ban_expires = Some(now + Duration::from_secs(self.config.ban_duration_seconds));
            info!(
                "Banned login identifier {} for {} seconds",
                key, self.config.ban_duration_seconds
            );
            return false;
        }

        entry.attempts += 1;
        entry.last_attempt = now;

        true
    }

    /// Forget a key, ending its window. Called after a successful login.
    pub async fn clear(&self, key: &str) {
        let mut entries = self.entries.lock().await;
        entries.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(max_attempts: u32) -> RateLimiter {
        RateLimiter::new(RateLimiterConfig {
            max_attempts,
            window_seconds: 300,
            ban_duration_seconds: 900,
        })
    }

    #[tokio::test]
    async fn allows_attempts_under_the_limit() {
        let limiter = limiter(3);
        for _ in 0..3 {
            assert!(limiter.check("amara10").await);
        }
    }

    #[tokio::test]
    async fn bans_once_the_window_is_exhausted() {
        let limiter = limiter(2);
        assert!(limiter.check("amara10").await);
        assert!(limiter.check("amara10").await);
        assert!(!limiter.check("amara10").await);
        // still banned on the next attempt
        assert!(!limiter.check("amara10").await);
    }

    #[tokio::test]
    async fn keys_are_independent() {
        let limiter = limiter(1);
        assert!(limiter.check("amara10").await);
        assert!(!limiter.check("amara10").await);
        assert!(limiter.check("kofi_scout").await);
    }

    #[tokio::test]
    async fn clear_resets_the_window() {
        let limiter = limiter(1);
        assert!(limiter.check("amara10").await);
        assert!(!limiter.check("amara10").await);

        limiter.clear("amara10").await;
        assert!(limiter.check("amara10").await);
    }
}
