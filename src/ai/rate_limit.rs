//! Rate Limiting - Requests and tokens per minute
//!
//! A fixed one-minute window. Callers over budget wait for the next window
//! instead of failing.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

const WINDOW: Duration = Duration::from_secs(60);

/// Throttle for provider calls
#[derive(Clone)]
pub struct RateLimiter {
    rpm_limit: u32,
    tpm_limit: u32,
    window: Arc<Mutex<Window>>,
}

struct Window {
    started: Instant,
    requests: u32,
    tokens: u32,
}

impl Window {
    fn roll_if_expired(&mut self) {
        if self.started.elapsed() >= WINDOW {
            self.started = Instant::now();
            self.requests = 0;
            self.tokens = 0;
        }
    }

    fn remaining(&self) -> Duration {
        WINDOW.saturating_sub(self.started.elapsed())
    }
}

impl RateLimiter {
    pub fn new(rpm_limit: u32, tpm_limit: u32) -> Self {
        Self {
            rpm_limit,
            tpm_limit,
            window: Arc::new(Mutex::new(Window {
                started: Instant::now(),
                requests: 0,
                tokens: 0,
            })),
        }
    }

    /// No limits (local models, tests)
    pub fn unlimited() -> Self {
        Self::new(u32::MAX, u32::MAX)
    }

    /// Reserve one request and `estimated_tokens`, waiting for the next
    /// window when the current one is spent.
    ///
    /// A single request larger than the token budget is let through once the
    /// window is fresh.
    pub async fn acquire(&self, estimated_tokens: u32) {
        loop {
            let mut window = self.window.lock().await;
            window.roll_if_expired();

            let fresh = window.requests == 0;
            let over_requests = window.requests >= self.rpm_limit;
            let over_tokens = window.tokens.saturating_add(estimated_tokens) > self.tpm_limit;

            if !over_requests && (fresh || !over_tokens) {
                window.requests += 1;
                window.tokens = window.tokens.saturating_add(estimated_tokens);
                return;
            }

            let wait = window.remaining();
            drop(window);
            tracing::debug!("Rate limit reached, waiting {:?}", wait);
            tokio::time::sleep(wait).await;
        }
    }

    /// Correct the reservation once the real usage is known
    pub async fn record_tokens(&self, actual_tokens: u32, estimated_tokens: u32) {
        if actual_tokens > estimated_tokens {
            let mut window = self.window.lock().await;
            window.tokens = window.tokens.saturating_add(actual_tokens - estimated_tokens);
        }
    }

    pub async fn stats(&self) -> RateLimitStats {
        let mut window = self.window.lock().await;
        window.roll_if_expired();

        RateLimitStats {
            requests_used: window.requests,
            requests_limit: self.rpm_limit,
            tokens_used: window.tokens,
            tokens_limit: self.tpm_limit,
            window_remaining_secs: window.remaining().as_secs(),
        }
    }
}

/// Usage in the current window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitStats {
    pub requests_used: u32,
    pub requests_limit: u32,
    pub tokens_used: u32,
    pub tokens_limit: u32,
    pub window_remaining_secs: u64,
}

impl RateLimitStats {
    pub fn requests_remaining(&self) -> u32 {
        self.requests_limit.saturating_sub(self.requests_used)
    }

    pub fn tokens_remaining(&self) -> u32 {
        self.tokens_limit.saturating_sub(self.tokens_used)
    }

    pub fn is_at_limit(&self) -> bool {
        self.requests_remaining() == 0 || self.tokens_remaining() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn counts_requests_and_tokens() {
        let limiter = RateLimiter::new(10, 1_000);
        limiter.acquire(100).await;
        limiter.acquire(100).await;

        let stats = limiter.stats().await;
        assert_eq!(stats.requests_used, 2);
        assert_eq!(stats.tokens_used, 200);
        assert_eq!(stats.requests_remaining(), 8);
    }

    #[tokio::test(start_paused = true)]
    async fn waits_for_next_window() {
        let limiter = RateLimiter::new(1, 10_000);
        let start = Instant::now();

        limiter.acquire(10).await;
        limiter.acquire(10).await;

        assert!(start.elapsed() >= WINDOW);
        assert_eq!(limiter.stats().await.requests_used, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn oversized_request_passes_on_fresh_window() {
        let limiter = RateLimiter::new(10, 100);
        let start = Instant::now();
        limiter.acquire(500).await;
        assert!(start.elapsed() < Duration::from_secs(1));
        assert!(limiter.stats().await.is_at_limit());
    }

    #[tokio::test(start_paused = true)]
    async fn record_tokens_only_grows() {
        let limiter = RateLimiter::new(100, 1_000);
        limiter.acquire(50).await;
        limiter.record_tokens(100, 50).await;
        assert_eq!(limiter.stats().await.tokens_used, 100);

        limiter.record_tokens(10, 50).await;
        assert_eq!(limiter.stats().await.tokens_used, 100);
    }

    #[test]
    fn stats_saturate() {
        let stats = RateLimitStats {
            requests_used: 15,
            requests_limit: 10,
            tokens_used: 1_500,
            tokens_limit: 1_000,
            window_remaining_secs: 30,
        };
        assert_eq!(stats.requests_remaining(), 0);
        assert_eq!(stats.tokens_remaining(), 0);
        assert!(stats.is_at_limit());
    }
}
