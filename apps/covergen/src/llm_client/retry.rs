//! Bounded exponential backoff for idempotent remote operations.
//!
//! Attempting → Succeeded            (Ok)
//! Attempting → Retrying → Attempting (retryable error, attempts left)
//! Attempting → Failed               (non-retryable error, or attempt cap reached)

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tracing::{error, warn};

/// Total attempts, including the first one.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(4);
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
        }
    }
}

impl RetryPolicy {
    /// Wait before the next attempt, after `attempt` (1-indexed) has failed.
    /// base · 2^(attempt-1), capped at `max_delay`: 4s, 8s, 16s, 32s, 60s, 60s, ...
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = 1u32
            .checked_shl(attempt.saturating_sub(1))
            .unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }

    /// Every wait the policy can insert, in order. Its sum bounds total sleep time.
    pub fn schedule(&self) -> Vec<Duration> {
        (1..self.max_attempts).map(|a| self.delay_after(a)).collect()
    }
}

/// Runs `operation` until it succeeds, returns a non-retryable error, or
/// `policy.max_attempts` attempts have been made. The closure receives the
/// 1-indexed attempt number. On exhaustion the last error is returned.
pub async fn retry_with_backoff<T, E, F, Fut, P>(
    policy: &RetryPolicy,
    is_retryable: P,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
    E: Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        let err = match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };

        if !is_retryable(&err) {
            error!("Attempt {attempt} failed with a non-retryable error: {err}");
            return Err(err);
        }

        if attempt >= max_attempts {
            error!("Giving up after {attempt} attempts: {err}");
            return Err(err);
        }

        let delay = policy.delay_after(attempt);
        warn!(
            "Attempt {}/{} failed ({}), retrying after {}ms...",
            attempt,
            max_attempts,
            err,
            delay.as_millis()
        );
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}
