//! Retry policy.
//!
//! # Responsibilities
//! - Decide whether another attempt is allowed within one logical call
//! - Provide the wait before the next attempt
//!
//! # Design Decisions
//! - Fixed interval between attempts, no exponential growth
//! - Only transient failures are retried (see `AttemptError::is_transient`)
//! - Outbound calls are GETs, so every call is idempotent

use std::time::Duration;

/// Fixed-interval retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub retry_count: u32,
    /// Wait before each retry.
    pub interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retry_count: 3,
            interval: Duration::from_secs(6),
        }
    }
}

impl RetryPolicy {
    /// Total attempts a logical call may make.
    pub fn attempts(&self) -> u32 {
        self.retry_count.saturating_add(1)
    }

    /// Delay before attempt number `attempt + 1`, or `None` if `attempt`
    /// (1-based) was the last one allowed.
    pub fn next_delay(&self, attempt: u32) -> Option<Duration> {
        if attempt < self.attempts() {
            Some(self.interval)
        } else {
            None
        }
    }
}
