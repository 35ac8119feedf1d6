//! Bounded retry for calls to the payment processor.
//!
//! The processor redelivers a notification when we answer with a 5xx, but its
//! schedule is coarse (minutes to hours). A short in-request retry absorbs
//! brief network blips; once the budget is spent the error is returned and the
//! webhook answers 5xx.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::app_error::{AppError, AppResult};

/// Upper bound for a single backoff sleep.
pub const MAX_RETRY_DELAY: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Single attempt, no retries.
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay before retry number `retry` (0-based): `base * 4^retry`, capped,
    /// plus up to `base / 4` of jitter.
    pub fn backoff_delay(&self, retry: u32) -> Duration {
        let base_ms = self.base_delay.as_millis() as u64;
        if base_ms == 0 {
            return Duration::ZERO;
        }
        let exponential = base_ms.saturating_mul(4u64.saturating_pow(retry));
        let capped = exponential.min(MAX_RETRY_DELAY.as_millis() as u64);
        let jitter = rand::random::<u64>() % (base_ms / 4 + 1);
        Duration::from_millis(capped + jitter)
    }

    /// Runs `operation` until it succeeds, fails with a non-transient error,
    /// or the attempt budget is spent.
    pub async fn run<T, F, Fut>(&self, operation: &str, mut call: F) -> AppResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        let mut attempt = 1;
        loop {
            match call().await {
                Ok(value) => return Ok(value),
                Err(e) if is_transient(&e) && attempt < self.max_attempts => {
                    let delay = self.backoff_delay(attempt - 1);
                    warn!(
                        error = %e,
                        operation,
                        attempt,
                        max_attempts = self.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        "Transient failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    if is_transient(&e) {
                        warn!(
                            error = %e,
                            operation,
                            attempt,
                            "Retry budget exhausted"
                        );
                    }
                    return Err(e);
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(200))
    }
}

fn is_transient(error: &AppError) -> bool {
    matches!(error, AppError::UpstreamFetch(_))
}
