//! Bounded exponential-delay retries for a single async operation.

use std::{fmt::Display, future::Future, time::Duration};

use tracing::{error, warn};

use crate::error::DashboardError;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(1000);

/// Runs an operation up to `max_attempts` times, sleeping
/// `base_delay * 2^attempt` after each failed attempt except the last.
///
/// There is no cancellation: once started, a sequence runs until it
/// succeeds or is exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    max_attempts: u32,
    base_delay: Duration,
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }
}

impl Backoff {
    /// A `max_attempts` of zero still runs the operation once.
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Wait applied after the 0-indexed failed `attempt`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.base_delay.saturating_mul(factor)
    }

    pub async fn execute<F, Fut, T, E>(&self, mut operation: F) -> Result<T, DashboardError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        for attempt in 0..self.max_attempts {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(err) if attempt + 1 >= self.max_attempts => {
                    error!(
                        attempt = attempt + 1,
                        max_attempts = self.max_attempts,
                        "giving up after final attempt: {err}"
                    );
                }
                Err(err) => {
                    let delay = self.delay_for(attempt);
                    warn!(
                        attempt = attempt + 1,
                        max_attempts = self.max_attempts,
                        ?delay,
                        "attempt failed, retrying: {err}"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }

        Err(DashboardError::ServiceUnavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        Arc,
        atomic::{AtomicU32, Ordering},
    };
    use tokio::time::Instant;

    #[test]
    fn default_delays_double_from_one_second() {
        let backoff = Backoff::default();

        assert_eq!(backoff.max_attempts(), 3);
        assert_eq!(backoff.delay_for(0), Duration::from_secs(1));
        assert_eq!(backoff.delay_for(1), Duration::from_secs(2));
        assert_eq!(backoff.delay_for(2), Duration::from_secs(4));
    }

    #[test]
    fn zero_attempts_is_clamped_to_one() {
        let backoff = Backoff::new(0, Duration::from_millis(10));
        assert_eq!(backoff.max_attempts(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn returns_immediately_on_first_success() {
        let start = Instant::now();

        let value = Backoff::default()
            .execute(|| async { Ok::<_, String>(7) })
            .await
            .expect("operation succeeds");

        assert_eq!(value, 7);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_after_transient_failures() {
        let calls = Arc::new(AtomicU32::new(0));
        let start = Instant::now();

        let counter = calls.clone();
        let value = Backoff::default()
            .execute(move || {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err(format!("boom {n}"))
                    } else {
                        Ok("ok")
                    }
                }
            })
            .await
            .expect("third attempt succeeds");

        assert_eq!(value, "ok");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // 1s after the first failure, 2s after the second.
        assert_eq!(start.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn exhaustion_hides_the_original_error() {
        let calls = Arc::new(AtomicU32::new(0));
        let start = Instant::now();

        let counter = calls.clone();
        let err = Backoff::default()
            .execute(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Err::<(), _>("connection refused") }
            })
            .await
            .unwrap_err();

        assert_eq!(err, DashboardError::ServiceUnavailable);
        assert!(!err.to_string().contains("connection refused"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // No wait after the final attempt.
        assert_eq!(start.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn single_attempt_never_sleeps() {
        let start = Instant::now();

        let err = Backoff::new(1, Duration::from_secs(5))
            .execute(|| async { Err::<(), _>("nope") })
            .await
            .unwrap_err();

        assert_eq!(err, DashboardError::ServiceUnavailable);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
