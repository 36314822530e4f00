//! Bounded retry with exponential backoff.

use irkun_core::Result;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// Default number of attempts, the first one included.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default delay before the first retry.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(2);

/// Retry policy for upstream requests.
///
/// Only errors for which [`DataError::is_transient`](irkun_core::DataError::is_transient)
/// holds are retried. The delay before retry `n` (0-based) is `base_delay * 2^n`,
/// and there is no delay after the final attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_BASE_DELAY)
    }
}

impl RetryPolicy {
    /// Creates a policy. `max_attempts` is clamped to at least one.
    #[must_use]
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Total number of attempts.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay before retry `attempt` (0-based).
    #[must_use]
    pub const fn delay_for(&self, attempt: u32) -> Duration {
        match 2u32.checked_pow(attempt) {
            Some(factor) => self.base_delay.saturating_mul(factor),
            None => Duration::MAX,
        }
    }

    /// Runs `op` until it succeeds, fails permanently, or attempts run out.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && attempt + 1 < self.max_attempts => {
                    let delay = self.delay_for(attempt);
                    warn!(
                        attempt = attempt + 1,
                        max_attempts = self.max_attempts,
                        error = %e,
                        ?delay,
                        "Retrying after transient failure"
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use irkun_core::DataError;
    use rstest::rstest;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[rstest]
    #[case(0, 2)]
    #[case(1, 4)]
    #[case(2, 8)]
    fn test_delay_doubles(#[case] attempt: u32, #[case] secs: u64) {
        assert_eq!(
            RetryPolicy::default().delay_for(attempt),
            Duration::from_secs(secs)
        );
    }

    #[test]
    fn test_delay_saturates() {
        let policy = RetryPolicy::new(3, Duration::from_secs(2));
        assert_eq!(policy.delay_for(200), Duration::MAX);
    }

    #[test]
    fn test_at_least_one_attempt() {
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).max_attempts(), 1);
    }

    #[tokio::test]
    async fn test_transient_errors_exhaust_attempts() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let policy = RetryPolicy::new(3, Duration::from_millis(1));
        let result: Result<()> = policy
            .run(move || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(DataError::Connection("refused".into()))
            })
            .await;
        assert!(matches!(result, Err(DataError::Connection(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_recovers_after_transient_error() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let policy = RetryPolicy::new(3, Duration::from_millis(1));
        let result = policy
            .run(move || async move {
                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(DataError::Connection("reset".into()))
                } else {
                    Ok(7)
                }
            })
            .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[rstest]
    #[case(DataError::Http { status: 500, url: "u".into() })]
    #[case(DataError::RateLimited { provider: "EDINET".into(), retry_after: None })]
    #[case(DataError::Network("read timed out".into()))]
    #[tokio::test]
    async fn test_permanent_errors_are_not_retried(#[case] error: DataError) {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let mut error = Some(error);
        let policy = RetryPolicy::new(3, Duration::from_millis(1));
        let result: Result<()> = policy
            .run(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                let e = error.take().unwrap_or(DataError::Other("called twice".into()));
                async move { Err(e) }
            })
            .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
