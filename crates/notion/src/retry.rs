//! Retry policy with exponential backoff.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tracing::{debug, error, warn};

use crate::clock::Clock;

/// Decides whether a failed attempt is worth repeating.
pub trait Retryable {
    /// Whether the failure is transient (network, timeout, 5xx, 429).
    fn is_transient(&self) -> bool;

    /// Minimum wait requested by the server, if any.
    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

/// Backoff schedule for transient failures.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt; `max_retries + 1` attempts in total.
    pub max_retries: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Multiplier applied to the delay after each retry.
    pub backoff_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_secs(1),
            backoff_factor: 2.0,
        }
    }
}

impl RetryPolicy {
    /// A policy that makes exactly one attempt.
    #[must_use]
    pub fn no_retries() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Delay before retry number `retry` (0-based): `initial_delay * backoff_factor^retry`.
    #[must_use]
    pub fn delay_for(&self, retry: u32) -> Duration {
        let exponent = i32::try_from(retry).unwrap_or(i32::MAX);
        let secs = self.initial_delay.as_secs_f64() * self.backoff_factor.powi(exponent);
        if secs.is_finite() && secs >= 0.0 {
            Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
        } else {
            Duration::MAX
        }
    }
}

/// Run `op` until it succeeds, fails permanently, or the retries run out.
///
/// Only errors whose [`Retryable::is_transient`] is true are retried. The
/// sleep before retry `k` is `policy.delay_for(k)`, or the server's
/// `retry_after` when that is longer. The error from the final attempt is
/// returned unchanged.
pub async fn retry_with_backoff<T, E, F, Fut>(
    policy: &RetryPolicy,
    clock: &dyn Clock,
    operation: &str,
    mut op: F,
) -> Result<T, E>
where
    E: Retryable + Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut retry = 0;
    loop {
        match op().await {
            Ok(value) => {
                if retry > 0 {
                    debug!(operation, retries = retry, "Succeeded after retrying");
                }
                return Ok(value);
            }
            Err(err) if err.is_transient() && retry < policy.max_retries => {
                let delay = policy
                    .delay_for(retry)
                    .max(err.retry_after().unwrap_or_default());
                warn!(
                    operation,
                    attempt = retry + 1,
                    max_retries = policy.max_retries,
                    delay = ?delay,
                    error = %err,
                    "Transient failure, retrying"
                );
                clock.sleep(delay).await;
                retry += 1;
            }
            Err(err) => {
                if err.is_transient() {
                    error!(
                        operation,
                        max_retries = policy.max_retries,
                        error = %err,
                        "Max retries exceeded"
                    );
                }
                return Err(err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use std::cell::Cell;

    #[derive(Debug)]
    enum TestError {
        Flaky,
        Fatal,
    }

    impl Display for TestError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{self:?}")
        }
    }

    impl Retryable for TestError {
        fn is_transient(&self) -> bool {
            matches!(self, TestError::Flaky)
        }
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 3);
        assert_eq!(policy.initial_delay, Duration::from_secs(1));
        assert!((policy.backoff_factor - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_delay_grows_exponentially() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(0), Duration::from_secs(1));
        assert_eq!(policy.delay_for(1), Duration::from_secs(2));
        assert_eq!(policy.delay_for(2), Duration::from_secs(4));
    }

    #[test]
    fn test_delay_saturates_instead_of_overflowing() {
        let policy = RetryPolicy {
            max_retries: 3,
            initial_delay: Duration::from_secs(1),
            backoff_factor: 1e300,
        };
        assert_eq!(policy.delay_for(10), Duration::MAX);
    }

    #[tokio::test]
    async fn test_two_transient_failures_then_success() {
        let clock = ManualClock::new();
        let calls = Cell::new(0);

        let result: Result<&str, TestError> =
            retry_with_backoff(&RetryPolicy::default(), &clock, "test", || {
                calls.set(calls.get() + 1);
                let n = calls.get();
                async move {
                    if n < 3 {
                        Err(TestError::Flaky)
                    } else {
                        Ok("done")
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.get(), 3);
        assert_eq!(
            clock.sleeps(),
            vec![Duration::from_secs(1), Duration::from_secs(2)]
        );
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let clock = ManualClock::new();
        let calls = Cell::new(0);

        let result: Result<(), TestError> =
            retry_with_backoff(&RetryPolicy::default(), &clock, "test", || {
                calls.set(calls.get() + 1);
                async { Err(TestError::Flaky) }
            })
            .await;

        assert!(matches!(result, Err(TestError::Flaky)));
        assert_eq!(calls.get(), 4);
        assert_eq!(clock.sleeps().len(), 3);
        assert_eq!(clock.total_slept(), Duration::from_secs(7));
    }

    #[tokio::test]
    async fn test_permanent_failure_is_not_retried() {
        let clock = ManualClock::new();
        let calls = Cell::new(0);

        let result: Result<(), TestError> =
            retry_with_backoff(&RetryPolicy::default(), &clock, "test", || {
                calls.set(calls.get() + 1);
                async { Err(TestError::Fatal) }
            })
            .await;

        assert!(matches!(result, Err(TestError::Fatal)));
        assert_eq!(calls.get(), 1);
        assert!(clock.sleeps().is_empty());
    }
}
