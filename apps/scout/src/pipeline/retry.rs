//! Backoff policy shared by every pipeline stage.
//!
//! Classic exponential backoff: before retry `n` (0-based attempt that just
//! failed) wait `base_delay * 2^n`. No cap, no jitter. Which errors are worth
//! retrying is decided by a caller-supplied classifier.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    /// Total calls allowed, including the first.
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl BackoffPolicy {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
    pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(10);

    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// Delay to wait after `attempt` (0-based) fails with a retryable error.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        match 2_u32.checked_pow(attempt) {
            Some(factor) => self.base_delay.saturating_mul(factor),
            None => Duration::MAX,
        }
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_ATTEMPTS, Self::DEFAULT_BASE_DELAY)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retryability {
    Retryable,
    Fatal,
}

#[derive(Debug, Error)]
pub enum RetryError<E> {
    #[error("non-retryable error: {0}")]
    Fatal(E),

    #[error("gave up after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: E },
}

/// Runs `op` until it succeeds, `classify` calls an error fatal, or the
/// policy's attempt ceiling is reached. Sleeps between attempts only; a final
/// failed attempt returns immediately.
pub async fn retry_with_backoff<T, E, Op, Fut, C>(
    policy: &BackoffPolicy,
    classify: C,
    mut op: Op,
) -> Result<T, RetryError<E>>
where
    Op: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    C: Fn(&E) -> Retryability,
    E: fmt::Display,
{
    let mut attempt: u32 = 0;

    loop {
        let error = match op().await {
            Ok(value) => {
                if attempt > 0 {
                    info!("Succeeded on attempt {}/{}", attempt + 1, policy.max_attempts);
                }
                return Ok(value);
            }
            Err(e) => e,
        };

        if classify(&error) == Retryability::Fatal {
            return Err(RetryError::Fatal(error));
        }

        let attempts_used = attempt + 1;
        if attempts_used >= policy.max_attempts {
            warn!("Giving up after {attempts_used} attempts: {error}");
            return Err(RetryError::Exhausted {
                attempts: attempts_used,
                last: error,
            });
        }

        let delay = policy.delay_for(attempt);
        warn!(
            "Rate limit hit ({error}). Waiting {} seconds before retry {}/{}...",
            delay.as_secs(),
            attempts_used,
            policy.max_attempts
        );
        tokio::time::sleep(delay).await;
        attempt = attempts_used;
    }
}

#[cfg(test)]
mod tests {
    use tokio::time::Instant;

    use super::*;

    #[derive(Debug, PartialEq)]
    enum FakeError {
        Busy,
        Broken,
    }

    impl fmt::Display for FakeError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{self:?}")
        }
    }

    fn classify(e: &FakeError) -> Retryability {
        match e {
            FakeError::Busy => Retryability::Retryable,
            FakeError::Broken => Retryability::Fatal,
        }
    }

    #[test]
    fn test_delay_sequence_doubles_from_base() {
        let policy = BackoffPolicy::default();
        let delays: Vec<u64> = (0..5).map(|a| policy.delay_for(a).as_secs()).collect();
        assert_eq!(delays, vec![10, 20, 40, 80, 160]);
    }

    #[test]
    fn test_delay_saturates_instead_of_overflowing() {
        let policy = BackoffPolicy::new(100, Duration::from_secs(10));
        assert_eq!(policy.delay_for(80), Duration::MAX);
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_on_first_attempt_does_not_sleep() {
        let start = Instant::now();
        let mut calls = 0;
        let result: Result<&str, RetryError<FakeError>> =
            retry_with_backoff(&BackoffPolicy::default(), classify, || {
                calls += 1;
                async { Ok("done") }
            })
            .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls, 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_then_success_returns_success() {
        let start = Instant::now();
        let mut calls = 0;
        let result = retry_with_backoff(&BackoffPolicy::default(), classify, || {
            calls += 1;
            let n = calls;
            async move {
                if n == 1 {
                    Err(FakeError::Busy)
                } else {
                    Ok("second time lucky")
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), "second time lucky");
        assert_eq!(calls, 2);
        assert_eq!(start.elapsed(), Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_always_transient_stops_at_max_attempts() {
        let start = Instant::now();
        let mut calls = 0;
        let result: Result<(), _> = retry_with_backoff(&BackoffPolicy::default(), classify, || {
            calls += 1;
            async { Err(FakeError::Busy) }
        })
        .await;

        match result {
            Err(RetryError::Exhausted { attempts, last }) => {
                assert_eq!(attempts, 5);
                assert_eq!(last, FakeError::Busy);
            }
            other => panic!("expected Exhausted, got {other:?}"),
        }
        assert_eq!(calls, 5);
        // 10 + 20 + 40 + 80; no sleep after the last attempt
        assert_eq!(start.elapsed(), Duration::from_secs(150));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fatal_error_is_not_retried() {
        let start = Instant::now();
        let mut calls = 0;
        let result: Result<(), _> = retry_with_backoff(&BackoffPolicy::default(), classify, || {
            calls += 1;
            async { Err(FakeError::Broken) }
        })
        .await;

        assert!(matches!(result, Err(RetryError::Fatal(FakeError::Broken))));
        assert_eq!(calls, 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_attempt_policy_never_sleeps() {
        let policy = BackoffPolicy::new(1, Duration::from_secs(10));
        let start = Instant::now();
        let result: Result<(), _> =
            retry_with_backoff(&policy, classify, || async { Err(FakeError::Busy) }).await;

        assert!(matches!(
            result,
            Err(RetryError::Exhausted { attempts: 1, .. })
        ));
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
