//! Retry policy with exponential backoff for scoring requests.

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

use super::errors::BackendApiError;
use crate::domain::models::RetryConfig;

/// Retry policy with exponential backoff.
///
/// The policy itself is a pure state machine over the attempt count: delay
/// computation has no side effects and is unit-tested without waiting. Only
/// `execute` sleeps, via `tokio::time`, so paused-clock tests auto-advance.
///
/// Retries on transient errors only (network, timeout, 429, 5xx); permanent
/// errors (validation rejection, auth, unknown model) fail immediately.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of retries after the initial attempt
    max_retries: u32,
    /// Initial backoff duration in milliseconds
    initial_backoff_ms: u64,
    /// Maximum backoff duration in milliseconds
    max_backoff_ms: u64,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, initial_backoff_ms: u64, max_backoff_ms: u64) -> Self {
        assert!(max_retries > 0, "max_retries must be greater than 0");
        assert!(
            initial_backoff_ms > 0,
            "initial_backoff_ms must be greater than 0"
        );
        assert!(
            max_backoff_ms >= initial_backoff_ms,
            "max_backoff_ms must be >= initial_backoff_ms"
        );

        Self {
            max_retries,
            initial_backoff_ms,
            max_backoff_ms,
        }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(
            config.max_retries,
            config.initial_backoff_ms,
            config.max_backoff_ms,
        )
    }

    /// Total attempts this policy may make (initial + retries).
    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// Execute an operation with exponential backoff retry logic.
    ///
    /// Returns the first success, or the last error once the error is
    /// permanent or retries are exhausted. Delays between attempts are
    /// monotonically non-decreasing.
    pub async fn execute<F, Fut, T>(&self, mut operation: F) -> Result<T, BackendApiError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, BackendApiError>>,
    {
        let mut attempt = 0;

        loop {
            match operation().await {
                Ok(result) => {
                    if attempt > 0 {
                        debug!("Operation succeeded after {} retries", attempt);
                    }
                    return Ok(result);
                }
                Err(err) => {
                    if self.should_retry(&err, attempt) {
                        let backoff = self.calculate_backoff(attempt);
                        warn!(
                            "Attempt {} failed with transient error: {}. Retrying in {:?}...",
                            attempt + 1,
                            err,
                            backoff
                        );

                        sleep(backoff).await;
                        attempt += 1;
                    } else {
                        if attempt >= self.max_retries {
                            warn!("Operation failed after {} attempts: {}", attempt + 1, err);
                        } else {
                            debug!("Permanent error, not retrying: {}", err);
                        }
                        return Err(err);
                    }
                }
            }
        }
    }

    /// Calculate exponential backoff duration for a given attempt
    ///
    /// Formula: min(initial_backoff * 2^attempt, max_backoff)
    fn calculate_backoff(&self, attempt: u32) -> Duration {
        let backoff_ms = self
            .initial_backoff_ms
            .saturating_mul(2_u64.saturating_pow(attempt))
            .min(self.max_backoff_ms);

        Duration::from_millis(backoff_ms)
    }

    /// Determine if an error should be retried
    ///
    /// Retries when the attempt count is below `max_retries` and the error
    /// is transient.
    fn should_retry(&self, error: &BackendApiError, attempt: u32) -> bool {
        if attempt >= self.max_retries {
            return false;
        }

        error.is_transient()
    }
}

impl Default for RetryPolicy {
    /// Recommended defaults: 3 retries, 500ms initial backoff, 30s cap.
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_backoff_calculation() {
        let policy = RetryPolicy::new(5, 1000, 60000);

        assert_eq!(policy.calculate_backoff(0), Duration::from_millis(1000));
        assert_eq!(policy.calculate_backoff(1), Duration::from_millis(2000));
        assert_eq!(policy.calculate_backoff(2), Duration::from_millis(4000));
        assert_eq!(policy.calculate_backoff(3), Duration::from_millis(8000));
        assert_eq!(policy.calculate_backoff(4), Duration::from_millis(16000));
        assert_eq!(policy.calculate_backoff(5), Duration::from_millis(32000));
        assert_eq!(policy.calculate_backoff(6), Duration::from_millis(60000)); // capped
    }

    #[test]
    fn test_backoff_is_monotonically_non_decreasing() {
        let policy = RetryPolicy::new(10, 500, 30000);
        let mut last = Duration::ZERO;
        for attempt in 0..10 {
            let backoff = policy.calculate_backoff(attempt);
            assert!(backoff >= last);
            last = backoff;
        }
    }

    #[test]
    fn test_should_retry_transient_errors() {
        let policy = RetryPolicy::new(3, 1000, 60000);

        assert!(policy.should_retry(&BackendApiError::RateLimitExceeded, 0));
        assert!(policy.should_retry(&BackendApiError::Timeout, 1));
        assert!(policy.should_retry(
            &BackendApiError::ServerError(StatusCode::INTERNAL_SERVER_ERROR, "boom".to_string()),
            2
        ));
    }

    #[test]
    fn test_should_not_retry_permanent_errors() {
        let policy = RetryPolicy::new(3, 1000, 60000);

        assert!(!policy.should_retry(&BackendApiError::InvalidApiKey, 0));
        assert!(!policy.should_retry(&BackendApiError::ModelNotFound("m".to_string()), 0));
        assert!(!policy.should_retry(
            &BackendApiError::InvalidRequest("bad request".to_string()),
            0
        ));
    }

    #[test]
    fn test_should_not_retry_after_max_attempts() {
        let policy = RetryPolicy::new(3, 1000, 60000);

        assert!(!policy.should_retry(&BackendApiError::RateLimitExceeded, 3));
        assert!(!policy.should_retry(&BackendApiError::Timeout, 4));
    }

    #[tokio::test(start_paused = true)]
    async fn test_execute_succeeds_immediately() {
        let policy = RetryPolicy::new(3, 100, 1000);
        let counter = Arc::new(AtomicU32::new(0));

        let result = policy
            .execute(|| {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok::<u32, BackendApiError>(42)
                }
            })
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_execute_retries_on_transient_error() {
        let policy = RetryPolicy::new(3, 100, 1000);
        let counter = Arc::new(AtomicU32::new(0));

        let result = policy
            .execute(|| {
                let counter = Arc::clone(&counter);
                async move {
                    let attempt = counter.fetch_add(1, Ordering::SeqCst);
                    if attempt < 2 {
                        Err(BackendApiError::RateLimitExceeded)
                    } else {
                        Ok::<u32, BackendApiError>(42)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_execute_fails_on_permanent_error() {
        let policy = RetryPolicy::new(3, 100, 1000);
        let counter = Arc::new(AtomicU32::new(0));

        let result = policy
            .execute(|| {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err::<u32, _>(BackendApiError::InvalidApiKey)
                }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(counter.load(Ordering::SeqCst), 1); // no retries for permanent error
    }

    #[tokio::test(start_paused = true)]
    async fn test_execute_fails_after_max_retries_never_attempt_n_plus_one() {
        let policy = RetryPolicy::new(2, 100, 1000);
        let counter = Arc::new(AtomicU32::new(0));

        let result = policy
            .execute(|| {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err::<u32, _>(BackendApiError::RateLimitExceeded)
                }
            })
            .await;

        assert!(matches!(result, Err(BackendApiError::RateLimitExceeded)));
        assert_eq!(counter.load(Ordering::SeqCst), 3); // initial + 2 retries, never a 4th
    }

    #[test]
    fn test_default_retry_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 3);
        assert_eq!(policy.max_attempts(), 4);
        assert_eq!(policy.initial_backoff_ms, 500);
        assert_eq!(policy.max_backoff_ms, 30_000);
    }
}
