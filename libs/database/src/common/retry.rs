use std::future::Future;
use std::time::Duration;
use tracing::{info, warn};

use super::error::{DatabaseError, DatabaseResult};

/// Retry configuration for database connections
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of connection attempts
    pub max_attempts: u32,
    /// Initial delay between retries
    pub initial_delay: Duration,
    /// Maximum delay between retries
    pub max_delay: Duration,
    /// Backoff multiplier applied to the delay after each failed attempt
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
            backoff_multiplier: 2.0,
        }
    }
}

/// Retry an async operation with the default configuration.
pub async fn retry<F, Fut, T>(operation_name: &str, operation: F) -> DatabaseResult<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = DatabaseResult<T>>,
{
    retry_with_backoff(operation_name, &RetryConfig::default(), operation).await
}

/// Retry an async operation with exponential backoff.
///
/// Each failed attempt is logged; the final failure is wrapped in
/// `DatabaseError::ConnectionFailed` with the attempt count.
pub async fn retry_with_backoff<F, Fut, T>(
    operation_name: &str,
    config: &RetryConfig,
    operation: F,
) -> DatabaseResult<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = DatabaseResult<T>>,
{
    let mut delay = config.initial_delay;
    let mut last_error = None;

    for attempt in 1..=config.max_attempts {
        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    info!(
                        operation = operation_name,
                        attempt, "Operation succeeded after retry"
                    );
                }
                return Ok(value);
            }
            Err(err) => {
                warn!(
                    operation = operation_name,
                    attempt,
                    max_attempts = config.max_attempts,
                    error = %err,
                    "Operation failed"
                );
                last_error = Some(err);

                if attempt < config.max_attempts {
                    tokio::time::sleep(delay).await;
                    let next = delay.as_secs_f64() * config.backoff_multiplier;
                    delay = Duration::from_secs_f64(next).min(config.max_delay);
                }
            }
        }
    }

    Err(DatabaseError::ConnectionFailed(format!(
        "{} failed after {} attempts: {}",
        operation_name,
        config.max_attempts,
        last_error.map_or_else(|| "unknown error".to_string(), |e| e.to_string())
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_config() -> RetryConfig {
        RetryConfig {
            max_attempts: 3,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
            backoff_multiplier: 2.0,
        }
    }

    #[tokio::test]
    async fn test_succeeds_first_attempt() {
        let attempts = Arc::new(AtomicU32::new(0));
        let counter = attempts.clone();

        let result = retry_with_backoff("test_op", &fast_config(), || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<_, DatabaseError>(42)
            }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_recovers_after_transient_failure() {
        let attempts = Arc::new(AtomicU32::new(0));
        let counter = attempts.clone();

        let result = retry_with_backoff("test_op", &fast_config(), || {
            let counter = counter.clone();
            async move {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err(DatabaseError::Generic("transient".into()))
                } else {
                    Ok(7)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let result: DatabaseResult<()> = retry_with_backoff("test_op", &fast_config(), || async {
            Err(DatabaseError::Generic("down".into()))
        })
        .await;

        let err = result.unwrap_err();
        assert!(err.to_string().contains("after 3 attempts"));
    }
}
