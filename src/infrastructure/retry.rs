//! Retry with exponential backoff for outbound HTTP calls.
//!
//! Only errors with `DomainError::is_retryable()` (network failures, 429s and
//! 5xx responses) are retried.

use crate::domain::error::DomainError;
use reqwest::StatusCode;
use std::future::Future;
use tokio::time::{sleep, Duration};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Attempts after the first one.
    pub max_retries: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub backoff_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 500,
            max_delay_ms: 8_000,
            backoff_factor: 2.0,
        }
    }
}

impl RetryConfig {
    pub fn with_max_retries(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Default::default()
        }
    }
}

pub async fn with_retry<T, F, Fut>(
    config: &RetryConfig,
    operation_name: &str,
    mut f: F,
) -> Result<T, DomainError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DomainError>>,
{
    let mut attempt = 0;
    let mut delay_ms = config.initial_delay_ms;

    loop {
        match f().await {
            Ok(result) => return Ok(result),
            Err(err) => {
                attempt += 1;

                if !err.is_retryable() || attempt > config.max_retries {
                    if attempt > config.max_retries {
                        warn!(operation = operation_name, attempts = attempt, error = %err, "Giving up");
                    }
                    return Err(err);
                }

                debug!(
                    operation = operation_name,
                    attempt,
                    max = config.max_retries,
                    error = %err,
                    delay_ms,
                    "Retrying"
                );

                sleep(Duration::from_millis(delay_ms)).await;
                delay_ms =
                    ((delay_ms as f64 * config.backoff_factor) as u64).min(config.max_delay_ms);
            }
        }
    }
}

/// Map a non-success HTTP status to an error; 429 and 5xx come back
/// retryable.
pub fn status_error(service: &str, status: StatusCode, body: &str) -> DomainError {
    let snippet: String = body.chars().take(300).collect();
    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        DomainError::Network(format!("{service} returned {status}: {snippet}"))
    } else if status == StatusCode::NOT_FOUND {
        DomainError::NotFound(format!("{service} returned 404: {snippet}"))
    } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        DomainError::Config(format!("{service} rejected credentials ({status})"))
    } else {
        DomainError::InvalidInput(format!("{service} returned {status}: {snippet}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn fast() -> RetryConfig {
        RetryConfig {
            max_retries: 3,
            initial_delay_ms: 1,
            max_delay_ms: 5,
            backoff_factor: 2.0,
        }
    }

    #[tokio::test]
    async fn test_retry_succeeds_after_retries() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result = with_retry(&fast(), "test", || {
            let count = counter_clone.fetch_add(1, Ordering::SeqCst);
            async move {
                if count < 2 {
                    Err(DomainError::Network("timeout".into()))
                } else {
                    Ok(42)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_non_retryable_fails_immediately() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result = with_retry(&fast(), "test", || {
            counter_clone.fetch_add(1, Ordering::SeqCst);
            async { Err::<i32, _>(DomainError::Parse("bad json".into())) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result = with_retry(&fast(), "test", || {
            counter_clone.fetch_add(1, Ordering::SeqCst);
            async { Err::<i32, _>(DomainError::Network("down".into())) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(counter.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_status_mapping() {
        assert!(status_error("x", StatusCode::TOO_MANY_REQUESTS, "").is_retryable());
        assert!(status_error("x", StatusCode::BAD_GATEWAY, "").is_retryable());
        assert!(matches!(
            status_error("x", StatusCode::NOT_FOUND, ""),
            DomainError::NotFound(_)
        ));
        assert!(!status_error("x", StatusCode::BAD_REQUEST, "").is_retryable());
    }
}
