// src/error_recovery.rs
//! Retry with exponential backoff for API operations.

use crate::error::AppError;
use rand::Rng;
use std::time::Duration;

/// Retries an async operation with exponential backoff.
///
/// Only errors that report themselves retryable are retried; anything
/// else is returned on the spot. Each delay gets up to 25% random jitter.
pub async fn retry_with_backoff<F, T, Fut>(
    mut operation: F,
    max_attempts: u32,
    initial_delay: Duration,
    max_delay: Duration,
) -> Result<T, AppError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, AppError>>,
{
    let mut delay = initial_delay;
    let mut last_error = None;

    for attempt in 1..=max_attempts {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) if !e.is_retryable() => return Err(e),
            Err(e) => {
                if attempt < max_attempts {
                    let pause = with_jitter(delay);
                    log::warn!(
                        "Attempt {} failed ({}), retrying after {:?}",
                        attempt,
                        e,
                        pause
                    );
                    tokio::time::sleep(pause).await;

                    // Exponential backoff with cap
                    delay = std::cmp::min(delay * 2, max_delay);
                }
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| AppError::InternalError {
        message: "Retry failed with no error".to_string(),
        source: None,
    }))
}

fn with_jitter(delay: Duration) -> Duration {
    let millis = delay.as_millis() as u64;
    let spread = millis / 4;
    if spread == 0 {
        return delay;
    }
    Duration::from_millis(millis + rand::rng().random_range(0..=spread))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_retries_transient_failures() {
        let calls = AtomicU32::new(0);
        let result = retry_with_backoff(
            || async {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(AppError::DocsService {
                        status: 503,
                        message: "backend unavailable".to_string(),
                    })
                } else {
                    Ok("done")
                }
            },
            4,
            Duration::from_millis(1),
            Duration::from_millis(2),
        )
        .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_permanent_failure_is_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<(), AppError> = retry_with_backoff(
            || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(AppError::DocsService {
                    status: 400,
                    message: "bad request".to_string(),
                })
            },
            4,
            Duration::from_millis(1),
            Duration::from_millis(2),
        )
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
