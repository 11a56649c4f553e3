//! Bounded retry for remote calls

use crate::error::{Result, SiteWiseError};
use std::future::Future;
use std::time::Duration;

const BACKOFF_STEP: Duration = Duration::from_millis(250);

/// Run `op`, retrying transport failures, throttling and server errors up to
/// `max_retries` extra times with a linear backoff. Other errors return
/// immediately.
pub(crate) async fn with_retries<T, F, Fut>(label: &str, max_retries: u32, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < max_retries && is_transient(&e) => {
                attempt += 1;
                tracing::debug!(
                    "{} failed (attempt {}/{}): {}",
                    label,
                    attempt,
                    max_retries + 1,
                    e
                );
                tokio::time::sleep(BACKOFF_STEP * attempt).await;
            }
            Err(e) => return Err(e),
        }
    }
}

fn is_transient(err: &SiteWiseError) -> bool {
    match err {
        SiteWiseError::ProviderStatus { status, .. } => *status == 429 || *status >= 500,
        SiteWiseError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request() || e.is_body(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test(start_paused = true)]
    async fn test_retries_until_success() {
        let calls = AtomicU32::new(0);
        let result = with_retries("op", 2, || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(SiteWiseError::ProviderStatus {
                        status: 503,
                        message: "busy".into(),
                    })
                } else {
                    Ok(n)
                }
            }
        })
        .await
        .unwrap();
        assert_eq!(result, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_budget() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = with_retries("op", 1, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err(SiteWiseError::ProviderStatus {
                    status: 429,
                    message: "throttled".into(),
                })
            }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_non_transient_error_is_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = with_retries("op", 3, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(SiteWiseError::MissingConfiguration("key".into())) }
        })
        .await;
        assert!(matches!(result, Err(SiteWiseError::MissingConfiguration(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        for status in [400, 401, 404] {
            let calls = AtomicU32::new(0);
            let result: Result<()> = with_retries("op", 3, || {
                calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    Err(SiteWiseError::ProviderStatus {
                        status,
                        message: "rejected".into(),
                    })
                }
            })
            .await;
            assert!(result.is_err());
            assert_eq!(calls.load(Ordering::SeqCst), 1, "HTTP {} was retried", status);
        }
    }

    #[test]
    fn test_transient_classes() {
        let status = |status| SiteWiseError::ProviderStatus {
            status,
            message: String::new(),
        };
        assert!(is_transient(&status(429)));
        assert!(is_transient(&status(500)));
        assert!(is_transient(&status(503)));
        assert!(!is_transient(&status(401)));
        assert!(!is_transient(&SiteWiseError::Provider("no content".into())));
    }
}
