//! Per-request cancellation timer.

use std::future::Future;
use std::time::Duration;

use crate::error::DeltaMemoryError;

/// Run `future`, cancelling it once `duration` elapses.
///
/// Dropping the future aborts the in-flight request; the caller receives a
/// [`DeltaMemoryError::Connection`] carrying the timeout in milliseconds.
pub async fn with_timeout<T>(
    duration: Duration,
    future: impl Future<Output = Result<T, DeltaMemoryError>>,
) -> Result<T, DeltaMemoryError> {
    match tokio::time::timeout(duration, future).await {
        Ok(result) => result,
        Err(_) => Err(DeltaMemoryError::timeout(duration.as_millis() as u64)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn elapsed_timer_yields_connection_error_with_timeout() {
        let result: Result<(), _> = with_timeout(Duration::from_millis(250), async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok(())
        })
        .await;

        let err = result.unwrap_err();
        assert!(err.is_timeout());
        assert!(matches!(
            err,
            DeltaMemoryError::Connection { timeout_ms: Some(250), .. }
        ));
        assert_eq!(err.to_string(), "Request timeout after 250ms");
    }

    #[tokio::test]
    async fn completed_future_passes_through() {
        let value = with_timeout(Duration::from_secs(1), async { Ok(7) })
            .await
            .unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn inner_error_is_not_rewritten() {
        let err = with_timeout::<()>(Duration::from_secs(1), async {
            Err(DeltaMemoryError::connection("refused"))
        })
        .await
        .unwrap_err();
        assert!(!err.is_timeout());
        assert_eq!(err.message(), "refused");
    }
}
