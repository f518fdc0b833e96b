//! Timeout enforcement.
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - An elapsed deadline is a transient attempt failure, same as a reset connection

use std::future::Future;
use std::time::Duration;

use crate::resilience::outcome::AttemptError;

/// Bound one attempt by `deadline`.
pub async fn with_deadline<T, F>(deadline: Duration, attempt: F) -> Result<T, AttemptError>
where
    F: Future<Output = Result<T, AttemptError>>,
{
    match tokio::time::timeout(deadline, attempt).await {
        Ok(result) => result,
        Err(_) => Err(AttemptError::Timeout(deadline)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_elapsed_becomes_timeout() {
        let result: Result<(), _> = with_deadline(Duration::from_millis(5), async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok(())
        })
        .await;
        assert!(matches!(result, Err(AttemptError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_fast_attempt_passes_through() {
        let result = with_deadline(Duration::from_secs(1), async { Ok::<_, AttemptError>(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }
}
