//! Retried object deletion.
//!
//! Deletes are the one storage operation observed to fail transiently under load,
//! so they get a bounded retry with exponential backoff. The result is always a
//! `DeleteOutcome` value: callers deleting many objects inspect the collected
//! outcomes at a single decision point instead of branching on each attempt.

use std::time::Duration;

use crate::traits::{ObjectStorage, StorageError};

/// Result of one key's deletion attempts.
#[derive(Debug, Clone)]
pub struct DeleteOutcome {
    pub key: String,
    /// How many times the underlying delete was invoked.
    pub attempts: u32,
    /// Last error message, when all attempts failed.
    pub error: Option<String>,
}

impl DeleteOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Delete `key`, retrying up to `max_attempts` times with exponential backoff
/// (base delay 2s: waits 2s, then 4s between attempts).
///
/// A backend that reports the object as already absent counts as success: the goal
/// is the object not existing. Never returns an error; persistent failure is carried
/// in the outcome so the caller can continue cleaning up other objects.
pub async fn delete_object_with_retry(
    storage: &dyn ObjectStorage,
    key: &str,
    max_attempts: u32,
) -> DeleteOutcome {
    let base_delay = Duration::from_secs(serein_core::constants::DELETE_RETRY_BASE_DELAY_SECS);
    let mut last_error = None;

    for attempt in 1..=max_attempts {
        match storage.delete_object(key).await {
            Ok(()) | Err(StorageError::NotFound(_)) => {
                if attempt > 1 {
                    tracing::info!(key = %key, attempt, "Object deleted after retry");
                }
                return DeleteOutcome {
                    key: key.to_string(),
                    attempts: attempt,
                    error: None,
                };
            }
            Err(e) => {
                tracing::warn!(key = %key, attempt, error = %e, "Object delete failed");
                last_error = Some(e.to_string());
                if attempt < max_attempts {
                    // 2s after the first failure, 4s after the second.
                    let delay = base_delay * 2u32.pow(attempt - 1);
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    DeleteOutcome {
        key: key.to_string(),
        attempts: max_attempts,
        error: last_error,
    }
}
