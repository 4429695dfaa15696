use std::thread;
use std::time::Duration;

use log::warn;

use crate::utils::ExtractionError;

/// Bounded fixed-delay retry policy for establishing store connections.
/// Deliberately not exponential and without jitter; callers needing a
/// different shape swap the policy, not the call sites.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: 5,
            delay: Duration::from_secs(5),
        }
    }
}

/// A connect failure classified for retry purposes.
#[derive(Debug)]
pub enum ConnectError {
    /// Worth another attempt after the policy delay.
    Transient(String),
    /// Propagated immediately without retry.
    Fatal(String),
}

/// Run `connect` until it succeeds, a fatal error occurs, or the policy's
/// attempts are exhausted. Exhaustion maps to
/// [`ExtractionError::StoreUnavailable`].
pub fn connect_with_retry<T, F>(policy: &RetryPolicy, mut connect: F) -> Result<T, ExtractionError>
where
    F: FnMut() -> Result<T, ConnectError>,
{
    let mut last_error = String::new();
    for attempt in 1..=policy.max_attempts {
        match connect() {
            Ok(conn) => return Ok(conn),
            Err(ConnectError::Fatal(msg)) => return Err(ExtractionError::Database(msg)),
            Err(ConnectError::Transient(msg)) => {
                warn!(
                    "store connect attempt {}/{} failed: {}",
                    attempt, policy.max_attempts, msg
                );
                last_error = msg;
                if attempt < policy.max_attempts {
                    thread::sleep(policy.delay);
                }
            }
        }
    }
    Err(ExtractionError::StoreUnavailable(format!(
        "gave up after {} attempts: {}",
        policy.max_attempts, last_error
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            delay: Duration::from_millis(1),
        }
    }

    #[test]
    fn succeeds_after_transient_failures_within_budget() {
        let mut failures_left = 3;
        let result = connect_with_retry(&fast_policy(5), || {
            if failures_left > 0 {
                failures_left -= 1;
                Err(ConnectError::Transient("busy".to_string()))
            } else {
                Ok(42)
            }
        });
        assert_eq!(result.unwrap(), 42);
    }

    #[test]
    fn exhausting_attempts_is_store_unavailable() {
        let result: Result<(), _> = connect_with_retry(&fast_policy(3), || {
            Err(ConnectError::Transient("busy".to_string()))
        });
        assert!(matches!(result, Err(ExtractionError::StoreUnavailable(_))));
    }

    #[test]
    fn fatal_error_short_circuits_without_retry() {
        let mut attempts = 0;
        let result: Result<(), _> = connect_with_retry(&fast_policy(5), || {
            attempts += 1;
            Err(ConnectError::Fatal("corrupt".to_string()))
        });
        assert!(matches!(result, Err(ExtractionError::Database(_))));
        assert_eq!(attempts, 1);
    }

    #[test]
    fn first_attempt_success_never_sleeps() {
        let result = connect_with_retry(&fast_policy(1), || Ok("ready"));
        assert_eq!(result.unwrap(), "ready");
    }
}
