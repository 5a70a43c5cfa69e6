use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// Bounded retry with linearly increasing backoff: the wait before retry `k`
/// is `base_delay * k`, so successive waits never shrink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one. Treated as at least 1.
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }

    /// Runs `op` until it succeeds or `max_attempts` attempts have failed,
    /// returning the last error. Each failed attempt is logged at WARN.
    pub async fn run<T, E, F, Fut>(&self, mut op: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let mut attempt: u32 = 1;

        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if attempt < self.max_attempts => {
                    warn!(attempt, error = %err, "attempt failed, retrying");
                    sleep(self.delay_for(attempt)).await;
                    attempt += 1;
                },
                Err(err) => {
                    warn!(attempt, error = %err, "attempt failed, giving up");
                    return Err(err);
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RetryPolicy;
    use pretty_assertions::assert_eq;
    use std::cell::{Cell, RefCell};
    use std::time::Duration;
    use tokio::time::Instant;

    fn test_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_without_retry() {
        let calls = Cell::new(0u32);

        let result: Result<u32, &str> = test_policy()
            .run(|| {
                calls.set(calls.get() + 1);
                async { Ok(42) }
            })
            .await;

        assert_eq!(result, Ok(42));
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn retries_with_non_decreasing_waits() {
        // Two failures, then success: exactly two waits, 1s then 2s.
        let attempt_times = RefCell::new(Vec::new());

        let result: Result<u32, &str> = test_policy()
            .run(|| {
                attempt_times.borrow_mut().push(Instant::now());
                let n = attempt_times.borrow().len();
                async move {
                    if n < 3 {
                        Err("connection reset")
                    } else {
                        Ok(7)
                    }
                }
            })
            .await;

        assert_eq!(result, Ok(7));

        let times = attempt_times.borrow();
        assert_eq!(times.len(), 3);
        let first_wait = times[1] - times[0];
        let second_wait = times[2] - times[1];
        assert_eq!(first_wait, Duration::from_secs(1));
        assert_eq!(second_wait, Duration::from_secs(2));
        assert!(second_wait >= first_wait);
    }

    #[tokio::test(start_paused = true)]
    async fn stops_after_max_attempts() {
        let calls = Cell::new(0u32);

        let result: Result<u32, &str> = test_policy()
            .run(|| {
                calls.set(calls.get() + 1);
                async { Err("503 Service Unavailable") }
            })
            .await;

        assert_eq!(result, Err("503 Service Unavailable"));
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_max_attempts_still_runs_once() {
        let policy = RetryPolicy {
            max_attempts: 0,
            base_delay: Duration::from_secs(1),
        };
        let calls = Cell::new(0u32);

        let result: Result<(), &str> = policy
            .run(|| {
                calls.set(calls.get() + 1);
                async { Err("boom") }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.get(), 1);
    }
}
