//! # Retry Policy
//!
//! One uniform retry wrapper applied to every collaborator call issued by
//! the engine or the fan-out coordinator. The policy is a single shared
//! configuration object, so all remote calls behave identically under
//! transient failures: bounded attempts, exponential backoff with an upper
//! cap and optional jitter, and a maximum elapsed time for the whole call.
//!
//! Transient failures are fully absorbed here; the engine only ever sees
//! [`SyncError::RetryExhausted`], which carries the identity of the failed
//! step.

use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use super::errors::{ActivityError, SyncError, SyncResult};
use super::types::StepId;

/// Shared retry configuration for all workflow steps.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Upper cap on any single backoff delay.
    pub max_delay: Duration,
    /// Exponential backoff multiplier.
    pub backoff_multiplier: f64,
    /// Add up to 10% random jitter to each delay.
    pub jitter: bool,
    /// Budget for the whole call across attempts and backoff. Once spent,
    /// no further attempt is made.
    pub max_elapsed: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(300), // 5 minutes
            backoff_multiplier: 2.0,
            jitter: true,
            max_elapsed: Duration::from_secs(1800), // 30 minutes
        }
    }
}

impl RetryPolicy {
    /// Calculate the backoff delay after the given completed attempt, or
    /// `None` when the attempt budget is spent.
    fn delay_after(&self, attempt: u32) -> Option<Duration> {
        if attempt >= self.max_attempts {
            return None;
        }

        let delay = self
            .base_delay
            .mul_f64(self.backoff_multiplier.powi(attempt.saturating_sub(1) as i32));
        let delay = delay.min(self.max_delay);

        if self.jitter {
            let jitter = fastrand::f64() * 0.1; // 10% jitter
            Some(delay.mul_f64(1.0 + jitter).min(self.max_delay))
        } else {
            Some(delay)
        }
    }

    /// Execute one collaborator call under this policy.
    ///
    /// `op` is invoked up to `max_attempts` times. Every [`ActivityError`]
    /// is treated as transient until the attempt or elapsed-time budget is
    /// spent, at which point the last failure surfaces as
    /// [`SyncError::RetryExhausted`] attributed to `step`.
    pub async fn execute<T, F, Fut>(&self, step: &StepId, mut op: F) -> SyncResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ActivityError>>,
    {
        let started = Instant::now();
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            match op().await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!(step = %step, attempt, "step succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(error) => {
                    let delay = self.delay_after(attempt);
                    let out_of_time = delay
                        .map(|d| started.elapsed() + d > self.max_elapsed)
                        .unwrap_or(true);

                    if out_of_time {
                        warn!(
                            step = %step,
                            attempts = attempt,
                            elapsed_ms = started.elapsed().as_millis() as u64,
                            error = %error,
                            "retry budget exhausted"
                        );
                        return Err(SyncError::RetryExhausted {
                            step: step.clone(),
                            attempts: attempt,
                            source: error,
                        });
                    }

                    let delay = delay.unwrap_or_default();
                    warn!(
                        step = %step,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "transient step failure, backing off"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}
