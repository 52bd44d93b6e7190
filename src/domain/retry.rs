//! Shared retry policy with jittered, attempt-scaled backoff.
//!
//! One policy serves both the single-key fetch and the batch collector so
//! the two call sites cannot drift apart.

use crate::domain::error::HolderscanError;
use crate::ports::pacing_port::Pacer;
use rand::Rng;
use std::time::Duration;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Jitter window for the base backoff; the draw is scaled by the
    /// attempt number, so later attempts wait longer.
    pub backoff_min: Duration,
    pub backoff_max: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_min: Duration::from_secs(5),
            backoff_max: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Run `op` until it succeeds or `max_attempts` is reached. Each failed
    /// attempt is logged at warn with the attempt count and followed by a
    /// backoff pause (except after the final attempt, where the caller gets
    /// [`HolderscanError::RetriesExhausted`] immediately).
    pub fn run<T, F>(
        &self,
        pacer: &dyn Pacer,
        context: &str,
        mut op: F,
    ) -> Result<T, HolderscanError>
    where
        F: FnMut() -> Result<T, HolderscanError>,
    {
        let mut last_reason = String::new();
        for attempt in 1..=self.max_attempts {
            match op() {
                Ok(value) => return Ok(value),
                Err(e) => {
                    warn!(
                        "{} failed ({}/{}): {}",
                        context, attempt, self.max_attempts, e
                    );
                    last_reason = e.to_string();
                    if attempt < self.max_attempts {
                        pacer.pause(self.backoff(attempt));
                    }
                }
            }
        }
        Err(HolderscanError::RetriesExhausted {
            context: context.to_string(),
            attempts: self.max_attempts,
            reason: last_reason,
        })
    }

    fn backoff(&self, attempt: u32) -> Duration {
        let min = self.backoff_min.as_secs_f64();
        let max = self.backoff_max.as_secs_f64();
        let base = if max > min {
            rand::thread_rng().gen_range(min..=max)
        } else {
            min
        };
        Duration::from_secs_f64(base * f64::from(attempt))
    }
}
