//! Retry policy for page fetches
//!
//! The policy is a plain value: it classifies the outcome of an attempt and computes
//! how long to back off before the next one. The fetcher owns the attempt loop.

use crate::config::FetcherConfig;
use crate::FetchError;
use std::time::Duration;

/// Upper bound on any single backoff sleep
pub const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// What to do after an attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success,
    /// Sleep for the given delay, then try again
    Retry(Duration),
    /// Give up and surface the error
    Fatal,
}

/// Exponential backoff with a bounded number of retries
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Additional attempts after the first one
    pub max_retries: u32,
    pub backoff_base: f64,
    pub backoff_unit: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &FetcherConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            backoff_base: config.backoff_base,
            backoff_unit: Duration::from_millis(config.backoff_unit_ms),
        }
    }

    /// Delay after the failed attempt numbered `attempt` (0 for the first)
    ///
    /// `backoff_base^attempt * backoff_unit`, capped at [`MAX_BACKOFF`].
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = self.backoff_base.powi(attempt.min(i32::MAX as u32) as i32);
        let secs = self.backoff_unit.as_secs_f64() * factor;
        if !secs.is_finite() || secs >= MAX_BACKOFF.as_secs_f64() {
            MAX_BACKOFF
        } else {
            Duration::from_secs_f64(secs.max(0.0))
        }
    }

    /// Classifies the result of attempt number `attempt` (0 for the first)
    pub fn classify<T>(&self, result: &Result<T, FetchError>, attempt: u32) -> AttemptOutcome {
        match result {
            Ok(_) => AttemptOutcome::Success,
            Err(e) if e.is_retryable() && attempt < self.max_retries => {
                AttemptOutcome::Retry(self.backoff_delay(attempt))
            }
            Err(_) => AttemptOutcome::Fatal,
        }
    }

    /// Total number of attempts allowed for one page
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}
