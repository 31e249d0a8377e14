//! Bounded retry for store calls.
//!
//! A call that fails with a transient backend error is retried after a delay
//! that grows linearly with the attempt number (`attempt * step`). Validation
//! errors and permanent backend errors propagate on the first attempt.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use fleetsheet_core::{Error, Result};

/// Number of attempts before giving up
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// Delay unit multiplied by the attempt number
pub const DEFAULT_STEP: Duration = Duration::from_secs(5);

/// Something that can block the calling thread for a while.
pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration);
}

/// Blocks with [`std::thread::sleep`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Retry budget and backoff for remote calls.
#[derive(Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Delay after the n-th failure is `n * step`
    pub step: Duration,
    sleeper: Arc<dyn Sleeper>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            step: DEFAULT_STEP,
            sleeper: Arc::new(ThreadSleeper),
        }
    }
}

impl fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_attempts", &self.max_attempts)
            .field("step", &self.step)
            .finish()
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, step: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            step,
            ..Self::default()
        }
    }

    /// A single attempt, no retries.
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Replace the sleeper (tests use a recording one).
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Delay after the given 1-based failed attempt.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.step * attempt
    }

    /// Run `op` until it succeeds, fails permanently, or the budget runs out.
    pub fn run<T, F>(&self, what: &str, mut op: F) -> Result<T>
    where
        F: FnMut() -> Result<T>,
    {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match op() {
                Ok(value) => return Ok(value),
                Err(Error::Backend(e)) if e.is_transient() => {
                    if attempt >= self.max_attempts {
                        tracing::error!(
                            "{what}: giving up after {attempt} attempts, last error: {e}"
                        );
                        return Err(Error::RetryExhausted { attempts: attempt, last: e });
                    }
                    let delay = self.delay_for(attempt);
                    tracing::warn!(
                        "{what}: {e}; retrying in {delay:?} (attempt {attempt}/{})",
                        self.max_attempts
                    );
                    self.sleeper.sleep(delay);
                }
                Err(e) => return Err(e),
            }
        }
    }
}
