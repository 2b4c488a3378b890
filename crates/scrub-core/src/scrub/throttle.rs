//! Pause and retry policy around mutating calls

use crate::config::ThrottleConfig;
use crate::error::Result;
use std::time::Duration;
use tracing::{debug, warn};

/// Blocking delay source
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

/// Sleeps the current thread
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

/// Fixed pause after every mutating call, with optional bounded retry of
/// transient failures.
pub struct Throttle {
    delay: Duration,
    max_attempts: u32,
    backoff: Duration,
    sleeper: Box<dyn Sleeper>,
}

impl Throttle {
    /// Pause `delay` after each call, never retry
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            max_attempts: 1,
            backoff: Duration::ZERO,
            sleeper: Box::new(ThreadSleeper),
        }
    }

    /// Build from the `[throttle]` config section
    pub fn from_config(config: &ThrottleConfig) -> Self {
        Self::new(config.delay()).with_retry(config.max_attempts, config.backoff())
    }

    /// Allow up to `max_attempts` tries per call, waiting `backoff * n` before try `n + 1`
    pub fn with_retry(mut self, max_attempts: u32, backoff: Duration) -> Self {
        self.max_attempts = max_attempts.max(1);
        self.backoff = backoff;
        self
    }

    /// Replace the delay source
    pub fn with_sleeper(mut self, sleeper: impl Sleeper + 'static) -> Self {
        self.sleeper = Box::new(sleeper);
        self
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Run one mutating call. Every attempt, successful or not, is followed
    /// by the fixed pause.
    pub fn call<T>(&self, what: &str, mut f: impl FnMut() -> Result<T>) -> Result<T> {
        let mut attempt = 1;
        loop {
            let result = f();
            self.sleeper.sleep(self.delay);

            match result {
                Ok(value) => return Ok(value),
                Err(err) if attempt < self.max_attempts && err.is_transient() => {
                    let wait = self.backoff * attempt;
                    warn!(
                        "{} failed (attempt {}/{}): {}; retrying in {:?}",
                        what, attempt, self.max_attempts, err, wait
                    );
                    self.sleeper.sleep(wait);
                    attempt += 1;
                }
                Err(err) => {
                    debug!("{} failed after {} attempt(s)", what, attempt);
                    return Err(err);
                }
            }
        }
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Self::from_config(&ThrottleConfig::default())
    }
}

impl std::fmt::Debug for Throttle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Throttle")
            .field("delay", &self.delay)
            .field("max_attempts", &self.max_attempts)
            .field("backoff", &self.backoff)
            .finish()
    }
}
