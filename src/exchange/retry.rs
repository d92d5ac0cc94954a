//! Retry policy with bounded attempts and optional exponential backoff

use rand::Rng;
use std::time::{Duration, Instant};

use crate::domain::RetryConfig;

/// When and how long to wait between attempts
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts including the first; 0 is treated as 1
    pub max_attempts: u32,
    pub initial_delay: Duration,
    /// 1.0 keeps the delay fixed
    pub multiplier: f64,
    pub max_delay: Duration,
    pub jitter: bool,
    /// Stop retrying once waiting again would pass this much total time
    pub max_elapsed: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

impl RetryPolicy {
    pub fn from_config(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            initial_delay: Duration::from_secs(config.delay_secs),
            multiplier: config.multiplier,
            // The cap never shortens the configured first delay.
            max_delay: Duration::from_secs(config.max_delay_secs.max(config.delay_secs)),
            jitter: config.jitter,
            max_elapsed: config.max_elapsed_secs.map(Duration::from_secs),
        }
    }

    /// Same delay before every retry, no jitter.
    pub fn fixed(delay: Duration, max_attempts: u32) -> Self {
        Self {
            max_attempts,
            initial_delay: delay,
            multiplier: 1.0,
            max_delay: delay,
            jitter: false,
            max_elapsed: None,
        }
    }

    pub fn attempt_limit(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Delay before retry number `retry` (1-based), before jitter.
    pub fn delay_for(&self, retry: u32) -> Duration {
        if retry <= 1 || self.multiplier == 1.0 {
            return self.initial_delay.min(self.max_delay);
        }

        let exponent = i32::try_from(retry - 1).unwrap_or(i32::MAX);
        let secs = self.initial_delay.as_secs_f64() * self.multiplier.powi(exponent);
        if !secs.is_finite() || secs >= self.max_delay.as_secs_f64() {
            return self.max_delay;
        }
        Duration::from_secs_f64(secs.max(0.0))
    }

    /// Scale `delay` into `[delay / 2, delay]` when jitter is enabled.
    pub fn apply_jitter(&self, delay: Duration) -> Duration {
        if !self.jitter || delay.is_zero() {
            return delay;
        }
        let factor: f64 = rand::thread_rng().gen_range(0.5..=1.0);
        delay.mul_f64(factor)
    }
}

/// Time source and sleep used between attempts
pub trait Clock {
    fn now(&self) -> Instant;
    fn sleep(&self, duration: Duration);
}

/// Wall clock that blocks the current thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
