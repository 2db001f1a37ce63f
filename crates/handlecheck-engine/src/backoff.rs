//! Exponential backoff with jitter between retry attempts.

use rand::Rng;
use std::time::Duration;

/// Delay before the second attempt, before jitter.
pub const INITIAL_DELAY: Duration = Duration::from_secs(1);

/// Ceiling applied after jitter.
pub const MAX_DELAY: Duration = Duration::from_secs(60);

/// Upper bound of the uniform random jitter added to each delay.
pub const MAX_JITTER: Duration = Duration::from_secs(1);

/// Stateless backoff schedule.
///
/// The delay after failed attempt `n` (1-based) is
/// `min(MAX_DELAY, INITIAL_DELAY * 2^(n-1) + jitter)` with jitter drawn
/// uniformly from `[0, MAX_JITTER]`, so concurrent resolvers that fail
/// together do not retry in lockstep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    initial: Duration,
    max: Duration,
    jitter: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            initial: INITIAL_DELAY,
            max: MAX_DELAY,
            jitter: MAX_JITTER,
        }
    }
}

impl BackoffPolicy {
    /// Delay before the attempt following failed attempt `attempt`.
    #[must_use]
    pub fn next_delay(&self, attempt: u32) -> Duration {
        let max_jitter_ms = u64::try_from(self.jitter.as_millis()).unwrap_or(u64::MAX);
        let jitter_ms = rand::thread_rng().gen_range(0..=max_jitter_ms);
        self.delay_with_jitter(attempt, Duration::from_millis(jitter_ms))
    }

    /// Deterministic part of [`next_delay`](Self::next_delay) for a given jitter.
    ///
    /// `jitter` is clamped to the policy's jitter bound.
    #[must_use]
    pub fn delay_with_jitter(&self, attempt: u32, jitter: Duration) -> Duration {
        self.base_delay(attempt)
            .saturating_add(jitter.min(self.jitter))
            .min(self.max)
    }

    /// Uncapped exponential term `initial * 2^(attempt-1)`.
    fn base_delay(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(31);
        self.initial.saturating_mul(2u32.saturating_pow(exp))
    }
}
