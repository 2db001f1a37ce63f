//! Per-username retry state machine.
//!
//! ```text
//! Attempting(n) --Found--------------------------> Active
//! Attempting(n) --NotFound-----------------------> Available
//! Attempting(n) --Retryable, n < max------------> Waiting(n) --delay(n)--> Attempting(n+1)
//! Attempting(n) --Retryable, n == max-----------> Error
//! any non-terminal state --cancellation---------> Cancelled
//! ```
//!
//! The gate slot is held only while a request is in flight, never during
//! the backoff wait. Waiting for a slot, waiting for the response, and
//! waiting out the delay all abort as soon as the run is cancelled.

use crate::aggregator::RunAggregator;
use crate::backoff::BackoffPolicy;
use handlecheck_core::{Outcome, Username, Verdict};
use handlecheck_probe::{ProbeResult, Prober};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

/// Maximum number of lookups per username before giving up.
pub const MAX_RETRIES: u32 = 10;

/// Retry budget and delay schedule shared by every resolver of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Lookups per username before the verdict becomes `Error`.
    /// Every username gets at least one lookup, so 0 behaves like 1.
    pub max_retries: u32,
    /// Delay schedule between lookups
    pub backoff: BackoffPolicy,
}

impl RetryPolicy {
    /// Effective lookup budget per username, never below 1.
    #[must_use]
    pub fn budget(&self) -> u32 {
        self.max_retries.max(1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: MAX_RETRIES,
            backoff: BackoffPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResolverState {
    Attempting(u32),
    Waiting(u32, Duration),
    Done(Verdict),
}

/// Drives one username at a time to a terminal verdict.
///
/// Cheap to clone; every spawned task gets its own copy.
#[derive(Clone)]
pub struct Resolver {
    prober: Arc<dyn Prober>,
    gate: Arc<Semaphore>,
    aggregator: Arc<RunAggregator>,
    cancel: CancellationToken,
    policy: RetryPolicy,
}

impl Resolver {
    /// Create a resolver bound to one run's gate and aggregator.
    #[must_use]
    pub fn new(
        prober: Arc<dyn Prober>,
        gate: Arc<Semaphore>,
        aggregator: Arc<RunAggregator>,
        policy: RetryPolicy,
    ) -> Self {
        let cancel = aggregator.cancellation_token();
        Self {
            prober,
            gate,
            aggregator,
            cancel,
            policy,
        }
    }

    /// Resolve `username`, record its outcome, and return it.
    pub async fn resolve(&self, username: Username) -> Outcome {
        let mut attempts = 0;
        let mut state = ResolverState::Attempting(1);

        let verdict = loop {
            state = match state {
                ResolverState::Attempting(n) => self.attempt(&username, n, &mut attempts).await,
                ResolverState::Waiting(n, delay) => self.wait(n, delay).await,
                ResolverState::Done(verdict) => break verdict,
            };
        };

        let outcome = Outcome::new(username, verdict, attempts);
        self.aggregator.record_outcome(outcome.clone());
        outcome
    }

    async fn attempt(&self, username: &Username, n: u32, attempts: &mut u32) -> ResolverState {
        if self.cancel.is_cancelled() {
            return ResolverState::Done(Verdict::Cancelled);
        }

        let Some(result) = self.probe_with_permit(username, attempts).await else {
            debug!("Lookup for {} abandoned on cancellation", username);
            return ResolverState::Done(Verdict::Cancelled);
        };

        match result {
            ProbeResult::Found => ResolverState::Done(Verdict::Active),
            ProbeResult::NotFound => ResolverState::Done(Verdict::Available),
            ProbeResult::Retryable(reason) if n >= self.policy.budget() => {
                error!(
                    "Giving up on {} after {} attempts: {}",
                    username, n, reason
                );
                ResolverState::Done(Verdict::Error)
            }
            ProbeResult::Retryable(reason) => {
                let delay = self.policy.backoff.next_delay(n);
                warn!(
                    "Lookup for {} failed (attempt {}/{}), retrying in {:?}: {}",
                    username,
                    n,
                    self.policy.budget(),
                    delay,
                    reason
                );
                ResolverState::Waiting(n, delay)
            }
        }
    }

    /// One lookup under a gate slot. `None` means the run was cancelled.
    async fn probe_with_permit(
        &self,
        username: &Username,
        attempts: &mut u32,
    ) -> Option<ProbeResult> {
        let _permit = tokio::select! {
            biased;
            () = self.cancel.cancelled() => return None,
            permit = self.gate.acquire() => permit.ok()?,
        };

        *attempts += 1;
        debug!(
            "Probing {} via {} (attempt {})",
            username,
            self.prober.prober_id(),
            attempts
        );

        tokio::select! {
            biased;
            () = self.cancel.cancelled() => None,
            result = self.prober.probe(username) => Some(result),
        }
    }

    async fn wait(&self, n: u32, delay: Duration) -> ResolverState {
        if self.cancel.is_cancelled() {
            return ResolverState::Done(Verdict::Cancelled);
        }

        tokio::select! {
            biased;
            () = self.cancel.cancelled() => ResolverState::Done(Verdict::Cancelled),
            () = tokio::time::sleep(delay) => ResolverState::Attempting(n + 1),
        }
    }
}
