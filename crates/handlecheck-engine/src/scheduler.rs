//! Fans a username set out to resolver tasks behind a counting gate.

use crate::aggregator::RunAggregator;
use crate::error::{EngineError, Result};
use crate::resolver::{Resolver, RetryPolicy};
use futures::stream::{FuturesUnordered, StreamExt};
use handlecheck_core::{Outcome, Username, Verdict};
use handlecheck_probe::Prober;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::error;

/// Default number of lookups allowed in flight at once.
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Reject input a run cannot be started with.
///
/// # Errors
/// Returns error if `usernames` is empty, contains a duplicate, or
/// `concurrency` is zero.
pub fn validate_input(usernames: &[Username], concurrency: usize) -> Result<()> {
    if usernames.is_empty() {
        return Err(EngineError::EmptyInput);
    }
    if concurrency == 0 {
        return Err(EngineError::InvalidConcurrency { limit: concurrency });
    }

    let mut seen = HashSet::with_capacity(usernames.len());
    for username in usernames {
        if !seen.insert(username) {
            return Err(EngineError::DuplicateUsername {
                username: username.to_string(),
            });
        }
    }
    Ok(())
}

/// Runs one resolver task per username, with at most `concurrency`
/// lookups in flight.
///
/// The scheduler keeps no per-username state. It spawns, then waits for
/// every task to reach a terminal verdict.
#[derive(Clone)]
pub struct Scheduler {
    prober: Arc<dyn Prober>,
    policy: RetryPolicy,
}

impl Scheduler {
    /// Create a scheduler using the default retry policy.
    #[must_use]
    pub fn new(prober: Arc<dyn Prober>) -> Self {
        Self {
            prober,
            policy: RetryPolicy::default(),
        }
    }

    /// Override the retry policy.
    #[must_use]
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Resolve every username, recording outcomes into `aggregator`.
    ///
    /// Returns once every username has an outcome, including after
    /// cancellation, when the remaining usernames converge to `Cancelled`.
    pub async fn run(
        &self,
        usernames: Vec<Username>,
        concurrency: usize,
        aggregator: Arc<RunAggregator>,
    ) {
        let gate = Arc::new(Semaphore::new(concurrency));
        let resolver = Resolver::new(
            self.prober.clone(),
            gate,
            aggregator.clone(),
            self.policy,
        );

        let mut tasks = FuturesUnordered::new();
        for username in usernames {
            let resolver = resolver.clone();
            let task_username = username.clone();
            let handle = tokio::spawn(async move { resolver.resolve(task_username).await });
            tasks.push(async move { (username, handle.await) });
        }

        while let Some((username, joined)) = tasks.next().await {
            if let Err(e) = joined {
                // A panicking task never recorded its outcome; keep the counts whole
                error!("Resolver task for {} failed: {}", username, e);
                aggregator.record_outcome(Outcome::new(username, Verdict::Error, 0));
            }
        }
    }
}
