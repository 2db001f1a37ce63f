//! Run-scoped state: counters, outcomes, active accounts, and the
//! cancellation switch.
//!
//! Resolvers are the only writers and go through [`RunAggregator::record_outcome`],
//! which applies every update under one lock. Readers get snapshots and can
//! poll from any thread.

use handlecheck_core::{AccountMetadata, Outcome, Username, VerdictCounts};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Upper bound on buffered live-feed events per subscriber.
const MAX_FEED_CAPACITY: usize = 1024;

/// Point-in-time view of a run's progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunProgress {
    /// Usernames with a recorded outcome
    pub processed: usize,
    /// Usernames in the run
    pub total: usize,
    /// Outcomes per verdict
    pub counts: VerdictCounts,
}

impl RunProgress {
    /// `processed / total`, or 0 for an empty run.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.processed as f64 / self.total as f64
        }
    }

    /// Whether every username has an outcome.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.processed == self.total
    }
}

#[derive(Debug, Default)]
struct RunState {
    counts: VerdictCounts,
    /// Outcomes in the order they were recorded
    outcomes: Vec<Outcome>,
    active_accounts: Vec<AccountMetadata>,
    resolved: HashSet<Username>,
}

/// Owner of all mutable state of one run.
#[derive(Debug)]
pub struct RunAggregator {
    total: usize,
    /// Usernames this run was started with
    members: HashSet<Username>,
    metadata: HashMap<Username, AccountMetadata>,
    state: Mutex<RunState>,
    cancel: CancellationToken,
    feed: broadcast::Sender<Outcome>,
}

impl RunAggregator {
    /// Create the aggregator for a run over `usernames`.
    ///
    /// `metadata` holds optional per-username records; they are only read
    /// back for usernames that resolve to `Active`.
    #[must_use]
    pub fn new(usernames: &[Username], metadata: HashMap<Username, AccountMetadata>) -> Self {
        let members: HashSet<Username> = usernames.iter().cloned().collect();
        let total = members.len();
        let (feed, _) = broadcast::channel(total.clamp(1, MAX_FEED_CAPACITY));
        Self {
            total,
            members,
            metadata,
            state: Mutex::new(RunState::default()),
            cancel: CancellationToken::new(),
            feed,
        }
    }

    /// Record the terminal outcome of one username.
    ///
    /// Returns `false` and leaves the state untouched if the username is
    /// not part of this run or already has an outcome in it.
    pub fn record_outcome(&self, outcome: Outcome) -> bool {
        if !self.members.contains(&outcome.username) {
            warn!(
                "Ignoring outcome for {} ({}); not part of this run",
                outcome.username, outcome.verdict
            );
            return false;
        }

        {
            let mut state = self.state.lock().expect("acquire run state lock");

            if !state.resolved.insert(outcome.username.clone()) {
                warn!(
                    "Ignoring second outcome for {} ({}); verdict already recorded",
                    outcome.username, outcome.verdict
                );
                return false;
            }

            state.counts.increment(outcome.verdict);

            if outcome.verdict.is_active() {
                let record = self
                    .metadata
                    .get(&outcome.username)
                    .cloned()
                    .unwrap_or_else(|| AccountMetadata::minimal(&outcome.username));
                state.active_accounts.push(record);
            }

            state.outcomes.push(outcome.clone());

            debug!(
                "Recorded {} ({}/{})",
                outcome.message,
                state.outcomes.len(),
                self.total
            );
        }

        // Nobody listening is fine
        let _ = self.feed.send(outcome);
        true
    }

    /// Snapshot of counters.
    #[must_use]
    pub fn progress(&self) -> RunProgress {
        let state = self.state.lock().expect("acquire run state lock");
        RunProgress {
            processed: state.outcomes.len(),
            total: self.total,
            counts: state.counts,
        }
    }

    /// `processed / total`, or 0 when the run is empty.
    #[must_use]
    pub fn progress_fraction(&self) -> f64 {
        self.progress().fraction()
    }

    /// Outcomes recorded so far, newest first.
    #[must_use]
    pub fn outcomes(&self) -> Vec<Outcome> {
        let state = self.state.lock().expect("acquire run state lock");
        state.outcomes.iter().rev().cloned().collect()
    }

    /// Metadata records of usernames resolved to `Active`, in resolution order.
    #[must_use]
    pub fn active_accounts(&self) -> Vec<AccountMetadata> {
        let state = self.state.lock().expect("acquire run state lock");
        state.active_accounts.clone()
    }

    /// Live feed of outcomes recorded after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Outcome> {
        self.feed.subscribe()
    }

    /// Set the cancellation switch. Idempotent and non-blocking.
    pub fn request_cancellation(&self) {
        if !self.cancel.is_cancelled() {
            info!("Cancellation requested");
        }
        self.cancel.cancel();
    }

    /// Whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Token observed by resolvers at every suspension point.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Number of usernames in the run.
    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }
}
