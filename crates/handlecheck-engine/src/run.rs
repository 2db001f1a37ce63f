//! Run lifecycle: starting a run, observing it, and cancelling it.

use crate::aggregator::{RunAggregator, RunProgress};
use crate::error::Result;
use crate::resolver::RetryPolicy;
use crate::scheduler::{validate_input, Scheduler};
use handlecheck_core::{AccountMetadata, AppConfig, Outcome, RunId, Username};
use handlecheck_probe::{InstagramProber, Prober};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{broadcast, watch};
use tracing::info;

/// Caller's view of a running (or finished) run.
///
/// Every method is safe to call from any thread while the run is in
/// progress. Clones share the same run.
#[derive(Debug, Clone)]
pub struct RunHandle {
    run_id: RunId,
    aggregator: Arc<RunAggregator>,
    done: watch::Receiver<bool>,
    /// Feed subscribed before the first task was spawned
    first_feed: Arc<Mutex<Option<broadcast::Receiver<Outcome>>>>,
}

impl RunHandle {
    /// Identifier of this run.
    #[must_use]
    pub fn run_id(&self) -> &RunId {
        &self.run_id
    }

    /// Stop the run. Idempotent; a no-op once the run is complete.
    ///
    /// Returns immediately. Usernames without a verdict converge to
    /// `Cancelled`; verdicts already recorded are kept.
    pub fn cancel(&self) {
        if self.is_complete() {
            return;
        }
        self.aggregator.request_cancellation();
    }

    /// Whether cancellation has been requested for this run.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.aggregator.is_cancelled()
    }

    /// Processed and total counts plus per-verdict counters.
    #[must_use]
    pub fn progress(&self) -> RunProgress {
        self.aggregator.progress()
    }

    /// `processed / total` in `[0, 1]`.
    #[must_use]
    pub fn progress_fraction(&self) -> f64 {
        self.aggregator.progress_fraction()
    }

    /// Snapshot of outcomes so far, newest first.
    #[must_use]
    pub fn outcomes(&self) -> Vec<Outcome> {
        self.aggregator.outcomes()
    }

    /// Metadata of every username found `Active` so far.
    #[must_use]
    pub fn active_accounts(&self) -> Vec<AccountMetadata> {
        self.aggregator.active_accounts()
    }

    /// Live feed of outcomes.
    ///
    /// The first call returns a feed that has seen every outcome since the
    /// run started. Later calls only see outcomes recorded after they
    /// subscribe; combine them with [`outcomes`](Self::outcomes) for a full picture.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Outcome> {
        let first = self
            .first_feed
            .lock()
            .expect("acquire first feed lock")
            .take();
        first.unwrap_or_else(|| self.aggregator.subscribe())
    }

    /// Whether every resolver has reached a terminal verdict.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        *self.done.borrow()
    }

    /// Wait until every resolver has reached a terminal verdict.
    pub async fn wait(&self) {
        let mut done = self.done.clone();
        // The sender only drops after flagging completion
        let _ = done.wait_for(|finished| *finished).await;
    }
}

/// Start a run on the current tokio runtime.
///
/// # Errors
/// Returns error if `usernames` is empty or has duplicates, or if
/// `concurrency` is zero.
pub fn start_run(
    scheduler: &Scheduler,
    usernames: Vec<Username>,
    metadata: HashMap<Username, AccountMetadata>,
    concurrency: usize,
) -> Result<RunHandle> {
    validate_input(&usernames, concurrency)?;

    let run_id = RunId::generate();
    let total = usernames.len();
    let aggregator = Arc::new(RunAggregator::new(&usernames, metadata));
    let first_feed = aggregator.subscribe();
    let (done_tx, done_rx) = watch::channel(false);

    info!(
        "Starting run {}: {} usernames, concurrency {}",
        run_id, total, concurrency
    );

    let task_scheduler = scheduler.clone();
    let task_aggregator = aggregator.clone();
    let task_run_id = run_id.clone();
    tokio::spawn(async move {
        task_scheduler
            .run(usernames, concurrency, task_aggregator.clone())
            .await;

        let progress = task_aggregator.progress();
        info!(
            "Run {} finished: {}/{} processed ({} active, {} available, {} error, {} cancelled)",
            task_run_id,
            progress.processed,
            progress.total,
            progress.counts.active,
            progress.counts.available,
            progress.counts.error,
            progress.counts.cancelled
        );
        let _ = done_tx.send(true);
    });

    Ok(RunHandle {
        run_id,
        aggregator,
        done: done_rx,
        first_feed: Arc::new(Mutex::new(Some(first_feed))),
    })
}

/// Long-lived entry point that owns the prober and the current run.
///
/// Starting a new run cancels the previous one, so at most one run is
/// making requests at a time.
pub struct Checker {
    scheduler: Scheduler,
    current: Mutex<Option<RunHandle>>,
}

impl Checker {
    /// Create a checker around any prober.
    #[must_use]
    pub fn new(prober: Arc<dyn Prober>) -> Self {
        Self {
            scheduler: Scheduler::new(prober),
            current: Mutex::new(None),
        }
    }

    /// Create a checker that queries the live endpoint.
    ///
    /// # Errors
    /// Returns error if the configuration is invalid or the HTTP client
    /// cannot be created.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        config
            .validate()
            .map_err(handlecheck_core::CoreError::from)?;
        let prober = InstagramProber::new(config.checker.request_timeout_secs)?;
        Ok(Self::new(Arc::new(prober)))
    }

    /// Override the retry policy for future runs.
    #[must_use]
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.scheduler = self.scheduler.with_policy(policy);
        self
    }

    /// Start a new run, cancelling the current one if it is still going.
    ///
    /// Input is validated before anything is cancelled, so a rejected call
    /// leaves the current run untouched.
    ///
    /// # Errors
    /// Returns error if `usernames` is empty or has duplicates, or if
    /// `concurrency` is zero.
    pub fn start_run(
        &self,
        usernames: Vec<Username>,
        metadata: HashMap<Username, AccountMetadata>,
        concurrency: usize,
    ) -> Result<RunHandle> {
        validate_input(&usernames, concurrency)?;

        let mut current = self.current.lock().expect("acquire current run lock");
        if let Some(previous) = current.take() {
            if !previous.is_complete() {
                info!("Cancelling run {} in favor of a new run", previous.run_id());
                previous.cancel();
            }
        }

        let handle = start_run(&self.scheduler, usernames, metadata, concurrency)?;
        *current = Some(handle.clone());
        Ok(handle)
    }

    /// The most recently started run, if any.
    #[must_use]
    pub fn current_run(&self) -> Option<RunHandle> {
        self.current
            .lock()
            .expect("acquire current run lock")
            .clone()
    }

    /// Cancel the current run, if any.
    pub fn cancel(&self) {
        if let Some(run) = self.current_run() {
            run.cancel();
        }
    }
}
