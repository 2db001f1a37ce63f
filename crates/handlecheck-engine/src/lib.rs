//! Handlecheck Engine - concurrent username resolution.
//!
//! This crate resolves a set of usernames to terminal verdicts by querying a
//! [`Prober`](handlecheck_probe::Prober) under bounded concurrency, retrying
//! inconclusive lookups with exponential backoff and jitter, and stopping
//! promptly when the run is cancelled.
//!
//! # Features
//!
//! - One resolver task per username; at most `concurrency` lookups in flight
//! - Up to 10 lookups per username, 1s doubling backoff capped at 60s, 0-1s jitter
//! - Cancellation observed while waiting for a slot, a response, or a delay
//! - Live counters, newest-first outcomes, and the active-accounts subset
//!
//! # Example
//!
//! ```rust,ignore
//! use handlecheck_engine::Checker;
//! use std::collections::HashMap;
//!
//! let checker = Checker::from_config(&config)?;
//! let run = checker.start_run(usernames, HashMap::new(), 5)?;
//!
//! run.wait().await;
//!
//! let progress = run.progress();
//! println!("Processed: {}/{}", progress.processed, progress.total);
//! for outcome in run.outcomes() {
//!     println!("{}", outcome.message);
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod aggregator;
pub mod backoff;
pub mod error;
pub mod resolver;
pub mod run;
pub mod scheduler;

// Re-export commonly used types
pub use aggregator::{RunAggregator, RunProgress};
pub use backoff::BackoffPolicy;
pub use error::{EngineError, Result};
pub use resolver::{Resolver, RetryPolicy, MAX_RETRIES};
pub use run::{start_run, Checker, RunHandle};
pub use scheduler::{validate_input, Scheduler, DEFAULT_CONCURRENCY};
