//! Handlecheck Probe - one lookup, one coarse answer.
//!
//! This crate issues a single profile-lookup request for a username and
//! folds the response into a [`ProbeResult`]: the profile exists, it does
//! not, or the answer was inconclusive and the caller may try again.
//!
//! The prober never retries on its own. Retry policy, backoff, and
//! cancellation belong to the engine that drives it.
//!
//! # Example
//!
//! ```rust,ignore
//! use handlecheck_core::Username;
//! use handlecheck_probe::{InstagramProber, Prober, ProbeResult};
//!
//! let prober = InstagramProber::new(30)?;
//! match prober.probe(&Username::new("alice")?).await {
//!     ProbeResult::Found => println!("taken"),
//!     ProbeResult::NotFound => println!("available"),
//!     ProbeResult::Retryable(reason) => println!("try again: {reason}"),
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod error;
pub mod http;
pub mod instagram;
pub mod prober;

// Re-export commonly used types
pub use error::{ProbeError, Result};
pub use instagram::{classify_body, InstagramProber};
pub use prober::{ProbeResult, Prober};
