//! Handlecheck Core - Foundation crate for the handlecheck username checker.
//!
//! This crate provides the shared domain types, error handling, and
//! configuration management that the probe, engine, and CLI crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`types`] - Shared newtypes and enums (`Username`, `Verdict`, `Outcome`, `RunId`)
//!
//! # Example
//!
//! ```rust
//! use handlecheck_core::{AppConfig, Outcome, Username, Verdict};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! assert_eq!(config.checker.concurrency, 5);
//!
//! let username = Username::new("alice")?;
//! let outcome = Outcome::new(username, Verdict::Available, 1);
//! assert_eq!(outcome.message, "[AVAILABLE] alice");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{AppConfig, CheckerConfig, ExportConfig};
pub use error::{ConfigError, ConfigResult, CoreError, Result};
pub use types::{AccountMetadata, Outcome, RunId, Username, Verdict, VerdictCounts};
