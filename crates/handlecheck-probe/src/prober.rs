//! The prober seam between the engine and the network.

use crate::error::ProbeError;
use async_trait::async_trait;
use handlecheck_core::Username;

/// Coarse answer to a single lookup.
#[derive(Debug)]
pub enum ProbeResult {
    /// The service returned a profile for this username
    Found,
    /// The service has no such profile
    NotFound,
    /// No definite answer; the lookup may be repeated
    Retryable(ProbeError),
}

/// Trait for anything that can look up one username.
///
/// Implementations must be safe to share across concurrently running
/// resolvers (Send + Sync) and must not retry internally.
#[async_trait]
pub trait Prober: Send + Sync {
    /// Issue exactly one lookup for `username`.
    async fn probe(&self, username: &Username) -> ProbeResult;

    /// Short identifier used in log lines.
    fn prober_id(&self) -> &'static str;
}
