//! Shared types used across handlecheck.
//!
//! This module defines the newtypes and enums that every other crate
//! passes around: the username token, its optional metadata record, the
//! terminal verdict, and the outcome emitted once per username per run.

use crate::error::CoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Newtype for a username token.
///
/// Usernames are opaque: the only rule is that they are not blank. They are
/// compared as exact strings, with no case folding or trimming.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Create a new `Username` from a string.
    ///
    /// # Errors
    /// Returns error if the token is empty or whitespace only.
    pub fn new(name: impl Into<String>) -> Result<Self, CoreError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CoreError::Validation(
                "username must not be empty".to_string(),
            ));
        }
        Ok(Self(name))
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Arbitrary key-value record imported alongside a username.
///
/// The engine never looks inside; it only re-emits the record for
/// usernames that resolve to [`Verdict::Active`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountMetadata(Map<String, Value>);

impl AccountMetadata {
    /// Wrap an existing JSON object.
    #[must_use]
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// The fallback record `{"username": <name>}`.
    #[must_use]
    pub fn minimal(username: &Username) -> Self {
        let mut fields = Map::new();
        fields.insert(
            "username".to_string(),
            Value::String(username.as_str().to_string()),
        );
        Self(fields)
    }

    /// Look up a single field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

impl From<Map<String, Value>> for AccountMetadata {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// Terminal classification of a username within one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// The profile exists
    Active,
    /// The service reported no such profile
    Available,
    /// Retries were exhausted without a definite answer
    Error,
    /// The run was stopped before this username resolved
    Cancelled,
}

impl Verdict {
    /// All verdicts, in display order.
    pub const ALL: [Verdict; 4] = [
        Verdict::Active,
        Verdict::Available,
        Verdict::Error,
        Verdict::Cancelled,
    ];

    /// Upper-case label used in outcome messages.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Verdict::Active => "ACTIVE",
            Verdict::Available => "AVAILABLE",
            Verdict::Error => "ERROR",
            Verdict::Cancelled => "CANCELLED",
        }
    }

    /// Whether this verdict puts the username in the active-accounts subset.
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, Verdict::Active)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Immutable record produced exactly once per username per run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    /// Username this outcome belongs to
    pub username: Username,
    /// Terminal verdict
    pub verdict: Verdict,
    /// Human-readable line, e.g. `[ACTIVE] alice`
    pub message: String,
    /// Number of lookups actually issued for this username
    pub attempts: u32,
    /// When the verdict was reached
    pub resolved_at: DateTime<Utc>,
}

impl Outcome {
    /// Build an outcome stamped with the current time.
    #[must_use]
    pub fn new(username: Username, verdict: Verdict, attempts: u32) -> Self {
        let message = format!("[{}] {}", verdict.label(), username);
        Self {
            username,
            verdict,
            message,
            attempts,
            resolved_at: Utc::now(),
        }
    }
}

/// Per-verdict counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerdictCounts {
    /// Usernames resolved to `Active`
    pub active: usize,
    /// Usernames resolved to `Available`
    pub available: usize,
    /// Usernames resolved to `Error`
    pub error: usize,
    /// Usernames resolved to `Cancelled`
    pub cancelled: usize,
}

impl VerdictCounts {
    /// Bump the counter for `verdict`.
    pub fn increment(&mut self, verdict: Verdict) {
        match verdict {
            Verdict::Active => self.active += 1,
            Verdict::Available => self.available += 1,
            Verdict::Error => self.error += 1,
            Verdict::Cancelled => self.cancelled += 1,
        }
    }

    /// Counter for a single verdict.
    #[must_use]
    pub fn get(&self, verdict: Verdict) -> usize {
        match verdict {
            Verdict::Active => self.active,
            Verdict::Available => self.available,
            Verdict::Error => self.error,
            Verdict::Cancelled => self.cancelled,
        }
    }

    /// Sum over all verdicts.
    #[must_use]
    pub fn total(&self) -> usize {
        self.active + self.available + self.error + self.cancelled
    }
}

/// Identifier of a single run, used to correlate log lines.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(String);

impl RunId {
    /// Create a new random `RunId` using UUID v4.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_rejects_blank() {
        assert!(Username::new("").is_err());
        assert!(Username::new("   ").is_err());
    }

    #[test]
    fn test_username_is_not_normalized() {
        let name = Username::new("Alice.B").expect("valid username");
        assert_eq!(name.as_str(), "Alice.B");
        assert_ne!(name, Username::new("alice.b").expect("valid username"));
    }

    #[test]
    fn test_minimal_metadata() {
        let name = Username::new("alice").expect("valid username");
        let metadata = AccountMetadata::minimal(&name);
        assert_eq!(
            serde_json::to_value(&metadata).expect("serialize metadata"),
            serde_json::json!({"username": "alice"})
        );
    }

    #[test]
    fn test_outcome_message() {
        let name = Username::new("bob").expect("valid username");
        let outcome = Outcome::new(name, Verdict::Cancelled, 0);
        assert_eq!(outcome.message, "[CANCELLED] bob");
        assert_eq!(outcome.attempts, 0);
    }

    #[test]
    fn test_verdict_counts() {
        let mut counts = VerdictCounts::default();
        counts.increment(Verdict::Active);
        counts.increment(Verdict::Error);
        counts.increment(Verdict::Error);

        assert_eq!(counts.get(Verdict::Active), 1);
        assert_eq!(counts.get(Verdict::Error), 2);
        assert_eq!(counts.get(Verdict::Available), 0);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn test_verdict_serialization() {
        let json = serde_json::to_string(&Verdict::Available).expect("serialize verdict");
        assert_eq!(json, "\"available\"");
        assert!(Verdict::Active.is_active());
        assert!(!Verdict::Cancelled.is_active());
    }

    #[test]
    fn test_run_id_generate() {
        let a = RunId::generate();
        let b = RunId::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 36);
    }
}
