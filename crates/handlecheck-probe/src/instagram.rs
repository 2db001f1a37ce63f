//! Profile lookup against the public web profile endpoint.

use crate::error::{ProbeError, Result};
use crate::http::build_http_client;
use crate::prober::{ProbeResult, Prober};
use async_trait::async_trait;
use handlecheck_core::Username;
use reqwest::{Client, StatusCode};
use tracing::debug;

/// Production host of the lookup endpoint.
const DEFAULT_BASE_URL: &str = "https://i.instagram.com";

/// Path of the lookup endpoint; the username goes in the `username` query parameter.
const PROFILE_INFO_PATH: &str = "/api/v1/users/web_profile_info/";

/// Prober backed by the web profile-info endpoint.
///
/// Responses are classified as:
/// - 404 -> [`ProbeResult::NotFound`]
/// - 200 with a `data.user` object -> [`ProbeResult::Found`]
/// - 200 without it -> [`ProbeResult::NotFound`]
/// - anything else, including transport and decode failures -> [`ProbeResult::Retryable`]
#[derive(Debug, Clone)]
pub struct InstagramProber {
    client: Client,
    base_url: String,
}

impl InstagramProber {
    /// Create a prober with the given per-request timeout.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(timeout_secs: u64) -> Result<Self> {
        Ok(Self {
            client: build_http_client(timeout_secs)?,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Point the prober at another host serving the same path.
    ///
    /// Used to run the prober against a local mock server.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Full endpoint URL without the query string.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, PROFILE_INFO_PATH)
    }

    async fn lookup(&self, username: &Username) -> std::result::Result<ProbeResult, ProbeError> {
        let response = self
            .client
            .get(self.endpoint())
            .query(&[("username", username.as_str())])
            .send()
            .await?;

        let status = response.status();
        debug!("Lookup for {} returned HTTP {}", username, status.as_u16());

        match status {
            StatusCode::NOT_FOUND => Ok(ProbeResult::NotFound),
            StatusCode::OK => {
                let body = response.bytes().await?;
                Ok(classify_body(&body))
            }
            other => Err(ProbeError::UnexpectedStatus {
                status: other.as_u16(),
            }),
        }
    }
}

#[async_trait]
impl Prober for InstagramProber {
    async fn probe(&self, username: &Username) -> ProbeResult {
        match self.lookup(username).await {
            Ok(result) => result,
            Err(err) => ProbeResult::Retryable(err),
        }
    }

    fn prober_id(&self) -> &'static str {
        "instagram"
    }
}

/// Classify the body of a 200 response.
///
/// A profile exists when the body decodes as JSON and `data.user` is a
/// JSON object. A body that is not JSON at all is retryable.
#[must_use]
pub fn classify_body(body: &[u8]) -> ProbeResult {
    match serde_json::from_slice::<serde_json::Value>(body) {
        Ok(json) => match json.pointer("/data/user") {
            Some(user) if user.is_object() => ProbeResult::Found,
            _ => ProbeResult::NotFound,
        },
        Err(e) => ProbeResult::Retryable(ProbeError::Decode(e.to_string())),
    }
}
