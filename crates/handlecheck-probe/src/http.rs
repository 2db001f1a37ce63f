//! HTTP client construction with the fixed browser header set.

use crate::error::{ProbeError, Result};
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, ORIGIN, REFERER, USER_AGENT,
};
use reqwest::Client;
use std::time::Duration;

/// Desktop Chrome user agent presented on every lookup.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/115.0 Safari/537.36";

/// Web application id the profile endpoint expects.
pub const IG_APP_ID: &str = "936619743392459";

/// Header set impersonating the public web client.
///
/// The endpoint rejects requests that do not look like they come from a
/// browser session, so these values are fixed rather than configurable.
#[must_use]
pub fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(
        HeaderName::from_static("x-ig-app-id"),
        HeaderValue::from_static(IG_APP_ID),
    );
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert(REFERER, HeaderValue::from_static("https://www.instagram.com/"));
    headers.insert(ORIGIN, HeaderValue::from_static("https://www.instagram.com"));
    headers
}

/// Build the shared HTTP client.
///
/// The client owns the connection pool and is cloned cheaply into every
/// resolver of a run.
///
/// # Errors
/// Returns error if the HTTP client cannot be created.
pub fn build_http_client(timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .default_headers(browser_headers())
        .build()
        .map_err(|e| ProbeError::ClientBuild(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_client() {
        assert!(build_http_client(30).is_ok());
    }

    #[test]
    fn test_browser_headers() {
        let headers = browser_headers();
        assert_eq!(headers.len(), 6);
        assert_eq!(
            headers.get("x-ig-app-id").and_then(|v| v.to_str().ok()),
            Some(IG_APP_ID)
        );
        assert!(headers
            .get(USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ua| ua.contains("Chrome")));
    }
}
