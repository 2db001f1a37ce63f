//! Prober behavior against a local mock of the profile endpoint.

use handlecheck_core::Username;
use handlecheck_probe::http::IG_APP_ID;
use handlecheck_probe::{InstagramProber, ProbeError, ProbeResult, Prober};
use httpmock::Method::GET;
use httpmock::MockServer;
use serde_json::json;

const PATH: &str = "/api/v1/users/web_profile_info/";

fn prober_for(server: &MockServer) -> InstagramProber {
    InstagramProber::new(5)
        .expect("create prober")
        .with_base_url(server.base_url())
}

fn username(name: &str) -> Username {
    Username::new(name).expect("valid username")
}

#[tokio::test]
async fn test_found_when_user_present() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(PATH)
                .query_param("username", "alice")
                .header("x-ig-app-id", IG_APP_ID);
            then.status(200)
                .json_body(json!({"data": {"user": {"username": "alice"}}, "status": "ok"}));
        })
        .await;

    let result = prober_for(&server).probe(&username("alice")).await;

    mock.assert_async().await;
    assert!(matches!(result, ProbeResult::Found));
}

#[tokio::test]
async fn test_not_found_on_404() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path(PATH).query_param("username", "bob");
            then.status(404);
        })
        .await;

    let result = prober_for(&server).probe(&username("bob")).await;

    mock.assert_async().await;
    assert!(matches!(result, ProbeResult::NotFound));
}

#[tokio::test]
async fn test_not_found_when_user_missing() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(PATH);
            then.status(200).json_body(json!({"data": {}, "status": "ok"}));
        })
        .await;

    let result = prober_for(&server).probe(&username("carol")).await;

    assert!(matches!(result, ProbeResult::NotFound));
}

#[tokio::test]
async fn test_retryable_on_rate_limit() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(PATH);
            then.status(429).body("Please wait a few minutes");
        })
        .await;

    let result = prober_for(&server).probe(&username("dave")).await;

    assert!(matches!(
        result,
        ProbeResult::Retryable(ProbeError::UnexpectedStatus { status: 429 })
    ));
}

#[tokio::test]
async fn test_retryable_on_garbled_body() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(PATH);
            then.status(200).body("<!DOCTYPE html><html></html>");
        })
        .await;

    let result = prober_for(&server).probe(&username("erin")).await;

    assert!(matches!(
        result,
        ProbeResult::Retryable(ProbeError::Decode(_))
    ));
}

#[tokio::test]
async fn test_retryable_on_connection_refused() {
    // Nothing listens on port 1
    let prober = InstagramProber::new(5)
        .expect("create prober")
        .with_base_url("http://127.0.0.1:1");

    let result = prober.probe(&username("frank")).await;

    assert!(matches!(
        result,
        ProbeResult::Retryable(ProbeError::Transport(_))
    ));
}
