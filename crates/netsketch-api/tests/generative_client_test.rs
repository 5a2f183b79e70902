// Integration tests for `GenerativeClient` using wiremock.

use std::time::Duration;

use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use netsketch_api::{Error, GenerativeClient, TransportConfig};

const GENERATE_PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, GenerativeClient) {
    let server = MockServer::start().await;
    let client = GenerativeClient::from_api_key(
        &server.uri(),
        "gemini-2.5-flash",
        &SecretString::from("test-key"),
        &TransportConfig::default(),
    )
    .unwrap();
    (server, client)
}

fn answer(parts: &[&str]) -> serde_json::Value {
    let parts: Vec<_> = parts.iter().map(|t| json!({ "text": t })).collect();
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": parts },
            "finishReason": "STOP"
        }]
    })
}

// ── Happy path ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_generate_content_sends_prompt_and_key() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_json(json!({
            "contents": [{ "parts": [{ "text": "review this" }] }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(answer(&["## Review\n", "All good."])))
        .expect(1)
        .mount(&server)
        .await;

    let text = client.generate_content("review this").await.unwrap();
    assert_eq!(text, "## Review\nAll good.");
}

#[tokio::test]
async fn test_endpoint_with_path_prefix() {
    let server = MockServer::start().await;
    let client = GenerativeClient::from_reqwest(
        &format!("{}/proxy", server.uri()),
        "custom-model",
        reqwest::Client::new(),
    )
    .unwrap();

    Mock::given(method("POST"))
        .and(path("/proxy/v1beta/models/custom-model:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(answer(&["ok"])))
        .mount(&server)
        .await;

    assert_eq!(client.generate_content("x").await.unwrap(), "ok");
}

// ── Error paths ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_empty_key_is_missing_credentials() {
    let result = GenerativeClient::from_api_key(
        "http://localhost",
        "m",
        &SecretString::from("  "),
        &TransportConfig::default(),
    );
    assert!(matches!(result, Err(Error::MissingCredentials)));
}

#[tokio::test]
async fn test_blank_answer_is_empty_response() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(answer(&["  \n"])))
        .mount(&server)
        .await;

    let err = client.generate_content("x").await.unwrap_err();
    assert!(matches!(err, Error::EmptyResponse));
}

#[tokio::test]
async fn test_no_candidates_is_empty_response() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        })))
        .mount(&server)
        .await;

    let err = client.generate_content("x").await.unwrap_err();
    assert!(matches!(err, Error::EmptyResponse));
}

#[tokio::test]
async fn test_invalid_key_reported_as_400() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "code": 400,
                "message": "API key not valid. Please pass a valid API key.",
                "status": "INVALID_ARGUMENT"
            }
        })))
        .mount(&server)
        .await;

    let err = client.generate_content("x").await.unwrap_err();
    assert!(matches!(err, Error::InvalidApiKey));
}

#[tokio::test]
async fn test_forbidden_is_invalid_key() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let err = client.generate_content("x").await.unwrap_err();
    assert!(matches!(err, Error::InvalidApiKey));
}

#[tokio::test]
async fn test_server_error_carries_message() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "error": { "code": 503, "message": "The model is overloaded.", "status": "UNAVAILABLE" }
        })))
        .mount(&server)
        .await;

    let err = client.generate_content("x").await.unwrap_err();
    assert!(err.is_transient());
    match err {
        Error::Service { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "The model is overloaded.");
        }
        other => panic!("expected Service error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_garbage_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy</html>"))
        .mount(&server)
        .await;

    let err = client.generate_content("x").await.unwrap_err();
    match err {
        Error::Deserialization { body, .. } => assert_eq!(body, "<html>proxy</html>"),
        other => panic!("expected Deserialization error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_timeout_is_transport_error() {
    let server = MockServer::start().await;
    let transport = TransportConfig::default().with_timeout(Duration::from_millis(100));
    let client = GenerativeClient::from_api_key(
        &server.uri(),
        "gemini-2.5-flash",
        &SecretString::from("k"),
        &transport,
    )
    .unwrap();

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(answer(&["late"]))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let err = client.generate_content("x").await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
    assert!(err.is_transient());
}
