//! Integration tests for `GithubVariableStore` using wiremock HTTP mocks.

use serde_json::json;
use stockwatch_state::{FingerprintStore, GithubVariableStore, StateError};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const VARIABLE_PATH: &str = "/repos/acme/alerts/actions/variables/UPDATE_HASH";
const COLLECTION_PATH: &str = "/repos/acme/alerts/actions/variables";

fn test_store(base_url: &str) -> GithubVariableStore {
    GithubVariableStore::with_base_url("test-token", "acme", "alerts", "UPDATE_HASH", 5, base_url)
        .expect("store construction should not fail")
}

#[tokio::test]
async fn load_returns_variable_value() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(VARIABLE_PATH))
        .and(header("authorization", "Bearer test-token"))
        .and(header("x-github-api-version", "2022-11-28"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "UPDATE_HASH",
            "value": "abc123",
            "created_at": "2024-01-10T10:00:00Z",
            "updated_at": "2024-01-11T10:00:00Z"
        })))
        .mount(&server)
        .await;

    let value = test_store(&server.uri()).load().await.expect("load should succeed");
    assert_eq!(value.as_deref(), Some("abc123"));
}

#[tokio::test]
async fn load_missing_variable_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(VARIABLE_PATH))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})))
        .mount(&server)
        .await;

    let value = test_store(&server.uri()).load().await.expect("load should succeed");
    assert!(value.is_none());
}

#[tokio::test]
async fn load_server_error_is_unexpected_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(VARIABLE_PATH))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let err = test_store(&server.uri()).load().await.unwrap_err();
    assert!(
        matches!(err, StateError::UnexpectedStatus { status: 502, .. }),
        "got {err:?}"
    );
}

#[tokio::test]
async fn load_malformed_body_is_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(VARIABLE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = test_store(&server.uri()).load().await.unwrap_err();
    assert!(matches!(err, StateError::Deserialize { .. }), "got {err:?}");
}

#[tokio::test]
async fn save_patches_existing_variable() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path(VARIABLE_PATH))
        .and(body_json(json!({"name": "UPDATE_HASH", "value": "def456"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    test_store(&server.uri())
        .save("def456")
        .await
        .expect("save should succeed");
}

#[tokio::test]
async fn save_creates_variable_when_missing() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path(VARIABLE_PATH))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(COLLECTION_PATH))
        .and(body_json(json!({"name": "UPDATE_HASH", "value": "def456"})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    test_store(&server.uri())
        .save("def456")
        .await
        .expect("save should succeed");
}

#[tokio::test]
async fn save_forbidden_is_unexpected_status() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path(VARIABLE_PATH))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let err = test_store(&server.uri()).save("def456").await.unwrap_err();
    assert!(
        matches!(err, StateError::UnexpectedStatus { status: 403, .. }),
        "got {err:?}"
    );
}
