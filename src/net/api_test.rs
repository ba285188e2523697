use std::sync::Arc;

use wiremock::matchers::{body_json, header, header_exists, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use super::*;
use crate::net::error::FailureKind;
use crate::state::storage::MemoryTokenStorage;

fn client_for(server: &MockServer, storage: MemoryTokenStorage) -> ApiClient {
    let config = ClientConfig { api_base_url: server.uri(), ..ClientConfig::default() };
    ApiClient::new(&config, Arc::new(storage)).unwrap()
}

fn profile_json(id: &str, role: &str) -> serde_json::Value {
    serde_json::json!({
        "_id": id,
        "email": "a@b.com",
        "fullName": "A",
        "role": role,
        "planTier": "basic"
    })
}

// =============================================================
// URL helpers
// =============================================================

#[test]
fn join_url_handles_slashes() {
    assert_eq!(join_url("https://api.test/v1", "/profile"), "https://api.test/v1/profile");
    assert_eq!(join_url("https://api.test/v1/", "profile"), "https://api.test/v1/profile");
}

#[test]
fn bearer_value_formats_header() {
    assert_eq!(bearer_value("tok123"), "Bearer tok123");
}

#[cfg(not(feature = "hydrate"))]
#[test]
fn absolute_base_url_keeps_absolute_and_passes_relative_through() {
    assert_eq!(absolute_base_url("https://api.test/v1/"), "https://api.test/v1");
    assert_eq!(absolute_base_url("/api"), "/api");
}

// =============================================================
// Bearer attachment
// =============================================================

#[tokio::test]
async fn fetch_profile_sends_explicit_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/profile"))
        .and(header("Authorization", "Bearer tok123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_json("u1", "user")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, MemoryTokenStorage::new());
    let profile = client.fetch_profile("tok123").await.unwrap();
    assert_eq!(profile.id, "u1");
    assert_eq!(profile.plan_tier.as_deref(), Some("basic"));
}

#[tokio::test]
async fn get_attaches_stored_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cards"))
        .and(header("Authorization", "Bearer stored-tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, MemoryTokenStorage::with_token("stored-tok"));
    let cards: Vec<serde_json::Value> = client.get("/cards").await.unwrap();
    assert!(cards.is_empty());
}

#[tokio::test]
async fn get_without_token_sends_no_authorization_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/markets"))
        .respond_with(|req: &Request| {
            let has_auth = req.headers.contains_key("authorization");
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "hasAuth": has_auth }))
        })
        .mount(&server)
        .await;

    let client = client_for(&server, MemoryTokenStorage::new());
    let body: serde_json::Value = client.get("/markets").await.unwrap();
    assert_eq!(body["hasAuth"], false);
}

#[tokio::test]
async fn login_attaches_token_even_on_public_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(header_exists("Authorization"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "token": "fresh",
            "user": { "id": "u1", "email": "a@b.com", "fullName": "A" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, MemoryTokenStorage::with_token("old"));
    let outcome = client.login("a@b.com", "pw").await.unwrap();
    assert!(matches!(outcome, LoginOutcome::Authenticated(ref s) if s.token == "fresh"));
}

// =============================================================
// Error surfacing
// =============================================================

#[tokio::test]
async fn non_2xx_surfaces_json_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({ "message": "Invalid credentials" })))
        .mount(&server)
        .await;

    let client = client_for(&server, MemoryTokenStorage::new());
    let err = client.login("a@b.com", "bad").await.unwrap_err();
    assert_eq!(err, ApiError::Status { status: 400, message: "Invalid credentials".into() });
    assert_eq!(err.kind(), FailureKind::Client);
}

#[tokio::test]
async fn non_2xx_without_json_gets_generic_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/profile"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let client = client_for(&server, MemoryTokenStorage::new());
    let err = client.fetch_profile("tok").await.unwrap_err();
    assert_eq!(err.user_message(), "request failed: 503");
    assert_eq!(err.kind(), FailureKind::Server);
}

#[tokio::test]
async fn unauthorized_profile_is_flagged() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/profile"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({ "message": "jwt expired" })))
        .mount(&server)
        .await;

    let client = client_for(&server, MemoryTokenStorage::new());
    let err = client.fetch_profile("expired").await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.user_message(), "jwt expired");
}

#[tokio::test]
async fn undecodable_success_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = client_for(&server, MemoryTokenStorage::new());
    let err = client.fetch_profile("tok").await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::Decode);
}

#[tokio::test]
async fn unreachable_server_is_network_error() {
    // Reserve a free port, then release it so nothing is listening there.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    let config = ClientConfig { api_base_url: format!("http://127.0.0.1:{port}"), ..ClientConfig::default() };

    let client = ApiClient::new(&config, Arc::new(MemoryTokenStorage::new())).unwrap();
    let err = client.fetch_profile("tok").await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::Network);
}

#[tokio::test]
async fn failed_call_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/profile"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, MemoryTokenStorage::new());
    assert!(client.fetch_profile("tok").await.is_err());
}

// =============================================================
// Auth endpoints
// =============================================================

#[tokio::test]
async fn login_two_factor_challenge() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(serde_json::json!({ "email": "a@b.com", "password": "pw" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "requires2FA": true, "tempToken": "tmp" })),
        )
        .mount(&server)
        .await;

    let client = client_for(&server, MemoryTokenStorage::new());
    let outcome = client.login("a@b.com", "pw").await.unwrap();
    assert_eq!(outcome, LoginOutcome::TwoFactorRequired { temp_token: "tmp".into() });
}

#[tokio::test]
async fn verify_two_factor_posts_temp_token_and_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/verify-2fa"))
        .and(body_json(serde_json::json!({ "tempToken": "tmp", "code": "123456" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "token": "tok",
            "user": { "id": "u1", "email": "a@b.com", "fullName": "A" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, MemoryTokenStorage::new());
    let success = client.verify_two_factor("tmp", "123456").await.unwrap();
    assert_eq!(success.token, "tok");
    assert_eq!(success.user.full_name, "A");
}

#[tokio::test]
async fn signup_returns_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/signup"))
        .and(body_json(serde_json::json!({ "email": "n@b.com", "password": "pw", "fullName": "New" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "token": "new-tok",
            "user": { "id": "u7", "email": "n@b.com", "fullName": "New" }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, MemoryTokenStorage::new());
    let success = client.signup("n@b.com", "pw", "New").await.unwrap();
    assert_eq!(success.user.id, "u7");
}
