//! Tests for the bearer token and read-only gates.

mod common;

use common::{TOKEN, TestServer};
use folio_client::{HttpTransport, LibraryApi};
use folio_core::{ErrorEnvelope, FolderKey, NewFolder};
use folio_server::{Action, Authorizer, ServerConfig, TokenAuthorizer, USER_HEADER};
use serde_json::json;

#[tokio::test]
async fn test_requests_without_token_are_forbidden() {
    let server = TestServer::start_with(ServerConfig::default().with_token(TOKEN)).await;
    let http = reqwest::Client::new();

    let response = http.get(server.url("/folders")).send().await.unwrap();
    assert_eq!(response.status(), 403);
    let envelope: ErrorEnvelope = response.json().await.unwrap();
    assert_eq!(envelope.error.name, "Forbidden");

    let response = http
        .get(server.url("/folders"))
        .bearer_auth("wrong")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 403);

    // Health stays open for probes
    let health = http.get(server.url("/health")).send().await.unwrap();
    assert_eq!(health.status(), 200);

    server.stop().await;
}

#[tokio::test]
async fn test_client_with_token_is_allowed_and_user_is_recorded() {
    let server = TestServer::start_with(ServerConfig::default().with_token(TOKEN)).await;

    let api = HttpTransport::new(server.base_url.clone(), Some(TOKEN.to_string())).unwrap();
    let folder = api
        .create_folder(NewFolder {
            name: "Shared".to_string(),
            parent: None,
        })
        .await
        .unwrap();
    assert_eq!(folder.created_by, None);
    assert_eq!(api.list_folders(&FolderKey::root()).await.unwrap().len(), 1);

    let created: serde_json::Value = reqwest::Client::new()
        .post(server.url("/folders"))
        .bearer_auth(TOKEN)
        .header(USER_HEADER, "7")
        .json(&json!({"name": "Mine"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(created["createdBy"], 7);

    server.stop().await;
}

#[tokio::test]
async fn test_read_only_library_rejects_writes() {
    let server = TestServer::start_with(ServerConfig::default().with_read_only(true)).await;
    let http = reqwest::Client::new();

    let listed = http.get(server.url("/files")).send().await.unwrap();
    assert_eq!(listed.status(), 200);

    let created = http
        .post(server.url("/folders"))
        .json(&json!({"name": "Nope"}))
        .send()
        .await
        .unwrap();
    assert_eq!(created.status(), 403);

    let deleted = http
        .delete(server.url("/folders"))
        .json(&json!({"ids": [1]}))
        .send()
        .await
        .unwrap();
    assert_eq!(deleted.status(), 403);

    server.stop().await;
}

#[test]
fn test_token_authorizer_parses_user_header() {
    let gate = TokenAuthorizer::new(None, false);
    let mut headers = axum::http::HeaderMap::new();
    headers.insert(USER_HEADER, "12".parse().unwrap());
    assert_eq!(gate.authorize(Action::Update, &headers).unwrap().user, Some(12));

    headers.insert(USER_HEADER, "not-a-number".parse().unwrap());
    assert_eq!(gate.authorize(Action::Read, &headers).unwrap().user, None);
}
