//! Subscription lifecycle against a mock Render API.

use std::sync::Arc;

use rendercloud_client::RenderClient;
use rendercloud_webhook::{
    MemoryStore, StateStore, Subscription, SubscriptionState, TriggerSettings, WebhookError,
    WebhookEventType,
};
use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CALLBACK: &str = "https://hooks.example.com/webhook";

fn client(server: &MockServer) -> RenderClient {
    RenderClient::builder()
        .base_url(server.uri())
        .api_key("rnd_test")
        .build()
        .unwrap()
}

fn settings() -> TriggerSettings {
    TriggerSettings::new(
        "tea-123",
        vec![
            WebhookEventType::DeploySucceeded,
            WebhookEventType::DeployFailed,
        ],
    )
}

fn subscription(server: &MockServer, store: Arc<MemoryStore>, settings: TriggerSettings) -> Subscription {
    Subscription::new(client(server), store, "trigger-1", settings)
}

fn stored(id: &str, secret: &str) -> SubscriptionState {
    SubscriptionState {
        webhook_id: Some(id.to_string()),
        webhook_secret: Some(secret.to_string()),
    }
}

#[tokio::test]
async fn test_create_generates_secret_and_persists() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/webhooks"))
        .and(body_partial_json(json!({
            "ownerId": "tea-123",
            "url": CALLBACK,
            "events": ["deploy_succeeded", "deploy_failed"],
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "whk-9", "url": CALLBACK})))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    let created = subscription(&server, store.clone(), settings())
        .create(CALLBACK)
        .await
        .unwrap();
    assert!(created);

    let state = store.load("trigger-1").await.unwrap();
    assert_eq!(state.webhook_id.as_deref(), Some("whk-9"));
    let secret = state.webhook_secret.unwrap();
    assert_eq!(secret.len(), 64);

    // The stored secret is the one that was registered, and no serviceIds
    // were sent.
    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["secret"], secret);
    assert!(body.get("serviceIds").is_none());
}

#[tokio::test]
async fn test_create_uses_configured_secret_and_services() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/webhooks"))
        .and(body_partial_json(json!({
            "secret": "my-secret",
            "serviceIds": ["srv-a", "srv-b"],
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "whk-1"})))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    let settings = settings()
        .with_secret("my-secret")
        .with_service_ids(vec!["srv-a".into(), "srv-b".into()]);
    assert!(
        subscription(&server, store.clone(), settings)
            .create(CALLBACK)
            .await
            .unwrap()
    );
    assert_eq!(store.load("trigger-1").await.unwrap(), stored("whk-1", "my-secret"));
}

#[tokio::test]
async fn test_create_failure_is_wrapped() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/webhooks"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"message": "invalid url"})))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    let err = subscription(&server, store.clone(), settings())
        .create(CALLBACK)
        .await
        .unwrap_err();

    assert!(matches!(err, WebhookError::CreateFailed(_)));
    assert_eq!(
        err.to_string(),
        "Failed to create Render webhook: API error (400): invalid url"
    );
    assert!(store.load("trigger-1").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_without_id_returns_false() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/webhooks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    let created = subscription(&server, store.clone(), settings())
        .create(CALLBACK)
        .await
        .unwrap();
    assert!(!created);
    assert!(store.load("trigger-1").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_requires_events() {
    let server = MockServer::start().await;
    let store = Arc::new(MemoryStore::new());
    let err = subscription(&server, store, TriggerSettings::new("tea-123", vec![]))
        .create(CALLBACK)
        .await
        .unwrap_err();
    assert!(matches!(err, WebhookError::InvalidSettings(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_check_exists_without_state_skips_api() {
    let server = MockServer::start().await;
    let store = Arc::new(MemoryStore::new());
    assert!(
        !subscription(&server, store, settings())
            .check_exists(CALLBACK)
            .await
    );
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_check_exists_compares_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/webhooks/whk-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "whk-1", "url": CALLBACK})))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    store.save("trigger-1", &stored("whk-1", "s")).await.unwrap();
    let sub = subscription(&server, store, settings());

    assert!(sub.check_exists(CALLBACK).await);
    assert!(!sub.check_exists("https://elsewhere.example.com/hook").await);
}

#[tokio::test]
async fn test_check_exists_treats_errors_as_missing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/webhooks/whk-gone"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "not found"})))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    store.save("trigger-1", &stored("whk-gone", "s")).await.unwrap();
    assert!(
        !subscription(&server, store, settings())
            .check_exists(CALLBACK)
            .await
    );
}

#[tokio::test]
async fn test_delete_clears_state() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/webhooks/whk-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    store.save("trigger-1", &stored("whk-1", "s")).await.unwrap();
    assert!(
        subscription(&server, store.clone(), settings())
            .delete()
            .await
            .unwrap()
    );
    assert!(store.load("trigger-1").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_suppresses_remote_failure() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/webhooks/whk-1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    store.save("trigger-1", &stored("whk-1", "s")).await.unwrap();
    assert!(
        subscription(&server, store.clone(), settings())
            .delete()
            .await
            .unwrap()
    );
    assert!(store.load("trigger-1").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_without_state_is_noop() {
    let server = MockServer::start().await;
    let store = Arc::new(MemoryStore::new());
    assert!(
        subscription(&server, store, settings())
            .delete()
            .await
            .unwrap()
    );
    assert!(server.received_requests().await.unwrap().is_empty());
}
