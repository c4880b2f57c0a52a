//! Receiver routes exercised through `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use rendercloud_webhook::{
    HealthResponse, MemoryStore, ReceiverConfig, StateStore, SubscriptionState, WebhookServer,
    compute_signature,
};
use serde_json::{Value, json};
use tower::ServiceExt;

const SECRET: &str = "0123456789abcdef";

async fn server_with_secret(secret: Option<&str>, verify: bool) -> WebhookServer {
    let store = Arc::new(MemoryStore::new());
    store
        .save(
            "default",
            &SubscriptionState {
                webhook_id: Some("whk-1".to_string()),
                webhook_secret: secret.map(str::to_string),
            },
        )
        .await
        .unwrap();
    WebhookServer::new(store, ReceiverConfig::default().with_verify_signature(verify))
}

fn delivery() -> Value {
    json!({
        "id": "evt-1",
        "type": "deploy_succeeded",
        "timestamp": "2024-05-01T12:00:00Z",
        "data": {"serviceId": "srv-1", "deployId": "dep-1"},
    })
}

fn post(body: String, signature: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/webhook")
        .header("content-type", "application/json");
    if let Some(sig) = signature {
        builder = builder.header("x-render-signature", sig);
    }
    builder.body(Body::from(body)).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

#[tokio::test]
async fn test_health() {
    let server = server_with_secret(None, true).await;
    let response = server
        .router()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let health: HealthResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(health.status, "ok");
}

#[tokio::test]
async fn test_signed_delivery_is_forwarded() {
    let server = server_with_secret(Some(SECRET), true).await;
    let mut deliveries = server.subscribe();

    let payload = delivery();
    let signature = compute_signature(&payload, SECRET);
    let response = server
        .router()
        .oneshot(post(payload.to_string(), Some(&signature)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let envelope: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(envelope["id"], "evt-1");
    assert_eq!(envelope["data"]["deployId"], "dep-1");
    assert_eq!(envelope["headers"]["x-render-signature"], signature.as_str());
    assert_eq!(envelope["headers"]["content-type"], "application/json");

    let broadcast = deliveries.recv().await.unwrap();
    assert_eq!(broadcast, envelope);
}

#[tokio::test]
async fn test_key_order_of_sender_is_honoured() {
    let server = server_with_secret(Some(SECRET), true).await;

    // Keys deliberately out of alphabetical order.
    let text = r#"{"type":"server_failed","id":"evt-7","data":{"z":1,"a":2},"timestamp":"t"}"#;
    let payload: Value = serde_json::from_str(text).unwrap();
    let signature = compute_signature(&payload, SECRET);

    let response = server
        .router()
        .oneshot(post(text.to_string(), Some(&signature)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_float_fields_verify_against_sender_text() {
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    let server = server_with_secret(Some(SECRET), true).await;

    // Signed over `{"id":"evt-8","data":{"cpu":1,"memory":1000}}`, the text a
    // JavaScript sender produces for the body below.
    let body = r#"{"id":"evt-8","data":{"cpu":1.0,"memory":1e3}}"#;
    let mut mac = Hmac::<Sha256>::new_from_slice(SECRET.as_bytes()).unwrap();
    mac.update(br#"{"id":"evt-8","data":{"cpu":1,"memory":1000}}"#);
    let signature = hex::encode(mac.finalize().into_bytes());

    let response = server
        .router()
        .oneshot(post(body.to_string(), Some(&signature)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_bad_signature_is_rejected() {
    let server = server_with_secret(Some(SECRET), true).await;
    let mut deliveries = server.subscribe();

    let signature = compute_signature(&delivery(), "not-the-secret");
    let response = server
        .router()
        .oneshot(post(delivery().to_string(), Some(&signature)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_bytes(response).await, b"Signature verification failed");
    assert!(deliveries.try_recv().is_err());
}

#[tokio::test]
async fn test_malformed_signature_is_rejected() {
    let server = server_with_secret(Some(SECRET), true).await;
    let response = server
        .router()
        .oneshot(post(delivery().to_string(), Some("sha256=abc")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_bytes(response).await, b"Invalid signature format");
}

#[tokio::test]
async fn test_unsigned_delivery_is_forwarded() {
    let server = server_with_secret(Some(SECRET), true).await;
    let response = server
        .router()
        .oneshot(post(delivery().to_string(), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_verification_disabled() {
    let server = server_with_secret(Some(SECRET), false).await;
    let response = server
        .router()
        .oneshot(post(delivery().to_string(), Some("garbage")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let server = server_with_secret(Some(SECRET), true).await;
    let response = server
        .router()
        .oneshot(post("{not json".to_string(), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["code"], "bad_request");
}

#[tokio::test]
async fn test_custom_path() {
    let store = Arc::new(MemoryStore::new());
    let server = WebhookServer::new(store, ReceiverConfig::default().with_path("render/events"));

    let request = Request::builder()
        .method("POST")
        .uri("/render/events")
        .body(Body::from(delivery().to_string()))
        .unwrap();
    let response = server.router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let request = Request::builder()
        .method("POST")
        .uri("/webhook")
        .body(Body::from(delivery().to_string()))
        .unwrap();
    let response = server.router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
