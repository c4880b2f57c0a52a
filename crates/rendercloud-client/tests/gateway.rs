//! Request gateway behaviour against a mock Render API.

use rendercloud_client::api::ServiceFilters;
use rendercloud_client::{ApiRequest, Error, ListMode, RenderClient};
use serde_json::{Value, json};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> RenderClient {
    RenderClient::builder()
        .base_url(server.uri())
        .api_key("rnd_test")
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_get_service_sends_auth_and_returns_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/services/srv-abc123"))
        .and(header("authorization", "Bearer rnd_test"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "srv-abc123",
            "name": "api"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let service = client(&server).services().get("srv-abc123").await.unwrap();
    assert_eq!(service["name"], "api");
}

#[tokio::test]
async fn test_invalid_id_never_reaches_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let err = client(&server).services().get("abc123").await.unwrap_err();
    assert!(err.is_invalid_identifier());
    assert_eq!(
        err.to_string(),
        "Invalid service ID format. Expected format: srv-xxxxx, got: abc123"
    );

    let err = client(&server)
        .deploys()
        .get("srv-abc123", "srv-wrong")
        .await
        .unwrap_err();
    assert!(err.is_invalid_identifier());
}

#[tokio::test]
async fn test_rate_limit_with_reset_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/services"))
        .respond_with(ResponseTemplate::new(429).insert_header("ratelimit-reset", "30"))
        .mount(&server)
        .await;

    let err = client(&server)
        .request(ApiRequest::get("/services"))
        .await
        .unwrap_err();
    assert!(err.is_rate_limited());
    assert_eq!(err.to_string(), "Rate limit exceeded. Retry after 30 seconds.");
}

#[tokio::test]
async fn test_rate_limit_without_reset_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server)
        .request(ApiRequest::get("/owners"))
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Rate limit exceeded. Retry after unknown seconds."
    );
}

#[tokio::test]
async fn test_api_error_uses_provider_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/services/srv-missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "id": "not-found",
            "message": "service not found"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/services/srv-broken"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let err = client(&server).services().get("srv-missing").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "API error (404): service not found");

    let err = client(&server).services().get("srv-broken").await.unwrap_err();
    assert!(err.is_server_error());
    match err {
        Error::Api { status, message } => {
            assert_eq!(status, 502);
            assert_eq!(message, "HTTP 502");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_body_and_query_are_omitted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/services/srv-abc123/restart"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let api = client(&server);
    let req = ApiRequest::post("/services/srv-abc123/restart")
        .body(serde_json::Map::new())
        .query(serde_json::Map::new());
    let value = api.request(req).await.unwrap();
    assert_eq!(value, Value::Null);

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    assert!(received[0].body.is_empty());
    assert!(received[0].url.query().is_none());
}

#[tokio::test]
async fn test_delete_returns_unit_on_no_content() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/services/srv-abc123"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client(&server).services().delete("srv-abc123").await.unwrap();
}

#[tokio::test]
async fn test_list_limit_sends_filters_and_unwraps() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/services"))
        .and(query_param("name", "api"))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"service": {"id": "srv-1"}, "cursor": "a"},
            {"service": {"id": "srv-2"}, "cursor": "b"},
            {"service": {"id": "srv-3"}, "cursor": "c"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let filters = ServiceFilters {
        name: Some("api".to_string()),
        ..Default::default()
    };
    let services = client(&server)
        .services()
        .list(&filters, ListMode::Limit(2))
        .await
        .unwrap();
    assert_eq!(services, vec![json!({"id": "srv-1"}), json!({"id": "srv-2"})]);
}

#[tokio::test]
async fn test_secret_file_name_is_encoded_and_contents_base64() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/services/srv-abc123/secret-files/config%2Fapp.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "config/app.json"})))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .secret_files()
        .set("srv-abc123", "config/app.json", "hello")
        .await
        .unwrap();

    let received = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&received[0].body).unwrap();
    assert_eq!(body, json!({"name": "config/app.json", "contents": "aGVsbG8="}));
}

#[tokio::test]
async fn test_remove_resources_sends_delete_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/projects/prj-1/environments/env-1/resources"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .environments()
        .remove_resources("prj-1", "env-1", vec!["srv-a".to_string(), "dpg-b".to_string()])
        .await
        .unwrap();

    let received = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&received[0].body).unwrap();
    assert_eq!(body, json!({"resourceIds": ["srv-a", "dpg-b"]}));
}

#[tokio::test]
async fn test_traversal_id_stays_in_its_own_path() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "not found"})))
        .mount(&server)
        .await;

    client(&server)
        .services()
        .delete("srv-/../../postgres/dpg-victim")
        .await
        .unwrap();
    let err = client(&server)
        .webhooks()
        .get("../services?ownerId=x")
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(
        requests[0].url.path(),
        "/services/srv-%2F..%2F..%2Fpostgres%2Fdpg-victim"
    );
    assert_eq!(requests[1].url.path(), "/webhooks/..%2Fservices%3FownerId%3Dx");
    assert_eq!(requests[1].url.query(), None);

    let err = client(&server).webhooks().delete("..").await.unwrap_err();
    assert!(matches!(err, Error::InvalidPath(_)));
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}
