use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use axum_test::TestServer;
use chat_relay::{handler::CORS_HEADERS, server};
use common::{mocks::MockTransport, test_utils::*};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt; // for `oneshot`

mod common;

fn create_test_server(transport: &MockTransport) -> TestServer {
    let app = server::router(Arc::new(raw_handler(transport)));
    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn test_invoke_returns_envelope() {
    let transport = MockTransport::new().with_json(raw_reply("Hello from the model", 2.5));
    let server = create_test_server(&transport);

    let event = json!({
        "body": json!({ "message": "Hello" }).to_string(),
        "requestContext": { "authorizer": { "claims": { "email": "ada@example.com" } } }
    });
    let response = server.post("/invoke").json(&event).await;

    response.assert_status_ok();
    let envelope: Value = response.json();
    assert_eq!(envelope["statusCode"], 200);
    assert_eq!(envelope["headers"]["Access-Control-Allow-Methods"], "OPTIONS,POST");

    let body: Value = serde_json::from_str(envelope["body"].as_str().unwrap()).unwrap();
    assert_eq!(
        body,
        json!({ "generated_text": "Hello from the model", "response_time": "2.500" })
    );
}

#[tokio::test]
async fn test_invoke_with_garbage_still_returns_envelope() {
    let transport = MockTransport::new();
    let server = create_test_server(&transport);

    let response = server.post("/invoke").text("definitely not json").await;

    response.assert_status_ok();
    let envelope: Value = response.json();
    assert_eq!(envelope["statusCode"], 500);
    assert_eq!(envelope["headers"]["Access-Control-Allow-Origin"], "*");
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn test_chat_proxy_success() {
    let transport = MockTransport::new().with_json(raw_reply("pong", 0.1));
    let server = create_test_server(&transport);

    let response = server.post("/chat").json(&json!({ "message": "ping" })).await;

    response.assert_status_ok();
    for (name, value) in CORS_HEADERS {
        assert_eq!(response.header(name), value);
    }
    let body: Value = response.json();
    assert_eq!(body["generated_text"], "pong");
    assert_eq!(body["response_time"], "0.100");
}

#[tokio::test]
async fn test_chat_proxy_missing_message() {
    let transport = MockTransport::new();
    let server = create_test_server(&transport);

    let response = server
        .post("/chat")
        .json(&json!({ "conversationHistory": [] }))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.header("Access-Control-Allow-Origin"), "*");
    let body: Value = response.json();
    assert_eq!(body["detail"][0]["type"], "server_error");
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn test_chat_preflight() {
    let transport = MockTransport::new();
    let app = server::router(Arc::new(raw_handler(&transport)));

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/chat")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["Access-Control-Allow-Headers"],
        "Content-Type,X-Amz-Date,Authorization,X-Api-Key,X-Amz-Security-Token"
    );
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn test_unknown_route() {
    let transport = MockTransport::new();
    let server = create_test_server(&transport);

    let response = server.get("/chat").expect_failure().await;

    assert_eq!(response.status_code(), StatusCode::METHOD_NOT_ALLOWED);
}
