use hiring_chat::chat::{ChatService, FALLBACK_REPLIES};
use hiring_chat::core::config_manager::GatewayConfig;
use hiring_chat::core::{ChatConfig, Strategy};
use hiring_chat::build_rocket;
use httpmock::prelude::*;
use rocket::http::{ContentType, Status};
use rocket::local::asynchronous::Client;
use serde_json::{json, Value};
use std::time::{Duration, Instant};

async fn client_for(config: ChatConfig) -> Client {
    let service = ChatService::new(config).expect("service should build");
    Client::tracked(build_rocket(service, 0))
        .await
        .expect("valid rocket instance")
}

fn unconfigured() -> ChatConfig {
    ChatConfig {
        gateway: GatewayConfig {
            api_key: None,
            base_url: "http://127.0.0.1:1".to_string(),
            ..GatewayConfig::default()
        },
        ..ChatConfig::default()
    }
}

async fn post_chat(client: &Client, body: &str) -> (Status, Value) {
    let response = client
        .post("/api/chat")
        .header(ContentType::JSON)
        .body(body)
        .dispatch()
        .await;
    let status = response.status();
    let json = response.into_json::<Value>().await.expect("json body");
    (status, json)
}

#[rocket::async_test]
async fn chat_route_returns_gateway_reply() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/chat/completions");
        then.status(200)
            .json_body(json!({"choices": [{"message": {"role": "assistant", "content": "Hello"}}]}));
    });

    let client = client_for(ChatConfig {
        gateway: GatewayConfig {
            api_key: Some("test-key".to_string()),
            base_url: server.base_url(),
            ..GatewayConfig::default()
        },
        ..ChatConfig::default()
    })
    .await;

    let (status, body) = post_chat(&client, r#"{"messages":[{"role":"user","content":"Hi"}]}"#).await;
    assert_eq!(status, Status::Ok);
    assert_eq!(body, json!({"role": "assistant", "content": "Hello"}));
}

fn slow_gateway(server: &MockServer, delay: Duration) {
    server.mock(|when, then| {
        when.method(POST).path("/chat/completions");
        then.status(200)
            .delay(delay)
            .json_body(json!({"choices": [{"message": {"role": "assistant", "content": "too late"}}]}));
    });
}

fn configured(server: &MockServer, timeout_seconds: u64) -> ChatConfig {
    ChatConfig {
        gateway: GatewayConfig {
            api_key: Some("test-key".to_string()),
            base_url: server.base_url(),
            timeout_seconds,
            ..GatewayConfig::default()
        },
        ..ChatConfig::default()
    }
}

fn assert_fallback_reply(body: &Value) {
    assert_eq!(body["role"], "assistant");
    let content = body["content"].as_str().expect("content string");
    assert!(FALLBACK_REPLIES.contains(&content), "unexpected reply: {}", content);
}

#[rocket::async_test]
async fn chat_route_shutdown_abandons_gateway_call() {
    let server = MockServer::start();
    slow_gateway(&server, Duration::from_secs(8));
    let client = client_for(configured(&server, 30)).await;

    let shutdown = client.rocket().shutdown();
    let started = Instant::now();
    let request = post_chat(&client, r#"{"messages":[{"role":"user","content":"Hi"}]}"#);
    let trigger = async {
        tokio::time::sleep(Duration::from_millis(300)).await;
        shutdown.notify();
    };
    let ((status, body), ()) = tokio::join!(request, trigger);

    assert!(started.elapsed() < Duration::from_secs(4));
    assert_eq!(status, Status::Ok);
    assert_fallback_reply(&body);
}

#[rocket::async_test]
async fn chat_route_abandoned_exchange_is_bounded_by_gateway_timeout() {
    let server = MockServer::start();
    slow_gateway(&server, Duration::from_millis(3_000));
    let client = client_for(configured(&server, 1)).await;

    let started = Instant::now();
    let (status, body) =
        post_chat(&client, r#"{"messages":[{"role":"user","content":"Hi"}]}"#).await;

    assert!(started.elapsed() < Duration::from_millis(2_500));
    assert_eq!(status, Status::Ok);
    assert_fallback_reply(&body);
}

#[rocket::async_test]
async fn chat_route_rejects_oversized_body() {
    let client = client_for(unconfigured()).await;

    let body = format!(
        r#"{{"messages":[{{"role":"user","content":"{}"}}]}}"#,
        "x".repeat(1024 * 1024 + 64)
    );
    let (status, json) = post_chat(&client, &body).await;

    assert_eq!(status, Status::PayloadTooLarge);
    assert_eq!(json["error_code"], "PAYLOAD_TOO_LARGE");
}

#[rocket::async_test]
async fn chat_route_answers_200_with_fallback_when_unconfigured() {
    let client = client_for(unconfigured()).await;

    let (status, body) = post_chat(
        &client,
        r#"{"messages":[{"role":"user","content":"Hi"},{"role":"assistant","content":"Hello"},{"role":"user","content":"Any roles open?"}]}"#,
    )
    .await;

    assert_eq!(status, Status::Ok);
    assert_eq!(body["role"], "assistant");
    let content = body["content"].as_str().expect("content string");
    assert!(FALLBACK_REPLIES.contains(&content));
    assert_eq!(body.as_object().map(|o| o.len()), Some(2));
}

#[rocket::async_test]
async fn chat_route_rejects_malformed_bodies_with_error_field() {
    let client = client_for(unconfigured()).await;

    for body in [
        r#"{}"#,
        r#"{"messages":"hello"}"#,
        r#"{"messages":[]}"#,
        r#"{"messages":[{"role":"robot","content":"x"}]}"#,
        "definitely not json",
    ] {
        let (status, json) = post_chat(&client, body).await;
        assert_eq!(status, Status::BadRequest, "{}", body);
        assert!(json["error"].is_string(), "{}", body);
        assert_eq!(json["error_code"], "INVALID_REQUEST");
        assert_eq!(json["success"], false);
    }
}

#[rocket::async_test]
async fn chat_route_scripted_strategy() {
    let client = client_for(ChatConfig {
        strategy: Strategy::ScriptedFallback,
        ..unconfigured()
    })
    .await;

    let (status, body) =
        post_chat(&client, r#"{"messages":[{"role":"user","content":"hello, interview help?"}]}"#).await;
    assert_eq!(status, Status::Ok);
    assert!(body["content"].as_str().unwrap_or_default().starts_with("Hello!"));
}

#[rocket::async_test]
async fn health_reports_configuration() {
    let client = client_for(unconfigured()).await;

    for path in ["/api/health", "/api/test"] {
        let response = client.get(path).dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        let body = response.into_json::<Value>().await.expect("json body");
        assert_eq!(body["status"], "ok");
        assert_eq!(body["api_key_configured"], false);
        assert_eq!(body["strategy"], "remote");
        assert!(body["message"].is_string());
        assert!(chrono::DateTime::parse_from_rfc3339(body["timestamp"].as_str().unwrap()).is_ok());
    }
}

#[rocket::async_test]
async fn cors_headers_and_preflight() {
    let client = client_for(unconfigured()).await;

    let response = client.options("/api/chat").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    assert_eq!(
        response.headers().get_one("Access-Control-Allow-Origin"),
        Some("*")
    );
}

#[rocket::async_test]
async fn unknown_route_uses_json_catcher() {
    let client = client_for(unconfigured()).await;

    let response = client.get("/api/nope").dispatch().await;
    assert_eq!(response.status(), Status::NotFound);
    let body = response.into_json::<Value>().await.expect("json body");
    assert_eq!(body["error_code"], "NOT_FOUND");
}
