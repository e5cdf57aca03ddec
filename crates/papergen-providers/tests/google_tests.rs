//! Gemini provider tests against a mock API

use mockito::Matcher;
use papergen_providers::{ChatRequest, GoogleProvider, Provider, ProviderError};
use serde_json::json;

const MODEL_PATH: &str = "/v1beta/models/gemini-1.5-flash:generateContent";

fn provider(server: &mockito::ServerGuard) -> GoogleProvider {
    GoogleProvider::with_base_url(
        "test-key".to_string(),
        format!("{}/v1beta/models", server.url()),
    )
    .unwrap()
}

fn request() -> ChatRequest {
    ChatRequest::with_system(
        "gemini-1.5-flash",
        "You are an academic writer.",
        "Write the introduction.",
    )
    .temperature(0.7)
}

#[tokio::test]
async fn test_chat_success() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", MODEL_PATH)
        .match_header("x-goog-api-key", "test-key")
        .match_body(Matcher::PartialJson(json!({
            "systemInstruction": { "parts": [{ "text": "You are an academic writer." }] },
            "contents": [{ "role": "user", "parts": [{ "text": "Write the introduction." }] }]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "candidates": [{
                    "content": { "role": "model", "parts": [{ "text": "Software shapes research." }] },
                    "finishReason": "STOP"
                }],
                "usageMetadata": { "promptTokenCount": 10, "candidatesTokenCount": 4, "totalTokenCount": 14 }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let response = provider(&server).chat(request()).await.unwrap();

    assert_eq!(response.content, "Software shapes research.");
    assert_eq!(response.model, "gemini-1.5-flash");
    assert_eq!(response.usage.prompt_tokens, 10);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_chat_auth_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", MODEL_PATH)
        .with_status(403)
        .with_body(r#"{"error": {"message": "API key not valid"}}"#)
        .create_async()
        .await;

    let err = provider(&server).chat(request()).await.unwrap_err();
    assert_eq!(err, ProviderError::AuthError);
}

#[tokio::test]
async fn test_chat_rate_limited() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", MODEL_PATH)
        .with_status(429)
        .create_async()
        .await;

    let err = provider(&server).chat(request()).await.unwrap_err();
    assert!(matches!(err, ProviderError::RateLimited(_)));
}

#[tokio::test]
async fn test_chat_server_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", MODEL_PATH)
        .with_status(500)
        .create_async()
        .await;

    let err = provider(&server).chat(request()).await.unwrap_err();
    assert!(matches!(err, ProviderError::ProviderError(_)));
}

#[tokio::test]
async fn test_chat_empty_candidates() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", MODEL_PATH)
        .with_status(200)
        .with_body(r#"{"candidates": []}"#)
        .create_async()
        .await;

    let err = provider(&server).chat(request()).await.unwrap_err();
    assert!(matches!(err, ProviderError::ProviderError(_)));
}

#[tokio::test]
async fn test_chat_invalid_model() {
    let server = mockito::Server::new_async().await;
    let mut req = request();
    req.model = "claude".to_string();
    let err = provider(&server).chat(req).await.unwrap_err();
    assert_eq!(err, ProviderError::InvalidModel("claude".to_string()));
}

#[tokio::test]
async fn test_health_check() {
    let mut server = mockito::Server::new_async().await;
    let _ok = server
        .mock("GET", "/v1beta/models")
        .match_header("x-goog-api-key", "test-key")
        .with_status(200)
        .with_body(r#"{"models": []}"#)
        .create_async()
        .await;

    assert!(provider(&server).health_check().await.unwrap());
}

#[tokio::test]
async fn test_health_check_auth_failure() {
    let mut server = mockito::Server::new_async().await;
    let _denied = server
        .mock("GET", "/v1beta/models")
        .with_status(401)
        .create_async()
        .await;

    let err = provider(&server).health_check().await.unwrap_err();
    assert_eq!(err, ProviderError::AuthError);
}
