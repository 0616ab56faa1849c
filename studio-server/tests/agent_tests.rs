//! Persona agent endpoints

mod helpers;

use axum::http::StatusCode;
use helpers::{test_app, ScriptedBackend};
use serde_json::json;
use std::sync::Arc;
use studio_common::config::LlmConfig;
use studio_server::agents::{AnthropicClient, Role};

#[tokio::test]
async fn test_chat_with_history() {
    let backend = ScriptedBackend::fixed("Try a swung hi-hat at 92 BPM.");
    let app = test_app(backend.clone()).await;

    let response = app
        .post(
            "/api/agents/kairo/chat",
            json!({
                "message": "How do I make my drums groove?",
                "history": [
                    {"role": "user", "content": "Hi Kairo"},
                    {"role": "assistant", "content": "Hey! What are we building?"}
                ]
            }),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let data = &response.json()["data"];
    assert_eq!(data["reply"], "Try a swung hi-hat at 92 BPM.");
    assert_eq!(data["agent"], "kairo");

    let call = &backend.calls()[0];
    assert!(call.system.contains("Kairo"));
    assert_eq!(call.messages.len(), 3);
    assert_eq!(call.messages[1].role, Role::Assistant);
    assert_eq!(call.messages[2].content, "How do I make my drums groove?");
}

#[tokio::test]
async fn test_chat_errors() {
    let app = test_app(ScriptedBackend::fixed("unused")).await;

    let unknown = app
        .post("/api/agents/hal/chat", json!({"message": "Open the pod bay doors"}), None)
        .await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
    assert_eq!(unknown.json()["success"], false);

    let empty = app
        .post("/api/agents/stacy/chat", json!({"message": "   "}), None)
        .await;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_task_endpoints() {
    let backend = ScriptedBackend::fixed("Detailed direction.");
    let app = test_app(backend.clone()).await;

    let music = app
        .post(
            "/api/agents/kairo/music-prompt",
            json!({"genre": "lo-fi", "mood": "nostalgic", "bpm": 78, "instruments": ["rhodes", "vinyl crackle"]}),
            None,
        )
        .await;
    assert_eq!(music.status, StatusCode::OK);
    assert_eq!(music.json()["data"]["agent"], "kairo");
    let prompt = backend.last_prompt();
    assert!(prompt.contains("lo-fi"));
    assert!(prompt.contains("78 BPM"));
    assert!(prompt.contains("rhodes, vinyl crackle"));

    let avatar = app
        .post(
            "/api/agents/viya/avatar-concept",
            json!({"style": "anime", "personality": "mysterious"}),
            None,
        )
        .await;
    assert_eq!(avatar.status, StatusCode::OK);
    assert_eq!(avatar.json()["data"]["agent"], "viya");
    assert!(backend.calls().last().unwrap().system.contains("Viya"));

    let voice = app
        .post(
            "/api/agents/stacy/voice-prompt",
            json!({"tone": "warm", "emotion": "calm", "text": "Welcome back"}),
            None,
        )
        .await;
    assert_eq!(voice.status, StatusCode::OK);
    assert!(backend.last_prompt().contains("Welcome back"));

    let missing = app
        .post("/api/agents/kairo/music-prompt", json!({"genre": "house"}), None)
        .await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    assert!(missing.json()["errors"]["mood"].is_string());

    let wrong_agent = app
        .post(
            "/api/agents/viya/music-prompt",
            json!({"genre": "house", "mood": "happy"}),
            None,
        )
        .await;
    assert_eq!(wrong_agent.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unconfigured_client_reports_agent_unavailable() {
    let client = AnthropicClient::new(&LlmConfig {
        api_key: None,
        model: "test".to_string(),
        base_url: "http://127.0.0.1:9".to_string(),
        max_tokens: 64,
        timeout_secs: 1,
    })
    .unwrap();
    let app = test_app(Arc::new(client)).await;

    let response = app
        .post("/api/agents/viya/chat", json!({"message": "Design me"}), None)
        .await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json()["message"],
        "Agent unavailable, please try again later"
    );
}
