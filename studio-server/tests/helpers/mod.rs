//! Shared test harness: in-memory database, scripted LLM backend and
//! request helpers

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::SqlitePool;
use std::sync::{Arc, Mutex};
use studio_server::agents::{AgentError, AgentHub, ChatMessage, CompletionBackend};
use studio_server::{AppState, ServerSettings};
use tower::util::ServiceExt;

type Responder = dyn Fn(&str, &[ChatMessage]) -> Result<String, AgentError> + Send + Sync;

/// One recorded backend call
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub system: String,
    pub messages: Vec<ChatMessage>,
}

/// LLM stand-in answering from a closure and recording every call
pub struct ScriptedBackend {
    responder: Box<Responder>,
    calls: Mutex<Vec<RecordedCall>>,
    /// Statement run once against the pool while the next call is in flight
    interleave: Mutex<Option<(SqlitePool, String)>>,
}

impl ScriptedBackend {
    pub fn new<F>(responder: F) -> Arc<Self>
    where
        F: Fn(&str, &[ChatMessage]) -> Result<String, AgentError> + Send + Sync + 'static,
    {
        Arc::new(Self {
            responder: Box::new(responder),
            calls: Mutex::new(Vec::new()),
            interleave: Mutex::new(None),
        })
    }

    /// Always answers with `reply`
    pub fn fixed(reply: &str) -> Arc<Self> {
        let reply = reply.to_string();
        Self::new(move |_, _| Ok(reply.clone()))
    }

    /// Always fails like an unreachable provider
    pub fn failing() -> Arc<Self> {
        Self::new(|_, _| Err(AgentError::Network("connection refused".to_string())))
    }

    /// Execute `sql` during the next completion, as a concurrent request would
    pub fn interleave_sql(&self, pool: &SqlitePool, sql: &str) {
        *self.interleave.lock().unwrap() = Some((pool.clone(), sql.to_string()));
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Text of the last user message of the most recent call
    pub fn last_prompt(&self) -> String {
        self.calls()
            .last()
            .and_then(|c| c.messages.last().map(|m| m.content.clone()))
            .unwrap_or_default()
    }
}

#[async_trait]
impl CompletionBackend for ScriptedBackend {
    async fn complete(
        &self,
        system: &str,
        messages: &[ChatMessage],
        _max_tokens: u32,
    ) -> Result<String, AgentError> {
        self.calls.lock().unwrap().push(RecordedCall {
            system: system.to_string(),
            messages: messages.to_vec(),
        });
        let pending = self.interleave.lock().unwrap().take();
        if let Some((pool, sql)) = pending {
            sqlx::query(&sql).execute(&pool).await.unwrap();
        }
        (self.responder)(system, messages)
    }
}

pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
}

/// App over an in-memory database with the given backend
pub async fn test_app(backend: Arc<dyn CompletionBackend>) -> TestApp {
    test_app_with_settings(backend, ServerSettings::default()).await
}

pub async fn test_app_with_settings(
    backend: Arc<dyn CompletionBackend>,
    settings: ServerSettings,
) -> TestApp {
    let pool = studio_common::db::init_memory_database()
        .await
        .expect("Failed to create in-memory database");

    let state = AppState::new(pool.clone(), AgentHub::new(backend, 512), settings);

    TestApp {
        router: studio_server::build_router(state),
        pool,
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub bytes: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.bytes).unwrap_or(Value::Null)
    }

    /// `name=value` part of the session `Set-Cookie` header
    pub fn session_cookie(&self) -> Option<String> {
        self.set_cookie()
            .and_then(|c| c.split(';').next().map(str::to_string))
    }

    pub fn set_cookie(&self) -> Option<String> {
        self.headers
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }
}

impl TestApp {
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        cookie: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .into_body()
            .collect()
            .await
            .unwrap()
            .to_bytes()
            .to_vec();

        TestResponse {
            status,
            headers,
            bytes,
        }
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
        self.request(Method::GET, uri, None, cookie).await
    }

    pub async fn post(&self, uri: &str, body: Value, cookie: Option<&str>) -> TestResponse {
        self.request(Method::POST, uri, Some(body), cookie).await
    }

    pub async fn put(&self, uri: &str, body: Value, cookie: Option<&str>) -> TestResponse {
        self.request(Method::PUT, uri, Some(body), cookie).await
    }

    pub async fn delete(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
        self.request(Method::DELETE, uri, None, cookie).await
    }

    /// Register `username` and return its session cookie
    pub async fn register(&self, username: &str) -> String {
        let response = self
            .post(
                "/api/register",
                serde_json::json!({
                    "username": username,
                    "email": format!("{}@example.com", username),
                    "password": "secret123",
                }),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.json());
        response.session_cookie().expect("session cookie")
    }
}
