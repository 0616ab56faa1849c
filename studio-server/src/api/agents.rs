//! Persona agent endpoints

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::post,
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ok, ApiJson};
use crate::agents::{
    AgentError, AgentName, AvatarConceptRequest, ChatMessage, MusicPromptRequest,
    VoicePromptRequest,
};
use crate::error::{ApiError, ApiResult, FieldErrors};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
    #[serde(default)]
    pub history: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
pub struct AgentReply {
    pub reply: String,
    pub agent: AgentName,
}

/// Resolve the `:agent_name` path segment, requiring `expected` when given
fn resolve(slug: &str, expected: Option<AgentName>) -> ApiResult<AgentName> {
    let agent = AgentName::from_slug(slug)
        .ok_or_else(|| AgentError::UnknownAgent(slug.to_string()))?;
    match expected {
        Some(expected) if expected != agent => Err(ApiError::NotFound(format!(
            "{} does not offer this service",
            agent.slug()
        ))),
        _ => Ok(agent),
    }
}

fn reply(agent: AgentName, text: String) -> impl IntoResponse {
    ok(AgentReply { reply: text, agent })
}

/// POST /api/agents/:agent_name/chat
pub async fn chat(
    State(state): State<AppState>,
    Path(agent_name): Path<String>,
    ApiJson(req): ApiJson<ChatRequest>,
) -> ApiResult<impl IntoResponse> {
    let agent = resolve(&agent_name, None)?;

    let message = req.message.as_deref().map(str::trim).unwrap_or_default();
    if message.is_empty() {
        return Err(ApiError::BadRequest("Message is required".to_string()));
    }

    debug!(agent = agent.slug(), history = req.history.len(), "Agent chat");
    let text = state.agents.chat(agent, message, &req.history).await?;
    Ok(reply(agent, text))
}

/// POST /api/agents/kairo/music-prompt
pub async fn music_prompt(
    State(state): State<AppState>,
    Path(agent_name): Path<String>,
    ApiJson(req): ApiJson<MusicPromptRequest>,
) -> ApiResult<impl IntoResponse> {
    let agent = resolve(&agent_name, Some(AgentName::Kairo))?;

    let mut errors = FieldErrors::new();
    if req.genre.trim().is_empty() {
        errors.add("genre", "Genre is required");
    }
    if req.mood.trim().is_empty() {
        errors.add("mood", "Mood is required");
    }
    errors.into_result()?;

    let text = state.agents.music_prompt(&req).await?;
    Ok(reply(agent, text))
}

/// POST /api/agents/viya/avatar-concept
pub async fn avatar_concept(
    State(state): State<AppState>,
    Path(agent_name): Path<String>,
    ApiJson(req): ApiJson<AvatarConceptRequest>,
) -> ApiResult<impl IntoResponse> {
    let agent = resolve(&agent_name, Some(AgentName::Viya))?;

    let mut errors = FieldErrors::new();
    if req.style.trim().is_empty() {
        errors.add("style", "Style is required");
    }
    errors.into_result()?;

    let text = state.agents.avatar_concept(&req).await?;
    Ok(reply(agent, text))
}

/// POST /api/agents/stacy/voice-prompt
pub async fn voice_prompt(
    State(state): State<AppState>,
    Path(agent_name): Path<String>,
    ApiJson(req): ApiJson<VoicePromptRequest>,
) -> ApiResult<impl IntoResponse> {
    let agent = resolve(&agent_name, Some(AgentName::Stacy))?;

    let mut errors = FieldErrors::new();
    if req.tone.trim().is_empty() {
        errors.add("tone", "Tone is required");
    }
    if req.emotion.trim().is_empty() {
        errors.add("emotion", "Emotion is required");
    }
    errors.into_result()?;

    let text = state.agents.voice_prompt(&req).await?;
    Ok(reply(agent, text))
}

/// Task routes share the `:agent_name` segment with chat; each handler
/// checks that the named agent offers the task.
pub fn agent_routes() -> Router<AppState> {
    Router::new()
        .route("/api/agents/:agent_name/chat", post(chat))
        .route("/api/agents/:agent_name/music-prompt", post(music_prompt))
        .route("/api/agents/:agent_name/avatar-concept", post(avatar_concept))
        .route("/api/agents/:agent_name/voice-prompt", post(voice_prompt))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve() {
        assert_eq!(resolve("kairo", None).unwrap(), AgentName::Kairo);
        assert_eq!(
            resolve("Kairo", Some(AgentName::Kairo)).unwrap(),
            AgentName::Kairo
        );
        assert!(matches!(
            resolve("viya", Some(AgentName::Kairo)),
            Err(ApiError::NotFound(_))
        ));
        assert!(matches!(
            resolve("hal", None),
            Err(ApiError::AgentUnavailable(AgentError::UnknownAgent(_)))
        ));
    }
}
