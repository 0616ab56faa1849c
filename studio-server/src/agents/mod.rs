//! LLM persona agents
//!
//! Each agent (Stacy, Kairo, Viya, MoodDetector) is a fixed system prompt
//! in front of a single chat-completion call.

pub mod backend;
pub mod hub;
pub mod parse;
pub mod personas;

pub use backend::{AgentError, AnthropicClient, ChatMessage, CompletionBackend, Role};
pub use hub::{
    AgentHub, AvatarConceptRequest, CompositionDraft, MixtapeDraft, MoodReading,
    MusicPromptRequest, VoicePromptRequest,
};
pub use personas::AgentName;
