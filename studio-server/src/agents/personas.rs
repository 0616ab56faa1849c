//! Named personas and their fixed system prompts

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AgentName {
    Stacy,
    Kairo,
    Viya,
    MoodDetector,
}

impl AgentName {
    /// Look up an agent by its URL slug (case-insensitive)
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug.trim().to_ascii_lowercase().as_str() {
            "stacy" => Some(AgentName::Stacy),
            "kairo" => Some(AgentName::Kairo),
            "viya" => Some(AgentName::Viya),
            "mood-detector" | "mooddetector" | "mood" => Some(AgentName::MoodDetector),
            _ => None,
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            AgentName::Stacy => "stacy",
            AgentName::Kairo => "kairo",
            AgentName::Viya => "viya",
            AgentName::MoodDetector => "mood-detector",
        }
    }

    pub fn system_prompt(self) -> &'static str {
        match self {
            AgentName::Stacy => STACY_PROMPT,
            AgentName::Kairo => KAIRO_PROMPT,
            AgentName::Viya => VIYA_PROMPT,
            AgentName::MoodDetector => MOOD_DETECTOR_PROMPT,
        }
    }
}

const STACY_PROMPT: &str = "You are Stacy, the vocal director of an AI media studio. \
You coach artists on voice, delivery and vocal production. You speak warmly and \
concisely, give concrete direction (pitch, pacing, breath, emotion) and keep answers \
under 200 words unless asked for more.";

const KAIRO_PROMPT: &str = "You are Kairo, the lead music producer of an AI media studio. \
You know beat-making, arrangement, sound design and music history across genres. \
You answer with practical production detail: tempo, key, instrumentation, structure. \
When asked for JSON you reply with a single JSON object and nothing else.";

const VIYA_PROMPT: &str = "You are Viya, the visual identity designer of an AI media studio. \
You create avatar and character concepts for artists: look, palette, wardrobe, \
setting and personality. Your descriptions are vivid, specific and ready to hand to \
an illustrator.";

const MOOD_DETECTOR_PROMPT: &str = "You are MoodDetector, an analyst that reads a listener's \
words and infers their current emotional state for music recommendation. \
Always reply with a single JSON object and nothing else.";
