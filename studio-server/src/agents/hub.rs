//! Persona agents: prompt construction and response shaping

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use studio_common::db::{ListeningHistoryEntry, MixtapeTrack, MoodMixtape};
use tracing::{info, warn};
use uuid::Uuid;

use super::parse::{
    clamp_range, clamp_unit, extract_json, lenient_f64, lenient_list, lenient_seq, lenient_string,
    non_empty_or,
};
use super::{AgentError, AgentName, ChatMessage, CompletionBackend};

pub const DEFAULT_MIXTAPE_TRACKS: usize = 10;
pub const MIN_MIXTAPE_TRACKS: usize = 5;
pub const MAX_MIXTAPE_TRACKS: usize = 20;

/// Most recent history entries handed to Rhythm Roulette
pub const ROULETTE_HISTORY_WINDOW: i64 = 20;

/// Longest chat history forwarded to the model
const MAX_HISTORY_TURNS: usize = 20;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MusicPromptRequest {
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub mood: String,
    pub bpm: Option<u32>,
    pub instruments: Option<Vec<String>>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvatarConceptRequest {
    #[serde(default)]
    pub style: String,
    pub personality: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoicePromptRequest {
    #[serde(default)]
    pub tone: String,
    #[serde(default)]
    pub emotion: String,
    pub accent: Option<String>,
    pub text: Option<String>,
}

/// Parsed MoodDetector answer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodReading {
    pub mood: String,
    pub confidence: f64,
    pub energy: f64,
    pub valence: f64,
    pub description: String,
}

/// Mixtape content before it is stored
#[derive(Debug, Clone, PartialEq)]
pub struct MixtapeDraft {
    pub title: String,
    pub description: String,
    pub tracks: Vec<MixtapeTrack>,
}

/// Rhythm Roulette composition before it is stored
#[derive(Debug, Clone, PartialEq)]
pub struct CompositionDraft {
    pub title: String,
    pub description: String,
    pub genre: String,
    pub tempo: i64,
    pub mood: String,
    pub instruments: Vec<String>,
    pub structure: Vec<String>,
}

#[derive(Deserialize)]
struct RawMood {
    #[serde(default, deserialize_with = "lenient_string")]
    mood: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    confidence: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    energy: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    valence: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    description: Option<String>,
}

#[derive(Deserialize)]
struct RawTrack {
    #[serde(default, deserialize_with = "lenient_string")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    artist: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    genre: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    bpm: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    energy: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    reason: Option<String>,
}

#[derive(Deserialize)]
struct RawMixtape {
    #[serde(default, deserialize_with = "lenient_string")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    description: Option<String>,
    #[serde(default, deserialize_with = "lenient_seq")]
    tracks: Vec<RawTrack>,
}

#[derive(Deserialize)]
struct RawComposition {
    #[serde(default, deserialize_with = "lenient_string")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    description: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    genre: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    tempo: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    mood: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    instruments: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    structure: Vec<String>,
}

/// Owns the completion backend and exposes one method per agent task
#[derive(Clone)]
pub struct AgentHub {
    backend: Arc<dyn CompletionBackend>,
    max_tokens: u32,
}

impl AgentHub {
    pub fn new(backend: Arc<dyn CompletionBackend>, max_tokens: u32) -> Self {
        Self {
            backend,
            max_tokens,
        }
    }

    async fn ask(
        &self,
        agent: AgentName,
        messages: &[ChatMessage],
    ) -> Result<String, AgentError> {
        match self
            .backend
            .complete(agent.system_prompt(), messages, self.max_tokens)
            .await
        {
            Ok(text) => {
                info!(agent = agent.slug(), chars = text.len(), "Agent responded");
                Ok(text)
            }
            Err(e) => {
                warn!(agent = agent.slug(), error = %e, "Agent call failed");
                Err(e)
            }
        }
    }

    /// Free-form conversation with any persona
    pub async fn chat(
        &self,
        agent: AgentName,
        message: &str,
        history: &[ChatMessage],
    ) -> Result<String, AgentError> {
        let skip = history.len().saturating_sub(MAX_HISTORY_TURNS);
        let mut messages: Vec<ChatMessage> = history[skip..].to_vec();
        messages.push(ChatMessage::user(message));
        self.ask(agent, &messages).await
    }

    /// Kairo: production prompt for the beat generator
    pub async fn music_prompt(&self, req: &MusicPromptRequest) -> Result<String, AgentError> {
        let mut prompt = format!(
            "Write a detailed music production prompt for a {} track with a {} mood.",
            req.genre.trim(),
            req.mood.trim()
        );
        if let Some(bpm) = req.bpm {
            prompt.push_str(&format!(" Target tempo: {} BPM.", bpm));
        }
        if let Some(instruments) = req.instruments.as_ref().filter(|i| !i.is_empty()) {
            prompt.push_str(&format!(
                " Feature these instruments: {}.",
                instruments.join(", ")
            ));
        }
        if let Some(description) = non_blank(&req.description) {
            prompt.push_str(&format!(" Artist notes: {}.", description));
        }
        prompt.push_str(
            " Cover key, drum pattern, bassline, melody, arrangement and mix notes \
             in under 250 words.",
        );

        self.ask(AgentName::Kairo, &[ChatMessage::user(prompt)]).await
    }

    /// Viya: avatar concept description
    pub async fn avatar_concept(&self, req: &AvatarConceptRequest) -> Result<String, AgentError> {
        let mut prompt = format!("Design an artist avatar in a {} style.", req.style.trim());
        if let Some(personality) = non_blank(&req.personality) {
            prompt.push_str(&format!(" Personality: {}.", personality));
        }
        if let Some(description) = non_blank(&req.description) {
            prompt.push_str(&format!(" Notes from the artist: {}.", description));
        }
        prompt.push_str(
            " Describe appearance, color palette, wardrobe, signature pose and backdrop.",
        );

        self.ask(AgentName::Viya, &[ChatMessage::user(prompt)]).await
    }

    /// Stacy: direction for a voice-clone take
    pub async fn voice_prompt(&self, req: &VoicePromptRequest) -> Result<String, AgentError> {
        let mut prompt = format!(
            "Write vocal direction for a {} voice delivering with {} emotion.",
            req.tone.trim(),
            req.emotion.trim()
        );
        if let Some(accent) = non_blank(&req.accent) {
            prompt.push_str(&format!(" Accent: {}.", accent));
        }
        if let Some(text) = non_blank(&req.text) {
            prompt.push_str(&format!(" The line to perform is: \"{}\".", text));
        }
        prompt.push_str(" Include pacing, emphasis, breath and pitch guidance.");

        self.ask(AgentName::Stacy, &[ChatMessage::user(prompt)]).await
    }

    /// MoodDetector: infer mood from free text
    pub async fn detect_mood(&self, text: &str) -> Result<MoodReading, AgentError> {
        let prompt = format!(
            "Analyze the emotional state expressed in the text below. Respond with JSON only:\n\
             {{\"mood\": \"<one lowercase word>\", \"confidence\": <0-1>, \"energy\": <0-1>, \
             \"valence\": <0-1>, \"description\": \"<one sentence>\"}}\n\nText: \"{}\"",
            text.trim()
        );

        let reply = self
            .ask(AgentName::MoodDetector, &[ChatMessage::user(prompt)])
            .await?;
        let raw: RawMood = extract_json(&reply)?;

        Ok(MoodReading {
            mood: non_empty_or(raw.mood.map(|m| m.to_lowercase()), "neutral"),
            confidence: clamp_unit(raw.confidence, 0.5),
            energy: clamp_unit(raw.energy, 0.5),
            valence: clamp_unit(raw.valence, 0.5),
            description: non_empty_or(raw.description, ""),
        })
    }

    /// Kairo: new mixtape for a mood
    pub async fn generate_mixtape(
        &self,
        mood: &str,
        energy: f64,
        track_count: usize,
        title_hint: Option<&str>,
    ) -> Result<MixtapeDraft, AgentError> {
        let mut prompt = format!(
            "Curate a mixtape of exactly {} real, existing songs for a listener who feels {} \
             with an energy level of {:.2} (0 = very calm, 1 = very intense).",
            track_count,
            mood.trim(),
            energy
        );
        if let Some(title) = title_hint.filter(|t| !t.trim().is_empty()) {
            prompt.push_str(&format!(" The mixtape is called \"{}\".", title.trim()));
        }
        prompt.push_str(MIXTAPE_FORMAT);

        let reply = self.ask(AgentName::Kairo, &[ChatMessage::user(prompt)]).await?;
        let raw: RawMixtape = extract_json(&reply)?;
        into_draft(raw, track_count, title_hint.unwrap_or(""), mood)
    }

    /// Kairo: rework an existing mixtape for a new mood
    pub async fn adapt_mixtape(
        &self,
        current: &MoodMixtape,
        new_mood: &str,
        feedback: Option<&str>,
    ) -> Result<MixtapeDraft, AgentError> {
        let track_count = current
            .tracks
            .0
            .len()
            .clamp(MIN_MIXTAPE_TRACKS, MAX_MIXTAPE_TRACKS);

        let listing: String = current
            .tracks
            .0
            .iter()
            .map(|t| format!("- {} by {} ({}, {} BPM)\n", t.title, t.artist, t.genre, t.bpm))
            .collect();

        let mut prompt = format!(
            "This mixtape, \"{}\", was built for a {} mood:\n{}\nThe listener now feels {}. \
             Adapt it into exactly {} tracks, keeping songs that still fit and replacing the rest.",
            current.title,
            current.mood,
            listing,
            new_mood.trim(),
            track_count
        );
        if let Some(feedback) = feedback.filter(|f| !f.trim().is_empty()) {
            prompt.push_str(&format!(" Listener feedback: {}.", feedback.trim()));
        }
        prompt.push_str(MIXTAPE_FORMAT);

        let reply = self.ask(AgentName::Kairo, &[ChatMessage::user(prompt)]).await?;
        let raw: RawMixtape = extract_json(&reply)?;
        into_draft(raw, track_count, &current.title, new_mood)
    }

    /// Kairo: Rhythm Roulette composition seeded by listening history
    pub async fn compose_roulette(
        &self,
        history: &[ListeningHistoryEntry],
        genre_hint: Option<&str>,
        mood_hint: Option<&str>,
    ) -> Result<CompositionDraft, AgentError> {
        let mut prompt =
            String::from("Invent an original composition concept for this listener.");

        if history.is_empty() {
            prompt.push_str(" They have no listening history yet, so surprise them.");
        } else {
            prompt.push_str(" Their recent listening:\n");
            for entry in history {
                prompt.push_str(&format!("- {} by {}", entry.track_title, entry.artist));
                let details: Vec<String> = [
                    entry.genre.clone(),
                    entry.mood.clone(),
                    entry.tempo.map(|t| format!("{} BPM", t)),
                ]
                .into_iter()
                .flatten()
                .collect();
                if !details.is_empty() {
                    prompt.push_str(&format!(" ({})", details.join(", ")));
                }
                prompt.push('\n');
            }
        }
        if let Some(genre) = genre_hint.filter(|g| !g.trim().is_empty()) {
            prompt.push_str(&format!(" Lean towards {}.", genre.trim()));
        }
        if let Some(mood) = mood_hint.filter(|m| !m.trim().is_empty()) {
            prompt.push_str(&format!(" Target a {} mood.", mood.trim()));
        }
        prompt.push_str(
            " Respond with JSON only: {\"title\": \"...\", \"description\": \"...\", \
             \"genre\": \"...\", \"tempo\": <60-200>, \"mood\": \"...\", \
             \"instruments\": [\"...\"], \"structure\": [\"intro\", \"...\"]}",
        );

        let reply = self.ask(AgentName::Kairo, &[ChatMessage::user(prompt)]).await?;
        let raw: RawComposition = extract_json(&reply)?;

        Ok(CompositionDraft {
            title: non_empty_or(raw.title, "Untitled Roulette"),
            description: non_empty_or(raw.description, ""),
            genre: non_empty_or(
                raw.genre.or_else(|| genre_hint.map(str::to_string)),
                "experimental",
            ),
            tempo: clamp_range(raw.tempo, 60.0, 200.0, 100.0).round() as i64,
            mood: non_empty_or(
                raw.mood.or_else(|| mood_hint.map(str::to_string)),
                "eclectic",
            ),
            instruments: clean_list(raw.instruments),
            structure: clean_list(raw.structure),
        })
    }
}

const MIXTAPE_FORMAT: &str = " Respond with JSON only: \
{\"title\": \"...\", \"description\": \"...\", \
\"tracks\": [{\"title\": \"...\", \"artist\": \"...\", \"genre\": \"...\", \"bpm\": <number>, \
\"energy\": <0-1>, \"reason\": \"why it fits\"}]}";

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn clean_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn into_draft(
    raw: RawMixtape,
    limit: usize,
    fallback_title: &str,
    mood: &str,
) -> Result<MixtapeDraft, AgentError> {
    let tracks = normalize_tracks(raw.tracks, limit);
    if tracks.is_empty() {
        return Err(AgentError::Parse(
            "Mixtape response contained no usable tracks".to_string(),
        ));
    }

    let default_title = if fallback_title.trim().is_empty() {
        format!("{} Mixtape", capitalize(mood.trim()))
    } else {
        fallback_title.trim().to_string()
    };

    Ok(MixtapeDraft {
        title: non_empty_or(raw.title, &default_title),
        description: non_empty_or(raw.description, ""),
        tracks,
    })
}

/// Drop tracks without a title, clamp numeric fields, assign ids
fn normalize_tracks(raw: Vec<RawTrack>, limit: usize) -> Vec<MixtapeTrack> {
    raw.into_iter()
        .filter_map(|t| {
            let title = t
                .title
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())?;
            Some(MixtapeTrack {
                id: Uuid::new_v4(),
                title,
                artist: non_empty_or(t.artist, "Unknown Artist"),
                genre: non_empty_or(t.genre, "unknown"),
                bpm: clamp_range(t.bpm, 40.0, 220.0, 100.0).round() as u32,
                energy: clamp_unit(t.energy, 0.5),
                reason: non_empty_or(t.reason, ""),
            })
        })
        .take(limit)
        .collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_track(title: Option<&str>, bpm: Option<f64>, energy: Option<f64>) -> RawTrack {
        RawTrack {
            title: title.map(str::to_string),
            artist: None,
            genre: Some("soul".to_string()),
            bpm,
            energy,
            reason: None,
        }
    }

    #[test]
    fn test_normalize_tracks_clamps_and_filters() {
        let tracks = normalize_tracks(
            vec![
                raw_track(Some("A"), Some(500.0), Some(3.0)),
                raw_track(None, Some(90.0), None),
                raw_track(Some("  "), None, None),
                raw_track(Some("B"), None, Some(-1.0)),
            ],
            10,
        );

        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].bpm, 220);
        assert_eq!(tracks[0].energy, 1.0);
        assert_eq!(tracks[0].artist, "Unknown Artist");
        assert_eq!(tracks[1].bpm, 100);
        assert_eq!(tracks[1].energy, 0.0);
        assert_ne!(tracks[0].id, tracks[1].id);
    }

    #[test]
    fn test_normalize_tracks_truncates() {
        let raw = (0..8)
            .map(|i| raw_track(Some(&format!("T{}", i)), None, None))
            .collect();
        assert_eq!(normalize_tracks(raw, 5).len(), 5);
    }

    #[test]
    fn test_draft_requires_tracks() {
        let raw = RawMixtape {
            title: None,
            description: None,
            tracks: vec![],
        };
        assert!(into_draft(raw, 10, "", "calm").is_err());
    }

    #[test]
    fn test_loosely_typed_track_fields() {
        let raw: RawMixtape = extract_json(
            r#"{"tracks": [{"title": "A", "bpm": "120", "energy": "high"}, "B", {"title": 7}]}"#,
        )
        .unwrap();
        let tracks = normalize_tracks(raw.tracks, 10);
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].bpm, 120);
        assert_eq!(tracks[0].energy, 0.5);
        assert_eq!(tracks[1].title, "7");
    }

    #[test]
    fn test_loosely_typed_composition_fields() {
        let raw: RawComposition =
            extract_json(r#"{"tempo": "fast", "instruments": "piano, drums", "structure": 3}"#)
                .unwrap();
        assert_eq!(raw.tempo, None);
        assert_eq!(clean_list(raw.instruments), vec!["piano", "drums"]);
        assert!(raw.structure.is_empty());
    }

    #[test]
    fn test_loosely_typed_mood_fields() {
        let raw: RawMood =
            extract_json(r#"{"mood": "Calm", "confidence": "0.9", "energy": null}"#).unwrap();
        assert_eq!(raw.confidence, Some(0.9));
        assert_eq!(raw.energy, None);
    }

    #[test]
    fn test_draft_default_title_from_mood() {
        let raw = RawMixtape {
            title: None,
            description: None,
            tracks: vec![raw_track(Some("A"), None, None)],
        };
        let draft = into_draft(raw, 10, "", "calm").unwrap();
        assert_eq!(draft.title, "Calm Mixtape");
    }
}
