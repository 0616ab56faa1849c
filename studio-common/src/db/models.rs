//! Database models
//!
//! Rows map 1:1 onto the tables created in [`super::init`]. JSON output uses
//! camelCase field names for the web client.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    /// `<hex hash>.<hex salt>`; never serialized
    #[serde(skip_serializing)]
    pub password: String,
    pub full_name: Option<String>,
    pub generation_count: i64,
    pub created_at: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub sid: String,
    pub user_id: i64,
    pub expires_at: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub subject: Option<String>,
    pub message: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct NewsletterSignup {
    pub id: i64,
    pub email: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserBeat {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub genre: String,
    pub bpm: i64,
    pub mood: String,
    pub duration: f64,
    pub audio_url: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserAvatar {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub style: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserVoiceSample {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub pitch: f64,
    pub tone: String,
    pub accent: String,
    pub emotion: String,
    pub sample_text: Option<String>,
    pub duration: f64,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ListeningHistoryEntry {
    pub id: i64,
    pub user_id: i64,
    pub track_title: String,
    pub artist: String,
    pub genre: Option<String>,
    pub mood: Option<String>,
    pub tempo: Option<i64>,
    pub played_at: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RhythmRouletteComposition {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: String,
    pub genre: String,
    pub tempo: i64,
    pub mood: String,
    pub instruments: Json<Vec<String>>,
    pub structure: Json<Vec<String>>,
    pub created_at: String,
    pub updated_at: String,
}

/// One entry of a mixtape's track list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MixtapeTrack {
    pub id: Uuid,
    pub title: String,
    pub artist: String,
    pub genre: String,
    pub bpm: u32,
    pub energy: f64,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MoodMixtape {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: String,
    pub mood: String,
    pub energy: f64,
    pub tracks: Json<Vec<MixtapeTrack>>,
    pub adaptation_count: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MoodDetectionSession {
    pub id: i64,
    pub user_id: i64,
    pub input_text: String,
    pub detected_mood: String,
    pub confidence: f64,
    pub energy: f64,
    pub valence: f64,
    pub description: String,
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_serialization_omits_password() {
        let user = User {
            id: 1,
            username: "dj_nova".to_string(),
            email: "nova@example.com".to_string(),
            password: "abc.def".to_string(),
            full_name: None,
            generation_count: 0,
            created_at: "2024-01-01T00:00:00+00:00".to_string(),
        };

        let value = serde_json::to_value(&user).unwrap();
        assert!(value.get("password").is_none());
        assert_eq!(value["username"], "dj_nova");
        assert_eq!(value["generationCount"], 0);
    }

    #[test]
    fn test_composition_json_columns_serialize_as_arrays() {
        let composition = RhythmRouletteComposition {
            id: 3,
            user_id: 1,
            title: "Night Drive".to_string(),
            description: "Synth-heavy".to_string(),
            genre: "synthwave".to_string(),
            tempo: 104,
            mood: "nostalgic".to_string(),
            instruments: Json(vec!["synth".to_string(), "drums".to_string()]),
            structure: Json(vec!["intro".to_string()]),
            created_at: String::new(),
            updated_at: String::new(),
        };

        let value = serde_json::to_value(&composition).unwrap();
        assert_eq!(value["instruments"][1], "drums");
        assert_eq!(value["structure"].as_array().unwrap().len(), 1);
    }
}
