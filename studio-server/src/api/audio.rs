//! Synthetic audio rendering
//!
//! Rendering is CPU-bound and runs on the blocking pool.

use axum::{http::header, response::IntoResponse, routing::post, Router};
use serde::{Deserialize, Serialize};
use studio_audio::{
    Accent, BeatParams, Emotion, GeneratedAudio, Genre, Layers, Mood, Tone, VoiceParams,
    WaveformPoint,
};
use tracing::debug;

use super::{ok, ApiJson};
use crate::error::{ApiError, ApiResult};
use crate::AppState;

const DEFAULT_BPM: u32 = 90;
const DEFAULT_BEAT_SECS: f64 = 8.0;
const DEFAULT_VOICE_SECS: f64 = 3.0;
const DEFAULT_PITCH_HZ: f64 = 180.0;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeatAudioRequest {
    #[serde(default)]
    pub genre: String,
    pub bpm: Option<u32>,
    #[serde(default)]
    pub mood: String,
    pub duration: Option<f64>,
    pub channels: Option<u16>,
    #[serde(default)]
    pub layers: Layers,
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceAudioRequest {
    pub pitch: Option<f64>,
    #[serde(default)]
    pub tone: String,
    #[serde(default)]
    pub accent: String,
    #[serde(default)]
    pub emotion: String,
    pub duration: Option<f64>,
    pub seed: Option<u64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioPreview {
    pub duration_secs: f64,
    pub sample_rate: u32,
    pub channels: u16,
    pub byte_length: usize,
    pub waveform: Vec<WaveformPoint>,
}

impl BeatAudioRequest {
    fn params(&self) -> BeatParams {
        BeatParams {
            genre: Genre::from_name(&self.genre),
            bpm: self.bpm.unwrap_or(DEFAULT_BPM),
            mood: Mood::from_name(&self.mood),
            duration_secs: self.duration.unwrap_or(DEFAULT_BEAT_SECS),
            channels: self.channels.unwrap_or(2),
            layers: self.layers,
            seed: self.seed.unwrap_or_else(rand::random),
        }
    }
}

impl VoiceAudioRequest {
    fn params(&self) -> VoiceParams {
        VoiceParams {
            pitch_hz: self.pitch.unwrap_or(DEFAULT_PITCH_HZ),
            tone: Tone::from_name(&self.tone),
            accent: Accent::from_name(&self.accent),
            emotion: Emotion::from_name(&self.emotion),
            duration_secs: self.duration.unwrap_or(DEFAULT_VOICE_SECS),
            seed: self.seed.unwrap_or_else(rand::random),
        }
    }
}

async fn render<F>(job: F) -> ApiResult<GeneratedAudio>
where
    F: FnOnce() -> studio_audio::Result<GeneratedAudio> + Send + 'static,
{
    let audio = tokio::task::spawn_blocking(job)
        .await
        .map_err(|e| ApiError::Internal(format!("Render task failed: {}", e)))??;
    Ok(audio)
}

fn wav_attachment(audio: GeneratedAudio, filename: String) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "audio/wav".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        audio.wav,
    )
}

/// POST /api/audio/beat
pub async fn beat_wav(
    ApiJson(req): ApiJson<BeatAudioRequest>,
) -> ApiResult<impl IntoResponse> {
    let params = req.params();
    let filename = format!("beat-{}-{}bpm.wav", params.genre.slug(), params.bpm);
    debug!(?params, "Rendering beat");

    let audio = render(move || studio_audio::render_beat(&params)).await?;
    Ok(wav_attachment(audio, filename))
}

/// POST /api/audio/beat/preview
pub async fn beat_preview(
    ApiJson(req): ApiJson<BeatAudioRequest>,
) -> ApiResult<impl IntoResponse> {
    let params = req.params();
    let audio = render(move || studio_audio::render_beat(&params)).await?;

    Ok(ok(AudioPreview {
        duration_secs: audio.duration_secs,
        sample_rate: audio.sample_rate,
        channels: audio.channels,
        byte_length: audio.wav.len(),
        waveform: audio.waveform,
    }))
}

/// POST /api/audio/voice
pub async fn voice_wav(
    ApiJson(req): ApiJson<VoiceAudioRequest>,
) -> ApiResult<impl IntoResponse> {
    let params = req.params();
    let filename = format!("voice-{}hz.wav", params.pitch_hz.round() as i64);
    debug!(?params, "Rendering voice");

    let audio = render(move || studio_audio::render_voice(&params)).await?;
    Ok(wav_attachment(audio, filename))
}

pub fn audio_routes() -> Router<AppState> {
    Router::new()
        .route("/api/audio/beat", post(beat_wav))
        .route("/api/audio/beat/preview", post(beat_preview))
        .route("/api/audio/voice", post(voice_wav))
}
