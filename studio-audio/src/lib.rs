//! # Studio Audio
//!
//! Synthetic placeholder audio for the beat generator and voice-clone demos.
//!
//! Everything is generated synchronously in memory: parameters in, a
//! float [`AudioBuffer`] out, then encoded to a 16-bit PCM WAV together with
//! a downsampled waveform for the UI.

pub mod beat;
pub mod buffer;
pub mod error;
pub mod mastering;
pub mod patterns;
pub mod voice;
pub mod wav;
pub mod waveform;

pub use beat::{generate_beat, BeatParams, Layers};
pub use buffer::AudioBuffer;
pub use error::{AudioError, Result};
pub use patterns::{Genre, Mood};
pub use voice::{generate_voice, Accent, Emotion, Tone, VoiceParams};
pub use wav::encode_wav;
pub use waveform::{waveform, WaveformPoint, DEFAULT_WAVEFORM_POINTS};

/// Output sample rate for all generators
pub const SAMPLE_RATE: u32 = 44_100;

/// Encoded audio ready to hand to a client
#[derive(Debug, Clone)]
pub struct GeneratedAudio {
    pub wav: Vec<u8>,
    pub waveform: Vec<WaveformPoint>,
    pub duration_secs: f64,
    pub sample_rate: u32,
    pub channels: u16,
}

impl GeneratedAudio {
    /// Encode `buffer` and summarize it into `waveform_points` blocks
    pub fn from_buffer(buffer: &AudioBuffer, waveform_points: usize) -> Result<Self> {
        Ok(Self {
            wav: encode_wav(buffer)?,
            waveform: waveform(buffer, waveform_points),
            duration_secs: buffer.duration_secs(),
            sample_rate: buffer.sample_rate(),
            channels: buffer.channel_count(),
        })
    }
}

/// Generate and encode a beat
pub fn render_beat(params: &BeatParams) -> Result<GeneratedAudio> {
    let buffer = generate_beat(params)?;
    GeneratedAudio::from_buffer(&buffer, DEFAULT_WAVEFORM_POINTS)
}

/// Generate and encode a voice sample
pub fn render_voice(params: &VoiceParams) -> Result<GeneratedAudio> {
    let buffer = generate_voice(params)?;
    GeneratedAudio::from_buffer(&buffer, DEFAULT_WAVEFORM_POINTS)
}
