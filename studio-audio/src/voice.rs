//! Voice-clone placeholder generator
//!
//! A harmonic series (fundamental plus up to eight overtones, amplitude
//! `1/n²`) shaped by an emotion envelope and an accent-keyed formant
//! multiply, with a little noise jitter. The input text is not spoken.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use crate::buffer::AudioBuffer;
use crate::error::{AudioError, Result};
use crate::mastering::master;
use crate::SAMPLE_RATE;

pub const MIN_PITCH_HZ: f64 = 60.0;
pub const MAX_PITCH_HZ: f64 = 500.0;
pub const MAX_VOICE_SECS: f64 = 30.0;
pub const MAX_OVERTONES: usize = 8;

const FADE_SECS: f64 = 0.02;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Neutral,
    Warm,
    Bright,
    Deep,
    Breathy,
}

impl Tone {
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "warm" | "smooth" => Tone::Warm,
            "bright" | "crisp" => Tone::Bright,
            "deep" | "rich" => Tone::Deep,
            "breathy" | "soft" | "whisper" => Tone::Breathy,
            _ => Tone::Neutral,
        }
    }

    fn overtones(self) -> usize {
        match self {
            Tone::Neutral | Tone::Deep => 6,
            Tone::Warm => 4,
            Tone::Bright => MAX_OVERTONES,
            Tone::Breathy => 3,
        }
    }

    fn noise_level(self) -> f64 {
        match self {
            Tone::Breathy => 0.06,
            Tone::Deep => 0.005,
            Tone::Neutral => 0.02,
            Tone::Warm | Tone::Bright => 0.01,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Accent {
    Neutral,
    American,
    British,
    Australian,
    Indian,
}

impl Accent {
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "american" | "us" => Accent::American,
            "british" | "uk" | "english" => Accent::British,
            "australian" | "au" => Accent::Australian,
            "indian" | "in" => Accent::Indian,
            _ => Accent::Neutral,
        }
    }

    /// Rate of the formant multiply in Hz
    fn formant_rate(self) -> f64 {
        match self {
            Accent::Neutral => 2.0,
            Accent::American => 3.0,
            Accent::British => 4.0,
            Accent::Australian => 5.0,
            Accent::Indian => 6.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Neutral,
    Happy,
    Sad,
    Excited,
    Calm,
    Angry,
}

impl Emotion {
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "happy" | "joyful" | "cheerful" => Emotion::Happy,
            "sad" | "melancholic" => Emotion::Sad,
            "excited" | "energetic" => Emotion::Excited,
            "calm" | "relaxed" | "soothing" => Emotion::Calm,
            "angry" | "intense" => Emotion::Angry,
            _ => Emotion::Neutral,
        }
    }

    /// Amplitude envelope at time `t` seconds
    fn envelope(self, t: f64) -> f64 {
        match self {
            Emotion::Neutral => 1.0,
            Emotion::Happy => 0.75 + 0.25 * (TAU * 5.0 * t).sin(),
            Emotion::Sad => 0.5 + 0.5 * (-0.5 * t).exp(),
            Emotion::Excited => 0.8 + 0.2 * (TAU * 8.0 * t).sin(),
            Emotion::Calm => 0.6 + 0.2 * (TAU * 0.5 * t).sin(),
            Emotion::Angry => 0.9 + 0.1 * (TAU * 12.0 * t).sin().signum(),
        }
    }

    /// Vibrato (relative depth, rate Hz)
    fn vibrato(self) -> (f64, f64) {
        match self {
            Emotion::Happy => (0.01, 5.5),
            Emotion::Excited => (0.02, 7.0),
            Emotion::Sad => (0.005, 4.0),
            Emotion::Angry => (0.015, 9.0),
            Emotion::Neutral | Emotion::Calm => (0.0, 0.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VoiceParams {
    pub pitch_hz: f64,
    pub tone: Tone,
    pub accent: Accent,
    pub emotion: Emotion,
    pub duration_secs: f64,
    pub seed: u64,
}

impl VoiceParams {
    pub fn validate(&self) -> Result<()> {
        if !self.pitch_hz.is_finite() || !(MIN_PITCH_HZ..=MAX_PITCH_HZ).contains(&self.pitch_hz) {
            return Err(AudioError::invalid(
                "pitch",
                format!("must be between {} and {} Hz", MIN_PITCH_HZ, MAX_PITCH_HZ),
            ));
        }
        if !self.duration_secs.is_finite()
            || self.duration_secs <= 0.0
            || self.duration_secs > MAX_VOICE_SECS
        {
            return Err(AudioError::invalid(
                "duration",
                format!("must be greater than 0 and at most {} seconds", MAX_VOICE_SECS),
            ));
        }
        Ok(())
    }
}

/// Render a mono voice buffer
pub fn generate_voice(params: &VoiceParams) -> Result<AudioBuffer> {
    params.validate()?;

    let rate = SAMPLE_RATE as f64;
    let frames = (params.duration_secs * rate).round() as usize;
    let mut rng = StdRng::seed_from_u64(params.seed);

    let harmonics = 1 + params.tone.overtones().min(MAX_OVERTONES);
    let norm: f64 = (1..=harmonics).map(|n| 1.0 / (n * n) as f64).sum();
    let noise_level = params.tone.noise_level();
    let (vibrato_depth, vibrato_rate) = params.emotion.vibrato();
    let formant_rate = params.accent.formant_rate();
    let fade_frames = ((FADE_SECS * rate) as usize).max(1);

    let mut phase = 0.0f64;
    let mut samples = Vec::with_capacity(frames);

    for i in 0..frames {
        let t = i as f64 / rate;
        let freq = params.pitch_hz * (1.0 + vibrato_depth * (TAU * vibrato_rate * t).sin());
        phase += TAU * freq / rate;

        let series: f64 = (1..=harmonics)
            .map(|n| (n as f64 * phase).sin() / (n * n) as f64)
            .sum::<f64>()
            / norm;

        let formant = 0.75 + 0.25 * (TAU * formant_rate * t).sin();
        let jitter = noise_level * rng.gen_range(-1.0..1.0);
        let fade = fade_gain(i, frames, fade_frames);

        let voiced = 0.8 * series * params.emotion.envelope(t) * formant;
        samples.push(((voiced + jitter) * fade) as f32);
    }

    let mut buffer = AudioBuffer::from_mono(samples, SAMPLE_RATE);
    master(&mut buffer);
    Ok(buffer)
}

fn fade_gain(i: usize, frames: usize, fade_frames: usize) -> f64 {
    let from_start = i as f64 / fade_frames as f64;
    let from_end = (frames - i) as f64 / fade_frames as f64;
    from_start.min(from_end).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> VoiceParams {
        VoiceParams {
            pitch_hz: 180.0,
            tone: Tone::Warm,
            accent: Accent::British,
            emotion: Emotion::Happy,
            duration_secs: 1.0,
            seed: 42,
        }
    }

    #[test]
    fn test_mono_with_expected_length() {
        let buffer = generate_voice(&params()).unwrap();
        assert_eq!(buffer.channel_count(), 1);
        assert_eq!(buffer.frames(), 44_100);
    }

    #[test]
    fn test_fades_start_and_end_at_silence() {
        let buffer = generate_voice(&params()).unwrap();
        let samples = buffer.channel(0);
        assert_eq!(samples[0], 0.0);
        assert!(samples[samples.len() - 1].abs() < 0.01);
    }

    #[test]
    fn test_bounded_output() {
        for emotion in [Emotion::Angry, Emotion::Excited, Emotion::Sad] {
            let mut p = params();
            p.emotion = emotion;
            p.tone = Tone::Breathy;
            let buffer = generate_voice(&p).unwrap();
            assert!(buffer.channel(0).iter().all(|s| s.abs() <= 1.0));
        }
    }

    #[test]
    fn test_parameter_validation() {
        let mut p = params();
        p.pitch_hz = 20.0;
        assert!(generate_voice(&p).is_err());

        let mut p = params();
        p.duration_secs = 31.0;
        assert!(generate_voice(&p).is_err());
    }

    #[test]
    fn test_name_parsing_falls_back_to_neutral() {
        assert_eq!(Tone::from_name("Bright"), Tone::Bright);
        assert_eq!(Tone::from_name("gravelly"), Tone::Neutral);
        assert_eq!(Accent::from_name("UK"), Accent::British);
        assert_eq!(Emotion::from_name("furious"), Emotion::Neutral);
    }

    #[test]
    fn test_envelopes_stay_positive() {
        let emotions = [
            Emotion::Neutral,
            Emotion::Happy,
            Emotion::Sad,
            Emotion::Excited,
            Emotion::Calm,
            Emotion::Angry,
        ];
        for emotion in emotions {
            for i in 0..1000 {
                let env = emotion.envelope(i as f64 * 0.01);
                assert!(env > 0.0 && env <= 1.0, "{:?} at {}", emotion, i);
            }
        }
    }
}
