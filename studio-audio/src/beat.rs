//! Beat generator
//!
//! Sums a gated drum pattern, a bassline on the beat grid and optional
//! melody, harmony and pad layers, then runs the soft-clip master.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use crate::buffer::AudioBuffer;
use crate::error::{AudioError, Result};
use crate::mastering::master;
use crate::patterns::{Genre, Mood, STEPS_PER_BAR};
use crate::SAMPLE_RATE;

pub const MIN_BPM: u32 = 60;
pub const MAX_BPM: u32 = 200;
pub const MAX_BEAT_SECS: f64 = 60.0;

/// Bass scale degree for each beat of a bar
const BASS_DEGREES: [usize; 4] = [0, 0, 3, 4];

/// Optional layers on top of drums and bass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layers {
    pub melody: bool,
    pub harmony: bool,
    pub pad: bool,
}

impl Default for Layers {
    fn default() -> Self {
        Self {
            melody: true,
            harmony: true,
            pad: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BeatParams {
    pub genre: Genre,
    pub bpm: u32,
    pub mood: Mood,
    pub duration_secs: f64,
    /// 1 (mono) or 2 (stereo)
    pub channels: u16,
    pub layers: Layers,
    pub seed: u64,
}

impl BeatParams {
    pub fn validate(&self) -> Result<()> {
        if !(MIN_BPM..=MAX_BPM).contains(&self.bpm) {
            return Err(AudioError::invalid(
                "bpm",
                format!("must be between {} and {}", MIN_BPM, MAX_BPM),
            ));
        }
        if !self.duration_secs.is_finite()
            || self.duration_secs <= 0.0
            || self.duration_secs > MAX_BEAT_SECS
        {
            return Err(AudioError::invalid(
                "duration",
                format!("must be greater than 0 and at most {} seconds", MAX_BEAT_SECS),
            ));
        }
        if !(1..=2).contains(&self.channels) {
            return Err(AudioError::invalid("channels", "must be 1 or 2"));
        }
        Ok(())
    }
}

/// Render a beat into a new buffer
pub fn generate_beat(params: &BeatParams) -> Result<AudioBuffer> {
    params.validate()?;

    let frames = (params.duration_secs * SAMPLE_RATE as f64).round() as usize;
    let mut buffer = AudioBuffer::silent(params.channels, frames, SAMPLE_RATE);
    let mut rng = StdRng::seed_from_u64(params.seed);

    let rate = SAMPLE_RATE as f64;
    let step_secs = 60.0 / params.bpm as f64 / 4.0;
    let step_frames = step_secs * rate;
    let total_steps = (frames as f64 / step_frames).ceil() as usize;
    let pattern = params.genre.drum_pattern();

    for step in 0..total_steps {
        let start = (step as f64 * step_frames) as usize;
        let pos = step % STEPS_PER_BAR;

        if pattern.kick[pos] == 1 {
            kick(&mut buffer, start);
        }
        if pattern.snare[pos] == 1 {
            snare(&mut buffer, start, &mut rng);
        }
        if pattern.hat[pos] == 1 {
            hat(&mut buffer, start, &mut rng);
        }
        if pos % 4 == 0 {
            let beat_in_bar = pos / 4;
            bass(&mut buffer, start, step_secs * 4.0, params, beat_in_bar);
        }
        if params.layers.melody && pos % 2 == 0 {
            melody(&mut buffer, start, step_secs * 2.0, params.mood, &mut rng);
        }
        if params.layers.harmony && pos == 0 {
            let bar = step / STEPS_PER_BAR;
            harmony(&mut buffer, start, step_secs * STEPS_PER_BAR as f64, params.mood, bar);
        }
    }

    if params.layers.pad {
        pad(&mut buffer, params.mood);
    }

    master(&mut buffer);
    Ok(buffer)
}

fn secs_to_frames(secs: f64) -> usize {
    (secs * SAMPLE_RATE as f64) as usize
}

/// Sine with a falling pitch sweep and exponential decay
fn kick(buffer: &mut AudioBuffer, start: usize) {
    let rate = SAMPLE_RATE as f64;
    let mut phase = 0.0f64;
    buffer.mix_in(start, secs_to_frames(0.35), 0.0, |t| {
        let freq = 50.0 + 100.0 * (-t * 30.0).exp();
        phase += TAU * freq / rate;
        (0.9 * phase.sin() * (-t * 8.0).exp()) as f32
    });
}

fn snare(buffer: &mut AudioBuffer, start: usize, rng: &mut StdRng) {
    buffer.mix_in(start, secs_to_frames(0.2), 0.0, |t| {
        let noise: f64 = rng.gen_range(-1.0..1.0);
        let body = (TAU * 180.0 * t).sin() * (-t * 30.0).exp();
        (0.5 * noise * (-t * 20.0).exp() + 0.3 * body) as f32
    });
}

fn hat(buffer: &mut AudioBuffer, start: usize, rng: &mut StdRng) {
    buffer.mix_in(start, secs_to_frames(0.05), 0.6, |t| {
        let noise: f64 = rng.gen_range(-1.0..1.0);
        (0.25 * noise * (-t * 60.0).exp()) as f32
    });
}

fn bass(buffer: &mut AudioBuffer, start: usize, beat_secs: f64, params: &BeatParams, beat: usize) {
    let scale = params.mood.scale();
    let degree = BASS_DEGREES[beat % BASS_DEGREES.len()] % scale.len();
    let freq = params.genre.bass_root() * 2f64.powf(scale[degree] as f64 / 12.0);

    buffer.mix_in(start, secs_to_frames(beat_secs * 0.8), 0.0, |t| {
        (0.5 * (TAU * freq * t).sin() * (-t * 3.0).exp()) as f32
    });
}

fn melody(buffer: &mut AudioBuffer, start: usize, eighth_secs: f64, mood: Mood, rng: &mut StdRng) {
    let table = mood.melody_frequencies();
    let freq = table[rng.gen_range(0..table.len())];
    if !rng.gen_bool(0.7) {
        return;
    }

    buffer.mix_in(start, secs_to_frames(eighth_secs * 0.8), -0.4, |t| {
        (0.18 * (TAU * freq * t).sin() * (-t * 4.0).exp()) as f32
    });
}

fn harmony(buffer: &mut AudioBuffer, start: usize, bar_secs: f64, mood: Mood, bar: usize) {
    let chord = mood.chords()[bar % 2];
    buffer.mix_in(start, secs_to_frames(bar_secs), 0.0, |t| {
        let attack = 1.0 - (-t * 10.0).exp();
        let sustain = (-t * 0.8).exp();
        let sum: f64 = chord.iter().map(|f| (TAU * f * t).sin()).sum();
        (0.06 * sum * attack * sustain) as f32
    });
}

/// Whole-length pad an octave below the first chord, under a slow LFO
fn pad(buffer: &mut AudioBuffer, mood: Mood) {
    let chord = mood.chords()[0];
    let frames = buffer.frames();
    buffer.mix_in(0, frames, 0.0, |t| {
        let lfo = 0.5 + 0.5 * (TAU * 0.25 * t).sin();
        let sum: f64 = chord.iter().map(|f| (TAU * (f / 2.0) * t).sin()).sum();
        (0.05 * sum * lfo) as f32
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> BeatParams {
        BeatParams {
            genre: Genre::HipHop,
            bpm: 90,
            mood: Mood::Chill,
            duration_secs: 2.0,
            channels: 2,
            layers: Layers::default(),
            seed: 7,
        }
    }

    #[test]
    fn test_frame_count_matches_duration() {
        let buffer = generate_beat(&params()).unwrap();
        assert_eq!(buffer.frames(), 88_200);
        assert_eq!(buffer.channel_count(), 2);
    }

    #[test]
    fn test_output_within_unit_range() {
        let mut p = params();
        p.layers.pad = true;
        p.genre = Genre::Trap;
        let buffer = generate_beat(&p).unwrap();
        for ch in 0..2 {
            assert!(buffer.channel(ch).iter().all(|s| s.abs() <= 1.0));
        }
    }

    #[test]
    fn test_same_seed_is_deterministic() {
        let a = generate_beat(&params()).unwrap();
        let b = generate_beat(&params()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_downbeat_is_not_silent() {
        let buffer = generate_beat(&params()).unwrap();
        let early: f32 = buffer.channel(0)[..2_000].iter().map(|s| s.abs()).sum();
        assert!(early > 1.0);
    }

    #[test]
    fn test_rejects_out_of_range_parameters() {
        let mut p = params();
        p.bpm = 300;
        assert!(generate_beat(&p).is_err());

        let mut p = params();
        p.duration_secs = 0.0;
        assert!(generate_beat(&p).is_err());

        let mut p = params();
        p.duration_secs = f64::NAN;
        assert!(generate_beat(&p).is_err());

        let mut p = params();
        p.channels = 3;
        assert!(generate_beat(&p).is_err());
    }
}
