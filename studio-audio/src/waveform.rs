//! Downsampled waveform for UI rendering

use serde::Serialize;

use crate::buffer::AudioBuffer;

/// Default number of points returned to the client
pub const DEFAULT_WAVEFORM_POINTS: usize = 200;

/// Magnitude summary of one block of frames
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WaveformPoint {
    /// Largest absolute sample in the block
    pub peak: f32,
    /// Mean absolute sample in the block
    pub average: f32,
}

/// Summarize `buffer` into at most `points` blocks across all channels
pub fn waveform(buffer: &AudioBuffer, points: usize) -> Vec<WaveformPoint> {
    let frames = buffer.frames();
    if frames == 0 || points == 0 {
        return Vec::new();
    }

    let block = frames.div_ceil(points);
    let channels = buffer.channel_count() as usize;
    let mut out = Vec::with_capacity(points.min(frames));

    let mut start = 0;
    while start < frames {
        let end = (start + block).min(frames);
        let mut peak = 0.0f32;
        let mut sum = 0.0f64;

        for ch in 0..channels {
            for &s in &buffer.channel(ch)[start..end] {
                let magnitude = s.abs();
                peak = peak.max(magnitude);
                sum += magnitude as f64;
            }
        }

        let count = ((end - start) * channels) as f64;
        out.push(WaveformPoint {
            peak,
            average: (sum / count) as f32,
        });
        start = end;
    }

    out
}
