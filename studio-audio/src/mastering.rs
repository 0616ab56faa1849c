//! Soft-knee limiter applied as the final pass

use crate::buffer::AudioBuffer;

/// Level below which samples pass through unchanged
pub const SOFT_CLIP_THRESHOLD: f32 = 0.6;

/// Piecewise soft knee.
///
/// Linear below `threshold`. Above it the excess is compressed with `tanh`
/// so the output approaches but never exceeds 1.0.
pub fn soft_clip(x: f32, threshold: f32) -> f32 {
    let magnitude = x.abs();
    if magnitude <= threshold {
        return x;
    }
    let headroom = 1.0 - threshold;
    let shaped = threshold + headroom * ((magnitude - threshold) / headroom).tanh();
    shaped.copysign(x).clamp(-1.0, 1.0)
}

/// Apply the soft clip to every sample in place
pub fn master(buffer: &mut AudioBuffer) {
    for channel in buffer.channels_mut() {
        for sample in channel.iter_mut() {
            *sample = soft_clip(*sample, SOFT_CLIP_THRESHOLD);
        }
    }
}
