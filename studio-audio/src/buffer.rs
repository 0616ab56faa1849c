//! In-memory sample buffer

/// Planar float buffer. Every channel has the same number of frames.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    sample_rate: u32,
    channels: Vec<Vec<f32>>,
}

impl AudioBuffer {
    /// Silent buffer with `channel_count` channels of `frames` samples each
    pub fn silent(channel_count: u16, frames: usize, sample_rate: u32) -> Self {
        Self {
            sample_rate,
            channels: vec![vec![0.0; frames]; channel_count as usize],
        }
    }

    /// Wrap existing mono samples
    pub fn from_mono(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            sample_rate,
            channels: vec![samples],
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channel_count(&self) -> u16 {
        self.channels.len() as u16
    }

    /// Samples per channel
    pub fn frames(&self) -> usize {
        self.channels.first().map(Vec::len).unwrap_or(0)
    }

    pub fn duration_secs(&self) -> f64 {
        self.frames() as f64 / self.sample_rate as f64
    }

    pub fn channel(&self, index: usize) -> &[f32] {
        &self.channels[index]
    }

    pub fn channels_mut(&mut self) -> impl Iterator<Item = &mut Vec<f32>> {
        self.channels.iter_mut()
    }

    /// Add a sound starting at frame `start`, lasting `len` frames.
    ///
    /// `render` receives the time in seconds since `start` and returns one
    /// sample. `pan` ranges from -1 (left) to 1 (right) and is ignored for
    /// mono buffers. Samples past the end of the buffer are dropped.
    pub fn mix_in<F>(&mut self, start: usize, len: usize, pan: f32, mut render: F)
    where
        F: FnMut(f64) -> f32,
    {
        let end = (start + len).min(self.frames());
        if start >= end {
            return;
        }

        let (left_gain, right_gain) = pan_gains(pan);
        let rate = self.sample_rate as f64;

        for frame in start..end {
            let t = (frame - start) as f64 / rate;
            let sample = render(t);
            match self.channels.as_mut_slice() {
                [mono] => mono[frame] += sample,
                [left, right, ..] => {
                    left[frame] += sample * left_gain;
                    right[frame] += sample * right_gain;
                }
                [] => {}
            }
        }
    }

    /// Interleave channels frame by frame (L R L R ...)
    pub fn interleaved(&self) -> Vec<f32> {
        let frames = self.frames();
        let mut out = Vec::with_capacity(frames * self.channels.len());
        for frame in 0..frames {
            for channel in &self.channels {
                out.push(channel[frame]);
            }
        }
        out
    }
}

/// Linear pan law: centre keeps both sides at unity
fn pan_gains(pan: f32) -> (f32, f32) {
    let pan = pan.clamp(-1.0, 1.0);
    (1.0 - pan.max(0.0), 1.0 + pan.min(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mix_in_clips_at_buffer_end() {
        let mut buffer = AudioBuffer::silent(1, 10, 10);
        buffer.mix_in(8, 5, 0.0, |_| 1.0);
        assert_eq!(buffer.channel(0)[7], 0.0);
        assert_eq!(buffer.channel(0)[8], 1.0);
        assert_eq!(buffer.channel(0)[9], 1.0);
    }

    #[test]
    fn test_mix_in_pans_right() {
        let mut buffer = AudioBuffer::silent(2, 4, 10);
        buffer.mix_in(0, 4, 1.0, |_| 0.5);
        assert_eq!(buffer.channel(0)[0], 0.0);
        assert_eq!(buffer.channel(1)[0], 0.5);
    }

    #[test]
    fn test_interleaved_order() {
        let mut buffer = AudioBuffer::silent(2, 2, 10);
        buffer.mix_in(0, 2, -1.0, |t| if t == 0.0 { 1.0 } else { 2.0 });
        assert_eq!(buffer.interleaved(), vec![1.0, 0.0, 2.0, 0.0]);
    }

    #[test]
    fn test_duration() {
        let buffer = AudioBuffer::silent(1, 22_050, 44_100);
        assert!((buffer.duration_secs() - 0.5).abs() < 1e-9);
    }
}
