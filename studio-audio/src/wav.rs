//! WAV container encoding
//!
//! Output is the canonical 44-byte RIFF/WAVE header followed by interleaved
//! 16-bit little-endian PCM. No extra chunks are emitted, so the encoded
//! length is always `44 + frames * channels * 2`.

use crate::buffer::AudioBuffer;
use crate::error::{AudioError, Result};

/// Size of the canonical PCM WAV header
pub const WAV_HEADER_LEN: usize = 44;

const BITS_PER_SAMPLE: u16 = 16;
const BYTES_PER_SAMPLE: usize = (BITS_PER_SAMPLE / 8) as usize;
/// `WAVE` id plus the fmt chunk and the data chunk header
const RIFF_OVERHEAD: u32 = (WAV_HEADER_LEN - 8) as u32;
const FORMAT_PCM: u16 = 1;

/// Full-scale 16-bit value; out-of-range input saturates
fn quantize(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * i16::MAX as f32).round() as i16
}

fn put_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_le_bytes());
}

fn put_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_le_bytes());
}

/// Encode a buffer as a complete WAV file
pub fn encode_wav(buffer: &AudioBuffer) -> Result<Vec<u8>> {
    let channels = buffer.channel_count();
    if channels == 0 {
        return Err(AudioError::Encoding("buffer has no channels".to_string()));
    }

    let block_align = channels as usize * BYTES_PER_SAMPLE;
    let data_len = buffer
        .frames()
        .checked_mul(block_align)
        .and_then(|len| u32::try_from(len).ok())
        .filter(|len| len.checked_add(RIFF_OVERHEAD).is_some())
        .ok_or_else(|| AudioError::Encoding("PCM payload exceeds 4 GiB".to_string()))?;

    let sample_rate = buffer.sample_rate();
    let mut out = Vec::with_capacity(WAV_HEADER_LEN + data_len as usize);

    out.extend_from_slice(b"RIFF");
    put_u32(&mut out, RIFF_OVERHEAD + data_len);
    out.extend_from_slice(b"WAVEfmt ");
    put_u32(&mut out, 16);
    put_u16(&mut out, FORMAT_PCM);
    put_u16(&mut out, channels);
    put_u32(&mut out, sample_rate);
    put_u32(&mut out, sample_rate.saturating_mul(block_align as u32));
    put_u16(&mut out, block_align as u16);
    put_u16(&mut out, BITS_PER_SAMPLE);
    out.extend_from_slice(b"data");
    put_u32(&mut out, data_len);

    for sample in buffer.interleaved() {
        put_u16(&mut out, quantize(sample) as u16);
    }

    Ok(out)
}

/// Expected encoded size for `frames` frames of `channels` channels
pub fn encoded_len(frames: usize, channels: u16) -> usize {
    WAV_HEADER_LEN + frames * channels as usize * BYTES_PER_SAMPLE
}
