//! PCM quantization
//!
//! Converts normalized floating-point channel samples into interleaved
//! fixed-width integer bytes, frame-major, channel-minor. This is the one
//! lossy stage of the pipeline, and its arithmetic is part of the output
//! contract: identical input always quantizes to identical bytes.

use crate::error::{ConvertError, Result};

/// Quantize channel sample vectors into an interleaved byte buffer
///
/// Accepts 1 or 2 equal-length channels. For frame `i` and channel `c` the
/// output bytes occupy `(i * channels + c) * bytes_per_sample ..
/// + bytes_per_sample`.
///
/// Per-sample transform:
/// 1. Hard clamp to [-1.0, 1.0]. This is the sole clipping protection;
///    out-of-range values are truncated, never wrapped.
/// 2. `bytes_per_sample == 2`: scale by 32767, truncate toward zero to a
///    signed 16-bit value, store little-endian.
/// 3. `bytes_per_sample == 1`: map [-1, 1] to [0, 254] via
///    `(sample + 1) * 127`, store as one unsigned byte. The 255 ceiling is
///    never reached; this offset encoding is preserved byte-exact for
///    compatibility.
///
/// # Errors
/// `UnsupportedFormat` for any `bytes_per_sample` outside {1, 2}.
///
/// Zero-length input yields an empty buffer, not an error.
pub fn quantize(channels: &[Vec<f32>], bytes_per_sample: u16) -> Result<Vec<u8>> {
    if bytes_per_sample != 1 && bytes_per_sample != 2 {
        return Err(ConvertError::UnsupportedFormat {
            format: format!(
                "{} bytes per sample (only 8 and 16 bit PCM supported)",
                bytes_per_sample
            ),
        });
    }

    let frames = channels.first().map(|ch| ch.len()).unwrap_or(0);
    let num_channels = channels.len();
    let mut out = Vec::with_capacity(frames * num_channels * bytes_per_sample as usize);

    for i in 0..frames {
        for channel in channels {
            let sample = channel[i].clamp(-1.0, 1.0);
            match bytes_per_sample {
                2 => {
                    let value = (sample * 32767.0) as i16;
                    out.extend_from_slice(&value.to_le_bytes());
                }
                1 => {
                    out.push(((sample + 1.0) * 127.0) as u8);
                }
                _ => unreachable!(),
            }
        }
    }

    Ok(out)
}
