//! Reference audio engine and save sink
//!
//! `WavEngine` is the in-crate implementation of the host capability: it
//! decodes WAV byte streams (8/16/24/32-bit int and 32-bit float) and
//! resamples with linear interpolation. Compressed formats stay with the
//! embedding host; anything that can hand over a decoded `AudioBuffer` can
//! replace this engine through the `AudioEngine` trait.
//!
//! Sample rate conversion uses linear interpolation (TODO: upgrade to sinc).

use std::io::Cursor;
use std::path::PathBuf;

use hound::{SampleFormat, WavReader};
use log::debug;

use crate::engine::buffer::{AudioBuffer, ChannelLayout};
use crate::engine::{AudioEngine, PlaybackHandle, SaveSink};
use crate::error::{ConvertError, Result};

/// WAV-backed reference implementation of [`AudioEngine`]
///
/// Decode and resample only; audible playback is a host capability, so
/// [`AudioEngine::start_playback`] reports `PlaybackUnavailable`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WavEngine;

impl WavEngine {
    pub fn new() -> Self {
        WavEngine
    }
}

impl AudioEngine for WavEngine {
    fn decode(&self, bytes: &[u8]) -> Result<AudioBuffer> {
        let reader = WavReader::new(Cursor::new(bytes)).map_err(|e| ConvertError::DecodeFailed {
            reason: format!("Not a readable WAV stream: {}", e),
            source: Some(Box::new(e)),
        })?;

        let spec = reader.spec();
        let channels = spec.channels as usize;

        // Mono and stereo only
        let layout = ChannelLayout::from_count(channels).ok_or_else(|| {
            ConvertError::UnsupportedFormat {
                format: format!("{}-channel audio (only mono/stereo supported)", channels),
            }
        })?;

        let samples = read_samples_as_f32(reader, spec.bits_per_sample, spec.sample_format)?;
        if samples.is_empty() {
            return Err(ConvertError::EmptyAudio);
        }

        let buffer = AudioBuffer::from_interleaved(&samples, layout, spec.sample_rate)?;
        debug!(
            "decoded {} frames, {} ch at {} Hz",
            buffer.frames(),
            buffer.channels(),
            buffer.sample_rate
        );
        Ok(buffer)
    }

    fn resample(&self, buffer: &AudioBuffer, target_rate: u32) -> Result<AudioBuffer> {
        if target_rate == 0 {
            return Err(ConvertError::UnsupportedFormat {
                format: "0 Hz sample rate".to_string(),
            });
        }
        if buffer.sample_rate == target_rate {
            return Ok(buffer.clone());
        }

        let ratio = target_rate as f64 / buffer.sample_rate as f64;
        let resampled = buffer
            .samples
            .iter()
            .map(|channel| resample_linear(channel, ratio))
            .collect();

        AudioBuffer::from_channels(resampled, target_rate)
    }

    fn start_playback(&self, _buffer: &AudioBuffer) -> Result<PlaybackHandle> {
        Err(ConvertError::PlaybackUnavailable {
            reason: "WavEngine has no audio output device".to_string(),
        })
    }
}

/// Save sink that writes blobs into a directory on disk
#[derive(Debug, Clone)]
pub struct DirSink {
    dir: PathBuf,
}

impl DirSink {
    /// Create a sink rooted at `dir`, creating the directory if needed
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(DirSink { dir })
    }
}

impl SaveSink for DirSink {
    fn save(&self, bytes: &[u8], filename: &str) -> Result<()> {
        let path = self.dir.join(filename);
        std::fs::write(&path, bytes)?;
        debug!("wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }
}

/// Generate a mono test tone (sine wave)
///
/// # Arguments
/// * `frequency` - Frequency of the sine wave in Hz
/// * `duration_secs` - Duration of the tone in seconds
/// * `sample_rate` - Sample rate in Hz
pub fn generate_test_tone(frequency: f32, duration_secs: f32, sample_rate: u32) -> AudioBuffer {
    let frames = (duration_secs * sample_rate as f32) as usize;
    let mut buffer = AudioBuffer::new(frames, ChannelLayout::Mono, sample_rate);

    let angular_freq = 2.0 * std::f32::consts::PI * frequency / sample_rate as f32;
    for (i, sample) in buffer.samples[0].iter_mut().enumerate() {
        *sample = (angular_freq * i as f32).sin();
    }

    buffer
}

/// Generate a stereo test tone with different frequencies per channel
pub fn generate_stereo_test_tone(
    freq_left: f32,
    freq_right: f32,
    duration_secs: f32,
    sample_rate: u32,
) -> AudioBuffer {
    let frames = (duration_secs * sample_rate as f32) as usize;
    let mut buffer = AudioBuffer::new(frames, ChannelLayout::Stereo, sample_rate);

    let angular_freq_l = 2.0 * std::f32::consts::PI * freq_left / sample_rate as f32;
    let angular_freq_r = 2.0 * std::f32::consts::PI * freq_right / sample_rate as f32;

    for (i, sample) in buffer.samples[0].iter_mut().enumerate() {
        *sample = (angular_freq_l * i as f32).sin();
    }
    for (i, sample) in buffer.samples[1].iter_mut().enumerate() {
        *sample = (angular_freq_r * i as f32).sin();
    }

    buffer
}

// ============================================================================
// Internal helper functions
// ============================================================================

/// Read samples from a WAV reader and convert to f32
fn read_samples_as_f32<R: std::io::Read>(
    mut reader: WavReader<R>,
    bits_per_sample: u16,
    sample_format: SampleFormat,
) -> Result<Vec<f32>> {
    match sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<Vec<f32>, _>>()
            .map_err(|e| ConvertError::DecodeFailed {
                reason: format!("Failed to read float samples: {}", e),
                source: Some(Box::new(e)),
            }),
        SampleFormat::Int => match bits_per_sample {
            8 => reader
                .samples::<i8>()
                .map(|s| s.map(|v| v as f32 / 128.0))
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(|e| ConvertError::DecodeFailed {
                    reason: format!("Failed to read 8-bit samples: {}", e),
                    source: Some(Box::new(e)),
                }),
            16 => reader
                .samples::<i16>()
                .map(|s| s.map(|v| v as f32 / 32768.0))
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(|e| ConvertError::DecodeFailed {
                    reason: format!("Failed to read 16-bit samples: {}", e),
                    source: Some(Box::new(e)),
                }),
            24 => {
                // 24-bit stored as i32 in hound
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / 8388608.0))
                    .collect::<std::result::Result<Vec<f32>, _>>()
                    .map_err(|e| ConvertError::DecodeFailed {
                        reason: format!("Failed to read 24-bit samples: {}", e),
                        source: Some(Box::new(e)),
                    })
            }
            32 => reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / 2147483648.0))
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(|e| ConvertError::DecodeFailed {
                    reason: format!("Failed to read 32-bit int samples: {}", e),
                    source: Some(Box::new(e)),
                }),
            _ => Err(ConvertError::UnsupportedFormat {
                format: format!("{}-bit integer audio", bits_per_sample),
            }),
        },
    }
}

/// Linear interpolation resampling
///
/// TODO: Replace with sinc interpolation for high-quality resampling.
/// Linear interpolation introduces aliasing artifacts, especially when
/// downsampling.
fn resample_linear(samples: &[f32], ratio: f64) -> Vec<f32> {
    if samples.is_empty() {
        return Vec::new();
    }

    let source_len = samples.len();
    let target_len = ((source_len as f64) * ratio).ceil() as usize;
    let mut output = Vec::with_capacity(target_len);

    for i in 0..target_len {
        let src_pos = i as f64 / ratio;
        let src_idx = src_pos.floor() as usize;
        let frac = (src_pos - src_idx as f64) as f32;

        let sample = if src_idx + 1 < source_len {
            samples[src_idx] * (1.0 - frac) + samples[src_idx + 1] * frac
        } else if src_idx < source_len {
            samples[src_idx]
        } else {
            0.0
        };

        output.push(sample);
    }

    output
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::quantize;
    use crate::wav::write_wav;

    #[test]
    fn test_generate_test_tone() {
        let buffer = generate_test_tone(440.0, 1.0, 44100);

        assert_eq!(buffer.frames(), 44100);
        assert_eq!(buffer.channels(), 1);

        // The sample near the half-cycle should be close to zero
        let samples_per_cycle = 44100.0 / 440.0;
        let zero_crossing = (samples_per_cycle / 2.0) as usize;
        assert!(buffer.samples[0][zero_crossing].abs() < 0.1);
    }

    #[test]
    fn test_generate_stereo_test_tone() {
        let buffer = generate_stereo_test_tone(440.0, 880.0, 0.5, 44100);

        assert_eq!(buffer.frames(), 22050);
        assert_eq!(buffer.channels(), 2);

        // At sample 100, left (440Hz) and right (880Hz) should differ
        assert!((buffer.samples[0][100] - buffer.samples[1][100]).abs() > 0.01);
    }

    #[test]
    fn test_decode_own_container() {
        let tone = generate_test_tone(440.0, 0.1, 44100);
        let pcm = quantize(&tone.samples, 2).unwrap();
        let wav = write_wav(&pcm, 1, 44100, 2);

        let engine = WavEngine::new();
        let decoded = engine.decode(&wav).unwrap();

        assert_eq!(decoded.channels(), 1);
        assert_eq!(decoded.sample_rate, 44100);
        assert_eq!(decoded.frames(), tone.frames());
    }

    #[test]
    fn test_decode_garbage_fails() {
        let engine = WavEngine::new();
        let err = engine.decode(b"definitely not audio").unwrap_err();
        assert_eq!(err.error_code(), "DECODE_FAILED");
    }

    #[test]
    fn test_decode_empty_payload_is_empty_audio() {
        let wav = write_wav(&[], 1, 44100, 2);
        let engine = WavEngine::new();
        let err = engine.decode(&wav).unwrap_err();
        assert_eq!(err.error_code(), "EMPTY_AUDIO");
    }

    #[test]
    fn test_resample_same_rate_is_clone() {
        let tone = generate_test_tone(440.0, 0.1, 44100);
        let engine = WavEngine::new();
        let out = engine.resample(&tone, 44100).unwrap();
        assert_eq!(out, tone);
    }

    #[test]
    fn test_resample_preserves_duration() {
        let tone = generate_test_tone(440.0, 0.5, 44100);
        let engine = WavEngine::new();

        let up = engine.resample(&tone, 48000).unwrap();
        assert_eq!(up.sample_rate, 48000);
        assert!((up.duration_secs() - 0.5).abs() < 0.001);

        let down = engine.resample(&tone, 22050).unwrap();
        assert_eq!(down.sample_rate, 22050);
        assert!((down.duration_secs() - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_resample_interpolates() {
        let ramp = resample_linear(&[0.0, 1.0, 0.0], 2.0);
        assert!(ramp.len() >= 5);
        // At index 1 (source position 0.5), should be 0.5
        assert!((ramp[1] - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_playback_unavailable() {
        let tone = generate_test_tone(440.0, 0.1, 44100);
        let engine = WavEngine::new();
        let err = engine.start_playback(&tone).unwrap_err();
        assert_eq!(err.error_code(), "PLAYBACK_UNAVAILABLE");
    }

    #[test]
    fn test_dir_sink_writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirSink::new(dir.path().join("out")).unwrap();

        sink.save(b"abc", "one.wav").unwrap();
        let written = std::fs::read(dir.path().join("out").join("one.wav")).unwrap();
        assert_eq!(written, b"abc");
    }
}
