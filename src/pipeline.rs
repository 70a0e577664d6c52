//! Transcode pipeline
//!
//! Fixed-order orchestration of the signal transforms: engine resample →
//! channel reduce → peak normalize → quantize → WAV container. Reduction runs
//! before normalization so the peak reflects only retained channels;
//! normalization runs before quantization so the integer range is fully used
//! before truncation.

use log::debug;

use crate::dsp::{normalize_peak, quantize, reduce_channels};
use crate::engine::buffer::AudioBuffer;
use crate::engine::AudioEngine;
use crate::error::Result;
use crate::settings::TargetSettings;
use crate::wav::write_wav;

/// Run the float stages of the pipeline: resample, reduce, normalize
///
/// This is the buffer playback previews; it is exactly what `transcode`
/// quantizes. Settings are taken by value semantics — the caller's settings at
/// call time govern the whole run.
pub fn process(
    engine: &dyn AudioEngine,
    buffer: &AudioBuffer,
    settings: &TargetSettings,
) -> Result<AudioBuffer> {
    settings.validate()?;

    let resampled = engine.resample(buffer, settings.sample_rate)?;
    let mut reduced = reduce_channels(resampled, settings.channel_mode);
    let gain = normalize_peak(&mut reduced);
    debug!(
        "processed {} frames, {} ch, gain {:.4}",
        reduced.frames(),
        reduced.channels(),
        gain
    );
    Ok(reduced)
}

/// Run the full pipeline and produce a finished WAV byte stream
///
/// Deterministic: the same buffer and settings always produce byte-identical
/// output.
pub fn transcode(
    engine: &dyn AudioEngine,
    buffer: &AudioBuffer,
    settings: &TargetSettings,
) -> Result<Vec<u8>> {
    let processed = process(engine, buffer, settings)?;
    let bytes_per_sample = settings.bit_depth.bytes_per_sample();
    let channels = processed.channels() as u16;

    let pcm = quantize(&processed.samples, bytes_per_sample)?;
    Ok(write_wav(
        &pcm,
        channels,
        settings.sample_rate,
        bytes_per_sample,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::WavEngine;
    use crate::settings::{BitDepth, ChannelMode};
    use crate::wav::HEADER_LEN;

    fn mono_buffer(samples: Vec<f32>) -> AudioBuffer {
        AudioBuffer {
            samples: vec![samples],
            sample_rate: 44100,
        }
    }

    #[test]
    fn test_concrete_scenario() {
        // Mono 44.1kHz [0.5, -0.25] at {44100, 16, both}:
        // normalized to [1.0, -0.5], quantized to 32767 / -16383 LE,
        // wrapped in a 44-byte header describing 4 payload bytes.
        let engine = WavEngine::new();
        let buffer = mono_buffer(vec![0.5, -0.25]);
        let settings = TargetSettings::new(44100, BitDepth::Bits16, ChannelMode::Both);

        let wav = transcode(&engine, &buffer, &settings).unwrap();

        assert_eq!(wav.len(), HEADER_LEN + 4);
        let chunk_size = u32::from_le_bytes(wav[4..8].try_into().unwrap());
        assert_eq!(chunk_size, 40);
        assert_eq!(u16::from_le_bytes(wav[22..24].try_into().unwrap()), 1);
        assert_eq!(u32::from_le_bytes(wav[24..28].try_into().unwrap()), 44100);
        assert_eq!(u32::from_le_bytes(wav[28..32].try_into().unwrap()), 88200);
        assert_eq!(u16::from_le_bytes(wav[32..34].try_into().unwrap()), 2);
        assert_eq!(u16::from_le_bytes(wav[34..36].try_into().unwrap()), 16);
        let data_size = u32::from_le_bytes(wav[40..44].try_into().unwrap());
        assert_eq!(data_size, 4);
        assert_eq!(&wav[44..], &[0xFF, 0x7F, 0x01, 0xC0]);
    }

    #[test]
    fn test_transcode_is_deterministic() {
        let engine = WavEngine::new();
        let buffer = crate::engine::generate_stereo_test_tone(440.0, 660.0, 0.25, 48000);
        let settings = TargetSettings::new(44100, BitDepth::Bits16, ChannelMode::Mix);

        let first = transcode(&engine, &buffer, &settings).unwrap();
        let second = transcode(&engine, &buffer, &settings).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_reduction_happens_before_normalization() {
        // Left channel is quiet, right is loud. Keeping only the left must
        // normalize against the left peak, not the discarded right one.
        let engine = WavEngine::new();
        let buffer = AudioBuffer {
            samples: vec![vec![0.25, -0.125], vec![0.9, -0.9]],
            sample_rate: 44100,
        };
        let settings = TargetSettings::new(44100, BitDepth::Bits16, ChannelMode::Left);

        let processed = process(&engine, &buffer, &settings).unwrap();
        assert_eq!(processed.channels(), 1);
        assert!((processed.peak() - 1.0).abs() < 1e-6);
        assert!((processed.channel(0)[0] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_process_does_not_mutate_source() {
        let engine = WavEngine::new();
        let buffer = mono_buffer(vec![0.5, -0.25]);
        let settings = TargetSettings::default();

        let _ = process(&engine, &buffer, &settings).unwrap();
        // The session's stored buffer must stay pristine across runs
        assert_eq!(buffer.channel(0), &[0.5, -0.25]);
    }

    #[test]
    fn test_transcode_resamples() {
        let engine = WavEngine::new();
        let buffer = crate::engine::generate_test_tone(440.0, 0.5, 48000);
        let settings = TargetSettings::new(24000, BitDepth::Bits16, ChannelMode::Both);

        let wav = transcode(&engine, &buffer, &settings).unwrap();
        let rate = u32::from_le_bytes(wav[24..28].try_into().unwrap());
        assert_eq!(rate, 24000);

        // ~0.5s at 24kHz mono 16-bit: ~24000 payload bytes
        let data_size = u32::from_le_bytes(wav[40..44].try_into().unwrap());
        assert!((data_size as i64 - 24000).unsigned_abs() < 64);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let engine = WavEngine::new();
        let buffer = mono_buffer(vec![0.5]);
        let settings = TargetSettings::new(0, BitDepth::Bits16, ChannelMode::Both);

        assert!(transcode(&engine, &buffer, &settings).is_err());
    }
}
