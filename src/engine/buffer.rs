//! Audio buffer management
//!
//! Provides the core audio buffer type shared by the whole conversion
//! pipeline. Audio is stored as non-interleaved 32-bit float samples at the
//! rate the source was decoded at; the pipeline resamples on demand.

use crate::error::{ConvertError, Result};

// ============================================================================
// Channel Layout
// ============================================================================

/// Audio channel configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChannelLayout {
    /// Single channel (mono)
    Mono,
    /// Two channels (stereo: left, right)
    #[default]
    Stereo,
}

impl ChannelLayout {
    /// Returns the number of channels for this layout
    pub fn num_channels(&self) -> usize {
        match self {
            ChannelLayout::Mono => 1,
            ChannelLayout::Stereo => 2,
        }
    }

    /// Create a ChannelLayout from a channel count
    pub fn from_count(count: usize) -> Option<Self> {
        match count {
            1 => Some(ChannelLayout::Mono),
            2 => Some(ChannelLayout::Stereo),
            _ => None,
        }
    }
}

// ============================================================================
// Audio Buffer
// ============================================================================

/// Core audio buffer type for all processing in rewav
///
/// Stores audio as non-interleaved 32-bit floating point samples, one
/// `Vec<f32>` per channel, all channels the same length. Sample values are
/// conceptually in [-1.0, 1.0] but decoded material is not guaranteed to stay
/// inside that range; the quantizer clamps on output.
///
/// # Example
/// ```
/// use rewav::engine::buffer::{AudioBuffer, ChannelLayout};
///
/// // One second of silence at 44.1kHz, stereo
/// let buffer = AudioBuffer::new(44100, ChannelLayout::Stereo, 44100);
/// assert_eq!(buffer.channels(), 2);
/// assert_eq!(buffer.frames(), 44100);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    /// Sample data: outer Vec is channels, inner Vec is frames
    pub samples: Vec<Vec<f32>>,
    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl AudioBuffer {
    /// Create a new zeroed audio buffer
    ///
    /// # Arguments
    /// * `frames` - Number of samples per channel
    /// * `layout` - Channel configuration (Mono or Stereo)
    /// * `sample_rate` - Sample rate in Hz
    pub fn new(frames: usize, layout: ChannelLayout, sample_rate: u32) -> Self {
        let samples = vec![vec![0.0_f32; frames]; layout.num_channels()];
        Self {
            samples,
            sample_rate,
        }
    }

    /// Create an audio buffer from per-channel sample vectors
    ///
    /// # Errors
    /// `DecodeFailed` if the channel vectors have different lengths.
    pub fn from_channels(channels: Vec<Vec<f32>>, sample_rate: u32) -> Result<Self> {
        if let Some(first) = channels.first() {
            let frames = first.len();
            if channels.iter().any(|ch| ch.len() != frames) {
                return Err(ConvertError::DecodeFailed {
                    reason: "Channels have mismatched lengths".to_string(),
                    source: None,
                });
            }
        }
        Ok(Self {
            samples: channels,
            sample_rate,
        })
    }

    /// Create an audio buffer from interleaved sample data
    ///
    /// # Arguments
    /// * `interleaved` - Interleaved sample data (L, R, L, R, ... for stereo)
    /// * `layout` - Channel configuration
    /// * `sample_rate` - Sample rate in Hz
    ///
    /// # Errors
    /// `DecodeFailed` if the data length is not divisible by the channel count.
    pub fn from_interleaved(
        interleaved: &[f32],
        layout: ChannelLayout,
        sample_rate: u32,
    ) -> Result<Self> {
        let num_channels = layout.num_channels();

        if interleaved.is_empty() {
            return Ok(Self {
                samples: vec![Vec::new(); num_channels],
                sample_rate,
            });
        }

        if interleaved.len() % num_channels != 0 {
            return Err(ConvertError::DecodeFailed {
                reason: format!(
                    "Interleaved data length {} is not divisible by channel count {}",
                    interleaved.len(),
                    num_channels
                ),
                source: None,
            });
        }

        let frames = interleaved.len() / num_channels;
        let mut samples = vec![Vec::with_capacity(frames); num_channels];

        for frame in interleaved.chunks_exact(num_channels) {
            for (ch, &sample) in frame.iter().enumerate() {
                samples[ch].push(sample);
            }
        }

        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// Get the number of channels
    #[inline]
    pub fn channels(&self) -> usize {
        self.samples.len()
    }

    /// Get the number of frames (samples per channel)
    #[inline]
    pub fn frames(&self) -> usize {
        self.samples.first().map(|ch| ch.len()).unwrap_or(0)
    }

    /// Check if the buffer holds no samples
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames() == 0
    }

    /// Get the duration in seconds
    #[inline]
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f64 / self.sample_rate as f64
    }

    /// Get the channel layout, if the count maps to one
    pub fn channel_layout(&self) -> Option<ChannelLayout> {
        ChannelLayout::from_count(self.channels())
    }

    /// Get immutable access to a channel's samples
    ///
    /// # Panics
    /// Panics if the channel index is out of bounds
    #[inline]
    pub fn channel(&self, index: usize) -> &[f32] {
        &self.samples[index]
    }

    /// Get mutable access to a channel's samples
    ///
    /// # Panics
    /// Panics if the channel index is out of bounds
    #[inline]
    pub fn channel_mut(&mut self, index: usize) -> &mut [f32] {
        &mut self.samples[index]
    }

    /// Peak magnitude across all channels and all samples
    ///
    /// Returns 0.0 for empty buffers. The result is a linear amplitude, not
    /// decibels.
    pub fn peak(&self) -> f32 {
        self.samples
            .iter()
            .flat_map(|channel| channel.iter())
            .map(|&s| s.abs())
            .fold(0.0_f32, f32::max)
    }

    /// Check if all samples are finite (not NaN or Infinity)
    pub fn is_finite(&self) -> bool {
        self.samples
            .iter()
            .flat_map(|ch| ch.iter())
            .all(|s| s.is_finite())
    }
}

impl Default for AudioBuffer {
    fn default() -> Self {
        Self::new(0, ChannelLayout::Stereo, 44100)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_buffer(samples: Vec<Vec<f32>>) -> AudioBuffer {
        AudioBuffer {
            samples,
            sample_rate: 44100,
        }
    }

    #[test]
    fn test_channel_layout() {
        assert_eq!(ChannelLayout::Mono.num_channels(), 1);
        assert_eq!(ChannelLayout::Stereo.num_channels(), 2);
        assert_eq!(ChannelLayout::from_count(1), Some(ChannelLayout::Mono));
        assert_eq!(ChannelLayout::from_count(2), Some(ChannelLayout::Stereo));
        assert_eq!(ChannelLayout::from_count(6), None);
    }

    #[test]
    fn test_buffer_new() {
        let buffer = AudioBuffer::new(1000, ChannelLayout::Stereo, 48000);
        assert_eq!(buffer.channels(), 2);
        assert_eq!(buffer.frames(), 1000);
        assert_eq!(buffer.sample_rate, 48000);
    }

    #[test]
    fn test_buffer_duration() {
        let buffer = AudioBuffer::new(44100, ChannelLayout::Mono, 44100);
        assert!((buffer.duration_secs() - 1.0).abs() < 1e-9);

        let zero_rate = AudioBuffer {
            samples: vec![vec![0.0; 10]],
            sample_rate: 0,
        };
        assert_eq!(zero_rate.duration_secs(), 0.0);
    }

    #[test]
    fn test_buffer_from_channels() {
        let buffer =
            AudioBuffer::from_channels(vec![vec![0.1, 0.2], vec![0.3, 0.4]], 44100).unwrap();
        assert_eq!(buffer.channels(), 2);
        assert_eq!(buffer.frames(), 2);

        let mismatched = AudioBuffer::from_channels(vec![vec![0.1, 0.2], vec![0.3]], 44100);
        assert!(mismatched.is_err());
    }

    #[test]
    fn test_buffer_from_interleaved_stereo() {
        let interleaved = vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6];
        let buffer =
            AudioBuffer::from_interleaved(&interleaved, ChannelLayout::Stereo, 44100).unwrap();

        assert_eq!(buffer.channels(), 2);
        assert_eq!(buffer.frames(), 3);
        assert_eq!(buffer.channel(0), &[0.1, 0.3, 0.5]); // Left
        assert_eq!(buffer.channel(1), &[0.2, 0.4, 0.6]); // Right
    }

    #[test]
    fn test_buffer_from_interleaved_mono() {
        let interleaved = vec![0.1, 0.2, 0.3];
        let buffer =
            AudioBuffer::from_interleaved(&interleaved, ChannelLayout::Mono, 44100).unwrap();

        assert_eq!(buffer.channels(), 1);
        assert_eq!(buffer.frames(), 3);
        assert_eq!(buffer.channel(0), &[0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_buffer_from_interleaved_invalid() {
        // 5 samples can't be evenly split into stereo
        let interleaved = vec![0.1, 0.2, 0.3, 0.4, 0.5];
        let result = AudioBuffer::from_interleaved(&interleaved, ChannelLayout::Stereo, 44100);
        assert!(result.is_err());
    }

    #[test]
    fn test_buffer_is_empty() {
        let empty = AudioBuffer::new(0, ChannelLayout::Mono, 44100);
        assert!(empty.is_empty());

        let not_empty = AudioBuffer::new(100, ChannelLayout::Mono, 44100);
        assert!(!not_empty.is_empty());
    }

    #[test]
    fn test_peak() {
        let buffer = create_test_buffer(vec![vec![0.1, -0.7, 0.3], vec![0.2, 0.5, -0.4]]);
        assert!((buffer.peak() - 0.7).abs() < 1e-7);

        let silent = create_test_buffer(vec![vec![0.0; 100]]);
        assert_eq!(silent.peak(), 0.0);

        let empty = create_test_buffer(vec![]);
        assert_eq!(empty.peak(), 0.0);
    }

    #[test]
    fn test_is_finite() {
        let buffer = create_test_buffer(vec![vec![0.5; 100]]);
        assert!(buffer.is_finite());

        let buffer_nan = create_test_buffer(vec![vec![f32::NAN; 100]]);
        assert!(!buffer_nan.is_finite());

        let buffer_inf = create_test_buffer(vec![vec![f32::INFINITY; 100]]);
        assert!(!buffer_inf.is_finite());
    }

    #[test]
    fn test_channel_access() {
        let mut buffer = AudioBuffer::new(100, ChannelLayout::Stereo, 44100);

        let left = buffer.channel_mut(0);
        left[0] = 0.5;
        left[50] = 0.75;

        let left_read = buffer.channel(0);
        assert_eq!(left_read[0], 0.5);
        assert_eq!(left_read[50], 0.75);
    }
}
