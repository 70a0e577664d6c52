//! Conversion target settings
//!
//! The settings surface mirrors what the converter UI exposes: target sample
//! rate, output bit depth, and channel layout policy. Settings are global to
//! a session and captured by value at the start of each pipeline run.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{ConvertError, Result};

/// Output bit depth
///
/// Only 8 and 16 bit PCM output exist; anything else is an
/// `UnsupportedFormat` at the conversion boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(try_from = "u16", into = "u16")]
pub enum BitDepth {
    #[value(name = "8")]
    Bits8,
    #[value(name = "16")]
    Bits16,
}

impl BitDepth {
    /// Bits per sample (8 or 16)
    pub fn bits(&self) -> u16 {
        match self {
            BitDepth::Bits8 => 8,
            BitDepth::Bits16 => 16,
        }
    }

    /// Bytes per sample (1 or 2)
    pub fn bytes_per_sample(&self) -> u16 {
        match self {
            BitDepth::Bits8 => 1,
            BitDepth::Bits16 => 2,
        }
    }
}

impl TryFrom<u16> for BitDepth {
    type Error = ConvertError;

    fn try_from(bits: u16) -> Result<Self> {
        match bits {
            8 => Ok(BitDepth::Bits8),
            16 => Ok(BitDepth::Bits16),
            other => Err(ConvertError::UnsupportedFormat {
                format: format!("{}-bit output (only 8 and 16 supported)", other),
            }),
        }
    }
}

impl From<BitDepth> for u16 {
    fn from(depth: BitDepth) -> u16 {
        depth.bits()
    }
}

/// Policy for reducing a stereo source to the requested output layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ChannelMode {
    /// Keep the source channels as-is (mono stays mono)
    #[default]
    Both,
    /// Left channel only
    Left,
    /// Right channel only (degrades to channel 0 for mono sources)
    Right,
    /// Arithmetic mean of left and right
    Mix,
}

impl ChannelMode {
    /// Number of channels this mode produces from a source with
    /// `source_channels` channels
    pub fn output_channels(&self, source_channels: usize) -> usize {
        match self {
            ChannelMode::Both => source_channels.min(2),
            _ => 1,
        }
    }
}

/// Conversion target settings
///
/// # Example
/// ```
/// use rewav::settings::{BitDepth, ChannelMode, TargetSettings};
///
/// let settings = TargetSettings::new(22050, BitDepth::Bits8, ChannelMode::Mix);
/// assert!(settings.validate().is_ok());
/// assert_eq!(settings.bit_depth.bytes_per_sample(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetSettings {
    /// Target sample rate in Hz (must be positive; hosts typically constrain
    /// to 8000-64000)
    pub sample_rate: u32,
    /// Output bit depth
    pub bit_depth: BitDepth,
    /// Channel reduction policy
    pub channel_mode: ChannelMode,
}

impl Default for TargetSettings {
    fn default() -> Self {
        TargetSettings {
            sample_rate: 44100,
            bit_depth: BitDepth::Bits16,
            channel_mode: ChannelMode::Both,
        }
    }
}

impl TargetSettings {
    /// Create settings with the given targets
    pub fn new(sample_rate: u32, bit_depth: BitDepth, channel_mode: ChannelMode) -> Self {
        TargetSettings {
            sample_rate,
            bit_depth,
            channel_mode,
        }
    }

    /// Check the settings for internal consistency
    ///
    /// # Errors
    /// `UnsupportedFormat` if the sample rate is zero.
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(ConvertError::UnsupportedFormat {
                format: "0 Hz sample rate".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_depth_conversions() {
        assert_eq!(BitDepth::Bits8.bytes_per_sample(), 1);
        assert_eq!(BitDepth::Bits16.bytes_per_sample(), 2);
        assert_eq!(BitDepth::try_from(8).unwrap(), BitDepth::Bits8);
        assert_eq!(BitDepth::try_from(16).unwrap(), BitDepth::Bits16);
        assert_eq!(u16::from(BitDepth::Bits16), 16);

        let err = BitDepth::try_from(24).unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_FORMAT");
    }

    #[test]
    fn test_channel_mode_output_channels() {
        assert_eq!(ChannelMode::Both.output_channels(2), 2);
        assert_eq!(ChannelMode::Both.output_channels(1), 1);
        assert_eq!(ChannelMode::Left.output_channels(2), 1);
        assert_eq!(ChannelMode::Right.output_channels(1), 1);
        assert_eq!(ChannelMode::Mix.output_channels(2), 1);
    }

    #[test]
    fn test_settings_validate() {
        assert!(TargetSettings::default().validate().is_ok());

        let bad = TargetSettings::new(0, BitDepth::Bits16, ChannelMode::Both);
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_settings_json_roundtrip() {
        let settings = TargetSettings::new(22050, BitDepth::Bits8, ChannelMode::Mix);
        let json = serde_json::to_string(&settings).unwrap();
        assert!(json.contains("\"bit_depth\":8"));
        assert!(json.contains("\"mix\""));

        let back: TargetSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn test_settings_json_rejects_bad_depth() {
        let result: std::result::Result<TargetSettings, _> = serde_json::from_str(
            r#"{"sample_rate": 44100, "bit_depth": 24, "channel_mode": "both"}"#,
        );
        assert!(result.is_err());
    }
}
