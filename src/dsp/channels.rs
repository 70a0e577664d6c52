//! Channel reduction
//!
//! Maps a mono or stereo source buffer onto the user-selected output layout.

use crate::engine::buffer::AudioBuffer;
use crate::settings::ChannelMode;

/// Reduce a buffer to the requested channel layout
///
/// - `Both` passes the buffer through unchanged (mono sources are not forced
///   to stereo).
/// - `Left` / `Right` copy the first / second channel into a new mono buffer
///   of the same length and rate. `Right` degrades to channel 0 when the
///   source has fewer than 2 channels.
/// - `Mix` averages channels 0 and 1 per frame (or copies channel 0 alone
///   for mono sources).
///
/// Always succeeds for finite, non-empty buffers; an empty buffer comes back
/// empty.
pub fn reduce_channels(mut buffer: AudioBuffer, mode: ChannelMode) -> AudioBuffer {
    if mode == ChannelMode::Both || buffer.channels() == 0 {
        return buffer;
    }

    let mono = match mode {
        ChannelMode::Both => unreachable!(),
        ChannelMode::Left => std::mem::take(&mut buffer.samples[0]),
        ChannelMode::Right => {
            // Degrades to channel 0 for mono sources
            let index = (buffer.channels() - 1).min(1);
            std::mem::take(&mut buffer.samples[index])
        }
        ChannelMode::Mix => {
            if buffer.channels() < 2 {
                std::mem::take(&mut buffer.samples[0])
            } else {
                let right = &buffer.samples[1];
                buffer.samples[0]
                    .iter()
                    .zip(right.iter())
                    .map(|(&l, &r)| (l + r) / 2.0)
                    .collect()
            }
        }
    };

    AudioBuffer {
        samples: vec![mono],
        sample_rate: buffer.sample_rate,
    }
}
