//! Audio engine module
//!
//! Host-capability seam and the core buffer type:
//! - Audio buffer management
//! - `AudioEngine` / `SaveSink` collaborator traits
//! - Reference WAV-backed engine and disk sink

pub mod buffer;
pub mod io;

pub use buffer::{AudioBuffer, ChannelLayout};
pub use io::{generate_stereo_test_tone, generate_test_tone, DirSink, WavEngine};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::Result;

/// Host-provided audio capability
///
/// The core never decodes compressed audio or renders across sample rates
/// itself; both are delegated here. Playback is equally host territory: the
/// engine hands back a [`PlaybackHandle`] the session can cancel.
pub trait AudioEngine {
    /// Decode a compressed or PCM byte stream into an audio buffer
    fn decode(&self, bytes: &[u8]) -> Result<AudioBuffer>;

    /// Render a buffer at a different sample rate
    ///
    /// Quality and algorithm are up to the host. Implementations must return
    /// a buffer whose `sample_rate` equals `target_rate`.
    fn resample(&self, buffer: &AudioBuffer, target_rate: u32) -> Result<AudioBuffer>;

    /// Start audible playback of a processed buffer
    ///
    /// Returns a cancellation handle. The host drives the audio to natural
    /// completion unless the handle is stopped first.
    fn start_playback(&self, buffer: &AudioBuffer) -> Result<PlaybackHandle>;
}

/// Fire-and-forget persistence for finished WAV blobs
pub trait SaveSink {
    /// Persist `bytes` under `filename` in the host environment
    fn save(&self, bytes: &[u8], filename: &str) -> Result<()>;
}

/// Cancellation token for one playback
///
/// Cloning shares the underlying flag, so the host's playback thread can keep
/// a copy and poll [`PlaybackHandle::is_stopped`] while the session keeps the
/// original to cancel with. Stopping is idempotent.
#[derive(Debug, Clone, Default)]
pub struct PlaybackHandle {
    stopped: Arc<AtomicBool>,
}

impl PlaybackHandle {
    /// Create a fresh, un-stopped handle
    pub fn new() -> Self {
        Self::default()
    }

    /// Request that playback stop immediately
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    /// Check whether stop has been requested
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}
