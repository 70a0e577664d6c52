//! Conversion session state machine
//!
//! Owns the ordered set of loaded files, the target settings, and the
//! playback state. All mutation goes through `Session` methods; there are no
//! ambient globals. The session holds decoded PCM per file and re-runs the
//! transcode pipeline on demand (play, save) under the settings current at
//! that moment — transcoded output is never cached.

use log::{debug, info, warn};

use crate::engine::buffer::AudioBuffer;
use crate::engine::{AudioEngine, PlaybackHandle, SaveSink};
use crate::error::{ConvertError, Result};
use crate::pipeline;
use crate::settings::TargetSettings;

/// A named byte stream handed to the session for decoding
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        SourceFile {
            name: name.into(),
            bytes,
        }
    }
}

/// A successfully decoded file held by the session
///
/// Never mutated after creation; destroyed on removal or session clear.
#[derive(Debug, Clone)]
pub struct FileEntry {
    name: String,
    source_bytes: usize,
    buffer: AudioBuffer,
}

impl FileEntry {
    /// Source file name (unique within the session)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Size of the encoded source in bytes
    pub fn source_bytes(&self) -> usize {
        self.source_bytes
    }

    /// The decoded audio
    pub fn buffer(&self) -> &AudioBuffer {
        &self.buffer
    }
}

/// Derived statistics for one entry, recomputed whenever the file set or the
/// settings change
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntryStats {
    /// Duration of the decoded audio in seconds
    pub duration_secs: f64,
    /// Encoded source size in bytes
    pub input_bytes: usize,
    /// Projected converted size in bytes under the current settings
    pub projected_output_bytes: u64,
}

/// One active playback: which entry, and the handle to cancel it
#[derive(Debug)]
struct ActivePlayback {
    index: usize,
    handle: PlaybackHandle,
}

/// Session manager for a set of in-flight files
///
/// # Example
/// ```no_run
/// use rewav::engine::WavEngine;
/// use rewav::session::{Session, SourceFile};
/// use rewav::settings::TargetSettings;
///
/// let mut session = Session::new(Box::new(WavEngine::new()), TargetSettings::default());
/// let bytes = std::fs::read("track.wav").unwrap();
/// let failures = session.add_files(vec![SourceFile::new("track.wav", bytes)]);
/// assert!(failures.is_empty());
/// ```
pub struct Session {
    engine: Box<dyn AudioEngine>,
    settings: TargetSettings,
    files: Vec<FileEntry>,
    stats: Vec<EntryStats>,
    playback: Option<ActivePlayback>,
}

impl Session {
    /// Create an empty session backed by the given engine
    pub fn new(engine: Box<dyn AudioEngine>, settings: TargetSettings) -> Self {
        Session {
            engine,
            settings,
            files: Vec::new(),
            stats: Vec::new(),
            playback: None,
        }
    }

    // ========================================================================
    // File set operations
    // ========================================================================

    /// Decode and insert source files
    ///
    /// Files whose name is already present are skipped (exact, case-sensitive
    /// match). A decode failure skips that file only; every other file still
    /// goes in. The returned vector lists the per-file failures.
    ///
    /// Entries stay sorted by name at all times; an active playback keeps
    /// following its entry across the re-sort.
    pub fn add_files(&mut self, sources: Vec<SourceFile>) -> Vec<(String, ConvertError)> {
        let mut failures = Vec::new();
        let mut inserted = 0usize;

        for source in sources {
            if self.files.iter().any(|f| f.name == source.name) {
                debug!("skipping duplicate file {:?}", source.name);
                continue;
            }
            match self.engine.decode(&source.bytes) {
                Ok(buffer) => {
                    self.files.push(FileEntry {
                        name: source.name,
                        source_bytes: source.bytes.len(),
                        buffer,
                    });
                    inserted += 1;
                }
                Err(err) => {
                    warn!("failed to decode {:?}: {}", source.name, err);
                    failures.push((source.name, err));
                }
            }
        }

        if inserted > 0 {
            self.sort_entries();
            self.recompute_stats();
            info!("added {} file(s), {} total", inserted, self.files.len());
        }
        failures
    }

    /// Remove the entry at `index`
    ///
    /// Stops playback first when that entry is the one playing, so a removed
    /// entry can never keep sounding. Out-of-range indices are a logged
    /// no-op.
    pub fn remove(&mut self, index: usize) {
        if index >= self.files.len() {
            warn!("remove: index {} out of range", index);
            return;
        }

        match self.playing_index() {
            Some(playing) if playing == index => self.stop_playback(),
            Some(playing) if playing > index => {
                // Entries above the removed one shift down
                if let Some(playback) = self.playback.as_mut() {
                    playback.index = playing - 1;
                }
            }
            _ => {}
        }

        let entry = self.files.remove(index);
        self.stats.remove(index);
        info!("removed {:?}", entry.name);
    }

    /// Drop every entry, its stats, and any active playback
    pub fn clear(&mut self) {
        self.stop_playback();
        self.files.clear();
        self.stats.clear();
    }

    // ========================================================================
    // Playback
    // ========================================================================

    /// Toggle playback of the entry at `index`
    ///
    /// Already playing that entry: stop it. Playing another: stop the other
    /// first, then start this one — at most one playback ever runs, with no
    /// audible overlap. Starting runs the float pipeline stages on the
    /// entry's buffer under the current settings.
    pub fn play_pause(&mut self, index: usize) -> Result<()> {
        if index >= self.files.len() {
            warn!("play_pause: index {} out of range", index);
            return Ok(());
        }

        if self.playing_index() == Some(index) {
            self.stop_playback();
            return Ok(());
        }

        // Stop any other playback synchronously before starting the new one
        self.stop_playback();

        let entry = &self.files[index];
        let processed = pipeline::process(self.engine.as_ref(), &entry.buffer, &self.settings)?;
        let handle = self.engine.start_playback(&processed)?;
        debug!("playing {:?}", entry.name);
        self.playback = Some(ActivePlayback { index, handle });
        Ok(())
    }

    /// Host notification that the active playback ran to natural completion
    pub fn on_playback_finished(&mut self) {
        if let Some(playback) = self.playback.take() {
            debug!("playback of entry {} finished", playback.index);
        }
    }

    /// Index of the entry currently playing, if any
    pub fn playing_index(&self) -> Option<usize> {
        self.playback.as_ref().map(|p| p.index)
    }

    fn stop_playback(&mut self) {
        if let Some(playback) = self.playback.take() {
            playback.handle.stop();
            debug!("stopped playback of entry {}", playback.index);
        }
    }

    // ========================================================================
    // Settings
    // ========================================================================

    /// Replace the session settings
    ///
    /// Stops any active playback (output produced under the old settings must
    /// not continue audibly) and recomputes all derived statistics.
    /// Re-applying identical settings is safe; stored audio is never touched.
    pub fn change_settings(&mut self, settings: TargetSettings) {
        self.stop_playback();
        self.settings = settings;
        self.recompute_stats();
    }

    /// Current target settings
    pub fn settings(&self) -> TargetSettings {
        self.settings
    }

    // ========================================================================
    // Conversion
    // ========================================================================

    /// Transcode every entry and hand the blobs to the sink
    ///
    /// Output filenames are the source names with their extension replaced by
    /// `.wav`. Each file converts independently; failures are collected and
    /// returned without blocking the rest of the batch.
    pub fn save_all(&self, sink: &dyn SaveSink) -> Vec<(String, ConvertError)> {
        let mut failures = Vec::new();

        for entry in &self.files {
            let result = pipeline::transcode(self.engine.as_ref(), &entry.buffer, &self.settings)
                .and_then(|blob| sink.save(&blob, &wav_filename(&entry.name)));
            match result {
                Ok(()) => info!("converted {:?}", entry.name),
                Err(err) => {
                    warn!("failed to convert {:?}: {}", entry.name, err);
                    failures.push((entry.name.clone(), err));
                }
            }
        }

        failures
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Loaded entries, sorted by name
    pub fn files(&self) -> &[FileEntry] {
        &self.files
    }

    /// Derived statistics, parallel to [`Session::files`]
    pub fn stats(&self) -> &[EntryStats] {
        &self.stats
    }

    /// Number of loaded entries
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check whether the session holds no files
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Sort entries by name, keeping an active playback pinned to its entry
    ///
    /// Case-insensitive primary ordering with a byte-order tiebreak.
    fn sort_entries(&mut self) {
        let playing_name = self
            .playing_index()
            .map(|index| self.files[index].name.clone());

        self.files.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name))
        });

        if let (Some(name), Some(playback)) = (playing_name, self.playback.as_mut()) {
            if let Some(index) = self.files.iter().position(|f| f.name == name) {
                playback.index = index;
            }
        }
    }

    fn recompute_stats(&mut self) {
        let settings = self.settings;
        self.stats = self
            .files
            .iter()
            .map(|entry| entry_stats(entry, &settings))
            .collect();
    }
}

/// Projected statistics for one entry under the given settings
fn entry_stats(entry: &FileEntry, settings: &TargetSettings) -> EntryStats {
    let buffer = &entry.buffer;
    let out_channels = settings.channel_mode.output_channels(buffer.channels());
    let projected = buffer.duration_secs()
        * settings.sample_rate as f64
        * settings.bit_depth.bytes_per_sample() as f64
        * out_channels as f64;

    EntryStats {
        duration_secs: buffer.duration_secs(),
        input_bytes: entry.source_bytes,
        projected_output_bytes: projected.round() as u64,
    }
}

/// Replace the extension of a source name with `.wav`
///
/// Names with no extension (or nothing but a leading dot) get `.wav`
/// appended, so every saved file carries the suffix.
fn wav_filename(name: &str) -> String {
    match name.rfind('.') {
        Some(dot) if dot > 0 => format!("{}.wav", &name[..dot]),
        _ => format!("{}.wav", name),
    }
}

// ============================================================================
// Tests
// ============================================================================
