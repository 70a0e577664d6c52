//! CLI command implementations
//!
//! The binary is a thin host around the session: it reads files from disk,
//! feeds them to the session, and writes the converted blobs back out.

use std::path::PathBuf;

use anyhow::Context;
use log::info;

use crate::cli::TargetArgs;
use crate::engine::{DirSink, WavEngine};
use crate::session::{Session, SourceFile};
use crate::settings::TargetSettings;

/// Convert input files and write the results into `out_dir`.
pub fn convert(files: &[PathBuf], out_dir: &PathBuf, target: &TargetArgs) -> anyhow::Result<()> {
    let settings = resolve_settings(target)?;
    info!(
        "converting {} file(s) to {} Hz / {}-bit",
        files.len(),
        settings.sample_rate,
        settings.bit_depth.bits()
    );

    let mut session = load_session(files, settings)?;
    if session.is_empty() {
        anyhow::bail!("no input files could be decoded");
    }

    let sink = DirSink::new(out_dir).context("failed to create output directory")?;
    let failures = session.save_all(&sink);

    println!(
        "Converted {} of {} file(s) into {}",
        session.len() - failures.len(),
        session.len(),
        out_dir.display()
    );
    for (name, err) in &failures {
        eprintln!("  failed: {}: {}", name, err);
    }
    session.clear();

    Ok(())
}

/// Print per-file duration and projected output size.
pub fn info(files: &[PathBuf], target: &TargetArgs) -> anyhow::Result<()> {
    let settings = resolve_settings(target)?;
    let session = load_session(files, settings)?;

    println!(
        "{:<30} {:>10} {:>12} {:>12}",
        "File", "Duration", "Input", "Output"
    );
    for (entry, stats) in session.files().iter().zip(session.stats()) {
        println!(
            "{:<30} {:>9.1}s {:>11.2}M {:>11.2}M",
            entry.name(),
            stats.duration_secs,
            stats.input_bytes as f64 / 1024.0 / 1024.0,
            stats.projected_output_bytes as f64 / 1024.0 / 1024.0,
        );
    }

    Ok(())
}

/// Build a session from files on disk; unreadable or undecodable files are
/// reported and skipped.
fn load_session(files: &[PathBuf], settings: TargetSettings) -> anyhow::Result<Session> {
    let mut sources = Vec::with_capacity(files.len());
    for path in files {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        match std::fs::read(path) {
            Ok(bytes) => sources.push(SourceFile::new(name, bytes)),
            Err(err) => eprintln!("  failed: {}: {}", path.display(), err),
        }
    }

    let mut session = Session::new(Box::new(WavEngine::new()), settings);
    for (name, err) in session.add_files(sources) {
        eprintln!("  failed: {}: {}", name, err);
    }
    Ok(session)
}

/// Settings from a JSON file when given, otherwise from the flags.
fn resolve_settings(target: &TargetArgs) -> anyhow::Result<TargetSettings> {
    let settings = match &target.settings {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read settings file {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("invalid settings file {}", path.display()))?
        }
        None => TargetSettings::new(target.rate, target.bits, target.channels),
    };
    settings.validate()?;
    Ok(settings)
}
