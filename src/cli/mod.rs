//! CLI module
//!
//! Command-line interface for the rewav batch converter.

pub mod commands;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::settings::{BitDepth, ChannelMode};

/// rewav - batch audio to uncompressed WAV converter
#[derive(Parser, Debug)]
#[command(name = "rewav")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert input files and write the WAV results to a directory
    #[command(name = "convert")]
    Convert {
        /// Input audio files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output directory for the converted files
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,

        #[command(flatten)]
        target: TargetArgs,
    },

    /// Show duration and projected output size for input files
    #[command(name = "info")]
    Info {
        /// Input audio files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[command(flatten)]
        target: TargetArgs,
    },
}

/// Conversion target flags shared by the subcommands
#[derive(Args, Debug)]
pub struct TargetArgs {
    /// Target sample rate in Hz
    #[arg(short = 'r', long, default_value_t = 44100,
          value_parser = clap::value_parser!(u32).range(8000..=64000))]
    pub rate: u32,

    /// Output bit depth
    #[arg(short, long, default_value = "16")]
    pub bits: BitDepth,

    /// Channel reduction policy
    #[arg(short, long, default_value = "both")]
    pub channels: ChannelMode,

    /// Load settings from a JSON file instead (overrides the flags above)
    #[arg(long)]
    pub settings: Option<PathBuf>,
}
