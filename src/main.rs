//! rewav CLI - batch audio to WAV converter
//!
//! Command-line front-end for the rewav conversion library.

use clap::Parser;
use env_logger::Env;
use log::info;

use rewav::cli::{commands, Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logger
    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    info!("rewav v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Some(Commands::Convert {
            files,
            out_dir,
            target,
        }) => commands::convert(&files, &out_dir, &target),
        Some(Commands::Info { files, target }) => commands::info(&files, &target),
        None => {
            println!("rewav v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
            Ok(())
        }
    }
}
