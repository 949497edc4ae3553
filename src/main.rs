//! Album Minder - detects music albums in directory trees.
//!
//! A directory whose audio files share artist and album tags is an album;
//! its summarized attributes (artist, title, genre, length, years, cover)
//! are written next to the music as a small sidecar file.

pub mod album;
pub mod cli;
pub mod config;
pub mod cover;
pub mod error;
pub mod library;
pub mod metadata;
pub mod model;
#[cfg(test)]
pub mod test_utils;
pub mod writer;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Crate module path plus the explicit `target:` prefixes used in log calls
const LOG_TARGETS: &[&str] = &["album_minder", "album", "library", "cover", "metadata", "writer"];

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging
    let level = if args.verbose { "debug" } else { "info" };
    let mut filter = EnvFilter::from_default_env();
    for target in LOG_TARGETS {
        filter = filter.add_directive(format!("{}={}", target, level).parse()?);
    }
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();

    cli::run_command(&args)
}
