//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `scan`: Album detection and attribute writing
//! - `cover`: Cover candidate scoring
//! - `settings`: Showing and saving the settings file

mod cover;
mod scan;
mod settings;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{self, Config};

pub use cover::cmd_cover;
pub use scan::cmd_scan;
pub use settings::cmd_settings;

/// Album Minder CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Detect albums in directories and write their attributes
    Scan {
        /// Directories to scan
        #[arg(required = true)]
        dirs: Vec<PathBuf>,
        #[command(flatten)]
        flags: PolicyFlags,
        /// Accept albums with conflicting tags without asking
        #[arg(long)]
        yes: bool,
        /// Report albums without writing anything
        #[arg(long)]
        dry_run: bool,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Score the images of a directory and pick its cover
    Cover {
        /// Album directory
        dir: PathBuf,
    },
    /// Show the effective settings
    Settings {
        #[command(flatten)]
        flags: PolicyFlags,
        /// Save the effective settings to the settings file
        #[arg(long)]
        save: bool,
    },
}

/// Policy switches shared by `scan` and `settings`.
///
/// Switches only ever turn options on; they are applied on top of the
/// settings file when `--settings` is given, else on top of the defaults.
#[derive(Args, Debug, Clone, Default)]
pub struct PolicyFlags {
    /// Enter directories recursively, reporting sub-albums on their own
    #[arg(short, long)]
    pub recursive: bool,

    /// Read song lengths from tags only, never from the audio stream
    #[arg(short = 'm', long)]
    pub tags_only: bool,

    /// Overwrite attributes that are already present
    #[arg(short, long)]
    pub force: bool,

    /// Find a cover image for each album
    #[arg(short, long)]
    pub cover: bool,

    /// Allow different artists in one album (samplers, soundtracks, ...)
    #[arg(short = 'd', long)]
    pub different_artists: bool,

    /// Read options from the settings file
    #[arg(short, long)]
    pub settings: bool,

    /// Fewest audio files a directory needs to count as an album
    #[arg(long, value_name = "N")]
    pub min_tracks: Option<usize>,
}

impl PolicyFlags {
    /// The configuration these switches describe.
    pub fn resolve(&self) -> anyhow::Result<Config> {
        let mut config = if self.settings {
            config::load()
        } else {
            Config::default()
        };

        config.policy.recursive_sub_albums |= self.recursive;
        config.policy.allow_different_artists |= self.different_artists;
        config.policy.select_cover |= self.cover;
        config.writer.overwrite |= self.force;
        if self.tags_only {
            config.metadata.probe_duration = false;
        }
        if let Some(min) = self.min_tracks {
            config.policy.min_tracks_for_album = min;
        }

        config.policy.validate().context("Invalid settings")?;
        Ok(config)
    }
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Scan {
            dirs,
            flags,
            yes,
            dry_run,
            json,
        } => cmd_scan(dirs, &flags.resolve()?, *yes, *dry_run, *json),
        Commands::Cover { dir } => cmd_cover(dir),
        Commands::Settings { flags, save } => cmd_settings(&flags.resolve()?, *save),
    }
}
