//! Command-line interface for album-minder.
//!
//! This module provides CLI commands for detecting albums, inspecting cover
//! candidates and managing the settings file.

mod commands;

pub use commands::{Cli, Commands, PolicyFlags, run_command};
