//! Settings file command.

use anyhow::Context;

use crate::config::{self, Config};

/// Print the effective settings, saving them when asked
pub fn cmd_settings(config: &Config, save: bool) -> anyhow::Result<()> {
    match config::config_path() {
        Some(path) => println!("Settings file: {}", path.display()),
        None => println!("Settings file: unavailable (no config directory)"),
    }

    let contents = toml::to_string_pretty(config).context("Failed to encode settings")?;
    println!("\n{}", contents);

    if save {
        let path = config::save(config).context("Failed to save settings")?;
        println!("Saved to {}", path.display());
    }
    Ok(())
}
