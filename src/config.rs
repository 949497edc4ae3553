//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\album-minder\config.toml
//! - macOS: ~/Library/Application Support/album-minder/config.toml
//! - Linux: ~/.config/album-minder/config.toml
//!
//! The file is only consulted when asked for (`--settings`); a scan reads
//! it once and holds the values constant for the whole tree walk.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Default sidecar file written into album directories.
pub const DEFAULT_SIDECAR_NAME: &str = ".album.toml";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Album detection policy
    pub policy: PolicyConfig,

    /// Tag reading settings
    pub metadata: MetadataConfig,

    /// Album attribute output
    pub writer: WriterConfig,
}

/// Toggles controlling recursion, conflict tolerance and cover selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Report sub-directories as albums of their own
    pub recursive_sub_albums: bool,

    /// Accept albums whose tracks disagree on artist or title
    pub allow_different_artists: bool,

    /// Pick a cover image for accepted albums
    pub select_cover: bool,

    /// Fewest audio files a directory needs to count as an album
    pub min_tracks_for_album: usize,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            recursive_sub_albums: false,
            allow_different_artists: false,
            select_cover: false,
            min_tracks_for_album: 3,
        }
    }
}

impl PolicyConfig {
    pub fn validate(&self) -> Result<()> {
        if self.min_tracks_for_album == 0 {
            return Err(Error::config("min_tracks_for_album must be at least 1"));
        }
        Ok(())
    }
}

/// Tag reading settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataConfig {
    /// Fall back to the audio stream's duration when no length tag exists
    pub probe_duration: bool,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            probe_duration: true,
        }
    }
}

/// Album attribute output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    /// Replace attributes that already exist instead of only filling gaps
    pub overwrite: bool,

    /// File name of the sidecar written into each album directory
    pub sidecar_name: String,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            overwrite: false,
            sidecar_name: DEFAULT_SIDECAR_NAME.to_string(),
        }
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("album-minder"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from the default location.
///
/// Returns default config if the file doesn't exist or can't be parsed.
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };
    load_from(&path)
}

/// Load configuration from an explicit path, falling back to defaults.
pub fn load_from(path: &Path) -> Config {
    if !path.exists() {
        tracing::info!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::error!("Failed to parse config file {:?}: {}", path, e);
                tracing::warn!("Using default configuration");
                Config::default()
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file {:?}: {}", path, e);
            Config::default()
        }
    }
}

/// Save configuration to the default location.
pub fn save(config: &Config) -> std::result::Result<PathBuf, ConfigError> {
    let path = config_path().ok_or(ConfigError::NoConfigDir)?;
    save_to(config, &path)?;
    Ok(path)
}

/// Save configuration to an explicit path.
///
/// Creates the parent directory if it doesn't exist.
pub fn save_to(config: &Config, path: &Path) -> std::result::Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir(dir.to_path_buf(), e))?;
    }

    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, path)
        .map_err(|e| ConfigError::Rename(temp_path, path.to_path_buf(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(toml.contains("[policy]"));
        assert!(toml.contains("[metadata]"));
        assert!(toml.contains("[writer]"));
        assert!(toml.contains("min_tracks_for_album = 3"));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let toml = r#"
[policy]
recursive_sub_albums = true
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert!(config.policy.recursive_sub_albums);
        assert!(!config.policy.allow_different_artists);
        assert_eq!(config.policy.min_tracks_for_album, 3);
        assert!(config.metadata.probe_duration);
        assert_eq!(config.writer.sidecar_name, DEFAULT_SIDECAR_NAME);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.policy.allow_different_artists = true;
        config.policy.select_cover = true;
        config.writer.overwrite = true;

        save_to(&config, &path).unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("toml.tmp").exists());

        assert_eq!(load_from(&path), config);
    }

    #[test]
    fn test_broken_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[policy\nrecursive_sub_albums = ").unwrap();

        assert_eq!(load_from(&path), Config::default());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        assert_eq!(load_from(&dir.path().join("absent.toml")), Config::default());
    }

    #[test]
    fn test_zero_min_tracks_is_invalid() {
        let policy = PolicyConfig {
            min_tracks_for_album: 0,
            ..PolicyConfig::default()
        };
        assert!(matches!(policy.validate(), Err(Error::Config(_))));
        assert!(PolicyConfig::default().validate().is_ok());
    }
}
