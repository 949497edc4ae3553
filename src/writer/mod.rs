//! Persisting album attributes.
//!
//! [`AlbumWriter`] is the sink for accepted albums. [`SidecarWriter`] stores
//! the attributes as a small TOML file inside the album directory:
//!
//! ```toml
//! artist = "Miles Davis"
//! title = "Kind of Blue"
//! genre = "Jazz"
//! length = "45:59"
//! year = "1959"
//! tracks = 5
//! cover = "cover.jpg"
//! ```
//!
//! Unless `overwrite` is set, attributes already present in an existing
//! sidecar are kept and only the missing ones are filled in.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::WriterConfig;
use crate::error::{Error, Result};
use crate::model::AlbumRecord;

/// Sink for accepted albums. Writing the same album twice must be safe.
pub trait AlbumWriter: Sync {
    fn write(&self, dir: &Path, record: &AlbumRecord, cover: Option<&Path>) -> Result<()>;
}

/// On-disk layout of the sidecar file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlbumAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracks: Option<usize>,
    /// Cover image, relative to the album directory when below it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover: Option<PathBuf>,
}

impl AlbumAttributes {
    pub fn from_record(dir: &Path, record: &AlbumRecord, cover: Option<&Path>) -> Self {
        Self {
            artist: Some(record.artist.clone()),
            title: Some(record.title.clone()),
            genre: Some(record.genre.clone()),
            length: Some(record.length_string()),
            year: record.year_string(),
            tracks: Some(record.track_count),
            cover: cover.map(|c| c.strip_prefix(dir).unwrap_or(c).to_path_buf()),
        }
    }

    /// Keep every attribute already set in `self`, take the rest from `fresh`.
    pub fn fill_from(self, fresh: Self) -> Self {
        Self {
            artist: self.artist.or(fresh.artist),
            title: self.title.or(fresh.title),
            genre: self.genre.or(fresh.genre),
            length: self.length.or(fresh.length),
            year: self.year.or(fresh.year),
            tracks: self.tracks.or(fresh.tracks),
            cover: self.cover.or(fresh.cover),
        }
    }
}

/// Writes [`AlbumAttributes`] into each album directory.
#[derive(Debug, Clone, Default)]
pub struct SidecarWriter {
    config: WriterConfig,
}

impl SidecarWriter {
    pub fn new(config: WriterConfig) -> Self {
        Self { config }
    }

    pub fn sidecar_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.config.sidecar_name)
    }

    /// Read the sidecar of `dir`, if there is one.
    pub fn read(&self, dir: &Path) -> Result<Option<AlbumAttributes>> {
        let path = self.sidecar_path(dir);
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&path)?;
        let attrs = toml::from_str(&contents).map_err(|e| Error::persistence(&path, e))?;
        Ok(Some(attrs))
    }
}

impl AlbumWriter for SidecarWriter {
    fn write(&self, dir: &Path, record: &AlbumRecord, cover: Option<&Path>) -> Result<()> {
        let path = self.sidecar_path(dir);
        let fresh = AlbumAttributes::from_record(dir, record, cover);

        let attrs = if self.config.overwrite {
            fresh
        } else {
            match self.read(dir) {
                Ok(Some(existing)) => existing.fill_from(fresh),
                Ok(None) => fresh,
                Err(e) => {
                    // An unparsable sidecar is replaced rather than blocking the album
                    tracing::warn!(target: "writer::sidecar", path = %path.display(), error = %e, "Replacing unreadable sidecar");
                    fresh
                }
            }
        };

        let contents = toml::to_string_pretty(&attrs).map_err(|e| Error::persistence(&path, e))?;

        // Write atomically (write to temp, then rename)
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, contents).map_err(|e| Error::persistence(&temp_path, e))?;
        fs::rename(&temp_path, &path).map_err(|e| Error::persistence(&path, e))?;

        tracing::debug!(target: "writer::sidecar", path = %path.display(), "Album attributes written");
        Ok(())
    }
}
