//! Test utilities and fixtures for album-minder tests.
//!
//! [`MockStore`] answers tag queries from memory so album detection can be
//! tested on real (empty) files without crafting audio data.
//!
//! # Example
//!
//! ```ignore
//! let dir = tempfile::tempdir().unwrap();
//! let store = MockStore::new()
//!     .with_track(touch(dir.path(), "01.mp3"), mock_track("Artist", "Album", "Rock", 1999));
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::metadata::MetadataStore;
use crate::model::{FileKind, TrackMetadata};

/// In-memory [`MetadataStore`].
///
/// Files are classified by extension; audio files without registered tags
/// fail to read, like a corrupt file would.
#[derive(Debug, Default)]
pub struct MockStore {
    tracks: HashMap<PathBuf, TrackMetadata>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the tags of the file at `path`.
    pub fn with_track(mut self, path: impl Into<PathBuf>, track: TrackMetadata) -> Self {
        self.tracks.insert(path.into(), track);
        self
    }
}

impl MetadataStore for MockStore {
    fn classify(&self, path: &Path) -> FileKind {
        match path.extension().and_then(|e| e.to_str()) {
            Some("mp3") | Some("flac") => FileKind::Audio,
            Some("jpg") | Some("png") => FileKind::Image,
            _ => FileKind::Other,
        }
    }

    fn read_track(&self, path: &Path) -> Result<TrackMetadata> {
        self.tracks
            .get(path)
            .cloned()
            .ok_or_else(|| Error::metadata(path, "no tags registered"))
    }
}

/// Creates a TrackMetadata lasting three minutes.
pub fn mock_track(artist: &str, album: &str, genre: &str, year: u32) -> TrackMetadata {
    TrackMetadata {
        artist: artist.to_string(),
        album: album.to_string(),
        genre: genre.to_string(),
        year,
        duration_secs: 180,
    }
}

/// Creates an empty file `name` in `dir` (and `dir` itself) and returns its path.
pub fn touch(dir: &Path, name: &str) -> PathBuf {
    std::fs::create_dir_all(dir).expect("Failed to create test directory");
    let path = dir.join(name);
    std::fs::write(&path, b"").expect("Failed to create test file");
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_mock_store_reads_registered_tracks() {
        let dir = TempDir::new().unwrap();
        let path = touch(dir.path(), "song.mp3");
        let store = MockStore::new().with_track(&path, mock_track("A", "B", "C", 2000));

        assert_eq!(store.classify(&path), FileKind::Audio);
        assert_eq!(store.read_track(&path).unwrap().artist, "A");
        assert!(store.read_track(&dir.path().join("other.mp3")).is_err());
    }

    #[test]
    fn test_touch_creates_nested_directories() {
        let dir = TempDir::new().unwrap();
        let path = touch(&dir.path().join("a").join("b"), "cover.jpg");
        assert!(path.is_file());
    }
}
