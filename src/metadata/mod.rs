//! Per-file metadata access.
//!
//! [`MetadataStore`] is the seam between the album aggregator and the file
//! system's tags. [`TagStore`] implements it with the lofty crate, which
//! gives format-independent access to MP3, FLAC, OGG, M4A, WAV and more.
//!
//! Missing tags are never an error: they come back as empty strings or
//! zero, so the aggregator can fold every readable file.

use lofty::file::{AudioFile, TaggedFileExt};
use lofty::probe::Probe;
use lofty::tag::{Accessor, ItemKey, Tag};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::config::MetadataConfig;
use crate::error::{Error, Result};
use crate::model::{FileKind, TrackMetadata};

/// Extensions treated as audio (lowercase).
const AUDIO_EXTENSIONS: &[&str] = &[
    "mp3", "flac", "ogg", "oga", "opus", "wav", "m4a", "aac", "aiff", "aif", "ape", "wv", "mpc",
    "spx",
];

/// Extensions treated as images (lowercase).
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp", "tif", "tiff"];

/// Bytes needed to recognise an image header.
const SNIFF_LEN: usize = 32;

/// Source of file classification and track tags.
///
/// Implementations must be cheap to share between threads; sibling
/// directories are scanned in parallel.
pub trait MetadataStore: Sync {
    /// Decide whether a file is audio, an image or something else.
    ///
    /// Must be idempotent: classifying the same path twice gives the same answer.
    fn classify(&self, path: &Path) -> FileKind;

    /// Read the tags of an audio file.
    fn read_track(&self, path: &Path) -> Result<TrackMetadata>;
}

/// [`MetadataStore`] backed by lofty.
#[derive(Debug, Clone, Default)]
pub struct TagStore {
    config: MetadataConfig,
}

impl TagStore {
    pub fn new(config: MetadataConfig) -> Self {
        Self { config }
    }
}

impl MetadataStore for TagStore {
    fn classify(&self, path: &Path) -> FileKind {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => kind_from_extension(ext),
            // No extension to go by; look at the content instead
            None => sniff_kind(path),
        }
    }

    fn read_track(&self, path: &Path) -> Result<TrackMetadata> {
        let tagged_file = Probe::open(path)
            .map_err(|e| Error::metadata(path, e))?
            .guess_file_type()
            .map_err(|e| Error::metadata(path, e))?
            .read()
            .map_err(|e| Error::metadata(path, e))?;

        let tag = tagged_file
            .primary_tag()
            .or_else(|| tagged_file.first_tag());

        let mut track = tag.map(track_from_tag).unwrap_or_default();

        if track.duration_secs == 0 && self.config.probe_duration {
            track.duration_secs = tagged_file.properties().duration().as_secs();
        }

        Ok(track)
    }
}

fn track_from_tag(tag: &Tag) -> TrackMetadata {
    let year = tag
        .get_string(&ItemKey::Year)
        .or_else(|| tag.get_string(&ItemKey::RecordingDate))
        .and_then(parse_year)
        .map(normalize_year)
        .unwrap_or(0);

    let duration_secs = tag
        .get_string(&ItemKey::Length)
        .and_then(parse_length)
        .unwrap_or(0);

    TrackMetadata {
        artist: tag.artist().map(|s| s.into_owned()).unwrap_or_default(),
        album: tag.album().map(|s| s.into_owned()).unwrap_or_default(),
        genre: tag.genre().map(|s| s.into_owned()).unwrap_or_default(),
        year,
        duration_secs,
    }
}

fn kind_from_extension(ext: &str) -> FileKind {
    let ext = ext.to_lowercase();
    if AUDIO_EXTENSIONS.contains(&ext.as_str()) {
        FileKind::Audio
    } else if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        FileKind::Image
    } else {
        FileKind::Other
    }
}

/// Type discovery for files without an extension.
fn sniff_kind(path: &Path) -> FileKind {
    let mut header = Vec::with_capacity(SNIFF_LEN);
    let read = File::open(path).and_then(|f| f.take(SNIFF_LEN as u64).read_to_end(&mut header));
    if let Err(e) = read {
        tracing::debug!(target: "metadata::classify", path = %path.display(), error = %e, "Cannot sniff file");
        return FileKind::Other;
    }

    if image::guess_format(&header).is_ok() {
        return FileKind::Image;
    }

    let audio = Probe::open(path)
        .ok()
        .and_then(|p| p.guess_file_type().ok())
        .is_some_and(|p| p.file_type().is_some());

    if audio { FileKind::Audio } else { FileKind::Other }
}

/// Extract the first run of up to four digits, e.g. "1999-05-01" -> 1999.
pub fn parse_year(text: &str) -> Option<u32> {
    let digits: String = text
        .trim_start_matches(|c: char| !c.is_ascii_digit())
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .take(4)
        .collect();
    digits.parse().ok()
}

/// Two-digit years belong to the 1900s.
pub fn normalize_year(year: u32) -> u32 {
    if (1..100).contains(&year) {
        year + 1900
    } else {
        year
    }
}

/// Parse a length tag: `M:SS` or a plain number of milliseconds.
pub fn parse_length(text: &str) -> Option<u64> {
    let text = text.trim();
    if let Some((minutes, seconds)) = text.split_once(':') {
        let minutes: u64 = minutes.trim().parse().ok()?;
        let seconds: u64 = seconds.trim().parse().ok()?;
        return minutes.checked_mul(60)?.checked_add(seconds);
    }
    text.parse::<u64>().ok().map(|ms| ms / 1000)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_classify_by_extension() {
        let store = TagStore::default();
        assert_eq!(store.classify(Path::new("a/01 - Song.mp3")), FileKind::Audio);
        assert_eq!(store.classify(Path::new("a/track.FLAC")), FileKind::Audio);
        assert_eq!(store.classify(Path::new("a/Cover.JPG")), FileKind::Image);
        assert_eq!(store.classify(Path::new("a/front.webp")), FileKind::Image);
        assert_eq!(store.classify(Path::new("a/notes.txt")), FileKind::Other);
    }

    #[test]
    fn test_classify_sniffs_png_without_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("folder");
        let mut png = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        png.extend_from_slice(&[0u8; 24]);
        std::fs::write(&path, &png).unwrap();

        let store = TagStore::default();
        assert_eq!(store.classify(&path), FileKind::Image);
        // Idempotent
        assert_eq!(store.classify(&path), FileKind::Image);
    }

    #[test]
    fn test_classify_unknown_content_is_other() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("README");
        std::fs::write(&path, b"just some words about the album").unwrap();

        assert_eq!(TagStore::default().classify(&path), FileKind::Other);
    }

    #[test]
    fn test_classify_missing_file_is_other() {
        let store = TagStore::default();
        assert_eq!(store.classify(Path::new("/nonexistent/blob")), FileKind::Other);
    }

    #[test]
    fn test_read_non_audio_file_returns_error() {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        writeln!(file, "This is just some text, not music.").expect("Failed to write");

        let result = TagStore::default().read_track(file.path());
        assert!(matches!(result, Err(Error::Metadata { .. })));
    }

    #[test]
    fn test_read_non_existent_file_returns_error() {
        let result = TagStore::default().read_track(Path::new("non_existent_file.mp3"));
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_year() {
        assert_eq!(parse_year("1999"), Some(1999));
        assert_eq!(parse_year("2003-11-04"), Some(2003));
        assert_eq!(parse_year("  (1971)"), Some(1971));
        assert_eq!(parse_year("68"), Some(68));
        assert_eq!(parse_year("unknown"), None);
        assert_eq!(parse_year(""), None);
    }

    #[test]
    fn test_normalize_two_digit_years() {
        assert_eq!(normalize_year(68), 1968);
        assert_eq!(normalize_year(1), 1901);
        assert_eq!(normalize_year(99), 1999);
        assert_eq!(normalize_year(0), 0);
        assert_eq!(normalize_year(2001), 2001);
    }

    #[test]
    fn test_parse_length() {
        assert_eq!(parse_length("5:23"), Some(323));
        assert_eq!(parse_length("12:00"), Some(720));
        assert_eq!(parse_length("245000"), Some(245));
        assert_eq!(parse_length("n/a"), None);
        assert_eq!(parse_length("5:xx"), None);
    }

    #[test]
    fn test_parse_length_rejects_overflowing_minutes() {
        assert_eq!(parse_length("307445734561825861:00"), None);
        assert_eq!(parse_length("307445734561825860:18446744073709551615"), None);
        assert_eq!(parse_length("18446744073709551615"), Some(u64::MAX / 1000));
    }
}
