//! Core data models for album detection.
//!
//! Defines the per-file [`TrackMetadata`], the folded [`AlbumRecord`] and
//! the [`AlbumDecision`] emitted once per visited directory.

use bitflags::bitflags;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Genre forced onto an album as soon as one track carries it.
pub const SOUNDTRACK_GENRE: &str = "Soundtrack";

/// Genre used when tracks disagree and none is a soundtrack.
pub const MIXED_GENRE: &str = "Misc";

/// Artist used for albums whose tracks name different artists.
pub const VARIOUS_ARTISTS: &str = "Various";

/// Classification of a directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Audio,
    Image,
    Other,
}

/// Tags of a single audio file. Unknown values are empty or zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackMetadata {
    pub artist: String,
    pub album: String,
    pub genre: String,
    /// Release year, 0 if unknown
    pub year: u32,
    /// Playing time in seconds, 0 if unknown
    pub duration_secs: u64,
}

bitflags! {
    /// Disagreements observed between the tracks of one directory.
    ///
    /// Flags are only ever added while a directory is folded.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ConflictFlags: u8 {
        /// At least one track names another artist than the first one
        const DIFFERENT_ARTISTS = 1 << 0;
        /// Same artist, but at least one track names another album
        const DIFFERENT_ALBUMS = 1 << 1;
    }
}

impl ConflictFlags {
    /// Which attributes differ, for user-facing messages.
    pub fn describe(&self) -> &'static str {
        let artists = self.contains(Self::DIFFERENT_ARTISTS);
        let albums = self.contains(Self::DIFFERENT_ALBUMS);
        match (artists, albums) {
            (true, true) => "artist and album",
            (true, false) => "artist",
            (false, true) => "album",
            (false, false) => "no",
        }
    }
}

/// Album-level metadata folded from all tracks of a directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AlbumRecord {
    pub artist: String,
    pub title: String,
    pub genre: String,
    pub total_duration_secs: u64,
    /// Earliest known year, 0 if no track has one
    pub min_year: u32,
    /// Latest known year, 0 if no track has one
    pub max_year: u32,
    pub track_count: usize,
}

impl AlbumRecord {
    /// Total length as `MM:SS`; minutes are not wrapped into hours.
    pub fn length_string(&self) -> String {
        format_length(self.total_duration_secs)
    }

    /// Year or year range, `None` unless both bounds are known.
    pub fn year_string(&self) -> Option<String> {
        if self.min_year == 0 || self.max_year == 0 {
            return None;
        }
        if self.min_year == self.max_year {
            Some(format!("{:4}", self.min_year))
        } else {
            Some(format!("{:4}-{:4}", self.min_year, self.max_year))
        }
    }
}

/// Format seconds as `MM:SS`.
pub fn format_length(total_secs: u64) -> String {
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

/// Why a directory was not accepted as an album.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Rejection {
    /// Fewer audio files than the album minimum (possibly none)
    TooFewTracks { found: usize, required: usize },
    /// A sub-directory is an album on its own
    ContainsSubAlbum { sub_album: PathBuf },
    /// The directory could not be listed
    Unreadable { message: String },
    /// Conflicting tags and the caller declined to accept them
    Declined,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::TooFewTracks { found: 0, .. } => write!(f, "no audio files"),
            Rejection::TooFewTracks { found, required } => {
                write!(f, "only {} audio file(s), at least {} needed", found, required)
            }
            Rejection::ContainsSubAlbum { sub_album } => {
                write!(f, "contains album {}", sub_album.display())
            }
            Rejection::Unreadable { message } => write!(f, "unreadable: {}", message),
            Rejection::Declined => write!(f, "conflicting tags were not confirmed"),
        }
    }
}

/// An album whose tracks disagree and which waits for a caller decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingAlbum {
    pub record: AlbumRecord,
    #[serde(serialize_with = "serialize_conflicts")]
    pub conflicts: ConflictFlags,
    /// Cover that acceptance would use
    pub cover: Option<PathBuf>,
}

impl PendingAlbum {
    /// Human-readable description of the disagreement.
    pub fn reason(&self) -> String {
        format!(
            "The {} attributes differ from file to file",
            self.conflicts.describe()
        )
    }

    /// Accept the album despite the conflicts.
    pub fn confirm(self) -> AlbumDecision {
        AlbumDecision::Accepted {
            record: resolve_conflicts(self.record, self.conflicts),
            cover: self.cover,
        }
    }

    /// Reject the album; nothing will be written for it.
    pub fn decline(self) -> AlbumDecision {
        AlbumDecision::NotAnAlbum(Rejection::Declined)
    }
}

/// Apply the conflict resolution shared by policy and confirmation paths:
/// differing artists collapse into [`VARIOUS_ARTISTS`], differing titles
/// keep the first title seen.
pub fn resolve_conflicts(mut record: AlbumRecord, conflicts: ConflictFlags) -> AlbumRecord {
    if conflicts.contains(ConflictFlags::DIFFERENT_ARTISTS) {
        record.artist = VARIOUS_ARTISTS.to_string();
    }
    record
}

fn serialize_conflicts<S: serde::Serializer>(
    flags: &ConflictFlags,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(flags.describe())
}

/// Outcome for one visited directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum AlbumDecision {
    NotAnAlbum(Rejection),
    Accepted {
        record: AlbumRecord,
        cover: Option<PathBuf>,
    },
    NeedsConfirmation(PendingAlbum),
}

impl AlbumDecision {
    pub fn is_accepted(&self) -> bool {
        matches!(self, AlbumDecision::Accepted { .. })
    }

    /// The record, if this decision carries one.
    pub fn record(&self) -> Option<&AlbumRecord> {
        match self {
            AlbumDecision::Accepted { record, .. } => Some(record),
            AlbumDecision::NeedsConfirmation(pending) => Some(&pending.record),
            AlbumDecision::NotAnAlbum(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> AlbumRecord {
        AlbumRecord {
            artist: "Miles Davis".to_string(),
            title: "Kind of Blue".to_string(),
            genre: "Jazz".to_string(),
            total_duration_secs: 2759,
            min_year: 1959,
            max_year: 1959,
            track_count: 5,
        }
    }

    #[test]
    fn test_length_string() {
        assert_eq!(record().length_string(), "45:59");
        assert_eq!(format_length(0), "00:00");
        // Minutes are never wrapped into hours
        assert_eq!(format_length(3 * 3600 + 5), "180:05");
    }

    #[test]
    fn test_year_string_single_and_range() {
        let mut rec = record();
        assert_eq!(rec.year_string().as_deref(), Some("1959"));

        rec.max_year = 1961;
        assert_eq!(rec.year_string().as_deref(), Some("1959-1961"));

        rec.min_year = 0;
        assert_eq!(rec.year_string(), None);
    }

    #[test]
    fn test_conflict_descriptions() {
        assert_eq!(ConflictFlags::DIFFERENT_ARTISTS.describe(), "artist");
        assert_eq!(ConflictFlags::DIFFERENT_ALBUMS.describe(), "album");
        assert_eq!(ConflictFlags::all().describe(), "artist and album");
    }

    #[test]
    fn test_confirm_applies_various_only_for_artists() {
        let pending = PendingAlbum {
            record: record(),
            conflicts: ConflictFlags::DIFFERENT_ALBUMS,
            cover: None,
        };
        let AlbumDecision::Accepted { record: rec, .. } = pending.confirm() else {
            panic!("confirm must accept");
        };
        assert_eq!(rec.artist, "Miles Davis");

        let pending = PendingAlbum {
            record: record(),
            conflicts: ConflictFlags::DIFFERENT_ARTISTS,
            cover: Some(PathBuf::from("cover.jpg")),
        };
        assert!(pending.reason().contains("artist"));
        let AlbumDecision::Accepted { record: rec, cover } = pending.confirm() else {
            panic!("confirm must accept");
        };
        assert_eq!(rec.artist, VARIOUS_ARTISTS);
        assert_eq!(cover, Some(PathBuf::from("cover.jpg")));
    }

    #[test]
    fn test_decline_rejects() {
        let pending = PendingAlbum {
            record: record(),
            conflicts: ConflictFlags::DIFFERENT_ARTISTS,
            cover: None,
        };
        assert_eq!(
            pending.decline(),
            AlbumDecision::NotAnAlbum(Rejection::Declined)
        );
    }

    #[test]
    fn test_decision_serializes_with_tag() {
        let decision = AlbumDecision::NotAnAlbum(Rejection::TooFewTracks {
            found: 2,
            required: 3,
        });
        let json = serde_json::to_string(&decision).unwrap();
        assert!(json.contains("\"decision\":\"not_an_album\""));
        assert!(json.contains("\"reason\":\"too_few_tracks\""));
    }
}
