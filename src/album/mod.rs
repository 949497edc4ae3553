//! Album detection for directory trees.
//!
//! [`AlbumAggregator`] visits a directory, folds the tags of its audio files
//! into one [`AlbumRecord`] and decides whether the directory is an album.
//! Sub-directories are visited first (post-order) and in parallel; every
//! call frame owns its own record, so siblings never share state.
//!
//! The decision rules:
//! - fewer than `min_tracks_for_album` readable audio files: not an album
//! - tracks disagree on artist or title: needs confirmation, unless the
//!   policy allows it or the album is a soundtrack
//! - without recursive mode, a directory holding an album is not one itself

use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::PolicyConfig;
use crate::cover::select_cover;
use crate::metadata::MetadataStore;
use crate::model::{
    AlbumDecision, AlbumRecord, ConflictFlags, FileKind, MIXED_GENRE, PendingAlbum, Rejection,
    SOUNDTRACK_GENRE, TrackMetadata, resolve_conflicts,
};

/// Result of visiting one directory.
#[derive(Debug, Clone)]
pub struct DirectoryScan {
    pub path: PathBuf,
    pub decision: AlbumDecision,
    /// Sub-directories reported on their own (recursive mode only)
    pub children: Vec<DirectoryScan>,
    /// Images of this subtree; handed to the parent when this is no album
    images: Vec<PathBuf>,
}

impl DirectoryScan {
    fn rejected(path: &Path, rejection: Rejection) -> Self {
        Self {
            path: path.to_path_buf(),
            decision: AlbumDecision::NotAnAlbum(rejection),
            children: Vec::new(),
            images: Vec::new(),
        }
    }

    /// Whether this directory is an album or has one somewhere below it.
    fn holds_album(&self) -> bool {
        matches!(
            self.decision,
            AlbumDecision::Accepted { .. }
                | AlbumDecision::NotAnAlbum(Rejection::ContainsSubAlbum { .. })
        )
    }

    /// The album that makes this directory [`holds_album`](Self::holds_album).
    fn album_path(&self) -> PathBuf {
        match &self.decision {
            AlbumDecision::NotAnAlbum(Rejection::ContainsSubAlbum { sub_album }) => {
                sub_album.clone()
            }
            _ => self.path.clone(),
        }
    }

    /// All reported decisions, sub-directories before their parent.
    pub fn into_decisions(self) -> Vec<(PathBuf, AlbumDecision)> {
        let mut out = Vec::new();
        self.collect_decisions(&mut out);
        out
    }

    fn collect_decisions(self, out: &mut Vec<(PathBuf, AlbumDecision)>) {
        for child in self.children {
            child.collect_decisions(out);
        }
        out.push((self.path, self.decision));
    }
}

/// Running album record of one directory.
#[derive(Debug, Default)]
struct AlbumFold {
    record: AlbumRecord,
    conflicts: ConflictFlags,
}

impl AlbumFold {
    fn add(&mut self, track: TrackMetadata) {
        let record = &mut self.record;

        if record.track_count == 0 {
            record.artist = track.artist;
            record.title = track.album;
            record.genre = track.genre.clone();
            record.min_year = track.year;
            record.max_year = track.year;
        } else if record.artist != track.artist {
            self.conflicts |= ConflictFlags::DIFFERENT_ARTISTS;
        } else if record.title != track.album {
            self.conflicts |= ConflictFlags::DIFFERENT_ALBUMS;
        }

        // Once a soundtrack, always a soundtrack
        if track.genre.eq_ignore_ascii_case(SOUNDTRACK_GENRE) {
            record.genre = SOUNDTRACK_GENRE.to_string();
        } else if record.genre != SOUNDTRACK_GENRE && record.genre != track.genre {
            record.genre = MIXED_GENRE.to_string();
        }

        if track.duration_secs > 0 {
            record.total_duration_secs =
                record.total_duration_secs.saturating_add(track.duration_secs);
        }

        // Both bounds are checked on every year; a zero bound means none seen yet
        if track.year != 0 {
            record.max_year = record.max_year.max(track.year);
            record.min_year = if record.min_year == 0 {
                track.year
            } else {
                record.min_year.min(track.year)
            };
        }

        record.track_count += 1;
    }
}

/// Decides album-ness of directory trees.
pub struct AlbumAggregator<'a, S: MetadataStore> {
    store: &'a S,
    policy: &'a PolicyConfig,
}

impl<'a, S: MetadataStore> AlbumAggregator<'a, S> {
    pub fn new(store: &'a S, policy: &'a PolicyConfig) -> Self {
        Self { store, policy }
    }

    /// Visit `dir` and, depending on policy, its sub-directories.
    pub fn aggregate(&self, dir: &Path) -> DirectoryScan {
        let (subdirs, files) = match list_children(dir) {
            Ok(children) => children,
            Err(e) => {
                warn!(target: "album::aggregate", path = %dir.display(), error = %e, "Cannot list directory");
                return DirectoryScan::rejected(
                    dir,
                    Rejection::Unreadable {
                        message: e.to_string(),
                    },
                );
            }
        };

        // Every child is finished before this directory decides
        let sub_scans: Vec<DirectoryScan> =
            subdirs.par_iter().map(|sub| self.aggregate(sub)).collect();

        if !self.policy.recursive_sub_albums
            && let Some(sub) = sub_scans.iter().find(|s| s.holds_album())
        {
            let sub_album = sub.album_path();
            info!(target: "album::aggregate", path = %dir.display(), sub_album = %sub_album.display(), "Contains an album, skipping");
            return DirectoryScan::rejected(dir, Rejection::ContainsSubAlbum { sub_album });
        }

        let mut fold = AlbumFold::default();
        let mut images = Vec::new();

        for file in &files {
            match self.store.classify(file) {
                FileKind::Audio => match self.store.read_track(file) {
                    Ok(track) => fold.add(track),
                    Err(e) => {
                        warn!(target: "album::aggregate", path = %file.display(), error = %e, "Skipping unreadable audio file");
                    }
                },
                FileKind::Image if self.policy.select_cover => images.push(file.clone()),
                kind => {
                    debug!(target: "album::aggregate", path = %file.display(), ?kind, "Ignoring file");
                }
            }
        }

        let mut children = Vec::new();
        for sub in sub_scans {
            if matches!(sub.decision, AlbumDecision::NotAnAlbum(_)) {
                images.extend_from_slice(&sub.images);
            }
            if self.policy.recursive_sub_albums {
                children.push(sub);
            }
        }

        let decision = self.decide(dir, fold, &images);
        let images = if decision.record().is_some() {
            Vec::new()
        } else {
            images
        };

        DirectoryScan {
            path: dir.to_path_buf(),
            decision,
            children,
            images,
        }
    }

    fn decide(&self, dir: &Path, fold: AlbumFold, images: &[PathBuf]) -> AlbumDecision {
        let AlbumFold { record, conflicts } = fold;
        let required = self.policy.min_tracks_for_album;

        if record.track_count < required {
            debug!(target: "album::aggregate", path = %dir.display(), tracks = record.track_count, "Too few tracks for an album");
            return AlbumDecision::NotAnAlbum(Rejection::TooFewTracks {
                found: record.track_count,
                required,
            });
        }

        let cover = if self.policy.select_cover {
            match select_cover(images) {
                Ok(cover) => cover,
                Err(e) => {
                    warn!(target: "album::cover", path = %dir.display(), error = %e, "No cover chosen");
                    None
                }
            }
        } else {
            None
        };

        if conflicts.is_empty() {
            info!(target: "album::aggregate", path = %dir.display(), artist = %record.artist, title = %record.title, tracks = record.track_count, "Album detected");
            return AlbumDecision::Accepted { record, cover };
        }

        if self.policy.allow_different_artists || record.genre == SOUNDTRACK_GENRE {
            info!(target: "album::aggregate", path = %dir.display(), conflicts = conflicts.describe(), "Album with mixed tags accepted");
            return AlbumDecision::Accepted {
                record: resolve_conflicts(record, conflicts),
                cover,
            };
        }

        info!(target: "album::aggregate", path = %dir.display(), conflicts = conflicts.describe(), "Album needs confirmation");
        AlbumDecision::NeedsConfirmation(PendingAlbum {
            record,
            conflicts,
            cover,
        })
    }
}

/// Direct sub-directories and files of `dir`, each sorted by name.
///
/// Entries that cannot be inspected are skipped.
fn list_children(dir: &Path) -> std::io::Result<(Vec<PathBuf>, Vec<PathBuf>)> {
    let mut subdirs = Vec::new();
    let mut files = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(target: "album::aggregate", path = %dir.display(), error = %e, "Skipping unreadable entry");
                continue;
            }
        };
        match entry.file_type() {
            Ok(ft) if ft.is_dir() => subdirs.push(entry.path()),
            Ok(_) => files.push(entry.path()),
            Err(e) => {
                warn!(target: "album::aggregate", path = %entry.path().display(), error = %e, "Skipping entry of unknown type");
            }
        }
    }

    subdirs.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok((subdirs, files))
}
