//! Scanning directory trees into album attributes.
//!
//! [`scan_roots`] runs the [`AlbumAggregator`] over each root, settles the
//! albums that need confirmation through a [`Confirm`] strategy and hands
//! accepted albums to an [`AlbumWriter`]. Every visited directory produces
//! one [`ScanEvent`]; a failure in one directory never stops the others.

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::album::AlbumAggregator;
use crate::config::PolicyConfig;
use crate::metadata::MetadataStore;
use crate::model::{AlbumDecision, AlbumRecord, PendingAlbum, Rejection};
use crate::writer::AlbumWriter;

/// Settles albums whose tracks disagree on artist or title.
pub trait Confirm: Sync {
    fn confirm(&self, dir: &Path, pending: &PendingAlbum) -> bool;
}

/// Never accepts conflicting albums.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclineAll;

impl Confirm for DeclineAll {
    fn confirm(&self, dir: &Path, pending: &PendingAlbum) -> bool {
        info!(target: "library::scan", path = %dir.display(), reason = %pending.reason(), "Declining album");
        false
    }
}

/// Accepts every conflicting album.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl Confirm for AcceptAll {
    fn confirm(&self, _dir: &Path, _pending: &PendingAlbum) -> bool {
        true
    }
}

/// What happened to one directory.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ScanEvent {
    /// Album attributes were written
    Written {
        path: PathBuf,
        record: AlbumRecord,
        cover: Option<PathBuf>,
    },
    /// Album found, nothing written
    DryRun {
        path: PathBuf,
        record: AlbumRecord,
        cover: Option<PathBuf>,
    },
    NotAnAlbum {
        path: PathBuf,
        #[serde(flatten)]
        rejection: Rejection,
    },
    WriteFailed {
        path: PathBuf,
        record: AlbumRecord,
        error: String,
    },
    /// A root that does not exist
    Missing { path: PathBuf },
}

impl ScanEvent {
    pub fn path(&self) -> &Path {
        match self {
            ScanEvent::Written { path, .. }
            | ScanEvent::DryRun { path, .. }
            | ScanEvent::NotAnAlbum { path, .. }
            | ScanEvent::WriteFailed { path, .. }
            | ScanEvent::Missing { path } => path,
        }
    }

    /// The detected album, whether or not it was written.
    pub fn record(&self) -> Option<&AlbumRecord> {
        match self {
            ScanEvent::Written { record, .. }
            | ScanEvent::DryRun { record, .. }
            | ScanEvent::WriteFailed { record, .. } => Some(record),
            ScanEvent::NotAnAlbum { .. } | ScanEvent::Missing { .. } => None,
        }
    }
}

/// All events of one scan, sub-directories before their parents.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanReport {
    pub events: Vec<ScanEvent>,
}

impl ScanReport {
    /// Number of directories detected as albums
    pub fn albums(&self) -> usize {
        self.events.iter().filter(|e| e.record().is_some()).count()
    }

    pub fn written(&self) -> usize {
        self.count(|e| matches!(e, ScanEvent::Written { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|e| matches!(e, ScanEvent::WriteFailed { .. }))
    }

    pub fn missing(&self) -> usize {
        self.count(|e| matches!(e, ScanEvent::Missing { .. }))
    }

    fn count(&self, pred: impl Fn(&ScanEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

/// Scan every root. With no `writer` the scan is a dry run.
pub fn scan_roots<S: MetadataStore>(
    roots: &[PathBuf],
    store: &S,
    policy: &PolicyConfig,
    writer: Option<&dyn AlbumWriter>,
    confirm: &dyn Confirm,
) -> ScanReport {
    let aggregator = AlbumAggregator::new(store, policy);
    let mut report = ScanReport::default();

    for root in roots {
        if !root.exists() {
            warn!(target: "library::scan", path = %root.display(), "Could not find directory");
            report.events.push(ScanEvent::Missing { path: root.clone() });
            continue;
        }

        info!(target: "library::scan", path = %root.display(), "Scanning");
        let scan = aggregator.aggregate(root);
        for (path, decision) in scan.into_decisions() {
            let event = settle(path, decision, writer, confirm);
            report.events.push(event);
        }
    }

    info!(
        target: "library::scan",
        albums = report.albums(),
        written = report.written(),
        failed = report.failed(),
        "Scan complete"
    );
    report
}

fn settle(
    path: PathBuf,
    decision: AlbumDecision,
    writer: Option<&dyn AlbumWriter>,
    confirm: &dyn Confirm,
) -> ScanEvent {
    match decision {
        AlbumDecision::NotAnAlbum(rejection) => ScanEvent::NotAnAlbum { path, rejection },
        AlbumDecision::Accepted { record, cover } => match writer {
            None => ScanEvent::DryRun {
                path,
                record,
                cover,
            },
            Some(writer) => match writer.write(&path, &record, cover.as_deref()) {
                Ok(()) => ScanEvent::Written {
                    path,
                    record,
                    cover,
                },
                Err(e) => {
                    warn!(target: "library::scan", path = %path.display(), error = %e, "Failed to write album attributes");
                    ScanEvent::WriteFailed {
                        path,
                        record,
                        error: e.to_string(),
                    }
                }
            },
        },
        AlbumDecision::NeedsConfirmation(pending) => {
            let settled = if confirm.confirm(&path, &pending) {
                pending.confirm()
            } else {
                pending.decline()
            };
            settle(path, settled, writer, confirm)
        }
    }
}
