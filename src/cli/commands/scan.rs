//! Album detection command.

use anyhow::Context;
use std::path::PathBuf;

use crate::config::Config;
use crate::library::{self, AcceptAll, Confirm, DeclineAll, ScanEvent, ScanReport};
use crate::metadata::TagStore;
use crate::model::AlbumRecord;
use crate::writer::{AlbumWriter, SidecarWriter};

/// Scan directories for albums and write their attributes
pub fn cmd_scan(
    dirs: &[PathBuf],
    config: &Config,
    yes: bool,
    dry_run: bool,
    json: bool,
) -> anyhow::Result<()> {
    let store = TagStore::new(config.metadata.clone());
    let sidecar = SidecarWriter::new(config.writer.clone());
    let writer: Option<&dyn AlbumWriter> = if dry_run { None } else { Some(&sidecar) };
    let confirm: &dyn Confirm = if yes { &AcceptAll } else { &DeclineAll };

    let report = library::scan_roots(dirs, &store, &config.policy, writer, confirm);

    if json {
        let out = serde_json::to_string_pretty(&report).context("Failed to encode report")?;
        println!("{}", out);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &ScanReport) {
    for event in &report.events {
        match event {
            ScanEvent::Written { path, record, .. } => {
                println!("{:?}: {}", path, describe(record));
            }
            ScanEvent::DryRun { path, record, .. } => {
                println!("{:?}: {} (dry run)", path, describe(record));
            }
            ScanEvent::NotAnAlbum { path, rejection } => {
                println!("{:?} is not an album - {}", path, rejection);
            }
            ScanEvent::WriteFailed { path, error, .. } => {
                eprintln!("Error writing {:?}: {}", path, error);
            }
            ScanEvent::Missing { path } => {
                eprintln!("Could not find {:?}", path);
            }
        }
    }

    println!(
        "\nScan complete. {} directories, {} albums, {} written, {} failed.",
        report.events.len() - report.missing(),
        report.albums(),
        report.written(),
        report.failed()
    );
}

fn describe(record: &AlbumRecord) -> String {
    format!(
        "Artist = {:?}, Album = {:?}, genre = {}, length = {}, year = {}, tracks = {}",
        record.artist,
        record.title,
        record.genre,
        record.length_string(),
        record.year_string().unwrap_or_else(|| "unknown".to_string()),
        record.track_count
    )
}
