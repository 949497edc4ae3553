//! Choosing one cover among the images of an album.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::AmbiguousCover;
use super::score::score;
use crate::metadata::MetadataStore;
use crate::model::FileKind;

/// Pick the cover among `images`.
///
/// - no images: no cover
/// - one image: that image, whatever its name
/// - otherwise the single best scored image; a tie at the top is
///   [`AmbiguousCover`] and the caller must not guess
pub fn select_cover(images: &[PathBuf]) -> Result<Option<PathBuf>, AmbiguousCover> {
    match images {
        [] => Ok(None),
        [only] => Ok(Some(only.clone())),
        _ => {
            let scored = score_all(images);
            let best_score = scored
                .iter()
                .map(|(_, s)| *s)
                .max()
                .unwrap_or_default();
            let mut best = scored.into_iter().filter(|(_, s)| *s == best_score);

            match (best.next(), best.next()) {
                (Some((path, _)), None) => Ok(Some(path.clone())),
                (Some(_), Some(_)) => Err(AmbiguousCover {
                    tied: 2 + best.count(),
                    score: best_score,
                }),
                (None, _) => Ok(None),
            }
        }
    }
}

/// Score every candidate by its full path.
pub fn score_all(images: &[PathBuf]) -> Vec<(&PathBuf, i32)> {
    images
        .iter()
        .map(|path| (path, score(&path.to_string_lossy())))
        .collect()
}

/// Every image below `dir`, in file name order.
pub fn collect_images(dir: &Path, store: &dyn MetadataStore) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(target: "cover::collect", error = %e, "Skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| store.classify(entry.path()) == FileKind::Image)
        .map(|entry| entry.into_path())
        .collect()
}
