//! Cover image selection.
//!
//! Among the images found in an album directory, the cover is the one whose
//! path scores highest against a keyword table (see [`score()`]). The
//! selection is strict: when two or more images share the top score no
//! cover is chosen at all.
//!
//! # Example
//!
//! ```ignore
//! let images = vec![PathBuf::from("Album/cover.jpg"), PathBuf::from("Album/back.jpg")];
//! assert_eq!(select_cover(&images)?, Some(PathBuf::from("Album/cover.jpg")));
//! ```

mod score;
mod select;

pub use score::score;
pub use select::{collect_images, score_all, select_cover};

/// Two or more images share the best score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{tied} images share the best cover score {score}")]
pub struct AmbiguousCover {
    /// Number of images at the top score
    pub tied: usize,
    /// The shared score
    pub score: i32,
}
