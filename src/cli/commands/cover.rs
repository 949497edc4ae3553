//! Cover candidate inspection.

use std::path::Path;

use crate::cover::{collect_images, score_all, select_cover};
use crate::metadata::TagStore;

/// List every image below a directory with its score, then the chosen cover
pub fn cmd_cover(dir: &Path) -> anyhow::Result<()> {
    anyhow::ensure!(dir.is_dir(), "{:?} is not a directory", dir);

    let images = collect_images(dir, &TagStore::default());
    for (path, score) in score_all(&images) {
        println!("{:>4}  {}", score, path.display());
    }

    match select_cover(&images) {
        Ok(Some(cover)) => println!("\nCover: {}", cover.display()),
        Ok(None) => println!("No images found in {:?}", dir),
        Err(e) => println!("\nNo cover chosen: {}", e),
    }
    Ok(())
}
