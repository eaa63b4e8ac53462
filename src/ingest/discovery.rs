use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::mime_for_name;

/// Expand command-line paths into image files.
///
/// Files are taken as given (the drop zone decides later); directories are
/// walked for names with a known image extension.
pub fn discover_images(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut images = Vec::new();

    for path in paths {
        if path.is_dir() {
            images.extend(images_in_dir(path));
        } else {
            images.push(path.clone());
        }
    }

    images
}

fn images_in_dir(directory: &Path) -> Vec<PathBuf> {
    let mut images: Vec<PathBuf> = WalkDir::new(directory)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|entry| entry.path().is_file())
        .filter(|entry| mime_for_name(&entry.file_name().to_string_lossy()).is_some())
        .map(|entry| entry.path().to_path_buf())
        .collect();

    // Sort by path for consistent ordering
    images.sort();
    images
}
