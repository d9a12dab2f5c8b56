//! File discovery for scan roots.
//!
//! Scan inputs may be individual files or directories; directories are
//! walked recursively with entries sorted by name so that repeated scans of
//! the same tree visit files in the same order.

use rayon::prelude::*;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// File extensions treated as images
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "bmp", "tif", "tiff", "webp", "gif", "ico",
];

/// Returns true if the path carries an image extension
pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Collect image files from a mixed list of files and directories.
///
/// Input order is preserved across roots; within a directory, entries are
/// visited in name order. A root that does not exist fails the whole call.
pub fn collect_image_files(roots: &[PathBuf], max_depth: Option<usize>) -> Result<Vec<PathBuf>> {
    let per_root: Vec<Result<Vec<PathBuf>>> = roots
        .par_iter()
        .map(|root| collect_from_root(root, max_depth))
        .collect();

    let mut files = Vec::new();
    for result in per_root {
        files.extend(result?);
    }
    Ok(files)
}

fn collect_from_root(root: &Path, max_depth: Option<usize>) -> Result<Vec<PathBuf>> {
    if !root.exists() {
        return Err(Error::FileNotFound(root.to_path_buf()));
    }

    if root.is_file() {
        return Ok(if is_image_path(root) {
            vec![root.to_path_buf()]
        } else {
            Vec::new()
        });
    }

    let walker = WalkDir::new(root)
        .max_depth(max_depth.unwrap_or(usize::MAX))
        .sort_by_file_name();

    let mut files = Vec::new();
    for entry in walker
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        if is_image_path(entry.path()) {
            files.push(entry.path().to_path_buf());
        }
    }
    Ok(files)
}

// -- Tests --

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn test_is_image_path() {
        assert!(is_image_path(Path::new("test.jpg")));
        assert!(is_image_path(Path::new("test.JPEG")));
        assert!(is_image_path(Path::new("test.png")));
        assert!(is_image_path(Path::new("test.webp")));
        assert!(!is_image_path(Path::new("test.txt")));
        assert!(!is_image_path(Path::new("test")));
    }

    #[test]
    fn collects_recursively_and_filters_non_images() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();

        touch(&dir.path().join("a.jpg"));
        touch(&dir.path().join("b.png"));
        touch(&dir.path().join("notes.txt"));
        touch(&sub.join("c.gif"));

        let files = collect_image_files(&[dir.path().to_path_buf()], None).unwrap();
        assert_eq!(files.len(), 3);
        assert!(!files.iter().any(|p| p.ends_with("notes.txt")));
    }

    #[test]
    fn honours_max_depth() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();

        touch(&dir.path().join("a.jpg"));
        touch(&sub.join("b.jpg"));

        let files = collect_image_files(&[dir.path().to_path_buf()], Some(1)).unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn accepts_single_files_as_roots() {
        let dir = tempfile::tempdir().unwrap();
        let photo = dir.path().join("one.jpg");
        touch(&photo);

        let files = collect_image_files(&[photo.clone()], None).unwrap();
        assert_eq!(files, vec![photo]);
    }

    #[test]
    fn discovery_order_is_stable() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["zeta.jpg", "alpha.jpg", "mid.jpg"] {
            touch(&dir.path().join(name));
        }

        let first = collect_image_files(&[dir.path().to_path_buf()], None).unwrap();
        let second = collect_image_files(&[dir.path().to_path_buf()], None).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn missing_root_is_an_error() {
        let result = collect_image_files(&[PathBuf::from("/path/that/does/not/exist")], None);
        assert!(matches!(result, Err(Error::FileNotFound(_))));
    }
}
