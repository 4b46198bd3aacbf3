//! Local source directory scan.
//!
//! Only regular files directly inside the source directory are considered;
//! subdirectories are not descended into. A file is an image when its
//! extension is on the allow-list, compared case-insensitively.

use crate::utils::errors::{ClientError, Result};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Extensions accepted for upload, lowercase without the dot.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg"];

/// A candidate image found in the source directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalImage {
    /// Bare file name, the identity used against the device gallery
    pub filename: String,

    pub size_bytes: u64,

    /// Full path used to read the file for upload
    pub path: PathBuf,
}

/// Check that `source` exists and is a directory.
pub fn validate_source(source: &Path) -> Result<()> {
    if !source.exists() {
        return Err(ClientError::SourceMissing(source.to_path_buf()));
    }
    if !source.is_dir() {
        return Err(ClientError::SourceNotDirectory(source.to_path_buf()));
    }
    Ok(())
}

pub fn is_image_name(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.iter().any(|allowed| ext.eq_ignore_ascii_case(allowed)))
}

fn as_local_image(entry: &DirEntry) -> std::io::Result<Option<LocalImage>> {
    if !entry.file_type().is_file() {
        return Ok(None);
    }
    let Some(filename) = entry.file_name().to_str() else {
        return Ok(None);
    };
    if !is_image_name(filename) {
        return Ok(None);
    }
    let metadata = entry.metadata().map_err(std::io::Error::from)?;
    Ok(Some(LocalImage {
        filename: filename.to_string(),
        size_bytes: metadata.len(),
        path: entry.path().to_path_buf(),
    }))
}

/// List the images directly inside `source`, sorted by file name.
pub fn scan_images(source: &Path) -> Result<Vec<LocalImage>> {
    validate_source(source)?;

    let mut images = Vec::new();
    for entry in WalkDir::new(source).min_depth(1).max_depth(1) {
        let entry = entry.map_err(std::io::Error::from)?;
        if let Some(image) = as_local_image(&entry)? {
            images.push(image);
        }
    }

    images.sort_by(|a, b| a.filename.cmp(&b.filename));
    Ok(images)
}

/// Total size of the given images in bytes.
pub fn total_size(images: &[LocalImage]) -> u64 {
    images.iter().map(|image| image.size_bytes).sum()
}
