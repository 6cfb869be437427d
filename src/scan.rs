//! Source scanning
//!
//! Each source is read non-recursively (nested directories are sources of
//! their own). Files are ordered by modification time within their source,
//! and the sources are concatenated in resolved order.

use crate::config::{Config, MediaKind, lowercase_extension};
use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, trace};

/// A file found directly inside a source directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileItem {
    pub path: PathBuf,
    pub modified: SystemTime,
    /// Lowercase extension without the dot, empty if none
    pub extension: String,
}

impl FileItem {
    pub fn kind(&self, config: &Config) -> MediaKind {
        config.media_kind(&self.extension)
    }
}

/// Number of recognized images and videos across all sources
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MediaCounts {
    pub images: usize,
    pub videos: usize,
}

impl MediaCounts {
    pub fn is_empty(&self) -> bool {
        self.images == 0 && self.videos == 0
    }
}

/// List the files directly inside `source`, oldest first
///
/// Ties on modification time are broken by path so runs are repeatable.
pub fn gather_source(source: &Path) -> Result<Vec<FileItem>> {
    let read_dir_error = |e: std::io::Error| Error::ReadDir {
        path: source.to_path_buf(),
        source: e,
    };

    let mut items = Vec::new();
    for entry in fs::read_dir(source).map_err(read_dir_error)? {
        let path = entry.map_err(read_dir_error)?.path();

        // Follows symlinks, so a link to a directory is skipped here
        let metadata = fs::metadata(&path).map_err(|e| Error::Metadata {
            path: path.clone(),
            source: e,
        })?;
        if metadata.is_dir() {
            continue;
        }

        let modified = metadata.modified().map_err(|e| Error::Metadata {
            path: path.clone(),
            source: e,
        })?;

        trace!(?path, "Gathered file");
        items.push(FileItem {
            extension: lowercase_extension(&path),
            path,
            modified,
        });
    }

    items.sort_by(|a, b| a.modified.cmp(&b.modified).then_with(|| a.path.cmp(&b.path)));
    Ok(items)
}

/// Gather every source in order into one list
pub fn gather_items(sources: &[PathBuf]) -> Result<Vec<FileItem>> {
    let mut items = Vec::new();
    for source in sources {
        let source_items = gather_source(source)?;
        debug!(?source, count = source_items.len(), "Gathered source");
        items.extend(source_items);
    }
    Ok(items)
}

/// Count recognized images and videos in a gathered list
pub fn count_media(items: &[FileItem], config: &Config) -> MediaCounts {
    items.iter().fold(MediaCounts::default(), |mut counts, item| {
        match item.kind(config) {
            MediaKind::Image => counts.images += 1,
            MediaKind::Video => counts.videos += 1,
            MediaKind::Unknown => {}
        }
        counts
    })
}
