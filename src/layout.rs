//! Album folder layout and generated file names

use crate::error::{Error, Result};
use crate::resolve::Arguments;
use crate::scan::MediaCounts;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Where images and videos of one run are copied to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destinations {
    /// `<destination>/<year>-<month> <title>`
    pub primary: PathBuf,
    /// Either `primary` or its video subdirectory
    pub videos: PathBuf,
}

impl Destinations {
    /// Videos share the album folder only when there are no images
    pub fn resolve(args: &Arguments, video_dir_name: &str, counts: MediaCounts) -> Self {
        let primary = args
            .destination
            .join(album_dir_name(&args.year, &args.month, &args.title));

        let videos = if counts.videos > 0 && counts.images == 0 {
            primary.clone()
        } else {
            primary.join(video_dir_name)
        };

        Self { primary, videos }
    }

    /// Create the folders that will receive at least one file
    pub fn create(&self, counts: MediaCounts) -> Result<()> {
        if counts.images > 0 {
            create_dir(&self.primary)?;
        }
        if counts.videos > 0 {
            create_dir(&self.videos)?;
        }
        Ok(())
    }
}

fn create_dir(path: &Path) -> Result<()> {
    if path.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(path).map_err(|e| Error::CreateDir {
        path: path.to_path_buf(),
        source: e,
    })?;
    info!(?path, "Created directory");
    Ok(())
}

/// Album folder name, e.g. `2024-06 Beach Trip`
pub fn album_dir_name(year: &str, month: &str, title: &str) -> String {
    format!("{}-{} {}", year, month, title)
}

/// Decimal digits needed to print `count` (at least 1)
pub fn index_width(count: usize) -> usize {
    count.to_string().len()
}

/// Generated file name, e.g. `BT_007.jpg`
pub fn item_name(initials: &str, index: usize, width: usize, extension: &str) -> String {
    format!("{}_{:0width$}.{}", initials, index, extension, width = width)
}
