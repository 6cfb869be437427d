//! Curation pipeline
//!
//! Handles the core logic of:
//! - Scanning the resolved sources
//! - Counting images and videos to size the index padding
//! - Creating the album folders
//! - Copying each file under its generated name

use crate::config::{Config, MediaKind};
use crate::error::{Error, Result};
use crate::layout::{Destinations, index_width, item_name};
use crate::resolve::Arguments;
use crate::scan::{FileItem, MediaCounts, count_media, gather_items};
use filetime::FileTime;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, info_span, warn};

/// Result of handling a single file
#[derive(Debug, Clone)]
pub struct FileResult {
    /// Source file path
    pub source: PathBuf,
    /// Generated destination path (none for ignored files)
    pub destination: Option<PathBuf>,
    pub kind: MediaKind,
    pub status: ProcessingStatus,
}

/// Status of file processing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStatus {
    /// File was copied
    Copied,
    /// Unknown file type, left alone
    Ignored,
    /// Dry run - would have copied
    DryRun,
}

/// Processing statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessingStats {
    pub total_files: usize,
    pub images: usize,
    pub videos: usize,
    pub ignored: usize,
}

impl ProcessingStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn summary(&self) -> String {
        format!(
            "Total: {}, Images: {}, Videos: {}, Ignored: {}",
            self.total_files, self.images, self.videos, self.ignored
        )
    }
}

/// Runs one curation over the resolved arguments
pub struct Curator {
    args: Arguments,
    config: Config,
    dry_run: bool,
    stats: ProcessingStats,
    destinations: Option<Destinations>,
}

impl Curator {
    pub fn new(args: Arguments, config: Config, dry_run: bool) -> Self {
        Self {
            args,
            config,
            dry_run,
            stats: ProcessingStats::new(),
            destinations: None,
        }
    }

    /// Run the pipeline
    ///
    /// Stops at the first filesystem error; files copied before it stay
    /// in place.
    pub fn run(&mut self) -> Result<Vec<FileResult>> {
        let _span = info_span!("curate", title = %self.args.title).entered();

        // Counts and the copy list come from the same snapshot
        info!(sources = self.args.sources.len(), "Scanning sources...");
        let items = gather_items(&self.args.sources)?;
        let counts = count_media(&items, &self.config);
        self.stats.total_files = items.len();
        info!(
            files = items.len(),
            images = counts.images,
            videos = counts.videos,
            "Counted media files"
        );

        let destinations =
            Destinations::resolve(&self.args, &self.config.video_dir_name, counts);
        if counts.is_empty() {
            info!("No images or videos found, nothing to create");
        } else if !self.dry_run {
            destinations.create(counts)?;
        }
        self.destinations = Some(destinations.clone());

        let results = self.copy_items(&items, &destinations, counts)?;

        info!("{}", self.stats.summary());
        Ok(results)
    }

    fn copy_items(
        &mut self,
        items: &[FileItem],
        destinations: &Destinations,
        counts: MediaCounts,
    ) -> Result<Vec<FileResult>> {
        let image_width = index_width(counts.images);
        let video_width = index_width(counts.videos);
        let mut image_index = 1;
        let mut video_index = 1;
        let mut results = Vec::with_capacity(items.len());

        for item in items {
            let kind = item.kind(&self.config);
            let dest_path = match kind {
                MediaKind::Image => destinations.primary.join(item_name(
                    &self.args.initials,
                    image_index,
                    image_width,
                    &item.extension,
                )),
                MediaKind::Video => destinations.videos.join(item_name(
                    &self.args.initials,
                    video_index,
                    video_width,
                    &item.extension,
                )),
                MediaKind::Unknown => {
                    println!("Ignoring {} due to unknown filetype.", item.path.display());
                    debug!(path = ?item.path, "Ignored file with unknown type");
                    self.stats.ignored += 1;
                    results.push(FileResult {
                        source: item.path.clone(),
                        destination: None,
                        kind,
                        status: ProcessingStatus::Ignored,
                    });
                    continue;
                }
            };

            let status = if self.dry_run {
                info!(source = ?item.path, destination = ?dest_path, "Would copy file");
                ProcessingStatus::DryRun
            } else {
                if let Err(e) = copy_preserving_times(&item.path, &dest_path) {
                    error!(
                        source = ?item.path,
                        destination = ?dest_path,
                        error = %e,
                        "Copy failed, aborting"
                    );
                    return Err(e);
                }
                info!(source = ?item.path, destination = ?dest_path, "Copied file");
                ProcessingStatus::Copied
            };

            if kind == MediaKind::Image {
                image_index += 1;
                self.stats.images += 1;
            } else {
                video_index += 1;
                self.stats.videos += 1;
            }

            results.push(FileResult {
                source: item.path.clone(),
                destination: Some(dest_path),
                kind,
                status,
            });
        }

        Ok(results)
    }

    /// Get processing statistics reference
    pub fn stats(&self) -> &ProcessingStats {
        &self.stats
    }

    /// Album folders of the last run
    pub fn destinations(&self) -> Option<&Destinations> {
        self.destinations.as_ref()
    }
}

/// Copy a file, carrying over permissions and access/modification times
fn copy_preserving_times(source: &Path, dest: &Path) -> Result<()> {
    // Read before copying; the copy itself may bump the access time
    let metadata = fs::metadata(source).map_err(|e| Error::Metadata {
        path: source.to_path_buf(),
        source: e,
    })?;

    if dest.exists() {
        warn!(?dest, "Overwriting existing file");
    }

    let copy_error = |e: std::io::Error| Error::Copy {
        from: source.to_path_buf(),
        to: dest.to_path_buf(),
        source: e,
    };

    fs::copy(source, dest).map_err(copy_error)?;
    filetime::set_file_times(
        dest,
        FileTime::from_last_access_time(&metadata),
        FileTime::from_last_modification_time(&metadata),
    )
    .map_err(copy_error)?;

    Ok(())
}
