//! Configuration types for the album curator

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Default album title
pub const DEFAULT_TITLE: &str = "Album";

/// Default name of the video subdirectory
pub const DEFAULT_VIDEO_DIRECTORY: &str = "Clips";

/// Media category of a file, decided by its extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// Still images (jpg, png, etc.)
    Image,
    /// Video clips (mp4, mov, etc.)
    Video,
    /// Anything else; skipped by the pipeline
    Unknown,
}

/// Configuration for the album curator
///
/// Every field may be omitted from the TOML file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Album title used when `--title` is not given
    pub title: String,

    /// Filename prefix used when `--initials` is not given
    pub initials: Option<String>,

    /// Name of the subdirectory that receives videos next to images
    pub video_dir_name: String,

    /// Recognized image extensions (a leading dot is optional)
    pub image_extensions: Vec<String>,

    /// Recognized video extensions (a leading dot is optional)
    pub video_extensions: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            initials: None,
            video_dir_name: DEFAULT_VIDEO_DIRECTORY.to_string(),
            image_extensions: ["gif", "bmp", "png", "jpg", "jpeg", "tiff"]
                .map(String::from)
                .to_vec(),
            video_extensions: ["m4v", "mp4", "avi", "mov", "wmv"]
                .map(String::from)
                .to_vec(),
        }
    }
}

impl Config {
    /// Check if a file extension is a recognized image format
    pub fn is_image(&self, ext: &str) -> bool {
        let ext_lower = ext.to_lowercase();
        self.image_extensions
            .iter()
            .any(|e| e.trim_start_matches('.').to_lowercase() == ext_lower)
    }

    /// Check if a file extension is a recognized video format
    pub fn is_video(&self, ext: &str) -> bool {
        let ext_lower = ext.to_lowercase();
        self.video_extensions
            .iter()
            .any(|e| e.trim_start_matches('.').to_lowercase() == ext_lower)
    }

    /// Classify an extension (images win if a list names it twice)
    pub fn media_kind(&self, ext: &str) -> MediaKind {
        if ext.is_empty() {
            MediaKind::Unknown
        } else if self.is_image(ext) {
            MediaKind::Image
        } else if self.is_video(ext) {
            MediaKind::Video
        } else {
            MediaKind::Unknown
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| Error::ConfigParse {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(config)
    }
}

/// Lowercased extension of a path, empty when there is none
pub fn lowercase_extension(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}
