//! Album Curator - gather photos and videos into a dated album folder
//!
//! This library provides:
//! - Argument resolution with recursive source expansion
//! - Extension-based image/video classification
//! - Per-source chronological ordering by modification time
//! - Sequential `<initials>_<index>` renaming with zero-padded indices
//! - Copies that keep permissions and timestamps

pub mod cli;
pub mod clock;
pub mod config;
pub mod error;
pub mod layout;
pub mod process;
pub mod resolve;
pub mod scan;

pub use cli::Cli;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{Config, MediaKind};
pub use error::{Error, Result};
pub use layout::Destinations;
pub use process::{Curator, FileResult, ProcessingStats, ProcessingStatus};
pub use resolve::{Arguments, destination_inside_source};
