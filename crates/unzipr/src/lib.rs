//! Recursive extraction of nested zip archives
//!
//! Given a zip archive, this crate unpacks its members next to it. Every
//! extracted member that is itself a zip archive (detected by content, not by
//! file extension) is unpacked in place as well, after which the nested
//! archive file is removed. The top-level archive is never removed.
//!
//! # Features
//!
//! - Depth-first, pre-order traversal in archive listing order
//! - Member names that escape the extraction directory are rejected
//! - Configurable nesting limit
//! - Progress reporting via `indicatif`
//!
//! # Examples
//!
//! ## Basic extraction
//!
//! ```no_run
//! use std::path::Path;
//!
//! // Unpacks `downloads/outer.zip` and every archive inside it into `downloads/`
//! unzipr::extract(Path::new("downloads/outer.zip"))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## With progress reporting
//!
//! ```no_run
//! use unzipr::RecursiveExtractorBuilder;
//! use std::path::Path;
//! # #[cfg(feature = "progress")]
//! use indicatif::ProgressBar;
//!
//! # #[cfg(feature = "progress")]
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let extractor = RecursiveExtractorBuilder::new()
//!     .with_max_depth(Some(8))
//!     .with_progress_bar(ProgressBar::new_spinner())
//!     .build();
//!
//! extractor.extract(Path::new("outer.zip"))?;
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "progress"))]
//! # fn main() {}
//! ```

pub mod error;
pub mod extractor;
pub mod format;
pub mod progress;
pub mod sanitize;

use std::{io::BufReader, path::Path};

pub use error::{ArchiveError, ErrorKind, ExtractionFailureReason, Result};
pub use extractor::{RecursiveExtractor, RecursiveExtractorBuilder, DEFAULT_MAX_DEPTH};
pub use format::ArchiveFormat;
pub use progress::{NoProgressReporter, ProgressReporter};

#[cfg(feature = "progress")]
pub use progress::IndicatifProgressReporter;

/// Recursively extract the archive at `path` with default options
pub fn extract<P: AsRef<Path>>(path: P) -> Result<()> {
    RecursiveExtractorBuilder::new().build().extract(path.as_ref())
}

/// Check whether the file at `path` is a readable zip archive.
///
/// This holds exactly when [`extract`] would be able to open the file: the
/// central directory must parse, wherever the zip data starts. Data in front
/// of the archive (a self-extracting stub, a shell launcher) is allowed.
/// [`ArchiveFormat::detect_from_reader`] only skips the parse for files that
/// carry no zip signature at all. Directories are not archives.
pub fn is_archive<P: AsRef<Path>>(path: P) -> Result<bool> {
    let path = path.as_ref();
    if !path.is_file() {
        return Ok(false);
    }

    let mut file = fs_err::File::open(path)?;
    if ArchiveFormat::detect_from_reader(&mut file)?.is_none() {
        return Ok(false);
    }
    Ok(zip::ZipArchive::new(BufReader::new(file)).is_ok())
}
