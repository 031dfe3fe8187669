//! Recursive extractor implementation

use crate::{
    error::{ArchiveError, ExtractionFailureReason, Result},
    is_archive,
    progress::{NoProgressReporter, ProgressReporter},
    sanitize::sanitize_member_name,
};
use std::{
    io::{BufReader, Read, Seek},
    path::{Path, PathBuf},
};

/// Default limit on how many archives may be nested inside each other
pub const DEFAULT_MAX_DEPTH: usize = 32;

type Archive = zip::ZipArchive<BufReader<fs_err::File>>;

/// Builder for configuring recursive extraction
pub struct RecursiveExtractorBuilder<P: ProgressReporter = NoProgressReporter> {
    max_depth: Option<usize>,
    progress_reporter: P,
}

impl RecursiveExtractorBuilder<NoProgressReporter> {
    /// Create a new extractor builder
    pub fn new() -> Self {
        Self {
            max_depth: Some(DEFAULT_MAX_DEPTH),
            progress_reporter: NoProgressReporter,
        }
    }
}

impl<P: ProgressReporter> RecursiveExtractorBuilder<P> {
    /// Limit how deep archives may be nested inside the top-level archive.
    /// `None` removes the limit.
    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set a custom progress reporter
    pub fn with_progress_reporter<R: ProgressReporter>(
        self,
        reporter: R,
    ) -> RecursiveExtractorBuilder<R> {
        RecursiveExtractorBuilder {
            max_depth: self.max_depth,
            progress_reporter: reporter,
        }
    }

    /// Build the extractor
    pub fn build(self) -> RecursiveExtractor<P> {
        RecursiveExtractor {
            max_depth: self.max_depth,
            progress_reporter: self.progress_reporter,
        }
    }
}

impl Default for RecursiveExtractorBuilder<NoProgressReporter> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "progress")]
impl RecursiveExtractorBuilder<NoProgressReporter> {
    /// Set an indicatif progress bar
    pub fn with_progress_bar(
        self,
        progress_bar: indicatif::ProgressBar,
    ) -> RecursiveExtractorBuilder<crate::progress::IndicatifProgressReporter> {
        RecursiveExtractorBuilder {
            max_depth: self.max_depth,
            progress_reporter: crate::progress::IndicatifProgressReporter::new(progress_bar),
        }
    }
}

/// Extracts an archive next to itself, then every archive found among its
/// members, depth first. Nested archives are removed once their content has
/// been extracted; the top-level archive is left in place.
pub struct RecursiveExtractor<P: ProgressReporter = NoProgressReporter> {
    max_depth: Option<usize>,
    progress_reporter: P,
}

/// A member that was written to disk
struct ExtractedMember {
    path: PathBuf,
    is_dir: bool,
}

impl<P: ProgressReporter> RecursiveExtractor<P> {
    /// The configured nesting limit
    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    /// Extract the archive at `archive_path` into the directory that contains
    /// it and recursively unpack every nested archive.
    pub fn extract(&self, archive_path: &Path) -> Result<()> {
        self.extract_recursive(archive_path, &mut Vec::new())
    }

    /// `open_archives` holds the canonical paths of the archives whose handles
    /// are open further up the recursion, outermost first.
    fn extract_recursive(
        &self,
        archive_path: &Path,
        open_archives: &mut Vec<PathBuf>,
    ) -> Result<()> {
        let depth = open_archives.len();

        // Parsing happens before anything is written
        let mut archive = open_archive(archive_path)?;
        open_archives.push(fs_err::canonicalize(archive_path)?);

        tracing::info!("Extracting {}", archive_path.display());
        self.progress_reporter.on_archive_start(archive_path, depth);

        let destination = archive_path.parent().unwrap_or_else(|| Path::new(""));

        for index in 0..archive.len() {
            let Some(member) =
                extract_member(&mut archive, index, archive_path, destination, open_archives)?
            else {
                continue;
            };
            self.progress_reporter.on_entry(&member.path);

            if !member.is_dir && is_archive(&member.path)? {
                self.extract_nested(&member.path, open_archives)?;
            }
        }

        drop(archive);
        open_archives.pop();
        self.progress_reporter.on_archive_finish(archive_path, depth);
        Ok(())
    }

    /// Extract a nested archive, then remove it
    fn extract_nested(
        &self,
        archive_path: &Path,
        open_archives: &mut Vec<PathBuf>,
    ) -> Result<()> {
        if let Some(max_depth) = self.max_depth {
            if open_archives.len() > max_depth {
                return Err(ArchiveError::MaxDepthExceeded {
                    path: archive_path.to_path_buf(),
                    max_depth,
                });
            }
        }

        self.extract_recursive(archive_path, open_archives)?;

        fs_err::remove_file(archive_path)
            .map_err(|e| ArchiveError::deletion_failure(archive_path, e))?;
        tracing::debug!("removed nested archive {}", archive_path.display());
        Ok(())
    }
}

/// Open a zip archive, failing with [`ArchiveError::InvalidArchive`] if the
/// central directory cannot be read
fn open_archive(archive_path: &Path) -> Result<Archive> {
    let file = fs_err::File::open(archive_path)?;
    zip::ZipArchive::new(BufReader::new(file))
        .map_err(|e| ArchiveError::invalid_archive(archive_path, e))
}

/// Write the member at `index` below `destination`.
///
/// Returns `None` for directory entries that name `destination` itself.
fn extract_member<R: Read + Seek>(
    archive: &mut zip::ZipArchive<R>,
    index: usize,
    archive_path: &Path,
    destination: &Path,
    open_archives: &[PathBuf],
) -> Result<Option<ExtractedMember>> {
    let mut file = archive.by_index(index).map_err(|e| {
        ArchiveError::extraction_failure(
            archive_path,
            format!("#{index}"),
            ExtractionFailureReason::Corrupted {
                message: e.to_string(),
            },
        )
    })?;
    let name = file.name().to_string();
    let is_dir = file.is_dir();
    let failure = |reason: ExtractionFailureReason| {
        ArchiveError::extraction_failure(archive_path, &name, reason)
    };

    let relative = sanitize_member_name(&name).map_err(failure)?;
    if relative.as_os_str().is_empty() {
        if is_dir {
            return Ok(None);
        }
        return Err(failure(ExtractionFailureReason::PathTraversal { name: name.clone() }));
    }

    let target = destination.join(&relative);
    if overwrites_open_archive(&target, open_archives) {
        return Err(failure(ExtractionFailureReason::OverwritesArchive {
            path: target,
        }));
    }

    if is_dir {
        fs_err::create_dir_all(&target).map_err(|e| failure(e.into()))?;
    } else {
        if let Some(parent) = target.parent() {
            fs_err::create_dir_all(parent).map_err(|e| failure(e.into()))?;
        }
        let mut output = fs_err::File::create(&target).map_err(|e| failure(e.into()))?;
        std::io::copy(&mut file, &mut output).map_err(|e| failure(e.into()))?;
    }

    tracing::debug!(member = %name, "wrote {}", target.display());
    Ok(Some(ExtractedMember {
        path: target,
        is_dir,
    }))
}

/// Whether writing to `target` would replace one of `open_archives`.
///
/// Symlinks are resolved, so a differently spelled path to an open archive
/// (or a symlink pointing at one) is caught. A target that does not exist yet
/// cannot be an open archive.
fn overwrites_open_archive(target: &Path, open_archives: &[PathBuf]) -> bool {
    match fs_err::canonicalize(target) {
        Ok(resolved) => open_archives.contains(&resolved),
        Err(_) => false,
    }
}
