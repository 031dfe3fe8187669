//! Error types for the unzipr crate

use std::{fmt, path::PathBuf};

/// Result type for extraction operations
pub type Result<T> = std::result::Result<T, ArchiveError>;

/// Error type for recursive extraction
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    /// The file could not be parsed as a zip archive
    #[error("{} is not a valid zip archive: {reason}", path.display())]
    InvalidArchive { path: PathBuf, reason: String },

    /// A member of an archive could not be written to disk
    #[error("failed to extract '{member}' from {}: {reason}", archive.display())]
    ExtractionFailure {
        archive: PathBuf,
        member: String,
        #[source]
        reason: ExtractionFailureReason,
    },

    /// A nested archive was extracted but removing it afterwards failed
    #[error("extracted nested archive {} but could not remove it: {source}", path.display())]
    DeletionFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Archives are nested deeper than the configured limit
    #[error("{} is nested more than {max_depth} archives deep", path.display())]
    MaxDepthExceeded { path: PathBuf, max_depth: usize },

    /// I/O error while opening or inspecting a file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a single member could not be extracted
#[derive(Debug, thiserror::Error)]
pub enum ExtractionFailureReason {
    /// The member name resolves outside of the extraction directory
    #[error("path traversal detected, '{name}' escapes the target directory")]
    PathTraversal { name: String },

    /// The member would overwrite an archive that is still being read
    #[error("member would overwrite the archive {} while it is being read", path.display())]
    OverwritesArchive { path: PathBuf },

    /// The member data could not be decoded
    #[error("corrupted member data: {message}")]
    Corrupted { message: String },

    /// Writing the member failed (permissions, disk space, ...)
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// The kind of failure, independent of the paths involved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidArchive,
    ExtractionFailure,
    DeletionFailure,
    MaxDepthExceeded,
    Io,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::InvalidArchive => "invalid archive",
            Self::ExtractionFailure => "extraction failure",
            Self::DeletionFailure => "deletion failure",
            Self::MaxDepthExceeded => "maximum nesting depth exceeded",
            Self::Io => "I/O error",
        })
    }
}

impl ArchiveError {
    /// Create a new invalid archive error
    pub fn invalid_archive(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::InvalidArchive {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a new extraction failure for a member of `archive`
    pub fn extraction_failure(
        archive: impl Into<PathBuf>,
        member: impl Into<String>,
        reason: impl Into<ExtractionFailureReason>,
    ) -> Self {
        Self::ExtractionFailure {
            archive: archive.into(),
            member: member.into(),
            reason: reason.into(),
        }
    }

    /// Create a new deletion failure
    pub fn deletion_failure(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DeletionFailure {
            path: path.into(),
            source,
        }
    }

    /// Returns the kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArchive { .. } => ErrorKind::InvalidArchive,
            Self::ExtractionFailure { .. } => ErrorKind::ExtractionFailure,
            Self::DeletionFailure { .. } => ErrorKind::DeletionFailure,
            Self::MaxDepthExceeded { .. } => ErrorKind::MaxDepthExceeded,
            Self::Io(_) => ErrorKind::Io,
        }
    }
}
