//! Error types for h5p-core

use std::path::PathBuf;

use crate::id::ContentId;

/// Result type for h5p-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while installing or reading content
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Extraction, manifest or dependency failure from h5p-package
    #[error(transparent)]
    Package(#[from] h5p_package::Error),

    /// A content record could not be written; nothing was published
    #[error("failed to store content {id}: {source}")]
    StoreWrite {
        id: ContentId,
        #[source]
        source: h5p_fs::Error,
    },

    /// No content record exists for the identifier
    #[error("content {id} not found")]
    NotFound { id: ContentId },

    /// A content record exists but cannot be parsed back
    #[error("content {id} is corrupt: {reason}")]
    CorruptRecord { id: ContentId, reason: String },

    /// A content record could not be read for a reason other than its contents
    #[error("failed to read content {id}: {source}")]
    StoreRead {
        id: ContentId,
        #[source]
        source: h5p_fs::Error,
    },

    /// Filesystem error outside a single record (e.g. listing the store)
    #[error(transparent)]
    Fs(#[from] h5p_fs::Error),

    /// A string is not a valid content identifier
    #[error("invalid content id '{value}'")]
    InvalidContentId { value: String },

    /// The configuration file could not be loaded
    #[error("invalid configuration at {path}: {reason}")]
    Config { path: PathBuf, reason: String },
}

/// Caller-facing classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The archive or one of its manifests is unusable
    BadArchive,
    /// Dependencies are missing or cyclic
    BadDependencyGraph,
    /// Filesystem failure in the store or working directory
    Storage,
    /// The requested content does not exist
    NotFound,
    /// A stored record is damaged
    Corrupt,
    /// Caller-supplied input (identifier or configuration) is invalid
    InvalidInput,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        use h5p_package::Error as Pkg;

        match self {
            Self::Package(Pkg::Extraction { .. })
            | Self::Package(Pkg::MalformedManifest { .. })
            | Self::Package(Pkg::InvalidLibraryId { .. }) => ErrorKind::BadArchive,
            Self::Package(Pkg::UnresolvedDependency { .. })
            | Self::Package(Pkg::CyclicDependency { .. }) => ErrorKind::BadDependencyGraph,
            Self::Package(Pkg::Fs(_))
            | Self::StoreWrite { .. }
            | Self::StoreRead { .. }
            | Self::Fs(_) => ErrorKind::Storage,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::CorruptRecord { .. } => ErrorKind::Corrupt,
            Self::InvalidContentId { .. } | Self::Config { .. } => ErrorKind::InvalidInput,
        }
    }

    /// Whether retrying the same operation could succeed.
    ///
    /// Only storage I/O failures are transient; a missing or corrupt record
    /// and a bad package stay that way.
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Storage
    }
}
