use std::path::PathBuf;

use crate::library::LibraryId;

/// Errors raised while unpacking, parsing or resolving a package.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The archive could not be read or unpacked.
    #[error("failed to extract archive {archive}: {reason}")]
    Extraction { archive: PathBuf, reason: String },

    /// A content or library manifest violates the expected schema.
    #[error("malformed manifest at {path}: {reason}")]
    MalformedManifest { path: PathBuf, reason: String },

    /// A library identifier has an invalid machine name or directory form.
    #[error("invalid library identifier '{value}': {reason}")]
    InvalidLibraryId { value: String, reason: String },

    /// A declared dependency has no library in the package.
    #[error("unresolved dependency {library} (required by {})", required_by_label(.required_by))]
    UnresolvedDependency {
        library: LibraryId,
        required_by: Option<LibraryId>,
    },

    /// The dependency graph is not acyclic.
    #[error("cyclic dependency: {}", cycle_label(.cycle))]
    CyclicDependency { cycle: Vec<LibraryId> },

    /// Filesystem error from h5p-fs
    #[error(transparent)]
    Fs(#[from] h5p_fs::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

fn required_by_label(required_by: &Option<LibraryId>) -> String {
    match required_by {
        Some(id) => id.to_string(),
        None => "content manifest".to_string(),
    }
}

fn cycle_label(cycle: &[LibraryId]) -> String {
    let mut names: Vec<String> = cycle.iter().map(ToString::to_string).collect();
    if let Some(first) = names.first().cloned() {
        names.push(first);
    }
    names.join(" -> ")
}
