//! Well-known file and directory names inside packages and installed records.

use std::path::Path;

/// Standard package and store filesystem names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackagePath {
    /// The root content manifest (`h5p.json`)
    ContentManifest,
    /// A library's own manifest (`library.json`)
    LibraryManifest,
    /// The content subtree (`content`)
    ContentDir,
    /// The content payload inside the content subtree (`content.json`)
    ContentPayload,
    /// The installed library snapshot directory (`libraries`)
    LibrariesDir,
    /// The persisted resolved asset order (`deps.json`)
    AssetOrder,
    /// The persisted install metadata (`install.json`)
    InstallInfo,
    /// The store's staging area for in-progress writes (`.staging`)
    StagingDir,
}

impl PackagePath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ContentManifest => "h5p.json",
            Self::LibraryManifest => "library.json",
            Self::ContentDir => "content",
            Self::ContentPayload => "content.json",
            Self::LibrariesDir => "libraries",
            Self::AssetOrder => "deps.json",
            Self::InstallInfo => "install.json",
            Self::StagingDir => ".staging",
        }
    }
}

impl AsRef<Path> for PackagePath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for PackagePath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for PackagePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
