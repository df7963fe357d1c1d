//! Library identifiers and per-library records.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::manifest::LibraryManifest;

/// A versioned library name, e.g. `Vendor.Widget 1.8`.
///
/// Equality, hashing and ordering consider all three components. The
/// serialized form matches the `preloadedDependencies` entries of package
/// manifests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawLibraryId")]
pub struct LibraryId {
    machine_name: String,
    major_version: u32,
    minor_version: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLibraryId {
    machine_name: String,
    major_version: u32,
    minor_version: u32,
}

impl TryFrom<RawLibraryId> for LibraryId {
    type Error = Error;

    fn try_from(raw: RawLibraryId) -> Result<Self> {
        Self::new(raw.machine_name, raw.major_version, raw.minor_version)
    }
}

impl LibraryId {
    /// Create an identifier, validating the machine name.
    pub fn new(machine_name: impl Into<String>, major_version: u32, minor_version: u32) -> Result<Self> {
        let machine_name = machine_name.into();
        h5p_fs::validate_path_identifier(&machine_name).map_err(|e| Error::InvalidLibraryId {
            value: machine_name.clone(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            machine_name,
            major_version,
            minor_version,
        })
    }

    /// Parse the on-disk directory form `MachineName-Major.Minor`.
    pub fn from_dir_name(dir_name: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidLibraryId {
            value: dir_name.to_string(),
            reason: reason.to_string(),
        };

        let (name, version) = dir_name
            .rsplit_once('-')
            .ok_or_else(|| invalid("expected MachineName-Major.Minor"))?;
        let (major, minor) = version
            .split_once('.')
            .ok_or_else(|| invalid("version must be Major.Minor"))?;
        let major = major
            .parse()
            .map_err(|_| invalid("major version is not a non-negative integer"))?;
        let minor = minor
            .parse()
            .map_err(|_| invalid("minor version is not a non-negative integer"))?;

        Self::new(name, major, minor)
    }

    pub fn machine_name(&self) -> &str {
        &self.machine_name
    }

    pub fn major_version(&self) -> u32 {
        self.major_version
    }

    pub fn minor_version(&self) -> u32 {
        self.minor_version
    }

    /// Directory name used for the library inside packages and the store.
    pub fn dir_name(&self) -> String {
        format!(
            "{}-{}.{}",
            self.machine_name, self.major_version, self.minor_version
        )
    }
}

/// Formats as `MachineName Major.Minor`, the player's library display form.
impl fmt::Display for LibraryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}.{}",
            self.machine_name, self.major_version, self.minor_version
        )
    }
}

/// One library discovered while building the dependency graph.
///
/// Immutable once built; the dependency list keeps declaration order with
/// duplicates removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryRecord {
    id: LibraryId,
    scripts: Vec<String>,
    styles: Vec<String>,
    dependencies: Vec<LibraryId>,
}

impl LibraryRecord {
    pub fn new(
        id: LibraryId,
        scripts: Vec<String>,
        styles: Vec<String>,
        dependencies: Vec<LibraryId>,
    ) -> Self {
        let mut seen = HashSet::new();
        let dependencies = dependencies
            .into_iter()
            .filter(|dep| seen.insert(dep.clone()))
            .collect();
        Self {
            id,
            scripts,
            styles,
            dependencies,
        }
    }

    /// Build a record from a parsed library manifest.
    pub fn from_manifest(id: LibraryId, manifest: &LibraryManifest) -> Self {
        Self::new(
            id,
            manifest.preloaded_js.iter().map(|a| a.path.clone()).collect(),
            manifest.preloaded_css.iter().map(|a| a.path.clone()).collect(),
            manifest.preloaded_dependencies.clone(),
        )
    }

    pub fn id(&self) -> &LibraryId {
        &self.id
    }

    /// Script paths relative to the library directory, in declared order.
    pub fn scripts(&self) -> &[String] {
        &self.scripts
    }

    /// Style paths relative to the library directory, in declared order.
    pub fn styles(&self) -> &[String] {
        &self.styles
    }

    /// Libraries that must load before this one.
    pub fn dependencies(&self) -> &[LibraryId] {
        &self.dependencies
    }
}
