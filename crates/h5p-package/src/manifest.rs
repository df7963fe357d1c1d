//! Content and library manifest parsing.
//!
//! A package carries one content manifest (`h5p.json`) at its root and one
//! library manifest (`library.json`) per bundled library.
//!
//! # Example content manifest
//!
//! ```json
//! {
//!   "title": "How long is a rope?",
//!   "language": "und",
//!   "mainLibrary": "Vendor.Widget",
//!   "embedTypes": ["div"],
//!   "preloadedDependencies": [
//!     { "machineName": "Vendor.Widget", "majorVersion": 1, "minorVersion": 8 }
//!   ]
//! }
//! ```
//!
//! # Example library manifest
//!
//! ```json
//! {
//!   "machineName": "Vendor.Widget",
//!   "majorVersion": 1,
//!   "minorVersion": 8,
//!   "preloadedJs": [{ "path": "js/widget.js" }],
//!   "preloadedCss": [{ "path": "css/widget.css" }],
//!   "preloadedDependencies": [
//!     { "machineName": "Vendor.Base", "majorVersion": 2, "minorVersion": 0 }
//!   ]
//! }
//! ```

use std::path::Path;

use h5p_fs::{NormalizedPath, PackagePath};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::library::LibraryId;

/// Root manifest of a package.
///
/// Fields other than the ones named here are kept in `extra` and written
/// back unchanged.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentManifest {
    pub title: String,
    /// Machine name of the library that renders the content.
    pub main_library: String,
    #[serde(default)]
    pub preloaded_dependencies: Vec<LibraryId>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Manifest bundled with each library.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryManifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub machine_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major_version: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minor_version: Option<u32>,
    #[serde(default)]
    pub preloaded_js: Vec<AssetRef>,
    #[serde(default)]
    pub preloaded_css: Vec<AssetRef>,
    #[serde(default)]
    pub preloaded_dependencies: Vec<LibraryId>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A `{ "path": ... }` asset entry, relative to the library directory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AssetRef {
    pub path: String,
}

impl ContentManifest {
    /// Parse a content manifest from a JSON string.
    pub fn from_json(content: &str) -> Result<Self> {
        Self::parse(Path::new(PackagePath::ContentManifest.as_str()), content)
    }

    /// Read and parse a content manifest from a file path.
    pub fn from_path(path: &Path) -> Result<Self> {
        Self::parse(path, &read_manifest(path)?)
    }

    fn parse(path: &Path, content: &str) -> Result<Self> {
        let manifest: Self = serde_json::from_str(content).map_err(|e| malformed(path, e))?;
        manifest.validate(path)?;
        Ok(manifest)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(malformed(path, "title must not be empty"));
        }
        if self.main_library_id().is_none() {
            return Err(malformed(
                path,
                format!(
                    "main library '{}' is not among the preloaded dependencies",
                    self.main_library
                ),
            ));
        }
        Ok(())
    }

    /// The preloaded dependency naming the main library.
    pub fn main_library_id(&self) -> Option<&LibraryId> {
        self.preloaded_dependencies
            .iter()
            .find(|dep| dep.machine_name() == self.main_library)
    }

    /// Serialize the manifest back to JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            malformed(Path::new(PackagePath::ContentManifest.as_str()), e)
        })
    }
}

impl LibraryManifest {
    /// Parse a library manifest from a JSON string.
    pub fn from_json(content: &str) -> Result<Self> {
        Self::parse(Path::new(PackagePath::LibraryManifest.as_str()), content)
    }

    /// Read and parse a library manifest from a file path.
    pub fn from_path(path: &Path) -> Result<Self> {
        Self::parse(path, &read_manifest(path)?)
    }

    fn parse(path: &Path, content: &str) -> Result<Self> {
        let manifest: Self = serde_json::from_str(content).map_err(|e| malformed(path, e))?;
        manifest.validate(path)?;
        Ok(manifest)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        for asset in self.preloaded_js.iter().chain(&self.preloaded_css) {
            if !NormalizedPath::new(&asset.path).is_safe_relative() {
                return Err(malformed(
                    path,
                    format!("asset path '{}' must be relative to the library", asset.path),
                ));
            }
        }
        Ok(())
    }

    /// Check that any identity the manifest declares matches `expected`.
    ///
    /// Library manifests usually repeat their own name and version; when
    /// present they must agree with the directory the library was found in.
    pub fn check_identity(&self, expected: &LibraryId, path: &Path) -> Result<()> {
        let mismatch = |field: &str, found: String, wanted: String| {
            malformed(
                path,
                format!("{field} is {found} but the library was resolved as {expected} ({wanted})"),
            )
        };

        if let Some(name) = &self.machine_name
            && name != expected.machine_name()
        {
            return Err(mismatch(
                "machineName",
                name.clone(),
                expected.machine_name().to_string(),
            ));
        }
        if let Some(major) = self.major_version
            && major != expected.major_version()
        {
            return Err(mismatch(
                "majorVersion",
                major.to_string(),
                expected.major_version().to_string(),
            ));
        }
        if let Some(minor) = self.minor_version
            && minor != expected.minor_version()
        {
            return Err(mismatch(
                "minorVersion",
                minor.to_string(),
                expected.minor_version().to_string(),
            ));
        }
        Ok(())
    }
}

/// Read the content payload (`content/content.json`).
///
/// The payload is opaque to the installer; it only has to be a JSON value.
pub fn read_content_payload(path: &Path) -> Result<Value> {
    serde_json::from_str(&read_manifest(path)?).map_err(|e| malformed(path, e))
}

fn read_manifest(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            malformed(path, "manifest file is missing")
        } else {
            Error::Fs(h5p_fs::Error::io(path, e))
        }
    })
}

fn malformed(path: &Path, reason: impl ToString) -> Error {
    Error::MalformedManifest {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CONTENT_JSON: &str = r#"{
        "title": "How long is a rope?",
        "language": "und",
        "mainLibrary": "Vendor.Widget",
        "embedTypes": ["div"],
        "preloadedDependencies": [
            { "machineName": "Vendor.Widget", "majorVersion": 1, "minorVersion": 8 },
            { "machineName": "FontAwesome", "majorVersion": 4, "minorVersion": 5 }
        ]
    }"#;

    #[test]
    fn parses_content_manifest() {
        let manifest = ContentManifest::from_json(CONTENT_JSON).unwrap();
        assert_eq!(manifest.title, "How long is a rope?");
        assert_eq!(manifest.main_library, "Vendor.Widget");
        assert_eq!(manifest.preloaded_dependencies.len(), 2);
        assert_eq!(
            manifest.main_library_id().unwrap().to_string(),
            "Vendor.Widget 1.8"
        );
    }

    #[test]
    fn keeps_unknown_content_fields() {
        let manifest = ContentManifest::from_json(CONTENT_JSON).unwrap();
        assert_eq!(manifest.extra["language"], "und");

        let reparsed = ContentManifest::from_json(&manifest.to_json().unwrap()).unwrap();
        assert_eq!(reparsed, manifest);
    }

    #[test]
    fn missing_title_is_malformed() {
        let err = ContentManifest::from_json(r#"{"mainLibrary": "X", "preloadedDependencies": []}"#)
            .unwrap_err();
        assert!(matches!(err, Error::MalformedManifest { .. }), "{err:?}");
    }

    #[test]
    fn main_library_must_be_preloaded() {
        let err = ContentManifest::from_json(
            r#"{"title": "t", "mainLibrary": "Missing.Lib", "preloadedDependencies": []}"#,
        )
        .unwrap_err();
        assert!(
            matches!(err, Error::MalformedManifest { ref reason, .. } if reason.contains("Missing.Lib")),
            "{err:?}"
        );
    }

    #[test]
    fn invalid_version_component_is_malformed() {
        let err = ContentManifest::from_json(
            r#"{"title": "t", "mainLibrary": "A", "preloadedDependencies": [
                {"machineName": "A", "majorVersion": "one", "minorVersion": 0}
            ]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::MalformedManifest { .. }), "{err:?}");
    }

    #[test]
    fn parses_library_manifest_with_defaults() {
        let manifest = LibraryManifest::from_json(r#"{"title": "Bare"}"#).unwrap();
        assert!(manifest.preloaded_js.is_empty());
        assert!(manifest.preloaded_css.is_empty());
        assert!(manifest.preloaded_dependencies.is_empty());
    }

    #[test]
    fn library_asset_paths_keep_declared_order() {
        let manifest = LibraryManifest::from_json(
            r#"{"preloadedJs": [{"path": "b.js"}, {"path": "a.js"}],
                "preloadedCss": [{"path": "styles/z.css"}]}"#,
        )
        .unwrap();
        let scripts: Vec<_> = manifest.preloaded_js.iter().map(|a| a.path.as_str()).collect();
        assert_eq!(scripts, vec!["b.js", "a.js"]);
    }

    #[test]
    fn escaping_asset_path_is_malformed() {
        let err = LibraryManifest::from_json(r#"{"preloadedJs": [{"path": "../../evil.js"}]}"#)
            .unwrap_err();
        assert!(matches!(err, Error::MalformedManifest { .. }), "{err:?}");
    }

    #[test]
    fn identity_mismatch_is_malformed() {
        let manifest = LibraryManifest::from_json(
            r#"{"machineName": "Vendor.Widget", "majorVersion": 1, "minorVersion": 7}"#,
        )
        .unwrap();
        let expected = LibraryId::new("Vendor.Widget", 1, 8).unwrap();
        let err = manifest
            .check_identity(&expected, Path::new("library.json"))
            .unwrap_err();
        assert!(
            matches!(err, Error::MalformedManifest { ref reason, .. } if reason.contains("minorVersion")),
            "{err:?}"
        );
    }

    #[test]
    fn reads_opaque_content_payload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("content.json");
        std::fs::write(&path, r#"{"text": "Hello", "nested": [1, 2]}"#).unwrap();
        let payload = read_content_payload(&path).unwrap();
        assert_eq!(payload["nested"][1], 2);

        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            read_content_payload(&path),
            Err(Error::MalformedManifest { .. })
        ));
    }

    #[test]
    fn missing_manifest_file_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let err = ContentManifest::from_path(&dir.path().join("h5p.json")).unwrap_err();
        assert!(matches!(err, Error::MalformedManifest { .. }), "{err:?}");
    }
}
