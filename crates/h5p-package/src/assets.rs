//! Asset aggregation over a resolved library order.

use h5p_fs::{NormalizedPath, PackagePath};
use serde::{Deserialize, Serialize};

use crate::dependency::DependencyGraph;
use crate::error::{Error, Result};
use crate::library::LibraryId;

/// An asset path declared by a library, relative to that library's directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryAsset {
    pub library: LibraryId,
    pub path: String,
}

impl LibraryAsset {
    /// Path of the asset relative to an installed content record, e.g.
    /// `libraries/Vendor.Widget-1.8/js/widget.js`.
    pub fn record_path(&self) -> NormalizedPath {
        NormalizedPath::new(PackagePath::LibrariesDir.as_str())
            .join(&self.library.dir_name())
            .join(&self.path)
    }
}

/// Scripts and styles in load order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregatedAssets {
    pub scripts: Vec<LibraryAsset>,
    pub styles: Vec<LibraryAsset>,
}

impl AggregatedAssets {
    /// Convert to record-relative paths for persistence.
    pub fn to_asset_order(&self) -> ResolvedAssetOrder {
        ResolvedAssetOrder {
            scripts: self
                .scripts
                .iter()
                .map(|a| a.record_path().as_str().to_string())
                .collect(),
            styles: self
                .styles
                .iter()
                .map(|a| a.record_path().as_str().to_string())
                .collect(),
        }
    }
}

/// Persisted script and style order of an installed content unit.
///
/// Paths are relative to the content record directory. Serialized with the
/// `preloadedJs`/`preloadedCss` keys used by `deps.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedAssetOrder {
    #[serde(rename = "preloadedJs")]
    pub scripts: Vec<String>,
    #[serde(rename = "preloadedCss")]
    pub styles: Vec<String>,
}

/// Concatenate each library's scripts and styles in `order`.
///
/// Library-internal order is preserved. Paths declared by more than one
/// library are not de-duplicated; the page loader is expected to tolerate
/// repeats.
///
/// # Errors
///
/// Returns `Error::UnresolvedDependency` if `order` names a library missing
/// from `graph`.
pub fn aggregate(order: &[LibraryId], graph: &DependencyGraph) -> Result<AggregatedAssets> {
    let mut assets = AggregatedAssets::default();
    for id in order {
        let record = graph.get(id).ok_or_else(|| Error::UnresolvedDependency {
            library: id.clone(),
            required_by: None,
        })?;

        assets.scripts.extend(record.scripts().iter().map(|path| LibraryAsset {
            library: id.clone(),
            path: path.clone(),
        }));
        assets.styles.extend(record.styles().iter().map(|path| LibraryAsset {
            library: id.clone(),
            path: path.clone(),
        }));
    }
    Ok(assets)
}
