//! The installation pipeline
//!
//! ```text
//! Uploaded -> Extracted -> GraphBuilt -> Resolved -> Aggregated -> Persisted
//! ```
//!
//! Any stage failure aborts the install; the working tree is dropped and no
//! record is published.

use std::fmt;
use std::path::Path;

use chrono::Utc;
use h5p_fs::PackagePath;
use h5p_fs::checksum::compute_file_checksum;
use h5p_package::{
    ContentManifest, DirectoryResolver, Extractor, LibraryId, aggregate, build_graph,
    read_content_payload, resolve,
};
use tracing::{debug, info, instrument};

use crate::config::InstallerConfig;
use crate::error::Result;
use crate::id::ContentId;
use crate::store::{ContentRecord, InstallInfo, InstallationStore, RecordFiles};

/// Progress of a single install.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallStage {
    Uploaded,
    Extracted,
    GraphBuilt,
    Resolved,
    Aggregated,
    Persisted,
}

impl fmt::Display for InstallStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Uploaded => "uploaded",
            Self::Extracted => "extracted",
            Self::GraphBuilt => "graph built",
            Self::Resolved => "resolved",
            Self::Aggregated => "aggregated",
            Self::Persisted => "persisted",
        };
        f.write_str(name)
    }
}

/// Summary of a successful install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOutcome {
    pub content_id: ContentId,
    pub title: String,
    /// Libraries in load order.
    pub libraries: Vec<LibraryId>,
    pub script_count: usize,
    pub style_count: usize,
}

/// Runs packages through the pipeline into an [`InstallationStore`].
///
/// An `Installer` holds no per-install state, so one instance can serve
/// concurrent installs from several threads.
#[derive(Debug, Clone)]
pub struct Installer {
    extractor: Extractor,
    store: InstallationStore,
}

impl Installer {
    pub fn new(extractor: Extractor, store: InstallationStore) -> Self {
        Self { extractor, store }
    }

    pub fn from_config(config: &InstallerConfig) -> Self {
        Self::new(
            Extractor::new(config.store.work_dir.clone()),
            InstallationStore::new(&config.store.root),
        )
    }

    pub fn store(&self) -> &InstallationStore {
        &self.store
    }

    /// Install a package archive and return the new content id.
    ///
    /// # Errors
    ///
    /// - `Error::Package` for unreadable archives, malformed manifests, and
    ///   missing or cyclic dependencies
    /// - `Error::StoreWrite` if the record cannot be persisted
    #[instrument(skip_all, fields(archive = %archive.display()))]
    pub fn install(&self, archive: &Path) -> Result<InstallOutcome> {
        let content_id = ContentId::generate();
        debug!(%content_id, stage = %InstallStage::Uploaded, "Install started");

        let package = self.extractor.extract(archive)?;
        let checksum = compute_file_checksum(archive)?;
        debug!(
            %content_id,
            stage = %InstallStage::Extracted,
            archive = %package.archive().display(),
            dir = %package.path().display()
        );

        // `package` owns the working tree; it is removed when this returns.
        self.install_tree(content_id, package.path(), Some(checksum))
    }

    /// Install a package that has already been unpacked into `dir`.
    ///
    /// The directory is only read from; the caller keeps ownership.
    #[instrument(skip_all, fields(dir = %dir.display()))]
    pub fn install_dir(&self, dir: &Path) -> Result<InstallOutcome> {
        let content_id = ContentId::generate();
        debug!(%content_id, stage = %InstallStage::Extracted, "Install started from directory");
        self.install_tree(content_id, dir, None)
    }

    fn install_tree(
        &self,
        content_id: ContentId,
        root: &Path,
        archive_checksum: Option<String>,
    ) -> Result<InstallOutcome> {
        let manifest = ContentManifest::from_path(&root.join(PackagePath::ContentManifest.as_str()))?;
        let content_dir = root.join(PackagePath::ContentDir.as_str());
        let content = read_content_payload(&content_dir.join(PackagePath::ContentPayload.as_str()))?;

        // The package's own library directories are the snapshot this install
        // resolves against; nothing outside the working tree is consulted.
        let resolver = DirectoryResolver::new(root);
        let graph = build_graph(&manifest.preloaded_dependencies, &resolver)?;
        debug!(
            %content_id,
            stage = %InstallStage::GraphBuilt,
            libraries = graph.len(),
            edges = graph.edge_count()
        );

        let order = resolve(&graph)?;
        let names: Vec<String> = order.iter().map(ToString::to_string).collect();
        debug!(%content_id, stage = %InstallStage::Resolved, order = ?names);

        let assets = aggregate(&order, &graph)?;
        debug!(
            %content_id,
            stage = %InstallStage::Aggregated,
            scripts = assets.scripts.len(),
            styles = assets.styles.len()
        );

        let files = RecordFiles {
            content_dir: Some(content_dir),
            libraries: resolver
                .available()?
                .into_iter()
                .map(|id| {
                    let dir = resolver.library_dir(&id);
                    (id, dir)
                })
                .collect(),
        };
        let record = ContentRecord {
            id: content_id,
            manifest,
            content,
            assets: assets.to_asset_order(),
            info: InstallInfo {
                installed_at: Utc::now(),
                archive_checksum,
                libraries: order.clone(),
            },
        };
        self.store.save_with_files(&record, &files)?;

        info!(
            %content_id,
            stage = %InstallStage::Persisted,
            title = %record.manifest.title,
            libraries = order.len(),
            "Installed content"
        );

        Ok(InstallOutcome {
            content_id,
            title: record.manifest.title,
            libraries: order,
            script_count: record.assets.scripts.len(),
            style_count: record.assets.styles.len(),
        })
    }
}
