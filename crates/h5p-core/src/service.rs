//! Entry points used by upload handlers and page renderers.

use std::collections::BTreeSet;
use std::path::Path;

use crate::config::InstallerConfig;
use crate::error::Result;
use crate::id::ContentId;
use crate::installer::{InstallOutcome, Installer};
use crate::integration::{IntegrationBuilder, IntegrationDescriptor};
use crate::store::{ContentRecord, InstallationStore};

/// Install, list and describe content against one configured store.
///
/// Cheap to clone; clones share nothing mutable, so each thread can hold its
/// own.
#[derive(Debug, Clone)]
pub struct ContentService {
    config: InstallerConfig,
    installer: Installer,
}

impl ContentService {
    pub fn new(config: InstallerConfig) -> Self {
        let installer = Installer::from_config(&config);
        Self { config, installer }
    }

    pub fn config(&self) -> &InstallerConfig {
        &self.config
    }

    pub fn store(&self) -> &InstallationStore {
        self.installer.store()
    }

    /// Install an uploaded archive.
    pub fn install(&self, archive: &Path) -> Result<InstallOutcome> {
        self.installer.install(archive)
    }

    /// Install an already unpacked package directory.
    pub fn install_dir(&self, dir: &Path) -> Result<InstallOutcome> {
        self.installer.install_dir(dir)
    }

    /// Identifiers of every installed content unit.
    pub fn list_available(&self) -> Result<BTreeSet<ContentId>> {
        self.store().list_ids()
    }

    pub fn load(&self, id: &ContentId) -> Result<ContentRecord> {
        self.store().load(id)
    }

    pub fn build_integration(&self, id: &ContentId) -> Result<IntegrationDescriptor> {
        IntegrationBuilder::new(self.store(), &self.config.integration).build(id)
    }
}
