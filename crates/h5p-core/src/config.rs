//! Installer configuration
//!
//! Loaded from a TOML file. Every field has a default, so an empty file (or
//! no file at all) yields a working configuration.
//!
//! # Example
//!
//! ```toml
//! [store]
//! root = "/var/lib/h5p"
//! work_dir = "/tmp/h5p-work"
//!
//! [integration]
//! base_url = "https://example.org"
//! url = "/h5p"
//!
//! [integration.display_options]
//! export = false
//! ```

use std::path::{Path, PathBuf};

use h5p_fs::DocumentStore;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Top-level installer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct InstallerConfig {
    pub store: StoreConfig,
    pub integration: IntegrationConfig,
}

/// Where installed content and scratch trees live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Root of the installation store.
    pub root: PathBuf,
    /// Parent directory for extraction working trees. Defaults to the
    /// system temporary directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_dir: Option<PathBuf>,
}

/// URLs and static settings used when building integration descriptors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrationConfig {
    /// Origin of the hosting site, without a trailing slash.
    pub base_url: String,
    /// Path under which the store is served. A missing leading slash is
    /// added when URLs are built.
    pub url: String,
    /// Player runtime scripts loaded before any library asset.
    pub core_scripts: Vec<String>,
    /// Player runtime styles loaded before any library asset.
    pub core_styles: Vec<String>,
    pub display_options: DisplayOptions,
}

/// Player chrome toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayOptions {
    pub frame: bool,
    pub export: bool,
    pub embed: bool,
    pub copyright: bool,
    pub icon: bool,
}

const CORE_SCRIPTS: &[&str] = &[
    "/h5p-library/js/jquery.js",
    "/h5p-library/js/h5p.js",
    "/h5p-library/js/h5p-event-dispatcher.js",
    "/h5p-library/js/h5p-x-api-event.js",
    "/h5p-library/js/h5p-x-api.js",
    "/h5p-library/js/h5p-content-type.js",
    "/h5p-library/js/h5p-confirmation-dialog.js",
    "/h5p-library/js/h5p-action-bar.js",
];

const CORE_STYLES: &[&str] = &[
    "/h5p-library/styles/h5p.css",
    "/h5p-library/styles/h5p-confirmation-dialog.css",
    "/h5p-library/styles/h5p-core-button.css",
];

impl IntegrationConfig {
    /// `base_url` without a trailing slash.
    pub fn origin(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// `url` as a root-relative path: one leading slash, no trailing slash.
    /// An empty or `/` value serves the store from the site root.
    pub fn root_path(&self) -> String {
        let trimmed = self.url.trim_matches('/');
        if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{trimmed}")
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: default_store_root(),
            work_dir: None,
        }
    }
}

impl Default for IntegrationConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            url: "/h5p".to_string(),
            core_scripts: CORE_SCRIPTS.iter().map(|s| s.to_string()).collect(),
            core_styles: CORE_STYLES.iter().map(|s| s.to_string()).collect(),
            display_options: DisplayOptions::default(),
        }
    }
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            frame: true,
            export: true,
            embed: true,
            copyright: true,
            icon: true,
        }
    }
}

/// `<data dir>/h5p`, or `./h5p` on platforms without a data directory.
pub fn default_store_root() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("h5p"))
        .unwrap_or_else(|| PathBuf::from("h5p"))
}

impl InstallerConfig {
    /// File name looked up in the working directory when no path is given.
    pub const DEFAULT_FILENAME: &'static str = "h5p.toml";

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        DocumentStore::new()
            .load(path)
            .map_err(|e| Error::Config {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
    }

    /// Load `path` if it exists, otherwise return the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.is_file() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "No configuration file, using defaults");
            Ok(Self::default())
        }
    }

    /// Replace the store root.
    pub fn with_store_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.store.root = root.into();
        self
    }
}
