//! Filesystem-resident installation store
//!
//! Each installed content unit is one directory under `<root>/content/`:
//!
//! ```text
//! <root>/
//!   content/<id>/
//!     h5p.json              content manifest
//!     content/content.json  opaque payload (plus any media files)
//!     libraries/<Name-M.m>/ library files served to the page
//!     deps.json             resolved script and style order
//!     install.json          install metadata
//!   .staging/               records being written
//! ```
//!
//! A record is written completely under `.staging/` and then published with
//! a single directory rename, so readers see either the whole record or
//! nothing. Published records are never modified.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use h5p_fs::{DocumentStore, PackagePath};
use h5p_package::{ContentManifest, LibraryId, ResolvedAssetOrder};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::id::ContentId;

/// Metadata written next to each record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallInfo {
    pub installed_at: DateTime<Utc>,
    /// `sha256:<hex>` of the uploaded archive, when installed from one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive_checksum: Option<String>,
    /// Libraries the content depends on, in load order.
    #[serde(default)]
    pub libraries: Vec<LibraryId>,
}

/// Everything the store keeps about one installed content unit.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentRecord {
    pub id: ContentId,
    pub manifest: ContentManifest,
    pub content: Value,
    pub assets: ResolvedAssetOrder,
    pub info: InstallInfo,
}

/// Directory trees copied into a record when it is saved.
#[derive(Debug, Clone, Default)]
pub struct RecordFiles {
    /// Source of the `content/` subtree.
    pub content_dir: Option<PathBuf>,
    /// Library directories, copied to `libraries/<Name-M.m>/`.
    pub libraries: Vec<(LibraryId, PathBuf)>,
}

/// Installed content, keyed by [`ContentId`].
#[derive(Debug, Clone)]
pub struct InstallationStore {
    root: PathBuf,
}

impl InstallationStore {
    /// Open a store rooted at `root`. Directories are created on first save.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn content_root(&self) -> PathBuf {
        self.root.join(PackagePath::ContentDir)
    }

    fn staging_root(&self) -> PathBuf {
        self.root.join(PackagePath::StagingDir)
    }

    /// Directory of a (possibly not yet existing) record.
    pub fn record_dir(&self, id: &ContentId) -> PathBuf {
        self.content_root().join(id.to_string())
    }

    /// Whether a published record exists for `id`.
    pub fn contains(&self, id: &ContentId) -> bool {
        self.record_dir(id).is_dir()
    }

    /// Persist a record without copying any file trees.
    pub fn save(&self, record: &ContentRecord) -> Result<()> {
        self.save_with_files(record, &RecordFiles::default())
    }

    /// Persist a record together with its content and library files.
    ///
    /// # Errors
    ///
    /// Returns `Error::StoreWrite` if any part of the record cannot be
    /// written or a record with the same id already exists. Nothing is
    /// published in either case.
    pub fn save_with_files(&self, record: &ContentRecord, files: &RecordFiles) -> Result<()> {
        let id = record.id;
        let write_err = |source| Error::StoreWrite { id, source };
        let final_dir = self.record_dir(&id);

        if final_dir.exists() {
            return Err(write_err(h5p_fs::Error::io(
                &final_dir,
                io::Error::new(io::ErrorKind::AlreadyExists, "content record already exists"),
            )));
        }

        let staging_root = self.staging_root();
        fs::create_dir_all(&staging_root).map_err(|e| write_err(h5p_fs::Error::io(&staging_root, e)))?;
        let staging = tempfile::Builder::new()
            .prefix(&format!("{id}-"))
            .tempdir_in(&staging_root)
            .map_err(|e| write_err(h5p_fs::Error::io(&staging_root, e)))?;

        debug!(content_id = %id, staging = %staging.path().display(), "Writing content record");
        write_record(staging.path(), record, files).map_err(write_err)?;

        let content_root = self.content_root();
        fs::create_dir_all(&content_root).map_err(|e| write_err(h5p_fs::Error::io(&content_root, e)))?;
        fs::rename(staging.path(), &final_dir)
            .map_err(|e| write_err(h5p_fs::Error::io(&final_dir, e)))?;

        info!(content_id = %id, path = %final_dir.display(), "Published content record");
        Ok(())
    }

    /// Load a published record.
    ///
    /// # Errors
    ///
    /// - `Error::NotFound` if no record exists for `id`
    /// - `Error::CorruptRecord` if a record file is missing or unparsable
    /// - `Error::StoreRead` for other I/O failures
    pub fn load(&self, id: &ContentId) -> Result<ContentRecord> {
        let dir = self.record_dir(id);
        if !dir.is_dir() {
            return Err(Error::NotFound { id: *id });
        }

        let manifest: ContentManifest = read_document(id, &dir.join(PackagePath::ContentManifest))?;
        let content: Value = read_document(
            id,
            &dir.join(PackagePath::ContentDir)
                .join(PackagePath::ContentPayload),
        )?;
        let assets: ResolvedAssetOrder = read_document(id, &dir.join(PackagePath::AssetOrder))?;
        let info: InstallInfo = read_document(id, &dir.join(PackagePath::InstallInfo))?;

        Ok(ContentRecord {
            id: *id,
            manifest,
            content,
            assets,
            info,
        })
    }

    /// Identifiers of all published records.
    ///
    /// Entries that are not record directories are ignored, as is anything
    /// still in staging.
    pub fn list_ids(&self) -> Result<BTreeSet<ContentId>> {
        let content_root = self.content_root();
        let entries = match fs::read_dir(&content_root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeSet::new()),
            Err(e) => return Err(h5p_fs::Error::io(&content_root, e).into()),
        };

        let mut ids = BTreeSet::new();
        for entry in entries {
            let entry = entry.map_err(|e| h5p_fs::Error::io(&content_root, e))?;
            let is_dir = entry
                .file_type()
                .map_err(|e| h5p_fs::Error::io(entry.path(), e))?
                .is_dir();
            let name = entry.file_name();
            match name.to_str().map(str::parse::<ContentId>) {
                Some(Ok(id)) if is_dir => {
                    ids.insert(id);
                }
                _ => debug!(entry = %entry.path().display(), "Skipping non-record entry"),
            }
        }
        Ok(ids)
    }

    /// Remove leftovers of interrupted saves.
    ///
    /// Only call this while no install is running against the store.
    /// Returns the number of staging directories removed.
    pub fn remove_stale_staging(&self) -> Result<usize> {
        let staging_root = self.staging_root();
        let entries = match fs::read_dir(&staging_root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(h5p_fs::Error::io(&staging_root, e).into()),
        };

        let mut removed = 0;
        for entry in entries {
            let path = entry.map_err(|e| h5p_fs::Error::io(&staging_root, e))?.path();
            warn!(path = %path.display(), "Removing stale staging directory");
            if path.is_dir() {
                h5p_fs::io::remove_dir_all_if_exists(&path)?;
            } else {
                fs::remove_file(&path).map_err(|e| h5p_fs::Error::io(&path, e))?;
            }
            removed += 1;
        }
        Ok(removed)
    }
}

fn write_record(dir: &Path, record: &ContentRecord, files: &RecordFiles) -> h5p_fs::Result<()> {
    let store = DocumentStore::new();

    store.save(&dir.join(PackagePath::ContentManifest), &record.manifest)?;

    let content_dir = dir.join(PackagePath::ContentDir);
    if let Some(source) = &files.content_dir {
        h5p_fs::io::copy_dir_all(source, &content_dir)?;
    } else {
        fs::create_dir_all(&content_dir).map_err(|e| h5p_fs::Error::io(&content_dir, e))?;
    }
    store.save(&content_dir.join(PackagePath::ContentPayload), &record.content)?;

    let libraries_dir = dir.join(PackagePath::LibrariesDir);
    for (id, source) in &files.libraries {
        h5p_fs::io::copy_dir_all(source, &libraries_dir.join(id.dir_name()))?;
    }

    store.save(&dir.join(PackagePath::AssetOrder), &record.assets)?;
    store.save(&dir.join(PackagePath::InstallInfo), &record.info)?;
    Ok(())
}

fn read_document<T: DeserializeOwned>(id: &ContentId, path: &Path) -> Result<T> {
    DocumentStore::new().load(path).map_err(|e| match e {
        h5p_fs::Error::Parse { .. } => Error::CorruptRecord {
            id: *id,
            reason: e.to_string(),
        },
        e if e.is_not_found() => Error::CorruptRecord {
            id: *id,
            reason: format!(
                "{} is missing",
                path.file_name().unwrap_or(path.as_os_str()).to_string_lossy()
            ),
        },
        other => Error::StoreRead {
            id: *id,
            source: other,
        },
    })
}
