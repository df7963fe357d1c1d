//! Archive extraction into a scratch working directory.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use zip::ZipArchive;

use crate::error::{Error, Result};

/// Unpacks package archives under a configurable working directory.
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    work_dir: Option<PathBuf>,
}

/// An unpacked package.
///
/// Owns its working directory; the tree is removed when this value is
/// dropped.
#[derive(Debug)]
pub struct ExtractedPackage {
    dir: TempDir,
    archive: PathBuf,
}

impl Extractor {
    /// Create an extractor. `None` places working trees in the system
    /// temporary directory.
    pub fn new(work_dir: Option<PathBuf>) -> Self {
        Self { work_dir }
    }

    /// Unpack `archive` into a fresh working directory.
    ///
    /// Entries whose names would land outside the working directory are
    /// rejected. On any failure the partially written directory is removed.
    ///
    /// # Errors
    ///
    /// Returns `Error::Extraction` if the archive cannot be opened, is not a
    /// valid archive, contains unsafe entry names, is empty, or if the
    /// working directory cannot be written.
    pub fn extract(&self, archive: &Path) -> Result<ExtractedPackage> {
        let fail = |reason: String| Error::Extraction {
            archive: archive.to_path_buf(),
            reason,
        };

        let file = File::open(archive).map_err(|e| fail(format!("cannot open archive: {e}")))?;
        let mut zip = ZipArchive::new(file).map_err(|e| fail(format!("not a valid archive: {e}")))?;

        let dir = self
            .create_work_dir()
            .map_err(|e| fail(format!("cannot create working directory: {e}")))?;

        for index in 0..zip.len() {
            let mut entry = zip
                .by_index(index)
                .map_err(|e| fail(format!("unreadable entry #{index}: {e}")))?;
            let Some(relative) = entry.enclosed_name() else {
                return Err(fail(format!(
                    "entry '{}' escapes the extraction root",
                    entry.name()
                )));
            };
            let target = dir.path().join(relative);

            if entry.is_dir() {
                fs::create_dir_all(&target)
                    .map_err(|e| fail(format!("cannot create {}: {e}", target.display())))?;
                continue;
            }

            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)
                    .map_err(|e| fail(format!("cannot create {}: {e}", parent.display())))?;
            }
            let mut out = File::create(&target)
                .map_err(|e| fail(format!("cannot create {}: {e}", target.display())))?;
            std::io::copy(&mut entry, &mut out)
                .map_err(|e| fail(format!("cannot write {}: {e}", target.display())))?;
        }

        let is_empty = fs::read_dir(dir.path())
            .map_err(|e| fail(format!("cannot read working directory: {e}")))?
            .next()
            .is_none();
        if is_empty {
            return Err(fail("archive contains no files".to_string()));
        }

        tracing::debug!(
            archive = %archive.display(),
            dir = %dir.path().display(),
            entries = zip.len(),
            "Extracted archive"
        );
        Ok(ExtractedPackage {
            dir,
            archive: archive.to_path_buf(),
        })
    }

    fn create_work_dir(&self) -> std::io::Result<TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("h5p-extract-");
        match &self.work_dir {
            Some(root) => {
                fs::create_dir_all(root)?;
                builder.tempdir_in(root)
            }
            None => builder.tempdir(),
        }
    }
}

impl ExtractedPackage {
    /// Root of the unpacked tree.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// The archive this tree was unpacked from.
    pub fn archive(&self) -> &Path {
        &self.archive
    }
}
