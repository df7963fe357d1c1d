//! [`TestPackage`] builder for installer test scenarios.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::{Value, json};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

/// A library bundled into a [`TestPackage`].
#[derive(Debug, Clone)]
pub struct TestLibrary {
    machine_name: String,
    major: u32,
    minor: u32,
    scripts: Vec<String>,
    styles: Vec<String>,
    dependencies: Vec<(String, u32, u32)>,
    declare_identity: bool,
}

impl TestLibrary {
    pub fn new(machine_name: &str, major: u32, minor: u32) -> Self {
        Self {
            machine_name: machine_name.to_string(),
            major,
            minor,
            scripts: Vec::new(),
            styles: Vec::new(),
            dependencies: Vec::new(),
            declare_identity: true,
        }
    }

    /// Declare a preloaded script; the file is written with placeholder content.
    pub fn script(mut self, path: &str) -> Self {
        self.scripts.push(path.to_string());
        self
    }

    /// Declare a preloaded stylesheet; the file is written with placeholder content.
    pub fn style(mut self, path: &str) -> Self {
        self.styles.push(path.to_string());
        self
    }

    pub fn depends_on(mut self, machine_name: &str, major: u32, minor: u32) -> Self {
        self.dependencies
            .push((machine_name.to_string(), major, minor));
        self
    }

    /// Omit `machineName`/`majorVersion`/`minorVersion` from `library.json`.
    pub fn anonymous(mut self) -> Self {
        self.declare_identity = false;
        self
    }

    /// Directory name `MachineName-Major.Minor`.
    pub fn dir_name(&self) -> String {
        format!("{}-{}.{}", self.machine_name, self.major, self.minor)
    }

    /// The `library.json` document.
    pub fn manifest(&self) -> Value {
        let mut manifest = json!({
            "title": self.machine_name,
            "patchVersion": 0,
            "runnable": 0,
            "preloadedJs": self.scripts.iter().map(|p| json!({ "path": p })).collect::<Vec<_>>(),
            "preloadedCss": self.styles.iter().map(|p| json!({ "path": p })).collect::<Vec<_>>(),
            "preloadedDependencies": dependency_list(&self.dependencies),
        });
        if self.declare_identity {
            manifest["machineName"] = json!(self.machine_name);
            manifest["majorVersion"] = json!(self.major);
            manifest["minorVersion"] = json!(self.minor);
        }
        manifest
    }
}

/// Builder for a package: content manifest, content payload and libraries.
///
/// # Example
///
/// ```rust,no_run
/// use h5p_test_utils::{TestLibrary, TestPackage};
///
/// let package = TestPackage::new("Quiz")
///     .main_library("Vendor.Widget", 1, 8)
///     .library(TestLibrary::new("Vendor.Widget", 1, 8).script("widget.js"));
/// package.write_archive(std::path::Path::new("/tmp/quiz.h5p"));
/// ```
#[derive(Debug, Clone)]
pub struct TestPackage {
    title: String,
    main_library: String,
    preloaded: Vec<(String, u32, u32)>,
    content: Value,
    libraries: Vec<TestLibrary>,
    files: Vec<(String, Vec<u8>)>,
    raw_manifest: Option<String>,
    include_manifest: bool,
    include_content: bool,
}

impl TestPackage {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            main_library: String::new(),
            preloaded: Vec::new(),
            content: json!({ "question": "How long is a rope?" }),
            libraries: Vec::new(),
            files: Vec::new(),
            raw_manifest: None,
            include_manifest: true,
            include_content: true,
        }
    }

    /// The canonical fixture: `Vendor.Widget 1.8` depending on
    /// `Vendor.Base 2.0`, plus a preloaded `FontAwesome 4.5` that also
    /// depends on the base library.
    pub fn widget() -> Self {
        Self::new("How long is a rope?")
            .main_library("Vendor.Widget", 1, 8)
            .preload("FontAwesome", 4, 5)
            .library(
                TestLibrary::new("Vendor.Widget", 1, 8)
                    .script("js/widget.js")
                    .style("css/widget.css")
                    .depends_on("Vendor.Base", 2, 0),
            )
            .library(
                TestLibrary::new("Vendor.Base", 2, 0)
                    .script("js/base.js")
                    .script("js/util.js")
                    .style("css/base.css"),
            )
            .library(
                TestLibrary::new("FontAwesome", 4, 5)
                    .style("h5p-font-awesome.min.css")
                    .depends_on("Vendor.Base", 2, 0),
            )
    }

    /// Set the main library and add it to the preloaded dependencies.
    pub fn main_library(mut self, machine_name: &str, major: u32, minor: u32) -> Self {
        self.main_library = machine_name.to_string();
        self.preload(machine_name, major, minor)
    }

    /// Add a preloaded dependency to the content manifest.
    pub fn preload(mut self, machine_name: &str, major: u32, minor: u32) -> Self {
        self.preloaded.push((machine_name.to_string(), major, minor));
        self
    }

    pub fn library(mut self, library: TestLibrary) -> Self {
        self.libraries.push(library);
        self
    }

    /// Drop a previously added library (simulates a package missing one).
    pub fn without_library(mut self, machine_name: &str) -> Self {
        self.libraries.retain(|l| l.machine_name != machine_name);
        self
    }

    pub fn content(mut self, content: Value) -> Self {
        self.content = content;
        self
    }

    /// Add an arbitrary file at `path` relative to the package root.
    pub fn file(mut self, path: &str, bytes: &[u8]) -> Self {
        self.files.push((path.to_string(), bytes.to_vec()));
        self
    }

    /// Use `raw` verbatim as `h5p.json`.
    pub fn raw_content_manifest(mut self, raw: &str) -> Self {
        self.raw_manifest = Some(raw.to_string());
        self
    }

    pub fn without_content_manifest(mut self) -> Self {
        self.include_manifest = false;
        self
    }

    pub fn without_content(mut self) -> Self {
        self.include_content = false;
        self
    }

    /// The `h5p.json` document.
    pub fn content_manifest(&self) -> Value {
        json!({
            "title": self.title,
            "language": "und",
            "mainLibrary": self.main_library,
            "embedTypes": ["div"],
            "license": "U",
            "preloadedDependencies": dependency_list(&self.preloaded),
        })
    }

    /// Every file of the package as `(relative path, bytes)`.
    pub fn entries(&self) -> Vec<(String, Vec<u8>)> {
        let mut entries = Vec::new();

        if self.include_manifest {
            let manifest = match &self.raw_manifest {
                Some(raw) => raw.clone(),
                None => pretty(&self.content_manifest()),
            };
            entries.push(("h5p.json".to_string(), manifest.into_bytes()));
        }
        if self.include_content {
            entries.push((
                "content/content.json".to_string(),
                pretty(&self.content).into_bytes(),
            ));
        }

        for library in &self.libraries {
            let dir = library.dir_name();
            entries.push((
                format!("{dir}/library.json"),
                pretty(&library.manifest()).into_bytes(),
            ));
            for asset in library.scripts.iter().chain(&library.styles) {
                entries.push((
                    format!("{dir}/{asset}"),
                    format!("/* {dir}/{asset} */\n").into_bytes(),
                ));
            }
        }

        entries.extend(self.files.iter().cloned());
        entries
    }

    /// Write the package as an already-extracted tree under `dir`.
    pub fn write_dir(&self, dir: &Path) {
        for (name, bytes) in self.entries() {
            let target = dir.join(&name);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(&target, bytes).unwrap();
        }
    }

    /// Write the package as a zip archive at `path`.
    pub fn write_archive(&self, path: &Path) {
        write_zip(path, &self.entries());
    }

    /// Write the archive into a fresh temporary directory.
    ///
    /// The returned directory must be kept alive while the archive is used.
    pub fn temp_archive(&self) -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("package.h5p");
        self.write_archive(&path);
        (dir, path)
    }
}

/// Write a zip archive with exactly the given entries.
pub fn write_zip(path: &Path, entries: &[(String, Vec<u8>)]) {
    let file = File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default();
    for (name, bytes) in entries {
        zip.start_file(name.as_str(), options).unwrap();
        zip.write_all(bytes).unwrap();
    }
    zip.finish().unwrap();
}

fn dependency_list(deps: &[(String, u32, u32)]) -> Vec<Value> {
    deps.iter()
        .map(|(name, major, minor)| {
            json!({ "machineName": name, "majorVersion": major, "minorVersion": minor })
        })
        .collect()
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap()
}
