//! End-to-end tests of the install pipeline
//!
//! Archive on disk -> config file -> install -> store -> integration
//! descriptor, using only the public crate APIs.

use std::fs;

use h5p_core::{ContentService, ErrorKind, InstallerConfig};
use h5p_package::Error as PackageError;
use h5p_test_utils::{TestLibrary, TestPackage, write_zip};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn service_from_config_file(temp: &TempDir, extra: &str) -> ContentService {
    let config_path = temp.path().join("h5p.toml");
    let root = temp.path().join("store").display().to_string().replace('\\', "/");
    let work = temp.path().join("work").display().to_string().replace('\\', "/");
    fs::create_dir_all(temp.path().join("work")).unwrap();
    fs::write(
        &config_path,
        format!("[store]\nroot = \"{root}\"\nwork_dir = \"{work}\"\n\n{extra}"),
    )
    .unwrap();
    ContentService::new(InstallerConfig::load(&config_path).unwrap())
}

/// Diamond: Main -> {Left, Right} -> Shared
fn diamond() -> TestPackage {
    TestPackage::new("Diamond")
        .main_library("Main", 1, 0)
        .library(
            TestLibrary::new("Main", 1, 0)
                .script("main.js")
                .depends_on("Left", 1, 0)
                .depends_on("Right", 1, 0),
        )
        .library(
            TestLibrary::new("Left", 1, 0)
                .script("left.js")
                .depends_on("Shared", 1, 0),
        )
        .library(
            TestLibrary::new("Right", 1, 0)
                .script("right.js")
                .style("right.css")
                .depends_on("Shared", 1, 0),
        )
        .library(TestLibrary::new("Shared", 1, 0).script("shared.js"))
}

#[test]
fn test_diamond_loads_shared_library_once_and_first() {
    let temp = TempDir::new().unwrap();
    let service = service_from_config_file(&temp, "");
    let (_dir, archive) = diamond().temp_archive();

    let outcome = service.install(&archive).unwrap();
    let order: Vec<_> = outcome.libraries.iter().map(ToString::to_string).collect();
    assert_eq!(order, vec!["Shared 1.0", "Left 1.0", "Right 1.0", "Main 1.0"]);

    let descriptor = service.build_integration(&outcome.content_id).unwrap();
    let base = format!("/h5p/content/{}/libraries", outcome.content_id);
    assert_eq!(
        descriptor.scripts,
        vec![
            format!("{base}/Shared-1.0/shared.js"),
            format!("{base}/Left-1.0/left.js"),
            format!("{base}/Right-1.0/right.js"),
            format!("{base}/Main-1.0/main.js"),
        ]
    );
    assert_eq!(descriptor.styles, vec![format!("{base}/Right-1.0/right.css")]);
}

#[test]
fn test_same_archive_twice_gives_independent_records() {
    let temp = TempDir::new().unwrap();
    let service = service_from_config_file(&temp, "");
    let (_dir, archive) = TestPackage::widget().temp_archive();

    let first = service.install(&archive).unwrap();
    let second = service.install(&archive).unwrap();
    assert_ne!(first.content_id, second.content_id);
    assert_eq!(first.libraries, second.libraries);
    assert_eq!(service.list_available().unwrap().len(), 2);
}

#[test]
fn test_configured_urls_flow_into_descriptor() {
    let temp = TempDir::new().unwrap();
    let service = service_from_config_file(
        &temp,
        "[integration]\nbase_url = \"https://lms.example.org\"\nurl = \"/static/h5p/\"\ncore_scripts = [\"/player.js\"]\ncore_styles = []\n",
    );
    let (_dir, archive) = TestPackage::widget().temp_archive();
    let id = service.install(&archive).unwrap().content_id;

    let descriptor = service.build_integration(&id).unwrap();
    assert_eq!(descriptor.content_url, format!("/static/h5p/content/{id}"));
    assert_eq!(descriptor.core.scripts, vec!["/player.js"]);
    assert!(descriptor.core.styles.is_empty());

    let settings = descriptor.to_player_settings();
    assert_eq!(
        settings["contents"][format!("cid-{id}")]["url"],
        format!("https://lms.example.org/static/h5p/content/{id}")
    );
}

#[test]
fn test_working_trees_are_removed() {
    let temp = TempDir::new().unwrap();
    let service = service_from_config_file(&temp, "");
    let (_good_dir, good) = TestPackage::widget().temp_archive();
    let (_bad_dir, bad) = TestPackage::widget()
        .without_library("Vendor.Widget")
        .temp_archive();

    service.install(&good).unwrap();
    service.install(&bad).unwrap_err();

    let leftovers: Vec<_> = fs::read_dir(temp.path().join("work")).unwrap().collect();
    assert!(leftovers.is_empty(), "{leftovers:?}");
}

#[test]
fn test_path_traversal_entry_is_rejected() {
    let temp = TempDir::new().unwrap();
    let service = service_from_config_file(&temp, "");
    let mut entries = TestPackage::widget().entries();
    entries.push(("../escaped.txt".to_string(), b"boom".to_vec()));
    let archive = temp.path().join("evil.h5p");
    write_zip(&archive, &entries);

    let err = service.install(&archive).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadArchive, "{err}");
    assert!(!temp.path().join("escaped.txt").exists());
    assert!(!temp.path().join("work").join("escaped.txt").exists());
    assert!(service.list_available().unwrap().is_empty());
}

#[test]
fn test_cycle_error_names_the_cycle() {
    let temp = TempDir::new().unwrap();
    let service = service_from_config_file(&temp, "");
    let (_dir, archive) = TestPackage::new("Cycle")
        .main_library("A", 1, 0)
        .library(TestLibrary::new("A", 1, 0).depends_on("B", 1, 0))
        .library(TestLibrary::new("B", 1, 0).depends_on("C", 1, 0))
        .library(TestLibrary::new("C", 1, 0).depends_on("A", 1, 0))
        .temp_archive();

    let err = service.install(&archive).unwrap_err();
    match err {
        h5p_core::Error::Package(PackageError::CyclicDependency { cycle }) => {
            assert_eq!(cycle.len(), 3);
        }
        other => panic!("expected cycle, got {other:?}"),
    }
}

#[test]
fn test_version_mismatch_is_unresolved() {
    let temp = TempDir::new().unwrap();
    let service = service_from_config_file(&temp, "");
    // Package bundles Base 2.1 but Widget asks for 2.0.
    let (_dir, archive) = TestPackage::new("Mismatch")
        .main_library("Vendor.Widget", 1, 8)
        .library(TestLibrary::new("Vendor.Widget", 1, 8).depends_on("Vendor.Base", 2, 0))
        .library(TestLibrary::new("Vendor.Base", 2, 1))
        .temp_archive();

    let err = service.install(&archive).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadDependencyGraph);
    assert!(err.to_string().contains("Vendor.Base 2.0"), "{err}");
}
