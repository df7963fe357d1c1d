//! On-disk layout of installed content records

use std::fs;

use h5p_core::{ContentService, InstallerConfig};
use h5p_fs::DocumentStore;
use h5p_test_utils::TestPackage;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tempfile::TempDir;

fn install_widget(temp: &TempDir) -> (ContentService, h5p_core::ContentId) {
    let service =
        ContentService::new(InstallerConfig::default().with_store_root(temp.path().join("store")));
    let (_dir, archive) = TestPackage::widget()
        .content(json!({"text": "Hello"}))
        .temp_archive();
    let id = service.install(&archive).unwrap().content_id;
    (service, id)
}

#[test]
fn test_record_directory_layout() {
    let temp = TempDir::new().unwrap();
    let (service, id) = install_widget(&temp);
    let dir = service.store().record_dir(&id);

    assert_eq!(dir, temp.path().join("store").join("content").join(id.to_string()));
    for file in [
        "h5p.json",
        "content/content.json",
        "deps.json",
        "install.json",
        "libraries/Vendor.Widget-1.8/library.json",
        "libraries/Vendor.Base-2.0/js/base.js",
        "libraries/FontAwesome-4.5/h5p-font-awesome.min.css",
    ] {
        assert!(dir.join(file).is_file(), "missing {file}");
    }
}

#[test]
fn test_asset_order_document() {
    let temp = TempDir::new().unwrap();
    let (service, id) = install_widget(&temp);
    let deps: Value = DocumentStore::new()
        .load(&service.store().record_dir(&id).join("deps.json"))
        .unwrap();

    assert_eq!(
        deps,
        json!({
            "preloadedJs": [
                "libraries/Vendor.Base-2.0/js/base.js",
                "libraries/Vendor.Base-2.0/js/util.js",
                "libraries/Vendor.Widget-1.8/js/widget.js"
            ],
            "preloadedCss": [
                "libraries/Vendor.Base-2.0/css/base.css",
                "libraries/FontAwesome-4.5/h5p-font-awesome.min.css",
                "libraries/Vendor.Widget-1.8/css/widget.css"
            ]
        })
    );
}

#[test]
fn test_install_metadata_document() {
    let temp = TempDir::new().unwrap();
    let (service, id) = install_widget(&temp);
    let info: Value = serde_json::from_str(
        &fs::read_to_string(service.store().record_dir(&id).join("install.json")).unwrap(),
    )
    .unwrap();

    assert!(info["installedAt"].is_string());
    assert!(info["archiveChecksum"].as_str().unwrap().starts_with("sha256:"));
    assert_eq!(info["libraries"][0]["machineName"], "Vendor.Base");
}

#[test]
fn test_manifest_keeps_unknown_fields() {
    let temp = TempDir::new().unwrap();
    let (service, id) = install_widget(&temp);
    let manifest: Value = serde_json::from_str(
        &fs::read_to_string(service.store().record_dir(&id).join("h5p.json")).unwrap(),
    )
    .unwrap();

    assert_eq!(manifest["embedTypes"], json!(["div"]));
    assert_eq!(manifest["license"], "U");
    assert_eq!(manifest["mainLibrary"], "Vendor.Widget");
}

#[test]
fn test_no_staging_left_after_install() {
    let temp = TempDir::new().unwrap();
    let (service, _id) = install_widget(&temp);
    let staging = temp.path().join("store").join(".staging");
    let leftovers: Vec<_> = fs::read_dir(&staging)
        .map(|entries| entries.collect())
        .unwrap_or_default();
    assert!(leftovers.is_empty(), "{leftovers:?}");
    assert_eq!(service.store().remove_stale_staging().unwrap(), 0);
}
