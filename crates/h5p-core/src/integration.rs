//! Integration descriptors
//!
//! A descriptor carries everything a host page needs to render one content
//! unit: the player runtime assets, the content's own scripts and styles in
//! load order, the serialized payload and the display settings.
//!
//! Asset URLs are root-relative (`/h5p/content/<id>/...`), so a page served
//! from `base_url` can use them as is. Only the settings object's `url` is
//! fully qualified.

use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::config::{DisplayOptions, IntegrationConfig};
use crate::error::{Error, Result};
use crate::id::ContentId;
use crate::store::{ContentRecord, InstallationStore};

/// Player runtime assets, loaded before any library asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoreAssets {
    pub scripts: Vec<String>,
    pub styles: Vec<String>,
}

/// Rendering data for one installed content unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationDescriptor {
    /// Site origin, without a trailing slash.
    pub base_url: String,
    /// Root-relative path the store is served under, e.g. `/h5p`.
    pub url: String,
    pub core: CoreAssets,
    pub content_id: ContentId,
    pub title: String,
    /// Main library as `"<machineName> <major>.<minor>"`.
    pub library: String,
    /// The content payload serialized as a JSON string.
    pub json_content: String,
    /// Root-relative URL under which the record's files are served.
    pub content_url: String,
    /// Library scripts in load order, root-relative.
    pub scripts: Vec<String>,
    /// Library styles in load order, root-relative.
    pub styles: Vec<String>,
    pub display_options: DisplayOptions,
}

/// Builds descriptors from stored records.
#[derive(Debug, Clone, Copy)]
pub struct IntegrationBuilder<'a> {
    store: &'a InstallationStore,
    config: &'a IntegrationConfig,
}

impl<'a> IntegrationBuilder<'a> {
    pub fn new(store: &'a InstallationStore, config: &'a IntegrationConfig) -> Self {
        Self { store, config }
    }

    /// Build the descriptor for installed content `id`.
    ///
    /// Pure with respect to the store: repeated calls return equal
    /// descriptors.
    ///
    /// # Errors
    ///
    /// - `Error::NotFound` if `id` is not installed
    /// - `Error::CorruptRecord` if the record cannot be read back
    pub fn build(&self, id: &ContentId) -> Result<IntegrationDescriptor> {
        let record = self.store.load(id)?;
        IntegrationDescriptor::from_record(&record, self.config)
    }
}

impl IntegrationDescriptor {
    /// Build a descriptor from an already loaded record.
    pub fn from_record(record: &ContentRecord, config: &IntegrationConfig) -> Result<Self> {
        let corrupt = |reason: String| Error::CorruptRecord {
            id: record.id,
            reason,
        };

        let library = record
            .manifest
            .main_library_id()
            .ok_or_else(|| {
                corrupt(format!(
                    "main library '{}' is not among the preloaded dependencies",
                    record.manifest.main_library
                ))
            })?
            .to_string();
        let json_content = serde_json::to_string(&record.content)
            .map_err(|e| corrupt(format!("content payload cannot be serialized: {e}")))?;

        let url = config.root_path();
        let content_url = format!("{url}/content/{}", record.id);
        let asset_url = |path: &String| format!("{content_url}/{path}");
        let scripts = record.assets.scripts.iter().map(asset_url).collect();
        let styles = record.assets.styles.iter().map(asset_url).collect();

        Ok(Self {
            base_url: config.origin().to_string(),
            url,
            core: CoreAssets {
                scripts: config.core_scripts.clone(),
                styles: config.core_styles.clone(),
            },
            content_id: record.id,
            title: record.manifest.title.clone(),
            library,
            json_content,
            content_url,
            scripts,
            styles,
            display_options: config.display_options,
        })
    }

    /// Render the settings object a host page hands to the player runtime.
    ///
    /// Contents are keyed `cid-<id>`, so settings for several content units
    /// can be merged into one page.
    pub fn to_player_settings(&self) -> Value {
        let options = &self.display_options;
        let mut contents = Map::new();
        contents.insert(
            format!("cid-{}", self.content_id),
            json!({
                "library": self.library,
                "jsonContent": self.json_content,
                "fullScreen": false,
                "title": self.title,
                "url": format!("{}{}", self.base_url, self.content_url),
                "contentUserData": null,
                "displayOptions": {
                    "frame": options.frame,
                    "export": options.export,
                    "embed": options.embed,
                    "copyright": options.copyright,
                    "icon": options.icon,
                },
                "scripts": self.scripts,
                "styles": self.styles,
            }),
        );

        json!({
            "baseUrl": self.base_url,
            "url": self.url,
            "siteUrl": format!("{}/", self.base_url),
            "postUserStatistics": false,
            "loadedJs": [],
            "loadedCss": [],
            "core": {
                "scripts": self.core.scripts,
                "styles": self.core.styles,
            },
            "contents": contents,
        })
    }
}
