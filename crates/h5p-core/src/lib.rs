//! Core layer of the H5P package installer
//!
//! This crate ties the packaging crates together:
//!
//! - **Installer**: extract -> parse -> resolve -> aggregate -> persist
//! - **Installation store**: atomic, filesystem-resident content records
//! - **Integration descriptors**: everything a page needs to render content
//! - **Configuration**: store location and integration URLs
//!
//! # Architecture
//!
//! ```text
//!              CLI / upload handler
//!                       |
//!                   h5p-core
//!                       |
//!            +----------+----------+
//!            |                     |
//!       h5p-package             h5p-fs
//! ```

pub mod config;
pub mod error;
pub mod id;
pub mod installer;
pub mod integration;
pub mod service;
pub mod store;

pub use config::{DisplayOptions, InstallerConfig, IntegrationConfig, StoreConfig};
pub use error::{Error, ErrorKind, Result};
pub use id::ContentId;
pub use installer::{InstallOutcome, InstallStage, Installer};
pub use integration::{CoreAssets, IntegrationBuilder, IntegrationDescriptor};
pub use service::ContentService;
pub use store::{ContentRecord, InstallInfo, InstallationStore, RecordFiles};
