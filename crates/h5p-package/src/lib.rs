//! Package handling for the H5P installer.
//!
//! This crate unpacks package archives, parses content and library
//! manifests, builds the library dependency graph, orders it and
//! aggregates the client-side assets each library declares.

pub mod assets;
pub mod dependency;
pub mod error;
pub mod extract;
pub mod library;
pub mod manifest;

pub use assets::{AggregatedAssets, LibraryAsset, ResolvedAssetOrder, aggregate};
pub use dependency::{DependencyGraph, DirectoryResolver, LibraryResolver, build_graph, resolve};
pub use error::{Error, Result};
pub use extract::{ExtractedPackage, Extractor};
pub use library::{LibraryId, LibraryRecord};
pub use manifest::{AssetRef, ContentManifest, LibraryManifest, read_content_payload};
