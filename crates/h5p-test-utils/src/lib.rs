//! Shared test utilities for the H5P installer workspace.
//!
//! This crate provides package fixtures so crate test suites do not each
//! hand-assemble manifests and archives. It is a dev-dependency only, never
//! published.
//!
//! # Modules
//!
//! - [`package`] - [`TestPackage`](package::TestPackage) builder that writes
//!   extracted trees and zip archives

pub mod package;

pub use package::{TestLibrary, TestPackage, write_zip};
