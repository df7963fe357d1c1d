//! Filesystem primitives for the H5P package installer
//!
//! Provides normalized relative paths, atomic writes, structured document
//! loading and checksums shared by the packaging and storage layers.

pub mod checksum;
pub mod constants;
pub mod document;
pub mod error;
pub mod io;
pub mod path;

pub use constants::PackagePath;
pub use document::DocumentStore;
pub use error::{Error, Result};
pub use path::{NormalizedPath, validate_path_identifier};
