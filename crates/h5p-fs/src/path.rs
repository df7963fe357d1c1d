//! Normalized path handling for cross-platform compatibility

use std::path::Path;

use crate::{Error, Result};

/// A package-relative path normalized to use forward slashes.
///
/// Used for paths declared inside packages and records, such as asset paths.
/// Not for filesystem I/O: `..` is resolved lexically and does not follow
/// symlinks.
///
/// Construction collapses repeated separators and resolves `.` and `..`
/// segments. A relative path keeps any leading `..` segments it cannot
/// resolve, so callers can detect paths that escape their base with
/// [`NormalizedPath::is_safe_relative`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedPath {
    /// Internal representation always uses forward slashes
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path_str = path.as_ref().to_string_lossy();
        Self {
            inner: clean(&path_str),
        }
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Join this path with a segment, resolving dot segments in the result.
    pub fn join(&self, segment: &str) -> Self {
        if self.inner.is_empty() {
            return Self::new(segment);
        }
        Self {
            inner: clean(&format!("{}/{}", self.inner, segment)),
        }
    }

    /// Iterate over the path's segments.
    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.inner.split('/').filter(|c| !c.is_empty())
    }

    /// Whether the path is rooted (`/...`) or carries a drive prefix (`C:`).
    pub fn is_absolute(&self) -> bool {
        self.inner.starts_with('/')
            || self
                .components()
                .next()
                .is_some_and(|first| first.len() == 2 && first.ends_with(':'))
    }

    /// Whether this is a non-empty relative path that stays inside its base.
    pub fn is_safe_relative(&self) -> bool {
        !self.inner.is_empty()
            && !self.is_absolute()
            && self.components().next().is_some_and(|first| first != "..")
    }
}

fn clean(raw: &str) -> String {
    let unified = raw.replace('\\', "/");
    let (prefix, rest) = if unified.starts_with("//") && !unified.starts_with("///") {
        ("//", &unified[2..])
    } else if unified.starts_with('/') {
        ("/", unified.trim_start_matches('/'))
    } else {
        ("", unified.as_str())
    };

    let mut parts: Vec<&str> = Vec::new();
    for component in rest.split('/') {
        match component {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                // Rooted paths cannot climb above the root.
                _ if !prefix.is_empty() => {}
                _ => parts.push(".."),
            },
            other => parts.push(other),
        }
    }

    format!("{}{}", prefix, parts.join("/"))
}

/// Validate that `value` can be used as a single directory or file name.
///
/// Accepts ASCII alphanumerics plus `.`, `_` and `-`, rejecting `.`/`..`.
pub fn validate_path_identifier(value: &str) -> Result<()> {
    let invalid = |reason: &str| Error::InvalidPath {
        path: value.to_string(),
        reason: reason.to_string(),
    };

    if value.is_empty() {
        return Err(invalid("must not be empty"));
    }
    if value == "." || value == ".." {
        return Err(invalid("must not be a dot segment"));
    }
    if let Some(c) = value
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')))
    {
        return Err(invalid(&format!("contains disallowed character {c:?}")));
    }
    Ok(())
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_accepts_machine_names() {
        assert!(validate_path_identifier("H5P.MultiChoice-1.16").is_ok());
        assert!(validate_path_identifier("jQuery.ui").is_ok());
    }

    #[test]
    fn identifier_rejects_separators_and_dots() {
        assert!(validate_path_identifier("a/b").is_err());
        assert!(validate_path_identifier("..").is_err());
        assert!(validate_path_identifier("").is_err());
        assert!(validate_path_identifier("name with space").is_err());
    }

    #[test]
    fn drive_prefix_is_absolute() {
        assert!(NormalizedPath::new("C:\\Windows\\win.ini").is_absolute());
    }
}
