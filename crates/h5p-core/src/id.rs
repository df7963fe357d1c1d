//! Content identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

/// Unique key of one installed content unit.
///
/// Generated from a random UUID at install time and never reused. The
/// string form is the hyphenated UUID, which is also the record's directory
/// name in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(Uuid);

impl ContentId {
    /// Generate a fresh identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for ContentId {
    type Err = Error;

    /// Only the canonical hyphenated form is accepted, so a parsed id always
    /// names the same directory it was printed as.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidContentId {
            value: s.to_string(),
        };
        let uuid = Uuid::try_parse(s).map_err(|_| invalid())?;
        if uuid.hyphenated().to_string() != s {
            return Err(invalid());
        }
        Ok(Self(uuid))
    }
}
