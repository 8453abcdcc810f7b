use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque record identifier. Generated ones are 32 lowercase hex chars, but
/// imported ledgers may carry any non-blank token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Keeps `raw` when it is a usable token, otherwise generates a new id.
    pub fn from_raw_or_new(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Self::new()
        } else {
            Self(trimmed.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.trim().to_string())
    }
}
