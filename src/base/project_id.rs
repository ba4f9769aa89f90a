//! Governance project identifier

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Project id in canonical decimal form: ASCII digits, no leading zeros
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ProjectId(String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid project id {0:?}: expected a non-negative integer")]
pub struct InvalidProjectId(pub String);

impl ProjectId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ProjectId {
    type Err = InvalidProjectId;

    /// Accepts any run of ASCII digits, normalized as an integer
    /// (`"007"` is project `7`). No upper bound on magnitude.
    ///
    /// Non-ASCII Unicode digits (e.g. `"٣"`) are rejected, where a
    /// Unicode-aware digit check would read them as project `3`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidProjectId(s.to_string()));
        }

        let trimmed = s.trim_start_matches('0');
        if trimmed.is_empty() {
            Ok(Self("0".to_string()))
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }
}

/// Keys read back from vote count files go through [FromStr]
impl<'de> Deserialize<'de> for ProjectId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        crate::utility::serde::from_str(deserializer)
    }
}

impl From<u64> for ProjectId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl std::fmt::Display for ProjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
