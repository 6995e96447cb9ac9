use std::fmt;

use serde::{Deserialize, Serialize};

/// Fully-qualified network identifier, e.g.
/// `https://www.googleapis.com/compute/v1/projects/p/global/networks/default`.
///
/// Only ever compared for equality; never parsed for meaning.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NetworkId(String);

impl NetworkId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last five path segments joined by dots
    /// (`projects.p.global.networks.default`). Display and file naming only.
    pub fn short_name(&self) -> String {
        let segments: Vec<&str> = self.0.split('/').collect();
        let start: usize = segments.len().saturating_sub(5);
        segments[start..].join(".")
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NetworkId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for NetworkId {
    fn from(value: String) -> Self {
        Self(value)
    }
}
