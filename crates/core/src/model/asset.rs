use serde::Serialize;
use serde_json::{Map, Value};
use std::path::Path;

/// One emitted file of a bundle.
///
/// Assets are immutable once built: a refresh replaces the owning bundle
/// wholesale instead of editing individual assets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Asset {
    /// File name as reported by the build tool
    pub name: String,
    /// Public URL resolved by the static-file collaborator
    pub url: String,
    /// Remaining manifest fields (path, publicPath, size, integrity, ...)
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

impl Asset {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            metadata: Map::new(),
        }
    }

    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }

    /// Extension of the file name, used to pick the tag template.
    ///
    /// Only the last component counts: `app.min.js` -> `js`.
    pub fn extension(&self) -> Option<&str> {
        Path::new(&self.name).extension().and_then(|e| e.to_str())
    }
}
