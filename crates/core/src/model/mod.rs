//! Registry data model: bundles of emitted files and where they came from.

pub mod asset;
pub mod bundle;

pub use asset::Asset;
pub use bundle::Bundle;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of manifest source a bundle group is read from.
///
/// Every dispatch on the origin (default configuration, parsing) is an
/// exhaustive `match`, so a new source kind has to be handled everywhere
/// before the crate compiles again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Origin {
    /// Stats file written by webpack-bundle-tracker
    Webpack,
    /// Plain directory of files (no parser yet)
    Directory,
}

impl Origin {
    pub const ALL: [Origin; 2] = [Origin::Webpack, Origin::Directory];

    /// Updatable origins may be refreshed after the initial load and are
    /// watched for changes.
    pub fn is_updatable(self) -> bool {
        match self {
            Origin::Webpack => true,
            Origin::Directory => false,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Origin::Webpack => "WEBPACK",
            Origin::Directory => "DIRECTORY",
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_webpack_is_updatable() {
        assert!(Origin::Webpack.is_updatable());
        assert!(!Origin::Directory.is_updatable());
    }

    #[test]
    fn test_origin_uses_settings_spelling() {
        let origin: Origin = serde_json::from_str("\"WEBPACK\"").unwrap();
        assert_eq!(origin, Origin::Webpack);
        assert_eq!(Origin::Directory.to_string(), "DIRECTORY");
        assert!(serde_json::from_str::<Origin>("\"webpack\"").is_err());
    }
}
