use crate::model::Origin;
use cartographer_api::BoxError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CartographerError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Failed to decode configuration: {0}")]
    ConfigDecode(#[from] serde_json::Error),
    #[error("Invalid IGNORE pattern {pattern:?} for bundle {bundle:?}: {source}")]
    InvalidIgnorePattern {
        bundle: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error(
        "Error reading {}. Are you sure webpack has generated the file and the path is correct?",
        path.display()
    )]
    ManifestIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Manifest {} is not valid JSON: {source}", path.display())]
    ManifestDecode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(
        "Manifest {} does not contain valid data ({reason}). Make sure the \
         webpack-bundle-tracker plugin is enabled and try to run webpack again.",
        path.display()
    )]
    ManifestFormat { path: PathBuf, reason: String },
    #[error("{error} in {file}\n{message}")]
    Build {
        error: String,
        file: String,
        message: String,
    },
    #[error("Manifest sources of origin {0} are not supported")]
    UnsupportedOrigin(Origin),

    #[error("BUNDLE {0:?} already registered")]
    AlreadyRegisteredBundle(String),
    #[error("ASSET {0:?} already registered")]
    AlreadyRegisteredAsset(String),
    #[error("BUNDLE {0:?} not registered")]
    NotRegisteredBundle(String),
    #[error("ASSET {0:?} not registered")]
    NotRegisteredAsset(String),

    #[error("No tag template configured for extension {extension:?} in bundle {bundle:?}")]
    MissingTemplate { bundle: String, extension: String },
    #[error("Template rendering failed: {0}")]
    Render(#[source] BoxError),
    #[error("Static URL resolution failed: {0}")]
    StaticUrl(#[source] BoxError),

    #[error("Watcher error: {0}")]
    Watch(#[from] notify::Error),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CartographerError {
    /// True for failures that a later rewrite of the manifest may clear.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            CartographerError::ManifestIo { .. }
                | CartographerError::ManifestDecode { .. }
                | CartographerError::Build { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, CartographerError>;
