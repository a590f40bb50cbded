//! webpack-bundle-tracker stats file decoding.
//!
//! The stats file is rewritten by the bundler while the application runs, so
//! a read may observe any of three build states. Decoding never blocks or
//! retries; it only classifies what is on disk right now.

use crate::error::{CartographerError, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::Path;

/// One emitted file as listed under a chunk
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ManifestFile {
    pub name: String,
    /// Everything else the tracker wrote (path, publicPath, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Build state reported by the stats file
#[derive(Debug, Clone, PartialEq)]
pub enum BuildStatus {
    /// The bundler is still writing
    Compiling,
    /// Chunk name -> emitted files
    Done {
        chunks: IndexMap<String, Vec<ManifestFile>>,
    },
    /// The bundler reported a failure
    Error {
        error: String,
        file: String,
        message: String,
    },
}

pub fn read_manifest(path: &Path) -> Result<BuildStatus> {
    let content = std::fs::read_to_string(path).map_err(|source| CartographerError::ManifestIo {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value =
        serde_json::from_str(&content).map_err(|source| CartographerError::ManifestDecode {
            path: path.to_path_buf(),
            source,
        })?;
    classify(path, &value)
}

pub fn classify(path: &Path, value: &Value) -> Result<BuildStatus> {
    let format_error = |reason: String| CartographerError::ManifestFormat {
        path: path.to_path_buf(),
        reason,
    };

    let Some(object) = value.as_object() else {
        return Err(format_error("top-level value is not an object".to_string()));
    };

    match object.get("status").and_then(Value::as_str) {
        Some("compiling") => Ok(BuildStatus::Compiling),
        Some("done") => {
            let chunks = object
                .get("chunks")
                .ok_or_else(|| format_error("status is done but chunks are missing".to_string()))?;
            let chunks = IndexMap::<String, Vec<ManifestFile>>::deserialize(chunks)
                .map_err(|e| format_error(format!("invalid chunks: {e}")))?;
            Ok(BuildStatus::Done { chunks })
        }
        Some("error") => {
            let error = text_field(object, "error")
                .ok_or_else(|| format_error("build error without an error kind".to_string()))?;
            let message = text_field(object, "message")
                .ok_or_else(|| format_error("build error without a message".to_string()))?;
            Ok(BuildStatus::Error {
                error,
                file: text_field(object, "file").unwrap_or_default(),
                message,
            })
        }
        Some(other) => Err(format_error(format!("unknown status {other:?}"))),
        None => Err(format_error("status is missing".to_string())),
    }
}

fn text_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    match object.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
