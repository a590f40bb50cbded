#![allow(dead_code)]

use cartographer_core::{BundleOverrides, CartographerConfig, Origin};
use serde_json::{Value, json};
use std::path::{Path, PathBuf};

pub fn write_stats(path: &Path, value: &Value) {
    std::fs::write(path, serde_json::to_vec_pretty(value).unwrap()).unwrap();
}

pub fn done(chunks: Value) -> Value {
    json!({ "status": "done", "chunks": chunks })
}

pub fn files(names: &[&str]) -> Value {
    Value::Array(names.iter().map(|n| json!({ "name": n })).collect())
}

/// Config with one WEBPACK bundle per name, all reading `stats`
pub fn webpack_config(stats: &Path, bundles: &[&str]) -> CartographerConfig {
    bundles.iter().fold(CartographerConfig::new(), |config, name| {
        config.with_bundle(
            Origin::Webpack,
            name,
            BundleOverrides {
                source: Some(PathBuf::from(stats)),
                ..Default::default()
            },
        )
    })
}
