//! Live asset-manifest registry.
//!
//! Keeps an in-memory index of bundler output (bundles and their emitted
//! files) consistent with the stats file a front-end build keeps rewriting,
//! and renders the asset tags of a bundle on request.

pub mod config;
pub mod error;
pub mod logging;
pub mod manifest;
pub mod model;
pub mod registry;
pub mod runtime;
pub mod static_url;
pub mod tags;
pub mod template;

pub use config::{BundleOverrides, CartographerConfig, SourceConfig};
pub use error::{CartographerError, Result};
pub use manifest::{ManifestSource, ParseOutcome};
pub use model::{Asset, Bundle, Origin};
pub use registry::{Registry, RegistryStats};
pub use runtime::{Cartographer, CartographerBuilder, SourceReport, WatchHandle};
pub use static_url::PrefixUrlResolver;
pub use tags::{TagResolver, split_kinds};
pub use template::MiniJinjaRenderer;
