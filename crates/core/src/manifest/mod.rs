//! Manifest sources: turn one manifest file into bundle registrations.

pub mod stats;

use crate::config::SourceConfig;
use crate::error::{CartographerError, Result};
use crate::model::{Asset, Bundle, Origin};
use crate::registry::Registry;
use cartographer_api::StaticUrlResolver;
use stats::{BuildStatus, ManifestFile};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, trace};

/// Result of a successful parse
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// The bundler is still writing; nothing was registered
    Compiling,
    /// Names of the bundles (re-)registered by this pass
    Ready { bundles: Vec<String> },
}

impl ParseOutcome {
    pub fn is_ready(&self) -> bool {
        matches!(self, ParseOutcome::Ready { .. })
    }
}

/// One configured bundle group, bound to the registry it feeds.
pub struct ManifestSource {
    config: Arc<SourceConfig>,
    registry: Arc<Registry>,
    urls: Arc<dyn StaticUrlResolver>,
}

impl ManifestSource {
    pub fn new(
        config: Arc<SourceConfig>,
        registry: Arc<Registry>,
        urls: Arc<dyn StaticUrlResolver>,
    ) -> Self {
        Self {
            config,
            registry,
            urls,
        }
    }

    pub fn config(&self) -> &Arc<SourceConfig> {
        &self.config
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn path(&self) -> &Path {
        &self.config.source
    }

    pub fn is_updatable(&self) -> bool {
        self.config.origin.is_updatable()
    }

    /// Read the manifest once and register what it describes.
    ///
    /// Never waits for a build in progress: a `compiling` manifest returns
    /// [`ParseOutcome::Compiling`] without touching the registry, and the
    /// watcher triggers the next attempt.
    pub fn parse(&self) -> Result<ParseOutcome> {
        match self.config.origin {
            Origin::Webpack => self.parse_webpack_stats(),
            Origin::Directory => Err(CartographerError::UnsupportedOrigin(Origin::Directory)),
        }
    }

    fn parse_webpack_stats(&self) -> Result<ParseOutcome> {
        match stats::read_manifest(&self.config.source)? {
            BuildStatus::Compiling => {
                debug!(
                    "Manifest {} is still compiling, skipping bundle {}",
                    self.config.source.display(),
                    self.config.name
                );
                Ok(ParseOutcome::Compiling)
            }
            BuildStatus::Error {
                error,
                file,
                message,
            } => Err(CartographerError::Build {
                error,
                file,
                message,
            }),
            BuildStatus::Done { chunks } => {
                // Build every matching bundle before the registry sees any of them
                let bundles = chunks
                    .into_iter()
                    .filter(|(chunk, _)| *chunk == self.config.name)
                    .map(|(chunk, files)| self.build_bundle(chunk, files))
                    .collect::<Result<Vec<_>>>()?;

                let mut registered = Vec::with_capacity(bundles.len());
                for bundle in bundles {
                    let name = bundle.name().to_string();
                    let assets = bundle.len();
                    self.registry.register_bundle(bundle)?;
                    info!("Registered bundle {} ({} assets)", name, assets);
                    registered.push(name);
                }

                if registered.is_empty() {
                    debug!(
                        "No chunk named {} in {}",
                        self.config.name,
                        self.config.source.display()
                    );
                }
                Ok(ParseOutcome::Ready {
                    bundles: registered,
                })
            }
        }
    }

    fn build_bundle(&self, chunk: String, files: Vec<ManifestFile>) -> Result<Bundle> {
        let mut bundle = Bundle::new(chunk, Arc::clone(&self.config));
        for file in files {
            if self.config.ignore.is_ignored(&file.name) {
                trace!("Ignoring {} in bundle {}", file.name, bundle.name());
                continue;
            }
            let url = self
                .urls
                .url(&self.config.static_path(&file.name))
                .map_err(CartographerError::StaticUrl)?;
            bundle.register_asset(Asset::new(file.name, url).with_metadata(file.extra))?;
        }
        Ok(bundle)
    }
}
