//! Cartographer orchestrator.
//!
//! Owns the shared registry, one [`ManifestSource`] per configured bundle
//! group, and the collaborators. Startup parses every source once
//! (`autodiscover`); afterwards only updatable sources are re-parsed
//! (`rediscover`), normally from the watcher.

use crate::config::CartographerConfig;
use crate::error::Result;
use crate::manifest::{ManifestSource, ParseOutcome};
use crate::registry::Registry;
use crate::static_url::PrefixUrlResolver;
use crate::tags::TagResolver;
use crate::template::MiniJinjaRenderer;
use cartographer_api::{StaticUrlResolver, TemplateRenderer};
use indexmap::IndexSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

mod watch;

pub use watch::WatchHandle;

/// Quiet period after the last filesystem event before re-parsing
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Outcome of re-parsing one source
#[derive(Debug)]
pub struct SourceReport {
    pub bundle: String,
    pub source: PathBuf,
    pub result: Result<ParseOutcome>,
}

pub struct Cartographer {
    registry: Arc<Registry>,
    sources: Vec<ManifestSource>,
    tags: TagResolver,
    debounce: Duration,

    /// Cancellation token for the watcher task
    cancel_token: CancellationToken,
}

pub struct CartographerBuilder {
    config: CartographerConfig,
    registry: Option<Arc<Registry>>,
    renderer: Option<Arc<dyn TemplateRenderer>>,
    urls: Option<Arc<dyn StaticUrlResolver>>,
    debounce: Duration,
}

impl CartographerBuilder {
    pub fn new(config: CartographerConfig) -> Self {
        Self {
            config,
            registry: None,
            renderer: None,
            urls: None,
            debounce: DEFAULT_DEBOUNCE,
        }
    }

    pub fn with_registry(mut self, registry: Arc<Registry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn TemplateRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn with_url_resolver(mut self, urls: Arc<dyn StaticUrlResolver>) -> Self {
        self.urls = Some(urls);
        self
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Merge the configuration into per-group sources.
    ///
    /// Configuration errors are fatal here, before any manifest is read.
    pub fn build(self) -> Result<Cartographer> {
        let registry = self.registry.unwrap_or_default();
        let renderer = self
            .renderer
            .unwrap_or_else(|| Arc::new(MiniJinjaRenderer::new()));
        let urls = self
            .urls
            .unwrap_or_else(|| Arc::new(PrefixUrlResolver::default()));

        if self.config.is_empty() {
            warn!("No bundle groups configured");
        }

        let sources = self
            .config
            .sources()?
            .into_iter()
            .map(|config| ManifestSource::new(config, Arc::clone(&registry), Arc::clone(&urls)))
            .collect();

        Ok(Cartographer {
            tags: TagResolver::new(Arc::clone(&registry), renderer),
            registry,
            sources,
            debounce: self.debounce,
            cancel_token: CancellationToken::new(),
        })
    }
}

impl Drop for Cartographer {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}

impl Cartographer {
    pub fn builder(config: CartographerConfig) -> CartographerBuilder {
        CartographerBuilder::new(config)
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn tags(&self) -> &TagResolver {
        &self.tags
    }

    pub fn sources(&self) -> &[ManifestSource] {
        &self.sources
    }

    /// Parse every configured source once, in declaration order.
    ///
    /// Stops at the first failure: at startup a broken manifest or a
    /// conflicting registration is reported to the caller, not skipped.
    pub fn autodiscover(&self) -> Result<Vec<ParseOutcome>> {
        let mut outcomes = Vec::with_capacity(self.sources.len());
        for source in &self.sources {
            let outcome = source.parse()?;
            if outcome == ParseOutcome::Compiling {
                info!(
                    "Bundle {} not ready yet ({} is compiling)",
                    source.name(),
                    source.path().display()
                );
            }
            outcomes.push(outcome);
        }
        info!("Registry initialized: {} bundles", self.registry.len());
        Ok(outcomes)
    }

    /// Re-parse every updatable source.
    ///
    /// Best effort: a failing source is logged and reported, the others are
    /// still refreshed.
    pub fn rediscover(&self) -> Vec<SourceReport> {
        self.sources
            .iter()
            .filter(|source| source.is_updatable())
            .map(|source| {
                let result = source.parse();
                match &result {
                    Ok(outcome) => {
                        debug!("Rediscovered {}: {:?}", source.name(), outcome)
                    }
                    Err(e) if e.is_transient() => {
                        warn!("Failed to refresh bundle {}: {}", source.name(), e)
                    }
                    Err(e) => error!("Failed to refresh bundle {}: {}", source.name(), e),
                }
                SourceReport {
                    bundle: source.name().to_string(),
                    source: source.path().to_path_buf(),
                    result,
                }
            })
            .collect()
    }

    /// Paths the watcher subscribes to.
    ///
    /// The registry's updatable sources, plus the manifests of updatable
    /// groups that have not registered anything yet (still compiling at
    /// startup), so their first successful build is picked up.
    pub fn watch_paths(&self) -> Vec<PathBuf> {
        let mut paths: IndexSet<PathBuf> = self.registry.updatable_sources().into_iter().collect();
        for source in self.sources.iter().filter(|s| s.is_updatable()) {
            paths.insert(source.path().to_path_buf());
        }
        paths.into_iter().collect()
    }

    /// Render the tags of a bundle, see [`TagResolver::render_bundle`].
    pub fn render_bundle<S: AsRef<str>>(
        &self,
        bundle_name: &str,
        kinds: Option<&[S]>,
    ) -> Result<String> {
        self.tags.render_bundle(bundle_name, kinds)
    }
}
