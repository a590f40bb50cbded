use super::{Asset, Origin};
use crate::config::SourceConfig;
use crate::error::{CartographerError, Result};
use indexmap::IndexMap;
use std::path::Path;
use std::sync::Arc;

/// A named build output unit (a webpack "chunk") and its emitted files.
///
/// The bundle composes two separate structures: the immutable configuration
/// snapshot of the group that produced it, and the ordered asset map.
#[derive(Debug, Clone, PartialEq)]
pub struct Bundle {
    name: String,
    config: Arc<SourceConfig>,
    assets: IndexMap<String, Asset>,
}

impl Bundle {
    pub fn new(name: impl Into<String>, config: Arc<SourceConfig>) -> Self {
        Self {
            name: name.into(),
            config,
            assets: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn origin(&self) -> Origin {
        self.config.origin
    }

    pub fn is_updatable(&self) -> bool {
        self.origin().is_updatable()
    }

    pub fn config(&self) -> &Arc<SourceConfig> {
        &self.config
    }

    /// Manifest file (or directory) backing this bundle
    pub fn source(&self) -> &Path {
        &self.config.source
    }

    pub fn tag_template(&self, extension: &str) -> Option<&str> {
        self.config.tag_templates.get(extension).map(String::as_str)
    }

    /// Add an asset.
    ///
    /// Non-updatable bundles reject a name that is already present;
    /// updatable bundles replace the previous entry in place.
    pub fn register_asset(&mut self, asset: Asset) -> Result<()> {
        if !self.is_updatable() && self.assets.contains_key(&asset.name) {
            return Err(CartographerError::AlreadyRegisteredAsset(asset.name));
        }
        self.assets.insert(asset.name.clone(), asset);
        Ok(())
    }

    pub fn asset(&self, name: &str) -> Result<&Asset> {
        self.assets
            .get(name)
            .ok_or_else(|| CartographerError::NotRegisteredAsset(name.to_string()))
    }

    pub fn unregister_asset(&mut self, name: &str) -> Result<Asset> {
        self.assets
            .shift_remove(name)
            .ok_or_else(|| CartographerError::NotRegisteredAsset(name.to_string()))
    }

    pub fn contains_asset(&self, name: &str) -> bool {
        self.assets.contains_key(name)
    }

    /// Assets in registration order
    pub fn assets(&self) -> impl Iterator<Item = &Asset> {
        self.assets.values()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Assets whose name ends with any of `kinds`, in registration order.
    ///
    /// An empty `kinds` slice behaves like a single empty suffix and matches
    /// every asset. Each asset is yielded at most once.
    pub fn filter_assets<'a, S: AsRef<str>>(
        &'a self,
        kinds: &'a [S],
    ) -> impl Iterator<Item = &'a Asset> + 'a {
        self.assets.values().filter(move |asset| {
            kinds.is_empty() || kinds.iter().any(|k| asset.name.ends_with(k.as_ref()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundle(origin: Origin) -> Bundle {
        let config = SourceConfig::defaults(origin, "main").unwrap();
        Bundle::new("main", Arc::new(config))
    }

    #[test]
    fn test_duplicate_asset_rejected_when_not_updatable() {
        let mut b = bundle(Origin::Directory);
        b.register_asset(Asset::new("app.js", "/a")).unwrap();

        let err = b.register_asset(Asset::new("app.js", "/b")).unwrap_err();
        assert!(matches!(err, CartographerError::AlreadyRegisteredAsset(ref n) if n == "app.js"));
        assert_eq!(b.asset("app.js").unwrap().url, "/a");
    }

    #[test]
    fn test_duplicate_asset_replaced_when_updatable() {
        let mut b = bundle(Origin::Webpack);
        b.register_asset(Asset::new("app.js", "/a")).unwrap();
        b.register_asset(Asset::new("app.js", "/b")).unwrap();

        assert_eq!(b.len(), 1);
        assert_eq!(b.asset("app.js").unwrap().url, "/b");
    }

    #[test]
    fn test_missing_asset() {
        let mut b = bundle(Origin::Webpack);
        assert!(matches!(
            b.asset("nope.js"),
            Err(CartographerError::NotRegisteredAsset(ref n)) if n == "nope.js"
        ));
        assert!(matches!(
            b.unregister_asset("nope.js"),
            Err(CartographerError::NotRegisteredAsset(_))
        ));
    }

    #[test]
    fn test_unregister_keeps_order() {
        let mut b = bundle(Origin::Webpack);
        for name in ["a.js", "b.css", "c.js"] {
            b.register_asset(Asset::new(name, name)).unwrap();
        }
        b.unregister_asset("b.css").unwrap();

        let names: Vec<_> = b.assets().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["a.js", "c.js"]);
    }

    #[test]
    fn test_filter_assets() {
        let mut b = bundle(Origin::Webpack);
        for name in ["vendor.js", "app.css", "app.js"] {
            b.register_asset(Asset::new(name, name)).unwrap();
        }

        let all: Vec<_> = b.filter_assets::<&str>(&[]).map(|a| a.name.as_str()).collect();
        assert_eq!(all, ["vendor.js", "app.css", "app.js"]);

        let js: Vec<_> = b.filter_assets(&["js"]).map(|a| a.name.as_str()).collect();
        assert_eq!(js, ["vendor.js", "app.js"]);

        // overlapping suffixes still yield each asset once, in bundle order
        let both: Vec<_> = b
            .filter_assets(&["css", "js", ".js"])
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(both, ["vendor.js", "app.css", "app.js"]);

        let empty_suffix: Vec<_> = b.filter_assets(&[""]).collect();
        assert_eq!(empty_suffix.len(), 3);
    }
}
