//! Process-wide bundle registry.
//!
//! Bundles are stored as `Arc<Bundle>` snapshots:
//! - Readers clone the `Arc` under a short read lock and never observe a
//!   bundle while it is being rebuilt
//! - Writers build the replacement outside the lock and swap it in with a
//!   single insert

use crate::error::{CartographerError, Result};
use crate::model::{Asset, Bundle, Origin};
use indexmap::{IndexMap, IndexSet};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Registry statistics
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RegistryStats {
    pub total_bundles: usize,
    pub total_assets: usize,
    pub by_origin: BTreeMap<Origin, usize>,
}

/// Thread-safe in-memory bundle registry
#[derive(Default)]
pub struct Registry {
    bundles: RwLock<IndexMap<String, Arc<Bundle>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    // Every mutation is a single insert or remove, so a poisoned map is
    // still consistent.
    fn read(&self) -> RwLockReadGuard<'_, IndexMap<String, Arc<Bundle>>> {
        self.bundles.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, IndexMap<String, Arc<Bundle>>> {
        self.bundles.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a bundle under its own name.
    ///
    /// Fails with `AlreadyRegisteredBundle` if the name is taken by a
    /// non-updatable bundle; an updatable bundle is replaced wholesale.
    pub fn register_bundle(&self, bundle: Bundle) -> Result<()> {
        let mut bundles = self.write();
        if let Some(existing) = bundles.get(bundle.name()) {
            if !existing.is_updatable() {
                return Err(CartographerError::AlreadyRegisteredBundle(
                    bundle.name().to_string(),
                ));
            }
        }
        bundles.insert(bundle.name().to_string(), Arc::new(bundle));
        Ok(())
    }

    pub fn bundle(&self, name: &str) -> Result<Arc<Bundle>> {
        self.read()
            .get(name)
            .cloned()
            .ok_or_else(|| CartographerError::NotRegisteredBundle(name.to_string()))
    }

    pub fn unregister_bundle(&self, name: &str) -> Result<Arc<Bundle>> {
        self.write()
            .shift_remove(name)
            .ok_or_else(|| CartographerError::NotRegisteredBundle(name.to_string()))
    }

    pub fn contains_bundle(&self, name: &str) -> bool {
        self.read().contains_key(name)
    }

    /// Add an asset to a registered bundle (copy-on-write).
    pub fn register_asset(&self, bundle_name: &str, asset: Asset) -> Result<()> {
        self.update_bundle(bundle_name, |bundle| bundle.register_asset(asset))
    }

    pub fn asset(&self, bundle_name: &str, asset_name: &str) -> Result<Asset> {
        self.bundle(bundle_name)?.asset(asset_name).cloned()
    }

    pub fn unregister_asset(&self, bundle_name: &str, asset_name: &str) -> Result<Asset> {
        self.update_bundle(bundle_name, |bundle| bundle.unregister_asset(asset_name))
    }

    fn update_bundle<T>(
        &self,
        name: &str,
        f: impl FnOnce(&mut Bundle) -> Result<T>,
    ) -> Result<T> {
        let mut bundles = self.write();
        let slot = bundles
            .get_mut(name)
            .ok_or_else(|| CartographerError::NotRegisteredBundle(name.to_string()))?;
        let mut next = (**slot).clone();
        let out = f(&mut next)?;
        *slot = Arc::new(next);
        Ok(out)
    }

    /// Registered bundle names, in registration order
    pub fn bundle_names(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    /// Snapshot of every registered bundle
    pub fn bundles(&self) -> Vec<Arc<Bundle>> {
        self.read().values().cloned().collect()
    }

    /// Distinct manifest paths backing updatable bundles
    pub fn updatable_sources(&self) -> Vec<PathBuf> {
        let sources: IndexSet<PathBuf> = self
            .read()
            .values()
            .filter(|b| b.is_updatable())
            .map(|b| b.source().to_path_buf())
            .collect();
        sources.into_iter().collect()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn stats(&self) -> RegistryStats {
        let bundles = self.read();

        let mut stats = RegistryStats {
            total_bundles: bundles.len(),
            ..Default::default()
        };
        for bundle in bundles.values() {
            stats.total_assets += bundle.len();
            *stats.by_origin.entry(bundle.origin()).or_default() += 1;
        }
        stats
    }
}
