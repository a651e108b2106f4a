//! Store provisioning
//!
//! Turns a parsed [`StoreConfig`] into a running store: registers the
//! built-in engines, allocates a fresh working directory, initializes a
//! manager there, registers the configuration, opens the named store, and
//! runs the baseline knowledge pass. Any failure before the store is open
//! aborts provisioning with no handle returned; the working directory is
//! cleaned up when the temporary directory is dropped.

use std::sync::Arc;

use tracing::{info, warn};

use crate::bootstrap::{default_baseline, BootstrapLoader, BootstrapReport, BundledResolver,
                       DocumentRef, DocumentResolver};
use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::store::{register_builtin_engines, StoreHandle, StoreManager};

/// Result of a successful provisioning pass
#[derive(Debug)]
pub struct Provisioned {
    /// The live, queryable store
    pub handle: StoreHandle,
    /// The manager owning the working directory; register it with a
    /// [`crate::lifecycle::LifecycleManager`] for teardown
    pub manager: StoreManager,
    /// Outcome of the baseline knowledge pass
    pub bootstrap: BootstrapReport,
}

/// Provisions managed store instances from configurations
pub struct Provisioner {
    resolver: Arc<dyn DocumentResolver>,
    baseline: Vec<DocumentRef>,
}

impl Provisioner {
    /// Provisioner with a custom document resolver and baseline list
    pub fn new(resolver: Arc<dyn DocumentResolver>, baseline: Vec<DocumentRef>) -> Self {
        Provisioner { resolver, baseline }
    }

    /// Provisioner loading the vocabulary documents shipped with the crate
    pub fn bundled() -> Self {
        Provisioner::new(Arc::new(BundledResolver), default_baseline())
    }

    /// Provisioner that loads no baseline knowledge
    pub fn bare() -> Self {
        Provisioner::new(Arc::new(crate::bootstrap::NullResolver), Vec::new())
    }

    /// Create a managed store instance from a configuration
    pub fn provision(&self, config: StoreConfig) -> StoreResult<Provisioned> {
        // Safe to call on every provisioning pass
        register_builtin_engines();

        let temp = tempfile::Builder::new()
            .prefix("ontostore-")
            .tempdir()
            .map_err(|e| StoreError::WorkingDirectory { source: e })?;
        info!(path = %temp.path().display(), store = config.id(), "using working directory");

        let manager = StoreManager::with_temp_dir(temp);
        manager.initialize()?;

        let store_id = config.id().to_string();
        manager.add_store_config(config)?;
        let handle = manager.open_store(&store_id)?;

        let bootstrap =
            BootstrapLoader::new(self.resolver.clone()).load_baseline(&handle, &self.baseline);
        if !bootstrap.is_clean() {
            // Bootstrap failures are reported, not fatal: the store stays
            // open, partially enriched
            warn!(
                store = %store_id,
                failures = bootstrap.failures().len(),
                "baseline loading completed with failures"
            );
        }

        Ok(Provisioned { handle, manager, bootstrap })
    }
}

impl Default for Provisioner {
    fn default() -> Self {
        Self::bundled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigGraphLoader;
    use crate::store::ContextSet;

    #[test]
    fn test_provision_from_bundled_config() {
        let config = ConfigGraphLoader::load("memory.ttl").unwrap();
        let provisioned = Provisioner::bundled().provision(config).unwrap();

        assert_eq!(provisioned.handle.name(), "primary");
        assert!(provisioned.bootstrap.is_clean());
        assert!(provisioned.handle.len().unwrap() > 0);
        assert!(provisioned.manager.path().exists());

        provisioned.manager.shutdown().unwrap();
    }

    #[test]
    fn test_repeated_provisioning_is_safe() {
        // Two stores in sequence: engine registration must not raise a
        // duplicate error, and the working directories must not collide
        let first = Provisioner::bare()
            .provision(ConfigGraphLoader::load("memory.ttl").unwrap())
            .unwrap();
        let second = Provisioner::bare()
            .provision(ConfigGraphLoader::load("memory.ttl").unwrap())
            .unwrap();

        assert_ne!(first.manager.path(), second.manager.path());

        first.manager.shutdown().unwrap();
        // The second store is unaffected by the first shutdown
        assert!(second
            .handle
            .match_pattern(None, None, None, true, &ContextSet::all())
            .is_ok());
        second.manager.shutdown().unwrap();
    }

    #[test]
    fn test_unknown_engine_aborts_provisioning() {
        let config = StoreConfig::new("primary", "ontostore:NoSuchEngine");
        let err = Provisioner::bare().provision(config).unwrap_err();
        assert!(matches!(err, StoreError::Provisioning { .. }));
    }

    #[test]
    fn test_bare_provisioner_loads_nothing() {
        let config = ConfigGraphLoader::load("memory.ttl").unwrap();
        let provisioned = Provisioner::bare().provision(config).unwrap();
        assert!(provisioned.handle.is_empty().unwrap());
        assert!(provisioned.bootstrap.loaded().is_empty());
        provisioned.manager.shutdown().unwrap();
    }
}
