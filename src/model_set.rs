//! Model set facade
//!
//! Ties the pieces together for a host model-management framework: load a
//! configuration resource, provision the store, own its lifecycle, and
//! front every read with the context-augmenting view. This is the "provide
//! the store instance" factory the host asks for; it takes no hidden
//! context beyond the configuration resolved at construction time.

use serde::Serialize;
use tracing::warn;

use crate::bootstrap::BootstrapReport;
use crate::config::{ConfigGraphLoader, StoreConfig};
use crate::error::StoreResult;
use crate::lifecycle::LifecycleManager;
use crate::provision::Provisioner;
use crate::query::StoreView;
use crate::store::StoreHandle;

/// Declared inferencing capability of the backing engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InferencingCapability {
    pub rdfs: bool,
    pub owl: bool,
}

impl InferencingCapability {
    /// Capability of the stores this crate provisions
    pub const fn rdfs_and_owl() -> Self {
        InferencingCapability { rdfs: true, owl: true }
    }
}

/// A provisioned model set: one running store behind an augmenting view
pub struct ModelSet {
    view: StoreView,
    lifecycle: LifecycleManager,
    bootstrap: BootstrapReport,
    capability: InferencingCapability,
}

impl ModelSet {
    /// Open a model set from a bundled configuration resource, loading the
    /// default baseline knowledge
    pub fn open(resource: &str) -> StoreResult<ModelSet> {
        Self::open_with(ConfigGraphLoader::load(resource)?, Provisioner::default())
    }

    /// Open a model set from an already resolved configuration
    pub fn open_with(config: StoreConfig, provisioner: Provisioner) -> StoreResult<ModelSet> {
        let provisioned = provisioner.provision(config)?;
        let lifecycle = LifecycleManager::new();
        lifecycle.register(provisioned.manager);
        Ok(ModelSet {
            view: StoreView::new(provisioned.handle),
            lifecycle,
            bootstrap: provisioned.bootstrap,
            capability: InferencingCapability::rdfs_and_owl(),
        })
    }

    /// The context-augmenting read view; all reads should go through it
    pub fn view(&self) -> &StoreView {
        &self.view
    }

    /// The raw store handle, for writers (assertions, inference output)
    pub fn handle(&self) -> &StoreHandle {
        self.view.handle()
    }

    /// Outcome of the baseline knowledge pass
    pub fn bootstrap_report(&self) -> &BootstrapReport {
        &self.bootstrap
    }

    /// Declared inferencing capability descriptor
    pub fn capability(&self) -> InferencingCapability {
        self.capability
    }

    /// Shut the model set down: close the store and remove the working
    /// directory. Idempotent.
    pub fn close(&self) -> StoreResult<()> {
        self.lifecycle.shutdown()
    }
}

impl Drop for ModelSet {
    fn drop(&mut self) {
        // Explicit close may already have run; shutdown is idempotent
        if let Err(e) = self.lifecycle.shutdown() {
            warn!(error = %e, "model set teardown failed");
        }
    }
}

impl std::fmt::Debug for ModelSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ModelSet {{ store: {:?}, registered: {} }}",
            self.handle().name(),
            self.lifecycle.is_registered()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ContextSet;
    use crate::term::{Statement, Term};

    /// Honor RUST_LOG in test runs; repeated calls are no-ops
    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    #[test]
    fn test_open_and_query_through_view() {
        init_tracing();
        let model_set = ModelSet::open("memory.ttl").unwrap();
        assert!(model_set.bootstrap_report().is_clean());

        // Baseline knowledge is visible without requesting inference
        let label = Term::uri("http://www.w3.org/2000/01/rdf-schema#label");
        assert!(model_set
            .view()
            .contains(None, Some(&label), None, false, &ContextSet::all())
            .unwrap());

        model_set.close().unwrap();
    }

    #[test]
    fn test_inference_is_additive_end_to_end() {
        init_tracing();
        let model_set = ModelSet::open("memory.ttl").unwrap();
        let asserted = Statement::new(
            Term::uri("http://ex.org/s1"),
            Term::uri("http://ex.org/p"),
            Term::uri("http://ex.org/o"),
        );
        let derived = Statement::new(
            Term::uri("http://ex.org/s2"),
            Term::uri("http://ex.org/p"),
            Term::uri("http://ex.org/o"),
        );
        model_set.handle().add(asserted).unwrap();
        model_set.handle().add_inferred(derived, None).unwrap();

        let p = Term::uri("http://ex.org/p");
        let with_inference = model_set
            .view()
            .match_pattern(None, Some(&p), None, true, &ContextSet::all())
            .unwrap();
        assert_eq!(with_inference.len(), 2);

        let without = model_set
            .view()
            .match_pattern(None, Some(&p), None, false, &ContextSet::all())
            .unwrap();
        assert_eq!(without.len(), 1);

        model_set.close().unwrap();
    }

    #[test]
    fn test_close_is_idempotent_and_invalidates_reads() {
        let model_set = ModelSet::open("memory.ttl").unwrap();
        model_set.close().unwrap();
        model_set.close().unwrap();

        let err = model_set
            .view()
            .match_pattern(None, None, None, true, &ContextSet::all())
            .unwrap_err();
        assert!(err.is_closed());
    }

    #[test]
    fn test_capability_descriptor() {
        let capability = InferencingCapability::rdfs_and_owl();
        assert!(capability.rdfs);
        assert!(capability.owl);
    }
}
