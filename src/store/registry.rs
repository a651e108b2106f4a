//! Process-wide engine factory registry
//!
//! Factories are registered under their engine type identifier. Registration
//! is idempotent and safe to race: re-registering a type replaces the
//! previous factory (last writer wins) and is never an error, so repeated
//! provisioning across multiple model sets is safe.

use std::sync::{Arc, OnceLock, RwLock};

use indexmap::IndexMap;

use crate::config::StoreConfig;
use crate::error::StoreResult;

use super::engine::{MemoryStoreFactory, StoreBackend};

/// Creates store engine instances for one engine type
pub trait EngineFactory: Send + Sync {
    /// The engine type identifier this factory handles
    fn engine_type(&self) -> &str;

    /// Instantiate an engine from a configuration
    fn create(&self, config: &StoreConfig) -> StoreResult<Box<dyn StoreBackend>>;
}

/// Registry of engine factories keyed by engine type
#[derive(Default)]
pub struct EngineRegistry {
    factories: RwLock<IndexMap<String, Arc<dyn EngineFactory>>>,
}

impl EngineRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory. Replaces any factory already registered for the
    /// same engine type; never fails.
    pub fn register(&self, factory: Arc<dyn EngineFactory>) {
        let mut factories = self.factories.write().unwrap_or_else(|e| e.into_inner());
        factories.insert(factory.engine_type().to_string(), factory);
    }

    /// Look up the factory for an engine type
    pub fn get(&self, engine_type: &str) -> Option<Arc<dyn EngineFactory>> {
        let factories = self.factories.read().unwrap_or_else(|e| e.into_inner());
        factories.get(engine_type).cloned()
    }

    /// Check if a factory is registered for an engine type
    pub fn is_registered(&self, engine_type: &str) -> bool {
        let factories = self.factories.read().unwrap_or_else(|e| e.into_inner());
        factories.contains_key(engine_type)
    }

    /// Registered engine types, in registration order
    pub fn engine_types(&self) -> Vec<String> {
        let factories = self.factories.read().unwrap_or_else(|e| e.into_inner());
        factories.keys().cloned().collect()
    }
}

/// The process-wide registry instance
pub fn registry() -> &'static EngineRegistry {
    static REGISTRY: OnceLock<EngineRegistry> = OnceLock::new();
    REGISTRY.get_or_init(EngineRegistry::new)
}

/// Register the engines shipped with this crate. Idempotent.
pub fn register_builtin_engines() {
    registry().register(Arc::new(MemoryStoreFactory));
}
