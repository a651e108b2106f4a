//! ontostore - embedded RDF triple store provisioning with
//! inference-partitioned querying
//!
//! # Architecture
//!
//! The crate provisions, configures, and fronts an embedded statement store
//! whose inference output lives in separate partitions ("contexts") from
//! directly asserted facts:
//!
//! - [`config::ConfigGraphLoader`] - parses a bundled configuration graph
//!   and materializes a typed [`config::StoreConfig`]
//! - [`provision::Provisioner`] - creates a managed store instance under a
//!   private working directory and runs the baseline knowledge pass
//! - [`bootstrap::BootstrapLoader`] - best-effort loading of baseline
//!   ontology documents, one scoped transaction per document
//! - [`query::StoreView`] - rewrites every read so inference-inclusive
//!   requests transparently cover the asserted partition
//! - [`lifecycle::LifecycleManager`] - single-slot, idempotent teardown
//!
//! # Example
//!
//! ```rust
//! use ontostore::{ContextSet, ModelSet, Statement, Term};
//!
//! let model_set = ModelSet::open("memory.ttl")?;
//!
//! model_set.handle().add(Statement::new(
//!     Term::uri("http://example.org/socrates"),
//!     Term::uri("http://www.w3.org/1999/02/22-rdf-syntax-ns#type"),
//!     Term::uri("http://example.org/Human"),
//! ))?;
//!
//! // Reads go through the view; inferred results implicitly include
//! // asserted facts
//! let subject = Term::uri("http://example.org/socrates");
//! let quads = model_set.view().match_pattern(
//!     Some(&subject), None, None,
//!     true,
//!     &ContextSet::all(),
//! )?;
//! assert_eq!(quads.len(), 1);
//!
//! model_set.close()?;
//! # Ok::<(), ontostore::StoreError>(())
//! ```

pub mod error;
pub mod term;
pub mod parser;
pub mod store;
pub mod config;
pub mod bootstrap;
pub mod provision;
pub mod query;
pub mod lifecycle;
mod model_set;

// Re-export core types
pub use error::{StoreError, StoreResult};
pub use term::{Bindings, Datatype, Literal, Statement, Term, Uri, Variable};
pub use parser::{parse, ParseError, ParserState};
pub use store::{
    register_builtin_engines, Context, ContextSet, EngineFactory, EngineRegistry, Graph,
    MemoryStore, Quad, StoreBackend, StoreHandle, StoreManager, Transaction, MEMORY_ENGINE_TYPE,
};
pub use config::{ConfigGraphLoader, StoreConfig};
pub use bootstrap::{
    default_baseline, BootstrapLoader, BootstrapReport, BundledResolver, DirResolver,
    DocumentRef, DocumentResolver, NullResolver,
};
pub use provision::{Provisioned, Provisioner};
pub use query::{augment_contexts, StoreView};
pub use lifecycle::LifecycleManager;
pub use model_set::{InferencingCapability, ModelSet};
