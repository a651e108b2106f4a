//! Store engine seam and the built-in in-memory engine
//!
//! A [`StoreBackend`] keeps asserted and inferred statements in separate
//! partitions and answers reads scoped by a context list and an
//! inference-inclusion flag. Context semantics at this level:
//!
//! - an empty [`ContextSet`] always covers the asserted partition and covers
//!   the named partitions only when `include_inferred` is set
//! - a non-empty set covers exactly the listed partitions
//!
//! The query-layer rewrite that makes "inferred" implicitly include
//! "asserted" happens above this seam, in [`crate::query::StoreView`].

use indexmap::IndexMap;

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::term::{Bindings, Statement, Term, Uri};

use super::graph::{conjunctive_query, Graph};
use super::registry::EngineFactory;
use super::{ContextSet, Quad};

/// Engine type identifier of the built-in in-memory engine
pub const MEMORY_ENGINE_TYPE: &str = "ontostore:MemoryStore";

/// Default partition the in-memory engine offers to inference output
const DEFAULT_INFERRED_CONTEXT: &str = "urn:ontostore:inferred";

/// A context-partitioned statement storage engine
pub trait StoreBackend: Send + Sync {
    /// Add a statement to the asserted partition
    fn add(&mut self, statement: Statement) -> StoreResult<()>;

    /// Add a derived statement to a named partition. This is the seam an
    /// inference engine populates; nothing else writes named partitions.
    fn add_inferred(&mut self, statement: Statement, context: &Uri) -> StoreResult<()>;

    /// The partition this engine offers to inference output by default
    fn default_inferred_context(&self) -> &Uri;

    /// Match statements against optional term filters within the read scope
    fn match_pattern(
        &self,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
        include_inferred: bool,
        contexts: &ContextSet,
    ) -> StoreResult<Vec<Quad>>;

    /// Check whether any statement matches within the read scope
    fn contains(
        &self,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
        include_inferred: bool,
        contexts: &ContextSet,
    ) -> StoreResult<bool>;

    /// Evaluate a conjunctive pattern query within the read scope
    fn query(
        &self,
        patterns: &[Statement],
        include_inferred: bool,
        contexts: &ContextSet,
    ) -> StoreResult<Vec<Bindings>>;

    /// Total statement count across all partitions
    fn len(&self) -> usize;

    /// Check if the engine holds no statements
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The built-in in-memory engine: one asserted graph plus named partitions
pub struct MemoryStore {
    asserted: Graph,
    named: IndexMap<Uri, Graph>,
    inferred_context: Uri,
}

impl MemoryStore {
    /// Create an empty engine with the default inferred partition
    pub fn new() -> Self {
        MemoryStore {
            asserted: Graph::new(),
            named: IndexMap::new(),
            inferred_context: Uri::from(DEFAULT_INFERRED_CONTEXT),
        }
    }

    /// Create an engine from configuration parameters. Recognized keys:
    /// `inferredContext` - the partition offered to inference output.
    pub fn from_config(config: &StoreConfig) -> Self {
        let inferred_context = config
            .param("inferredContext")
            .map(Uri::from)
            .unwrap_or_else(|| Uri::from(DEFAULT_INFERRED_CONTEXT));
        MemoryStore {
            asserted: Graph::new(),
            named: IndexMap::new(),
            inferred_context,
        }
    }

    /// Resolve the read scope to the covered partitions, in scope order
    fn scope<'a>(
        &'a self,
        include_inferred: bool,
        contexts: &'a ContextSet,
    ) -> Vec<(Option<&'a Uri>, &'a Graph)> {
        let mut graphs = Vec::new();
        if contexts.is_unrestricted() {
            graphs.push((None, &self.asserted));
            if include_inferred {
                for (name, graph) in &self.named {
                    graphs.push((Some(name), graph));
                }
            }
        } else {
            for context in contexts.iter() {
                match context {
                    None => graphs.push((None, &self.asserted)),
                    Some(name) => {
                        if let Some(graph) = self.named.get(name) {
                            graphs.push((Some(name), graph));
                        }
                    }
                }
            }
        }
        graphs
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreBackend for MemoryStore {
    fn add(&mut self, statement: Statement) -> StoreResult<()> {
        self.asserted.add(statement);
        Ok(())
    }

    fn add_inferred(&mut self, statement: Statement, context: &Uri) -> StoreResult<()> {
        self.named.entry(context.clone()).or_default().add(statement);
        Ok(())
    }

    fn default_inferred_context(&self) -> &Uri {
        &self.inferred_context
    }

    fn match_pattern(
        &self,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
        include_inferred: bool,
        contexts: &ContextSet,
    ) -> StoreResult<Vec<Quad>> {
        let mut results = Vec::new();
        for (name, graph) in self.scope(include_inferred, contexts) {
            for statement in graph.match_pattern(subject, predicate, object) {
                results.push(Quad {
                    statement: statement.clone(),
                    context: name.cloned(),
                });
            }
        }
        Ok(results)
    }

    fn contains(
        &self,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
        include_inferred: bool,
        contexts: &ContextSet,
    ) -> StoreResult<bool> {
        Ok(self
            .scope(include_inferred, contexts)
            .iter()
            .any(|(_, graph)| graph.any_match(subject, predicate, object)))
    }

    fn query(
        &self,
        patterns: &[Statement],
        include_inferred: bool,
        contexts: &ContextSet,
    ) -> StoreResult<Vec<Bindings>> {
        let statements: Vec<&Statement> = self
            .scope(include_inferred, contexts)
            .into_iter()
            .flat_map(|(_, graph)| graph.iter())
            .collect();
        Ok(conjunctive_query(&statements, patterns))
    }

    fn len(&self) -> usize {
        self.asserted.len() + self.named.values().map(Graph::len).sum::<usize>()
    }
}

/// Factory producing [`MemoryStore`] engines
#[derive(Debug, Default)]
pub struct MemoryStoreFactory;

impl EngineFactory for MemoryStoreFactory {
    fn engine_type(&self) -> &str {
        MEMORY_ENGINE_TYPE
    }

    fn create(&self, config: &StoreConfig) -> StoreResult<Box<dyn StoreBackend>> {
        if config.engine_type() != MEMORY_ENGINE_TYPE {
            return Err(StoreError::Provisioning {
                reason: format!(
                    "factory '{}' cannot create engine '{}'",
                    MEMORY_ENGINE_TYPE,
                    config.engine_type()
                ),
            });
        }
        Ok(Box::new(MemoryStore::from_config(config)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statement(s: &str, p: &str, o: &str) -> Statement {
        Statement::new(Term::uri(s), Term::uri(p), Term::uri(o))
    }

    fn inferred() -> Uri {
        Uri::from(DEFAULT_INFERRED_CONTEXT)
    }

    fn populated() -> MemoryStore {
        let mut store = MemoryStore::new();
        store
            .add(statement("http://ex.org/s1", "http://ex.org/p", "http://ex.org/o1"))
            .unwrap();
        store
            .add_inferred(
                statement("http://ex.org/s2", "http://ex.org/p", "http://ex.org/o2"),
                &inferred(),
            )
            .unwrap();
        store
    }

    #[test]
    fn test_unrestricted_scope_respects_inference_flag() {
        let store = populated();

        // include_inferred with an empty set covers everything
        let all = store
            .match_pattern(None, None, None, true, &ContextSet::all())
            .unwrap();
        assert_eq!(all.len(), 2);

        // without the flag, only the asserted partition is visible
        let asserted = store
            .match_pattern(None, None, None, false, &ContextSet::all())
            .unwrap();
        assert_eq!(asserted.len(), 1);
        assert!(asserted[0].is_asserted());
    }

    #[test]
    fn test_explicit_contexts_cover_exactly_the_listed_partitions() {
        let store = populated();

        let named_only = store
            .match_pattern(None, None, None, true, &ContextSet::named(inferred()))
            .unwrap();
        assert_eq!(named_only.len(), 1);
        assert!(!named_only[0].is_asserted());

        let both = store
            .match_pattern(
                None,
                None,
                None,
                true,
                &ContextSet::of([Some(inferred()), None]),
            )
            .unwrap();
        assert_eq!(both.len(), 2);
    }

    #[test]
    fn test_contains() {
        let store = populated();
        let s2 = Term::uri("http://ex.org/s2");

        assert!(store
            .contains(Some(&s2), None, None, true, &ContextSet::all())
            .unwrap());
        // s2 lives only in the inferred partition
        assert!(!store
            .contains(Some(&s2), None, None, false, &ContextSet::all())
            .unwrap());
    }

    #[test]
    fn test_query_across_partitions() {
        let store = populated();
        let pattern = Statement::new(Term::var("s"), Term::uri("http://ex.org/p"), Term::var("o"));

        let all = store.query(&[pattern.clone()], true, &ContextSet::all()).unwrap();
        assert_eq!(all.len(), 2);

        let asserted = store.query(&[pattern], false, &ContextSet::all()).unwrap();
        assert_eq!(asserted.len(), 1);
    }

    #[test]
    fn test_factory_rejects_foreign_engine_type() {
        let config = StoreConfig::new("primary", "other:Engine");
        assert!(MemoryStoreFactory.create(&config).is_err());
    }

    #[test]
    fn test_inferred_context_from_config() {
        let config = StoreConfig::new("primary", MEMORY_ENGINE_TYPE)
            .with_param("inferredContext", "urn:custom:inferred");
        let store = MemoryStore::from_config(&config);
        assert_eq!(
            store.default_inferred_context().as_str(),
            "urn:custom:inferred"
        );
    }
}
