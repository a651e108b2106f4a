//! Context-partitioned statement store
//!
//! Statements live in logical partitions called contexts. The distinguished
//! "asserted" partition (context = `None`) is the only one direct assertions
//! are written to; an inference engine populates named partitions with
//! derived statements through the [`StoreBackend::add_inferred`] seam.
//!
//! The module provides:
//! - [`Context`] / [`ContextSet`] - read-scope selection
//! - [`Quad`] - a statement tagged with its partition
//! - [`Graph`] - the triple container backing one partition
//! - [`StoreBackend`] / [`MemoryStore`] - the engine seam and the built-in
//!   in-memory engine
//! - [`EngineRegistry`] - process-wide idempotent factory registration
//! - [`StoreManager`] / [`StoreHandle`] - lifecycle and access to named
//!   store instances inside one working directory

use std::fmt;

use crate::term::{Statement, Uri};

mod graph;
mod engine;
mod registry;
mod handle;
mod manager;

pub use graph::Graph;
pub use engine::{MemoryStore, MemoryStoreFactory, StoreBackend, MEMORY_ENGINE_TYPE};
pub use registry::{registry, register_builtin_engines, EngineFactory, EngineRegistry};
pub use handle::{StoreHandle, Transaction};
pub use manager::StoreManager;

/// A logical partition identifier. `None` denotes the asserted partition;
/// any other value denotes a named (e.g. inferred) partition.
pub type Context = Option<Uri>;

/// A statement tagged with the partition it was read from
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Quad {
    pub statement: Statement,
    pub context: Context,
}

impl Quad {
    /// Create a quad in the asserted partition
    pub fn asserted(statement: Statement) -> Self {
        Quad { statement, context: None }
    }

    /// Create a quad in a named partition
    pub fn in_context(statement: Statement, context: Uri) -> Self {
        Quad { statement, context: Some(context) }
    }

    /// Check if this quad belongs to the asserted partition
    pub fn is_asserted(&self) -> bool {
        self.context.is_none()
    }
}

impl fmt::Debug for Quad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.context {
            Some(c) => write!(
                f,
                "{:?} {:?} {:?} {:?} .",
                self.statement.subject, self.statement.predicate, self.statement.object, c
            ),
            None => write!(f, "{:?}", self.statement),
        }
    }
}

/// The caller-supplied list of contexts a read is restricted to.
///
/// An empty set means "unrestricted". Insertion order is preserved and
/// duplicates are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextSet {
    contexts: Vec<Context>,
}

impl ContextSet {
    /// The unrestricted (empty) context set
    pub fn all() -> Self {
        Self::default()
    }

    /// A set containing only the asserted partition
    pub fn asserted() -> Self {
        let mut set = Self::default();
        set.push(None);
        set
    }

    /// A set containing a single named partition
    pub fn named(context: impl Into<Uri>) -> Self {
        let mut set = Self::default();
        set.push(Some(context.into()));
        set
    }

    /// Build a set from contexts, dropping duplicates
    pub fn of(contexts: impl IntoIterator<Item = Context>) -> Self {
        let mut set = Self::default();
        for context in contexts {
            set.push(context);
        }
        set
    }

    /// Check if this set is unrestricted (empty)
    pub fn is_unrestricted(&self) -> bool {
        self.contexts.is_empty()
    }

    /// Check if the set contains the given context
    pub fn contains(&self, context: &Context) -> bool {
        self.contexts.contains(context)
    }

    /// Check if the set contains the asserted partition
    pub fn contains_asserted(&self) -> bool {
        self.contains(&None)
    }

    /// Append a context unless already present
    pub fn push(&mut self, context: Context) {
        if !self.contains(&context) {
            self.contexts.push(context);
        }
    }

    /// Iterate over the contexts in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Context> {
        self.contexts.iter()
    }

    /// Number of contexts in the set
    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    /// Check if the set is empty (equivalent to unrestricted)
    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }
}

impl fmt::Display for ContextSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, context) in self.contexts.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match context {
                None => write!(f, "null")?,
                Some(uri) => write!(f, "{}", uri)?,
            }
        }
        write!(f, "]")
    }
}

impl FromIterator<Context> for ContextSet {
    fn from_iter<I: IntoIterator<Item = Context>>(iter: I) -> Self {
        Self::of(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::Term;

    #[test]
    fn test_context_set_dedupe() {
        let mut set = ContextSet::all();
        set.push(None);
        set.push(Some(Uri::from("http://ex.org/inferred")));
        set.push(None);
        set.push(Some(Uri::from("http://ex.org/inferred")));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_context_set_unrestricted() {
        let set = ContextSet::all();
        assert!(set.is_unrestricted());
        assert!(!set.contains_asserted());
    }

    #[test]
    fn test_context_set_display() {
        let set = ContextSet::of([None, Some(Uri::from("http://ex.org/g"))]);
        assert_eq!(set.to_string(), "[null, <http://ex.org/g>]");
        assert_eq!(ContextSet::all().to_string(), "[]");
    }

    #[test]
    fn test_quad_partition() {
        let statement = Statement::new(
            Term::uri("http://ex.org/s"),
            Term::uri("http://ex.org/p"),
            Term::uri("http://ex.org/o"),
        );
        assert!(Quad::asserted(statement.clone()).is_asserted());
        assert!(!Quad::in_context(statement, Uri::from("http://ex.org/g")).is_asserted());
    }
}
