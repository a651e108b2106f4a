//! Live store instance handle
//!
//! A `StoreHandle` is a cheaply cloneable reference to one running store
//! engine. All access is gated by a closed flag: after the owning manager
//! shuts down, every operation fails with a closed-store error instead of
//! touching the engine. In-flight reads may fail but never deadlock, since
//! the flag is checked without taking the engine lock.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, RwLockWriteGuard};

use crate::error::{StoreError, StoreResult};
use crate::term::{Bindings, Statement, Term, Uri};

use super::engine::StoreBackend;
use super::{ContextSet, Quad};

struct StoreState {
    name: String,
    closed: AtomicBool,
    backend: RwLock<Box<dyn StoreBackend>>,
}

/// Handle to a live, queryable store instance
#[derive(Clone)]
pub struct StoreHandle {
    state: Arc<StoreState>,
}

impl StoreHandle {
    pub(crate) fn new(name: impl Into<String>, backend: Box<dyn StoreBackend>) -> Self {
        StoreHandle {
            state: Arc::new(StoreState {
                name: name.into(),
                closed: AtomicBool::new(false),
                backend: RwLock::new(backend),
            }),
        }
    }

    /// The logical name this store was registered under
    pub fn name(&self) -> &str {
        &self.state.name
    }

    /// Check if this store has been shut down
    pub fn is_closed(&self) -> bool {
        self.state.closed.load(Ordering::Acquire)
    }

    /// Mark the store closed. Subsequent operations fail with
    /// [`StoreError::ClosedStore`].
    pub(crate) fn close(&self) {
        self.state.closed.store(true, Ordering::Release);
    }

    fn ensure_open(&self) -> StoreResult<()> {
        if self.is_closed() {
            Err(StoreError::ClosedStore {
                store: self.state.name.clone(),
            })
        } else {
            Ok(())
        }
    }

    /// Add a statement to the asserted partition
    pub fn add(&self, statement: Statement) -> StoreResult<()> {
        self.ensure_open()?;
        let mut backend = self.state.backend.write().unwrap_or_else(|e| e.into_inner());
        backend.add(statement)
    }

    /// Add a derived statement to a named partition. `context = None` uses
    /// the engine's default inferred partition. This is the seam an
    /// inference engine populates; the query layer never writes.
    pub fn add_inferred(&self, statement: Statement, context: Option<&Uri>) -> StoreResult<()> {
        self.ensure_open()?;
        let mut backend = self.state.backend.write().unwrap_or_else(|e| e.into_inner());
        let context = context
            .cloned()
            .unwrap_or_else(|| backend.default_inferred_context().clone());
        backend.add_inferred(statement, &context)
    }

    /// The partition the engine offers to inference output
    pub fn default_inferred_context(&self) -> StoreResult<Uri> {
        self.ensure_open()?;
        let backend = self.state.backend.read().unwrap_or_else(|e| e.into_inner());
        Ok(backend.default_inferred_context().clone())
    }

    /// Begin a scoped write transaction. Statements added to the transaction
    /// are applied on [`Transaction::commit`]; dropping the transaction
    /// without committing discards them and releases the engine either way.
    pub fn transaction(&self) -> StoreResult<Transaction<'_>> {
        self.ensure_open()?;
        let guard = self.state.backend.write().unwrap_or_else(|e| e.into_inner());
        Ok(Transaction {
            handle: self,
            guard,
            buffer: Vec::new(),
        })
    }

    /// Match statements by filters within the given read scope
    pub fn match_pattern(
        &self,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
        include_inferred: bool,
        contexts: &ContextSet,
    ) -> StoreResult<Vec<Quad>> {
        self.ensure_open()?;
        let backend = self.state.backend.read().unwrap_or_else(|e| e.into_inner());
        backend.match_pattern(subject, predicate, object, include_inferred, contexts)
    }

    /// Check whether any statement matches within the given read scope
    pub fn contains(
        &self,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
        include_inferred: bool,
        contexts: &ContextSet,
    ) -> StoreResult<bool> {
        self.ensure_open()?;
        let backend = self.state.backend.read().unwrap_or_else(|e| e.into_inner());
        backend.contains(subject, predicate, object, include_inferred, contexts)
    }

    /// Evaluate a conjunctive pattern query within the given read scope
    pub fn query(
        &self,
        patterns: &[Statement],
        include_inferred: bool,
        contexts: &ContextSet,
    ) -> StoreResult<Vec<Bindings>> {
        self.ensure_open()?;
        let backend = self.state.backend.read().unwrap_or_else(|e| e.into_inner());
        backend.query(patterns, include_inferred, contexts)
    }

    /// Total statement count across all partitions
    pub fn len(&self) -> StoreResult<usize> {
        self.ensure_open()?;
        let backend = self.state.backend.read().unwrap_or_else(|e| e.into_inner());
        Ok(backend.len())
    }

    /// Check if the store holds no statements
    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }
}

impl std::fmt::Debug for StoreHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "StoreHandle {{ name: {:?}, closed: {} }}",
            self.state.name,
            self.is_closed()
        )
    }
}

/// A scoped write transaction buffering statements for the asserted
/// partition. Holds the engine write lock for its lifetime; the lock is
/// released on every exit path.
pub struct Transaction<'a> {
    handle: &'a StoreHandle,
    guard: RwLockWriteGuard<'a, Box<dyn StoreBackend>>,
    buffer: Vec<Statement>,
}

impl Transaction<'_> {
    /// Buffer a statement for the asserted partition
    pub fn add(&mut self, statement: Statement) {
        self.buffer.push(statement);
    }

    /// Number of buffered statements
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Apply all buffered statements. Fails without applying anything if the
    /// store was closed while the transaction was open.
    pub fn commit(mut self) -> StoreResult<()> {
        if self.handle.is_closed() {
            return Err(StoreError::ClosedStore {
                store: self.handle.name().to_string(),
            });
        }
        for statement in self.buffer.drain(..) {
            self.guard.add(statement)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Transaction<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Transaction {{ store: {:?}, pending: {} }}",
            self.handle.name(),
            self.buffer.len()
        )
    }
}
