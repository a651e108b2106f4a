//! Context-augmenting query layer
//!
//! Makes the asserted/inferred partition split invisible to ordinary
//! callers. Whenever a read requests inference-inclusive results, the
//! implicit asserted partition (context = null) is appended to the
//! requested context set before delegating, so "give me inferred results"
//! always also covers directly asserted facts. The layer holds no mutable
//! state and never writes; it only rewrites read requests.

use crate::error::StoreResult;
use crate::store::{ContextSet, Quad, StoreHandle};
use crate::term::{Bindings, Statement, Term};

/// Rewrite rule applied identically to every read operation:
///
/// - `include_inferred` off: the set passes through unchanged
/// - empty set: stays empty (unrestricted already covers everything;
///   narrowing it to one explicit value would exclude named partitions)
/// - otherwise: append the asserted context unless already present
///
/// Applying the rewrite twice yields the same result as applying it once.
pub fn augment_contexts(contexts: &ContextSet, include_inferred: bool) -> ContextSet {
    if !include_inferred || contexts.is_unrestricted() || contexts.contains_asserted() {
        return contexts.clone();
    }
    let mut augmented = contexts.clone();
    augmented.push(None);
    augmented
}

/// Read view over a provisioned store with transparent context augmentation
#[derive(Clone, Debug)]
pub struct StoreView {
    handle: StoreHandle,
}

impl StoreView {
    /// Wrap a store handle
    pub fn new(handle: StoreHandle) -> Self {
        StoreView { handle }
    }

    /// The wrapped handle
    pub fn handle(&self) -> &StoreHandle {
        &self.handle
    }

    /// Match statements by optional filters. With `include_inferred`, named
    /// partitions are visible and the asserted partition is always covered.
    pub fn match_pattern(
        &self,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
        include_inferred: bool,
        contexts: &ContextSet,
    ) -> StoreResult<Vec<Quad>> {
        let effective = augment_contexts(contexts, include_inferred);
        self.handle
            .match_pattern(subject, predicate, object, include_inferred, &effective)
            .map_err(|e| e.in_operation("match_pattern", &effective, include_inferred))
    }

    /// Check whether any statement matches the filters
    pub fn contains(
        &self,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
        include_inferred: bool,
        contexts: &ContextSet,
    ) -> StoreResult<bool> {
        let effective = augment_contexts(contexts, include_inferred);
        self.handle
            .contains(subject, predicate, object, include_inferred, &effective)
            .map_err(|e| e.in_operation("contains", &effective, include_inferred))
    }

    /// Evaluate a conjunctive pattern query
    pub fn query(
        &self,
        patterns: &[Statement],
        include_inferred: bool,
        contexts: &ContextSet,
    ) -> StoreResult<Vec<Bindings>> {
        let effective = augment_contexts(contexts, include_inferred);
        self.handle
            .query(patterns, include_inferred, &effective)
            .map_err(|e| e.in_operation("query", &effective, include_inferred))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, StoreHandle};
    use crate::term::Uri;

    fn statement(s: &str) -> Statement {
        Statement::new(
            Term::uri(s),
            Term::uri("http://ex.org/p"),
            Term::uri("http://ex.org/o"),
        )
    }

    fn inferred() -> Uri {
        Uri::from("urn:ontostore:inferred")
    }

    /// S1 asserted, S2 present only in the inferred partition
    fn view() -> StoreView {
        let handle = StoreHandle::new("primary", Box::new(MemoryStore::new()));
        handle.add(statement("http://ex.org/s1")).unwrap();
        handle
            .add_inferred(statement("http://ex.org/s2"), Some(&inferred()))
            .unwrap();
        StoreView::new(handle)
    }

    #[test]
    fn test_augmentation_is_idempotent() {
        let sets = [
            ContextSet::all(),
            ContextSet::asserted(),
            ContextSet::named(inferred()),
            ContextSet::of([Some(inferred()), None]),
            ContextSet::of([Some(inferred()), Some(Uri::from("http://ex.org/other"))]),
        ];
        for include_inferred in [true, false] {
            for set in &sets {
                let once = augment_contexts(set, include_inferred);
                let twice = augment_contexts(&once, include_inferred);
                assert_eq!(once, twice, "rewrite must be idempotent for {}", set);
            }
        }
    }

    #[test]
    fn test_augmentation_rules() {
        // Empty stays empty even with inference requested
        assert!(augment_contexts(&ContextSet::all(), true).is_unrestricted());

        // Named-only set gains the asserted context
        let augmented = augment_contexts(&ContextSet::named(inferred()), true);
        assert_eq!(augmented.len(), 2);
        assert!(augmented.contains_asserted());

        // Without inference the set passes through unmodified
        let named = ContextSet::named(inferred());
        assert_eq!(augment_contexts(&named, false), named);
    }

    #[test]
    fn test_additive_inference() {
        let view = view();

        // Inference-inclusive unrestricted read sees both partitions
        let both = view
            .match_pattern(None, None, None, true, &ContextSet::all())
            .unwrap();
        assert_eq!(both.len(), 2);

        // Without inference, only the asserted statement is visible
        let asserted = view
            .match_pattern(None, None, None, false, &ContextSet::all())
            .unwrap();
        assert_eq!(asserted.len(), 1);
        assert_eq!(asserted[0].statement.subject, Term::uri("http://ex.org/s1"));
    }

    #[test]
    fn test_explicit_narrowing_still_includes_asserted() {
        let view = view();
        let quads = view
            .match_pattern(None, None, None, true, &ContextSet::named(inferred()))
            .unwrap();
        // Both S1 (asserted, appended) and S2 (named) are returned
        assert_eq!(quads.len(), 2);
        assert!(quads.iter().any(|q| q.is_asserted()));
        assert!(quads.iter().any(|q| !q.is_asserted()));
    }

    #[test]
    fn test_no_augmentation_without_inference() {
        let view = view();
        let other = ContextSet::named(Uri::from("http://ex.org/other"));
        let quads = view
            .match_pattern(None, None, None, false, &other)
            .unwrap();
        // "other" has no statements and the asserted context was not added
        assert!(quads.is_empty());
    }

    #[test]
    fn test_contains_and_query_augment_identically() {
        let view = view();
        let s2 = Term::uri("http://ex.org/s2");
        let s1 = Term::uri("http://ex.org/s1");

        assert!(view
            .contains(Some(&s2), None, None, true, &ContextSet::named(inferred()))
            .unwrap());
        assert!(view
            .contains(Some(&s1), None, None, true, &ContextSet::named(inferred()))
            .unwrap());
        assert!(!view
            .contains(Some(&s2), None, None, false, &ContextSet::all())
            .unwrap());

        let pattern = Statement::new(Term::var("s"), Term::uri("http://ex.org/p"), Term::var("o"));
        let solutions = view
            .query(&[pattern], true, &ContextSet::named(inferred()))
            .unwrap();
        assert_eq!(solutions.len(), 2);
    }

    #[test]
    fn test_read_errors_carry_operation_context() {
        let handle = StoreHandle::new("primary", Box::new(MemoryStore::new()));
        let view = StoreView::new(handle.clone());
        handle.close();

        let err = view
            .match_pattern(None, None, None, true, &ContextSet::named(inferred()))
            .unwrap_err();
        assert!(err.is_closed());
        let text = err.to_string();
        assert!(text.contains("match_pattern"));
        assert!(text.contains("null"));
    }
}
