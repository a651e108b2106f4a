//! Triple container backing one partition
//!
//! A graph holds a set of statements and supports bounded pattern matching
//! and conjunctive queries with variable bindings.

use crate::term::{substitute_statement, Bindings, Statement, Term};

/// A set of statements belonging to one partition
#[derive(Clone, Default)]
pub struct Graph {
    statements: Vec<Statement>,
}

impl Graph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a statement, ignoring duplicates
    pub fn add(&mut self, statement: Statement) {
        if !self.contains(&statement) {
            self.statements.push(statement);
        }
    }

    /// Add multiple statements
    pub fn add_all(&mut self, statements: impl IntoIterator<Item = Statement>) {
        for statement in statements {
            self.add(statement);
        }
    }

    /// Check if the graph contains a statement
    pub fn contains(&self, statement: &Statement) -> bool {
        self.statements.iter().any(|s| s == statement)
    }

    /// Get the number of statements
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    /// Check if the graph is empty
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Iterate over all statements
    pub fn iter(&self) -> impl Iterator<Item = &Statement> {
        self.statements.iter()
    }

    /// Match statements by optional subject/predicate/object filters
    pub fn match_pattern<'a>(
        &'a self,
        subject: Option<&'a Term>,
        predicate: Option<&'a Term>,
        object: Option<&'a Term>,
    ) -> impl Iterator<Item = &'a Statement> {
        self.statements
            .iter()
            .filter(move |s| matches_filters(s, subject, predicate, object))
    }

    /// Check if any statement matches the filters
    pub fn any_match(
        &self,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
    ) -> bool {
        self.statements
            .iter()
            .any(|s| matches_filters(s, subject, predicate, object))
    }
}

/// Check a statement against optional term filters
pub(crate) fn matches_filters(
    statement: &Statement,
    subject: Option<&Term>,
    predicate: Option<&Term>,
    object: Option<&Term>,
) -> bool {
    subject.map(|s| &statement.subject == s).unwrap_or(true)
        && predicate.map(|p| &statement.predicate == p).unwrap_or(true)
        && object.map(|o| &statement.object == o).unwrap_or(true)
}

/// Try to unify a pattern statement with a ground statement
fn unify_statement(pattern: &Statement, ground: &Statement) -> Option<Bindings> {
    let mut bindings = Bindings::default();
    if !unify_term(&pattern.subject, &ground.subject, &mut bindings) {
        return None;
    }
    if !unify_term(&pattern.predicate, &ground.predicate, &mut bindings) {
        return None;
    }
    if !unify_term(&pattern.object, &ground.object, &mut bindings) {
        return None;
    }
    Some(bindings)
}

/// Try to unify a pattern term with a ground term
fn unify_term(pattern: &Term, ground: &Term, bindings: &mut Bindings) -> bool {
    match pattern {
        Term::Variable(var) => {
            if let Some(existing) = bindings.get(var) {
                // Variable already bound, check consistency
                existing == ground
            } else {
                bindings.insert(var.clone(), ground.clone());
                true
            }
        }
        _ => pattern == ground,
    }
}

/// Evaluate a conjunctive query over a merged set of statements.
///
/// Solutions are deduplicated, so the same statement appearing in several
/// partitions contributes one solution, not one per partition.
pub(crate) fn conjunctive_query(
    statements: &[&Statement],
    patterns: &[Statement],
) -> Vec<Bindings> {
    if patterns.is_empty() {
        return vec![Bindings::default()];
    }

    let mut results: Vec<Bindings> = Vec::new();
    for ground in statements {
        if let Some(bindings) = unify_statement(&patterns[0], ground) {
            if !results.contains(&bindings) {
                results.push(bindings);
            }
        }
    }

    for pattern in &patterns[1..] {
        let mut new_results: Vec<Bindings> = Vec::new();
        for bindings in results {
            let substituted = substitute_statement(pattern, &bindings);
            for ground in statements {
                if let Some(new_bindings) = unify_statement(&substituted, ground) {
                    let mut merged = bindings.clone();
                    for (var, term) in new_bindings {
                        merged.insert(var, term);
                    }
                    if !new_results.contains(&merged) {
                        new_results.push(merged);
                    }
                }
            }
        }
        results = new_results;
    }

    results
}

impl std::fmt::Debug for Graph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Graph {{")?;
        for statement in &self.statements {
            writeln!(f, "  {:?}", statement)?;
        }
        write!(f, "}}")
    }
}
