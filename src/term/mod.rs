//! RDF term representations
//!
//! This module defines the core data types for representing RDF terms:
//! - URIs (named nodes)
//! - Literals (with optional datatype or language tag)
//! - Blank nodes (anonymous nodes)
//! - Variables (for query patterns)
//!
//! and the `Statement` type tying three terms together.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use fnv::FnvHashMap;

pub mod uri;
mod literal;
mod blank;
mod variable;

pub use uri::Uri;
pub use literal::{Literal, Datatype};
pub use blank::BlankNode;
pub use variable::Variable;

/// A term in RDF
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Term {
    /// A URI reference (named node)
    Uri(Arc<Uri>),
    /// A literal value
    Literal(Arc<Literal>),
    /// A blank node (anonymous)
    BlankNode(BlankNode),
    /// A variable (for query patterns)
    Variable(Variable),
}

impl Term {
    /// Create a URI term
    pub fn uri(s: impl Into<String>) -> Self {
        Term::Uri(Arc::new(Uri::new(s.into())))
    }

    /// Create a plain literal
    pub fn literal(s: impl Into<String>) -> Self {
        Term::Literal(Arc::new(Literal::plain(s.into())))
    }

    /// Create a typed literal
    pub fn typed_literal(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        Term::Literal(Arc::new(Literal::typed(value.into(), datatype.into())))
    }

    /// Create a language-tagged literal
    pub fn lang_literal(value: impl Into<String>, lang: impl Into<String>) -> Self {
        Term::Literal(Arc::new(Literal::with_language(value.into(), lang.into())))
    }

    /// Create a blank node with a label
    pub fn blank(label: impl Into<String>) -> Self {
        Term::BlankNode(BlankNode::labeled(label.into()))
    }

    /// Create a fresh blank node
    pub fn fresh_blank() -> Self {
        Term::BlankNode(BlankNode::fresh())
    }

    /// Create a variable term
    pub fn var(name: impl Into<String>) -> Self {
        Term::Variable(Variable::new(name.into()))
    }

    /// Check if this term is a URI
    pub fn is_uri(&self) -> bool {
        matches!(self, Term::Uri(_))
    }

    /// Check if this term is a literal
    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal(_))
    }

    /// Check if this term is a blank node
    pub fn is_blank(&self) -> bool {
        matches!(self, Term::BlankNode(_))
    }

    /// Check if this term is a variable
    pub fn is_variable(&self) -> bool {
        matches!(self, Term::Variable(_))
    }

    /// Check if this term is ground (contains no variables)
    pub fn is_ground(&self) -> bool {
        !self.is_variable()
    }

    /// Get the URI if this term is a named node
    pub fn as_uri(&self) -> Option<&Uri> {
        match self {
            Term::Uri(u) => Some(u),
            _ => None,
        }
    }

    /// Get the literal if this term is one
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Literal(l) => Some(l),
            _ => None,
        }
    }

    /// Get the lexical value of a literal term
    pub fn literal_value(&self) -> Option<&str> {
        self.as_literal().map(|l| l.value())
    }
}

impl fmt::Debug for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Uri(u) => write!(f, "{:?}", u),
            Term::Literal(l) => write!(f, "{:?}", l),
            Term::BlankNode(b) => write!(f, "{:?}", b),
            Term::Variable(v) => write!(f, "{:?}", v),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Uri(u) => write!(f, "{}", u),
            Term::Literal(l) => write!(f, "{}", l),
            Term::BlankNode(b) => write!(f, "{}", b),
            Term::Variable(v) => write!(f, "{}", v),
        }
    }
}

/// An RDF statement (subject, predicate, object)
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Statement {
    pub subject: Term,
    pub predicate: Term,
    pub object: Term,
}

impl Statement {
    /// Create a new statement
    pub fn new(subject: Term, predicate: Term, object: Term) -> Self {
        Statement { subject, predicate, object }
    }

    /// Check if this statement contains any variables
    pub fn has_variables(&self) -> bool {
        self.subject.is_variable() || self.predicate.is_variable() || self.object.is_variable()
    }

    /// Check if this statement is ground (no variables)
    pub fn is_ground(&self) -> bool {
        !self.has_variables()
    }
}

impl fmt::Debug for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} {:?} {:?} .", self.subject, self.predicate, self.object)
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}

/// Variable bindings produced by pattern matching
pub type Bindings = FnvHashMap<Variable, Term>;

/// Apply bindings to a term, substituting bound variables
pub fn substitute_term(term: &Term, bindings: &Bindings) -> Term {
    match term {
        Term::Variable(var) => bindings.get(var).cloned().unwrap_or_else(|| term.clone()),
        _ => term.clone(),
    }
}

/// Apply bindings to a statement pattern
pub fn substitute_statement(pattern: &Statement, bindings: &Bindings) -> Statement {
    Statement::new(
        substitute_term(&pattern.subject, bindings),
        substitute_term(&pattern.predicate, bindings),
        substitute_term(&pattern.object, bindings),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_term_constructors() {
        let uri = Term::uri("http://example.org/s");
        assert!(uri.is_uri());
        assert_eq!(uri.as_uri().unwrap().as_str(), "http://example.org/s");

        let lit = Term::literal("hello");
        assert!(lit.is_literal());
        assert_eq!(lit.literal_value(), Some("hello"));

        let var = Term::var("x");
        assert!(var.is_variable());
        assert!(!var.is_ground());
    }

    #[test]
    fn test_statement_ground() {
        let ground = Statement::new(
            Term::uri("http://ex.org/s"),
            Term::uri("http://ex.org/p"),
            Term::literal("o"),
        );
        assert!(ground.is_ground());

        let pattern = Statement::new(
            Term::var("s"),
            Term::uri("http://ex.org/p"),
            Term::literal("o"),
        );
        assert!(pattern.has_variables());
    }

    #[test]
    fn test_substitution() {
        let mut bindings = Bindings::default();
        bindings.insert(Variable::new("x".to_string()), Term::uri("http://ex.org/alice"));

        let pattern = Statement::new(
            Term::var("x"),
            Term::uri("http://ex.org/knows"),
            Term::var("y"),
        );
        let substituted = substitute_statement(&pattern, &bindings);
        assert_eq!(substituted.subject, Term::uri("http://ex.org/alice"));
        // Unbound variables stay in place
        assert!(substituted.object.is_variable());
    }
}
