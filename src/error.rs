//! Structured error handling for ontostore
//!
//! One unified error type covers the whole provisioning and query surface:
//!
//! - configuration errors are fatal to provisioning and surfaced unchanged
//! - provisioning errors abort construction; no handle is returned
//! - bootstrap errors are per-document and collected, never fatal
//! - closed-store errors are raised on any access after shutdown
//! - backend read failures pass through wrapped with the operation name,
//!   the requested context set, and the inference flag

use crate::parser::ParseError;
use crate::store::ContextSet;

/// The main error type for ontostore
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The configuration document contains no node typed as a repository
    /// configuration.
    #[error("no repository node in configuration resource '{resource}'")]
    MissingRepositoryNode { resource: String },

    /// The configuration document could not be parsed.
    #[error("malformed configuration resource '{resource}'")]
    MalformedConfiguration {
        resource: String,
        #[source]
        source: ParseError,
    },

    /// A named bundled resource does not exist.
    #[error("unknown configuration resource '{resource}'")]
    UnknownResource { resource: String },

    /// The configuration graph parsed but is unusable.
    #[error("invalid configuration resource '{resource}': {reason}")]
    InvalidConfiguration { resource: String, reason: String },

    /// The store manager could not be initialized against its working
    /// directory.
    #[error("manager init failed: {reason}")]
    ManagerInit { reason: String },

    /// A working directory could not be allocated.
    #[error("working directory allocation failed")]
    WorkingDirectory {
        #[source]
        source: std::io::Error,
    },

    /// Store provisioning failed (unknown engine, missing configuration,
    /// open failure).
    #[error("provisioning failed: {reason}")]
    Provisioning { reason: String },

    /// A single baseline document failed to parse or load. Non-fatal to the
    /// overall store; collected per document.
    #[error("bootstrap of '{module}:{path}' failed")]
    Bootstrap {
        module: String,
        path: String,
        #[source]
        source: Box<StoreError>,
    },

    /// A baseline document could not be parsed.
    #[error("invalid baseline document")]
    BaselineParse {
        #[source]
        source: ParseError,
    },

    /// A baseline document could not be read.
    #[error("cannot access baseline document")]
    BaselineIo {
        #[source]
        source: std::io::Error,
    },

    /// An operation was attempted on a store after shutdown.
    #[error("store '{store}' is closed")]
    ClosedStore { store: String },

    /// A read operation failed in the underlying store; wrapped with enough
    /// context to diagnose.
    #[error("{operation} failed (contexts: {contexts}, include_inferred: {include_inferred})")]
    Query {
        operation: &'static str,
        contexts: ContextSet,
        include_inferred: bool,
        #[source]
        source: Box<StoreError>,
    },

    /// Manager shutdown reported a failure. The lifecycle manager still
    /// releases its slot so repeated shutdown calls stay idempotent.
    #[error("shutdown failed: {reason}")]
    Shutdown { reason: String },
}

impl StoreError {
    /// Wrap a read failure with the operation name and the effective read
    /// scope, preserving the original error as the source.
    pub fn in_operation(
        self,
        operation: &'static str,
        contexts: &ContextSet,
        include_inferred: bool,
    ) -> Self {
        StoreError::Query {
            operation,
            contexts: contexts.clone(),
            include_inferred,
            source: Box::new(self),
        }
    }

    /// Check if this error was raised by an access to a closed store
    pub fn is_closed(&self) -> bool {
        match self {
            StoreError::ClosedStore { .. } => true,
            StoreError::Query { source, .. } => source.is_closed(),
            _ => false,
        }
    }
}

/// A Result type using StoreError
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_wrapping_preserves_source() {
        let err = StoreError::ClosedStore { store: "primary".into() }
            .in_operation("match_pattern", &ContextSet::all(), true);
        assert!(err.is_closed());
        let text = err.to_string();
        assert!(text.contains("match_pattern"));
        assert!(text.contains("include_inferred: true"));
    }

    #[test]
    fn test_bootstrap_error_display() {
        let err = StoreError::Bootstrap {
            module: "vocab.owl".into(),
            path: "owl.ttl".into(),
            source: Box::new(StoreError::BaselineParse {
                source: ParseError::UnexpectedEof,
            }),
        };
        assert!(err.to_string().contains("vocab.owl:owl.ttl"));
    }
}
