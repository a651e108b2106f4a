//! Baseline knowledge loading
//!
//! A freshly provisioned store is enriched with a small fixed set of
//! baseline ontology documents (OWL and RDFS vocabularies). Loading is
//! best-effort: a document that cannot be resolved, or resolves to empty
//! bytes, is skipped; a document that fails to read or parse is recorded in
//! the report and does not abort the remaining documents. Each document is
//! loaded in its own scoped write transaction, so a failure on one never
//! leaves a lock held that blocks the next.

use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::parser::parse;
use crate::store::StoreHandle;

/// Reference to one baseline document: a stable logical module name plus a
/// relative path inside that module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRef {
    pub module: String,
    pub path: String,
}

impl DocumentRef {
    pub fn new(module: impl Into<String>, path: impl Into<String>) -> Self {
        DocumentRef {
            module: module.into(),
            path: path.into(),
        }
    }
}

impl fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.module, self.path)
    }
}

/// Resolves a document reference to readable bytes, or "not found"
pub trait DocumentResolver: Send + Sync {
    fn resolve(&self, document: &DocumentRef) -> io::Result<Option<Vec<u8>>>;
}

/// Resolver for execution contexts without any module system: every lookup
/// is "not found"
#[derive(Debug, Default)]
pub struct NullResolver;

impl DocumentResolver for NullResolver {
    fn resolve(&self, _document: &DocumentRef) -> io::Result<Option<Vec<u8>>> {
        Ok(None)
    }
}

/// Resolver looking up `<root>/<module>/<path>` on the filesystem
#[derive(Debug)]
pub struct DirResolver {
    root: PathBuf,
}

impl DirResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirResolver { root: root.into() }
    }
}

impl DocumentResolver for DirResolver {
    fn resolve(&self, document: &DocumentRef) -> io::Result<Option<Vec<u8>>> {
        let path = self.root.join(&document.module).join(&document.path);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Resolver serving the vocabulary documents compiled into the crate
#[derive(Debug, Default)]
pub struct BundledResolver;

/// Baseline vocabulary documents shipped with the crate
const BUNDLED_DOCUMENTS: &[(&str, &str, &str)] = &[
    ("vocab.owl", "owl.ttl", include_str!("../../resources/vocab/owl.ttl")),
    ("vocab.rdfs", "rdfs.ttl", include_str!("../../resources/vocab/rdfs.ttl")),
];

impl DocumentResolver for BundledResolver {
    fn resolve(&self, document: &DocumentRef) -> io::Result<Option<Vec<u8>>> {
        Ok(BUNDLED_DOCUMENTS
            .iter()
            .find(|(module, path, _)| *module == document.module && *path == document.path)
            .map(|(_, _, source)| source.as_bytes().to_vec()))
    }
}

/// The document list loaded into every freshly provisioned store
pub fn default_baseline() -> Vec<DocumentRef> {
    BUNDLED_DOCUMENTS
        .iter()
        .map(|(module, path, _)| DocumentRef::new(*module, *path))
        .collect()
}

/// Outcome of one baseline loading pass
#[derive(Debug, Default)]
pub struct BootstrapReport {
    loaded: Vec<DocumentRef>,
    skipped: Vec<DocumentRef>,
    failures: Vec<StoreError>,
}

impl BootstrapReport {
    /// Documents whose statements were added to the store
    pub fn loaded(&self) -> &[DocumentRef] {
        &self.loaded
    }

    /// Documents that resolved to nothing (or empty bytes)
    pub fn skipped(&self) -> &[DocumentRef] {
        &self.skipped
    }

    /// Per-document failures; each is a [`StoreError::Bootstrap`]
    pub fn failures(&self) -> &[StoreError] {
        &self.failures
    }

    /// Check if every resolvable document loaded cleanly
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Render a diagnostic summary
    pub fn to_json(&self) -> String {
        serde_json::json!({
            "loaded": self.loaded.iter().map(|d| d.to_string()).collect::<Vec<_>>(),
            "skipped": self.skipped.iter().map(|d| d.to_string()).collect::<Vec<_>>(),
            "failures": self.failures.iter().map(|e| e.to_string()).collect::<Vec<_>>(),
        })
        .to_string()
    }
}

/// Loads baseline documents into a freshly created store
pub struct BootstrapLoader {
    resolver: Arc<dyn DocumentResolver>,
}

impl BootstrapLoader {
    pub fn new(resolver: Arc<dyn DocumentResolver>) -> Self {
        BootstrapLoader { resolver }
    }

    /// Load each document independently into the asserted partition. Never
    /// fails as a whole; per-document failures are collected in the report.
    pub fn load_baseline(&self, handle: &StoreHandle, documents: &[DocumentRef]) -> BootstrapReport {
        let mut report = BootstrapReport::default();

        for document in documents {
            match self.load_document(handle, document) {
                Ok(true) => report.loaded.push(document.clone()),
                Ok(false) => {
                    debug!(document = %document, "baseline document not found, skipped");
                    report.skipped.push(document.clone());
                }
                Err(source) => {
                    warn!(document = %document, error = %source, "baseline document failed");
                    report.failures.push(StoreError::Bootstrap {
                        module: document.module.clone(),
                        path: document.path.clone(),
                        source: Box::new(source),
                    });
                }
            }
        }

        report
    }

    /// Load one document. Returns Ok(false) when there was nothing to load.
    fn load_document(&self, handle: &StoreHandle, document: &DocumentRef) -> StoreResult<bool> {
        let bytes = match self
            .resolver
            .resolve(document)
            .map_err(|e| StoreError::BaselineIo { source: e })?
        {
            Some(bytes) if !bytes.is_empty() => bytes,
            _ => return Ok(false),
        };

        let source = std::str::from_utf8(&bytes).map_err(|e| StoreError::BaselineIo {
            source: io::Error::new(io::ErrorKind::InvalidData, e),
        })?;

        // One scoped transaction per document; the guard releases the
        // engine on every exit path, including parse failure.
        let mut txn = handle.transaction()?;
        let statements = parse(source, None).map_err(|e| StoreError::BaselineParse { source: e })?;
        for statement in statements {
            txn.add(statement);
        }
        let count = txn.pending();
        txn.commit()?;
        debug!(document = %document, statements = count, "baseline document loaded");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{ContextSet, MemoryStore};
    use crate::term::Term;

    fn handle() -> StoreHandle {
        StoreHandle::new("primary", Box::new(MemoryStore::new()))
    }

    /// Resolver backed by an in-memory table, for exercising failure paths
    struct TableResolver(Vec<(DocumentRef, io::Result<Option<Vec<u8>>>)>);

    impl DocumentResolver for TableResolver {
        fn resolve(&self, document: &DocumentRef) -> io::Result<Option<Vec<u8>>> {
            for (doc, outcome) in &self.0 {
                if doc == document {
                    return match outcome {
                        Ok(bytes) => Ok(bytes.clone()),
                        Err(e) => Err(io::Error::new(e.kind(), e.to_string())),
                    };
                }
            }
            Ok(None)
        }
    }

    #[test]
    fn test_bundled_baseline_loads() {
        let handle = handle();
        let loader = BootstrapLoader::new(Arc::new(BundledResolver));
        let report = loader.load_baseline(&handle, &default_baseline());

        assert!(report.is_clean());
        assert_eq!(report.loaded().len(), 2);
        assert!(handle.len().unwrap() > 0);

        // Baseline statements land in the asserted partition only
        let all = handle
            .match_pattern(None, None, None, true, &ContextSet::all())
            .unwrap();
        assert!(all.iter().all(|q| q.is_asserted()));
    }

    #[test]
    fn test_missing_documents_are_skipped() {
        let handle = handle();
        let loader = BootstrapLoader::new(Arc::new(NullResolver));
        let report = loader.load_baseline(&handle, &default_baseline());

        assert!(report.is_clean());
        assert_eq!(report.skipped().len(), 2);
        assert!(handle.is_empty().unwrap());
    }

    #[test]
    fn test_empty_document_is_skipped() {
        let doc = DocumentRef::new("m", "empty.ttl");
        let resolver = TableResolver(vec![(doc.clone(), Ok(Some(Vec::new())))]);
        let handle = handle();
        let report = BootstrapLoader::new(Arc::new(resolver)).load_baseline(&handle, &[doc]);
        assert_eq!(report.skipped().len(), 1);
        assert!(report.is_clean());
    }

    #[test]
    fn test_partial_failure_loads_remaining_documents() {
        let bad = DocumentRef::new("m", "bad.ttl");
        let good = DocumentRef::new("m", "good.ttl");
        let resolver = TableResolver(vec![
            (bad.clone(), Ok(Some(b"@prefix broken".to_vec()))),
            (
                good.clone(),
                Ok(Some(
                    b"<http://ex.org/s> <http://ex.org/p> <http://ex.org/o> .".to_vec(),
                )),
            ),
        ]);

        let handle = handle();
        let report = BootstrapLoader::new(Arc::new(resolver))
            .load_baseline(&handle, &[bad, good.clone()]);

        // One recorded failure, and the valid document still loaded fully
        assert_eq!(report.failures().len(), 1);
        assert!(matches!(report.failures()[0], StoreError::Bootstrap { .. }));
        assert_eq!(report.loaded(), &[good]);
        assert!(handle
            .contains(
                Some(&Term::uri("http://ex.org/s")),
                None,
                None,
                false,
                &ContextSet::all(),
            )
            .unwrap());
    }

    #[test]
    fn test_io_failure_is_recorded_per_document() {
        let doc = DocumentRef::new("m", "locked.ttl");
        let resolver = TableResolver(vec![(
            doc.clone(),
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied")),
        )]);
        let handle = handle();
        let report = BootstrapLoader::new(Arc::new(resolver)).load_baseline(&handle, &[doc]);
        assert_eq!(report.failures().len(), 1);
    }

    #[test]
    fn test_report_renders_json() {
        let handle = handle();
        let loader = BootstrapLoader::new(Arc::new(NullResolver));
        let report = loader.load_baseline(&handle, &default_baseline());
        let json = report.to_json();
        assert!(json.contains("skipped"));
        assert!(json.contains("vocab.owl:owl.ttl"));
    }
}
