//! Repository configuration graphs
//!
//! A store configuration is expressed as a small graph of configuration
//! statements, not as code. The loader parses a bundled Turtle document,
//! locates the single node typed `rep:Repository`, and materializes a
//! [`StoreConfig`] from the subgraph rooted at that node: the store id, an
//! optional label, the engine type (the innermost `rep:repositoryType` /
//! `sail:sailType` wins), and a flattened key/value parameter bundle of
//! every literal reachable in the implementation subtree.
//!
//! Bundled resources are compiled in; the loader performs no filesystem
//! I/O and never touches temporary directories.

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::parser::parse;
use crate::term::uri::ns;
use crate::term::{Statement, Term};

/// Configuration resources compiled into the crate
const BUNDLED_RESOURCES: &[(&str, &str)] = &[
    ("memory.ttl", include_str!("../../resources/memory.ttl")),
];

/// Engine-specific parameter bundle identifying which storage/inference
/// engine to instantiate and its tuning parameters. Immutable once parsed.
#[derive(Debug, Clone, Serialize)]
pub struct StoreConfig {
    id: String,
    label: Option<String>,
    engine_type: String,
    params: IndexMap<String, String>,
}

impl StoreConfig {
    /// Create a configuration with no parameters
    pub fn new(id: impl Into<String>, engine_type: impl Into<String>) -> Self {
        StoreConfig {
            id: id.into(),
            label: None,
            engine_type: engine_type.into(),
            params: IndexMap::new(),
        }
    }

    /// Attach a parameter (builder style)
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// The logical store name this configuration is registered under
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Human-readable label, if the graph carried one
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// The engine type identifier to instantiate
    pub fn engine_type(&self) -> &str {
        &self.engine_type
    }

    /// Look up a tuning parameter
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// All tuning parameters, in graph order
    pub fn params(&self) -> &IndexMap<String, String> {
        &self.params
    }

    /// Render the resolved configuration for diagnostics
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{{\"id\":\"{}\"}}", self.id))
    }
}

/// Loads typed store configurations from bundled configuration graphs
pub struct ConfigGraphLoader;

impl ConfigGraphLoader {
    /// Load a bundled configuration resource by name
    pub fn load(resource: &str) -> StoreResult<StoreConfig> {
        let source = BUNDLED_RESOURCES
            .iter()
            .find(|(name, _)| *name == resource)
            .map(|(_, source)| *source)
            .ok_or_else(|| StoreError::UnknownResource {
                resource: resource.to_string(),
            })?;
        Self::from_source(resource, source)
    }

    /// Names of all bundled configuration resources
    pub fn bundled_resources() -> Vec<&'static str> {
        BUNDLED_RESOURCES.iter().map(|(name, _)| *name).collect()
    }

    /// Parse a configuration graph and materialize the configuration rooted
    /// at its repository node
    pub fn from_source(resource: &str, source: &str) -> StoreResult<StoreConfig> {
        let statements = parse(source, None).map_err(|e| StoreError::MalformedConfiguration {
            resource: resource.to_string(),
            source: e,
        })?;

        let rdf_type = Term::uri(ns::RDF_TYPE);
        let repository = Term::uri(ns::REP_REPOSITORY);
        let node = statements
            .iter()
            .find(|s| s.predicate == rdf_type && s.object == repository)
            .map(|s| s.subject.clone())
            .ok_or_else(|| StoreError::MissingRepositoryNode {
                resource: resource.to_string(),
            })?;

        let id = literal_object(&statements, &node, ns::REP_REPOSITORY_ID)
            .unwrap_or_else(|| "primary".to_string());
        let label = literal_object(&statements, &node, ns::RDFS_LABEL);

        let mut engine_type = String::new();
        let mut params = IndexMap::new();
        if let Some(impl_node) = object_of(&statements, &node, ns::REP_REPOSITORY_IMPL) {
            collect_impl(&statements, &impl_node, &mut engine_type, &mut params);
        }
        if engine_type.is_empty() {
            return Err(StoreError::InvalidConfiguration {
                resource: resource.to_string(),
                reason: "repository node declares no engine type".to_string(),
            });
        }

        let config = StoreConfig { id, label, engine_type, params };
        debug!(resource, config = %config.to_json(), "configuration loaded");
        Ok(config)
    }
}

/// First object of (subject, predicate), if any
fn object_of(statements: &[Statement], subject: &Term, predicate: &str) -> Option<Term> {
    let predicate = Term::uri(predicate);
    statements
        .iter()
        .find(|s| &s.subject == subject && s.predicate == predicate)
        .map(|s| s.object.clone())
}

/// First literal object of (subject, predicate), if any
fn literal_object(statements: &[Statement], subject: &Term, predicate: &str) -> Option<String> {
    object_of(statements, subject, predicate)
        .and_then(|o| o.literal_value().map(str::to_string))
}

/// Walk the implementation subtree, recording the innermost engine type and
/// flattening every literal into the parameter bundle keyed by the
/// predicate's local name. Nesting follows the `sr:sailImpl` edge only;
/// blank objects hanging off other predicates are not part of the
/// implementation description.
fn collect_impl(
    statements: &[Statement],
    node: &Term,
    engine_type: &mut String,
    params: &mut IndexMap<String, String>,
) {
    for statement in statements.iter().filter(|s| &s.subject == node) {
        let key = match statement.predicate.as_uri() {
            Some(uri) => uri.local_name().to_string(),
            None => continue,
        };
        if let Some(value) = statement.object.literal_value() {
            if statement.predicate == Term::uri(ns::SAIL_SAIL_TYPE) {
                // A sail type always overrides the wrapping repository type
                *engine_type = value.to_string();
            } else if statement.predicate == Term::uri(ns::REP_REPOSITORY_TYPE)
                && engine_type.is_empty()
            {
                *engine_type = value.to_string();
            }
            params.insert(key, value.to_string());
        } else if statement.object.is_blank() && statement.predicate == Term::uri(ns::SR_SAIL_IMPL)
        {
            collect_impl(statements, &statement.object, engine_type, params);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MEMORY_ENGINE_TYPE;

    #[test]
    fn test_load_bundled_memory_config() {
        let config = ConfigGraphLoader::load("memory.ttl").unwrap();
        assert_eq!(config.id(), "primary");
        assert_eq!(config.engine_type(), MEMORY_ENGINE_TYPE);
        assert_eq!(config.label(), Some("Inference-partitioned memory store"));
        assert_eq!(config.param("inferredContext"), Some("urn:ontostore:inferred"));
    }

    #[test]
    fn test_unknown_resource() {
        let err = ConfigGraphLoader::load("nope.ttl").unwrap_err();
        assert!(matches!(err, StoreError::UnknownResource { .. }));
    }

    #[test]
    fn test_missing_repository_node() {
        let source = r#"
            @prefix ex: <http://ex.org/> .
            ex:s ex:p ex:o .
        "#;
        let err = ConfigGraphLoader::from_source("inline", source).unwrap_err();
        assert!(matches!(err, StoreError::MissingRepositoryNode { .. }));
    }

    #[test]
    fn test_malformed_configuration() {
        let err = ConfigGraphLoader::from_source("inline", "@prefix broken").unwrap_err();
        assert!(matches!(err, StoreError::MalformedConfiguration { .. }));
    }

    #[test]
    fn test_nested_impl_flattening() {
        let source = r#"
            @prefix rep: <http://www.openrdf.org/config/repository#> .
            @prefix sr: <http://www.openrdf.org/config/repository/sail#> .
            @prefix sail: <http://www.openrdf.org/config/sail#> .
            @prefix onto: <urn:ontostore:config#> .

            [] a rep:Repository ;
               rep:repositoryID "custom" ;
               rep:repositoryImpl [
                  rep:repositoryType "ontostore:SailRepository" ;
                  sr:sailImpl [
                     sail:sailType "ontostore:MemoryStore" ;
                     onto:inferredContext "urn:custom:inferred" ;
                     onto:ruleset "owl-horst"
                  ]
               ] .
        "#;
        let config = ConfigGraphLoader::from_source("inline", source).unwrap();
        assert_eq!(config.id(), "custom");
        // Sail type overrides the wrapping repository type
        assert_eq!(config.engine_type(), "ontostore:MemoryStore");
        assert_eq!(config.param("ruleset"), Some("owl-horst"));
        assert_eq!(config.param("repositoryType"), Some("ontostore:SailRepository"));
        assert_eq!(config.param("inferredContext"), Some("urn:custom:inferred"));
    }

    #[test]
    fn test_unrelated_blank_subtree_is_not_flattened() {
        let source = r#"
            @prefix rep: <http://www.openrdf.org/config/repository#> .
            @prefix sr: <http://www.openrdf.org/config/repository/sail#> .
            @prefix sail: <http://www.openrdf.org/config/sail#> .
            @prefix ex: <http://ex.org/> .

            [] a rep:Repository ;
               rep:repositoryImpl [
                  sr:sailImpl [ sail:sailType "ontostore:MemoryStore" ] ;
                  ex:annotation [ ex:note "unrelated" ]
               ] .
        "#;
        let config = ConfigGraphLoader::from_source("inline", source).unwrap();
        assert_eq!(config.engine_type(), "ontostore:MemoryStore");
        // Only the sr:sailImpl edge is walked for nested parameters
        assert_eq!(config.param("note"), None);
    }

    #[test]
    fn test_config_serializes_for_diagnostics() {
        let config = StoreConfig::new("primary", MEMORY_ENGINE_TYPE).with_param("k", "v");
        let json = config.to_json();
        assert!(json.contains("primary"));
        assert!(json.contains("\"k\":\"v\""));
    }
}
