//! URI (IRI) representation and well-known namespaces

use std::fmt;

/// A URI reference
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Uri {
    value: String,
}

impl Uri {
    /// Create a new URI
    pub fn new(value: String) -> Self {
        Uri { value }
    }

    /// Get the URI as a string slice
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Get the namespace (everything up to and including the last # or /)
    pub fn namespace(&self) -> &str {
        if let Some(pos) = self.value.rfind('#') {
            &self.value[..=pos]
        } else if let Some(pos) = self.value.rfind('/') {
            &self.value[..=pos]
        } else {
            &self.value
        }
    }

    /// Get the local name (fragment or last path segment)
    pub fn local_name(&self) -> &str {
        if let Some(pos) = self.value.rfind('#') {
            &self.value[pos + 1..]
        } else if let Some(pos) = self.value.rfind('/') {
            &self.value[pos + 1..]
        } else {
            &self.value
        }
    }

    /// Resolve a relative URI reference against this base
    pub fn resolve(&self, relative: &str) -> Uri {
        if relative.contains("://") {
            return Uri::new(relative.to_string());
        }

        if relative.starts_with('#') {
            let base = if let Some(pos) = self.value.find('#') {
                &self.value[..pos]
            } else {
                &self.value
            };
            return Uri::new(format!("{}{}", base, relative));
        }

        if relative.starts_with('/') {
            if let Some(scheme_end) = self.value.find("://") {
                let authority_start = scheme_end + 3;
                if let Some(path_start) = self.value[authority_start..].find('/') {
                    let base = &self.value[..authority_start + path_start];
                    return Uri::new(format!("{}{}", base, relative));
                }
            }
        }

        Uri::new(format!("{}{}", self.namespace(), relative))
    }
}

impl From<&str> for Uri {
    fn from(s: &str) -> Self {
        Uri::new(s.to_string())
    }
}

impl fmt::Debug for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.value)
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.value)
    }
}

/// Well-known namespace constants
pub mod ns {
    /// RDF namespace
    pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    /// RDF Schema namespace
    pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
    /// OWL namespace
    pub const OWL: &str = "http://www.w3.org/2002/07/owl#";
    /// XML Schema datatypes namespace
    pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";
    /// Repository configuration vocabulary
    pub const REP: &str = "http://www.openrdf.org/config/repository#";
    /// Sail repository configuration vocabulary
    pub const SR: &str = "http://www.openrdf.org/config/repository/sail#";
    /// Sail configuration vocabulary
    pub const SAIL: &str = "http://www.openrdf.org/config/sail#";

    /// rdf:type
    pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    /// rep:Repository - the type of a repository configuration node
    pub const REP_REPOSITORY: &str = "http://www.openrdf.org/config/repository#Repository";
    /// rep:repositoryID
    pub const REP_REPOSITORY_ID: &str = "http://www.openrdf.org/config/repository#repositoryID";
    /// rep:repositoryImpl
    pub const REP_REPOSITORY_IMPL: &str = "http://www.openrdf.org/config/repository#repositoryImpl";
    /// rep:repositoryType
    pub const REP_REPOSITORY_TYPE: &str = "http://www.openrdf.org/config/repository#repositoryType";
    /// sr:sailImpl
    pub const SR_SAIL_IMPL: &str = "http://www.openrdf.org/config/repository/sail#sailImpl";
    /// sail:sailType
    pub const SAIL_SAIL_TYPE: &str = "http://www.openrdf.org/config/sail#sailType";
    /// rdfs:label
    pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_name_and_namespace() {
        let uri = Uri::new("http://example.org/vocab#Thing".to_string());
        assert_eq!(uri.local_name(), "Thing");
        assert_eq!(uri.namespace(), "http://example.org/vocab#");

        let slash = Uri::new("http://example.org/vocab/Thing".to_string());
        assert_eq!(slash.local_name(), "Thing");
        assert_eq!(slash.namespace(), "http://example.org/vocab/");
    }

    #[test]
    fn test_resolve_fragment() {
        let base = Uri::new("http://example.org/doc".to_string());
        assert_eq!(base.resolve("#part").as_str(), "http://example.org/doc#part");
    }

    #[test]
    fn test_resolve_absolute() {
        let base = Uri::new("http://example.org/doc".to_string());
        assert_eq!(
            base.resolve("https://other.org/x").as_str(),
            "https://other.org/x"
        );
    }

    #[test]
    fn test_resolve_relative_path() {
        let base = Uri::new("http://example.org/dir/doc".to_string());
        assert_eq!(base.resolve("other").as_str(), "http://example.org/dir/other");
    }
}
