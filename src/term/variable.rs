//! Query pattern variables

use std::fmt;

/// A named variable appearing in a query pattern
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Variable {
    name: String,
}

impl Variable {
    /// Create a new variable
    pub fn new(name: String) -> Self {
        Variable { name }
    }

    /// Get the variable name
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?{}", self.name)
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?{}", self.name)
    }
}
