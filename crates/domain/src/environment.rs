//! Named environments of substitution variables.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// Variables keyed by name.
///
/// Iteration order is unspecified, and so is the order in which variables
/// are substituted.
pub type VariableMap = HashMap<String, String>;

/// A named set of `{{NAME}}` substitution variables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    /// Environment name, unique within the store.
    pub name: String,
    /// Variable name to value.
    #[serde(default, serialize_with = "sorted_variables")]
    pub variables: VariableMap,
}

impl Environment {
    /// Creates a new environment without variables.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variables: VariableMap::new(),
        }
    }

    /// Adds or replaces a variable.
    pub fn set_variable(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(name.into(), value.into());
    }

    /// Builder form of [`Environment::set_variable`].
    #[must_use]
    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_variable(name, value);
        self
    }

    /// Returns a variable's value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }

    /// Returns true if no variables are defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// The environments written on first start.
    #[must_use]
    pub fn seed_defaults() -> BTreeMap<String, Self> {
        let development = Self::new("development")
            .with_variable("BASE_URL", "http://localhost:3000")
            .with_variable("API_KEY", "dev-key-123");
        let production = Self::new("production")
            .with_variable("BASE_URL", "https://api.example.com")
            .with_variable("API_KEY", "prod-key-789");

        [development, production]
            .into_iter()
            .map(|env| (env.name.clone(), env))
            .collect()
    }
}

// Files are written with sorted keys so that rewrites produce stable diffs.
fn sorted_variables<S>(variables: &VariableMap, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let sorted: BTreeMap<_, _> = variables.iter().collect();
    sorted.serialize(serializer)
}
