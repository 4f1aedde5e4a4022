//! Variable resolution engine
//!
//! Substitutes `{{NAME}}` placeholders with values from one environment.

use courier_domain::{Environment, RequestHeaders};
use tracing::debug;

use super::parser::{VariableReference, parse_variables};
use crate::ports::RequestStore;

/// Resolves placeholders against a snapshot of an environment.
///
/// Substitution is a single pass of literal replacements, one per variable,
/// in the environment's iteration order. Values are not rescanned for
/// placeholders of variables that were already applied, so when a value
/// itself contains `{{OTHER}}` the result depends on that order.
/// Unknown placeholders are left untouched.
#[derive(Debug, Clone, Default)]
pub struct EnvironmentResolver {
    environment: Environment,
}

impl EnvironmentResolver {
    /// Creates a resolver over the given environment.
    #[must_use]
    pub const fn new(environment: Environment) -> Self {
        Self { environment }
    }

    /// Creates a resolver over the store's current environment.
    #[must_use]
    pub fn from_store<S: RequestStore + ?Sized>(store: &S) -> Self {
        Self::new(store.current_environment())
    }

    /// Replaces every `{{KEY}}` for every variable in the environment.
    ///
    /// # Examples
    ///
    /// ```
    /// use courier_application::EnvironmentResolver;
    /// use courier_domain::Environment;
    ///
    /// let env = Environment::new("dev").with_variable("BASE_URL", "http://localhost:3000");
    /// let resolver = EnvironmentResolver::new(env);
    /// assert_eq!(
    ///     resolver.resolve("{{BASE_URL}}/users"),
    ///     "http://localhost:3000/users"
    /// );
    /// ```
    #[must_use]
    pub fn resolve(&self, input: &str) -> String {
        if self.environment.is_empty() || !input.contains("{{") {
            return input.to_string();
        }

        let mut result = input.to_string();
        for (key, value) in &self.environment.variables {
            let placeholder = format!("{{{{{key}}}}}");
            if result.contains(&placeholder) {
                result = result.replace(&placeholder, value);
            }
        }

        let unresolved = self.find_unresolved(&result);
        if !unresolved.is_empty() {
            debug!(
                environment = %self.environment.name,
                unresolved = ?unresolved.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(),
                "placeholders left unresolved"
            );
        }

        result
    }

    /// Resolves header values. Header names are left as written.
    #[must_use]
    pub fn resolve_headers(&self, headers: &RequestHeaders) -> RequestHeaders {
        headers
            .iter()
            .map(|(name, value)| (name.clone(), self.resolve(value)))
            .collect()
    }

    /// Returns the placeholders in `input` that name no variable.
    #[must_use]
    pub fn find_unresolved(&self, input: &str) -> Vec<VariableReference> {
        parse_variables(input)
            .into_iter()
            .filter(|r| self.environment.get(&r.name).is_none())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dev() -> EnvironmentResolver {
        EnvironmentResolver::new(
            Environment::new("development")
                .with_variable("BASE_URL", "http://localhost:3000")
                .with_variable("API_KEY", "dev-key-123"),
        )
    }

    #[test]
    fn resolves_known_variables() {
        let resolver = dev();
        assert_eq!(
            resolver.resolve("{{BASE_URL}}/users?key={{API_KEY}}"),
            "http://localhost:3000/users?key=dev-key-123"
        );
    }

    #[test]
    fn repeated_placeholders_are_all_replaced() {
        let resolver = dev();
        assert_eq!(resolver.resolve("{{API_KEY}}:{{API_KEY}}"), "dev-key-123:dev-key-123");
    }

    #[test]
    fn unknown_placeholders_are_left_alone() {
        let resolver = dev();
        assert_eq!(
            resolver.resolve("{{BASE_URL}}/{{MISSING}}"),
            "http://localhost:3000/{{MISSING}}"
        );
    }

    #[test]
    fn padded_placeholders_do_not_match() {
        let resolver = dev();
        assert_eq!(resolver.resolve("{{ BASE_URL }}"), "{{ BASE_URL }}");
    }

    #[test]
    fn empty_environment_returns_input() {
        let resolver = EnvironmentResolver::new(Environment::new("empty"));
        assert_eq!(resolver.resolve("{{BASE_URL}}/x"), "{{BASE_URL}}/x");
        assert_eq!(resolver.resolve(""), "");
    }

    #[test]
    fn substitution_does_not_recurse_into_own_value() {
        let resolver = EnvironmentResolver::new(
            Environment::new("loop").with_variable("SELF", "{{SELF}}!"),
        );
        assert_eq!(resolver.resolve("{{SELF}}"), "{{SELF}}!");
    }

    #[test]
    fn header_values_are_resolved() {
        let resolver = dev();
        let mut headers = RequestHeaders::new();
        headers.insert("X-Api-Key".to_string(), "{{API_KEY}}".to_string());
        headers.insert("{{API_KEY}}".to_string(), "literal".to_string());

        let resolved = resolver.resolve_headers(&headers);
        assert_eq!(resolved.get("X-Api-Key").map(String::as_str), Some("dev-key-123"));
        assert_eq!(resolved.get("{{API_KEY}}").map(String::as_str), Some("literal"));
    }

    #[test]
    fn find_unresolved_lists_missing_names() {
        let resolver = dev();
        let missing = resolver.find_unresolved("{{BASE_URL}}/{{TENANT}}/{{ID}}");
        assert_eq!(
            missing.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(),
            vec!["TENANT", "ID"]
        );
    }
}
