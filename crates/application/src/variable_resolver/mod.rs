//! Variable resolution module
//!
//! Substitutes `{{NAME}}` placeholders in URLs, header values and bodies
//! with values from the current environment.
//!
//! # Usage
//!
//! ```
//! use courier_application::variable_resolver::EnvironmentResolver;
//! use courier_domain::Environment;
//!
//! let env = Environment::new("production").with_variable("BASE_URL", "https://api.example.com");
//! let resolver = EnvironmentResolver::new(env);
//!
//! assert_eq!(resolver.resolve("{{BASE_URL}}/health"), "https://api.example.com/health");
//! ```

pub mod engine;
pub mod parser;

pub use engine::EnvironmentResolver;
pub use parser::{VariableReference, parse_variables};
