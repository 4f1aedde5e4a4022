//! Scanner for `{{name}}` placeholders
//!
//! Used for diagnostics only; substitution itself is plain text replacement
//! and does not go through this scanner.

use std::ops::Range;

/// A placeholder found in a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableReference {
    /// The text between the braces, untrimmed.
    pub name: String,

    /// Byte range of the whole `{{name}}` in the input.
    pub span: Range<usize>,
}

impl VariableReference {
    /// Creates a new variable reference.
    #[must_use]
    pub fn new(name: impl Into<String>, span: Range<usize>) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

/// Scans a string for `{{...}}` placeholders, left to right.
///
/// The name is kept exactly as written so that `{{ name }}` is reported as
/// `" name "`, matching how substitution treats it. Empty placeholders and
/// an unterminated trailing `{{` are ignored.
///
/// # Examples
///
/// ```
/// use courier_application::variable_resolver::parse_variables;
///
/// let refs = parse_variables("{{BASE_URL}}/users/{{id}}");
/// assert_eq!(refs.len(), 2);
/// assert_eq!(refs[0].name, "BASE_URL");
/// assert_eq!(refs[1].span, 19..25);
/// ```
#[must_use]
pub fn parse_variables(input: &str) -> Vec<VariableReference> {
    let mut references = Vec::new();
    let mut offset = 0;

    while let Some(open) = input[offset..].find("{{") {
        let start = offset + open;
        let inner_start = start + 2;
        let Some(close) = input[inner_start..].find("}}") else {
            break;
        };
        let inner_end = inner_start + close;
        let end = inner_end + 2;

        let name = &input[inner_start..inner_end];
        if !name.is_empty() {
            references.push(VariableReference::new(name, start..end));
        }
        offset = end;
    }

    references
}
