//! JSON serialization for the store's files.
//!
//! Files are written the same way every time:
//! - 2-space indentation
//! - Trailing newline
//! - Maps with sorted keys (via `BTreeMap` or a sorting serializer in domain types)
//! - UTF-8 without BOM

mod json;

pub use json::*;
