//! Named request collections.

use serde::{Deserialize, Serialize};

use crate::request::RequestItem;

/// Collection that "save request" writes into.
pub const DEFAULT_COLLECTION: &str = "Default";

/// A named, ordered list of saved requests.
///
/// No two entries share the same `(url, method)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    /// Collection name, unique within the store.
    pub name: String,
    /// Saved requests in insertion order.
    #[serde(default)]
    pub requests: Vec<RequestItem>,
}

impl Collection {
    /// Creates a new empty collection.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            requests: Vec::new(),
        }
    }

    /// Inserts or replaces a request.
    ///
    /// An entry with the same `(url, method)` is replaced in place, keeping
    /// its position. Otherwise the request is appended. Returns true if an
    /// existing entry was replaced.
    pub fn upsert(&mut self, item: RequestItem) -> bool {
        if let Some(existing) = self.requests.iter_mut().find(|r| r.same_target(&item)) {
            *existing = item;
            true
        } else {
            self.requests.push(item);
            false
        }
    }

    /// Returns the number of requests.
    #[must_use]
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// Returns true if the collection has no requests.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}
