//! Stored request item.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{HttpMethod, RequestHeaders};

/// A request as kept in history or inside a collection.
///
/// `(url, method)` is the de-duplication key both in history and within a
/// collection's request list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestItem {
    /// Unique identifier.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Target URL.
    pub url: String,
    /// HTTP method.
    pub method: HttpMethod,
    /// Request headers.
    #[serde(default)]
    pub headers: RequestHeaders,
    /// Raw request body.
    #[serde(default)]
    pub body: String,
    /// When the item was first stored.
    pub created_at: DateTime<Utc>,
    /// When the item was last sent.
    pub last_used: DateTime<Utc>,
    /// Names of the collections this request belongs to.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub collections: Vec<String>,
}

impl RequestItem {
    /// Creates a new item stamped with the given time.
    #[must_use]
    pub fn new(method: HttpMethod, url: impl Into<String>, now: DateTime<Utc>) -> Self {
        let url = url.into();
        Self {
            id: crate::generate_id(),
            name: format!("{method} {url}"),
            url,
            method,
            headers: RequestHeaders::new(),
            body: String::new(),
            created_at: now,
            last_used: now,
            collections: Vec::new(),
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the headers.
    #[must_use]
    pub fn with_headers(mut self, headers: RequestHeaders) -> Self {
        self.headers = headers;
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Returns true if both items share the `(url, method)` key.
    #[must_use]
    pub fn same_target(&self, other: &Self) -> bool {
        self.method == other.method && self.url == other.url
    }
}
