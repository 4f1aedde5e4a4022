//! Request History Domain Model
//!
//! Tracks sent requests, most recently used first, with one entry per
//! `(url, method)` pair.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::request::RequestItem;

/// Default maximum number of history entries.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Request history, newest first.
///
/// Serialized as a plain JSON array of [`RequestItem`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestHistory {
    entries: VecDeque<RequestItem>,
}

impl RequestHistory {
    /// Creates a new empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a sent request, then trims to `limit` entries.
    ///
    /// If an entry with the same `(url, method)` exists, only its
    /// `last_used` is refreshed and it moves to the front. Otherwise the item
    /// is stamped with `now` and prepended. `last_used` never moves backwards
    /// for a given pair.
    pub fn record(&mut self, mut item: RequestItem, now: DateTime<Utc>, limit: usize) {
        if let Some(pos) = self.entries.iter().position(|e| e.same_target(&item)) {
            if let Some(mut existing) = self.entries.remove(pos) {
                existing.last_used = now.max(existing.last_used);
                self.entries.push_front(existing);
            }
        } else {
            item.created_at = now;
            item.last_used = now;
            self.entries.push_front(item);
        }

        self.truncate(limit);
    }

    /// Drops the oldest entries beyond `limit`.
    pub fn truncate(&mut self, limit: usize) {
        self.entries.truncate(limit);
    }

    /// Returns all entries (newest first).
    #[must_use]
    pub fn entries(&self) -> &VecDeque<RequestItem> {
        &self.entries
    }

    /// Returns the entries whose URL contains `needle`.
    #[must_use]
    pub fn find_by_url(&self, needle: &str) -> Vec<RequestItem> {
        self.entries
            .iter()
            .filter(|e| e.url.contains(needle))
            .cloned()
            .collect()
    }

    /// Returns the entries whose method equals `method`, ignoring case.
    #[must_use]
    pub fn find_by_method(&self, method: &str) -> Vec<RequestItem> {
        self.entries
            .iter()
            .filter(|e| e.method.matches_name(method))
            .cloned()
            .collect()
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if history is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
