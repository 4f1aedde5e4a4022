//! Request store port
//!
//! The slice of persistent state the request flow needs: a configuration
//! snapshot, the current environment and the two write paths.

use courier_domain::{AppConfig, Environment, RequestItem};
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing a backing file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A backing file could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The named entity does not exist.
    #[error("environment {0} not found")]
    NotFound(String),

    /// No configuration directory could be determined.
    #[error("could not determine configuration directory")]
    NoConfigDir,
}

/// Port for the persistent store.
///
/// Reads return owned snapshots so callers never hold the store's lock.
pub trait RequestStore: Send + Sync {
    /// Returns a copy of the current configuration.
    fn config(&self) -> AppConfig;

    /// Returns a copy of the current environment.
    fn current_environment(&self) -> Environment;

    /// Records a sent request in history and persists it.
    ///
    /// # Errors
    ///
    /// Returns an error if the history file cannot be written.
    fn record_history(&self, item: RequestItem) -> Result<(), StoreError>;

    /// Inserts or replaces a request in the named collection and persists it.
    ///
    /// # Errors
    ///
    /// Returns an error if the collections file cannot be written.
    fn upsert_collection_request(&self, collection: &str, item: RequestItem)
    -> Result<(), StoreError>;
}
