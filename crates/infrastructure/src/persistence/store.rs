//! JSON-file backed store for settings, history, collections and environments.
//!
//! All four files live in one directory and are rewritten in full after every
//! mutation. A single `RwLock` guards the in-memory state: mutations hold the
//! write lock across the file write, so no reader sees memory ahead of disk.
//! A failed write is returned to the caller and the in-memory change stays.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use courier_application::ports::{Clock, RequestStore, StoreError};
use courier_domain::{AppConfig, Collection, Environment, RequestHistory, RequestItem};
use parking_lot::RwLock;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::paths::{COLLECTIONS_FILE, CONFIG_FILE, ENVIRONMENTS_FILE, HISTORY_FILE};
use crate::adapters::SystemClock;
use crate::serialization::{from_json_bytes, to_json_stable_bytes};

#[derive(Debug, Default)]
struct StoreState {
    config: AppConfig,
    history: RequestHistory,
    collections: BTreeMap<String, Collection>,
    environments: BTreeMap<String, Environment>,
}

/// The persistent store.
#[derive(Debug)]
pub struct JsonStore<C = SystemClock> {
    dir: PathBuf,
    state: RwLock<StoreState>,
    clock: C,
}

impl JsonStore<SystemClock> {
    /// Opens the store in `dir` using the system clock.
    ///
    /// # Errors
    ///
    /// See [`JsonStore::open_with_clock`].
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        Self::open_with_clock(dir, SystemClock::new())
    }
}

impl<C: Clock> JsonStore<C> {
    /// Opens the store in `dir`.
    ///
    /// Creates the directory if needed, then loads each file. Missing files
    /// are seeded with defaults and written immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or a file cannot
    /// be read, decoded or written.
    pub fn open_with_clock(dir: impl Into<PathBuf>, clock: C) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        let state = StoreState {
            config: load_or_seed(&dir.join(CONFIG_FILE), AppConfig::default)?,
            history: load_or_seed(&dir.join(HISTORY_FILE), RequestHistory::new)?,
            collections: load_or_seed(&dir.join(COLLECTIONS_FILE), BTreeMap::new)?,
            environments: load_or_seed(&dir.join(ENVIRONMENTS_FILE), Environment::seed_defaults)?,
        };
        debug!(
            dir = %dir.display(),
            history = state.history.len(),
            collections = state.collections.len(),
            environments = state.environments.len(),
            "store opened"
        );

        Ok(Self {
            dir,
            state: RwLock::new(state),
            clock,
        })
    }

    /// Returns a copy of the settings.
    #[must_use]
    pub fn config(&self) -> AppConfig {
        self.state.read().config.clone()
    }

    /// Returns a copy of the history, newest first.
    #[must_use]
    pub fn history(&self) -> Vec<RequestItem> {
        self.state.read().history.entries().iter().cloned().collect()
    }

    /// Returns a copy of all collections keyed by name.
    #[must_use]
    pub fn collections(&self) -> BTreeMap<String, Collection> {
        self.state.read().collections.clone()
    }

    /// Returns a copy of all environments keyed by name.
    #[must_use]
    pub fn environments(&self) -> BTreeMap<String, Environment> {
        self.state.read().environments.clone()
    }

    /// Returns the environment names in sorted order.
    #[must_use]
    pub fn available_environments(&self) -> Vec<String> {
        self.state.read().environments.keys().cloned().collect()
    }

    /// Returns the active environment.
    ///
    /// A stale `current_env` yields one of the stored environments and an
    /// empty store yields an empty environment. Which environment is picked
    /// is not part of the contract: it is currently the first by name, but
    /// callers should treat it as arbitrary.
    #[must_use]
    pub fn current_environment(&self) -> Environment {
        let state = self.state.read();
        state
            .environments
            .get(&state.config.current_env)
            .or_else(|| state.environments.values().next())
            .cloned()
            .unwrap_or_default()
    }

    /// Records a sent request in history.
    ///
    /// Does nothing when history saving is turned off.
    ///
    /// # Errors
    ///
    /// Returns an error if the history file cannot be written.
    pub fn record_history(&self, item: RequestItem) -> Result<(), StoreError> {
        let mut state = self.state.write();
        if !state.config.save_history {
            return Ok(());
        }

        let limit = state.config.history_limit;
        state.history.record(item, self.clock.now(), limit);
        self.persist(HISTORY_FILE, &state.history)
    }

    /// Inserts or replaces a request in a collection, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the collections file cannot be written.
    pub fn upsert_collection_request(
        &self,
        collection: &str,
        item: RequestItem,
    ) -> Result<(), StoreError> {
        let mut state = self.state.write();
        state
            .collections
            .entry(collection.to_string())
            .or_insert_with(|| Collection::new(collection))
            .upsert(item);
        self.persist(COLLECTIONS_FILE, &state.collections)
    }

    /// Makes `name` the active environment.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no such environment exists, or an
    /// error if the settings file cannot be written.
    pub fn set_current_environment(&self, name: &str) -> Result<(), StoreError> {
        let mut state = self.state.write();
        if !state.environments.contains_key(name) {
            return Err(StoreError::NotFound(name.to_string()));
        }

        state.config.current_env = name.to_string();
        self.persist(CONFIG_FILE, &state.config)
    }

    /// Adds or replaces an environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the environments file cannot be written.
    pub fn upsert_environment(&self, environment: Environment) -> Result<(), StoreError> {
        let mut state = self.state.write();
        state
            .environments
            .insert(environment.name.clone(), environment);
        self.persist(ENVIRONMENTS_FILE, &state.environments)
    }

    /// Applies `update` to the settings and persists them.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings file cannot be written.
    pub fn update_config(&self, update: impl FnOnce(&mut AppConfig)) -> Result<(), StoreError> {
        let mut state = self.state.write();
        update(&mut state.config);
        self.persist(CONFIG_FILE, &state.config)
    }

    /// History entries whose URL contains `needle`.
    #[must_use]
    pub fn find_history_by_url(&self, needle: &str) -> Vec<RequestItem> {
        self.state.read().history.find_by_url(needle)
    }

    /// History entries whose method matches `method`, ignoring case.
    #[must_use]
    pub fn find_history_by_method(&self, method: &str) -> Vec<RequestItem> {
        self.state.read().history.find_by_method(method)
    }

    /// Collections whose name contains `needle`, ignoring case.
    #[must_use]
    pub fn find_collections_by_name(&self, needle: &str) -> Vec<Collection> {
        let needle = needle.to_lowercase();
        self.state
            .read()
            .collections
            .values()
            .filter(|c| c.name.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    /// Requests across all collections matching both filters.
    ///
    /// An empty `url_needle` or `method` matches everything.
    #[must_use]
    pub fn find_requests_in_collections(&self, url_needle: &str, method: &str) -> Vec<RequestItem> {
        self.state
            .read()
            .collections
            .values()
            .flat_map(|c| c.requests.iter())
            .filter(|r| url_needle.is_empty() || r.url.contains(url_needle))
            .filter(|r| method.is_empty() || r.method.matches_name(method))
            .cloned()
            .collect()
    }

    // Callers hold the write lock.
    fn persist<T: Serialize + ?Sized>(&self, file: &str, value: &T) -> Result<(), StoreError> {
        write_json(&self.dir.join(file), value)
    }
}

impl<C: Clock> RequestStore for JsonStore<C> {
    fn config(&self) -> AppConfig {
        Self::config(self)
    }

    fn current_environment(&self) -> Environment {
        Self::current_environment(self)
    }

    fn record_history(&self, item: RequestItem) -> Result<(), StoreError> {
        Self::record_history(self, item)
    }

    fn upsert_collection_request(
        &self,
        collection: &str,
        item: RequestItem,
    ) -> Result<(), StoreError> {
        Self::upsert_collection_request(self, collection, item)
    }
}

fn load_or_seed<T>(path: &Path, seed: impl FnOnce() -> T) -> Result<T, StoreError>
where
    T: Serialize + DeserializeOwned,
{
    match fs::read(path) {
        Ok(bytes) => {
            debug!(path = %path.display(), "loading store file");
            Ok(from_json_bytes(&bytes)?)
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "seeding store file");
            let value = seed();
            write_json(path, &value)?;
            Ok(value)
        }
        Err(err) => Err(err.into()),
    }
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    let bytes = to_json_stable_bytes(value)?;
    fs::write(path, bytes)?;
    Ok(())
}
