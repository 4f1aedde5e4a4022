//! File persistence for the store.

pub mod paths;
mod store;

pub use paths::{
    CONFIG_DIR_ENV, COLLECTIONS_FILE, CONFIG_FILE, ENVIRONMENTS_FILE, HISTORY_FILE, config_dir,
    resolve_config_dir,
};
pub use store::JsonStore;
