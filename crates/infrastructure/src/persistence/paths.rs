//! Configuration directory resolution.
//!
//! The store lives in one per-user directory:
//! - `$COURIER_CONFIG_DIR` when set and non-empty
//! - otherwise `<platform config dir>/courier`
//!   (`~/.config/courier` on Linux, `~/Library/Application Support/courier`
//!   on macOS, `%APPDATA%\courier` on Windows)

use std::ffi::OsString;
use std::path::PathBuf;

use courier_application::ports::StoreError;

/// Environment variable that overrides the configuration directory.
pub const CONFIG_DIR_ENV: &str = "COURIER_CONFIG_DIR";

/// Directory name under the platform configuration directory.
pub const APP_DIR_NAME: &str = "courier";

/// Settings file name.
pub const CONFIG_FILE: &str = "config.json";
/// History file name.
pub const HISTORY_FILE: &str = "history.json";
/// Collections file name.
pub const COLLECTIONS_FILE: &str = "collections.json";
/// Environments file name.
pub const ENVIRONMENTS_FILE: &str = "environments.json";

/// Returns the configuration directory for this process.
///
/// # Errors
///
/// Returns [`StoreError::NoConfigDir`] if neither the override nor the
/// platform directory is available.
pub fn config_dir() -> Result<PathBuf, StoreError> {
    resolve_config_dir(std::env::var_os(CONFIG_DIR_ENV), dirs::config_dir())
}

/// Picks the override when it is non-empty, else `<base>/courier`.
///
/// # Errors
///
/// Returns [`StoreError::NoConfigDir`] if both are missing.
pub fn resolve_config_dir(
    override_dir: Option<OsString>,
    platform_dir: Option<PathBuf>,
) -> Result<PathBuf, StoreError> {
    if let Some(dir) = override_dir.filter(|dir| !dir.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    platform_dir
        .map(|base| base.join(APP_DIR_NAME))
        .ok_or(StoreError::NoConfigDir)
}
