//! Application settings.
//!
//! Persisted as `config.json`; every key falls back to its default when the
//! file omits it.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::history::DEFAULT_HISTORY_LIMIT;

/// Timeout used when the configured one is zero or negative.
pub const FALLBACK_TIMEOUT: Duration = Duration::from_secs(5);

/// Process-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Color theme name.
    #[serde(default = "default_theme")]
    pub theme: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: i64,

    /// Maximum number of history entries to keep.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Pretty-print JSON responses.
    #[serde(default = "default_true")]
    pub auto_format_json: bool,

    /// Record sent requests in history.
    #[serde(default = "default_true")]
    pub save_history: bool,

    /// Name of the active environment.
    #[serde(default)]
    pub current_env: String,

    /// Show elapsed time next to responses.
    #[serde(default = "default_true")]
    pub show_response_time: bool,

    /// Response truncation threshold in characters.
    #[serde(default = "default_truncate_response")]
    pub truncate_response: usize,

    /// Syntax-highlight response bodies.
    #[serde(default = "default_true")]
    pub syntax_highlighting: bool,
}

fn default_theme() -> String {
    "dark".to_string()
}

const fn default_timeout() -> i64 {
    30
}

const fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

const fn default_true() -> bool {
    true
}

const fn default_truncate_response() -> usize {
    1000
}

impl AppConfig {
    /// Returns the effective request timeout.
    ///
    /// Falls back to [`FALLBACK_TIMEOUT`] when the setting is not positive.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        u64::try_from(self.timeout)
            .ok()
            .filter(|secs| *secs > 0)
            .map_or(FALLBACK_TIMEOUT, Duration::from_secs)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            timeout: default_timeout(),
            history_limit: default_history_limit(),
            auto_format_json: true,
            save_history: true,
            current_env: String::new(),
            show_response_time: true,
            truncate_response: default_truncate_response(),
            syntax_highlighting: true,
        }
    }
}
