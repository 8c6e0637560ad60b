//! Runtime configuration for the discovery stack.
//!
//! Values come from three layers, later ones winning: built-in defaults, an
//! optional TOML file, and environment variables. The environment is read
//! through a lookup function so tests never touch process state.

use crate::announcement::adapters::DispatchMode;
use crate::freshness::{DEFAULT_DISCOVERY_LOG_CAPACITY, DEFAULT_FRESHNESS_SECS, FreshnessWindow};
use crate::routing::services::DEFAULT_SELF_ANNOUNCE_EVERY;
use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable overriding [`DiscoveryConfig::freshness_window_secs`].
pub const ENV_FRESHNESS_SECS: &str = "HERALD_FRESHNESS_SECS";
/// Environment variable overriding [`DiscoveryConfig::dispatch`].
pub const ENV_DISPATCH: &str = "HERALD_DISPATCH";
/// Environment variable overriding [`DiscoveryConfig::quiet`].
pub const ENV_QUIET: &str = "HERALD_QUIET";
/// Legacy quiet switch; `QUIET_MODE=1` enables quiet mode.
pub const ENV_LEGACY_QUIET: &str = "QUIET_MODE";

/// Default name the router announces itself under.
pub const DEFAULT_ROUTER_NAME: &str = "Discovery Router";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// Path that failed.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// An environment override holds an unusable value.
    #[error("invalid value for {key}: {reason}")]
    InvalidEnv {
        /// Environment variable name.
        key: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Discovery stack settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Seconds within which an announcement counts as fresh.
    pub freshness_window_secs: u64,
    /// How listeners are invoked after an announcement.
    pub dispatch: DispatchMode,
    /// Number of discovery events retained by the tracker.
    pub discovery_log_capacity: usize,
    /// Name the router announces itself under and excludes from routing.
    pub router_name: String,
    /// Whether the hub announces the registry and router at start-up.
    pub announce_on_start: bool,
    /// Foreign announcements between router re-announcements; zero
    /// disables them.
    pub self_announce_every: usize,
    /// Demotes per-announcement logging from `info` to `debug`.
    pub quiet: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            freshness_window_secs: DEFAULT_FRESHNESS_SECS,
            dispatch: DispatchMode::Auto,
            discovery_log_capacity: DEFAULT_DISCOVERY_LOG_CAPACITY,
            router_name: DEFAULT_ROUTER_NAME.to_owned(),
            announce_on_start: true,
            self_announce_every: DEFAULT_SELF_ANNOUNCE_EVERY,
            quiet: false,
        }
    }
}

impl DiscoveryConfig {
    /// Creates a configuration for tests: inline dispatch, no router
    /// self-announcements, quiet logging.
    #[must_use]
    pub fn for_tests() -> Self {
        Self {
            dispatch: DispatchMode::Inline,
            announce_on_start: false,
            self_announce_every: 0,
            quiet: true,
            ..Self::default()
        }
    }

    /// Returns the freshness window.
    #[must_use]
    pub fn freshness_window(&self) -> FreshnessWindow {
        FreshnessWindow::from_secs(self.freshness_window_secs)
    }

    /// Parses a TOML document; missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the document is invalid.
    pub fn from_toml_str(document: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(document)?)
    }

    /// Loads a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file cannot be read and
    /// [`ConfigError::Parse`] when it is invalid.
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let contents = read_utf8_file(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Applies environment overrides read through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnv`] when an override cannot be parsed.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_FRESHNESS_SECS) {
            self.freshness_window_secs =
                value
                    .trim()
                    .parse()
                    .map_err(|err: std::num::ParseIntError| ConfigError::InvalidEnv {
                        key: ENV_FRESHNESS_SECS,
                        reason: err.to_string(),
                    })?;
        }
        if let Some(value) = lookup(ENV_DISPATCH) {
            self.dispatch = DispatchMode::try_from(value.as_str())
                .map_err(|reason| ConfigError::InvalidEnv {
                    key: ENV_DISPATCH,
                    reason,
                })?;
        }
        if lookup(ENV_LEGACY_QUIET).is_some_and(|value| value.trim() == "1") {
            self.quiet = true;
        }
        if let Some(value) = lookup(ENV_QUIET) {
            self.quiet = parse_flag(&value).ok_or_else(|| ConfigError::InvalidEnv {
                key: ENV_QUIET,
                reason: format!("expected a boolean, got '{value}'"),
            })?;
        }
        Ok(self)
    }

    /// Applies overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnv`] when an override cannot be parsed.
    pub fn with_process_env(self) -> Result<Self, ConfigError> {
        self.with_env_overrides(|key| std::env::var(key).ok())
    }
}

/// Reads a UTF-8 file through a capability handle on its parent directory.
///
/// # Errors
///
/// Returns an I/O error when the path has no file name, the directory
/// cannot be opened, or the file cannot be read.
pub fn read_utf8_file(path: &Utf8Path) -> std::io::Result<String> {
    let file_name = path
        .file_name()
        .ok_or_else(|| std::io::Error::other(format!("{path} does not name a file")))?;
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let dir = Dir::open_ambient_dir(parent, ambient_authority())?;
    dir.read_to_string(file_name)
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
