//! Engine Configuration
//!
//! Process-wide defaults loaded once at startup, independent of any one
//! macro's variables: initial system-variable overrides, the unknown-command
//! policy, and the download-timeout floor. `serde`-derived and loadable from
//! TOML via the `toml` crate, the way the reference crate's dependency table
//! carries `toml`/`serde_json` for structured data even though its own
//! interpreter has no persistent config file of its own.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unknown commands are skipped with a warning by default, matching the
/// legacy engine; set `fail_on_unknown_command = true` to treat them as
/// `INVALID_PARAMETER` instead (see DESIGN.md for the Open Question this
/// resolves).
fn default_fail_on_unknown() -> bool {
    false
}

/// `max(4, 4 * !TIMEOUT_TAG)` per the Download Timeout Manager contract;
/// configurable so a deployment can raise the floor without touching macros.
fn default_download_timeout_floor_secs() -> u64 {
    4
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub initial_variables: HashMap<String, String>,
    #[serde(default = "default_fail_on_unknown")]
    pub fail_on_unknown_command: bool,
    #[serde(default = "default_download_timeout_floor_secs")]
    pub download_timeout_floor_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            initial_variables: HashMap::new(),
            fail_on_unknown_command: default_fail_on_unknown(),
            download_timeout_floor_secs: default_download_timeout_floor_secs(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io { path: String, source: std::io::Error },

    #[error("failed to parse config file {path}: {source}")]
    Parse { path: String, source: toml::de::Error },
}

impl EngineConfig {
    /// Loads and merges a TOML config file over the defaults. Missing
    /// fields in the file fall back to `EngineConfig::default()` via serde's
    /// per-field defaults above.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse_toml(&text, path)
    }

    fn parse_toml(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse { path: path.display().to_string(), source })
    }
}
