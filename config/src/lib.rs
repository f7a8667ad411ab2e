//! Configuration file for culprit.
//!
//! Read from `~/.culprit/config.toml` (or an explicit path). Every field is
//! optional; command-line flags override whatever is set here.
//!
//! ```toml
//! [search]
//! verify = true
//! bracket = false
//! max_bracket = 0
//!
//! [probe]
//! env = "PROBE"
//! chdir = "/src/worktrees/$PROBE"
//! echo = false
//! log = false
//! timeout_secs = 600
//!
//! [shell]
//! binary = "/bin/bash"
//! args = ["-c"]
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

pub use culprit_tools::ShellConfig;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CulpritConfig {
    pub search: Option<SearchConfig>,
    pub probe: Option<ProbeConfig>,
    pub shell: Option<ShellConfig>,
}

/// Search defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchConfig {
    /// Verify the starting endpoints. Unset means the built-in default (on).
    pub verify: Option<bool>,
    /// Bracket an unknown (0) endpoint.
    pub bracket: Option<bool>,
    /// Maximum bracketing value; 0 is unbounded.
    pub max_bracket: Option<u64>,
}

/// Probe execution defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProbeConfig {
    /// Environment variable carrying the probe value; "" disables it.
    pub env: Option<String>,
    /// Working-directory template (`$PROBE` is replaced).
    pub chdir: Option<String>,
    pub echo: Option<bool>,
    pub log: Option<bool>,
    /// Per-probe timeout in seconds; 0 or unset means none.
    pub timeout_secs: Option<u64>,
}

impl ProbeConfig {
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

impl CulpritConfig {
    /// Load the config.
    ///
    /// With an explicit path the file must exist. Without one, the default
    /// path is used and a missing file yields `Ok(None)`.
    pub fn load(explicit: Option<&Path>) -> Result<Option<Self>, ConfigError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match config_path() {
                Some(path) if path.exists() => path,
                _ => return Ok(None),
            },
        };
        Self::load_from(&path).map(Some)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };
        Self::parse(&content).map_err(|source| {
            tracing::warn!("Failed to parse config at {:?}: {}", path, source);
            ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

#[must_use]
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".culprit").join("config.toml"))
}
