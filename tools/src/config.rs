//! Configuration types used by the probe invoker.
//!
//! These live here rather than in `culprit-config` so the invoker can be
//! built and tested without the config file layer.

use std::time::Duration;

use serde::Deserialize;

/// Default name of the environment variable carrying the probe value.
pub const DEFAULT_PROBE_ENV: &str = "PROBE";

/// Shell configuration for probe execution.
///
/// ```toml
/// [shell]
/// binary = "/bin/bash"
/// args = ["-c"]
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShellConfig {
    /// Override shell binary (e.g., "bash", "pwsh", "/usr/local/bin/fish").
    pub binary: Option<String>,
    /// Override shell args (e.g., `["-c"]` or `["/C"]`).
    pub args: Option<Vec<String>>,
}

/// How each probe is run, beyond the shell and the script.
#[derive(Debug, Clone)]
pub struct ProbeSettings {
    /// Environment variable receiving the probe value. `None` disables injection.
    pub env_var: Option<String>,
    /// Working-directory template; `$PROBE` / `${PROBE}` expand to the probe value.
    pub chdir: Option<String>,
    /// Mirror probe stdout/stderr to our stderr.
    pub echo: bool,
    /// Print each executed script (and directory) to stderr.
    pub log: bool,
    /// Kill the probe and fail the search if it runs longer than this.
    pub timeout: Option<Duration>,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            env_var: Some(DEFAULT_PROBE_ENV.to_string()),
            chdir: None,
            echo: false,
            log: false,
            timeout: None,
        }
    }
}

impl ProbeSettings {
    /// Set the environment variable name; an empty name disables injection.
    pub fn with_env_var(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.env_var = (!name.trim().is_empty()).then_some(name);
        self
    }
}
