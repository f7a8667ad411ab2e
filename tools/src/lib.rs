//! Probe invoker for culprit.
//!
//! Turns an index into a shell command, runs it, and maps its exit status to
//! GOOD/BAD. Failing to run the command at all is a [`ProbeError`], never BAD.
//!
//! [`ProbeError`]: culprit_types::ProbeError

pub mod config;
pub mod mapping;
pub mod process;
pub mod runner;
pub mod shell;
pub mod template;

pub use config::{DEFAULT_PROBE_ENV, ProbeSettings, ShellConfig};
pub use mapping::{MappingError, ProbeMapping};
pub use runner::{ExitOutcome, ShellProbe};
pub use shell::{DetectedShell, detect_shell};
pub use template::expand_probe_template;
