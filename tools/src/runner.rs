//! `ShellProbe`: runs the probe script through a shell once per index.
//!
//! ```text
//! index -> ProbeMapping / decimal -> probe value
//!       -> $PROBE env + chdir template -> <shell> <args> <script>
//!       -> exit 0 = GOOD, other exit = BAD, spawn/wait/timeout failure = ProbeError
//! ```

use std::io;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Instant;

use culprit_core::{Probe, ProbeFut};
use culprit_types::{Index, ProbeError, ProbeReport, Status};
use tokio::process::Command;

use crate::config::ProbeSettings;
use crate::mapping::ProbeMapping;
use crate::process::ChildGuard;
use crate::shell::DetectedShell;
use crate::template::expand_probe_template;

/// How a probe process finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitOutcome {
    /// Exited with code 0.
    pub success: bool,
    /// Exit code, if the process exited normally (not by signal).
    pub code: Option<i32>,
}

impl ExitOutcome {
    #[must_use]
    pub fn status(self) -> Status {
        Status::from_success(self.success)
    }
}

pub struct ShellProbe {
    shell: DetectedShell,
    script: String,
    settings: ProbeSettings,
    mapping: Option<ProbeMapping>,
}

impl ShellProbe {
    pub fn new(shell: DetectedShell, script: impl Into<String>, settings: ProbeSettings) -> Self {
        Self {
            shell,
            script: script.into(),
            settings,
            mapping: None,
        }
    }

    pub fn with_mapping(mut self, mapping: ProbeMapping) -> Self {
        self.mapping = Some(mapping);
        self
    }

    #[must_use]
    pub fn mapping(&self) -> Option<&ProbeMapping> {
        self.mapping.as_ref()
    }

    /// Probe value for an index: the mapped entry, or the decimal index.
    pub fn resolve(&self, index: Index) -> Result<String, ProbeError> {
        match &self.mapping {
            Some(mapping) => mapping.resolve(index).map(ToString::to_string),
            None => Ok(index.to_string()),
        }
    }

    /// Working directory for a probe value, if a template is configured.
    #[must_use]
    pub fn working_dir(&self, value: &str) -> Option<PathBuf> {
        self.settings
            .chdir
            .as_deref()
            .map(|template| PathBuf::from(expand_probe_template(template, value)))
    }

    fn command(&self, value: &str) -> Command {
        let mut command = Command::new(&self.shell.binary);
        command.args(&self.shell.args).arg(&self.script);
        command.stdin(Stdio::null());

        if self.settings.echo {
            command
                .stdout(Stdio::from(io::stderr()))
                .stderr(Stdio::from(io::stderr()));
        } else {
            command.stdout(Stdio::null()).stderr(Stdio::null());
        }

        if let Some(name) = &self.settings.env_var {
            command.env(name, value);
        }

        if self.settings.log {
            eprintln!("SCRIPT :: {}", self.script);
        }
        if let Some(dir) = self.working_dir(value) {
            if self.settings.log {
                eprintln!("CHDIR :: {}", dir.display());
            }
            command.current_dir(dir);
        }

        #[cfg(unix)]
        crate::process::set_new_session(&mut command);

        command
    }

    /// Run the script once with `value` and wait for it to finish.
    pub async fn run(&self, index: Index, value: &str) -> Result<ExitOutcome, ProbeError> {
        let mut command = self.command(value);
        let child = command.spawn().map_err(|source| ProbeError::Spawn {
            program: self.shell.binary.clone(),
            source,
        })?;
        let mut guard = ChildGuard::new(child);

        let waited = match self.settings.timeout {
            Some(limit) => match tokio::time::timeout(limit, guard.wait()).await {
                Ok(waited) => waited,
                Err(_) => {
                    tracing::warn!(index, value, ?limit, "probe timed out; killing it");
                    return Err(ProbeError::TimedOut {
                        index,
                        elapsed: limit,
                    });
                }
            },
            None => guard.wait().await,
        };
        let status = waited.map_err(|source| ProbeError::Wait { index, source })?;
        guard.disarm();

        tracing::trace!(index, value, code = ?status.code(), "probe exited");
        Ok(ExitOutcome {
            success: status.success(),
            code: status.code(),
        })
    }
}

impl Probe for ShellProbe {
    fn invoke(&mut self, index: Index) -> ProbeFut<'_> {
        Box::pin(async move {
            let start = Instant::now();
            let value = self.resolve(index)?;
            let exit = self.run(index, &value).await?;
            Ok(ProbeReport {
                index,
                value,
                status: exit.status(),
                elapsed: start.elapsed(),
            })
        })
    }
}
