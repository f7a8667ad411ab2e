//! Command-line surface and its merge with the config file.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use culprit_config::CulpritConfig;
use culprit_core::SearchOptions;
use culprit_tools::{DetectedShell, ProbeMapping, ProbeSettings, ShellConfig, detect_shell};
use culprit_types::Endpoints;

const LONG_ABOUT: &str = "\
Given a pair of integer values representing points in a sequence of states
between which a change in status occurs from working (GOOD) to non-working
(BAD) or vice versa, culprit performs a binary search by invoking the given
script for each probe value. If the script exits 0 the probe is GOOD;
otherwise it is BAD. The search ends when adjacent values are found that
bracket the GOOD/BAD divide.

At least one of --good and --bad must be positive. By default culprit probes
between the two values. With --bracket, if one of the values is 0, culprit
first probes upward from the other value to find a bracketing value.

The probe value is exported to the script in the environment variable named
by --env (PROBE by default). With --cd, the script runs in that directory,
with $PROBE in the path replaced by the probe value. With --probes, index N
selects line N of the given file as the probe value.";

#[derive(Debug, Parser)]
#[command(name = "culprit", version, about = "Binary search for the point where a script's status flips")]
#[command(long_about = LONG_ABOUT)]
pub struct Cli {
    /// Value known to be good (0 to bracket)
    #[arg(long, default_value_t = 0, allow_negative_numbers = true, value_name = "N")]
    pub good: i64,

    /// Value known to be bad (0 to bracket)
    #[arg(long, default_value_t = 0, allow_negative_numbers = true, value_name = "N")]
    pub bad: i64,

    /// Search upward for a bracketing value when one endpoint is 0
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub bracket: Option<bool>,

    /// Maximum bracketing value (0 = unbounded)
    #[arg(long, value_name = "N")]
    pub bmax: Option<u64>,

    /// Verify the starting points as assigned [default: true]
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub verify: Option<bool>,

    /// Echo probe command output to stderr
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub echo: Option<bool>,

    /// Log probe commands as executed to stderr
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub log: Option<bool>,

    /// Run each probe in this directory ($PROBE is replaced by the probe value)
    #[arg(long = "cd", value_name = "DIR")]
    pub chdir: Option<String>,

    /// Variable with the probe value in the script environment ("" to disable)
    #[arg(long, value_name = "NAME")]
    pub env: Option<String>,

    /// Shell used to run the script [default: /bin/sh]
    #[arg(long, value_name = "PATH")]
    pub shell: Option<String>,

    /// File listing one probe value per line; index N selects line N
    #[arg(long, value_name = "FILE")]
    pub probes: Option<PathBuf>,

    /// Kill a probe and abort the search after this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Config file [default: ~/.culprit/config.toml]
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Suppress progress output on stderr
    #[arg(short, long)]
    pub quiet: bool,

    /// Script to run for each probe (words are joined with spaces)
    #[arg(
        required = true,
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_name = "SCRIPT"
    )]
    pub script: Vec<String>,
}

/// Everything a run needs, after flags and config are merged.
#[derive(Debug)]
pub struct RunPlan {
    pub endpoints: Endpoints,
    pub options: SearchOptions,
    pub shell: DetectedShell,
    pub script: String,
    pub settings: ProbeSettings,
    pub mapping: Option<ProbeMapping>,
    pub quiet: bool,
}

impl Cli {
    /// Merge with the config file: flags win, then the file, then built-in defaults.
    pub fn into_plan(self, config: Option<CulpritConfig>) -> Result<RunPlan> {
        let config = config.unwrap_or_default();
        let search = config.search.unwrap_or_default();
        let probe = config.probe.unwrap_or_default();

        let mapping = self
            .probes
            .as_deref()
            .map(ProbeMapping::load)
            .transpose()
            .context("loading probe list")?;

        let (good, bad) = match &mapping {
            Some(mapping) if self.good == 0 && self.bad == 0 => {
                if mapping.len() < 2 {
                    bail!(
                        "probe list has {} entry; at least 2 are needed to pick default GOOD and BAD values",
                        mapping.len()
                    );
                }
                let last = i64::try_from(mapping.last_index()).context("probe list too long")?;
                (1, last)
            }
            _ => (self.good, self.bad),
        };
        let endpoints = Endpoints::new(good, bad)?;

        // Without an explicit bound, bracketing stops at the end of the probe list.
        let max_bracket = self
            .bmax
            .or(search.max_bracket)
            .or_else(|| mapping.as_ref().map(ProbeMapping::last_index))
            .unwrap_or(0);
        let options = SearchOptions {
            verify: self.verify.or(search.verify).unwrap_or(true),
            bracket: self.bracket.or(search.bracket).unwrap_or(false),
            max_bracket: None,
        }
        .with_max_bracket(max_bracket);

        let shell_config = match self.shell {
            Some(binary) => Some(ShellConfig {
                binary: Some(binary),
                args: None,
            }),
            None => config.shell,
        };
        let shell = detect_shell(shell_config.as_ref());

        let timeout = match self.timeout {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => probe.timeout(),
        };
        let mut settings = ProbeSettings {
            chdir: self.chdir.or(probe.chdir),
            echo: self.echo.or(probe.echo).unwrap_or(false),
            log: self.log.or(probe.log).unwrap_or(false),
            timeout,
            ..ProbeSettings::default()
        };
        if let Some(name) = self.env.or(probe.env) {
            settings = settings.with_env_var(name);
        }

        Ok(RunPlan {
            endpoints,
            options,
            shell,
            script: self.script.join(" "),
            settings,
            mapping,
            quiet: self.quiet,
        })
    }
}
