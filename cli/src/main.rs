//! culprit - binary entry point.
//!
//! ```text
//! main() -> Cli::parse -> CulpritConfig::load -> Cli::into_plan -> RunPlan
//!        -> ShellProbe + Reporter -> run_search -> print_outcome
//! ```
//!
//! Progress goes to stderr so stdout carries only the verdict.

mod args;
mod report;

use std::io::{self, IsTerminal};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use culprit_config::CulpritConfig;
use culprit_core::run_search;
use culprit_tools::ShellProbe;

use crate::args::{Cli, RunPlan};
use crate::report::{Reporter, print_outcome};

fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(io::stderr().is_terminal()),
        )
        .with(env_filter)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = CulpritConfig::load(cli.config.as_deref()).context("loading config")?;
    let RunPlan {
        endpoints,
        options,
        shell,
        script,
        settings,
        mapping,
        quiet,
    } = cli.into_plan(config)?;

    tracing::debug!(shell = %shell.name, %script, "resolved probe command");

    let mut reporter = Reporter::new(io::stderr(), quiet);
    reporter.line(format_args!(
        "Using {} as GOOD, using {} as BAD",
        endpoints.good(),
        endpoints.bad()
    ));

    let mut probe = ShellProbe::new(shell, script, settings);
    if let Some(mapping) = mapping {
        probe = probe.with_mapping(mapping);
    }

    let report = run_search(endpoints, options, &mut probe, &mut reporter).await?;

    let mut stdout = io::stdout().lock();
    print_outcome(&mut stdout, &report.outcome, probe.mapping())
        .context("writing result")?;
    reporter.finish(&report);
    Ok(())
}
