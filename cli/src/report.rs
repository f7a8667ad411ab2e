//! Human-facing output: progress lines on stderr, the verdict on stdout.

use std::fmt;
use std::io::{self, Write};

use culprit_core::{SearchEvent, SearchObserver, SearchOutcome, SearchReport};
use culprit_tools::ProbeMapping;
use culprit_types::{Boundary, ProbeReport};

/// Writes one progress line per search event.
pub struct Reporter<W: Write> {
    out: W,
    quiet: bool,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, quiet: bool) -> Self {
        Self { out, quiet }
    }

    pub fn line(&mut self, args: fmt::Arguments<'_>) {
        if self.quiet {
            return;
        }
        // Progress output is best-effort; a closed stderr must not fail the search.
        let _ = writeln!(self.out, "{args}");
    }

    pub fn finish(&mut self, report: &SearchReport) {
        self.line(format_args!(
            "{} probes; total time elapsed: {:?}",
            report.probes, report.elapsed
        ));
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn probed(&mut self, report: &ProbeReport) {
        let shown = if report.value == report.index.to_string() {
            report.index.to_string()
        } else {
            format!("{} ({})", report.index, report.value)
        };
        self.line(format_args!(
            " {} {shown} is {}\t[{:?} elapsed]",
            report.status.mark(),
            report.status,
            report.elapsed
        ));
    }
}

impl<W: Write> SearchObserver for Reporter<W> {
    fn on_event(&mut self, event: &SearchEvent<'_>) {
        match *event {
            SearchEvent::Verifying(endpoint) => self.line(format_args!(
                "▷ Verifying that {} is {}...",
                endpoint.index, endpoint.status
            )),
            SearchEvent::Probed(report) => self.probed(report),
            SearchEvent::BracketStarted { baseline } => self.line(format_args!(
                "Searching for a bracketing value above {baseline}..."
            )),
            SearchEvent::BracketStep { base, next, delta } => self.line(format_args!(
                "Bracketing search: base={base}; next={next} Δ={delta}"
            )),
            SearchEvent::BracketFound { lo, hi } => self.line(format_args!(
                "Found bracketing value: hi={hi}, adjusted lo to {}",
                lo.index
            )),
            SearchEvent::BisectStep { lo, hi, next } => self.line(format_args!(
                "Current state: lo={lo} hi={hi}; next={next} Δ={}",
                hi.index - lo.index
            )),
        }
    }
}

/// Print the verdict.
pub fn print_outcome(
    out: &mut impl Write,
    outcome: &SearchOutcome,
    mapping: Option<&ProbeMapping>,
) -> io::Result<()> {
    let SearchOutcome::Culprit(culprit) = outcome else {
        return writeln!(out, "No culprit found");
    };

    let describe = |boundary: &Boundary| match mapping.and_then(|m| m.resolve(boundary.index).ok()) {
        Some(value) => format!("{boundary} ({value})"),
        None => boundary.to_string(),
    };
    writeln!(out, "▷ Culprit found:")?;
    writeln!(out, "  Before: {}", describe(&culprit.before))?;
    writeln!(out, "  After:  {}", describe(&culprit.after))?;
    Ok(())
}
