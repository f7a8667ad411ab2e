//! The search state machine.
//!
//! ```text
//! Endpoints -> SearchState -> verify? -> bracket? (lo == 0) -> bisect -> SearchReport
//! ```
//!
//! Each phase is a free function over `&mut SearchState`, an injected [`Probe`]
//! and a [`SearchObserver`], so phases can be driven in isolation. Probes are
//! awaited one at a time; there is never more than one in flight.

use std::time::{Duration, Instant};

use culprit_types::{Boundary, Culprit, Endpoints, Index, Status};

use crate::errors::SearchError;
use crate::events::{SearchEvent, SearchObserver};
use crate::probe::Probe;

/// Least `k >= 1` such that `2^k >= z`.
#[must_use]
pub const fn clog2(z: u64) -> u64 {
    if z <= 2 {
        return 1;
    }
    (u64::BITS - (z - 1).leading_zeros()) as u64
}

/// Knobs consumed by [`run_search`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// Probe the positive endpoints first and require their assumed status.
    pub verify: bool,
    /// Discover an unknown (0) endpoint by exponential search above the known one.
    pub bracket: bool,
    /// Upper limit for bracketing. `None` means bounded only by the index range.
    pub max_bracket: Option<Index>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            verify: true,
            bracket: false,
            max_bracket: None,
        }
    }
}

impl SearchOptions {
    /// Set the bracketing limit; 0 means unbounded.
    pub fn with_max_bracket(mut self, max: Index) -> Self {
        self.max_bracket = (max > 0).then_some(max);
        self
    }
}

/// Mutable working set of one run.
///
/// While bisecting, `lo.index < hi.index` and `lo.status != hi.status`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchState {
    pub lo: Boundary,
    pub hi: Boundary,
    probes: u32,
    verify_probes: u32,
}

impl SearchState {
    #[must_use]
    pub fn new(endpoints: Endpoints) -> Self {
        let (lo, hi) = endpoints.ordered();
        Self::from_bounds(lo, hi)
    }

    /// Start from already-ordered bounds.
    #[must_use]
    pub fn from_bounds(lo: Boundary, hi: Boundary) -> Self {
        Self {
            lo,
            hi,
            probes: 0,
            verify_probes: 0,
        }
    }

    /// Probes issued by bracketing and bisection.
    #[must_use]
    pub fn probes(&self) -> u32 {
        self.probes
    }

    #[must_use]
    pub fn verify_probes(&self) -> u32 {
        self.verify_probes
    }

    #[must_use]
    pub fn outcome(&self) -> SearchOutcome {
        if self.lo.index < self.hi.index {
            SearchOutcome::Culprit(Culprit {
                before: self.lo,
                after: self.hi,
            })
        } else {
            SearchOutcome::NoCulprit
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    Culprit(Culprit),
    /// No transition detected in range.
    NoCulprit,
}

/// Final result of [`run_search`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchReport {
    pub outcome: SearchOutcome,
    /// Bracketing and bisection probes (verification excluded).
    pub probes: u32,
    pub verify_probes: u32,
    /// Wall-clock time spent bracketing and bisecting.
    pub elapsed: Duration,
}

/// Run every phase in order and report the culprit.
pub async fn run_search<P, O>(
    endpoints: Endpoints,
    options: SearchOptions,
    probe: &mut P,
    observer: &mut O,
) -> Result<SearchReport, SearchError>
where
    P: Probe + ?Sized,
    O: SearchObserver + ?Sized,
{
    let mut state = SearchState::new(endpoints);
    tracing::debug!(lo = %state.lo, hi = %state.hi, ?options, "starting search");

    if options.verify {
        verify(&mut state, probe, observer).await?;
    }

    let start = Instant::now();
    if options.bracket && state.lo.index == 0 {
        bracket(&mut state, probe, observer, options.max_bracket).await?;
    }
    bisect(&mut state, probe, observer).await?;

    let report = SearchReport {
        outcome: state.outcome(),
        probes: state.probes,
        verify_probes: state.verify_probes,
        elapsed: start.elapsed(),
    };
    tracing::debug!(probes = report.probes, elapsed = ?report.elapsed, "search finished");
    Ok(report)
}

/// Probe each positive endpoint and require its assumed status.
///
/// Endpoint 0 is unknown and is skipped.
pub async fn verify<P, O>(
    state: &mut SearchState,
    probe: &mut P,
    observer: &mut O,
) -> Result<(), SearchError>
where
    P: Probe + ?Sized,
    O: SearchObserver + ?Sized,
{
    for endpoint in [state.lo, state.hi] {
        if endpoint.index == 0 {
            continue;
        }
        observer.on_event(&SearchEvent::Verifying(endpoint));
        let report = probe.invoke(endpoint.index).await?;
        state.verify_probes += 1;
        observer.on_event(&SearchEvent::Probed(&report));

        if report.status != endpoint.status {
            return Err(SearchError::VerificationMismatch {
                index: endpoint.index,
                expected: endpoint.status,
                actual: report.status,
            });
        }
    }
    Ok(())
}

/// Exponential search for a flip above `hi`.
///
/// `hi` becomes the baseline and steps of `clog2(baseline)`, doubling each
/// round, are taken from it. On success `lo` is the last probed point that
/// still had the baseline status and `hi` is the first one that did not.
pub async fn bracket<P, O>(
    state: &mut SearchState,
    probe: &mut P,
    observer: &mut O,
    max: Option<Index>,
) -> Result<(), SearchError>
where
    P: Probe + ?Sized,
    O: SearchObserver + ?Sized,
{
    let baseline = state.hi;
    state.lo = baseline;
    observer.on_event(&SearchEvent::BracketStarted { baseline });

    let exhausted = |max: Option<Index>| SearchError::BracketExhausted { baseline, max };

    let mut delta = clog2(baseline.index);
    let mut base = baseline.index;
    loop {
        let next = baseline
            .index
            .checked_add(delta)
            .ok_or_else(|| exhausted(None))?;
        if let Some(max) = max
            && next > max
        {
            return Err(exhausted(Some(max)));
        }

        observer.on_event(&SearchEvent::BracketStep {
            base: Boundary::new(base, baseline.status),
            next,
            delta,
        });
        if search_probe(state, probe, observer, next).await? != baseline.status {
            state.lo = Boundary::new(base, baseline.status);
            state.hi = Boundary::new(next, !baseline.status);
            break;
        }

        delta = delta.checked_mul(2).ok_or_else(|| exhausted(None))?;
        base = next;
    }

    observer.on_event(&SearchEvent::BracketFound {
        lo: state.lo,
        hi: state.hi,
    });
    Ok(())
}

/// Binary search until `lo` and `hi` are adjacent.
///
/// Endpoints are never re-probed; each probe replaces whichever side shares its status.
pub async fn bisect<P, O>(
    state: &mut SearchState,
    probe: &mut P,
    observer: &mut O,
) -> Result<(), SearchError>
where
    P: Probe + ?Sized,
    O: SearchObserver + ?Sized,
{
    while state.hi.index.saturating_sub(state.lo.index) > 1 {
        let next = state.lo.index + (state.hi.index - state.lo.index) / 2;
        tracing::trace!(lo = %state.lo, hi = %state.hi, next, "bisect step");
        observer.on_event(&SearchEvent::BisectStep {
            lo: state.lo,
            hi: state.hi,
            next,
        });

        let status = search_probe(state, probe, observer, next).await?;
        if status == state.lo.status {
            state.lo.index = next;
        } else {
            state.hi.index = next;
        }
    }
    Ok(())
}

async fn search_probe<P, O>(
    state: &mut SearchState,
    probe: &mut P,
    observer: &mut O,
    index: Index,
) -> Result<Status, SearchError>
where
    P: Probe + ?Sized,
    O: SearchObserver + ?Sized,
{
    state.probes += 1;
    let report = probe.invoke(index).await?;
    tracing::debug!(
        index,
        value = %report.value,
        status = %report.status,
        elapsed = ?report.elapsed,
        "probe completed"
    );
    observer.on_event(&SearchEvent::Probed(&report));
    Ok(report.status)
}
