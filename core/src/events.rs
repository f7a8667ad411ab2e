//! Progress events emitted while a search runs.
//!
//! Observers are purely observational; nothing they do feeds back into the search.

use culprit_types::{Boundary, Index, ProbeReport};

#[derive(Debug, Clone, Copy)]
pub enum SearchEvent<'a> {
    /// About to probe an endpoint to confirm its assumed status.
    Verifying(Boundary),
    /// A probe completed (verification, bracketing, or bisection).
    Probed(&'a ProbeReport),
    /// Bracketing started above the baseline.
    BracketStarted { baseline: Boundary },
    /// About to probe `next` while bracketing.
    BracketStep {
        base: Boundary,
        next: Index,
        delta: u64,
    },
    /// Bracketing found a flip; `lo` was moved up to the last probed base.
    BracketFound { lo: Boundary, hi: Boundary },
    /// About to probe `next` while bisecting.
    BisectStep {
        lo: Boundary,
        hi: Boundary,
        next: Index,
    },
}

pub trait SearchObserver {
    fn on_event(&mut self, event: &SearchEvent<'_>);
}

impl SearchObserver for () {
    fn on_event(&mut self, _event: &SearchEvent<'_>) {}
}

impl<O: SearchObserver + ?Sized> SearchObserver for &mut O {
    fn on_event(&mut self, event: &SearchEvent<'_>) {
        (**self).on_event(event);
    }
}
