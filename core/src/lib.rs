//! Search engine for culprit.
//!
//! Locates the adjacent pair of indices where a probe's status flips, given
//! two endpoints of known (or, for 0, unknown) status. The probe itself is an
//! injected capability; see [`Probe`].

pub mod errors;
pub mod events;
pub mod probe;
pub mod search;

pub use errors::SearchError;
pub use events::{SearchEvent, SearchObserver};
pub use probe::{FnProbe, Probe, ProbeFut};
pub use search::{
    SearchOptions, SearchOutcome, SearchReport, SearchState, bisect, bracket, clog2, run_search,
    verify,
};
