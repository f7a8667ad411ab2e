//! Fatal outcomes of a search run.
//!
//! A BAD status is data, not an error; nothing here is ever retried.

use culprit_types::{Boundary, EndpointError, Index, ProbeError, Status};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    /// Malformed endpoints, reported before any probe runs.
    #[error(transparent)]
    InvalidInput(#[from] EndpointError),
    #[error("value {index} reports as {actual}, but is expected to be {expected}")]
    VerificationMismatch {
        index: Index,
        expected: Status,
        actual: Status,
    },
    #[error("{}", bracket_message(.baseline, .max))]
    BracketExhausted {
        baseline: Boundary,
        max: Option<Index>,
    },
    #[error("probe failed: {0}")]
    Probe(#[from] ProbeError),
}

#[allow(clippy::ref_option)]
fn bracket_message(baseline: &Boundary, max: &Option<Index>) -> String {
    match max {
        Some(max) => format!(
            "no bracketing value found between lo={} [{}] and {max}",
            baseline.index, baseline.status
        ),
        None => format!(
            "no bracketing value found above lo={} [{}]",
            baseline.index, baseline.status
        ),
    }
}
