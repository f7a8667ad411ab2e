//! Core domain types for culprit.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application.

use std::fmt;
use std::ops::Not;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// A position in the sequence under search.
///
/// Index 0 is never probed: as an endpoint it means "unknown, find it by bracketing".
pub type Index = u64;

// ============================================================================
// Status
// ============================================================================

/// Outcome of a single probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Good,
    Bad,
}

impl Status {
    /// Map a process exit to a status: success is GOOD, anything else is BAD.
    #[must_use]
    pub const fn from_success(success: bool) -> Self {
        if success { Self::Good } else { Self::Bad }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Good => "GOOD",
            Self::Bad => "BAD",
        }
    }

    /// Single-glyph marker used in progress lines.
    #[must_use]
    pub const fn mark(self) -> char {
        match self {
            Self::Good => '✓',
            Self::Bad => '✗',
        }
    }
}

impl Not for Status {
    type Output = Self;

    fn not(self) -> Self {
        match self {
            Self::Good => Self::Bad,
            Self::Bad => Self::Good,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Endpoints
// ============================================================================

/// Caller-supplied endpoints, validated.
///
/// Both values are non-negative and distinct, so at least one is positive.
/// A zero endpoint is unknown and is never probed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoints {
    good: Index,
    bad: Index,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EndpointError {
    #[error("the values of GOOD ({good}) and BAD ({bad}) must be non-negative")]
    Negative { good: i64, bad: i64 },
    #[error("the values of GOOD and BAD must be distinct (got {0})")]
    NotDistinct(i64),
}

impl Endpoints {
    pub fn new(good: i64, bad: i64) -> Result<Self, EndpointError> {
        let (Ok(good_idx), Ok(bad_idx)) = (Index::try_from(good), Index::try_from(bad)) else {
            return Err(EndpointError::Negative { good, bad });
        };
        if good_idx == bad_idx {
            return Err(EndpointError::NotDistinct(good));
        }
        Ok(Self {
            good: good_idx,
            bad: bad_idx,
        })
    }

    #[must_use]
    pub const fn good(self) -> Index {
        self.good
    }

    #[must_use]
    pub const fn bad(self) -> Index {
        self.bad
    }

    /// Order the endpoints as `((lo, lo_status), (hi, hi_status))` with `lo < hi`.
    #[must_use]
    pub const fn ordered(self) -> (Boundary, Boundary) {
        if self.good > self.bad {
            (
                Boundary::new(self.bad, Status::Bad),
                Boundary::new(self.good, Status::Good),
            )
        } else {
            (
                Boundary::new(self.good, Status::Good),
                Boundary::new(self.bad, Status::Bad),
            )
        }
    }
}

// ============================================================================
// Search results
// ============================================================================

/// An index together with its known status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Boundary {
    pub index: Index,
    pub status: Status,
}

impl Boundary {
    #[must_use]
    pub const fn new(index: Index, status: Status) -> Self {
        Self { index, status }
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.index, self.status)
    }
}

/// The adjacent pair where status flips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Culprit {
    pub before: Boundary,
    pub after: Boundary,
}

// ============================================================================
// Probes
// ============================================================================

/// Record of one completed probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    pub index: Index,
    /// The value handed to the probe (decimal index or mapped line).
    pub value: String,
    pub status: Status,
    pub elapsed: Duration,
}

/// The probe mechanism itself failed. Never a BAD status.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("invalid probe index {index} (probe list has {len} entries)")]
    InvalidIndex { index: Index, len: usize },
    #[error("failed to start probe {}: {source}", program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed waiting for probe at {index}: {source}")]
    Wait {
        index: Index,
        #[source]
        source: std::io::Error,
    },
    #[error("probe at {index} timed out after {elapsed:?}")]
    TimedOut { index: Index, elapsed: Duration },
    #[error("probe at {index} failed: {message}")]
    Failed { index: Index, message: String },
}
