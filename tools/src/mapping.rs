//! Probe lists: map an index to an arbitrary probe value.
//!
//! Entry `n` (1-based, blank lines skipped) is the value for index `n`. A
//! common use is a list of commit hashes, oldest first.

use std::fs;
use std::path::{Path, PathBuf};

use culprit_types::{Index, ProbeError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MappingError {
    #[error("failed to read probe list {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("probe list is empty")]
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeMapping {
    values: Vec<String>,
}

impl ProbeMapping {
    pub fn parse(text: &str) -> Result<Self, MappingError> {
        let values: Vec<String> = text
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.trim().is_empty())
            .map(ToString::to_string)
            .collect();
        if values.is_empty() {
            return Err(MappingError::Empty);
        }
        Ok(Self { values })
    }

    pub fn load(path: &Path) -> Result<Self, MappingError> {
        let text = fs::read_to_string(path).map_err(|source| MappingError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mapping = Self::parse(&text)?;
        tracing::debug!(path = %path.display(), entries = mapping.len(), "loaded probe list");
        Ok(mapping)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Highest valid index.
    #[must_use]
    pub fn last_index(&self) -> Index {
        self.values.len() as Index
    }

    /// Value for a 1-based index.
    pub fn resolve(&self, index: Index) -> Result<&str, ProbeError> {
        let invalid = || ProbeError::InvalidIndex {
            index,
            len: self.values.len(),
        };
        let slot = usize::try_from(index)
            .ok()
            .and_then(|i| i.checked_sub(1))
            .ok_or_else(invalid)?;
        self.values
            .get(slot)
            .map(String::as_str)
            .ok_or_else(invalid)
    }
}
