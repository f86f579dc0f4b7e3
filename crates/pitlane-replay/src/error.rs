//! Error types for the replay system.

use std::fmt;

/// Reasons a determinism check cannot run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReplayError {
    /// Nothing has been captured, so there is nothing to replay.
    EmptyLog,
}

impl fmt::Display for ReplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyLog => write!(f, "replay log is empty"),
        }
    }
}

impl std::error::Error for ReplayError {}
