//! Loading a simulation setup from disk.

use std::error::Error;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use pitlane_core::SimSetup;

/// Failure to read or parse a setup file.
#[derive(Debug)]
pub enum SetupFileError {
    /// The file could not be read.
    Read {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The file is not a valid JSON setup.
    Parse {
        /// Path that was parsed.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
}

impl fmt::Display for SetupFileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "cannot read setup {}: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "invalid setup {}: {source}", path.display())
            }
        }
    }
}

impl Error for SetupFileError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

/// Read a JSON setup from `path`, or the stock setup when there is none.
///
/// Blocks missing from the file take their stock values.
pub fn load(path: Option<&Path>) -> Result<SimSetup, SetupFileError> {
    let Some(path) = path else {
        return Ok(SimSetup::default());
    };
    let text = fs::read_to_string(path).map_err(|source| SetupFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&text).map_err(|source| SetupFileError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn parse(text: &str) -> Result<SimSetup, serde_json::Error> {
    serde_json::from_str(text)
}
