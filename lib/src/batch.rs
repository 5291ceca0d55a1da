//! Per-item outcome tracking for a batch run.
//!
//! Every site or project is processed independently: a failure is
//! recorded against its name and the loop moves on, so a single bad
//! photo set cannot sink a multi-day survey run. The drivers return
//! the summary and the CLIs turn a non-empty failure list into a
//! non-zero exit.

use std::fs;
use std::path::{Path, PathBuf};

use log::warn;

use crate::Error;

/// A recorded per-item failure.
#[derive(Debug)]
pub struct Failure {
    /// The site or project subdirectory name.
    pub name: String,
    /// What went wrong.
    pub error: Error,
}

/// Outcome of a batch run, one entry per processed subdirectory.
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// Names of the items that completed, in processing order.
    pub completed: Vec<String>,
    /// The items that failed, in processing order.
    pub failed: Vec<Failure>,
}

impl BatchSummary {
    /// Record the outcome of one item. Failures are logged as they
    /// are recorded.
    pub fn record(&mut self, name: String, outcome: Result<(), Error>) {
        match outcome {
            Ok(()) => self.completed.push(name),
            Err(error) => {
                warn!("{name}: {error}");
                self.failed.push(Failure { name, error });
            }
        }
    }

    /// Whether every item completed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    /// Number of items processed, completed or not.
    #[must_use]
    pub fn total(&self) -> usize {
        self.completed.len() + self.failed.len()
    }
}

/// Immediate subdirectories of `root`, sorted by name.
///
/// Iteration order from the filesystem is platform-defined; sorting
/// makes batch order and CSV row order deterministic. Non-directory
/// entries are skipped.
pub(crate) fn subdirectories(root: &Path) -> Result<Vec<PathBuf>, Error> {
    let entries = fs::read_dir(root).map_err(|source| Error::ReadDir {
        path: root.to_path_buf(),
        source,
    })?;

    let mut dirs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| Error::ReadDir {
            path: root.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();

    Ok(dirs)
}

/// Final path component as an owned string, lossily decoded.
pub(crate) fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
