use std::io;
use std::path::PathBuf;

use crate::sdk::EngineError;

/// Errors raised by the batch drivers themselves.
///
/// Engine failures are wrapped unchanged; everything else is a
/// filesystem problem tagged with the path it occurred on.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A site or projects directory could not be listed.
    #[error("cannot read directory {}: {source}", path.display())]
    ReadDir {
        /// The directory that failed to list.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },

    /// Recursive traversal of a photo directory failed.
    #[error("cannot scan {}: {source}", path.display())]
    Scan {
        /// The directory being walked.
        path: PathBuf,
        /// The underlying traversal error.
        source: walkdir::Error,
    },

    /// A discovered photo could not be resolved to an absolute path.
    #[error("cannot resolve {}: {source}", path.display())]
    Resolve {
        /// The photo path that failed to resolve.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },

    /// A project directory or the output CSV could not be written.
    #[error("cannot write {}: {source}", path.display())]
    Write {
        /// The path that failed to write.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },

    /// The photogrammetry engine reported a failure.
    #[error(transparent)]
    Engine(#[from] EngineError),
}
