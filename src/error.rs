//! Error type shared by the walker and the action handlers

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can abort a sweep.
///
/// The first error encountered stops the walk. Each variant keeps the
/// underlying `io::Error` as its source so the OS error is never lost.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot access '{}': {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("error writing output: {0}")]
    Output(#[source] io::Error),

    #[error("cannot delete '{}': {source}", path.display())]
    Delete {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file is already gone when this is returned.
    #[error("deleted '{}' but could not write audit record: {source}", path.display())]
    Audit {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot access archive destination '{}': {source}", path.display())]
    Destination {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("archive destination '{}' is not a directory", .0.display())]
    InvalidDestination(PathBuf),

    #[error("'{}' is not under traversal root '{}'", path.display(), root.display())]
    NotUnderRoot { path: PathBuf, root: PathBuf },

    #[error("cannot create archive directory '{}': {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot open archive target '{}': {source}", path.display())]
    OpenTarget {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot open '{}' for archiving: {source}", path.display())]
    OpenSource {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("error compressing '{}': {source}", path.display())]
    Copy {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Raised when flushing the gzip trailer fails, even if every byte was copied.
    #[error("cannot finish archive '{}': {source}", path.display())]
    Compress {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot close archive '{}': {source}", path.display())]
    CloseTarget {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// The underlying I/O error, if this error wraps one.
    pub fn io_error(&self) -> Option<&io::Error> {
        match self {
            Error::Walk { source, .. }
            | Error::Delete { source, .. }
            | Error::Audit { source, .. }
            | Error::Destination { source, .. }
            | Error::CreateDir { source, .. }
            | Error::OpenTarget { source, .. }
            | Error::OpenSource { source, .. }
            | Error::Copy { source, .. }
            | Error::Compress { source, .. }
            | Error::CloseTarget { source, .. } => Some(source),
            Error::Output(source) => Some(source),
            Error::InvalidDestination(_) | Error::NotUnderRoot { .. } => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
