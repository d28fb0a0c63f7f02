//! Error types reported by the rewrite runtime.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::string::FromUtf8Error;

use thiserror::Error;
use unraw_syntax::SyntaxError;

use crate::pool::RunSummary;
use crate::signals::SignalError;
use crate::telemetry::TelemetryError;

/// Failure while transforming a single file.
///
/// The display form omits the path; [`AggregateError`] prefixes it.
#[derive(Debug, Error)]
pub enum TransformError {
    /// The file could not be read.
    #[error("failed to read file: {source}")]
    Read {
        /// File being processed.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// The file is not valid UTF-8.
    #[error("file is not valid UTF-8: {source}")]
    Decode {
        /// File being processed.
        path: PathBuf,
        /// Underlying decoding error.
        #[source]
        source: FromUtf8Error,
    },
    /// The file does not parse cleanly.
    #[error("parse failed at {source}")]
    Syntax {
        /// File being processed.
        path: PathBuf,
        /// Parser diagnostic.
        #[source]
        source: SyntaxError,
    },
    /// Splicing the rewritten literals failed.
    #[error("failed to print rewritten source: {source}")]
    Print {
        /// File being processed.
        path: PathBuf,
        /// Printer diagnostic.
        #[source]
        source: SyntaxError,
    },
    /// The canonicaliser rejected the rewritten source.
    #[error("failed to format rewritten source: {source}")]
    Format {
        /// File being processed.
        path: PathBuf,
        /// Canonicaliser diagnostic.
        #[source]
        source: SyntaxError,
    },
    /// Writing the rewritten file failed; the original is left in place.
    #[error("failed to write file: {source}")]
    Write {
        /// File being processed.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// The worker processing the file panicked.
    #[error("worker panicked: {message}")]
    Worker {
        /// File being processed.
        path: PathBuf,
        /// Panic payload rendered as text.
        message: String,
    },
}

impl TransformError {
    /// Returns the file the error belongs to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Read { path, .. }
            | Self::Decode { path, .. }
            | Self::Syntax { path, .. }
            | Self::Print { path, .. }
            | Self::Format { path, .. }
            | Self::Write { path, .. }
            | Self::Worker { path, .. } => path,
        }
    }
}

/// All per-file failures of one run, in the order they were recorded.
#[derive(Debug)]
pub struct AggregateError {
    errors: Vec<TransformError>,
}

impl AggregateError {
    pub(crate) const fn new(errors: Vec<TransformError>) -> Self {
        Self { errors }
    }

    /// Returns the individual failures.
    #[must_use]
    pub fn errors(&self) -> &[TransformError] {
        &self.errors
    }

    /// Returns the number of failed files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Always `false` for an aggregate built by a run.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the failing paths in recorded order.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.errors.iter().map(TransformError::path)
    }
}

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, error) in self.errors.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(
                f,
                "error processing file {}: {error}",
                error.path().display()
            )?;
        }
        Ok(())
    }
}

impl std::error::Error for AggregateError {}

/// Failure while discovering files under the root path.
#[derive(Debug, Error)]
pub enum WalkError {
    /// The root path could not be inspected.
    #[error("cannot access '{}': {source}", path.display())]
    Stat {
        /// Root path given to the walker.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// The root is neither a directory nor a Go source file.
    #[error("'{}' is neither a directory nor a .{extension} file", path.display())]
    InvalidRoot {
        /// Root path given to the walker.
        path: PathBuf,
        /// Expected file extension.
        extension: String,
    },
    /// Directory traversal failed.
    #[error("failed to walk '{}': {source}", root.display())]
    Walk {
        /// Root path given to the walker.
        root: PathBuf,
        /// Underlying traversal error.
        #[source]
        source: walkdir::Error,
    },
}

/// Errors that abort a run.
#[derive(Debug, Error)]
pub enum RunError {
    /// File discovery failed.
    #[error(transparent)]
    Walk(#[from] WalkError),
    /// One or more files failed; the summary counts the files that did not.
    #[error("{errors}")]
    Aggregate {
        /// Outcome of the files that succeeded.
        summary: RunSummary,
        /// Per-file failures.
        errors: AggregateError,
    },
    /// Worker threads could not be started.
    #[error("failed to start worker threads: {source}")]
    Spawn {
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// Logging could not be configured.
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    /// Signal handlers could not be installed.
    #[error(transparent)]
    Signals(#[from] SignalError),
}
