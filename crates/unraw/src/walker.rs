//! Discovery of candidate source files under a root path.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use unraw_syntax::SOURCE_EXTENSION;
use walkdir::WalkDir;

use crate::cancel::CancellationToken;
use crate::errors::WalkError;

const WALK_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::walk");

/// Finds regular files with a given extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathWalker {
    extension: String,
}

impl Default for PathWalker {
    fn default() -> Self {
        Self::new(SOURCE_EXTENSION)
    }
}

impl PathWalker {
    /// Creates a walker yielding files whose extension is `extension`
    /// (without the leading dot).
    #[must_use]
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
        }
    }

    /// Returns the extension files must carry.
    #[must_use]
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Feeds every matching file under `root` to `sink` and returns how many
    /// were yielded.
    ///
    /// A matching regular file as `root` is yielded alone. A directory is
    /// walked recursively in file-name order; symbolic links are neither
    /// followed nor yielded. The walk stops early when `cancel` is observed
    /// or `sink` returns `false`.
    ///
    /// # Errors
    ///
    /// Returns [`WalkError::Stat`] if `root` cannot be inspected,
    /// [`WalkError::InvalidRoot`] if it is neither a directory nor a matching
    /// file, and [`WalkError::Walk`] if traversal fails part way.
    pub fn discover<F>(
        &self,
        cancel: &CancellationToken,
        root: &Path,
        mut sink: F,
    ) -> Result<usize, WalkError>
    where
        F: FnMut(PathBuf) -> bool,
    {
        let metadata = fs::metadata(root).map_err(|source| WalkError::Stat {
            path: root.to_path_buf(),
            source,
        })?;

        if metadata.is_file() && self.matches(root) {
            if cancel.is_cancelled() {
                return Ok(0);
            }
            sink(root.to_path_buf());
            return Ok(1);
        }
        if !metadata.is_dir() {
            return Err(WalkError::InvalidRoot {
                path: root.to_path_buf(),
                extension: self.extension.clone(),
            });
        }

        let mut yielded = 0;
        for entry in WalkDir::new(root).sort_by_file_name() {
            if cancel.is_cancelled() {
                warn!(target: WALK_TARGET, yielded, "discovery cancelled");
                break;
            }
            let entry = entry.map_err(|source| WalkError::Walk {
                root: root.to_path_buf(),
                source,
            })?;
            if !entry.file_type().is_file() || !self.matches(entry.path()) {
                continue;
            }

            yielded += 1;
            if !sink(entry.into_path()) {
                debug!(target: WALK_TARGET, yielded, "sink closed");
                break;
            }
        }

        Ok(yielded)
    }

    fn matches(&self, path: &Path) -> bool {
        path.extension() == Some(OsStr::new(&self.extension))
    }
}
