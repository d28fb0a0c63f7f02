//! Fixtures shared by the runtime test suites.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use tempfile::TempDir;

use crate::{CancellationToken, FileOutcome, FileProcessor, FileTransformer, TransformError};

/// Source with one eligible literal whose value is `file <index>`.
pub fn eligible_source(index: usize) -> String {
    format!("package sample\n\nvar name = `file {index}`\n")
}

/// What [`eligible_source`] looks like after a rewrite.
pub fn rewritten_source(index: usize) -> String {
    format!("package sample\n\nvar name = \"file {index}\"\n")
}

/// Source that fails to parse.
pub const INVALID_SOURCE: &str = "package sample\n\nfunc broken( {\n";

/// Temporary Go tree populated file by file.
pub struct GoTree {
    dir: TempDir,
}

impl GoTree {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("temp dir"),
        }
    }

    /// Creates a tree holding `count` eligible files named `00.go`, `01.go`, ...
    pub fn with_eligible(count: usize) -> Self {
        let tree = Self::new();
        for index in 0..count {
            tree.write(&format!("{index:02}.go"), &eligible_source(index));
        }
        tree
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(&path, content).expect("write fixture");
        path
    }

    pub fn read(&self, name: &str) -> String {
        fs::read_to_string(self.dir.path().join(name)).expect("read fixture")
    }

    /// Every file under the root with its contents, sorted by path.
    pub fn snapshot(&self) -> Vec<(PathBuf, String)> {
        let mut files: Vec<_> = walkdir::WalkDir::new(self.root())
            .into_iter()
            .map(|entry| entry.expect("walk entry"))
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| {
                let relative = entry
                    .path()
                    .strip_prefix(self.root())
                    .expect("under root")
                    .to_path_buf();
                let content = fs::read_to_string(entry.path()).expect("read file");
                (relative, content)
            })
            .collect();
        files.sort();
        files
    }
}

/// Processor that cancels the run once `limit` files have been handed to
/// the real transformer.
pub struct CancelAfter {
    inner: FileTransformer,
    limit: usize,
    started: AtomicUsize,
    cancel: CancellationToken,
}

impl CancelAfter {
    pub fn new(limit: usize, cancel: &CancellationToken) -> Self {
        Self {
            inner: FileTransformer::default(),
            limit,
            started: AtomicUsize::new(0),
            cancel: cancel.clone(),
        }
    }

    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }
}

impl FileProcessor for CancelAfter {
    fn process(
        &self,
        cancel: &CancellationToken,
        path: &Path,
    ) -> Result<FileOutcome, TransformError> {
        let started = self.started.fetch_add(1, Ordering::SeqCst) + 1;
        let outcome = self.inner.process(cancel, path);
        if started == self.limit {
            self.cancel.cancel();
        }
        outcome
    }
}
