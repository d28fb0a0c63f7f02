//! Per-file rewrite pipeline.
//!
//! [`FileTransformer`] reads one Go file, parses it, protects its struct tags,
//! plans literal rewrites and, when at least one literal changes, prints,
//! canonicalises and atomically writes the result. The worker pool only sees
//! the [`FileProcessor`] trait so tests can substitute their own processor.

use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, warn};
use unraw_config::{Config, FormatterKind};
use unraw_syntax::{
    Canonicalizer, EligibilityRule, Gofmt, LiteralRewriter, Parser, QuotePolicy, SyntaxCheck,
    SyntaxError, TagPositionIndex,
};

use crate::cancel::CancellationToken;
use crate::commit::replace_file;
use crate::errors::TransformError;

pub(crate) const TRANSFORM_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::transform");

/// Result of processing one file successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// The file had nothing to rewrite and was not touched.
    Unchanged,
    /// The file was rewritten.
    Rewritten {
        /// Number of literals converted.
        literals: usize,
    },
    /// Cancellation was observed before anything was written.
    Skipped,
}

/// Processes a single file on behalf of a worker.
#[cfg_attr(test, mockall::automock)]
pub trait FileProcessor: Send + Sync {
    /// Processes `path`, checking `cancel` cooperatively.
    ///
    /// # Errors
    ///
    /// Returns a [`TransformError`] naming `path` if the file cannot be
    /// processed. Other files are unaffected.
    fn process(
        &self,
        cancel: &CancellationToken,
        path: &Path,
    ) -> Result<FileOutcome, TransformError>;
}

/// Production [`FileProcessor`] rewriting raw literals in Go sources.
pub struct FileTransformer {
    rewriter: LiteralRewriter,
    canonicalizer: Box<dyn Canonicalizer>,
}

impl FileTransformer {
    /// Creates a transformer from its two collaborators.
    #[must_use]
    pub fn new(rewriter: LiteralRewriter, canonicalizer: Box<dyn Canonicalizer>) -> Self {
        Self {
            rewriter,
            canonicalizer,
        }
    }

    /// Builds the transformer selected by `config`.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let policy = if config.skip_quoted() {
            QuotePolicy::Skip
        } else {
            QuotePolicy::Escape
        };
        let canonicalizer: Box<dyn Canonicalizer> = match config.formatter() {
            FormatterKind::Auto => Box::new(GofmtOrCheck::new(Gofmt::new(config.gofmt_path()))),
            FormatterKind::Gofmt => Box::new(Gofmt::new(config.gofmt_path())),
            FormatterKind::Check => Box::new(SyntaxCheck::new()),
        };
        Self::new(LiteralRewriter::new(EligibilityRule::new(policy)), canonicalizer)
    }

    fn read_source(path: &Path) -> Result<String, TransformError> {
        let bytes = fs::read(path).map_err(|source| TransformError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        String::from_utf8(bytes).map_err(|source| TransformError::Decode {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Formats with `gofmt`, falling back to [`SyntaxCheck`] for the rest of
/// the run once the executable turns out not to start.
#[derive(Debug)]
struct GofmtOrCheck {
    gofmt: Gofmt,
    check: SyntaxCheck,
    unavailable: AtomicBool,
}

impl GofmtOrCheck {
    fn new(gofmt: Gofmt) -> Self {
        Self {
            gofmt,
            check: SyntaxCheck::new(),
            unavailable: AtomicBool::new(false),
        }
    }
}

impl Canonicalizer for GofmtOrCheck {
    fn canonicalize(&self, source: String) -> Result<String, SyntaxError> {
        if !self.unavailable.load(Ordering::Acquire) {
            match self.gofmt.format(&source) {
                Err(SyntaxError::FormatterUnavailable { source: error, .. }) => {
                    // Several workers can fail together; only one warns.
                    if !self.unavailable.swap(true, Ordering::AcqRel) {
                        warn!(
                            target: TRANSFORM_TARGET,
                            program = %self.gofmt.program().display(),
                            %error,
                            "gofmt unavailable; rewritten files will not be reformatted"
                        );
                    }
                }
                other => return other,
            }
        }
        self.check.canonicalize(source)
    }
}

impl Default for FileTransformer {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl fmt::Debug for FileTransformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileTransformer")
            .field("rewriter", &self.rewriter)
            .finish_non_exhaustive()
    }
}

impl FileProcessor for FileTransformer {
    fn process(
        &self,
        cancel: &CancellationToken,
        path: &Path,
    ) -> Result<FileOutcome, TransformError> {
        if cancel.is_cancelled() {
            return Ok(FileOutcome::Skipped);
        }

        let source = Self::read_source(path)?;
        let syntax_error = |source| TransformError::Syntax {
            path: path.to_path_buf(),
            source,
        };
        let mut parser = Parser::new().map_err(syntax_error)?;
        let parsed = parser.parse_strict(&source).map_err(syntax_error)?;
        drop(source);

        let cancelled = || cancel.is_cancelled();
        let Ok(tags) = TagPositionIndex::build(&parsed, &cancelled) else {
            debug!(target: TRANSFORM_TARGET, path = %path.display(), "cancelled while indexing tags");
            return Ok(FileOutcome::Skipped);
        };
        let Ok(plan) = self.rewriter.plan(&parsed, &tags, &cancelled) else {
            debug!(target: TRANSFORM_TARGET, path = %path.display(), "cancelled while rewriting");
            return Ok(FileOutcome::Skipped);
        };

        if plan.is_empty() {
            debug!(target: TRANSFORM_TARGET, path = %path.display(), "no eligible literals");
            return Ok(FileOutcome::Unchanged);
        }

        // Past this point the file is finished even if cancellation arrives.
        let printed = plan
            .print(parsed.source())
            .map_err(|source| TransformError::Print {
                path: path.to_path_buf(),
                source,
            })?;
        let canonical =
            self.canonicalizer
                .canonicalize(printed)
                .map_err(|source| TransformError::Format {
                    path: path.to_path_buf(),
                    source,
                })?;
        replace_file(path, &canonical).map_err(|source| TransformError::Write {
            path: path.to_path_buf(),
            source,
        })?;

        let literals = plan.len();
        info!(target: TRANSFORM_TARGET, path = %path.display(), literals, "rewrote file");
        Ok(FileOutcome::Rewritten { literals })
    }
}
