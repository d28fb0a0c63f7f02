//! Runtime configuration for the `unraw` rewriter.
//!
//! [`Config`] is a `clap::Args` struct so the binary can flatten it into its
//! command line, while tests and library callers build it programmatically
//! through [`Config::default`] and the `with_*` methods.

mod defaults;
mod formatter;
mod logging;

use std::path::{Path, PathBuf};

use clap::Args;
use clap::builder::RangedU64ValueParser;

pub use defaults::{
    AUTO_WORKERS, DEFAULT_GOFMT_PATH, DEFAULT_LOG_FILTER, MAX_WORKERS, QUEUE_SLOTS_PER_WORKER,
    default_log_filter, default_log_format, resolve_workers,
};
pub use formatter::FormatterKind;
pub use logging::{LogFormat, LogFormatParseError};

/// Settings shared by the rewrite engine and the binary.
#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct Config {
    /// Number of worker threads; 0 uses one per available CPU.
    #[arg(
        long,
        value_name = "N",
        default_value_t = AUTO_WORKERS,
        value_parser = RangedU64ValueParser::<usize>::new().range(0..=u64::from(MAX_WORKERS))
    )]
    workers: usize,

    /// Leave raw literals containing a double quote untouched.
    #[arg(long)]
    skip_quoted: bool,

    /// Canonicaliser applied to rewritten files.
    #[arg(long, value_enum, default_value_t = FormatterKind::Auto)]
    formatter: FormatterKind,

    /// Executable used by the `auto` and `gofmt` formatters.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_GOFMT_PATH)]
    gofmt_path: PathBuf,

    /// Tracing filter expression, for example `unraw=debug`.
    #[arg(long, value_name = "EXPR", default_value = DEFAULT_LOG_FILTER)]
    log_filter: String,

    /// Log line format.
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workers: AUTO_WORKERS,
            skip_quoted: false,
            formatter: FormatterKind::default(),
            gofmt_path: PathBuf::from(DEFAULT_GOFMT_PATH),
            log_filter: default_log_filter().to_owned(),
            log_format: default_log_format(),
        }
    }
}

impl Config {
    /// Requested worker count as configured ([`AUTO_WORKERS`] means auto).
    #[must_use]
    pub const fn workers(&self) -> usize {
        self.workers
    }

    /// Worker count with [`AUTO_WORKERS`] resolved against the host.
    #[must_use]
    pub fn resolved_workers(&self) -> usize {
        resolve_workers(self.workers)
    }

    /// Whether raw literals containing `"` are left alone.
    #[must_use]
    pub const fn skip_quoted(&self) -> bool {
        self.skip_quoted
    }

    /// Selected canonicaliser.
    #[must_use]
    pub const fn formatter(&self) -> FormatterKind {
        self.formatter
    }

    /// Executable used by [`FormatterKind::Auto`] and [`FormatterKind::Gofmt`].
    #[must_use]
    pub fn gofmt_path(&self) -> &Path {
        &self.gofmt_path
    }

    /// Tracing filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Log line format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Returns a copy with the worker count replaced.
    #[must_use]
    pub const fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Returns a copy with the double-quote policy replaced.
    #[must_use]
    pub const fn with_skip_quoted(mut self, skip_quoted: bool) -> Self {
        self.skip_quoted = skip_quoted;
        self
    }

    /// Returns a copy using `formatter` and, for gofmt, `gofmt_path`.
    #[must_use]
    pub fn with_formatter(mut self, formatter: FormatterKind, gofmt_path: impl Into<PathBuf>) -> Self {
        self.formatter = formatter;
        self.gofmt_path = gofmt_path.into();
        self
    }

    /// Returns a copy with the logging settings replaced.
    #[must_use]
    pub fn with_logging(mut self, filter: impl Into<String>, format: LogFormat) -> Self {
        self.log_filter = filter.into();
        self.log_format = format;
        self
    }
}
