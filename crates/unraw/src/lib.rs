//! Parallel in-place rewriting of Go raw string literals.
//!
//! `unraw` walks a file or directory tree, hands every `.go` file to a
//! fixed pool of worker threads and converts each eligible raw literal
//! (backtick-delimited, single line, no backslash or backtick) into the
//! equivalent interpreted literal. Struct field tags are never touched.
//!
//! The per-file syntax work lives in [`unraw_syntax`]; this crate owns the
//! runtime around it:
//!
//! - [`PathWalker`] discovers candidate files
//! - [`WorkerPool`] runs a [`FileProcessor`] (normally [`FileTransformer`])
//!   on each of them
//! - [`CancellationToken`] stops the walk and the workers cooperatively,
//!   and [`signals::install`] wires it to SIGINT and SIGTERM
//! - [`ErrorCollector`] gathers per-file failures into an
//!   [`AggregateError`]
//!
//! [`run`] is the binary entry point; [`process_path`] and
//! [`process_path_with`] drive a run without touching the process-wide
//! logging or signal state.

mod cancel;
mod cli;
mod collector;
mod commit;
mod errors;
mod pool;
pub mod signals;
pub mod telemetry;
mod transform;
mod walker;

use std::ffi::OsString;
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};
use unraw_config::Config;

pub use cancel::CancellationToken;
pub use collector::ErrorCollector;
pub use errors::{AggregateError, RunError, TransformError, WalkError};
pub use pool::{PoolReport, RunSummary, WorkerPool};
pub use transform::{FileOutcome, FileProcessor, FileTransformer};
pub use walker::PathWalker;

use crate::cli::Cli;

const RUN_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::run");

/// Parses `args`, rewrites the requested tree and reports on the given
/// streams.
///
/// Help and version requests print to `stdout` and succeed. Usage errors,
/// discovery failures and per-file failures are written to `stderr` and
/// yield [`ExitCode::FAILURE`]. An interrupted run still prints the summary
/// of the work it completed and succeeds.
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => {
            let rendered = error.render();
            if error.use_stderr() {
                let _ = write!(stderr, "{rendered}");
                return ExitCode::FAILURE;
            }
            let _ = write!(stdout, "{rendered}");
            return ExitCode::SUCCESS;
        }
    };

    match execute(&cli) {
        Ok(summary) => {
            let _ = writeln!(stdout, "{summary}");
            ExitCode::SUCCESS
        }
        Err(error) => {
            let _ = writeln!(stderr, "unraw: {error}");
            ExitCode::FAILURE
        }
    }
}

fn execute(cli: &Cli) -> Result<RunSummary, RunError> {
    telemetry::initialise(cli.config.log_filter(), cli.config.log_format())?;
    let cancel = CancellationToken::new();
    let _signals = signals::install(&cancel)?;
    process_path(&cli.config, &cli.root(), &cancel)
}

/// Rewrites every Go file under `root` using the transformer described by
/// `config`.
///
/// # Errors
///
/// See [`process_path_with`].
pub fn process_path(
    config: &Config,
    root: &Path,
    cancel: &CancellationToken,
) -> Result<RunSummary, RunError> {
    let processor = Arc::new(FileTransformer::from_config(config));
    process_path_with(processor, config.workers(), root, cancel)
}

/// Runs `processor` over every Go file under `root` on `workers` threads
/// (0 meaning one per CPU).
///
/// Discovery and processing overlap. The pool is always drained before this
/// returns, including when discovery fails.
///
/// # Errors
///
/// Returns [`RunError::Walk`] if discovery fails, [`RunError::Spawn`] if the
/// workers cannot be started and [`RunError::Aggregate`] if any file failed.
/// Cancellation on its own is not an error.
pub fn process_path_with(
    processor: Arc<dyn FileProcessor>,
    workers: usize,
    root: &Path,
    cancel: &CancellationToken,
) -> Result<RunSummary, RunError> {
    let pool = WorkerPool::start(workers, processor, cancel)
        .map_err(|source| RunError::Spawn { source })?;
    let discovered = PathWalker::default().discover(cancel, root, |path| pool.submit(path));
    let (summary, errors) = pool.finish().into_parts();
    let discovered = discovered?;

    if cancel.is_cancelled() {
        warn!(
            target: RUN_TARGET,
            processed = summary.processed(),
            rewritten = summary.rewritten(),
            "run cancelled before all files were processed"
        );
    }
    info!(
        target: RUN_TARGET,
        discovered,
        processed = summary.processed(),
        rewritten = summary.rewritten(),
        failed = errors.as_ref().map_or(0, AggregateError::len),
        "run finished"
    );

    match errors {
        Some(errors) => Err(RunError::Aggregate { summary, errors }),
        None => Ok(summary),
    }
}

#[cfg(test)]
mod tests;
