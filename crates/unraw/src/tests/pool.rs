//! Unit tests for the worker pool, driven through a mocked processor.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rstest::rstest;

use crate::transform::MockFileProcessor;
use crate::{CancellationToken, FileOutcome, FileProcessor, TransformError, WorkerPool};

fn outcome_for(path: &Path) -> Result<FileOutcome, TransformError> {
    match path.to_str() {
        Some("rewritten.go") => Ok(FileOutcome::Rewritten { literals: 2 }),
        Some("unchanged.go") => Ok(FileOutcome::Unchanged),
        Some("skipped.go") => Ok(FileOutcome::Skipped),
        _ => Err(TransformError::Worker {
            path: path.to_path_buf(),
            message: String::from("mock failure"),
        }),
    }
}

#[rstest]
#[case(1)]
#[case(4)]
fn outcomes_are_classified(#[case] workers: usize) {
    let mut processor = MockFileProcessor::new();
    processor
        .expect_process()
        .times(4)
        .returning(|_, path| outcome_for(path));

    let pool = WorkerPool::start(workers, Arc::new(processor), &CancellationToken::new())
        .expect("start pool");
    assert_eq!(pool.workers(), workers);
    for name in ["rewritten.go", "unchanged.go", "skipped.go", "failed.go"] {
        assert!(pool.submit(PathBuf::from(name)));
    }
    let report = pool.finish();

    assert_eq!(report.summary().processed(), 2);
    assert_eq!(report.summary().rewritten(), 1);
    let errors = report.errors().expect("one failure");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.paths().collect::<Vec<_>>(), [Path::new("failed.go")]);
}

struct PanicsOn(&'static str);

impl FileProcessor for PanicsOn {
    fn process(
        &self,
        _cancel: &CancellationToken,
        path: &Path,
    ) -> Result<FileOutcome, TransformError> {
        assert!(path != Path::new(self.0), "processor exploded");
        Ok(FileOutcome::Unchanged)
    }
}

#[test]
fn panicking_processor_is_reported_as_worker_error() {
    let pool = WorkerPool::start(1, Arc::new(PanicsOn("panics.go")), &CancellationToken::new())
        .expect("start pool");
    assert!(pool.submit(PathBuf::from("panics.go")));
    assert!(pool.submit(PathBuf::from("after.go")));
    let (summary, errors) = pool.finish().into_parts();

    assert_eq!(summary.processed(), 1, "the worker survives the panic");
    let errors = errors.expect("panic recorded");
    assert!(matches!(
        errors.errors(),
        [TransformError::Worker { path, message }]
            if path == Path::new("panics.go") && message == "processor exploded"
    ));
}

#[test]
fn cancelled_pool_refuses_work() {
    let mut processor = MockFileProcessor::new();
    processor.expect_process().never();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let pool = WorkerPool::start(1, Arc::new(processor), &cancel).expect("start pool");
    let accepted = (0..10)
        .take_while(|index| pool.submit(PathBuf::from(format!("{index}.go"))))
        .count();
    let report = pool.finish();

    assert!(accepted < 10, "submit must fail once every worker has stopped");
    assert_eq!(report.summary().processed(), 0);
    assert!(report.errors().is_none());
}

#[test]
fn zero_workers_means_available_parallelism() {
    let mut processor = MockFileProcessor::new();
    processor.expect_process().never();

    let pool =
        WorkerPool::start(0, Arc::new(processor), &CancellationToken::new()).expect("start pool");
    assert!(pool.workers() >= 1);
    let report = pool.finish();

    assert_eq!(report.summary().processed(), 0);
}

#[test]
fn summary_renders_counts() {
    insta::assert_snapshot!(
        crate::RunSummary::new(5, 3).to_string(),
        @"rewrote 3 file(s); processed 5 file(s)"
    );
}
