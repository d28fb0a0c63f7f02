//! Tests that drive whole runs through the crate's public entry points.

use std::collections::BTreeSet;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use rstest::rstest;
use unraw_config::Config;

use super::support::{CancelAfter, GoTree, INVALID_SOURCE, eligible_source, rewritten_source};
use crate::{
    AggregateError, CancellationToken, RunError, RunSummary, WalkError, process_path,
    process_path_with, run,
};

fn config(workers: usize) -> Config {
    Config::default().with_workers(workers)
}

fn expect_aggregate(result: Result<RunSummary, RunError>) -> (RunSummary, AggregateError) {
    match result {
        Err(RunError::Aggregate { summary, errors }) => (summary, errors),
        other => panic!("expected an aggregate error, got {other:?}"),
    }
}

#[rstest]
#[case(1)]
#[case(4)]
fn one_invalid_file_does_not_stop_the_others(#[case] workers: usize) {
    let tree = GoTree::with_eligible(3);
    let invalid = tree.write("zz_invalid.go", INVALID_SOURCE);

    let result = process_path(&config(workers), tree.root(), &CancellationToken::new());

    let (summary, errors) = expect_aggregate(result);
    assert_eq!(summary.rewritten(), 3);
    assert_eq!(summary.processed(), 3);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.paths().collect::<Vec<_>>(), [invalid.as_path()]);
    let message = errors.to_string();
    assert!(
        message.starts_with(&format!("error processing file {}: ", invalid.display())),
        "{message}"
    );
    for index in 0..3 {
        assert_eq!(tree.read(&format!("{index:02}.go")), rewritten_source(index));
    }
}

#[test]
fn aggregate_names_exactly_the_failed_files() {
    let tree = GoTree::with_eligible(4);
    let failed: BTreeSet<PathBuf> = [
        tree.write("bad_a.go", INVALID_SOURCE),
        tree.write("nested/bad_b.go", INVALID_SOURCE),
    ]
    .into_iter()
    .collect();

    let result = process_path(&config(3), tree.root(), &CancellationToken::new());

    let (summary, errors) = expect_aggregate(result);
    let reported: BTreeSet<PathBuf> = errors.paths().map(PathBuf::from).collect();
    assert_eq!(reported, failed);
    assert_eq!(summary.rewritten(), 4);
    assert_eq!(errors.to_string().lines().count(), 2);
}

#[test]
fn pool_size_does_not_change_the_result() {
    let build = || {
        let tree = GoTree::with_eligible(12);
        tree.write("pkg/keep.go", "package pkg\n\nvar s = `two\nlines`\n");
        tree.write(
            "pkg/tags.go",
            "package pkg\n\ntype T struct {\n\tA int `json:\"a\"`\n}\n\nvar k = `a`\n",
        );
        tree
    };
    let sequential = build();
    let parallel = build();

    let one = process_path(&config(1), sequential.root(), &CancellationToken::new())
        .expect("sequential run");
    let many = process_path(&config(4), parallel.root(), &CancellationToken::new())
        .expect("parallel run");

    assert_eq!(one, many);
    assert_eq!((one.processed(), one.rewritten()), (14, 13));
    assert_eq!(sequential.snapshot(), parallel.snapshot());
}

#[test]
fn cancellation_mid_run_stops_cleanly() {
    let tree = GoTree::with_eligible(10);
    let cancel = CancellationToken::new();
    let processor = Arc::new(CancelAfter::new(2, &cancel));

    let summary = process_path_with(processor.clone(), 1, tree.root(), &cancel)
        .expect("cancellation is not an error");

    assert!(cancel.is_cancelled());
    assert_eq!(processor.started(), 2);
    assert!(summary.rewritten() <= 2);
    let written = (0..10)
        .filter(|index| tree.read(&format!("{index:02}.go")) != eligible_source(*index))
        .count();
    assert_eq!(written, summary.rewritten());
}

#[test]
fn single_file_root_is_processed() {
    let tree = GoTree::with_eligible(2);

    let summary = process_path(
        &config(2),
        &tree.root().join("01.go"),
        &CancellationToken::new(),
    )
    .expect("run");

    assert_eq!((summary.processed(), summary.rewritten()), (1, 1));
    assert_eq!(tree.read("00.go"), eligible_source(0));
    assert_eq!(tree.read("01.go"), rewritten_source(1));
}

#[cfg(unix)]
#[test]
fn symlinked_file_root_rewrites_its_target() {
    let tree = GoTree::with_eligible(1);
    let link = tree.root().join("link.go");
    std::os::unix::fs::symlink(tree.root().join("00.go"), &link).expect("symlink");

    let summary = process_path(&config(1), &link, &CancellationToken::new()).expect("run");

    assert_eq!((summary.processed(), summary.rewritten()), (1, 1));
    assert!(
        std::fs::symlink_metadata(&link)
            .expect("link metadata")
            .file_type()
            .is_symlink()
    );
    assert_eq!(tree.read("00.go"), rewritten_source(0));
}

#[test]
fn missing_root_is_a_walk_error() {
    let tree = GoTree::new();
    let result = process_path(
        &config(1),
        &tree.root().join("missing"),
        &CancellationToken::new(),
    );

    assert!(matches!(result, Err(RunError::Walk(WalkError::Stat { .. }))));
}

fn invoke(args: &[&str]) -> (ExitCode, String, String) {
    let argv: Vec<OsString> = std::iter::once("unraw")
        .chain(args.iter().copied())
        .map(OsString::from)
        .collect();
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let exit = run(argv, &mut stdout, &mut stderr);
    (
        exit,
        String::from_utf8(stdout).expect("stdout utf8"),
        String::from_utf8(stderr).expect("stderr utf8"),
    )
}

#[test]
fn run_prints_the_summary() {
    let tree = GoTree::with_eligible(1);
    tree.write("plain.go", "package sample\n");
    let root = tree.root().to_str().expect("utf8 temp path").to_owned();

    let (exit, stdout, stderr) = invoke(&["--workers", "2", "--log-filter", "off", root.as_str()]);

    assert_eq!(exit, ExitCode::SUCCESS, "{stderr}");
    insta::assert_snapshot!(stdout.trim_end(), @"rewrote 1 file(s); processed 2 file(s)");
}

#[test]
fn run_reports_failures_on_stderr() {
    let tree = GoTree::with_eligible(1);
    let invalid = tree.write("broken.go", INVALID_SOURCE);
    let root = tree.root().to_str().expect("utf8 temp path").to_owned();

    let (exit, stdout, stderr) = invoke(&["--log-filter", "off", root.as_str()]);

    assert_eq!(exit, ExitCode::FAILURE);
    assert!(stdout.is_empty());
    assert!(
        stderr.contains(&format!("error processing file {}", invalid.display())),
        "{stderr}"
    );
}

#[rstest]
#[case(&["--help"], ExitCode::SUCCESS)]
#[case(&["--version"], ExitCode::SUCCESS)]
#[case(&["--formatter", "prettier"], ExitCode::FAILURE)]
#[case(&["--workers", "-1"], ExitCode::FAILURE)]
#[case(&["--workers", "18446744073709551615", "."], ExitCode::FAILURE)]
fn run_handles_clap_exits(#[case] args: &[&str], #[case] expected: ExitCode) {
    let (exit, stdout, stderr) = invoke(args);

    assert_eq!(exit, expected);
    if expected == ExitCode::SUCCESS {
        assert!(!stdout.is_empty());
    } else {
        assert!(!stderr.is_empty());
    }
}
