//! Entry point for the `unraw` binary; all work happens in [`unraw::run`].

use std::io::{self, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    // Worker threads log to stderr, so it must stay unlocked here.
    let mut stderr = io::stderr();
    unraw::run(std::env::args_os(), &mut stdout, &mut stderr)
}
