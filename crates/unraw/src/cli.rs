//! Command-line definition for the `unraw` binary.

use std::path::PathBuf;

use clap::Parser;
use unraw_config::Config;

/// Rewrites eligible raw string literals in Go sources as interpreted
/// literals, in place.
#[derive(Parser, Debug)]
#[command(name = "unraw", version)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) config: Config,
    /// Go file or directory to rewrite. Defaults to the current directory.
    #[arg(value_name = "PATH")]
    pub(crate) path: Option<PathBuf>,
}

impl Cli {
    pub(crate) fn root(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}
