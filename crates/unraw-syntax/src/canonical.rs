//! Canonicalisation of printed sources.
//!
//! A rewritten file is only written back after it has gone through a
//! [`Canonicalizer`]. Every implementation finishes with a strict re-parse so
//! syntactically broken output is rejected before it reaches the disk.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::SyntaxError;
use crate::parser::Parser;

/// Turns printed source text into its canonical form.
///
/// Implementations are shared between worker threads.
pub trait Canonicalizer: Send + Sync {
    /// Returns the canonical form of `source`.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::CanonicalizeError`] if `source` cannot be
    /// canonicalised or the result does not parse cleanly, and
    /// [`SyntaxError::FormatterUnavailable`] if an external formatter cannot
    /// be started.
    fn canonicalize(&self, source: String) -> Result<String, SyntaxError>;
}

/// Canonicaliser that keeps the printed text and only verifies it parses.
///
/// No formatting happens. An escaped literal can be wider than the raw one it
/// replaces, so columns that `gofmt` aligns after it, such as trailing
/// comments in a `const` block, may end up misaligned.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntaxCheck;

impl SyntaxCheck {
    /// Creates the syntax-check canonicaliser.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Verifies that `source` parses without error nodes.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::CanonicalizeError`] naming the first problem.
    pub fn verify(&self, source: &str) -> Result<(), SyntaxError> {
        let mut parser = Parser::new()?;
        parser
            .parse_strict(source)
            .map(drop)
            .map_err(|error| SyntaxError::canonicalize(format!("output does not parse: {error}")))
    }
}

impl Canonicalizer for SyntaxCheck {
    fn canonicalize(&self, source: String) -> Result<String, SyntaxError> {
        self.verify(&source)?;
        Ok(source)
    }
}

/// Canonicaliser that pipes the source through an external `gofmt`.
#[derive(Debug, Clone)]
pub struct Gofmt {
    program: PathBuf,
    check: SyntaxCheck,
}

impl Gofmt {
    /// Creates a canonicaliser running `program` (usually `gofmt`).
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            check: SyntaxCheck::new(),
        }
    }

    /// Returns the executable that will be run.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Formats `source` and verifies the result parses.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::FormatterUnavailable`] if the executable cannot
    /// be started, and [`SyntaxError::CanonicalizeError`] if it fails or its
    /// output does not parse cleanly.
    pub fn format(&self, source: &str) -> Result<String, SyntaxError> {
        let formatted = self.run(source)?;
        self.check.verify(&formatted)?;
        Ok(formatted)
    }

    fn run(&self, source: &str) -> Result<String, SyntaxError> {
        let mut child = Command::new(&self.program)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| SyntaxError::FormatterUnavailable {
                program: self.program.clone(),
                source,
            })?;
        let program = self.program.display();

        // gofmt reads all of stdin before it writes anything.
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(source.as_bytes()).map_err(|error| {
                SyntaxError::canonicalize(format!("failed to feed {program}: {error}"))
            })?;
        }

        let output = child.wait_with_output().map_err(|error| {
            SyntaxError::canonicalize(format!("failed to wait for {program}: {error}"))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SyntaxError::canonicalize(format!(
                "{program} exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        String::from_utf8(output.stdout)
            .map_err(|_| SyntaxError::canonicalize(format!("{program} produced non-UTF-8 output")))
    }
}

impl Canonicalizer for Gofmt {
    fn canonicalize(&self, source: String) -> Result<String, SyntaxError> {
        self.format(&source)
    }
}
