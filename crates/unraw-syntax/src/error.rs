//! Error types for syntactic analysis operations.
//!
//! This module provides structured error types for every operation in the
//! `unraw-syntax` crate: parsing, printing rewritten sources, and running
//! them through a canonicaliser.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors from syntactic analysis operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SyntaxError {
    /// Failed to initialise the Tree-sitter parser for the Go grammar.
    #[error("failed to initialise Go parser: {message}")]
    ParserInitError {
        /// Description of the failure.
        message: String,
    },

    /// Tree-sitter could not produce a tree at all.
    #[error("failed to parse Go source: {message}")]
    ParseError {
        /// Description of the failure.
        message: String,
    },

    /// The source parsed, but the tree contains error or missing nodes.
    #[error("{line}:{column}: {message}")]
    InvalidSyntax {
        /// One-based line of the first problem.
        line: u32,
        /// One-based column of the first problem.
        column: u32,
        /// Description of the first problem.
        message: String,
    },

    /// Splicing rewritten literals back into the source failed.
    #[error("print failed: {message}")]
    PrintError {
        /// Description of the failure.
        message: String,
    },

    /// The external formatter could not be started.
    #[error("failed to run {}: {source}", program.display())]
    FormatterUnavailable {
        /// Executable that was spawned.
        program: PathBuf,
        /// Error reported by the OS.
        #[source]
        source: io::Error,
    },

    /// The canonicaliser rejected or could not process the printed source.
    #[error("canonicalisation failed: {message}")]
    CanonicalizeError {
        /// Description of the failure.
        message: String,
    },
}

impl SyntaxError {
    /// Creates a parser initialisation error.
    #[must_use]
    pub fn parser_init(message: impl Into<String>) -> Self {
        Self::ParserInitError {
            message: message.into(),
        }
    }

    /// Creates a parse error.
    #[must_use]
    pub fn parse(message: impl Into<String>) -> Self {
        Self::ParseError {
            message: message.into(),
        }
    }

    /// Creates an invalid syntax error anchored at a one-based location.
    #[must_use]
    pub fn invalid_syntax(line: u32, column: u32, message: impl Into<String>) -> Self {
        Self::InvalidSyntax {
            line,
            column,
            message: message.into(),
        }
    }

    /// Creates a print error.
    #[must_use]
    pub fn print(message: impl Into<String>) -> Self {
        Self::PrintError {
            message: message.into(),
        }
    }

    /// Creates a canonicalisation error.
    #[must_use]
    pub fn canonicalize(message: impl Into<String>) -> Self {
        Self::CanonicalizeError {
            message: message.into(),
        }
    }
}

/// Raised when a tree walk observes a cancellation request and stops early.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("tree walk interrupted by cancellation")]
pub struct Interrupted;
