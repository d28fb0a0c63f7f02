//! Crate-level unit tests for unraw-syntax.
