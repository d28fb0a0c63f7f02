//! Tree-sitter powered analysis of Go string literals.
//!
//! This crate provides the per-file half of `unraw`:
//!
//! - **Parsing** via [`Parser`], which rejects sources containing syntax
//!   errors when used through [`Parser::parse_strict`]
//! - **Tag protection** via [`TagPositionIndex`], the set of struct field
//!   tags that must never be rewritten
//! - **Eligibility** via [`EligibilityRule`], the pure predicate over a raw
//!   literal's text
//! - **Rewriting** via [`LiteralRewriter`], which records a [`LiteralEdit`]
//!   for every convertible literal and prints the edited source
//! - **Canonicalisation** via the [`Canonicalizer`] implementations
//!   [`SyntaxCheck`] and [`Gofmt`]
//!
//! # Example
//!
//! ```
//! use unraw_syntax::LiteralRewriter;
//!
//! let rewriter = LiteralRewriter::default();
//! let result = rewriter.rewrite_source("package main\n\nvar s = `hello`\n")?;
//!
//! assert_eq!(result.output(), "package main\n\nvar s = \"hello\"\n");
//! # Ok::<(), unraw_syntax::SyntaxError>(())
//! ```

mod canonical;
mod eligibility;
mod error;
mod language;
mod literal;
mod parser;
mod position;
mod quote;
mod rewriter;
mod tag_index;
mod visit;

pub use canonical::{Canonicalizer, Gofmt, SyntaxCheck};
pub use eligibility::{EligibilityRule, QuotePolicy};
pub use error::{Interrupted, SyntaxError};
pub use language::{SOURCE_EXTENSION, go_language};
pub use literal::{
    ESCAPE, INTERPRETED_DELIMITER, Literal, LiteralKind, RAW_DELIMITER, raw_content,
};
pub use parser::{ParseResult, Parser, SyntaxErrorInfo};
pub use quote::{UnquoteError, quote_interpreted, raw_value, unquote_interpreted};
pub use rewriter::{LiteralEdit, LiteralRewriter, RewritePlan, RewriteResult};
pub use tag_index::TagPositionIndex;

#[cfg(test)]
mod tests;
