//! String literal leaves of a Go syntax tree.

use std::ops::Range;

use crate::language::{INTERPRETED_STRING_KIND, RAW_STRING_KIND};
use crate::position::point_to_one_based;

/// Delimiter of raw string literals.
pub const RAW_DELIMITER: char = '`';

/// Delimiter of interpreted string literals.
pub const INTERPRETED_DELIMITER: char = '"';

/// Escape character of interpreted string literals.
pub const ESCAPE: char = '\\';

/// The two flavours of Go string literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    /// Backtick-delimited, taken verbatim.
    Raw,
    /// Double-quoted, backslash escapes honoured.
    Interpreted,
}

/// A string literal found in a parsed source.
///
/// The start byte identifies the literal within a single parse.
#[derive(Debug, Clone, Copy)]
pub struct Literal<'tree> {
    kind: LiteralKind,
    text: &'tree str,
    node: tree_sitter::Node<'tree>,
}

impl<'tree> Literal<'tree> {
    /// Wraps `node` if it is a string literal, resolving its text in `source`.
    #[must_use]
    pub fn from_node(node: tree_sitter::Node<'tree>, source: &'tree str) -> Option<Self> {
        let kind = match node.kind() {
            RAW_STRING_KIND => LiteralKind::Raw,
            INTERPRETED_STRING_KIND => LiteralKind::Interpreted,
            _ => return None,
        };
        let text = source.get(node.byte_range())?;
        Some(Self { kind, text, node })
    }

    /// Returns the literal flavour.
    #[must_use]
    pub const fn kind(&self) -> LiteralKind {
        self.kind
    }

    /// Returns the literal exactly as written, delimiters included.
    #[must_use]
    pub const fn text(&self) -> &'tree str {
        self.text
    }

    /// Returns the byte offset of the opening delimiter.
    #[must_use]
    pub fn start_byte(&self) -> usize {
        self.node.start_byte()
    }

    /// Returns the byte range covered by the literal.
    #[must_use]
    pub fn byte_range(&self) -> Range<usize> {
        self.node.byte_range()
    }

    /// Returns the one-based line and column of the opening delimiter.
    #[must_use]
    pub fn position(&self) -> (u32, u32) {
        point_to_one_based(self.node.start_position())
    }
}

/// Returns the text between the backticks of a raw literal.
///
/// `None` unless `raw` both starts and ends with a backtick and is at least
/// two characters long.
#[must_use]
pub fn raw_content(raw: &str) -> Option<&str> {
    raw.strip_prefix(RAW_DELIMITER)?.strip_suffix(RAW_DELIMITER)
}
