//! Tree-sitter parsing wrapper for Go sources.
//!
//! Tree-sitter recovers from malformed input by inserting ERROR and MISSING
//! nodes, and the Go grammar also accepts statements at the top level of a
//! file. The rewriter must never touch a file the Go toolchain would reject,
//! so this wrapper offers both the tolerant [`Parser::parse`] and the strict
//! [`Parser::parse_strict`], which reports the first error node or the first
//! misplaced top-level item as a [`SyntaxError::InvalidSyntax`].

use std::ops::Range;

use crate::error::SyntaxError;
use crate::language::{
    COMMENT_KIND, IMPORT_DECLARATION_KIND, PACKAGE_CLAUSE_KIND, TOP_LEVEL_DECLARATION_KINDS,
    go_language,
};
use crate::position::point_to_one_based;

/// Result of parsing source code.
///
/// Owns the syntax tree together with the source text it was built from, so
/// node byte ranges can be resolved back to text.
#[derive(Debug)]
pub struct ParseResult {
    tree: tree_sitter::Tree,
    source: String,
}

impl ParseResult {
    /// Returns the parsed syntax tree.
    #[must_use]
    pub const fn tree(&self) -> &tree_sitter::Tree {
        &self.tree
    }

    /// Returns the source code that was parsed.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Consumes the result and returns the source code.
    #[must_use]
    pub fn into_source(self) -> String {
        self.source
    }

    /// Returns whether the tree contains any ERROR or MISSING nodes.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }

    /// Collects all syntax errors found in the parse result, in source order.
    #[must_use]
    pub fn errors(&self) -> Vec<SyntaxErrorInfo> {
        let mut errors = Vec::new();
        collect_error_nodes(self.tree.root_node(), &self.source, &mut errors);
        errors
    }

    /// Returns the root node of the syntax tree.
    #[must_use]
    pub fn root_node(&self) -> tree_sitter::Node<'_> {
        self.tree.root_node()
    }
}

/// Information about a syntax error found during parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxErrorInfo {
    /// Byte range of the error in the source.
    pub byte_range: Range<usize>,
    /// Line number (one-based) where the error starts.
    pub line: u32,
    /// Column number (one-based) where the error starts.
    pub column: u32,
    /// A snippet of the problematic source text.
    pub context: String,
    /// Human-readable description of the error.
    pub message: String,
}

impl SyntaxErrorInfo {
    fn from_node(node: tree_sitter::Node<'_>, source: &str) -> Self {
        let byte_range = node.byte_range();

        let context = source
            .get(byte_range.clone())
            .map(|text| {
                if text.chars().count() > 50 {
                    let truncated: String = text.chars().take(47).collect();
                    format!("{truncated}...")
                } else {
                    text.to_owned()
                }
            })
            .unwrap_or_default();

        let message = if node.is_missing() {
            format!("missing {}", node.kind())
        } else if context.is_empty() {
            "syntax error".to_owned()
        } else {
            format!("syntax error near `{}`", context.escape_debug())
        };

        let (line, column) = point_to_one_based(node.start_position());

        Self {
            byte_range,
            line,
            column,
            context,
            message,
        }
    }
}

impl From<SyntaxErrorInfo> for SyntaxError {
    fn from(info: SyntaxErrorInfo) -> Self {
        Self::invalid_syntax(info.line, info.column, info.message)
    }
}

/// Tree-sitter parser configured with the Go grammar.
///
/// A parser holds mutable state and is not `Sync`; create one per thread.
pub struct Parser {
    inner: tree_sitter::Parser,
}

impl Parser {
    /// Creates a new Go parser.
    ///
    /// # Errors
    ///
    /// Returns an error if the grammar is incompatible with the linked
    /// Tree-sitter runtime.
    pub fn new() -> Result<Self, SyntaxError> {
        let mut inner = tree_sitter::Parser::new();
        inner
            .set_language(&go_language())
            .map_err(|e| SyntaxError::parser_init(e.to_string()))?;

        Ok(Self { inner })
    }

    /// Parses source code, tolerating syntax errors.
    ///
    /// # Errors
    ///
    /// Returns an error only if Tree-sitter fails to produce a tree.
    pub fn parse(&mut self, source: &str) -> Result<ParseResult, SyntaxError> {
        let tree = self
            .inner
            .parse(source, None)
            .ok_or_else(|| SyntaxError::parse("parser produced no tree"))?;

        Ok(ParseResult {
            tree,
            source: source.to_owned(),
        })
    }

    /// Parses source code and rejects anything that is not a well-formed Go
    /// source file.
    ///
    /// Besides error nodes, the file must open with exactly one `package`
    /// clause, followed by imports and then only declarations.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::InvalidSyntax`] describing the first error node
    /// or misplaced top-level item, or any error from [`Parser::parse`].
    pub fn parse_strict(&mut self, source: &str) -> Result<ParseResult, SyntaxError> {
        let parsed = self.parse(source)?;
        if parsed.has_errors() {
            return match parsed.errors().into_iter().next() {
                Some(first) => Err(first.into()),
                // `has_error` can be set on a node whose error child is hidden.
                None => Err(SyntaxError::invalid_syntax(1, 1, "syntax error")),
            };
        }

        check_file_layout(parsed.root_node())?;
        Ok(parsed)
    }
}

impl std::fmt::Debug for Parser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parser").field("language", &"go").finish()
    }
}

/// Enforces the top-level shape of a Go file: one leading `package` clause,
/// then imports, then declarations. Comments may appear anywhere.
fn check_file_layout(root: tree_sitter::Node<'_>) -> Result<(), SyntaxError> {
    let mut seen_package = false;
    let mut seen_declaration = false;

    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        let kind = child.kind();
        if kind == COMMENT_KIND {
            continue;
        }
        if !seen_package {
            if kind != PACKAGE_CLAUSE_KIND {
                return Err(misplaced(child, format!("expected 'package', found {kind}")));
            }
            seen_package = true;
            continue;
        }

        if kind == IMPORT_DECLARATION_KIND {
            if seen_declaration {
                return Err(misplaced(
                    child,
                    "imports must appear before other declarations".to_owned(),
                ));
            }
        } else if TOP_LEVEL_DECLARATION_KINDS.contains(&kind) {
            seen_declaration = true;
        } else {
            return Err(misplaced(child, format!("expected declaration, found {kind}")));
        }
    }

    if seen_package {
        return Ok(());
    }
    let (line, column) = point_to_one_based(root.end_position());
    Err(SyntaxError::invalid_syntax(
        line,
        column,
        "expected 'package', found EOF",
    ))
}

fn misplaced(node: tree_sitter::Node<'_>, message: String) -> SyntaxError {
    let (line, column) = point_to_one_based(node.start_position());
    SyntaxError::invalid_syntax(line, column, message)
}

fn collect_error_nodes(
    node: tree_sitter::Node<'_>,
    source: &str,
    errors: &mut Vec<SyntaxErrorInfo>,
) {
    if node.is_error() || node.is_missing() {
        errors.push(SyntaxErrorInfo::from_node(node, source));
        return;
    }
    if !node.has_error() {
        return;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_error_nodes(child, source, errors);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("package main\n")]
    #[case("package main\n\nfunc main() {}\n")]
    #[case("package main\n\nvar s = `raw`\n")]
    #[case("package main\n\ntype T struct {\n\tName string `json:\"name\"`\n}\n")]
    #[case("// Package main is a command.\npackage main\n\nimport \"fmt\"\n\nfunc main() { fmt.Println() }\n")]
    fn parser_accepts_valid_source(#[case] source: &str) {
        let mut parser = Parser::new().expect("parser init");
        let result = parser.parse_strict(source).expect("parse");

        assert!(!result.has_errors());
        assert_eq!(result.source(), source);
    }

    #[rstest]
    #[case("package main\n\nfunc main() {\n")]
    #[case("package main\n\nvar = 1\n")]
    #[case("package main\n\nfunc (\n")]
    fn parser_detects_syntax_errors(#[case] source: &str) {
        let mut parser = Parser::new().expect("parser init");
        let result = parser.parse(source).expect("parse");

        assert!(result.has_errors());
        assert!(!result.errors().is_empty());
    }

    #[rstest]
    #[case::no_package_clause("var s = `x`\n", 1, "expected 'package', found var_declaration")]
    #[case::empty_file("", 1, "expected 'package', found EOF")]
    #[case::comment_only("// nothing here", 1, "expected 'package', found EOF")]
    #[case::top_level_statement("package main\n\nx := `a`\n", 3, "expected declaration, found short_var_declaration")]
    #[case::second_package_clause("package main\n\npackage other\n", 3, "expected declaration, found package_clause")]
    #[case::late_import(
        "package main\n\nvar a = 1\n\nimport \"fmt\"\n",
        5,
        "imports must appear before other declarations"
    )]
    fn parse_strict_rejects_misplaced_top_level_items(
        #[case] source: &str,
        #[case] expected_line: u32,
        #[case] expected_message: &str,
    ) {
        let mut parser = Parser::new().expect("parser init");
        let error = parser.parse_strict(source).expect_err("should reject");

        match error {
            SyntaxError::InvalidSyntax { line, message, .. } => {
                assert_eq!(line, expected_line);
                assert_eq!(message, expected_message);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn parse_strict_reports_location() {
        let mut parser = Parser::new().expect("parser init");
        let error = parser
            .parse_strict("package main\n\nfunc main() {\n\tx := \n}\n")
            .expect_err("should reject");

        match error {
            SyntaxError::InvalidSyntax { line, column, .. } => {
                assert!(line >= 3, "error reported on line {line}");
                assert!(column >= 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
