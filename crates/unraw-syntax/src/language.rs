//! Go grammar selection and the node kinds the analysis relies on.
//!
//! The rewriter only understands Go. This module names the extension of Go
//! sources and hands out the Tree-sitter grammar together with the node kinds
//! the analysis passes look for.

/// File extension (without the dot) of Go source files.
pub const SOURCE_EXTENSION: &str = "go";

/// Node kind of a backtick-delimited string literal.
pub(crate) const RAW_STRING_KIND: &str = "raw_string_literal";

/// Node kind of a double-quoted string literal.
pub(crate) const INTERPRETED_STRING_KIND: &str = "interpreted_string_literal";

/// Node kind of a struct field declaration.
pub(crate) const FIELD_DECLARATION_KIND: &str = "field_declaration";

/// Field name of the tag attached to a struct field declaration.
pub(crate) const TAG_FIELD: &str = "tag";

/// Node kind of the `package` clause opening every source file.
pub(crate) const PACKAGE_CLAUSE_KIND: &str = "package_clause";

/// Node kind of an `import` declaration.
pub(crate) const IMPORT_DECLARATION_KIND: &str = "import_declaration";

/// Node kind of a line or block comment.
pub(crate) const COMMENT_KIND: &str = "comment";

/// Declarations allowed at the top level of a file after its imports.
pub(crate) const TOP_LEVEL_DECLARATION_KINDS: &[&str] = &[
    "function_declaration",
    "method_declaration",
    "type_declaration",
    "const_declaration",
    "var_declaration",
];

/// Returns the Tree-sitter grammar for Go.
#[must_use]
pub fn go_language() -> tree_sitter::Language {
    tree_sitter_go::LANGUAGE.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn go_language_loads() {
        let mut parser = tree_sitter::Parser::new();
        assert!(parser.set_language(&go_language()).is_ok());
    }
}
