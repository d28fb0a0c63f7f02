//! Rewrite pass converting eligible raw literals.
//!
//! The pass walks a parsed file, consults the [`TagPositionIndex`] and the
//! [`EligibilityRule`], and records one [`LiteralEdit`] per literal to convert.
//! The tree itself is never modified; [`RewritePlan::print`] splices the edits
//! into the original source, leaving every other byte (comments included)
//! untouched.

use std::ops::Range;

use crate::eligibility::EligibilityRule;
use crate::error::{Interrupted, SyntaxError};
use crate::literal::{Literal, LiteralKind, raw_content};
use crate::parser::{ParseResult, Parser};
use crate::quote::{quote_interpreted, raw_value};
use crate::tag_index::TagPositionIndex;
use crate::visit::walk_preorder;

/// Replacement text for one literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralEdit {
    range: Range<usize>,
    line: u32,
    column: u32,
    original: String,
    replacement: String,
}

impl LiteralEdit {
    /// Returns the byte range of the literal being replaced.
    #[must_use]
    pub fn byte_range(&self) -> Range<usize> {
        self.range.clone()
    }

    /// Returns the one-based line and column of the literal.
    #[must_use]
    pub const fn position(&self) -> (u32, u32) {
        (self.line, self.column)
    }

    /// Returns the literal as originally written.
    #[must_use]
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Returns the interpreted literal that replaces it.
    #[must_use]
    pub fn replacement(&self) -> &str {
        &self.replacement
    }
}

/// Edits produced by one rewrite pass, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewritePlan {
    edits: Vec<LiteralEdit>,
}

impl RewritePlan {
    /// Returns the recorded edits.
    #[must_use]
    pub fn edits(&self) -> &[LiteralEdit] {
        &self.edits
    }

    /// Returns the number of literals to convert.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edits.len()
    }

    /// Returns whether the pass left the file unmodified.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Applies the edits to `source` and returns the new text.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::PrintError`] if an edit falls outside `source`
    /// or off a UTF-8 boundary, which means `source` is not the text the
    /// plan was built from.
    pub fn print(&self, source: &str) -> Result<String, SyntaxError> {
        let mut output = source.to_owned();

        // Back to front so earlier offsets stay valid.
        for edit in self.edits.iter().rev() {
            let range = edit.byte_range();
            if range.end > output.len() {
                return Err(SyntaxError::print(format!(
                    "edit at {}:{} lies beyond the end of the source",
                    edit.line, edit.column
                )));
            }
            if !output.is_char_boundary(range.start) || !output.is_char_boundary(range.end) {
                return Err(SyntaxError::print(format!(
                    "edit at {}:{} is not on a UTF-8 boundary",
                    edit.line, edit.column
                )));
            }
            if output.get(range.clone()) != Some(edit.original.as_str()) {
                return Err(SyntaxError::print(format!(
                    "source changed under the edit at {}:{}",
                    edit.line, edit.column
                )));
            }

            output.replace_range(range, &edit.replacement);
        }

        Ok(output)
    }
}

/// Engine for the literal rewrite pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiteralRewriter {
    rule: EligibilityRule,
}

impl LiteralRewriter {
    /// Creates a rewriter applying `rule`.
    #[must_use]
    pub const fn new(rule: EligibilityRule) -> Self {
        Self { rule }
    }

    /// Walks `parsed` and records an edit for every convertible literal.
    ///
    /// Literals whose start byte is in `tags` are skipped whatever their
    /// content.
    ///
    /// # Errors
    ///
    /// Returns [`Interrupted`] if `cancelled` reports `true` during the walk.
    pub fn plan<C>(
        &self,
        parsed: &ParseResult,
        tags: &TagPositionIndex,
        cancelled: &C,
    ) -> Result<RewritePlan, Interrupted>
    where
        C: Fn() -> bool + ?Sized,
    {
        let source = parsed.source();
        let mut edits = Vec::new();

        walk_preorder(parsed.root_node(), cancelled, |node| {
            let Some(literal) = Literal::from_node(node, source) else {
                return;
            };
            if literal.kind() != LiteralKind::Raw || tags.contains(literal.start_byte()) {
                return;
            }
            if let Some(edit) = self.edit_for(&literal) {
                edits.push(edit);
            }
        })?;

        Ok(RewritePlan { edits })
    }

    fn edit_for(&self, literal: &Literal<'_>) -> Option<LiteralEdit> {
        let text = literal.text();
        if !self.rule.is_eligible(text) {
            return None;
        }
        let content = raw_content(text)?;
        let (line, column) = literal.position();

        Some(LiteralEdit {
            range: literal.byte_range(),
            line,
            column,
            original: text.to_owned(),
            replacement: quote_interpreted(&raw_value(content)),
        })
    }

    /// Runs both passes over `source` without cancellation and prints the
    /// result.
    ///
    /// # Errors
    ///
    /// Returns an error if `source` does not parse cleanly or printing fails.
    pub fn rewrite_source(&self, source: &str) -> Result<RewriteResult, SyntaxError> {
        let never = || false;
        let mut parser = Parser::new()?;
        let parsed = parser.parse_strict(source)?;

        let (tags, plan) = TagPositionIndex::build(&parsed, &never)
            .and_then(|tags| self.plan(&parsed, &tags, &never).map(|plan| (tags, plan)))
            .map_err(|interrupted| SyntaxError::parse(interrupted.to_string()))?;

        let output = if plan.is_empty() {
            parsed.into_source()
        } else {
            plan.print(parsed.source())?
        };

        Ok(RewriteResult {
            output,
            num_replacements: plan.len(),
            num_tags: tags.len(),
        })
    }
}

/// Result of [`LiteralRewriter::rewrite_source`].
#[derive(Debug, Clone)]
pub struct RewriteResult {
    output: String,
    num_replacements: usize,
    num_tags: usize,
}

impl RewriteResult {
    /// Returns the transformed source code.
    #[must_use]
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Returns the number of literals converted.
    #[must_use]
    pub const fn num_replacements(&self) -> usize {
        self.num_replacements
    }

    /// Returns the number of struct tags that were protected.
    #[must_use]
    pub const fn num_tags(&self) -> usize {
        self.num_tags
    }

    /// Returns whether any literal was converted.
    #[must_use]
    pub const fn has_changes(&self) -> bool {
        self.num_replacements > 0
    }
}
