//! Positions of struct field tags.
//!
//! Struct tags are read through reflection at run time and conventionally stay
//! backtick-delimited, so the rewrite pass consults this index and leaves
//! them alone. The index is built in a pass of its own and is complete before
//! any literal is classified.

use std::collections::HashSet;

use crate::error::Interrupted;
use crate::language::{FIELD_DECLARATION_KIND, TAG_FIELD};
use crate::parser::ParseResult;
use crate::visit::walk_preorder;

/// Start bytes of every struct field tag in one parsed file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagPositionIndex {
    positions: HashSet<usize>,
}

impl TagPositionIndex {
    /// Walks the whole tree and records the position of every field tag.
    ///
    /// # Errors
    ///
    /// Returns [`Interrupted`] if `cancelled` reports `true` before the walk
    /// finishes. A partial index is never returned.
    pub fn build<C>(parsed: &ParseResult, cancelled: &C) -> Result<Self, Interrupted>
    where
        C: Fn() -> bool + ?Sized,
    {
        let mut positions = HashSet::new();
        walk_preorder(parsed.root_node(), cancelled, |node| {
            if node.kind() != FIELD_DECLARATION_KIND {
                return;
            }
            if let Some(tag) = node.child_by_field_name(TAG_FIELD) {
                positions.insert(tag.start_byte());
            }
        })?;

        Ok(Self { positions })
    }

    /// Returns whether a literal starting at `start_byte` is a field tag.
    #[must_use]
    pub fn contains(&self, start_byte: usize) -> bool {
        self.positions.contains(&start_byte)
    }

    /// Returns the number of recorded tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns whether no tags were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
