//! The rule deciding whether a raw literal may be converted.
//!
//! The rule only looks at literal text. Whether the literal sits in a struct
//! tag is decided separately by [`TagPositionIndex`](crate::TagPositionIndex).

use crate::literal::{ESCAPE, INTERPRETED_DELIMITER, RAW_DELIMITER, raw_content};

/// How raw literals containing a double quote are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum QuotePolicy {
    /// Convert them and escape the quote (`"` becomes `\"`).
    #[default]
    Escape,
    /// Leave them as raw literals.
    Skip,
}

/// Pure predicate over a literal's raw text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EligibilityRule {
    quote_policy: QuotePolicy,
}

impl EligibilityRule {
    /// Creates a rule with the given quote policy.
    #[must_use]
    pub const fn new(quote_policy: QuotePolicy) -> Self {
        Self { quote_policy }
    }

    /// Returns whether `raw` can be rewritten as an interpreted literal.
    ///
    /// `raw` must be backtick-delimited and its content must not contain a
    /// newline, a backtick or a backslash. Under [`QuotePolicy::Skip`] a
    /// double quote also disqualifies it.
    ///
    /// # Examples
    ///
    /// ```
    /// use unraw_syntax::EligibilityRule;
    ///
    /// let rule = EligibilityRule::default();
    /// assert!(rule.is_eligible("`hello`"));
    /// assert!(!rule.is_eligible("`C:\\temp`"));
    /// assert!(!rule.is_eligible("\"hello\""));
    /// ```
    #[must_use]
    pub fn is_eligible(&self, raw: &str) -> bool {
        let Some(content) = raw_content(raw) else {
            return false;
        };

        !content.chars().any(|ch| self.is_forbidden(ch))
    }

    fn is_forbidden(&self, ch: char) -> bool {
        match ch {
            '\n' | RAW_DELIMITER | ESCAPE => true,
            INTERPRETED_DELIMITER => self.quote_policy == QuotePolicy::Skip,
            _ => false,
        }
    }
}
