//! Conversion between raw literal content and interpreted literal text.
//!
//! [`quote_interpreted`] is self-sufficient: it escapes every character that
//! needs escaping in a double-quoted literal, even those the eligibility
//! rule already keeps out of converted literals.

use thiserror::Error;

/// Returns the value a raw literal with the given content denotes.
///
/// Go discards carriage returns inside raw literals.
#[must_use]
pub fn raw_value(content: &str) -> String {
    content.chars().filter(|ch| *ch != '\r').collect()
}

/// Encodes `value` as a double-quoted Go literal.
///
/// # Examples
///
/// ```
/// use unraw_syntax::quote_interpreted;
///
/// assert_eq!(quote_interpreted("hello"), "\"hello\"");
/// assert_eq!(quote_interpreted("say \"hi\""), "\"say \\\"hi\\\"\"");
/// ```
#[must_use]
pub fn quote_interpreted(value: &str) -> String {
    let mut out = String::with_capacity(value.len().saturating_add(2));
    out.push('"');
    for ch in value.chars() {
        push_escaped(&mut out, ch);
    }
    out.push('"');
    out
}

fn push_escaped(out: &mut String, ch: char) {
    match ch {
        '\u{7}' => out.push_str("\\a"),
        '\u{8}' => out.push_str("\\b"),
        '\u{c}' => out.push_str("\\f"),
        '\n' => out.push_str("\\n"),
        '\r' => out.push_str("\\r"),
        '\t' => out.push_str("\\t"),
        '\u{b}' => out.push_str("\\v"),
        '\\' => out.push_str("\\\\"),
        '"' => out.push_str("\\\""),
        printable if is_printable(printable) => out.push(printable),
        other => {
            let code = u32::from(other);
            let escaped = if code < 0x80 {
                format!("\\x{code:02x}")
            } else if code <= 0xFFFF {
                format!("\\u{code:04x}")
            } else {
                format!("\\U{code:08x}")
            };
            out.push_str(&escaped);
        }
    }
}

/// Approximates Go's `unicode.IsPrint`: graphic characters plus the ASCII
/// space.
fn is_printable(ch: char) -> bool {
    if ch == ' ' {
        return true;
    }
    if ch.is_control() || ch.is_whitespace() {
        return false;
    }
    !matches!(
        ch,
        '\u{00AD}'
            | '\u{061C}'
            | '\u{180E}'
            | '\u{200B}'..='\u{200F}'
            | '\u{202A}'..='\u{202E}'
            | '\u{2060}'..='\u{206F}'
            | '\u{E000}'..='\u{F8FF}'
            | '\u{FEFF}'
            | '\u{FFF9}'..='\u{FFFB}'
    )
}

/// Errors raised while decoding an interpreted literal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnquoteError {
    /// The text is not wrapped in double quotes.
    #[error("literal is not double-quoted")]
    MissingQuotes,
    /// The literal contains an unescaped double quote or a raw newline.
    #[error("unexpected {found:?} inside literal")]
    UnexpectedCharacter {
        /// The offending character.
        found: char,
    },
    /// An escape sequence is malformed or unknown.
    #[error("invalid escape sequence: {sequence}")]
    InvalidEscape {
        /// The sequence as written.
        sequence: String,
    },
    /// Byte escapes produced a value that is not UTF-8.
    #[error("decoded bytes are not valid UTF-8")]
    InvalidUtf8,
}

/// Decodes a double-quoted Go literal into its value.
///
/// # Errors
///
/// Returns an [`UnquoteError`] when `literal` is not a well-formed
/// interpreted string literal.
pub fn unquote_interpreted(literal: &str) -> Result<String, UnquoteError> {
    let body = literal
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .ok_or(UnquoteError::MissingQuotes)?;

    let mut bytes: Vec<u8> = Vec::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => decode_escape(&mut chars, &mut bytes)?,
            '"' | '\n' => return Err(UnquoteError::UnexpectedCharacter { found: ch }),
            other => push_char(&mut bytes, other),
        }
    }

    String::from_utf8(bytes).map_err(|_| UnquoteError::InvalidUtf8)
}

fn push_char(bytes: &mut Vec<u8>, ch: char) {
    let mut buf = [0_u8; 4];
    bytes.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
}

fn decode_escape(chars: &mut std::str::Chars<'_>, bytes: &mut Vec<u8>) -> Result<(), UnquoteError> {
    let Some(marker) = chars.next() else {
        return Err(invalid_escape("\\"));
    };

    let simple = match marker {
        'a' => Some(0x07),
        'b' => Some(0x08),
        'f' => Some(0x0C),
        'n' => Some(b'\n'),
        'r' => Some(b'\r'),
        't' => Some(b'\t'),
        'v' => Some(0x0B),
        '\\' => Some(b'\\'),
        '"' => Some(b'"'),
        _ => None,
    };
    if let Some(byte) = simple {
        bytes.push(byte);
        return Ok(());
    }

    match marker {
        'x' => {
            let digits = take_digits(chars, 2, 16)?;
            bytes.push(to_byte(digits, &format!("\\x{digits:02x}"))?);
        }
        '0'..='7' => {
            let rest = take_digits(chars, 2, 8)?;
            let first = marker.to_digit(8).unwrap_or_default();
            let value = first.saturating_mul(64).saturating_add(rest);
            bytes.push(to_byte(value, &format!("\\{value:03o}"))?);
        }
        'u' => push_code_point(chars, bytes, 4)?,
        'U' => push_code_point(chars, bytes, 8)?,
        other => return Err(invalid_escape(&format!("\\{other}"))),
    }
    Ok(())
}

fn push_code_point(
    chars: &mut std::str::Chars<'_>,
    bytes: &mut Vec<u8>,
    width: usize,
) -> Result<(), UnquoteError> {
    let value = take_digits(chars, width, 16)?;
    let ch = char::from_u32(value).ok_or_else(|| invalid_escape(&format!("U+{value:X}")))?;
    push_char(bytes, ch);
    Ok(())
}

fn take_digits(
    chars: &mut std::str::Chars<'_>,
    count: usize,
    radix: u32,
) -> Result<u32, UnquoteError> {
    let mut value: u32 = 0;
    for _ in 0..count {
        let digit = chars
            .next()
            .and_then(|ch| ch.to_digit(radix))
            .ok_or_else(|| invalid_escape("truncated numeric escape"))?;
        value = value.saturating_mul(radix).saturating_add(digit);
    }
    Ok(value)
}

fn to_byte(value: u32, sequence: &str) -> Result<u8, UnquoteError> {
    u8::try_from(value).map_err(|_| invalid_escape(sequence))
}

fn invalid_escape(sequence: &str) -> UnquoteError {
    UnquoteError::InvalidEscape {
        sequence: sequence.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("hello", "\"hello\"")]
    #[case("", "\"\"")]
    #[case("say \"hi\"", "\"say \\\"hi\\\"\"")]
    #[case("C:\\temp", "\"C:\\\\temp\"")]
    #[case("tab\there", "\"tab\\there\"")]
    #[case("line\nbreak", "\"line\\nbreak\"")]
    #[case("bell\u{7}", "\"bell\\a\"")]
    #[case("esc\u{1b}", "\"esc\\x1b\"")]
    #[case("del\u{7f}", "\"del\\x7f\"")]
    #[case("c1\u{85}", "\"c1\\u0085\"")]
    #[case("nbsp\u{a0}", "\"nbsp\\u00a0\"")]
    #[case("bom\u{feff}", "\"bom\\ufeff\"")]
    #[case("héllo, 世界", "\"héllo, 世界\"")]
    #[case("emoji 🎉", "\"emoji 🎉\"")]
    #[case("json:\"name\"", "\"json:\\\"name\\\"\"")]
    fn quote_escapes_like_go(#[case] value: &str, #[case] expected: &str) {
        assert_eq!(quote_interpreted(value), expected);
    }

    #[rstest]
    #[case("")]
    #[case("hello")]
    #[case("\\ \" ` \n \r \t")]
    #[case("\u{0}\u{1}\u{1f}\u{7f}\u{80}\u{9f}")]
    #[case("\u{2028}\u{fffe}\u{10ffff}")]
    #[case("mixed 世界 🎉 \u{200b}")]
    fn decode_inverts_quote(#[case] value: &str) {
        let quoted = quote_interpreted(value);
        assert_eq!(unquote_interpreted(&quoted).as_deref(), Ok(value));
    }

    #[test]
    fn raw_value_drops_carriage_returns() {
        assert_eq!(raw_value("a\r\nb\rc"), "a\nbc");
        assert_eq!(raw_value("plain"), "plain");
    }

    #[rstest]
    #[case("\"\\x41\\102\\u00e9\\U0001F389\"", "AB\u{e9}\u{1F389}")]
    #[case("\"\\xc3\\xa9\"", "é")]
    fn unquote_handles_numeric_escapes(#[case] literal: &str, #[case] expected: &str) {
        assert_eq!(unquote_interpreted(literal).as_deref(), Ok(expected));
    }

    #[rstest]
    #[case("hello", UnquoteError::MissingQuotes)]
    #[case("\"a\"b\"", UnquoteError::UnexpectedCharacter { found: '"' })]
    #[case("\"\\q\"", UnquoteError::InvalidEscape { sequence: "\\q".to_owned() })]
    #[case("\"\\xff\"", UnquoteError::InvalidUtf8)]
    fn unquote_rejects_malformed_literals(#[case] literal: &str, #[case] expected: UnquoteError) {
        assert_eq!(unquote_interpreted(literal), Err(expected));
    }
}
