use crate::constants::{is_keyword, is_structural_char};
use crate::num::number::is_numeric_like;
use crate::{Error, Result};

/// Decide whether a string scalar must be quoted and whether its body needs
/// escape processing. Returns `(needs_quote, needs_escape)`.
///
/// A string requires quoting when it is empty, collides with a reserved word,
/// would be read back as a number, carries leading or trailing spaces, or
/// contains the active delimiter, a structural character, a quote, a
/// backslash, or any control character.
pub fn analyze_string(value: &str, delimiter: char) -> (bool, bool) {
    if value.is_empty() {
        return (true, false);
    }
    if is_keyword(value) || is_numeric_like(value) {
        return (true, false);
    }

    let mut needs_quote = value.starts_with(' ') || value.ends_with(' ');
    let mut needs_escape = false;

    for ch in value.chars() {
        if ch == delimiter || is_structural_char(ch) {
            needs_quote = true;
        }
        if ch == '"' || ch == '\\' || ch.is_control() {
            needs_quote = true;
            needs_escape = true;
        }
    }

    (needs_quote, needs_escape)
}

/// Append `value` with TONE escapes applied. Named escapes cover the usual
/// five; remaining control characters fall back to `\u00XX`.
pub fn escape_string_into(out: &mut String, value: &str) {
    for ch in value.chars() {
        match ch {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            ch if ch.is_control() => {
                out.push_str(&format!("\\u{:04x}", ch as u32));
            }
            ch => out.push(ch),
        }
    }
}

pub fn escape_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    escape_string_into(&mut out, value);
    out
}

/// Process escape sequences in the body of a quoted string.
pub fn unescape_string(value: &str) -> Result<String> {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('u') => {
                let mut code = 0u32;
                for _ in 0..4 {
                    let digit = chars
                        .next()
                        .and_then(|ch| ch.to_digit(16))
                        .ok_or_else(|| Error::syntax("invalid \\u escape: expected 4 hex digits"))?;
                    code = code * 16 + digit;
                }
                let ch = char::from_u32(code)
                    .ok_or_else(|| Error::syntax("invalid \\u escape: not a scalar value"))?;
                out.push(ch);
            }
            Some(other) => {
                return Err(Error::syntax(format!("invalid escape sequence: \\{other}")));
            }
            None => {
                return Err(Error::syntax("invalid escape sequence: backslash at end of string"));
            }
        }
    }
    Ok(out)
}

/// Byte index of the closing quote for the quoted string opening at `start`,
/// skipping escaped characters. `None` when the quote never closes.
pub fn find_closing_quote(content: &str, start: usize) -> Option<usize> {
    let bytes = content.as_bytes();
    let mut idx = start + 1;
    while idx < bytes.len() {
        match bytes[idx] {
            b'\\' => idx += 2,
            b'"' => return Some(idx),
            _ => idx += 1,
        }
    }
    None
}

/// Keys may go unquoted when they start with a letter or underscore and
/// continue with letters, digits, underscores, or dots.
///
/// # Examples
/// ```
/// use serde_tone::text::string::is_valid_unquoted_key;
///
/// assert!(is_valid_unquoted_key("user_name"));
/// assert!(is_valid_unquoted_key("meta.items"));
/// assert!(!is_valid_unquoted_key("1bad"));
/// assert!(!is_valid_unquoted_key(""));
/// ```
pub fn is_valid_unquoted_key(key: &str) -> bool {
    let bytes = key.as_bytes();
    let Some(&first) = bytes.first() else {
        return false;
    };
    if !first.is_ascii_alphabetic() && first != b'_' {
        return false;
    }
    bytes[1..]
        .iter()
        .all(|b| b.is_ascii_alphanumeric() || *b == b'_' || *b == b'.')
}
