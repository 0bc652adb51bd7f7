//! Field escaping.
//!
//! Fields may not contain the separator or line terminators, so the protocol
//! escapes them with a backslash:
//!
//! | raw  | escaped |
//! |------|---------|
//! | `\`  | `\\`    |
//! | `;`  | `\.`    |
//! | LF   | `\n`    |
//! | CR   | `\r`    |
//!
//! Unescaping passes the character after an unrecognised escape through
//! literally, and drops a dangling trailing backslash.

const ESCAPE_CHAR: char = '\\';

/// Escapes a field value for the wire.
///
/// # Example
///
/// ```
/// assert_eq!(icecap_proto::escape("a;b\\c\n"), "a\\.b\\\\c\\n");
/// ```
#[must_use]
pub fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for character in value.chars() {
        match character {
            '\\' => escaped.push_str("\\\\"),
            ';' => escaped.push_str("\\."),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Reverses [`escape`].
///
/// # Example
///
/// ```
/// assert_eq!(icecap_proto::unescape("a\\.b\\\\c\\n"), "a;b\\c\n");
/// assert_eq!(icecap_proto::unescape("\\x"), "x");
/// ```
#[must_use]
pub fn unescape(value: &str) -> String {
    let mut unescaped = String::with_capacity(value.len());
    let mut characters = value.chars();
    while let Some(character) = characters.next() {
        if character != ESCAPE_CHAR {
            unescaped.push(character);
            continue;
        }
        match characters.next() {
            Some('.') => unescaped.push(';'),
            Some('n') => unescaped.push('\n'),
            Some('r') => unescaped.push('\r'),
            Some(literal) => unescaped.push(literal),
            None => {}
        }
    }
    unescaped
}
