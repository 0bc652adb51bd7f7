//! The shared line grammar.
//!
//! ```text
//! <tag>;<command-or-status>;<key1[=val1]>;<key2[=val2]>;...
//! ```
//!
//! [`Message`] knows nothing about what field 1 means; the typed wrappers in
//! [`crate::kinds`] interpret it.

use std::fmt;

use crate::error::ProtocolError;
use crate::escape::{escape, unescape};
use crate::params::{ParamValue, Params};

const FIELD_SEPARATOR: char = ';';
const VALUE_SEPARATOR: char = '=';

/// A single decoded protocol line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    tag: String,
    name: String,
    params: Params,
}

impl Message {
    /// Creates a message from its parts.
    #[must_use]
    pub fn new(tag: impl Into<String>, name: impl Into<String>, params: Params) -> Self {
        Self {
            tag: tag.into(),
            name: name.into(),
            params,
        }
    }

    /// Parses one line.
    ///
    /// Trailing CR/LF terminators are ignored. Empty parameter fields are
    /// skipped, and a parameter's value starts after the first `=`.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::MalformedMessage`] when the line has fewer
    /// than two fields.
    pub fn parse(line: &str) -> Result<Self, ProtocolError> {
        let trimmed = line.trim_end_matches(['\r', '\n']);
        let mut fields = trimmed.split(FIELD_SEPARATOR);
        let tag = fields.next().unwrap_or_default();
        let name = fields
            .next()
            .ok_or_else(|| ProtocolError::malformed(trimmed))?;

        let params = fields
            .filter(|field| !field.is_empty())
            .map(parse_param)
            .collect();

        Ok(Self {
            tag: unescape(tag),
            name: unescape(name),
            params,
        })
    }

    /// Serialises the message back to a single line without terminator.
    #[must_use]
    pub fn serialize(&self) -> String {
        self.to_string()
    }

    /// Returns field 0.
    #[must_use]
    pub const fn tag(&self) -> &str {
        self.tag.as_str()
    }

    /// Returns field 1.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the parameters.
    #[must_use]
    pub const fn params(&self) -> &Params {
        &self.params
    }

    /// Splits the message into tag, name and parameters.
    #[must_use]
    pub fn into_parts(self) -> (String, String, Params) {
        (self.tag, self.name, self.params)
    }
}

fn parse_param(field: &str) -> (String, ParamValue) {
    match field.split_once(VALUE_SEPARATOR) {
        Some((key, value)) => (unescape(key), ParamValue::Text(unescape(value))),
        None => (unescape(field), ParamValue::Flag),
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{FIELD_SEPARATOR}{}",
            escape(&self.tag),
            escape(&self.name)
        )?;
        for (key, value) in &self.params {
            write!(f, "{FIELD_SEPARATOR}{}", escape(key))?;
            if let ParamValue::Text(text) = value {
                write!(f, "{VALUE_SEPARATOR}{}", escape(text))?;
            }
        }
        Ok(())
    }
}
