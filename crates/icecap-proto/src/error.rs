//! Errors raised while decoding protocol lines.

use thiserror::Error;

/// Errors arising from parsing or interpreting a single protocol line.
///
/// Every variant is local to the offending line: callers reject that line and
/// carry on with the next one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// The line did not contain a tag and a command/status field.
    #[error("malformed message: expected at least 2 fields in '{line}'")]
    MalformedMessage {
        /// The offending raw line.
        line: String,
    },

    /// A reply carried a status marker outside the fixed status table.
    #[error("unknown reply status '{marker}'")]
    UnknownStatus {
        /// The marker found in field 1.
        marker: String,
    },

    /// A required parameter was absent or carried no value.
    #[error("missing parameter '{key}'")]
    MissingParameter {
        /// Name of the parameter that was looked up.
        key: String,
    },
}

impl ProtocolError {
    /// Creates a malformed message error for the given line.
    #[must_use]
    pub fn malformed(line: impl Into<String>) -> Self {
        Self::MalformedMessage { line: line.into() }
    }

    /// Creates an unknown status error for the given marker.
    #[must_use]
    pub fn unknown_status(marker: impl Into<String>) -> Self {
        Self::UnknownStatus {
            marker: marker.into(),
        }
    }

    /// Creates a missing parameter error for the given key.
    #[must_use]
    pub fn missing_parameter(key: impl Into<String>) -> Self {
        Self::MissingParameter { key: key.into() }
    }
}
