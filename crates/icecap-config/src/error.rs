//! Configuration validation errors.

use thiserror::Error;

use crate::logging::{LogFormat, LogFormatParseError};

/// Errors raised while turning raw settings into a [`Config`](crate::Config).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The log filter was empty or whitespace.
    #[error("log filter must not be empty")]
    EmptyLogFilter,

    /// The log format named no supported format.
    #[error("unsupported log format '{value}': expected one of {}", LogFormat::expected())]
    InvalidLogFormat {
        /// The rejected value.
        value: String,
        /// Underlying parse failure.
        #[source]
        source: LogFormatParseError,
    },
}
