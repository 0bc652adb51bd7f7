//! Log output formats.
//!
//! Replay diagnostics share stderr with usage errors, so the format also
//! decides whether colour codes may be written.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, VariantNames};

/// Supported logging output formats.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    Deserialize,
    Serialize,
    PartialEq,
    Eq,
    EnumString,
    Display,
    VariantNames,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LogFormat {
    /// One JSON object per line, with event fields flattened.
    Json,
    /// One line per event.
    #[default]
    Compact,
    /// Multi-line events with fields and source locations, for stepping
    /// through a replay by eye.
    Pretty,
}

impl LogFormat {
    /// Returns the accepted names joined for error messages.
    #[must_use]
    pub fn expected() -> String {
        Self::VARIANTS
            .iter()
            .map(|name| format!("'{name}'"))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Returns `true` when the output is meant for machines.
    #[must_use]
    pub const fn is_structured(self) -> bool {
        matches!(self, Self::Json)
    }

    /// Returns `true` when ANSI colour codes may be written: never for
    /// structured output, otherwise only to a terminal.
    #[must_use]
    pub const fn uses_ansi(self, stderr_is_terminal: bool) -> bool {
        !self.is_structured() && stderr_is_terminal
    }
}

/// Errors encountered while parsing a [`LogFormat`] from text.
pub type LogFormatParseError = strum::ParseError;
