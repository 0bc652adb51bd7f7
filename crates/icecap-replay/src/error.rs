//! Errors raised by the replay tool.

use std::io;
use std::path::PathBuf;

use icecap_config::ConfigError;
use icecap_proto::ProtocolError;
use thiserror::Error;

use crate::telemetry::TelemetryError;

/// Failures that abort a replay.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// The command line could not be parsed.
    #[error("{0}")]
    CliUsage(clap::Error),
    /// The logging settings were invalid.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    /// The tracing subscriber could not be installed.
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    /// The session log could not be opened.
    #[error("failed to open session log {path}: {source}")]
    Open {
        /// Path given on the command line.
        path: PathBuf,
        /// Underlying I/O failure.
        source: io::Error,
    },
    /// Reading the session log failed part way through.
    #[error("failed to read session log: {0}")]
    Read(io::Error),
    /// A line began with neither `<` nor `>`.
    #[error("line {line}: unknown direction marker {marker:?}")]
    UnknownDirection {
        /// One-based line number in the log.
        line: usize,
        /// The offending leading character.
        marker: char,
    },
    /// A sent line did not decode as a command.
    #[error("line {line}: invalid sent command: {source}")]
    InvalidCommand {
        /// One-based line number in the log.
        line: usize,
        /// Decoding failure.
        source: ProtocolError,
    },
    /// The JSON report could not be serialised.
    #[error("failed to serialise replay report: {0}")]
    Serialise(serde_json::Error),
    /// The report could not be written to stdout.
    #[error("failed to write replay report: {0}")]
    Write(io::Error),
}
