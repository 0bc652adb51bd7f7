//! Error types for line dispatch and sessions.

use std::io;

use icecap_proto::ProtocolError;
use icecap_state::StateError;
use thiserror::Error;

/// Errors surfaced while dispatching one received line.
///
/// Neither variant is fatal: the offending line is rejected, the state store
/// is left as it was, and the client keeps accepting lines.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The line could not be decoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The decoded message could not be applied to the state store.
    #[error(transparent)]
    State(#[from] StateError),
}

/// Errors surfaced by a [`Session`](crate::Session).
#[derive(Debug, Error)]
pub enum SessionError {
    /// Reading from the line source failed.
    #[error("failed to read line: {0}")]
    Read(#[source] io::Error),

    /// Writing to the line sink failed.
    #[error("failed to write line: {0}")]
    Write(#[source] io::Error),

    /// A received line was rejected. The session remains usable.
    #[error(transparent)]
    Client(#[from] ClientError),
}

impl SessionError {
    /// Returns `true` when the session cannot continue: the line source or
    /// sink has failed.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Read(_) | Self::Write(_))
    }
}
