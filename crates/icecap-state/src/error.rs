//! Errors raised by the state store and its reconciliation handlers.

use thiserror::Error;

/// Errors arising while applying a message to the state store, or while
/// resolving references inside it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    /// An event or command lacked a parameter needed to identify an entity.
    /// The store is left untouched.
    #[error("{context} is missing parameter '{key}'")]
    MissingParameter {
        /// Event or command name being applied.
        context: String,
        /// Name of the absent parameter.
        key: String,
    },

    /// The local presence owning an entity no longer exists.
    #[error("{entity} '{name}' is orphaned: owner {connection} no longer exists")]
    Orphaned {
        /// Kind of the orphaned entity.
        entity: &'static str,
        /// Name of the orphaned entity.
        name: String,
        /// Connection key of the missing owner.
        connection: String,
    },

    /// A presence and a channel disagree about their membership edge.
    #[error(
        "membership of '{presence}' in '{channel}' on {connection} is one-sided: {detail}"
    )]
    BrokenMembership {
        /// Connection both entities belong to.
        connection: String,
        /// Channel name.
        channel: String,
        /// Presence name.
        presence: String,
        /// Which side is missing the edge.
        detail: &'static str,
    },
}

impl StateError {
    /// Creates a missing parameter error for the message being applied.
    #[must_use]
    pub fn missing(context: &str, key: &str) -> Self {
        Self::MissingParameter {
            context: context.to_owned(),
            key: key.to_owned(),
        }
    }
}
