//! Handlers that apply gateway messages to a [`StateStore`].
//!
//! Two families exist:
//!
//! - incremental event handlers (`*_init`, `*_deinit`, `*_changed`, ...)
//!   take an [`Event`](icecap_proto::Event) and touch a single entity;
//! - snapshot handlers (`*_list`, `channel_names`) take a completed
//!   [`Command`](icecap_proto::Command) and replace a whole collection from
//!   its `MORE` rows, carrying children forward from the entity with the
//!   same key and cascading deletions to whatever the snapshot omitted.
//!
//! Event handlers read every identity parameter before mutating anything, so
//! a [`StateError::MissingParameter`] leaves the store untouched. Snapshot
//! rows lacking identity parameters are skipped with a warning instead.
//!
//! [`StateStore`]: crate::StateStore

mod channels;
mod networks;
mod presences;

use icecap_proto::Params;
use tracing::warn;

use crate::connection::{Connection, MYPRESENCE_KEY, NETWORK_KEY};
use crate::error::StateError;

pub use self::channels::{
    channel_deinit, channel_init, channel_list, channel_names, channel_presence_added,
    channel_presence_removed,
};
pub use self::networks::{gateway_init, gateway_list, network_deinit, network_init, network_list};
pub use self::presences::{
    local_presence_deinit, local_presence_init, presence_changed, presence_deinit, presence_init,
    presence_list,
};

/// Tracing target for reconciliation.
pub(crate) const RECONCILE_TARGET: &str = "icecap_state::reconcile";

pub(crate) const PRESENCE_KEY: &str = "presence";
pub(crate) const CHANNEL_KEY: &str = "channel";
const NAME_KEY: &str = "name";
const MODE_KEY: &str = "mode";

/// Identity keys of a local presence.
const CONNECTION_KEYS: [&str; 2] = [NETWORK_KEY, MYPRESENCE_KEY];

fn require<'a>(params: &'a Params, context: &str, key: &str) -> Result<&'a str, StateError> {
    params
        .text(key)
        .ok_or_else(|| StateError::missing(context, key))
}

fn connection(params: &Params, context: &str) -> Result<Connection, StateError> {
    let network = require(params, context, NETWORK_KEY)?;
    let mypresence = require(params, context, MYPRESENCE_KEY)?;
    Ok(Connection::new(network, mypresence))
}

fn row_text<'a>(row: &'a Params, context: &str, key: &str) -> Option<&'a str> {
    match row.require(key) {
        Ok(value) => Some(value),
        Err(error) => {
            warn!(target: RECONCILE_TARGET, command = context, %error, "skipping snapshot row");
            None
        }
    }
}

fn row_connection(row: &Params, context: &str) -> Option<Connection> {
    match Connection::from_params(row) {
        Ok(connection) => Some(connection),
        Err(error) => {
            warn!(target: RECONCILE_TARGET, command = context, %error, "skipping snapshot row");
            None
        }
    }
}

#[cfg(test)]
mod tests;
