//! Channel and membership handlers.

use std::collections::BTreeMap;

use icecap_proto::{Command, Event, Params};
use tracing::debug;

use super::{
    CHANNEL_KEY, MODE_KEY, PRESENCE_KEY, RECONCILE_TARGET, connection, require, row_connection,
    row_text,
};
use crate::connection::{Connection, MYPRESENCE_KEY, NETWORK_KEY};
use crate::error::StateError;
use crate::store::StateStore;

const CHANNEL_IDENTITY: [&str; 3] = [NETWORK_KEY, MYPRESENCE_KEY, CHANNEL_KEY];

/// Applies `channel list`: replaces the channel map of every local presence.
///
/// Rows are grouped by connection; a connection named by a row is created
/// when unknown, and a local presence with no rows ends up with no channels.
/// A listed channel keeps its members. Channels missing from the snapshot
/// are removed from their members' channel sets.
pub fn channel_list(store: &mut StateStore, command: &Command) {
    let mut grouped: BTreeMap<Connection, Vec<(String, Params)>> = BTreeMap::new();
    for row in command.rows() {
        let Some(connection) = row_connection(row, command.name()) else {
            continue;
        };
        let Some(channel) = row_text(row, command.name(), CHANNEL_KEY) else {
            continue;
        };
        grouped
            .entry(connection)
            .or_default()
            .push((channel.to_owned(), row.without(&CHANNEL_IDENTITY)));
    }

    for connection in grouped.keys() {
        store.local_presence_entry(connection);
    }
    for local in store.local_presences_mut() {
        let rows = grouped.remove(local.connection()).unwrap_or_default();
        local.replace_channels(rows);
    }
}

/// Applies `channel names`: replaces one channel's membership.
///
/// The command's own parameters name the connection and channel; each row
/// names a `presence` and an optional `mode`. Presences dropped from the
/// list lose the channel from their channel sets.
///
/// # Errors
///
/// Returns [`StateError::MissingParameter`] when the command lacks
/// `network`, `mypresence` or `channel`.
pub fn channel_names(store: &mut StateStore, command: &Command) -> Result<(), StateError> {
    let params = command.params();
    let connection = connection(params, command.name())?;
    let channel = require(params, command.name(), CHANNEL_KEY)?;

    let members: Vec<(String, String)> = command
        .rows()
        .filter_map(|row| {
            let presence = row_text(row, command.name(), PRESENCE_KEY)?;
            let mode = row.text(MODE_KEY).unwrap_or_default();
            Some((presence.to_owned(), mode.to_owned()))
        })
        .collect();
    debug!(
        target: RECONCILE_TARGET,
        %connection,
        channel,
        members = members.len(),
        "channel membership replaced"
    );
    store
        .local_presence_entry(&connection)
        .replace_members(channel, members);
    Ok(())
}

/// Applies `channel_init`: creates or overwrites a channel's info, keeping
/// its members.
///
/// # Errors
///
/// Returns [`StateError::MissingParameter`] when `network`, `mypresence` or
/// `channel` is absent.
pub fn channel_init(store: &mut StateStore, event: &Event) -> Result<(), StateError> {
    let params = event.params();
    let connection = connection(params, event.name())?;
    let channel = require(params, event.name(), CHANNEL_KEY)?;
    store
        .local_presence_entry(&connection)
        .upsert_channel(channel, params.without(&CHANNEL_IDENTITY));
    debug!(target: RECONCILE_TARGET, %connection, channel, "channel initialised");
    Ok(())
}

/// Applies `channel_deinit`: removes a channel and drops it from its
/// members' channel sets.
///
/// # Errors
///
/// Returns [`StateError::MissingParameter`] when `network`, `mypresence` or
/// `channel` is absent.
pub fn channel_deinit(store: &mut StateStore, event: &Event) -> Result<(), StateError> {
    let params = event.params();
    let connection = connection(params, event.name())?;
    let channel = require(params, event.name(), CHANNEL_KEY)?;
    let removed = store
        .local_presence_mut(&connection)
        .and_then(|local| local.remove_channel(channel))
        .is_some();
    debug!(target: RECONCILE_TARGET, %connection, channel, removed, "channel removed");
    Ok(())
}

/// Applies `channel_presence_added`: records a membership edge on both
/// sides, with the mode taken from the optional `mode` parameter.
///
/// # Errors
///
/// Returns [`StateError::MissingParameter`] when `network`, `mypresence`,
/// `channel` or `presence` is absent.
pub fn channel_presence_added(store: &mut StateStore, event: &Event) -> Result<(), StateError> {
    let params = event.params();
    let connection = connection(params, event.name())?;
    let channel = require(params, event.name(), CHANNEL_KEY)?;
    let presence = require(params, event.name(), PRESENCE_KEY)?;
    let mode = params.text(MODE_KEY).unwrap_or_default();
    store
        .local_presence_entry(&connection)
        .join(channel, presence, mode);
    debug!(target: RECONCILE_TARGET, %connection, channel, presence, mode, "presence joined");
    Ok(())
}

/// Applies `channel_presence_removed`: removes a membership edge from both
/// sides. Neither the channel nor the presence is removed.
///
/// # Errors
///
/// Returns [`StateError::MissingParameter`] when `network`, `mypresence`,
/// `channel` or `presence` is absent.
pub fn channel_presence_removed(store: &mut StateStore, event: &Event) -> Result<(), StateError> {
    let params = event.params();
    let connection = connection(params, event.name())?;
    let channel = require(params, event.name(), CHANNEL_KEY)?;
    let presence = require(params, event.name(), PRESENCE_KEY)?;
    if let Some(local) = store.local_presence_mut(&connection) {
        local.part(channel, presence);
    }
    debug!(target: RECONCILE_TARGET, %connection, channel, presence, "presence parted");
    Ok(())
}
