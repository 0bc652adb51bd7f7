//! Local presence and presence handlers.

use icecap_proto::{Command, Event};
use tracing::debug;

use super::{
    CONNECTION_KEYS, NAME_KEY, PRESENCE_KEY, RECONCILE_TARGET, connection, require,
    row_connection,
};
use crate::connection::{MYPRESENCE_KEY, NETWORK_KEY};
use crate::error::StateError;
use crate::store::StateStore;

/// Applies `presence list`: replaces the local presence map from the
/// snapshot rows.
///
/// A listed local presence keeps the presences and channels of its
/// predecessor; one missing from the snapshot is dropped with everything it
/// owns. Each row's network is created when unknown.
pub fn presence_list(store: &mut StateStore, command: &Command) {
    let mut previous = store.take_local_presences();
    for row in command.rows() {
        let Some(connection) = row_connection(row, command.name()) else {
            continue;
        };
        if let Some(prior) = previous.remove(&connection) {
            store.insert_local_presence(prior);
        }
        store.upsert_local_presence(&connection, row.without(&CONNECTION_KEYS));
    }

    for connection in previous.keys() {
        debug!(
            target: RECONCILE_TARGET,
            %connection,
            "local presence absent from snapshot"
        );
    }
}

/// Applies `local_presence_init`: creates or overwrites a local presence,
/// keeping its presences and channels.
///
/// # Errors
///
/// Returns [`StateError::MissingParameter`] when `network` or `mypresence`
/// is absent.
pub fn local_presence_init(store: &mut StateStore, event: &Event) -> Result<(), StateError> {
    let params = event.params();
    let connection = connection(params, event.name())?;
    store.upsert_local_presence(&connection, params.without(&CONNECTION_KEYS));
    debug!(target: RECONCILE_TARGET, %connection, "local presence initialised");
    Ok(())
}

/// Applies `local_presence_deinit`: removes a local presence and everything
/// it owns.
///
/// # Errors
///
/// Returns [`StateError::MissingParameter`] when `network` or `mypresence`
/// is absent.
pub fn local_presence_deinit(store: &mut StateStore, event: &Event) -> Result<(), StateError> {
    let connection = connection(event.params(), event.name())?;
    let removed = store.remove_local_presence(&connection).is_some();
    debug!(target: RECONCILE_TARGET, %connection, removed, "local presence removed");
    Ok(())
}

/// Applies `presence_init`: creates or overwrites a presence's info, keeping
/// the channels it occupies.
///
/// # Errors
///
/// Returns [`StateError::MissingParameter`] when `network`, `mypresence` or
/// `presence` is absent.
pub fn presence_init(store: &mut StateStore, event: &Event) -> Result<(), StateError> {
    let params = event.params();
    let connection = connection(params, event.name())?;
    let name = require(params, event.name(), PRESENCE_KEY)?;
    let info = params.without(&[NETWORK_KEY, MYPRESENCE_KEY, PRESENCE_KEY]);
    store.local_presence_entry(&connection).upsert_presence(name, info);
    debug!(target: RECONCILE_TARGET, %connection, presence = name, "presence initialised");
    Ok(())
}

/// Applies `presence_deinit`: removes a presence and its entry in every
/// channel's membership map.
///
/// # Errors
///
/// Returns [`StateError::MissingParameter`] when `network`, `mypresence` or
/// `presence` is absent.
pub fn presence_deinit(store: &mut StateStore, event: &Event) -> Result<(), StateError> {
    let params = event.params();
    let connection = connection(params, event.name())?;
    let name = require(params, event.name(), PRESENCE_KEY)?;
    let removed = store
        .local_presence_mut(&connection)
        .and_then(|local| local.remove_presence(name))
        .is_some();
    debug!(target: RECONCILE_TARGET, %connection, presence = name, removed, "presence removed");
    Ok(())
}

/// Applies `presence_changed`.
///
/// A `name` parameter renames the presence: the same entity moves to the new
/// key and every membership entry follows it with its mode. Every other
/// non-identity parameter is merged into the presence's info.
///
/// # Errors
///
/// Returns [`StateError::MissingParameter`] when `network`, `mypresence` or
/// `presence` is absent.
pub fn presence_changed(store: &mut StateStore, event: &Event) -> Result<(), StateError> {
    let params = event.params();
    let connection = connection(params, event.name())?;
    let name = require(params, event.name(), PRESENCE_KEY)?;
    let info = params.without(&[NETWORK_KEY, MYPRESENCE_KEY, PRESENCE_KEY, NAME_KEY]);

    let local = store.local_presence_entry(&connection);
    let current = match params.text(NAME_KEY) {
        Some(renamed) => {
            local.rename_presence(name, renamed);
            debug!(target: RECONCILE_TARGET, %connection, from = name, to = renamed, "presence renamed");
            renamed
        }
        None => name,
    };
    local.merge_presence_info(current, &info);
    Ok(())
}
