//! Network and gateway handlers.

use icecap_proto::{Command, Event};
use tracing::debug;

use super::{RECONCILE_TARGET, require, row_text};
use crate::connection::NETWORK_KEY;
use crate::error::StateError;
use crate::store::StateStore;

/// Applies `network list`: replaces the network map from the snapshot rows.
///
/// A listed network keeps the gateways of its predecessor. Networks missing
/// from the snapshot are dropped together with every local presence on them.
pub fn network_list(store: &mut StateStore, command: &Command) {
    let mut previous = store.take_networks();
    for row in command.rows() {
        let Some(name) = row_text(row, command.name(), NETWORK_KEY) else {
            continue;
        };
        if let Some(prior) = previous.remove(name) {
            store.insert_network(prior);
        }
        store.upsert_network(name, row.without(&[NETWORK_KEY]));
    }

    for name in previous.keys() {
        let dropped = store.remove_local_presences_on(name);
        debug!(
            target: RECONCILE_TARGET,
            network = name.as_str(),
            dropped,
            "network absent from snapshot"
        );
    }
}

/// Applies `network_init`: creates or overwrites one network, keeping its
/// gateways.
///
/// # Errors
///
/// Returns [`StateError::MissingParameter`] when `network` is absent.
pub fn network_init(store: &mut StateStore, event: &Event) -> Result<(), StateError> {
    let params = event.params();
    let name = require(params, event.name(), NETWORK_KEY)?;
    store.upsert_network(name, params.without(&[NETWORK_KEY]));
    debug!(target: RECONCILE_TARGET, network = name, "network initialised");
    Ok(())
}

/// Applies `network_deinit`: removes a network and every local presence on
/// it. An unknown network is ignored.
///
/// # Errors
///
/// Returns [`StateError::MissingParameter`] when `network` is absent.
pub fn network_deinit(store: &mut StateStore, event: &Event) -> Result<(), StateError> {
    let name = require(event.params(), event.name(), NETWORK_KEY)?;
    match store.remove_network(name) {
        Some(dropped) => debug!(target: RECONCILE_TARGET, network = name, dropped, "network removed"),
        None => debug!(target: RECONCILE_TARGET, network = name, "network already gone"),
    }
    Ok(())
}

/// Applies `gateway list`: clears every network's gateways, then appends each
/// row to its network, creating the network when unknown.
pub fn gateway_list(store: &mut StateStore, command: &Command) {
    store.clear_gateways();
    for row in command.rows() {
        let Some(network) = row_text(row, command.name(), NETWORK_KEY) else {
            continue;
        };
        store.add_gateway(network, row.without(&[NETWORK_KEY]));
    }
}

/// Applies `gateway_init`: appends one gateway to its network unless an
/// identical gateway is already listed.
///
/// # Errors
///
/// Returns [`StateError::MissingParameter`] when `network` is absent.
pub fn gateway_init(store: &mut StateStore, event: &Event) -> Result<(), StateError> {
    let params = event.params();
    let network = require(params, event.name(), NETWORK_KEY)?;
    let added = store.add_gateway(network, params.without(&[NETWORK_KEY]));
    debug!(target: RECONCILE_TARGET, network, added, "gateway announced");
    Ok(())
}
