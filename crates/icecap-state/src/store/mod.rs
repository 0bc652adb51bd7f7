//! The root of the entity graph.

use std::collections::BTreeMap;

use icecap_proto::Params;
use serde::{Serialize, Serializer};

use crate::channel::Channel;
use crate::connection::Connection;
use crate::error::StateError;
use crate::local_presence::LocalPresence;
use crate::network::{Gateway, Network};
use crate::presence::Presence;

/// An entity owned by a local presence.
///
/// Owned entities hold only their owner's [`Connection`] key. Resolve it
/// through [`StateStore::owner_of`] each time; the owner may have been
/// removed since the entity was handed out.
pub trait Owned {
    /// Entity kind used in diagnostics.
    const KIND: &'static str;

    /// Returns the connection key of the owning local presence.
    fn owner(&self) -> &Connection;

    /// Returns the entity name.
    fn name(&self) -> &str;
}

/// Container of all networks and local presences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StateStore {
    networks: BTreeMap<String, Network>,
    #[serde(serialize_with = "serialize_values")]
    local_presences: BTreeMap<Connection, LocalPresence>,
}

impl StateStore {
    /// Creates an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            networks: BTreeMap::new(),
            local_presences: BTreeMap::new(),
        }
    }

    /// Discards every entity.
    pub fn reset(&mut self) {
        self.networks.clear();
        self.local_presences.clear();
    }

    /// Returns the known networks by name.
    #[must_use]
    pub const fn networks(&self) -> &BTreeMap<String, Network> {
        &self.networks
    }

    /// Looks a network up by name.
    #[must_use]
    pub fn network(&self, name: &str) -> Option<&Network> {
        self.networks.get(name)
    }

    /// Returns the network, creating an empty one when it is unknown.
    pub fn network_or_create(&mut self, name: &str) -> &Network {
        self.network_entry(name)
    }

    /// Returns the local presences by connection.
    #[must_use]
    pub const fn local_presences(&self) -> &BTreeMap<Connection, LocalPresence> {
        &self.local_presences
    }

    /// Looks a local presence up by connection.
    #[must_use]
    pub fn local_presence(&self, connection: &Connection) -> Option<&LocalPresence> {
        self.local_presences.get(connection)
    }

    /// Returns the local presence, creating it (and its network) when it is
    /// unknown.
    pub fn local_presence_or_create(&mut self, connection: &Connection) -> &LocalPresence {
        self.local_presence_entry(connection)
    }

    /// Looks a presence up under its owning connection.
    #[must_use]
    pub fn presence(&self, connection: &Connection, name: &str) -> Option<&Presence> {
        self.local_presence(connection)?.presence(name)
    }

    /// Returns the presence, creating it and its owners when unknown.
    pub fn presence_or_create(&mut self, connection: &Connection, name: &str) -> &Presence {
        self.local_presence_entry(connection).presence_or_create(name)
    }

    /// Looks a channel up under its owning connection.
    #[must_use]
    pub fn channel(&self, connection: &Connection, name: &str) -> Option<&Channel> {
        self.local_presence(connection)?.channel(name)
    }

    /// Returns the channel, creating it and its owners when unknown.
    pub fn channel_or_create(&mut self, connection: &Connection, name: &str) -> &Channel {
        self.local_presence_entry(connection).channel_or_create(name)
    }

    /// Resolves the local presence owning a presence or channel.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::Orphaned`] when the owner has been removed.
    pub fn owner_of<T: Owned>(&self, entity: &T) -> Result<&LocalPresence, StateError> {
        self.local_presences
            .get(entity.owner())
            .ok_or_else(|| StateError::Orphaned {
                entity: T::KIND,
                name: entity.name().to_owned(),
                connection: entity.owner().to_string(),
            })
    }

    /// Verifies the symmetric membership invariant across every local
    /// presence.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::BrokenMembership`] for the first one-sided edge.
    pub fn check_membership(&self) -> Result<(), StateError> {
        self.local_presences
            .values()
            .try_for_each(LocalPresence::check_membership)
    }

    pub(crate) fn network_entry(&mut self, name: &str) -> &mut Network {
        self.networks
            .entry(name.to_owned())
            .or_insert_with(|| Network::new(name, Params::new()))
    }

    pub(crate) fn local_presence_entry(&mut self, connection: &Connection) -> &mut LocalPresence {
        self.network_entry(connection.network());
        self.local_presences
            .entry(connection.clone())
            .or_insert_with(|| LocalPresence::new(connection.clone(), Params::new()))
    }

    pub(crate) fn local_presence_mut(&mut self, connection: &Connection) -> Option<&mut LocalPresence> {
        self.local_presences.get_mut(connection)
    }

    /// Installs a network, keeping the gateways of any network it replaces.
    pub(crate) fn upsert_network(&mut self, name: &str, info: Params) {
        let previous = self.networks.remove(name);
        self.networks
            .insert(name.to_owned(), Network::replacing(name, info, previous));
    }

    /// Installs a local presence, keeping the children of any local presence
    /// it replaces. Its network is created when unknown.
    pub(crate) fn upsert_local_presence(&mut self, connection: &Connection, info: Params) {
        self.network_entry(connection.network());
        let previous = self.local_presences.remove(connection);
        self.local_presences.insert(
            connection.clone(),
            LocalPresence::replacing(connection.clone(), info, previous),
        );
    }

    pub(crate) fn take_networks(&mut self) -> BTreeMap<String, Network> {
        std::mem::take(&mut self.networks)
    }

    pub(crate) fn insert_network(&mut self, network: Network) {
        self.networks.insert(network.name().to_owned(), network);
    }

    pub(crate) fn take_local_presences(&mut self) -> BTreeMap<Connection, LocalPresence> {
        std::mem::take(&mut self.local_presences)
    }

    pub(crate) fn insert_local_presence(&mut self, local: LocalPresence) {
        self.local_presences.insert(local.connection().clone(), local);
    }

    /// Removes a network together with every local presence on it. Returns
    /// the number of local presences dropped alongside it.
    pub(crate) fn remove_network(&mut self, name: &str) -> Option<usize> {
        self.networks.remove(name)?;
        Some(self.remove_local_presences_on(name))
    }

    /// Drops every local presence on a network, returning how many went.
    pub(crate) fn remove_local_presences_on(&mut self, network: &str) -> usize {
        let before = self.local_presences.len();
        self.local_presences
            .retain(|connection, _| connection.network() != network);
        before - self.local_presences.len()
    }

    pub(crate) fn local_presences_mut(&mut self) -> impl Iterator<Item = &mut LocalPresence> {
        self.local_presences.values_mut()
    }

    pub(crate) fn remove_local_presence(&mut self, connection: &Connection) -> Option<LocalPresence> {
        self.local_presences.remove(connection)
    }

    pub(crate) fn clear_gateways(&mut self) {
        for network in self.networks.values_mut() {
            network.clear_gateways();
        }
    }

    pub(crate) fn add_gateway(&mut self, network: &str, gateway: Gateway) -> bool {
        self.network_entry(network).add_gateway(gateway)
    }
}

/// Serialises a map as the sequence of its values. Local presences are keyed
/// by a struct, which JSON cannot use as an object key; each value carries
/// its own connection.
fn serialize_values<S, K, V>(map: &BTreeMap<K, V>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    V: Serialize,
{
    serializer.collect_seq(map.values())
}
