//! The client's own sessions and everything they own.
//!
//! Every mutator here touches both sides of a presence/channel membership
//! edge before returning, so the symmetric invariant holds between calls.

use std::collections::BTreeMap;

use icecap_proto::Params;
use serde::Serialize;

use crate::channel::Channel;
use crate::connection::Connection;
use crate::error::StateError;
use crate::presence::Presence;

/// One of the client's own sessions on a network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalPresence {
    connection: Connection,
    info: Params,
    presences: BTreeMap<String, Presence>,
    channels: BTreeMap<String, Channel>,
}

impl LocalPresence {
    pub(crate) const fn new(connection: Connection, info: Params) -> Self {
        Self {
            connection,
            info,
            presences: BTreeMap::new(),
            channels: BTreeMap::new(),
        }
    }

    /// Builds a local presence from a snapshot row or init event, keeping
    /// the presences and channels of the one it replaces.
    pub(crate) fn replacing(connection: Connection, info: Params, previous: Option<Self>) -> Self {
        let mut local = Self::new(connection, info);
        if let Some(previous) = previous {
            local.presences = previous.presences;
            local.channels = previous.channels;
        }
        local
    }

    /// Returns the connection identifying this local presence.
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.connection
    }

    /// Returns the informational parameters.
    #[must_use]
    pub const fn info(&self) -> &Params {
        &self.info
    }

    /// Returns the known presences by name.
    #[must_use]
    pub const fn presences(&self) -> &BTreeMap<String, Presence> {
        &self.presences
    }

    /// Returns the known channels by name.
    #[must_use]
    pub const fn channels(&self) -> &BTreeMap<String, Channel> {
        &self.channels
    }

    /// Looks a presence up by name.
    #[must_use]
    pub fn presence(&self, name: &str) -> Option<&Presence> {
        self.presences.get(name)
    }

    /// Looks a channel up by name.
    #[must_use]
    pub fn channel(&self, name: &str) -> Option<&Channel> {
        self.channels.get(name)
    }

    /// Verifies that every membership edge is recorded on both sides.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::BrokenMembership`] for the first one-sided edge.
    pub fn check_membership(&self) -> Result<(), StateError> {
        for channel in self.channels.values() {
            for member in channel.members().keys() {
                let listed = self
                    .presences
                    .get(member)
                    .is_some_and(|presence| presence.is_in(channel.name()));
                if !listed {
                    return Err(self.broken(channel.name(), member, "presence lacks the channel"));
                }
            }
        }
        for presence in self.presences.values() {
            for name in presence.channels() {
                let listed = self
                    .channels
                    .get(name)
                    .is_some_and(|channel| channel.has_member(presence.name()));
                if !listed {
                    return Err(self.broken(name, presence.name(), "channel lacks the presence"));
                }
            }
        }
        Ok(())
    }

    fn broken(&self, channel: &str, presence: &str, detail: &'static str) -> StateError {
        StateError::BrokenMembership {
            connection: self.connection.to_string(),
            channel: channel.to_owned(),
            presence: presence.to_owned(),
            detail,
        }
    }

    pub(crate) fn presence_or_create(&mut self, name: &str) -> &mut Presence {
        presence_entry(&mut self.presences, &self.connection, name)
    }

    pub(crate) fn channel_or_create(&mut self, name: &str) -> &mut Channel {
        channel_entry(&mut self.channels, &self.connection, name)
    }

    /// Creates or overwrites a presence's info, keeping its channels.
    pub(crate) fn upsert_presence(&mut self, name: &str, info: Params) {
        self.presence_or_create(name).set_info(info);
    }

    /// Creates or overwrites a channel's info, keeping its members.
    pub(crate) fn upsert_channel(&mut self, name: &str, info: Params) {
        self.channel_or_create(name).set_info(info);
    }

    pub(crate) fn merge_presence_info(&mut self, name: &str, info: &Params) {
        self.presence_or_create(name).merge_info(info);
    }

    /// Removes a presence and its entries in every channel it occupied.
    pub(crate) fn remove_presence(&mut self, name: &str) -> Option<Presence> {
        let presence = self.presences.remove(name)?;
        for channel in presence.channels() {
            if let Some(channel) = self.channels.get_mut(channel) {
                channel.remove_member(name);
            }
        }
        Some(presence)
    }

    /// Removes a channel and drops it from every member's channel set.
    pub(crate) fn remove_channel(&mut self, name: &str) -> Option<Channel> {
        let channel = self.channels.remove(name)?;
        for member in channel.members().keys() {
            if let Some(presence) = self.presences.get_mut(member) {
                presence.leave(name);
            }
        }
        Some(channel)
    }

    /// Adds (or updates the mode of) a membership edge.
    pub(crate) fn join(&mut self, channel: &str, presence: &str, mode: &str) {
        self.channel_or_create(channel).insert_member(presence, mode);
        self.presence_or_create(presence).enter(channel);
    }

    /// Removes a membership edge. Neither entity is created or removed.
    pub(crate) fn part(&mut self, channel: &str, presence: &str) {
        if let Some(channel_entry) = self.channels.get_mut(channel) {
            channel_entry.remove_member(presence);
        }
        if let Some(presence_entry) = self.presences.get_mut(presence) {
            presence_entry.leave(channel);
        }
    }

    /// Re-keys a presence from `old` to `new`.
    ///
    /// The same `Presence` value moves to the new key with its channel set
    /// intact, and each of those channels has its membership entry moved
    /// with the mode preserved. A different presence already known as `new`
    /// is removed first, together with its memberships.
    pub(crate) fn rename_presence(&mut self, old: &str, new: &str) {
        if old == new {
            self.presence_or_create(old);
            return;
        }
        self.remove_presence(new);

        let mut presence = self
            .presences
            .remove(old)
            .unwrap_or_else(|| Presence::new(self.connection.clone(), old, Params::new()));
        for name in presence.channels() {
            if let Some(channel) = self.channels.get_mut(name) {
                let mode = channel.remove_member(old).unwrap_or_default();
                channel.insert_member(new, mode);
            }
        }
        presence.set_name(new);
        self.presences.insert(new.to_owned(), presence);
    }

    /// Replaces the channel map from snapshot rows.
    ///
    /// A channel listed again keeps its members; channels missing from the
    /// rows are dropped from their members' channel sets.
    pub(crate) fn replace_channels(&mut self, rows: Vec<(String, Params)>) {
        let mut previous = std::mem::take(&mut self.channels);
        for (name, info) in rows {
            let mut channel = previous
                .remove(&name)
                .or_else(|| self.channels.remove(&name))
                .unwrap_or_else(|| Channel::new(self.connection.clone(), name.as_str(), Params::new()));
            channel.set_info(info);
            self.channels.insert(name, channel);
        }

        for (name, removed) in previous {
            for member in removed.members().keys() {
                if let Some(presence) = self.presences.get_mut(member) {
                    presence.leave(&name);
                }
            }
        }
    }

    /// Replaces a channel's full membership list.
    ///
    /// Every listed presence gains the channel in its channel set; presences
    /// that were members before but are not listed lose it.
    pub(crate) fn replace_members(&mut self, channel: &str, members: Vec<(String, String)>) {
        let target = channel_entry(&mut self.channels, &self.connection, channel);
        let previous = target.take_members();
        for (presence, mode) in members {
            presence_entry(&mut self.presences, &self.connection, &presence).enter(channel);
            target.insert_member(presence, mode);
        }

        for presence in previous.keys() {
            if target.has_member(presence) {
                continue;
            }
            if let Some(entry) = self.presences.get_mut(presence) {
                entry.leave(channel);
            }
        }
    }
}

fn presence_entry<'a>(
    presences: &'a mut BTreeMap<String, Presence>,
    owner: &Connection,
    name: &str,
) -> &'a mut Presence {
    presences
        .entry(name.to_owned())
        .or_insert_with(|| Presence::new(owner.clone(), name, Params::new()))
}

fn channel_entry<'a>(
    channels: &'a mut BTreeMap<String, Channel>,
    owner: &Connection,
    name: &str,
) -> &'a mut Channel {
    channels
        .entry(name.to_owned())
        .or_insert_with(|| Channel::new(owner.clone(), name, Params::new()))
}

#[cfg(test)]
mod tests;
