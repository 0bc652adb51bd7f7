//! Channels seen by a local presence.

use std::collections::BTreeMap;

use icecap_proto::Params;
use serde::Serialize;

use crate::connection::Connection;
use crate::store::Owned;

/// A channel known to one local presence, with its current occupants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Channel {
    #[serde(skip)]
    owner: Connection,
    name: String,
    info: Params,
    members: BTreeMap<String, String>,
}

impl Channel {
    pub(crate) fn new(owner: Connection, name: impl Into<String>, info: Params) -> Self {
        Self {
            owner,
            name: name.into(),
            info,
            members: BTreeMap::new(),
        }
    }

    /// Returns the channel name.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the informational parameters.
    #[must_use]
    pub const fn info(&self) -> &Params {
        &self.info
    }

    /// Returns the membership map: presence name to mode string.
    #[must_use]
    pub const fn members(&self) -> &BTreeMap<String, String> {
        &self.members
    }

    /// Returns the mode of a member, or `None` when the presence is not in
    /// the channel. An unprivileged member has an empty mode.
    #[must_use]
    pub fn mode_of(&self, presence: &str) -> Option<&str> {
        self.members.get(presence).map(String::as_str)
    }

    /// Returns `true` when the presence is a member.
    #[must_use]
    pub fn has_member(&self, presence: &str) -> bool {
        self.members.contains_key(presence)
    }

    pub(crate) fn set_info(&mut self, info: Params) {
        self.info = info;
    }

    pub(crate) fn insert_member(&mut self, presence: impl Into<String>, mode: impl Into<String>) {
        self.members.insert(presence.into(), mode.into());
    }

    pub(crate) fn remove_member(&mut self, presence: &str) -> Option<String> {
        self.members.remove(presence)
    }

    pub(crate) fn take_members(&mut self) -> BTreeMap<String, String> {
        std::mem::take(&mut self.members)
    }
}

impl Owned for Channel {
    const KIND: &'static str = "channel";

    fn owner(&self) -> &Connection {
        &self.owner
    }

    fn name(&self) -> &str {
        self.name.as_str()
    }
}
