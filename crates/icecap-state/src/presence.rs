//! Remote identities seen by a local presence.

use std::collections::BTreeSet;

use icecap_proto::Params;
use serde::Serialize;

use crate::connection::Connection;
use crate::store::Owned;

/// A remote identity (user, buddy) known to one local presence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Presence {
    #[serde(skip)]
    owner: Connection,
    name: String,
    info: Params,
    channels: BTreeSet<String>,
}

impl Presence {
    pub(crate) fn new(owner: Connection, name: impl Into<String>, info: Params) -> Self {
        Self {
            owner,
            name: name.into(),
            info,
            channels: BTreeSet::new(),
        }
    }

    /// Returns the presence name.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the informational parameters.
    #[must_use]
    pub const fn info(&self) -> &Params {
        &self.info
    }

    /// Returns the names of the channels this presence occupies.
    #[must_use]
    pub const fn channels(&self) -> &BTreeSet<String> {
        &self.channels
    }

    /// Returns `true` when the presence occupies the channel.
    #[must_use]
    pub fn is_in(&self, channel: &str) -> bool {
        self.channels.contains(channel)
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub(crate) fn set_info(&mut self, info: Params) {
        self.info = info;
    }

    pub(crate) fn merge_info(&mut self, info: &Params) {
        self.info.merge(info);
    }

    pub(crate) fn enter(&mut self, channel: impl Into<String>) {
        self.channels.insert(channel.into());
    }

    pub(crate) fn leave(&mut self, channel: &str) {
        self.channels.remove(channel);
    }
}

impl Owned for Presence {
    const KIND: &'static str = "presence";

    fn owner(&self) -> &Connection {
        &self.owner
    }

    fn name(&self) -> &str {
        self.name.as_str()
    }
}
