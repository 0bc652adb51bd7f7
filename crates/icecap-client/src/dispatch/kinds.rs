//! Name tables for the events and replies the client reconciles.

use icecap_proto::{Command, Event};
use icecap_state::reconcile;
use icecap_state::{StateError, StateStore};

/// Events the client applies to its state store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// `network_init`
    NetworkInit,
    /// `network_deinit`
    NetworkDeinit,
    /// `gateway_init`
    GatewayInit,
    /// `local_presence_init`
    LocalPresenceInit,
    /// `local_presence_deinit`
    LocalPresenceDeinit,
    /// `presence_init`
    PresenceInit,
    /// `presence_deinit`
    PresenceDeinit,
    /// `presence_changed`
    PresenceChanged,
    /// `channel_init`
    ChannelInit,
    /// `channel_deinit`
    ChannelDeinit,
    /// `channel_presence_added`
    ChannelPresenceAdded,
    /// `channel_presence_removed`
    ChannelPresenceRemoved,
}

impl EventKind {
    /// Every recognised event.
    pub const ALL: [Self; 12] = [
        Self::NetworkInit,
        Self::NetworkDeinit,
        Self::GatewayInit,
        Self::LocalPresenceInit,
        Self::LocalPresenceDeinit,
        Self::PresenceInit,
        Self::PresenceDeinit,
        Self::PresenceChanged,
        Self::ChannelInit,
        Self::ChannelDeinit,
        Self::ChannelPresenceAdded,
        Self::ChannelPresenceRemoved,
    ];

    /// Looks up an event name. Names are matched exactly; `None` means the
    /// event has no handler.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }

    /// Returns the event name as it appears on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NetworkInit => "network_init",
            Self::NetworkDeinit => "network_deinit",
            Self::GatewayInit => "gateway_init",
            Self::LocalPresenceInit => "local_presence_init",
            Self::LocalPresenceDeinit => "local_presence_deinit",
            Self::PresenceInit => "presence_init",
            Self::PresenceDeinit => "presence_deinit",
            Self::PresenceChanged => "presence_changed",
            Self::ChannelInit => "channel_init",
            Self::ChannelDeinit => "channel_deinit",
            Self::ChannelPresenceAdded => "channel_presence_added",
            Self::ChannelPresenceRemoved => "channel_presence_removed",
        }
    }

    pub(crate) fn apply(self, store: &mut StateStore, event: &Event) -> Result<(), StateError> {
        match self {
            Self::NetworkInit => reconcile::network_init(store, event),
            Self::NetworkDeinit => reconcile::network_deinit(store, event),
            Self::GatewayInit => reconcile::gateway_init(store, event),
            Self::LocalPresenceInit => reconcile::local_presence_init(store, event),
            Self::LocalPresenceDeinit => reconcile::local_presence_deinit(store, event),
            Self::PresenceInit => reconcile::presence_init(store, event),
            Self::PresenceDeinit => reconcile::presence_deinit(store, event),
            Self::PresenceChanged => reconcile::presence_changed(store, event),
            Self::ChannelInit => reconcile::channel_init(store, event),
            Self::ChannelDeinit => reconcile::channel_deinit(store, event),
            Self::ChannelPresenceAdded => reconcile::channel_presence_added(store, event),
            Self::ChannelPresenceRemoved => reconcile::channel_presence_removed(store, event),
        }
    }
}

/// Commands whose completed reply stream the client applies to its state
/// store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReplyKind {
    /// `network list`
    NetworkList,
    /// `gateway list`
    GatewayList,
    /// `presence list`
    PresenceList,
    /// `channel list`
    ChannelList,
    /// `channel names`
    ChannelNames,
}

impl ReplyKind {
    /// Every command with a reply handler.
    pub const ALL: [Self; 5] = [
        Self::NetworkList,
        Self::GatewayList,
        Self::PresenceList,
        Self::ChannelList,
        Self::ChannelNames,
    ];

    /// Looks up a command name. Names are matched exactly; `None` means the
    /// command's replies have no handler.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }

    /// Returns the command name as it appears on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NetworkList => "network list",
            Self::GatewayList => "gateway list",
            Self::PresenceList => "presence list",
            Self::ChannelList => "channel list",
            Self::ChannelNames => "channel names",
        }
    }

    pub(crate) fn apply(self, store: &mut StateStore, command: &Command) -> Result<(), StateError> {
        match self {
            Self::NetworkList => reconcile::network_list(store, command),
            Self::GatewayList => reconcile::gateway_list(store, command),
            Self::PresenceList => reconcile::presence_list(store, command),
            Self::ChannelList => reconcile::channel_list(store, command),
            Self::ChannelNames => reconcile::channel_names(store, command)?,
        }
        Ok(())
    }
}
