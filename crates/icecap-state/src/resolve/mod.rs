//! Lookup of the entities a message refers to.
//!
//! A message names entities through its identity parameters: `network` and
//! `mypresence` select a local presence, and `channel` or `presence` select
//! an entity under it. A reply row often omits them, in which case the
//! command it answers supplies them.

use icecap_proto::{Command, Event, Params, Reply};

use crate::connection::{MYPRESENCE_KEY, NETWORK_KEY};
use crate::reconcile::{CHANNEL_KEY, PRESENCE_KEY};
use crate::{Channel, Connection, LocalPresence, Presence, StateStore};

/// Parameter keys that identify entities rather than describe them.
pub const STATE_KEYS: [&str; 4] = [NETWORK_KEY, MYPRESENCE_KEY, CHANNEL_KEY, PRESENCE_KEY];

/// Entities a message refers to, as currently known to a [`StateStore`].
///
/// Lookups never create entities. A field is `None` when the message does
/// not name that kind of entity or the store does not know it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolved<'a> {
    /// The connection named by `network` and `mypresence`.
    pub connection: Option<Connection>,
    /// The local presence for [`Self::connection`].
    pub local_presence: Option<&'a LocalPresence>,
    /// The channel named by `channel` under the local presence.
    pub channel: Option<&'a Channel>,
    /// The presence named by `presence` under the local presence.
    pub presence: Option<&'a Presence>,
}

impl Resolved<'_> {
    /// Returns `true` when the message names no known entity and no
    /// connection.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.connection.is_none()
            && self.local_presence.is_none()
            && self.channel.is_none()
            && self.presence.is_none()
    }
}

/// Returns the parameters that describe rather than identify, as the info a
/// handler or application would act on.
#[must_use]
pub fn nonstate_params(params: &Params) -> Params {
    params.without(&STATE_KEYS)
}

impl StateStore {
    /// Resolves the entities named by a parameter map.
    #[must_use]
    pub fn resolve(&self, params: &Params) -> Resolved<'_> {
        self.resolve_with(params, Resolved::default())
    }

    /// Resolves the entities an event refers to.
    #[must_use]
    pub fn resolve_event(&self, event: &Event) -> Resolved<'_> {
        self.resolve(event.params())
    }

    /// Resolves the entities a command refers to.
    #[must_use]
    pub fn resolve_command(&self, command: &Command) -> Resolved<'_> {
        self.resolve(command.params())
    }

    /// Resolves the entities a reply refers to.
    ///
    /// Without its own `network` and `mypresence` the reply inherits the
    /// command's connection, and its `channel` or `presence` is then looked
    /// up under the command's local presence. Kinds the reply does not name
    /// at all come from the command.
    #[must_use]
    pub fn resolve_reply(&self, reply: &Reply, command: &Command) -> Resolved<'_> {
        let inherited = self.resolve_command(command);
        self.resolve_with(reply.params(), inherited)
    }

    fn resolve_with<'a>(&'a self, params: &Params, inherited: Resolved<'a>) -> Resolved<'a> {
        let (connection, local_presence) = match Connection::from_params(params) {
            Ok(own) => {
                let local = self.local_presence(&own);
                (Some(own), local)
            }
            Err(_) => (inherited.connection, inherited.local_presence),
        };
        let channel = match (local_presence, params.text(CHANNEL_KEY)) {
            (Some(local), Some(name)) => local.channel(name),
            _ => inherited.channel,
        };
        let presence = match (local_presence, params.text(PRESENCE_KEY)) {
            (Some(local), Some(name)) => local.presence(name),
            _ => inherited.presence,
        };
        Resolved {
            connection,
            local_presence,
            channel,
            presence,
        }
    }
}
