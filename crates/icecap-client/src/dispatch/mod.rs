//! Routing of received lines to the correlator and reconciliation handlers.
//!
//! The [`Client`] owns the whole client-side state: the correlator's pending
//! table, the state store, the event log and the names seen without a
//! handler. It processes one line to completion before the next.

mod kinds;
mod subscribers;

use std::collections::BTreeSet;

use icecap_proto::{Command, Event, Params, Reply, is_event_line};
use icecap_state::{Channel, Connection, LocalPresence, Network, Presence, StateStore};
use serde::Serialize;
use tracing::debug;

use crate::correlator::{Correlation, Correlator};
use crate::error::ClientError;

pub use self::kinds::{EventKind, ReplyKind};
pub use self::subscribers::EventHandler;
use self::subscribers::Subscribers;

/// Tracing target for dispatch.
pub(crate) const DISPATCH_TARGET: &str = "icecap_client::dispatch";

/// What a received line did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatched {
    /// A recognised event was applied to the state store.
    Event(EventKind),
    /// An event without a handler was logged and its name recorded.
    UnhandledEvent(String),
    /// A `MORE` reply was recorded against a pending command.
    ReplyPending {
        /// Tag of the command that received the reply.
        tag: String,
    },
    /// A command completed with `OK` and its handler ran.
    Completed(Command),
    /// A command completed with `OK` but has no handler; its name was
    /// recorded.
    UnhandledReply(Command),
    /// A command completed with `FAIL`. No handler runs for failures.
    Failed(Command),
    /// A reply arrived for a tag with no pending command.
    Unmatched(Reply),
}

/// Names seen without a registered handler, kept for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Unhandled {
    events: BTreeSet<String>,
    commands: BTreeSet<String>,
}

impl Unhandled {
    /// Returns the unhandled event names.
    #[must_use]
    pub const fn events(&self) -> &BTreeSet<String> {
        &self.events
    }

    /// Returns the names of commands whose replies had no handler.
    #[must_use]
    pub const fn commands(&self) -> &BTreeSet<String> {
        &self.commands
    }

    /// Returns `true` when every name seen so far had a handler.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.commands.is_empty()
    }
}

/// A stateful Icecap client.
///
/// # Example
///
/// ```
/// use icecap_client::{Client, Dispatched};
/// use icecap_proto::Params;
///
/// let mut client = Client::new();
/// let command = client.prepare("network list", Params::new());
/// assert_eq!(command.to_string(), "1;network list");
///
/// client.on_line("1;>;network=foo").expect("row");
/// let outcome = client.on_line("1;+").expect("terminal reply");
/// assert!(matches!(outcome, Dispatched::Completed(_)));
/// assert!(client.state().network("foo").is_some());
/// ```
#[derive(Debug, Default)]
pub struct Client {
    correlator: Correlator,
    state: StateStore,
    events: Vec<Event>,
    unhandled: Unhandled,
    subscribers: Subscribers,
}

impl Client {
    /// Creates a client with an empty state store and no pending commands.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Discards the state store, the event log and the unhandled names, as
    /// on reconnect. Pending commands and event subscriptions are kept.
    pub fn reset(&mut self) {
        self.state.reset();
        self.events.clear();
        self.unhandled = Unhandled::default();
    }

    /// Registers `handler` to run for every event named `name`.
    ///
    /// Handlers run after the event has been applied to the state store, or
    /// recorded as unhandled when no state handler exists. They do not run
    /// for events the store rejects. Several handlers for one name run in
    /// registration order.
    pub fn subscribe<F>(&mut self, name: impl Into<String>, handler: F)
    where
        F: FnMut(&StateStore, &Event) + Send + 'static,
    {
        self.subscribers.add(name.into(), Box::new(handler));
    }

    /// Builds a command with a fresh tag and registers it as pending.
    pub fn prepare(&mut self, name: impl Into<String>, params: Params) -> Command {
        self.correlator.prepare(name, params)
    }

    /// Retags an existing command and registers it as pending.
    pub fn prepare_command(&mut self, command: Command) -> Command {
        self.correlator.prepare_command(command)
    }

    /// Feeds one received line through the client.
    ///
    /// Event lines are logged and applied; reply lines go to the correlator,
    /// and a command completed with `OK` has its reply stream applied.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Protocol`] when the line cannot be decoded and
    /// [`ClientError::State`] when a message lacks identity parameters. In
    /// both cases the state store is unchanged.
    pub fn on_line(&mut self, line: &str) -> Result<Dispatched, ClientError> {
        if is_event_line(line) {
            return self.dispatch_event(Event::parse(line)?);
        }

        let outcome = match self.correlator.on_reply(Reply::parse(line)?) {
            Correlation::Unmatched(reply) => Dispatched::Unmatched(reply),
            Correlation::Pending { tag } => Dispatched::ReplyPending { tag },
            Correlation::Completed(command) => self.on_completed(command)?,
            Correlation::Failed(command) => {
                debug!(
                    target: DISPATCH_TARGET,
                    tag = command.tag(),
                    command = command.name(),
                    "command failed"
                );
                Dispatched::Failed(command)
            }
        };
        Ok(outcome)
    }

    fn dispatch_event(&mut self, event: Event) -> Result<Dispatched, ClientError> {
        let outcome = match EventKind::parse(event.name()) {
            Some(kind) => {
                kind.apply(&mut self.state, &event)?;
                Dispatched::Event(kind)
            }
            None => {
                debug!(target: DISPATCH_TARGET, event = event.name(), "no handler for event");
                self.unhandled.events.insert(event.name().to_owned());
                Dispatched::UnhandledEvent(event.name().to_owned())
            }
        };
        self.subscribers.notify(&self.state, &event);
        self.events.push(event);
        Ok(outcome)
    }

    fn on_completed(&mut self, command: Command) -> Result<Dispatched, ClientError> {
        let Some(kind) = ReplyKind::parse(command.name()) else {
            debug!(target: DISPATCH_TARGET, command = command.name(), "no handler for reply");
            self.unhandled.commands.insert(command.name().to_owned());
            return Ok(Dispatched::UnhandledReply(command));
        };
        kind.apply(&mut self.state, &command)?;
        debug!(
            target: DISPATCH_TARGET,
            tag = command.tag(),
            command = command.name(),
            rows = command.rows().count(),
            "reply stream applied"
        );
        Ok(Dispatched::Completed(command))
    }

    /// Returns the mirrored state.
    #[must_use]
    pub const fn state(&self) -> &StateStore {
        &self.state
    }

    /// Returns the network, creating an empty one when it is unknown.
    pub fn network_or_create(&mut self, name: &str) -> &Network {
        self.state.network_or_create(name)
    }

    /// Returns the local presence for `connection`, creating it and its
    /// network when unknown.
    pub fn local_presence_or_create(&mut self, connection: &Connection) -> &LocalPresence {
        self.state.local_presence_or_create(connection)
    }

    /// Returns the presence, creating it and its owners when unknown.
    pub fn presence_or_create(&mut self, connection: &Connection, name: &str) -> &Presence {
        self.state.presence_or_create(connection, name)
    }

    /// Returns the channel, creating it and its owners when unknown.
    pub fn channel_or_create(&mut self, connection: &Connection, name: &str) -> &Channel {
        self.state.channel_or_create(connection, name)
    }

    /// Returns the names seen without a handler.
    #[must_use]
    pub const fn unhandled(&self) -> &Unhandled {
        &self.unhandled
    }

    /// Returns every event received since creation or the last reset, in
    /// arrival order. Events the state store rejected are not included.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Returns the correlator's pending table.
    #[must_use]
    pub const fn correlator(&self) -> &Correlator {
        &self.correlator
    }
}
