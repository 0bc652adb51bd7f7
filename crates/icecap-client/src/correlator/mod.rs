//! Tag allocation and reply correlation.
//!
//! Every outgoing [`Command`] gets a fresh tag and waits in the pending table
//! until a terminal reply (`OK` or `FAIL`) carrying the same tag arrives.
//! `MORE` replies accumulate on the command in arrival order.
//!
//! Pending commands never time out; a command whose terminal reply never
//! arrives stays pending until the correlator is dropped.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use icecap_proto::{Command, Params, Reply, ReplyStatus};
use tracing::{debug, warn};

/// Tracing target for correlation.
pub(crate) const CORRELATOR_TARGET: &str = "icecap_client::correlator";

/// Outcome of feeding one reply to the [`Correlator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Correlation {
    /// No pending command carries the reply's tag. The reply is discarded.
    Unmatched(Reply),
    /// A `MORE` reply was recorded; the command is still pending.
    Pending {
        /// Tag of the command that received the reply.
        tag: String,
    },
    /// An `OK` reply completed the command, which is no longer pending.
    Completed(Command),
    /// A `FAIL` reply completed the command, which is no longer pending.
    Failed(Command),
}

/// Pending-command table keyed by tag.
#[derive(Debug, Clone)]
pub struct Correlator {
    next_tag: u64,
    pending: HashMap<String, Command>,
}

impl Default for Correlator {
    fn default() -> Self {
        Self::new()
    }
}

impl Correlator {
    /// Creates a correlator whose first tag is `1`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_tag: 1,
            pending: HashMap::new(),
        }
    }

    /// Builds a command with a fresh tag and registers it as pending.
    ///
    /// The returned copy is meant for serialisation; the correlator keeps
    /// its own copy to aggregate replies on.
    pub fn prepare(&mut self, name: impl Into<String>, params: Params) -> Command {
        self.prepare_command(Command::new(String::new(), name, params))
    }

    /// Retags an existing command and registers it as pending.
    ///
    /// Any tag the command already carries is replaced, so recorded outgoing
    /// lines can be re-registered in sequence.
    pub fn prepare_command(&mut self, mut command: Command) -> Command {
        let tag = self.next_tag.to_string();
        self.next_tag += 1;
        command.set_tag(tag.as_str());
        debug!(
            target: CORRELATOR_TARGET,
            tag = tag.as_str(),
            command = command.name(),
            "command registered"
        );
        self.pending.insert(tag, command.clone());
        command
    }

    /// Records a reply against its pending command.
    ///
    /// `MORE` replies leave the command pending. `OK` and `FAIL` remove it
    /// and hand it back with every reply it received, the terminal one last.
    pub fn on_reply(&mut self, reply: Reply) -> Correlation {
        let status = reply.status();
        let Entry::Occupied(mut entry) = self.pending.entry(reply.tag().to_owned()) else {
            warn!(
                target: CORRELATOR_TARGET,
                tag = reply.tag(),
                status = status.marker(),
                "reply for unknown tag discarded"
            );
            return Correlation::Unmatched(reply);
        };
        entry.get_mut().record_reply(reply);
        match status {
            ReplyStatus::More => Correlation::Pending {
                tag: entry.key().clone(),
            },
            ReplyStatus::Ok => Correlation::Completed(entry.remove()),
            ReplyStatus::Fail => Correlation::Failed(entry.remove()),
        }
    }

    /// Returns the number of commands awaiting a terminal reply.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Returns `true` when the tag belongs to a pending command.
    #[must_use]
    pub fn is_pending(&self, tag: &str) -> bool {
        self.pending.contains_key(tag)
    }
}
