//! Typed views over [`Message`]: commands, replies and events.

use std::fmt;

use serde::Serialize;

use crate::error::ProtocolError;
use crate::message::Message;
use crate::params::Params;

/// Field 0 of every event line.
pub const EVENT_TAG: &str = "*";

/// Returns `true` when a raw line is an unsolicited event rather than a
/// reply.
#[must_use]
pub fn is_event_line(line: &str) -> bool {
    line.starts_with(EVENT_TAG)
}

/// Status carried in field 1 of a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyStatus {
    /// `+`: terminal success.
    Ok,
    /// `-`: terminal failure.
    Fail,
    /// `>`: one row of a multi-part result; more lines follow.
    More,
}

impl ReplyStatus {
    /// Every status, in table order.
    pub const ALL: [Self; 3] = [Self::Ok, Self::Fail, Self::More];

    /// Returns the wire marker for this status.
    #[must_use]
    pub const fn marker(self) -> &'static str {
        match self {
            Self::Ok => "+",
            Self::Fail => "-",
            Self::More => ">",
        }
    }

    /// Looks a wire marker up in the status table.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::UnknownStatus`] for any other marker.
    pub fn from_marker(marker: &str) -> Result<Self, ProtocolError> {
        Self::ALL
            .into_iter()
            .find(|status| status.marker() == marker)
            .ok_or_else(|| ProtocolError::unknown_status(marker))
    }

    /// Returns `true` for statuses that end a command's reply stream.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::More)
    }
}

impl fmt::Display for ReplyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}

/// A reply line answering the command with the same tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reply {
    tag: String,
    status: ReplyStatus,
    params: Params,
}

impl Reply {
    /// Creates a reply.
    #[must_use]
    pub fn new(tag: impl Into<String>, status: ReplyStatus, params: Params) -> Self {
        Self {
            tag: tag.into(),
            status,
            params,
        }
    }

    /// Parses a reply line.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::MalformedMessage`] for lines with fewer than
    /// two fields and [`ProtocolError::UnknownStatus`] when field 1 is not a
    /// known status marker.
    pub fn parse(line: &str) -> Result<Self, ProtocolError> {
        let (tag, marker, params) = Message::parse(line)?.into_parts();
        let status = ReplyStatus::from_marker(&marker)?;
        Ok(Self {
            tag,
            status,
            params,
        })
    }

    /// Returns the tag of the command this reply answers.
    #[must_use]
    pub const fn tag(&self) -> &str {
        self.tag.as_str()
    }

    /// Returns the reply status.
    #[must_use]
    pub const fn status(&self) -> ReplyStatus {
        self.status
    }

    /// Returns the reply parameters.
    #[must_use]
    pub const fn params(&self) -> &Params {
        &self.params
    }

    /// Converts the reply into its wire message.
    #[must_use]
    pub fn to_message(&self) -> Message {
        Message::new(self.tag.clone(), self.status.marker(), self.params.clone())
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_message())
    }
}

/// An unsolicited event pushed by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    name: String,
    params: Params,
}

impl Event {
    /// Creates an event.
    #[must_use]
    pub fn new(name: impl Into<String>, params: Params) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }

    /// Parses an event line. Field 0 is not interpreted.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::MalformedMessage`] for lines with fewer than
    /// two fields.
    pub fn parse(line: &str) -> Result<Self, ProtocolError> {
        let (_, name, params) = Message::parse(line)?.into_parts();
        Ok(Self { name, params })
    }

    /// Returns the event name.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the event parameters.
    #[must_use]
    pub const fn params(&self) -> &Params {
        &self.params
    }

    /// Converts the event into its wire message.
    #[must_use]
    pub fn to_message(&self) -> Message {
        Message::new(EVENT_TAG, self.name.clone(), self.params.clone())
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_message())
    }
}

/// A command sent to the gateway, together with the replies received for it
/// so far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Command {
    tag: String,
    name: String,
    params: Params,
    replies: Vec<Reply>,
}

impl Command {
    /// Creates a command with no replies.
    #[must_use]
    pub fn new(tag: impl Into<String>, name: impl Into<String>, params: Params) -> Self {
        Self {
            tag: tag.into(),
            name: name.into(),
            params,
            replies: Vec::new(),
        }
    }

    /// Parses a command line, for example one recorded from an earlier
    /// session.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::MalformedMessage`] for lines with fewer than
    /// two fields.
    pub fn parse(line: &str) -> Result<Self, ProtocolError> {
        let (tag, name, params) = Message::parse(line)?.into_parts();
        Ok(Self::new(tag, name, params))
    }

    /// Returns the command tag.
    #[must_use]
    pub const fn tag(&self) -> &str {
        self.tag.as_str()
    }

    /// Replaces the command tag.
    pub fn set_tag(&mut self, tag: impl Into<String>) {
        self.tag = tag.into();
    }

    /// Returns the command name.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the command parameters.
    #[must_use]
    pub const fn params(&self) -> &Params {
        &self.params
    }

    /// Appends a reply in arrival order.
    pub fn record_reply(&mut self, reply: Reply) {
        self.replies.push(reply);
    }

    /// Returns every reply received so far, in arrival order.
    #[must_use]
    pub fn replies(&self) -> &[Reply] {
        &self.replies
    }

    /// Iterates over the parameters of each `MORE` row.
    pub fn rows(&self) -> impl Iterator<Item = &Params> {
        self.replies
            .iter()
            .filter(|reply| reply.status() == ReplyStatus::More)
            .map(Reply::params)
    }

    /// Returns the terminal status, or `None` while the reply stream is
    /// still open.
    #[must_use]
    pub fn status(&self) -> Option<ReplyStatus> {
        self.replies
            .last()
            .map(Reply::status)
            .filter(|status| status.is_terminal())
    }

    /// Converts the command into its wire message, without replies.
    #[must_use]
    pub fn to_message(&self) -> Message {
        Message::new(self.tag.clone(), self.name.clone(), self.params.clone())
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_message())
    }
}

#[cfg(test)]
mod tests;
