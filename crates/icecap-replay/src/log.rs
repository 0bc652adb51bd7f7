//! Recorded session logs and their replay through a [`Client`].
//!
//! Each line of a log records one protocol line and its direction:
//!
//! ```text
//! > 1;network list
//! < 1;>;network=ircnet
//! < 1;+
//! < *;network_init;network=efnet
//! ```
//!
//! `>` marks a line the client sent and `<` a line it received. A single
//! space after the marker is optional. Blank lines are skipped.

use std::io::BufRead;

use icecap_client::{Client, Dispatched};
use icecap_proto::Command;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::ReplayError;

pub(crate) const LOG_TARGET: &str = "icecap_replay::log";

/// Direction marker for lines received from the gateway.
pub const RECEIVED_MARKER: char = '<';
/// Direction marker for lines sent by the client.
pub const SENT_MARKER: char = '>';

/// One recorded protocol line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// A line the gateway sent, to be fed to [`Client::on_line`].
    Received(String),
    /// A command the client sent, to be registered as pending.
    Sent(Command),
}

/// Parses one log line. Returns `None` for blank lines.
///
/// # Errors
///
/// Returns [`ReplayError::UnknownDirection`] for a line without a direction
/// marker and [`ReplayError::InvalidCommand`] when a sent line does not
/// decode as a command.
pub fn parse_entry(number: usize, line: &str) -> Result<Option<Entry>, ReplayError> {
    let trimmed = line.trim_end_matches(['\r', '\n']);
    if trimmed.trim().is_empty() {
        return Ok(None);
    }

    let mut chars = trimmed.chars();
    let Some(marker) = chars.next() else {
        return Ok(None);
    };
    let rest = chars.as_str();
    let body = rest.strip_prefix(' ').unwrap_or(rest);

    match marker {
        RECEIVED_MARKER => Ok(Some(Entry::Received(body.to_owned()))),
        SENT_MARKER => Command::parse(body)
            .map(|command| Some(Entry::Sent(command)))
            .map_err(|source| ReplayError::InvalidCommand {
                line: number,
                source,
            }),
        other => Err(ReplayError::UnknownDirection {
            line: number,
            marker: other,
        }),
    }
}

/// Line counts from a replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReplaySummary {
    /// Received lines fed to the client.
    pub received: usize,
    /// Sent commands registered with the correlator.
    pub sent: usize,
    /// Received lines the client rejected.
    pub rejected: usize,
    /// Replies that matched no pending command.
    pub unmatched: usize,
}

/// Feeds every entry of `reader` through `client`.
///
/// Sent commands are retagged by the client's correlator; a mismatch with
/// the recorded tag is logged, since later replies in the log will then go
/// unmatched. Received lines the client rejects are counted and skipped.
///
/// # Errors
///
/// Returns [`ReplayError::Read`] when the reader fails and the errors of
/// [`parse_entry`] for lines that are not valid log entries.
pub fn replay<R: BufRead>(reader: R, client: &mut Client) -> Result<ReplaySummary, ReplayError> {
    let mut summary = ReplaySummary::default();

    for (index, read) in reader.lines().enumerate() {
        let number = index + 1;
        let line = read.map_err(ReplayError::Read)?;
        match parse_entry(number, &line)? {
            None => {}
            Some(Entry::Sent(command)) => {
                let recorded = command.tag().to_owned();
                let prepared = client.prepare_command(command);
                if prepared.tag() != recorded {
                    warn!(
                        target: LOG_TARGET,
                        line = number,
                        recorded = recorded.as_str(),
                        assigned = prepared.tag(),
                        "sent command retagged"
                    );
                }
                summary.sent += 1;
            }
            Some(Entry::Received(text)) => {
                summary.received += 1;
                match client.on_line(&text) {
                    Ok(Dispatched::Unmatched(_)) => summary.unmatched += 1,
                    Ok(outcome) => {
                        debug!(target: LOG_TARGET, line = number, ?outcome, "line applied");
                    }
                    Err(error) => {
                        warn!(target: LOG_TARGET, line = number, %error, "line rejected");
                        summary.rejected += 1;
                    }
                }
            }
        }
    }

    Ok(summary)
}
