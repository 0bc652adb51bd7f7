//! Rendering of the state a replay leaves behind.

use std::collections::BTreeSet;
use std::io::Write;

use clap::ValueEnum;
use icecap_client::{Client, Unhandled};
use icecap_proto::{ParamValue, Params};
use icecap_state::{LocalPresence, StateStore};
use serde::Serialize;

use crate::error::ReplayError;
use crate::log::ReplaySummary;

/// Output format for the replay report.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// An indented text summary.
    #[default]
    Human,
    /// Pretty-printed JSON.
    Json,
    /// JSON on a single line.
    JsonCompact,
}

/// Everything a replay produced, as serialised for JSON output.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    /// The reconciled entity graph.
    pub state: &'a StateStore,
    /// Names that arrived without a handler.
    pub unhandled: &'a Unhandled,
    /// Line counts.
    pub summary: ReplaySummary,
}

impl<'a> Report<'a> {
    /// Collects the report for `client` after a replay.
    #[must_use]
    pub const fn new(client: &'a Client, summary: ReplaySummary) -> Self {
        Self {
            state: client.state(),
            unhandled: client.unhandled(),
            summary,
        }
    }
}

/// Writes `report` to `out` in the requested format.
///
/// # Errors
///
/// Returns [`ReplayError::Serialise`] when JSON encoding fails and
/// [`ReplayError::Write`] when `out` rejects the output.
pub fn render<W: Write>(
    report: &Report<'_>,
    format: OutputFormat,
    out: &mut W,
) -> Result<(), ReplayError> {
    match format {
        OutputFormat::Human => render_human(report, out).map_err(ReplayError::Write)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, report).map_err(ReplayError::Serialise)?;
            out.write_all(b"\n").map_err(ReplayError::Write)?;
        }
        OutputFormat::JsonCompact => {
            serde_json::to_writer(&mut *out, report).map_err(ReplayError::Serialise)?;
            out.write_all(b"\n").map_err(ReplayError::Write)?;
        }
    }
    out.flush().map_err(ReplayError::Write)
}

fn render_human<W: Write>(report: &Report<'_>, out: &mut W) -> std::io::Result<()> {
    let state = report.state;

    writeln!(out, "networks: {}", state.networks().len())?;
    for network in state.networks().values() {
        writeln!(out, "  {}{}", network.name(), describe(network.info()))?;
        for gateway in network.gateways() {
            writeln!(out, "    gateway{}", describe(gateway))?;
        }
    }

    writeln!(out, "local presences: {}", state.local_presences().len())?;
    for local in state.local_presences().values() {
        render_local_presence(local, out)?;
    }

    writeln!(out, "unhandled events: {}", list(report.unhandled.events()))?;
    writeln!(out, "unhandled commands: {}", list(report.unhandled.commands()))?;

    let summary = report.summary;
    writeln!(
        out,
        "lines: {} received, {} sent, {} rejected, {} unmatched",
        summary.received, summary.sent, summary.rejected, summary.unmatched
    )
}

fn render_local_presence<W: Write>(local: &LocalPresence, out: &mut W) -> std::io::Result<()> {
    writeln!(
        out,
        "  {} ({} presences){}",
        local.connection(),
        local.presences().len(),
        describe(local.info())
    )?;
    for channel in local.channels().values() {
        writeln!(out, "    {}{}", channel.name(), describe(channel.info()))?;
        for (member, mode) in channel.members() {
            writeln!(out, "      {mode}{member}")?;
        }
    }
    Ok(())
}

/// Formats parameters as ` key=value flag`, with a leading space when any
/// are present.
fn describe(params: &Params) -> String {
    params
        .iter()
        .map(|(key, value)| match value {
            ParamValue::Flag => format!(" {key}"),
            ParamValue::Text(text) => format!(" {key}={text}"),
        })
        .collect()
}

fn list(names: &BTreeSet<String>) -> String {
    if names.is_empty() {
        "(none)".to_owned()
    } else {
        names.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
    }
}
