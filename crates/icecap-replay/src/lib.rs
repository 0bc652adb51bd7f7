//! Replays a recorded Icecap session and reports the resulting state.
//!
//! The tool reads a session log (see [`log`]) from a file or standard
//! input, drives a fresh [`icecap_client::Client`] with it, and prints the
//! reconciled entity graph together with any names that had no handler.
//! Diagnostics go to standard error through `tracing`; the report goes to
//! standard output.

use std::ffi::OsString;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use icecap_client::Client;
use icecap_config::ConfigArgs;
use tracing::{debug, info};

mod error;
pub mod log;
pub mod render;
mod telemetry;

pub use self::error::ReplayError;
pub use self::log::{Entry, ReplaySummary, parse_entry, replay};
pub use self::render::{OutputFormat, Report, render};

const RUN_TARGET: &str = "icecap_replay::run";

/// Command-line arguments for `icecap-replay`.
#[derive(Parser, Debug)]
#[command(name = "icecap-replay", version, about = "Replay a recorded Icecap session")]
struct Cli {
    /// Session log to replay. Reads standard input when omitted.
    #[arg(value_name = "LOG")]
    log: Option<PathBuf>,
    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    output: OutputFormat,
    #[command(flatten)]
    config: ConfigArgs,
}

/// Runs the replay tool with the provided arguments and output streams.
///
/// Help and version requests are written to `stdout` and succeed. Every
/// other failure is written to `stderr` and yields [`ExitCode::FAILURE`].
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) if !error.use_stderr() => {
            return match write!(stdout, "{error}") {
                Ok(()) => ExitCode::SUCCESS,
                Err(_) => ExitCode::FAILURE,
            };
        }
        Err(error) => return report_failure(&ReplayError::CliUsage(error), stderr),
    };

    match execute(cli, stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => report_failure(&error, stderr),
    }
}

fn report_failure<E: Write>(error: &ReplayError, stderr: &mut E) -> ExitCode {
    drop(writeln!(stderr, "{error}"));
    ExitCode::FAILURE
}

fn execute<W: Write>(cli: Cli, stdout: &mut W) -> Result<(), ReplayError> {
    let config = cli.config.into_config()?;
    let telemetry = telemetry::initialise(&config)?;
    debug!(
        target: RUN_TARGET,
        filter = telemetry.filter(),
        format = %telemetry.format(),
        "telemetry ready"
    );

    let mut client = Client::new();
    let summary = match cli.log.as_ref() {
        Some(path) => {
            let file = File::open(path).map_err(|source| ReplayError::Open {
                path: path.clone(),
                source,
            })?;
            replay(BufReader::new(file), &mut client)?
        }
        None => replay(io::stdin().lock(), &mut client)?,
    };

    info!(
        target: RUN_TARGET,
        received = summary.received,
        sent = summary.sent,
        rejected = summary.rejected,
        unmatched = summary.unmatched,
        pending = client.correlator().pending_len(),
        "replay finished"
    );

    render(&Report::new(&client, summary), cli.output, stdout)
}
