//! Drives a [`Client`] over a line-oriented transport.
//!
//! The transport is abstracted behind [`LineSource`] and [`LineSink`] so the
//! session can run over a socket, a pipe or a test double. Adapters for
//! [`BufRead`] and [`Write`] implementors are provided.

use std::io::{self, BufRead, Write};

use icecap_proto::{Command, Params};
use tracing::warn;

use crate::dispatch::{Client, DISPATCH_TARGET, Dispatched};
use crate::error::SessionError;

/// Supplies received lines, one at a time.
pub trait LineSource {
    /// Returns the next line without its terminator, or `None` once the
    /// source is exhausted.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when reading fails.
    fn next_line(&mut self) -> io::Result<Option<String>>;
}

/// Accepts lines to transmit.
pub trait LineSink {
    /// Writes one line; the sink adds the terminator.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when writing fails.
    fn send_line(&mut self, line: &str) -> io::Result<()>;
}

/// [`LineSource`] over any buffered reader.
#[derive(Debug)]
pub struct ReaderSource<R> {
    reader: R,
}

impl<R: BufRead> ReaderSource<R> {
    /// Wraps a buffered reader.
    #[must_use]
    pub const fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> LineSource for ReaderSource<R> {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed_len = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed_len);
        Ok(Some(line))
    }
}

/// [`LineSink`] over any writer. Each line is terminated with `\n` and
/// flushed.
#[derive(Debug)]
pub struct WriterSink<W> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    /// Wraps a writer.
    #[must_use]
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Returns the wrapped writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> LineSink for WriterSink<W> {
    fn send_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.writer, "{line}")?;
        self.writer.flush()
    }
}

/// A client bound to a transport.
#[derive(Debug)]
pub struct Session<S, K> {
    client: Client,
    source: S,
    sink: K,
}

impl<S: LineSource, K: LineSink> Session<S, K> {
    /// Creates a session around a fresh client.
    #[must_use]
    pub fn new(source: S, sink: K) -> Self {
        Self::with_client(Client::new(), source, sink)
    }

    /// Creates a session around an existing client.
    #[must_use]
    pub const fn with_client(client: Client, source: S, sink: K) -> Self {
        Self {
            client,
            source,
            sink,
        }
    }

    /// Returns the client.
    #[must_use]
    pub const fn client(&self) -> &Client {
        &self.client
    }

    /// Returns the client, mutably, for example to reset it after a
    /// reconnect.
    pub const fn client_mut(&mut self) -> &mut Client {
        &mut self.client
    }

    /// Consumes the session, returning the client.
    #[must_use]
    pub fn into_client(self) -> Client {
        self.client
    }

    /// Prepares a command and writes it to the sink.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Write`] when the sink fails. The command stays
    /// registered as pending.
    pub fn send(&mut self, name: impl Into<String>, params: Params) -> Result<Command, SessionError> {
        let command = self.client.prepare(name, params);
        self.sink
            .send_line(&command.to_string())
            .map_err(SessionError::Write)?;
        Ok(command)
    }

    /// Reads one line and dispatches it. Returns `None` once the source is
    /// exhausted.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Read`] when the source fails, and
    /// [`SessionError::Client`] when the line is rejected; the session stays
    /// usable after the latter.
    pub fn pump(&mut self) -> Result<Option<Dispatched>, SessionError> {
        let Some(line) = self.source.next_line().map_err(SessionError::Read)? else {
            return Ok(None);
        };
        Ok(Some(self.client.on_line(&line)?))
    }

    /// Pumps until the source is exhausted, returning the number of lines
    /// read. Rejected lines are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Read`] when the source fails.
    pub fn run(&mut self) -> Result<usize, SessionError> {
        let mut lines = 0;
        loop {
            match self.pump() {
                Ok(Some(_)) => lines += 1,
                Ok(None) => return Ok(lines),
                Err(error) if error.is_fatal() => return Err(error),
                Err(error) => {
                    lines += 1;
                    warn!(target: DISPATCH_TARGET, %error, "line rejected");
                }
            }
        }
    }
}
