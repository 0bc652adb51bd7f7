//! Stateful client for the Icecap control protocol.
//!
//! The client mirrors the gateway's entity graph. It tags outgoing commands,
//! correlates reply streams with them, and applies completed snapshots and
//! unsolicited events to an [`icecap_state::StateStore`]:
//!
//! ```text
//! received line ──► Client::on_line
//!                     ├── "*;..." ──► EventKind ──► reconcile::<event>
//!                     └── reply ────► Correlator
//!                                       ├── MORE ──► accumulate
//!                                       ├── FAIL ──► drop, no handler
//!                                       └── OK ────► ReplyKind ──► reconcile::<list>
//! ```
//!
//! Names without a handler are recorded in [`Client::unhandled`] rather than
//! rejected. Applications react to events through [`Client::subscribe`].
//! [`Session`] binds a client to a transport.

pub mod correlator;
mod dispatch;
mod error;
pub mod session;

pub use self::correlator::{Correlation, Correlator};
pub use self::dispatch::{Client, Dispatched, EventHandler, EventKind, ReplyKind, Unhandled};
pub use self::error::{ClientError, SessionError};
pub use self::session::{LineSink, LineSource, ReaderSource, Session, WriterSink};

#[cfg(test)]
mod tests;
