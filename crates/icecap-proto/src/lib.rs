//! Wire codec for the Icecap control protocol.
//!
//! Icecap is a line-oriented text protocol. Every line is a sequence of
//! `;`-separated fields: a tag, a command name or reply status, and zero or
//! more `key` / `key=value` parameters. Three message kinds share the grammar:
//!
//! - [`Command`]: sent by the client, field 1 names the command;
//! - [`Reply`]: sent by the gateway, field 1 is a [`ReplyStatus`] marker and
//!   field 0 echoes the tag of the command being answered;
//! - [`Event`]: unsolicited, field 0 is `*` and field 1 names the event.
//!
//! The codec is pure: it never performs I/O and carries no state between
//! lines.
//!
//! # Example
//!
//! ```
//! use icecap_proto::{Message, Params};
//!
//! let message = Message::parse("3;channel names;network=ircnet;channel=#rust")
//!     .expect("valid line");
//! assert_eq!(message.tag(), "3");
//! assert_eq!(message.name(), "channel names");
//! assert_eq!(message.params().text("channel"), Some("#rust"));
//!
//! let params = Params::new().with("msg", "a;b");
//! let line = Message::new("4", "msg", params).serialize();
//! assert_eq!(line, "4;msg;msg=a\\.b");
//! ```

pub mod error;
pub mod escape;
pub mod kinds;
pub mod message;
pub mod params;

pub use self::error::ProtocolError;
pub use self::escape::{escape, unescape};
pub use self::kinds::{Command, EVENT_TAG, Event, Reply, ReplyStatus, is_event_line};
pub use self::message::Message;
pub use self::params::{ParamValue, Params};
