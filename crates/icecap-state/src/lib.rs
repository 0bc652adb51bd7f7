//! In-memory mirror of the gateway's entity graph.
//!
//! The [`StateStore`] owns every entity the client knows about:
//!
//! ```text
//! StateStore
//! ├── Network (by name) ── gateways
//! └── LocalPresence (by Connection = network + mypresence)
//!     ├── Presence (by name) ── set of channel names
//!     └── Channel (by name) ── membership: presence name -> mode
//! ```
//!
//! Presences and channels point back at their owner through its
//! [`Connection`] key only; [`StateStore::owner_of`] resolves that key and
//! reports [`StateError::Orphaned`] when the owner has gone.
//!
//! Entities are read-only outside this crate. The [`reconcile`] handlers are
//! the single writer, which keeps presence/channel membership symmetric: a
//! presence lists channel `C` exactly when `C`'s membership map lists the
//! presence.
//!
//! [`StateStore::resolve_event`] and its siblings look up the entities a
//! message names, for code reacting to messages after reconciliation.

mod channel;
mod connection;
mod error;
mod local_presence;
mod network;
mod presence;
pub mod reconcile;
mod resolve;
mod store;

pub use self::channel::Channel;
pub use self::connection::Connection;
pub use self::error::StateError;
pub use self::local_presence::LocalPresence;
pub use self::network::{Gateway, Network};
pub use self::presence::Presence;
pub use self::resolve::{Resolved, STATE_KEYS, nonstate_params};
pub use self::store::{Owned, StateStore};
