//! Connection identifiers.

use std::fmt;

use icecap_proto::{Params, ProtocolError};
use serde::Serialize;

/// Parameter naming the network of a connection.
pub(crate) const NETWORK_KEY: &str = "network";
/// Parameter naming the local presence of a connection.
pub(crate) const MYPRESENCE_KEY: &str = "mypresence";

/// A (network, local presence) pair identifying one of the client's own
/// sessions.
///
/// Compares and hashes structurally, so it doubles as the map key for
/// local presences and as the back-reference held by owned entities.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Connection {
    network: String,
    mypresence: String,
}

impl Connection {
    /// Creates a connection identifier.
    #[must_use]
    pub fn new(network: impl Into<String>, mypresence: impl Into<String>) -> Self {
        Self {
            network: network.into(),
            mypresence: mypresence.into(),
        }
    }

    /// Reads the `network` and `mypresence` parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::MissingParameter`] naming the first absent
    /// key.
    pub fn from_params(params: &Params) -> Result<Self, ProtocolError> {
        let network = params.require(NETWORK_KEY)?;
        let mypresence = params.require(MYPRESENCE_KEY)?;
        Ok(Self::new(network, mypresence))
    }

    /// Returns the network name.
    #[must_use]
    pub const fn network(&self) -> &str {
        self.network.as_str()
    }

    /// Returns the local presence name.
    #[must_use]
    pub const fn mypresence(&self) -> &str {
        self.mypresence.as_str()
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.mypresence, self.network)
    }
}
