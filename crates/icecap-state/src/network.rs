//! Networks and their gateways.

use icecap_proto::Params;
use serde::Serialize;

/// A gateway through which a network can be reached: every parameter of the
/// announcing row or event except `network`.
pub type Gateway = Params;

/// A remote network the gateway knows how to reach.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Network {
    name: String,
    info: Params,
    gateways: Vec<Gateway>,
}

impl Network {
    pub(crate) fn new(name: impl Into<String>, info: Params) -> Self {
        Self {
            name: name.into(),
            info,
            gateways: Vec::new(),
        }
    }

    /// Builds a network from a snapshot row or init event, keeping the
    /// gateways of the network it replaces. Neither message kind carries
    /// gateways itself.
    pub(crate) fn replacing(name: impl Into<String>, info: Params, previous: Option<Self>) -> Self {
        let mut network = Self::new(name, info);
        if let Some(previous) = previous {
            network.gateways = previous.gateways;
        }
        network
    }

    /// Returns the network name.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the informational parameters.
    #[must_use]
    pub const fn info(&self) -> &Params {
        &self.info
    }

    /// Returns the known gateways, in announcement order.
    #[must_use]
    pub fn gateways(&self) -> &[Gateway] {
        &self.gateways
    }

    /// Adds a gateway unless an identical one is already listed. Returns
    /// `true` when the list changed.
    pub(crate) fn add_gateway(&mut self, gateway: Gateway) -> bool {
        if self.gateways.contains(&gateway) {
            return false;
        }
        self.gateways.push(gateway);
        true
    }

    pub(crate) fn clear_gateways(&mut self) {
        self.gateways.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway(host: &str) -> Gateway {
        Params::new().with("host", host).with("port", "6667")
    }

    #[test]
    fn replacing_keeps_previous_gateways() {
        let mut previous = Network::new("ircnet", Params::new());
        previous.add_gateway(gateway("irc.example"));

        let network = Network::replacing(
            "ircnet",
            Params::new().with("charset", "utf-8"),
            Some(previous),
        );
        assert_eq!(network.info().text("charset"), Some("utf-8"));
        assert_eq!(network.gateways(), [gateway("irc.example")]);
    }

    #[test]
    fn identical_gateways_are_not_duplicated() {
        let mut network = Network::new("ircnet", Params::new());
        assert!(network.add_gateway(gateway("a.example")));
        assert!(!network.add_gateway(gateway("a.example")));
        assert!(network.add_gateway(gateway("b.example")));
        assert_eq!(network.gateways().len(), 2);
    }
}
