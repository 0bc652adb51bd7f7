//! Crate-level integration and BDD tests.

use icecap_proto::Params;
use icecap_state::Connection;

use crate::{Client, Dispatched};


/// A connect-time exchange: snapshots for every entity kind followed by a
/// few incremental events.
const SESSION: &[&str] = &[
    "1;>;network=ircnet;charset=utf-8",
    "1;>;network=efnet",
    "1;+",
    "2;>;network=ircnet;host=irc.example;port=6667",
    "2;+",
    "3;>;network=ircnet;mypresence=me;connected",
    "3;+",
    "4;>;network=ircnet;mypresence=me;channel=#rust;topic=ownership",
    "4;+",
    "5;>;presence=alice;mode=@",
    "5;>;presence=bob",
    "5;>;presence=me",
    "5;+",
    "*;channel_presence_added;network=ircnet;mypresence=me;channel=#rust;presence=carol",
    "*;presence_changed;network=ircnet;mypresence=me;presence=bob;name=robert",
    "*;channel_presence_removed;network=ircnet;mypresence=me;channel=#rust;presence=alice",
    "*;network_deinit;network=efnet",
];

fn prepare_connect_commands(client: &mut Client) {
    for name in ["network list", "gateway list", "presence list", "channel list"] {
        client.prepare(name, Params::new());
    }
    client.prepare(
        "channel names",
        Params::new()
            .with("network", "ircnet")
            .with("mypresence", "me")
            .with("channel", "#rust"),
    );
}

#[test]
fn membership_stays_symmetric_through_a_session() {
    let mut client = Client::new();
    prepare_connect_commands(&mut client);

    for line in SESSION {
        client.on_line(line).expect("line dispatches");
        client
            .state()
            .check_membership()
            .expect("membership symmetric after every line");
    }

    let me = Connection::new("ircnet", "me");
    let state = client.state();
    let rust = state.channel(&me, "#rust").expect("#rust");
    let members: Vec<&str> = rust.members().keys().map(String::as_str).collect();
    assert_eq!(members, ["carol", "me", "robert"]);
    assert_eq!(state.networks().len(), 1);
    assert_eq!(
        state.network("ircnet").map(|network| network.gateways().len()),
        Some(1)
    );
    assert!(state
        .local_presence(&me)
        .is_some_and(|local| local.info().flag("connected")));
    assert!(client.unhandled().is_empty());
    assert_eq!(client.events().len(), 4);
    assert_eq!(client.correlator().pending_len(), 0);
}

#[test]
fn out_of_order_terminal_reply_is_unmatched() {
    let mut client = Client::new();
    let outcome = client.on_line("1;>;network=ircnet").expect("reply");
    assert!(matches!(outcome, Dispatched::Unmatched(_)));
    assert!(client.state().networks().is_empty());
}
