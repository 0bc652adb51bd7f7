//! Unit tests for the reconciliation handlers.

use icecap_proto::{Command, Event, Params, Reply, ReplyStatus};
use rstest::{fixture, rstest};

use super::*;
use crate::store::StateStore;

fn event(line: &str) -> Event {
    Event::parse(line).expect("valid event line")
}

fn snapshot(name: &str, params: Params, rows: &[&str]) -> Command {
    let mut command = Command::new("1", name, params);
    for row in rows {
        command.record_reply(Reply::parse(&format!("1;>;{row}")).expect("valid row"));
    }
    command.record_reply(Reply::new("1", ReplyStatus::Ok, Params::new()));
    command
}

fn me() -> Connection {
    Connection::new("ircnet", "me")
}

/// A store with one network, one local presence, and two channels:
/// alice (`@` in `#a`) is in `#a` and `#b`, bob is in `#a`.
#[fixture]
fn store() -> StateStore {
    let mut store = StateStore::new();
    for line in [
        "*;network_init;network=ircnet",
        "*;gateway_init;network=ircnet;host=irc.example;port=6667",
        "*;local_presence_init;network=ircnet;mypresence=me",
        "*;channel_init;network=ircnet;mypresence=me;channel=#a;topic=hello",
        "*;channel_presence_added;network=ircnet;mypresence=me;channel=#a;presence=alice;mode=@",
        "*;channel_presence_added;network=ircnet;mypresence=me;channel=#a;presence=bob",
        "*;channel_presence_added;network=ircnet;mypresence=me;channel=#b;presence=alice",
    ] {
        let message = event(line);
        let applied = match message.name() {
            "network_init" => network_init(&mut store, &message),
            "gateway_init" => gateway_init(&mut store, &message),
            "local_presence_init" => local_presence_init(&mut store, &message),
            "channel_init" => channel_init(&mut store, &message),
            _ => channel_presence_added(&mut store, &message),
        };
        applied.expect("fixture event applies");
    }
    store
}

fn members(store: &StateStore, channel: &str) -> Vec<(String, String)> {
    store
        .channel(&me(), channel)
        .map(|entry| {
            entry
                .members()
                .iter()
                .map(|(name, mode)| (name.clone(), mode.clone()))
                .collect()
        })
        .unwrap_or_default()
}

#[test]
fn network_list_builds_networks_from_rows() {
    let mut store = StateStore::new();
    network_list(
        &mut store,
        &snapshot("network list", Params::new(), &["network=foo", "network=bar"]),
    );

    let names: Vec<&str> = store.networks().keys().map(String::as_str).collect();
    assert_eq!(names, ["bar", "foo"]);
    assert!(store.networks().values().all(|n| n.gateways().is_empty()));
}

#[rstest]
fn network_list_cascades_to_omitted_networks(mut store: StateStore) {
    let second = Connection::new("ircnet", "alt");
    store.local_presence_entry(&second).join("#c", "carol", "");

    network_list(&mut store, &snapshot("network list", Params::new(), &["network=efnet"]));

    assert!(store.network("ircnet").is_none());
    assert!(store.local_presence(&me()).is_none());
    assert!(store.local_presence(&second).is_none());
    assert!(store.local_presences().is_empty());
}

#[rstest]
fn network_list_carries_gateways_forward(mut store: StateStore) {
    network_list(
        &mut store,
        &snapshot("network list", Params::new(), &["network=ircnet;charset=latin1"]),
    );
    let network = store.network("ircnet").expect("network kept");
    assert_eq!(network.info().text("charset"), Some("latin1"));
    assert_eq!(network.gateways().len(), 1);
    assert!(store.local_presence(&me()).is_some());
}

#[rstest]
fn network_list_skips_rows_without_identity(mut store: StateStore) {
    network_list(
        &mut store,
        &snapshot("network list", Params::new(), &["charset=utf-8", "network=ircnet"]),
    );
    assert_eq!(store.networks().len(), 1);
}

#[rstest]
fn network_deinit_cascades(mut store: StateStore) {
    network_deinit(&mut store, &event("*;network_deinit;network=ircnet")).expect("applies");
    assert!(store.networks().is_empty());
    assert!(store.local_presences().is_empty());
}

#[rstest]
fn gateway_list_replaces_all_gateways(mut store: StateStore) {
    gateway_list(
        &mut store,
        &snapshot(
            "gateway list",
            Params::new(),
            &["network=ircnet;host=b.example", "network=efnet;host=c.example"],
        ),
    );
    let ircnet = store.network("ircnet").expect("ircnet");
    assert_eq!(ircnet.gateways(), [Params::new().with("host", "b.example")]);
    assert_eq!(store.network("efnet").map(|n| n.gateways().len()), Some(1));
}

#[rstest]
fn gateway_init_does_not_duplicate(mut store: StateStore) {
    gateway_init(
        &mut store,
        &event("*;gateway_init;network=ircnet;host=irc.example;port=6667"),
    )
    .expect("applies");
    assert_eq!(store.network("ircnet").map(|n| n.gateways().len()), Some(1));
}

#[rstest]
#[case::network("*;network_init;network=ircnet")]
#[case::local_presence("*;local_presence_init;network=ircnet;mypresence=me")]
#[case::channel("*;channel_init;network=ircnet;mypresence=me;channel=#a")]
#[case::presence("*;presence_init;network=ircnet;mypresence=me;presence=alice")]
fn init_keeps_existing_children(mut store: StateStore, #[case] line: &str) {
    let message = event(line);
    let applied = match message.name() {
        "network_init" => network_init(&mut store, &message),
        "local_presence_init" => local_presence_init(&mut store, &message),
        "channel_init" => channel_init(&mut store, &message),
        _ => presence_init(&mut store, &message),
    };
    applied.expect("applies");

    assert_eq!(store.network("ircnet").map(|n| n.gateways().len()), Some(1));
    assert_eq!(members(&store, "#a").len(), 2);
    assert!(store.presence(&me(), "alice").is_some_and(|p| p.channels().len() == 2));
    assert!(store.check_membership().is_ok());
}

#[rstest]
fn presence_list_drops_omitted_local_presences(mut store: StateStore) {
    let other = Connection::new("efnet", "other");
    store.local_presence_entry(&other);

    presence_list(
        &mut store,
        &snapshot(
            "presence list",
            Params::new(),
            &["network=ircnet;mypresence=me;status=online", "network=undernet;mypresence=me"],
        ),
    );

    assert!(store.local_presence(&other).is_none());
    let local = store.local_presence(&me()).expect("kept");
    assert_eq!(local.info().text("status"), Some("online"));
    assert_eq!(local.channels().len(), 2);
    assert!(store.network("undernet").is_some());
}

#[rstest]
fn local_presence_deinit_removes_owned_entities(mut store: StateStore) {
    local_presence_deinit(
        &mut store,
        &event("*;local_presence_deinit;network=ircnet;mypresence=me"),
    )
    .expect("applies");
    assert!(store.local_presence(&me()).is_none());
    assert!(store.network("ircnet").is_some());
}

#[rstest]
fn presence_deinit_scrubs_memberships(mut store: StateStore) {
    presence_deinit(
        &mut store,
        &event("*;presence_deinit;network=ircnet;mypresence=me;presence=alice"),
    )
    .expect("applies");
    assert_eq!(members(&store, "#a"), [("bob".to_owned(), String::new())]);
    assert!(members(&store, "#b").is_empty());
    assert!(store.check_membership().is_ok());
}

#[rstest]
fn presence_changed_renames_and_keeps_modes(mut store: StateStore) {
    presence_changed(
        &mut store,
        &event("*;presence_changed;network=ircnet;mypresence=me;presence=alice;name=alicia;away"),
    )
    .expect("applies");

    assert!(store.presence(&me(), "alice").is_none());
    let renamed = store.presence(&me(), "alicia").expect("renamed");
    assert_eq!(renamed.channels().len(), 2);
    assert!(renamed.info().flag("away"));
    assert!(!renamed.info().contains("name"));
    assert_eq!(
        members(&store, "#a"),
        [
            ("alicia".to_owned(), "@".to_owned()),
            ("bob".to_owned(), String::new()),
        ]
    );
    assert_eq!(members(&store, "#b"), [("alicia".to_owned(), String::new())]);
    assert!(store.check_membership().is_ok());
}

#[rstest]
fn presence_changed_without_name_merges_info(mut store: StateStore) {
    presence_changed(
        &mut store,
        &event("*;presence_changed;network=ircnet;mypresence=me;presence=bob;real_name=Bob"),
    )
    .expect("applies");
    let bob = store.presence(&me(), "bob").expect("bob");
    assert_eq!(bob.info().text("real_name"), Some("Bob"));
    assert!(bob.is_in("#a"));
}

#[rstest]
fn channel_list_replaces_channels_per_connection(mut store: StateStore) {
    let idle = Connection::new("efnet", "idle");
    store.local_presence_entry(&idle).upsert_channel("#old", Params::new());

    channel_list(
        &mut store,
        &snapshot(
            "channel list",
            Params::new(),
            &[
                "network=ircnet;mypresence=me;channel=#a;topic=updated",
                "network=undernet;mypresence=new;channel=#fresh",
            ],
        ),
    );

    assert_eq!(members(&store, "#a").len(), 2);
    assert!(store.channel(&me(), "#b").is_none());
    assert!(store.presence(&me(), "alice").is_some_and(|p| !p.is_in("#b")));
    assert!(store.local_presence(&idle).is_some_and(|l| l.channels().is_empty()));
    assert!(store.channel(&Connection::new("undernet", "new"), "#fresh").is_some());
    assert!(store.check_membership().is_ok());
}

#[rstest]
fn channel_names_replaces_membership(mut store: StateStore) {
    let params = Params::new()
        .with("network", "ircnet")
        .with("mypresence", "me")
        .with("channel", "#a");
    channel_names(
        &mut store,
        &snapshot("channel names", params, &["presence=bob;mode=+", "presence=carol", "mode=@"]),
    )
    .expect("applies");

    assert_eq!(
        members(&store, "#a"),
        [
            ("bob".to_owned(), "+".to_owned()),
            ("carol".to_owned(), String::new()),
        ]
    );
    assert!(store.presence(&me(), "alice").is_some_and(|p| !p.is_in("#a") && p.is_in("#b")));
    assert!(store.presence(&me(), "carol").is_some_and(|p| p.is_in("#a")));
    assert!(store.check_membership().is_ok());
}

#[rstest]
fn channel_names_requires_its_channel(mut store: StateStore) {
    let before = store.clone();
    let params = Params::new().with("network", "ircnet").with("mypresence", "me");
    let result = channel_names(&mut store, &snapshot("channel names", params, &["presence=bob"]));
    assert_eq!(result, Err(StateError::missing("channel names", "channel")));
    assert_eq!(store, before);
}

#[rstest]
fn channel_deinit_scrubs_members(mut store: StateStore) {
    channel_deinit(
        &mut store,
        &event("*;channel_deinit;network=ircnet;mypresence=me;channel=#a"),
    )
    .expect("applies");
    assert!(store.channel(&me(), "#a").is_none());
    assert!(store.presence(&me(), "bob").is_some_and(|p| p.channels().is_empty()));
    assert!(store.check_membership().is_ok());
}

#[rstest]
fn channel_presence_removed_parts_both_sides(mut store: StateStore) {
    channel_presence_removed(
        &mut store,
        &event("*;channel_presence_removed;network=ircnet;mypresence=me;channel=#a;presence=alice"),
    )
    .expect("applies");
    assert_eq!(members(&store, "#a"), [("bob".to_owned(), String::new())]);
    assert!(store.presence(&me(), "alice").is_some_and(|p| p.is_in("#b") && !p.is_in("#a")));
    assert!(store.check_membership().is_ok());
}

#[rstest]
fn removal_for_unknown_owner_creates_nothing() {
    let mut store = StateStore::new();
    channel_deinit(
        &mut store,
        &event("*;channel_deinit;network=ircnet;mypresence=me;channel=#a"),
    )
    .expect("applies");
    presence_deinit(
        &mut store,
        &event("*;presence_deinit;network=ircnet;mypresence=me;presence=alice"),
    )
    .expect("applies");
    assert_eq!(store, StateStore::new());
}

#[rstest]
#[case::network_init("*;network_init;charset=utf-8", "network")]
#[case::presence_init("*;presence_init;network=ircnet;mypresence=me", "presence")]
#[case::channel_added("*;channel_presence_added;network=ircnet;channel=#a;presence=x", "mypresence")]
#[case::channel_removed(
    "*;channel_presence_removed;network=ircnet;mypresence=me;presence=x",
    "channel"
)]
fn missing_identity_leaves_store_untouched(
    mut store: StateStore,
    #[case] line: &str,
    #[case] key: &str,
) {
    let before = store.clone();
    let message = event(line);
    let result = match message.name() {
        "network_init" => network_init(&mut store, &message),
        "presence_init" => presence_init(&mut store, &message),
        "channel_presence_added" => channel_presence_added(&mut store, &message),
        _ => channel_presence_removed(&mut store, &message),
    };
    assert_eq!(result, Err(StateError::missing(message.name(), key)));
    assert_eq!(store, before);
}

#[test]
fn tracing_target_matches_the_crate_filter() {
    let crate_filter = env!("CARGO_PKG_NAME").replace('-', "_");
    assert_eq!(RECONCILE_TARGET, format!("{crate_filter}::reconcile"));
}
