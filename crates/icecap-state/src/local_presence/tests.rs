//! Unit tests for membership bookkeeping on a local presence.

use icecap_proto::Params;
use rstest::{fixture, rstest};

use super::*;

#[fixture]
fn local() -> LocalPresence {
    let mut local = LocalPresence::new(Connection::new("ircnet", "me"), Params::new());
    local.join("#rust", "alice", "@");
    local.join("#rust", "bob", "");
    local.join("#lobby", "alice", "+");
    local
}

fn member_names(local: &LocalPresence, channel: &str) -> Vec<String> {
    local
        .channel(channel)
        .map(|entry| entry.members().keys().cloned().collect())
        .unwrap_or_default()
}

#[rstest]
fn join_records_both_sides(local: LocalPresence) {
    assert_eq!(local.channel("#rust").and_then(|c| c.mode_of("alice")), Some("@"));
    assert!(local.presence("alice").is_some_and(|p| p.is_in("#lobby")));
    assert!(local.check_membership().is_ok());
}

#[rstest]
fn part_removes_only_the_edge(mut local: LocalPresence) {
    local.part("#rust", "bob");
    assert_eq!(member_names(&local, "#rust"), ["alice"]);
    assert!(local.presence("bob").is_some_and(|p| p.channels().is_empty()));
    assert!(local.check_membership().is_ok());
}

#[rstest]
fn removing_a_presence_scrubs_channels(mut local: LocalPresence) {
    let removed = local.remove_presence("alice");
    assert!(removed.is_some());
    assert_eq!(member_names(&local, "#rust"), ["bob"]);
    assert!(member_names(&local, "#lobby").is_empty());
    assert!(local.check_membership().is_ok());
}

#[rstest]
fn removing_a_channel_scrubs_presences(mut local: LocalPresence) {
    local.remove_channel("#rust");
    assert!(local.channel("#rust").is_none());
    assert!(local.presence("bob").is_some_and(|p| p.channels().is_empty()));
    assert!(local.presence("alice").is_some_and(|p| p.is_in("#lobby")));
    assert!(local.check_membership().is_ok());
}

#[rstest]
fn rename_moves_memberships_and_keeps_modes(mut local: LocalPresence) {
    local.rename_presence("alice", "alicia");

    assert!(local.presence("alice").is_none());
    let renamed = local.presence("alicia").expect("renamed presence");
    assert_eq!(renamed.name(), "alicia");
    assert!(renamed.is_in("#rust"));
    assert_eq!(local.channel("#rust").and_then(|c| c.mode_of("alicia")), Some("@"));
    assert_eq!(local.channel("#lobby").and_then(|c| c.mode_of("alicia")), Some("+"));
    assert!(local.check_membership().is_ok());
}

#[rstest]
fn rename_onto_existing_name_evicts_it(mut local: LocalPresence) {
    local.rename_presence("alice", "bob");

    assert_eq!(local.presences().len(), 1);
    assert_eq!(local.channel("#rust").and_then(|c| c.mode_of("bob")), Some("@"));
    assert_eq!(member_names(&local, "#rust"), ["bob"]);
    assert!(local.check_membership().is_ok());
}

#[rstest]
fn rename_to_same_name_is_a_no_op(mut local: LocalPresence) {
    let before = local.clone();
    local.rename_presence("alice", "alice");
    assert_eq!(local, before);
}

#[rstest]
fn rename_of_unknown_presence_creates_it(mut local: LocalPresence) {
    local.rename_presence("carol", "caroline");
    assert!(local.presence("carol").is_none());
    assert!(local.presence("caroline").is_some());
}

#[rstest]
fn replacing_channels_keeps_members_of_listed_channels(mut local: LocalPresence) {
    local.replace_channels(vec![(
        "#rust".to_owned(),
        Params::new().with("topic", "ownership"),
    )]);

    assert!(local.channel("#lobby").is_none());
    let rust = local.channel("#rust").expect("#rust kept");
    assert_eq!(rust.info().text("topic"), Some("ownership"));
    assert_eq!(rust.members().len(), 2);
    assert!(local.presence("alice").is_some_and(|p| !p.is_in("#lobby")));
    assert!(local.check_membership().is_ok());
}

#[rstest]
fn duplicate_channel_rows_collapse(mut local: LocalPresence) {
    local.replace_channels(vec![
        ("#rust".to_owned(), Params::new().with("topic", "first")),
        ("#rust".to_owned(), Params::new().with("topic", "second")),
    ]);
    let rust = local.channel("#rust").expect("#rust kept");
    assert_eq!(rust.info().text("topic"), Some("second"));
    assert_eq!(rust.members().len(), 2);
}

#[rstest]
fn replacing_members_updates_both_sides(mut local: LocalPresence) {
    local.replace_members(
        "#rust",
        vec![
            ("bob".to_owned(), "@".to_owned()),
            ("carol".to_owned(), String::new()),
        ],
    );

    assert_eq!(member_names(&local, "#rust"), ["bob", "carol"]);
    assert_eq!(local.channel("#rust").and_then(|c| c.mode_of("bob")), Some("@"));
    assert!(local.presence("alice").is_some_and(|p| !p.is_in("#rust")));
    assert!(local.presence("carol").is_some_and(|p| p.is_in("#rust")));
    assert!(local.check_membership().is_ok());
}

#[rstest]
fn upsert_keeps_children(mut local: LocalPresence) {
    local.upsert_channel("#rust", Params::new().with("topic", "new"));
    local.upsert_presence("alice", Params::new().with("real_name", "Alice"));

    assert_eq!(local.channel("#rust").map(|c| c.members().len()), Some(2));
    assert!(local.presence("alice").is_some_and(|p| p.is_in("#rust")));
    assert_eq!(
        local.presence("alice").and_then(|p| p.info().text("real_name")),
        Some("Alice")
    );
}

#[test]
fn replacing_carries_children_forward() {
    let mut previous = LocalPresence::new(Connection::new("ircnet", "me"), Params::new());
    previous.join("#rust", "alice", "");

    let local = LocalPresence::replacing(
        Connection::new("ircnet", "me"),
        Params::new().with("status", "away"),
        Some(previous),
    );
    assert_eq!(local.info().text("status"), Some("away"));
    assert!(local.channel("#rust").is_some_and(|c| c.has_member("alice")));
}
