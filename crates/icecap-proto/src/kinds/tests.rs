//! Unit tests for commands, replies and events.

use rstest::rstest;

use super::*;

#[rstest]
#[case::ok("+", ReplyStatus::Ok)]
#[case::fail("-", ReplyStatus::Fail)]
#[case::more(">", ReplyStatus::More)]
fn status_table_is_bidirectional(#[case] marker: &str, #[case] status: ReplyStatus) {
    assert_eq!(ReplyStatus::from_marker(marker), Ok(status));
    assert_eq!(status.marker(), marker);
}

#[rstest]
#[case::word("OK")]
#[case::empty("")]
#[case::star("*")]
fn unknown_markers_are_rejected(#[case] marker: &str) {
    assert_eq!(
        ReplyStatus::from_marker(marker),
        Err(ProtocolError::unknown_status(marker))
    );
}

#[test]
fn only_more_keeps_the_stream_open() {
    assert!(ReplyStatus::Ok.is_terminal());
    assert!(ReplyStatus::Fail.is_terminal());
    assert!(!ReplyStatus::More.is_terminal());
}

#[test]
fn parses_reply_line() {
    let reply = Reply::parse("5;>;network=foo").expect("parse");
    assert_eq!(reply.tag(), "5");
    assert_eq!(reply.status(), ReplyStatus::More);
    assert_eq!(reply.params().text("network"), Some("foo"));
}

#[test]
fn reply_with_unknown_status_fails() {
    let error = Reply::parse("5;?;network=foo").expect_err("unknown status");
    assert!(matches!(error, ProtocolError::UnknownStatus { ref marker } if marker == "?"));
}

#[test]
fn reply_with_single_field_is_malformed() {
    let error = Reply::parse("5").expect_err("malformed");
    assert!(matches!(error, ProtocolError::MalformedMessage { .. }));
}

#[test]
fn reply_serialises_marker() {
    let reply = Reply::new("9", ReplyStatus::Fail, Params::new().with("msg", "nope"));
    assert_eq!(reply.to_string(), "9;-;msg=nope");
}

#[test]
fn event_lines_start_with_star() {
    assert!(is_event_line("*;network_init;network=foo"));
    assert!(!is_event_line("1;+"));
}

#[test]
fn parses_event_line() {
    let event = Event::parse("*;channel_init;network=n;mypresence=me;channel=#a").expect("parse");
    assert_eq!(event.name(), "channel_init");
    assert_eq!(event.params().text("channel"), Some("#a"));
    assert_eq!(event.to_string(), "*;channel_init;channel=#a;mypresence=me;network=n");
}

#[test]
fn command_collects_rows_and_terminal_status() {
    let mut command = Command::new("1", "network list", Params::new());
    command.record_reply(Reply::new("1", ReplyStatus::More, Params::new().with("network", "a")));
    assert_eq!(command.status(), None);
    command.record_reply(Reply::new("1", ReplyStatus::More, Params::new().with("network", "b")));
    command.record_reply(Reply::new("1", ReplyStatus::Ok, Params::new()));

    let networks: Vec<&str> = command
        .rows()
        .filter_map(|row| row.text("network"))
        .collect();
    assert_eq!(networks, ["a", "b"]);
    assert_eq!(command.replies().len(), 3);
    assert_eq!(command.status(), Some(ReplyStatus::Ok));
}

#[test]
fn parsed_command_can_be_retagged() {
    let mut command = Command::parse("99;channel names;network=n;mypresence=me;channel=#a")
        .expect("parse");
    command.set_tag("3");
    assert_eq!(command.tag(), "3");
    assert_eq!(command.name(), "channel names");
    assert_eq!(command.to_string(), "3;channel names;channel=#a;mypresence=me;network=n");
}

#[test]
fn reply_serialises_status_as_snake_case() {
    let json = serde_json::to_string(&ReplyStatus::More).expect("serialise");
    assert_eq!(json, "\"more\"");
}
