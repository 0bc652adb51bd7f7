//! Unit tests for the parameter map.

use rstest::{fixture, rstest};

use super::*;

#[fixture]
fn params() -> Params {
    Params::new()
        .with("network", "ircnet")
        .with("mypresence", "jorgen")
        .with("address", "")
        .with_flag("autoconnect")
}

#[rstest]
fn text_skips_flags(params: Params) {
    assert_eq!(params.text("network"), Some("ircnet"));
    assert_eq!(params.text("address"), Some(""));
    assert_eq!(params.text("autoconnect"), None);
    assert!(params.contains("autoconnect"));
}

#[rstest]
fn flag_is_true_only_for_bare_keys(params: Params) {
    assert!(params.flag("autoconnect"));
    assert!(!params.flag("network"));
    assert!(!params.flag("missing"));
}

#[rstest]
#[case::present("network", Ok("ircnet"))]
#[case::flag("autoconnect", Err(ProtocolError::missing_parameter("autoconnect")))]
#[case::absent("channel", Err(ProtocolError::missing_parameter("channel")))]
fn require_reports_missing_keys(
    params: Params,
    #[case] key: &str,
    #[case] expected: Result<&str, ProtocolError>,
) {
    assert_eq!(params.require(key), expected);
}

#[rstest]
fn without_strips_identity_keys(params: Params) {
    let info = params.without(&["network", "mypresence"]);
    assert_eq!(info.len(), 2);
    assert!(!info.contains("network"));
    assert!(info.contains("autoconnect"));
    assert_eq!(params.len(), 4, "source map must be left untouched");
}

#[rstest]
fn merge_overwrites_existing_keys(mut params: Params) {
    params.merge(&Params::new().with("address", "host.example").with("real", "J"));
    assert_eq!(params.text("address"), Some("host.example"));
    assert_eq!(params.text("real"), Some("J"));
}

#[rstest]
fn serialises_flags_as_true(params: Params) {
    let json = serde_json::to_value(&params).expect("serialise");
    assert_eq!(
        json,
        serde_json::json!({
            "address": "",
            "autoconnect": true,
            "mypresence": "jorgen",
            "network": "ircnet",
        })
    );
}

#[test]
fn iterates_in_key_order() {
    let params = Params::new().with("b", "2").with("a", "1").with_flag("c");
    let keys: Vec<&str> = params.iter().map(|(key, _)| key.as_str()).collect();
    assert_eq!(keys, ["a", "b", "c"]);
}

#[rstest]
#[case::builder(Params::new().with_flag("").with("a", "1"))]
#[case::collected(
    [(String::new(), ParamValue::Flag), ("a".to_owned(), ParamValue::from("1"))]
        .into_iter()
        .collect()
)]
fn empty_keyed_flags_are_not_stored(#[case] params: Params) {
    assert_eq!(params.len(), 1);
    assert!(!params.contains(""));
}

#[test]
fn empty_key_with_a_value_is_kept() {
    let mut params = Params::new();
    assert_eq!(params.insert("", "x"), None);
    assert_eq!(params.text(""), Some("x"));
}
