#![allow(missing_docs)]

//! Decoding through visitors and re-encoding with serde_json must describe
//! the same document as the input.

mod common;

use common::{SMALL_JSON, code_tree, decode_code_response, decode_object};
use jsonwalk::{Decoder, Value};

fn reencode<T: serde::Serialize>(value: &T) -> serde_json::Value {
    serde_json::to_value(value).unwrap()
}

#[test]
fn small_object_roundtrip() {
    let decoded = decode_object(SMALL_JSON).unwrap();
    let original: serde_json::Value = serde_json::from_str(SMALL_JSON).unwrap();
    assert_eq!(reencode(&decoded), original);
}

#[test]
fn code_tree_roundtrip() {
    let src = serde_json::to_string(&code_tree(3, 4)).unwrap();
    let decoded = decode_code_response(src.as_bytes()).unwrap();
    let original: serde_json::Value = serde_json::from_str(&src).unwrap();
    assert_eq!(reencode(&decoded), original);
}

#[test]
fn generic_value_display_is_valid_json() {
    let src = r#"{"z": [1, 2.5, -3e2, "é\n\"q\"\u2028"], "a": {"t": true, "f": false, "n": null}}"#;
    let value = Decoder::new(src.as_bytes()).read_value().unwrap();
    assert_eq!(value, Value::Object(expected_map()));

    let rendered = value.to_string();
    let theirs: serde_json::Value = serde_json::from_str(&rendered).unwrap();
    assert_eq!(theirs["z"][3], "é\n\"q\"\u{2028}");
    assert_eq!(theirs["z"][2].as_f64(), Some(-300.0));
    assert_eq!(Decoder::new(rendered.as_bytes()).read_value().unwrap(), value);
}

fn expected_map() -> jsonwalk::Map {
    let mut a = jsonwalk::Map::new();
    a.insert("t".into(), true.into());
    a.insert("f".into(), false.into());
    a.insert("n".into(), Value::Null);
    let mut root = jsonwalk::Map::new();
    root.insert(
        "z".into(),
        Value::Array(vec![
            1.0.into(),
            2.5.into(),
            (-300.0).into(),
            "é\n\"q\"\u{2028}".into(),
        ]),
    );
    root.insert("a".into(), Value::Object(a));
    root
}
