use alloc::string::ToString;

use serde_json::json;

use crate::{NodeKind, ParserEvent, ParserOptions, Value, parse};

#[test]
fn events_serialize_with_camel_case_tags() {
    let start = ParserEvent::NodeStart {
        kind: NodeKind::Object,
        offset: 0,
        byte_offset: 0,
    };
    assert_eq!(
        serde_json::to_value(&start).unwrap(),
        json!({"event": "nodeStart", "kind": "object", "offset": 0, "byteOffset": 0})
    );
}

#[test]
fn array_entry_carries_its_index() {
    let start = ParserEvent::NodeStart {
        kind: NodeKind::ArrayEntry(3),
        offset: 7,
        byte_offset: 7,
    };
    assert_eq!(
        serde_json::to_value(&start).unwrap(),
        json!({"event": "nodeStart", "kind": {"arrayEntry": 3}, "offset": 7, "byteOffset": 7})
    );
}

#[test]
fn node_end_omits_absent_values() {
    let end = ParserEvent::NodeEnd {
        kind: NodeKind::ObjectEntry,
        value: None,
        offset: 5,
        byte_offset: 5,
    };
    let encoded = serde_json::to_value(&end).unwrap();
    assert_eq!(
        encoded,
        json!({"event": "nodeEnd", "kind": "objectEntry", "offset": 5, "byteOffset": 5})
    );
    assert!(encoded.get("value").is_none());
}

#[test]
fn node_end_value_uses_json_representation() {
    let end = ParserEvent::NodeEnd {
        kind: NodeKind::Text,
        value: Some(Value::String("hi".to_string())),
        offset: 3,
        byte_offset: 3,
    };
    assert_eq!(
        serde_json::to_value(&end).unwrap(),
        json!({"event": "nodeEnd", "kind": "text", "value": "hi", "offset": 3, "byteOffset": 3})
    );
}

#[test]
fn a_parsed_stream_is_serializable_end_to_end() {
    let events = parse("[true]", ParserOptions::default()).unwrap();
    let encoded = serde_json::to_value(&events).unwrap();
    let array = encoded.as_array().unwrap();
    assert_eq!(array.len(), events.len());
    assert_eq!(array[0]["event"], "nodeStart");
    assert_eq!(array[array.len() - 1]["event"], "end");
}
