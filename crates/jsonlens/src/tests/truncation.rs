use alloc::{string::ToString, vec, vec::Vec};

use rstest::rstest;

use crate::{
    NodeKind, ParseError, ParserEvent, ParserOptions, Value, accumulate, parse, value::Map,
};

fn truncated() -> ParserOptions {
    ParserOptions {
        allow_truncated: true,
        ..Default::default()
    }
}

#[test]
fn truncated_document_closes_every_open_node() {
    let events = parse(r#"{"a":[1,2,"xy"#, truncated()).unwrap();

    let mut expected = Map::new();
    expected.insert(
        "a".to_string(),
        Value::Array(vec![
            Value::Number(1.0),
            Value::Number(2.0),
            Value::String("xy".to_string()),
        ]),
    );
    assert_eq!(accumulate(&events, &[], false), Value::Object(expected));

    // Starts and ends are balanced per kind.
    let mut depth = 0i32;
    for event in &events {
        match event {
            ParserEvent::NodeStart { .. } => depth += 1,
            ParserEvent::NodeEnd { .. } => depth -= 1,
            _ => {}
        }
    }
    assert_eq!(depth, 0);
    assert!(matches!(events.last(), Some(ParserEvent::End { .. })));
}

#[test]
fn truncation_raises_without_the_option() {
    let err = parse(r#"{"a":[1,2,"xy"#, ParserOptions::default()).unwrap_err();
    assert_eq!(err, ParseError::UnexpectedEnd { parsed_any: true });
}

#[rstest]
#[case::entry_without_value(r#"{"a":"#, Value::Object(Map::new()))]
#[case::key_without_colon(r#"{"a""#, Value::Object(Map::new()))]
#[case::key_cut_mid_string(r#"{"a"#, Value::Object(Map::new()))]
#[case::literal_prefix("[tru", Value::Array(vec![Value::Boolean(true)]))]
#[case::root_string("\"abc", Value::String("abc".to_string()))]
#[case::nested_number(r#"{"n":1"#, {
    let mut m = Map::new();
    m.insert("n".to_string(), Value::Number(1.0));
    Value::Object(m)
})]
#[case::number_with_dangling_exponent("[1e", Value::Array(vec![Value::Number(1.0)]))]
#[case::escape_cut_midway("\"ab\\u00", Value::String("ab".to_string()))]
fn best_effort_values(#[case] src: &str, #[case] expected: Value) {
    let events = parse(src, truncated()).unwrap();
    assert_eq!(accumulate(&events, &[], false), expected, "{src}");
}

#[test]
fn truncated_string_still_emits_its_tail() {
    let events = parse("\"hel", truncated()).unwrap();
    assert!(events.contains(&ParserEvent::TextChunk {
        fragment: "hel".to_string(),
        offset: 1,
        byte_offset: 1
    }));
    assert!(events.iter().any(|e| matches!(
        e,
        ParserEvent::NodeEnd {
            kind: NodeKind::Text,
            value: Some(Value::String(s)),
            ..
        } if s == "hel"
    )));
}

#[test]
fn synthesized_container_ends_point_at_the_cut() {
    let events = parse("[[", truncated()).unwrap();
    let ends: Vec<_> = events
        .iter()
        .filter(|e| {
            matches!(
                e,
                ParserEvent::NodeEnd {
                    kind: NodeKind::Array,
                    ..
                }
            )
        })
        .collect();
    assert_eq!(ends.len(), 2);
    assert!(ends.iter().all(|e| e.offset() == 2 && e.byte_offset() == 2));
}

#[test]
fn truncation_offsets_count_characters_and_bytes() {
    // The é makes the byte position run ahead of the character position.
    let events = parse("\"\u{e9}", truncated()).unwrap();
    let end = events
        .iter()
        .find(|e| {
            matches!(
                e,
                ParserEvent::NodeEnd {
                    kind: NodeKind::Text,
                    ..
                }
            )
        })
        .unwrap();
    assert_eq!((end.offset(), end.byte_offset()), (2, 3));
}
