use alloc::{string::ToString, vec::Vec};

use crate::{
    AccumulatorEvent, Contaminated, FocusAccumulator, ParserEvent, ParserOptions, Value,
    accumulate, parse, value::Map,
};

fn contaminated(kind: Contaminated) -> ParserOptions {
    ParserOptions {
        contaminated: kind,
        ..Default::default()
    }
}

#[test]
fn object_embedded_in_noise() {
    let events = parse(
        r#"noise {"x":1} trailing"#,
        contaminated(Contaminated::Object),
    )
    .unwrap();

    let mut expected = Map::new();
    expected.insert("x".to_string(), Value::Number(1.0));
    assert_eq!(accumulate(&events, &[], false), Value::Object(expected));

    let raw: Vec<&str> = events
        .iter()
        .filter_map(|e| match e {
            ParserEvent::Raw { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(raw, ["noise", "trailing"]);
}

#[test]
fn hunting_ignores_other_openers() {
    // In object mode a bracket is noise, not a value.
    let events = parse("[7] {}", contaminated(Contaminated::Object)).unwrap();
    assert_eq!(accumulate(&events, &[], false), Value::Object(Map::new()));
}

#[test]
fn array_embedded_in_noise() {
    let events = parse("x [1] y", contaminated(Contaminated::Array)).unwrap();
    assert_eq!(
        accumulate(&events, &[], false),
        Value::Array(alloc::vec![Value::Number(1.0)])
    );
}

#[test]
fn any_value_embedded_in_noise() {
    let events = parse(">>> 42 <<<", contaminated(Contaminated::Any)).unwrap();
    assert_eq!(accumulate(&events, &[], false), Value::Number(42.0));
}

#[test]
fn raw_offsets_point_at_the_noise() {
    let events = parse("ab{}", contaminated(Contaminated::Object)).unwrap();
    assert!(events.contains(&ParserEvent::Raw {
        text: "ab".to_string(),
        offset: 0,
        byte_offset: 0
    }));
}

#[test]
fn accumulator_forwards_raw_text() {
    let events = parse("hi [true]", contaminated(Contaminated::Array)).unwrap();
    let mut acc = FocusAccumulator::new(alloc::vec![], false);
    let notifications: Vec<_> = events.iter().flat_map(|e| acc.feed(e)).collect();
    assert!(notifications.contains(&AccumulatorEvent::Raw("hi".to_string())));
}

#[test]
fn trailing_noise_is_not_an_error_only_in_contaminated_mode() {
    assert!(parse("{} trailing", ParserOptions::default()).is_err());
    assert!(parse("{} trailing", contaminated(Contaminated::Object)).is_ok());
}
