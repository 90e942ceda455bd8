use alloc::{string::ToString, vec::Vec};

use quickcheck::QuickCheck;

use crate::{
    ParserEvent, ParserOptions, StreamingParser, Value, accumulate, parse,
    tests::chunk_helpers::{byte_chunks, produce_chunks},
};

fn test_count() -> u64 {
    if is_ci::cached() { 10_000 } else { 1_000 }
}

/// Events with `TextChunk`s removed: fragment granularity is the only part
/// of the stream that legitimately depends on where chunks were cut.
fn structural(events: &[ParserEvent]) -> Vec<ParserEvent> {
    events
        .iter()
        .filter(|e| !matches!(e, ParserEvent::TextChunk { .. }))
        .cloned()
        .collect()
}

/// Property: serializing a value and parsing it back reproduces the value.
#[test]
fn roundtrip_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(value: Value) -> bool {
        let src = value.to_string();
        let Ok(events) = parse(&src, ParserOptions::default()) else {
            return false;
        };
        accumulate(&events, &[], false) == value
    }

    QuickCheck::new()
        .tests(test_count())
        .quickcheck(prop as fn(Value) -> bool);
}

/// Property: feeding a document in arbitrary byte chunks (including cuts
/// inside multi-byte characters) yields the same structural events and the
/// same accumulated value as a single-chunk parse.
#[test]
fn partition_invariance_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(value: Value, splits: Vec<usize>) -> bool {
        let src = value.to_string();
        let whole = match parse(&src, ParserOptions::default()) {
            Ok(events) => events,
            Err(_) => return false,
        };

        let mut parser = StreamingParser::new(ParserOptions::default());
        let mut events = Vec::new();
        for chunk in byte_chunks(src.as_bytes(), &splits) {
            parser.feed_bytes(chunk);
            for event in parser.by_ref() {
                match event {
                    Ok(e) => events.push(e),
                    Err(_) => return false,
                }
            }
        }
        for event in parser.finish() {
            match event {
                Ok(e) => events.push(e),
                Err(_) => return false,
            }
        }

        structural(&events) == structural(&whole)
            && accumulate(&events, &[], false) == value
    }

    QuickCheck::new()
        .tests(test_count())
        .quickcheck(prop as fn(Value, Vec<usize>) -> bool);
}

/// Property: every prefix of a valid document parses without error when
/// truncation is allowed.
#[test]
fn prefixes_never_error_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(value: Value, parts: usize) -> bool {
        let src = value.to_string();
        let parts = 1 + parts % 8;
        let options = ParserOptions {
            allow_truncated: true,
            ..Default::default()
        };

        let mut consumed = 0;
        for chunk in produce_chunks(&src, parts) {
            consumed += chunk.len();
            if parse(&src[..consumed], options).is_err() {
                return false;
            }
        }
        true
    }

    QuickCheck::new()
        .tests(test_count())
        .quickcheck(prop as fn(Value, usize) -> bool);
}
