//! Events emitted by the streaming JSON parser.
//!
//! Every event is tagged at construction with the character offset and byte
//! offset it refers to; events are never mutated after emission. Start
//! offsets point at a node's first character, end offsets one past its last
//! (for text nodes, the span covers the content between the quotes).
//!
//! # Examples
//!
//! ```
//! use jsonlens::{NodeKind, ParserEvent, ParserOptions, Value, parse};
//!
//! let events = parse("[true]", ParserOptions::default()).unwrap();
//! assert_eq!(
//!     events,
//!     vec![
//!         ParserEvent::NodeStart { kind: NodeKind::Array, offset: 0, byte_offset: 0 },
//!         ParserEvent::NodeStart { kind: NodeKind::ArrayEntry(0), offset: 1, byte_offset: 1 },
//!         ParserEvent::NodeStart { kind: NodeKind::True, offset: 1, byte_offset: 1 },
//!         ParserEvent::NodeEnd {
//!             kind: NodeKind::True,
//!             value: Some(Value::Boolean(true)),
//!             offset: 5,
//!             byte_offset: 5,
//!         },
//!         ParserEvent::NodeEnd { kind: NodeKind::ArrayEntry(0), value: None, offset: 5, byte_offset: 5 },
//!         ParserEvent::NodeEnd { kind: NodeKind::Array, value: None, offset: 6, byte_offset: 6 },
//!         ParserEvent::End { offset: 6, byte_offset: 6 },
//!     ]
//! );
//! ```
use alloc::string::String;

use crate::value::Value;

/// The kind of node a [`ParserEvent::NodeStart`]/[`ParserEvent::NodeEnd`]
/// pair delimits.
///
/// `Object`, `Array`, `Number`, `True`, `False`, `Null` and `Text` are value
/// nodes. `ObjectEntry`, `ObjectKey`, `ObjectValue` and `ArrayEntry` are
/// structural wrappers: an object entry contains a key and a value, an array
/// entry carries its index.
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Object,
    Array,
    ObjectEntry,
    ObjectKey,
    ObjectValue,
    ArrayEntry(usize),
    Number,
    True,
    False,
    Null,
    Text,
}

impl NodeKind {
    /// Whether this kind is a value node rather than a structural wrapper.
    #[must_use]
    pub fn is_value(self) -> bool {
        !matches!(
            self,
            Self::ObjectEntry | Self::ObjectKey | Self::ObjectValue | Self::ArrayEntry(_)
        )
    }
}

/// One event in the parse stream.
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "event", rename_all = "camelCase", rename_all_fields = "camelCase")
)]
#[derive(Debug, Clone, PartialEq)]
pub enum ParserEvent {
    /// A node began at `offset`.
    NodeStart {
        kind: NodeKind,
        offset: usize,
        byte_offset: usize,
    },
    /// A node ended just before `offset`.
    ///
    /// For scalar nodes `value` carries the parsed value; container and
    /// wrapper nodes carry `None` (their contents were already streamed).
    NodeEnd {
        kind: NodeKind,
        #[cfg_attr(
            any(test, feature = "serde"),
            serde(skip_serializing_if = "Option::is_none", default)
        )]
        value: Option<Value>,
        offset: usize,
        byte_offset: usize,
    },
    /// The complete decoded content of a string node, emitted together with
    /// its `NodeEnd`.
    Text {
        value: String,
        offset: usize,
        byte_offset: usize,
    },
    /// A partial string fragment, emitted when the input chunk ends inside a
    /// string literal. `offset` is the position of the fragment's first
    /// character.
    TextChunk {
        fragment: String,
        offset: usize,
        byte_offset: usize,
    },
    /// Non-JSON bytes passed through in a contaminated or error-recording
    /// parse.
    Raw {
        text: String,
        offset: usize,
        byte_offset: usize,
    },
    /// End of input. Always the final event.
    End { offset: usize, byte_offset: usize },
}

impl ParserEvent {
    /// The character offset this event is tagged with.
    #[must_use]
    pub fn offset(&self) -> usize {
        match self {
            Self::NodeStart { offset, .. }
            | Self::NodeEnd { offset, .. }
            | Self::Text { offset, .. }
            | Self::TextChunk { offset, .. }
            | Self::Raw { offset, .. }
            | Self::End { offset, .. } => *offset,
        }
    }

    /// The byte offset this event is tagged with.
    #[must_use]
    pub fn byte_offset(&self) -> usize {
        match self {
            Self::NodeStart { byte_offset, .. }
            | Self::NodeEnd { byte_offset, .. }
            | Self::Text { byte_offset, .. }
            | Self::TextChunk { byte_offset, .. }
            | Self::Raw { byte_offset, .. }
            | Self::End { byte_offset, .. } => *byte_offset,
        }
    }
}
