//! Reconstruction of a JSON value from the event stream, filtered to a
//! focused subtree.
//!
//! The accumulator follows the parser's node events, maintains the path of
//! the node currently being parsed, and materializes values only while that
//! path lies under the configured focus. Everything outside the focus is
//! parsed but never allocated. Snapshot notifications are coalesced: any
//! number of mutations between two [`flush`](FocusAccumulator::flush) calls
//! produce at most one [`AccumulatorEvent::Snapshot`].
//!
//! # Examples
//!
//! ```
//! use jsonlens::{FocusAccumulator, ParserOptions, Value, parse, path};
//!
//! let events = parse(r#"{"a":1,"b":[2,3]}"#, ParserOptions::default()).unwrap();
//! let mut acc = FocusAccumulator::new(path!["b"], false);
//! for event in &events {
//!     acc.feed(event);
//! }
//! assert_eq!(
//!     acc.value(),
//!     &Value::Array(vec![Value::Number(2.0), Value::Number(3.0)])
//! );
//! ```
use alloc::{string::String, vec::Vec};

use crate::{
    event::{NodeKind, ParserEvent},
    offsets::{OffsetIndex, OffsetRecord},
    path::PathComponent,
    value::{Map, Value},
};

/// Notifications produced while accumulating.
#[derive(Debug, Clone, PartialEq)]
pub enum AccumulatorEvent {
    /// The parse entered the focused subtree.
    Focus,
    /// The parse left the focused subtree; the focused value is complete.
    Blur,
    /// A coalesced snapshot of the value accumulated so far. Produced only
    /// by [`FocusAccumulator::flush`].
    Snapshot(Value),
    /// The final value, produced when the parser's `End` event arrives.
    Final(Value),
    /// Non-JSON passthrough text, forwarded from the parser.
    Raw(String),
}

/// Builds the value under a focus path from parser events.
#[derive(Debug)]
pub struct FocusAccumulator {
    focus: Vec<PathComponent>,
    /// Path of the node currently being parsed.
    ptr: Vec<PathComponent>,
    accumulated: Value,
    offsets: Option<OffsetIndex>,

    in_focus: bool,
    started: bool,
    /// Between an object key's start and end events; key text must not be
    /// written into the accumulated value.
    in_key: bool,
    pending_key: Option<String>,
    finished: bool,

    /// Mutation counter, compared against `emitted` to coalesce snapshots.
    writes: u64,
    emitted: u64,
    flush_pending: bool,
}

impl FocusAccumulator {
    /// Creates an accumulator for the subtree at `focus`. The empty path
    /// focuses the whole document. With `with_offsets`, source spans are
    /// recorded for every node reconstructed under the focus.
    #[must_use]
    pub fn new(focus: Vec<PathComponent>, with_offsets: bool) -> Self {
        Self {
            focus,
            ptr: Vec::new(),
            accumulated: Value::Null,
            offsets: with_offsets.then(OffsetIndex::new),
            in_focus: false,
            started: false,
            in_key: false,
            pending_key: None,
            finished: false,
            writes: 0,
            emitted: 0,
            flush_pending: false,
        }
    }

    /// The value accumulated so far.
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.accumulated
    }

    /// Consumes the accumulator, returning the value and the offset index
    /// (if offset recording was enabled).
    #[must_use]
    pub fn into_parts(self) -> (Value, Option<OffsetIndex>) {
        (self.accumulated, self.offsets)
    }

    /// The recorded offset index, when enabled.
    #[must_use]
    pub fn offsets(&self) -> Option<&OffsetIndex> {
        self.offsets.as_ref()
    }

    /// Looks up the source span of the node at `path` (an absolute path,
    /// like the focus). `None` when offsets are disabled or unresolved.
    #[must_use]
    pub fn query(&self, path: &[PathComponent]) -> Option<OffsetRecord> {
        self.offsets.as_ref()?.query(path)
    }

    /// [`query`](Self::query) by dotted path string.
    #[must_use]
    pub fn query_path(&self, path: &str) -> Option<OffsetRecord> {
        self.offsets.as_ref()?.query_path(path)
    }

    /// Requests a snapshot: if the accumulated value changed since the last
    /// snapshot, returns it. Call this on whatever schedule suits the
    /// consumer; intermediate mutations are coalesced.
    pub fn flush(&mut self) -> Option<AccumulatorEvent> {
        if !self.flush_pending {
            return None;
        }
        self.flush_pending = false;
        if self.writes == self.emitted {
            return None;
        }
        self.emitted = self.writes;
        Some(AccumulatorEvent::Snapshot(self.accumulated.clone()))
    }

    /// Feeds one parser event, returning any notifications it triggered.
    pub fn feed(&mut self, event: &ParserEvent) -> Vec<AccumulatorEvent> {
        let mut out = Vec::new();
        if !self.started {
            self.started = true;
            // An empty focus is in focus before the first event.
            self.refresh_focus(&mut out);
        }
        match event {
            ParserEvent::NodeStart {
                kind,
                offset,
                byte_offset,
            } => self.node_start(*kind, *offset, *byte_offset, &mut out),
            ParserEvent::NodeEnd {
                kind,
                value,
                offset,
                byte_offset,
            } => self.node_end(*kind, value.as_ref(), *offset, *byte_offset, &mut out),
            ParserEvent::TextChunk { fragment, .. } => {
                if self.writable() {
                    self.append_string(fragment);
                }
            }
            // Redundant with the value carried by the string's `NodeEnd`.
            ParserEvent::Text { .. } => {}
            ParserEvent::Raw { text, .. } => {
                out.push(AccumulatorEvent::Raw(text.clone()));
            }
            ParserEvent::End { .. } => {
                if !self.finished {
                    self.finished = true;
                    out.push(AccumulatorEvent::Final(self.accumulated.clone()));
                }
            }
        }
        out
    }

    fn node_start(
        &mut self,
        kind: NodeKind,
        offset: usize,
        byte_offset: usize,
        out: &mut Vec<AccumulatorEvent>,
    ) {
        match kind {
            NodeKind::ObjectEntry => {}
            NodeKind::ObjectKey => self.in_key = true,
            NodeKind::ObjectValue => {
                let key = self.pending_key.take().unwrap_or_default();
                self.ptr.push(PathComponent::Key(key));
                self.refresh_focus(out);
            }
            NodeKind::ArrayEntry(index) => {
                self.ptr.push(PathComponent::Index(index));
                self.refresh_focus(out);
            }
            NodeKind::Object => {
                if self.writable() {
                    self.record_start(offset, byte_offset);
                    self.write(Value::Object(Map::new()));
                }
            }
            NodeKind::Array => {
                if self.writable() {
                    self.record_start(offset, byte_offset);
                    self.write(Value::Array(Vec::new()));
                }
            }
            NodeKind::Text => {
                if self.writable() {
                    self.record_start(offset, byte_offset);
                    // Placeholder for incoming fragments.
                    self.write(Value::String(String::new()));
                }
            }
            NodeKind::Number | NodeKind::True | NodeKind::False | NodeKind::Null => {
                if self.writable() {
                    self.record_start(offset, byte_offset);
                }
            }
        }
    }

    fn node_end(
        &mut self,
        kind: NodeKind,
        value: Option<&Value>,
        offset: usize,
        byte_offset: usize,
        out: &mut Vec<AccumulatorEvent>,
    ) {
        match kind {
            NodeKind::ObjectEntry => {}
            NodeKind::ObjectKey => {
                self.in_key = false;
                self.pending_key = match value {
                    Some(Value::String(s)) => Some(s.clone()),
                    _ => None,
                };
            }
            NodeKind::ObjectValue | NodeKind::ArrayEntry(_) => {
                self.ptr.pop();
                self.refresh_focus(out);
            }
            NodeKind::Object | NodeKind::Array => {
                if self.writable() {
                    // Soft: an end synthesized while closing outer structure
                    // must not displace the real last character.
                    self.record_end(offset, byte_offset, true);
                }
            }
            NodeKind::Text | NodeKind::Number | NodeKind::True | NodeKind::False
            | NodeKind::Null => {
                if self.writable() {
                    if let Some(v) = value {
                        self.write(v.clone());
                    }
                    self.record_end(offset, byte_offset, false);
                }
            }
        }
    }

    /// Whether writes apply at the current position.
    fn writable(&self) -> bool {
        self.in_focus && !self.in_key
    }

    fn refresh_focus(&mut self, out: &mut Vec<AccumulatorEvent>) {
        let now =
            self.ptr.len() >= self.focus.len() && self.ptr[..self.focus.len()] == self.focus[..];
        if now && !self.in_focus {
            self.in_focus = true;
            out.push(AccumulatorEvent::Focus);
        } else if !now && self.in_focus {
            self.in_focus = false;
            out.push(AccumulatorEvent::Blur);
        }
    }

    /// Writes `value` at the current position relative to the focus root.
    fn write(&mut self, value: Value) {
        let rel = &self.ptr[self.focus.len()..];
        insert_at_path(&mut self.accumulated, rel, value);
        self.writes += 1;
        self.flush_pending = true;
    }

    fn append_string(&mut self, fragment: &str) {
        let rel = &self.ptr[self.focus.len()..];
        append_string_at_path(&mut self.accumulated, rel, fragment);
        self.writes += 1;
        self.flush_pending = true;
    }

    fn record_start(&mut self, offset: usize, byte_offset: usize) {
        if let Some(index) = self.offsets.as_mut() {
            index.record_start(&self.ptr, offset, byte_offset);
        }
    }

    fn record_end(&mut self, offset: usize, byte_offset: usize, soft: bool) {
        if let Some(index) = self.offsets.as_mut() {
            index.record_end(&self.ptr, offset, byte_offset, soft);
        }
    }
}

/// Accumulates a complete event stream into the value under `focus`.
pub fn accumulate<'a, I>(events: I, focus: &[PathComponent], with_offsets: bool) -> Value
where
    I: IntoIterator<Item = &'a ParserEvent>,
{
    let mut acc = FocusAccumulator::new(focus.to_vec(), with_offsets);
    for event in events {
        acc.feed(event);
    }
    let (value, _) = acc.into_parts();
    value
}

/// Inserts `val` at `path`, growing intermediate containers on demand and
/// resizing arrays when necessary.
fn insert_at_path(target: &mut Value, path: &[PathComponent], val: Value) {
    if path.is_empty() {
        *target = val;
        return;
    }

    let mut current = target;
    for comp in &path[..path.len() - 1] {
        current = descend(current, comp);
    }

    match &path[path.len() - 1] {
        PathComponent::Key(k) => {
            if !matches!(current, Value::Object(_)) {
                *current = Value::Object(Map::new());
            }
            if let Value::Object(map) = current {
                map.insert(k.clone(), val);
            }
        }
        PathComponent::Index(i) => {
            if !matches!(current, Value::Array(_)) {
                *current = Value::Array(Vec::new());
            }
            if let Value::Array(vec) = current {
                if *i >= vec.len() {
                    vec.resize(*i + 1, Value::Null);
                }
                vec[*i] = val;
            }
        }
    }
}

/// Appends `fragment` to the string at `path`, creating it if absent.
fn append_string_at_path(target: &mut Value, path: &[PathComponent], fragment: &str) {
    let mut current = target;
    for comp in path {
        current = descend(current, comp);
    }
    if let Value::String(s) = current {
        s.push_str(fragment);
    } else {
        *current = Value::String(String::from(fragment));
    }
}

/// Steps one component deeper, coercing the slot to the right container
/// kind and growing arrays as needed.
fn descend<'a>(current: &'a mut Value, comp: &PathComponent) -> &'a mut Value {
    match comp {
        PathComponent::Key(k) => {
            if !matches!(current, Value::Object(_)) {
                *current = Value::Object(Map::new());
            }
            match current {
                Value::Object(map) => map.entry(k.clone()).or_insert(Value::Null),
                other => other,
            }
        }
        PathComponent::Index(i) => {
            if !matches!(current, Value::Array(_)) {
                *current = Value::Array(Vec::new());
            }
            match current {
                Value::Array(vec) => {
                    if *i >= vec.len() {
                        vec.resize(*i + 1, Value::Null);
                    }
                    &mut vec[*i]
                }
                other => other,
            }
        }
    }
}
