//! Source-span index over the accumulated value.
//!
//! While the accumulator is in focus it records, for every value node it
//! reconstructs, where that node's text lives in the original input. Spans
//! use both character offsets and byte offsets; the byte offsets slice the
//! raw input verbatim.
use crate::{path::PathComponent, trie::PathTrie};

/// The recorded source span of one value node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetRecord {
    /// Character offset of the node's first character.
    pub start_offset: usize,
    /// Character offset one past the node's last character.
    pub end_offset: usize,
    /// Byte offset of the node's first byte.
    pub start_byte_offset: usize,
    /// Byte offset one past the node's last byte.
    pub end_byte_offset: usize,
}

impl OffsetRecord {
    /// Slices the original input to this node's verbatim text.
    ///
    /// Returns `None` if the span falls outside `source` or does not lie on
    /// character boundaries (i.e. `source` is not the input that was parsed).
    #[must_use]
    pub fn slice<'a>(&self, source: &'a str) -> Option<&'a str> {
        source.get(self.start_byte_offset..self.end_byte_offset)
    }

    /// Byte-slice form of [`slice`](Self::slice) for non-UTF-8 callers.
    #[must_use]
    pub fn byte_slice<'a>(&self, source: &'a [u8]) -> Option<&'a [u8]> {
        source.get(self.start_byte_offset..self.end_byte_offset)
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct SpanRecord {
    start: Option<(usize, usize)>,
    end: Option<(usize, usize)>,
}

/// Index of source spans keyed by path.
#[derive(Debug, Clone, Default)]
pub struct OffsetIndex {
    trie: PathTrie<SpanRecord>,
}

impl OffsetIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a node's start position. First write wins: replaying a start
    /// for an already-started node leaves the span untouched.
    pub(crate) fn record_start(&mut self, path: &[PathComponent], offset: usize, byte: usize) {
        let record = self
            .trie
            .insert(path)
            .value_mut()
            .get_or_insert_with(SpanRecord::default);
        if record.start.is_none() {
            record.start = Some((offset, byte));
        }
    }

    /// Records a node's end position.
    ///
    /// `soft` writes keep an existing end: container closers synthesized
    /// while unwinding outer structure must not overwrite the position of a
    /// value's last contributing character.
    pub(crate) fn record_end(
        &mut self,
        path: &[PathComponent],
        offset: usize,
        byte: usize,
        soft: bool,
    ) {
        let record = self
            .trie
            .insert(path)
            .value_mut()
            .get_or_insert_with(SpanRecord::default);
        if !soft || record.end.is_none() {
            record.end = Some((offset, byte));
        }
    }

    /// Looks up the fully resolved span for `path`.
    ///
    /// Returns `None` for paths that were never recorded and for nodes whose
    /// span is still partial (started but not yet ended).
    #[must_use]
    pub fn query(&self, path: &[PathComponent]) -> Option<OffsetRecord> {
        let (node, rest) = self.trie.seek(path);
        if !rest.is_empty() {
            return None;
        }
        let record = node.value()?;
        let (start_offset, start_byte_offset) = record.start?;
        let (end_offset, end_byte_offset) = record.end?;
        Some(OffsetRecord {
            start_offset,
            end_offset,
            start_byte_offset,
            end_byte_offset,
        })
    }

    /// Looks up a span by dotted path string, e.g. `"a.b.0"`.
    #[must_use]
    pub fn query_path(&self, path: &str) -> Option<OffsetRecord> {
        self.query(&PathComponent::parse_path(path))
    }
}
