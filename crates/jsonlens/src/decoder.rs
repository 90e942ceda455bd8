//! Incremental UTF-8 decoding with offset bookkeeping.
//!
//! Input arrives as byte chunks that may split multi-byte sequences at
//! arbitrary positions. The decoder buffers undecoded bytes, yields one
//! scalar value at a time, and tags each with the character offset and byte
//! offset of its first byte. A trailing incomplete sequence is held until
//! more bytes arrive or the input is finished, at which point it decodes to
//! U+FFFD like any other invalid sequence.
use alloc::vec::Vec;

use bstr::decode_utf8;

/// A decoded scalar value together with its position in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DecodedChar {
    pub ch: char,
    /// Character offset (count of scalars yielded before this one).
    pub offset: usize,
    /// Byte offset of the first byte of this scalar.
    pub byte_offset: usize,
}

#[derive(Debug, Default)]
pub(crate) struct Utf8Decoder {
    buf: Vec<u8>,
    pos: usize,
    offset: usize,
    byte_offset: usize,
    end_of_input: bool,
}

// Consumed prefix beyond which the buffer is compacted on the next push.
const COMPACT_THRESHOLD: usize = 4096;

impl Utf8Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bytes: &[u8]) {
        if self.pos == self.buf.len() {
            self.buf.clear();
            self.pos = 0;
        } else if self.pos > COMPACT_THRESHOLD {
            self.buf.drain(..self.pos);
            self.pos = 0;
        }
        self.buf.extend_from_slice(bytes);
    }

    /// Marks the end of input, releasing any held partial sequence.
    pub fn finish(&mut self) {
        self.end_of_input = true;
    }

    /// Position of the next scalar to be yielded, `(offset, byte_offset)`.
    pub fn position(&self) -> (usize, usize) {
        (self.offset, self.byte_offset)
    }

    pub fn next_char(&mut self) -> Option<DecodedChar> {
        let rest = &self.buf[self.pos..];
        if rest.is_empty() {
            return None;
        }
        let (decoded, size) = decode_utf8(rest);
        let (ch, consumed) = match decoded {
            Some(ch) => (ch, size),
            // A valid prefix that reaches the end of the buffer may still be
            // completed by a later chunk.
            None if size == rest.len() && !self.end_of_input => return None,
            None => ('\u{FFFD}', size.max(1)),
        };
        let out = DecodedChar {
            ch,
            offset: self.offset,
            byte_offset: self.byte_offset,
        };
        self.pos += consumed;
        self.byte_offset += consumed;
        self.offset += 1;
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::Utf8Decoder;

    fn drain(d: &mut Utf8Decoder) -> Vec<char> {
        core::iter::from_fn(|| d.next_char()).map(|c| c.ch).collect()
    }

    #[test]
    fn ascii_offsets() {
        let mut d = Utf8Decoder::new();
        d.push(b"ab");
        let a = d.next_char().unwrap();
        assert_eq!((a.ch, a.offset, a.byte_offset), ('a', 0, 0));
        let b = d.next_char().unwrap();
        assert_eq!((b.ch, b.offset, b.byte_offset), ('b', 1, 1));
        assert!(d.next_char().is_none());
    }

    #[test]
    fn multibyte_split_across_pushes() {
        let snowman = "\u{2603}".as_bytes(); // e2 98 83
        let mut d = Utf8Decoder::new();
        d.push(&snowman[..1]);
        assert!(d.next_char().is_none());
        d.push(&snowman[1..2]);
        assert!(d.next_char().is_none());
        d.push(&snowman[2..]);
        let c = d.next_char().unwrap();
        assert_eq!((c.ch, c.offset, c.byte_offset), ('\u{2603}', 0, 0));
        assert_eq!(d.position(), (1, 3));
    }

    #[test]
    fn invalid_byte_becomes_replacement() {
        let mut d = Utf8Decoder::new();
        d.push(&[0xFF, b'a']);
        assert_eq!(drain(&mut d), alloc::vec!['\u{FFFD}', 'a']);
    }

    #[test]
    fn truncated_sequence_released_at_finish() {
        let mut d = Utf8Decoder::new();
        d.push(&[0xE2, 0x98]);
        assert!(d.next_char().is_none());
        d.finish();
        let c = d.next_char().unwrap();
        assert_eq!(c.ch, '\u{FFFD}');
        assert_eq!(d.position(), (1, 2));
    }

    #[test]
    fn byte_offsets_count_encoded_len() {
        let mut d = Utf8Decoder::new();
        d.push("h\u{e9}y".as_bytes()); // e9 encodes as two bytes
        let chars: Vec<_> = core::iter::from_fn(|| d.next_char()).collect();
        assert_eq!(
            chars
                .iter()
                .map(|c| (c.ch, c.offset, c.byte_offset))
                .collect::<Vec<_>>(),
            alloc::vec![('h', 0, 0), ('\u{e9}', 1, 1), ('y', 2, 3)]
        );
    }
}
