//! Accumulates `\uXXXX` escape sequences, including surrogate pairs.
use core::char;

/// Outcome of feeding one character of a unicode escape.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum EscapeStep {
    /// The character was consumed; the escape needs more.
    NeedMore,
    /// The character completed the escape, which decoded to this character.
    Complete(char),
    /// The character cannot appear at this position of the escape.
    Reject,
    /// An orphaned surrogate with value `code`. When `consumed`, the
    /// offending character was a digit of the escape itself; otherwise the
    /// caller must reprocess it. `salvage` carries a scalar that decoded
    /// alongside the orphan, if any.
    Unpaired {
        code: u32,
        consumed: bool,
        salvage: Option<char>,
    },
}

/// What a held high surrogate is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Pending {
    #[default]
    None,
    Backslash(u32),
    U(u32),
    Low(u32),
}

/// Buffer for one in-flight unicode escape.
///
/// Characters may arrive in different input chunks; the buffer keeps its
/// state across [`feed`](UnicodeEscapeBuffer::feed) calls until the escape
/// resolves. A high-surrogate escape is held until the following `\uXXXX`
/// escape supplies its low half, and the pair decodes to a single astral
/// character.
#[derive(Debug, Default)]
pub(crate) struct UnicodeEscapeBuffer {
    digits: [u8; 4],
    len: u8,
    pending: Pending,
}

impl UnicodeEscapeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.len = 0;
        self.pending = Pending::None;
    }

    /// Feeds one character of the escape.
    pub fn feed(&mut self, c: char) -> EscapeStep {
        match self.pending {
            Pending::Backslash(hi) => {
                return if c == '\\' {
                    self.pending = Pending::U(hi);
                    EscapeStep::NeedMore
                } else {
                    self.pending = Pending::None;
                    EscapeStep::Unpaired {
                        code: hi,
                        consumed: false,
                        salvage: None,
                    }
                };
            }
            Pending::U(hi) => {
                return if c == 'u' {
                    self.pending = Pending::Low(hi);
                    EscapeStep::NeedMore
                } else {
                    self.pending = Pending::None;
                    EscapeStep::Unpaired {
                        code: hi,
                        consumed: false,
                        salvage: None,
                    }
                };
            }
            Pending::None | Pending::Low(_) => {}
        }

        if !c.is_ascii_hexdigit() {
            return EscapeStep::Reject;
        }
        self.digits[usize::from(self.len)] = c as u8;
        self.len += 1;
        if self.len < 4 {
            return EscapeStep::NeedMore;
        }
        self.len = 0;
        let code = decode_hex(&self.digits);

        if let Pending::Low(hi) = core::mem::take(&mut self.pending) {
            return if (0xDC00..=0xDFFF).contains(&code) {
                let astral = 0x10000 + ((hi - 0xD800) << 10) + (code - 0xDC00);
                match char::from_u32(astral) {
                    Some(ch) => EscapeStep::Complete(ch),
                    None => EscapeStep::Unpaired {
                        code: hi,
                        consumed: true,
                        salvage: None,
                    },
                }
            } else {
                // The second escape was not a low half; keep its own value
                // when it is a scalar.
                EscapeStep::Unpaired {
                    code: hi,
                    consumed: true,
                    salvage: char::from_u32(code),
                }
            };
        }

        if (0xD800..=0xDBFF).contains(&code) {
            self.pending = Pending::Backslash(code);
            return EscapeStep::NeedMore;
        }
        match char::from_u32(code) {
            Some(ch) => EscapeStep::Complete(ch),
            // A lone low half.
            None => EscapeStep::Unpaired {
                code,
                consumed: true,
                salvage: None,
            },
        }
    }
}

fn decode_hex(digits: &[u8; 4]) -> u32 {
    digits.iter().fold(0, |acc, &d| {
        acc << 4 | u32::from((d as char).to_digit(16).unwrap_or(0))
    })
}
