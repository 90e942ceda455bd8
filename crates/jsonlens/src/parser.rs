//! The streaming parser: an explicit stack of grammar frames driven one
//! character at a time.
//!
//! Each grammar state has one handler. A handler inspects the current
//! character and answers with a [`Step`]: consume it, push a child frame
//! (with or without consuming), or pop back to the parent (with or without
//! consuming). Unconsumed characters are re-dispatched to the new top of the
//! stack, so a `}` that terminates a number is seen again by the object
//! frame that must close on it. A bounded trampoline turns a handler that
//! makes no progress into [`ParseError::FlawedStateHandler`].
//!
//! # Examples
//!
//! ```
//! use jsonlens::{ParserEvent, ParserOptions, StreamingParser};
//!
//! let mut parser = StreamingParser::new(ParserOptions::default());
//! parser.feed("[1,");
//! let first: Vec<_> = parser.by_ref().collect::<Result<_, _>>().unwrap();
//! assert!(!first.is_empty());
//!
//! parser.feed("2]");
//! let rest: Vec<_> = parser.finish().collect::<Result<_, _>>().unwrap();
//! assert!(matches!(rest.last(), Some(ParserEvent::End { .. })));
//! ```
use alloc::{
    collections::VecDeque,
    string::{String, ToString},
    vec::Vec,
};

use crate::{
    decoder::{DecodedChar, Utf8Decoder},
    error::ParseError,
    escape::{EscapeStep, UnicodeEscapeBuffer},
    event::{NodeKind, ParserEvent},
    literal::{self, LiteralKind},
    options::{Contaminated, ParserOptions},
    value::Value,
};

/// Progress of an object frame through `{ key : value , ... }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ObjectPhase {
    /// Expecting the opening brace.
    Open,
    /// A key frame is (or was just) on top of this one.
    Key,
    /// Key delivered; expecting the colon.
    Colon,
    /// A value frame is (or was just) on top of this one.
    Value,
    /// Entry complete; expecting a comma or the closing brace.
    Comma,
}

/// Progress of an array frame through `[ value , ... ]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArrayPhase {
    /// Expecting the opening bracket.
    Open,
    /// Just opened; expecting the first element or `]`.
    First,
    /// An element frame is (or was just) on top of this one.
    Value,
    /// Element complete; expecting a comma or `]`.
    Comma,
}

/// One grammar nonterminal currently being recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GrammarState {
    Value,
    Object { phase: ObjectPhase },
    ObjectKey { started: bool },
    Array { phase: ArrayPhase, next_index: usize },
    String,
    Number,
    Literal(LiteralKind),
    EscapedChar,
    EscapedUnicodeChar,
}

/// One entry of the parse stack.
#[derive(Debug)]
struct ParseFrame {
    state: GrammarState,
    /// Raw text accumulated by token states (string content, number text,
    /// matched literal prefix).
    chunk: String,
    /// The completed value, filled in just before the frame pops.
    parsed: Option<Value>,
}

impl ParseFrame {
    fn new(state: GrammarState) -> Self {
        Self {
            state,
            chunk: String::new(),
            parsed: None,
        }
    }
}

/// A handler's verdict on the current character.
#[derive(Debug)]
enum Step {
    /// Consume the character and stay in this state.
    Forward,
    /// Push a child frame; the child sees the same character.
    Push(GrammarState),
    /// Consume the character, then push a child frame.
    PushAdvance(GrammarState),
    /// Pop this frame; the parent sees the same character.
    Pop,
    /// Consume the character, then pop this frame.
    PopAdvance,
}

/// Extra re-dispatches allowed beyond one per stack frame. A single
/// character can legitimately close a token, deliver it through a value
/// frame, and settle an entry in the container above.
const TRAMPOLINE_SLACK: usize = 8;

/// An incremental JSON parser.
///
/// Feed input with [`feed`](Self::feed) or [`feed_bytes`](Self::feed_bytes)
/// and drain events by iterating; `next` returns `None` once the available
/// input is exhausted, and iteration resumes after the next feed. Call
/// [`finish`](Self::finish) to signal end of input and drain the remaining
/// events.
#[derive(Debug)]
pub struct StreamingParser {
    decoder: Utf8Decoder,
    options: ParserOptions,
    stack: Vec<ParseFrame>,
    events: VecDeque<ParserEvent>,
    /// Result handed up by the most recent pop, consumed by the parent
    /// handler on its next dispatch.
    returned: Option<Option<Value>>,
    unicode_escape: UnicodeEscapeBuffer,

    // In-progress string bookkeeping. Strings never nest (escape frames
    // contain no strings), so one set of fields suffices.
    text_start: (usize, usize),
    fragment_lo: usize,
    fragment_from: (usize, usize),

    // Raw passthrough characters coalesce until a structured event or the
    // end of available input flushes them.
    raw: String,
    raw_from: (usize, usize),

    pending_error: Option<ParseError>,
    recorded_error: Option<ParseError>,
    halted: bool,
    end_of_input: bool,
    finalized: bool,
    /// Whether any structured token has been recognized.
    seen_token: bool,
    /// Whether the root value has completed.
    done: bool,
}

impl StreamingParser {
    /// Creates a parser with the given options.
    #[must_use]
    pub fn new(options: ParserOptions) -> Self {
        let mut stack = Vec::new();
        stack.push(ParseFrame::new(GrammarState::Value));
        Self {
            decoder: Utf8Decoder::new(),
            options,
            stack,
            events: VecDeque::new(),
            returned: None,
            unicode_escape: UnicodeEscapeBuffer::new(),
            text_start: (0, 0),
            fragment_lo: 0,
            fragment_from: (0, 0),
            raw: String::new(),
            raw_from: (0, 0),
            pending_error: None,
            recorded_error: None,
            halted: false,
            end_of_input: false,
            finalized: false,
            seen_token: false,
            done: false,
        }
    }

    /// Appends a chunk of input text.
    pub fn feed(&mut self, text: &str) {
        self.decoder.push(text.as_bytes());
    }

    /// Appends a chunk of input bytes. Chunks may split multi-byte UTF-8
    /// sequences at any position.
    pub fn feed_bytes(&mut self, bytes: &[u8]) {
        self.decoder.push(bytes);
    }

    /// Signals end of input. The returned parser yields the remaining
    /// events, closing any still-open nodes first.
    #[must_use]
    pub fn finish(mut self) -> ClosedStreamingParser {
        self.end_of_input = true;
        self.decoder.finish();
        ClosedStreamingParser { parser: self }
    }

    /// The first error encountered, when `record_errors` is set.
    #[must_use]
    pub fn recorded_error(&self) -> Option<&ParseError> {
        self.recorded_error.as_ref()
    }

    fn next_event(&mut self) -> Option<Result<ParserEvent, ParseError>> {
        loop {
            if let Some(event) = self.events.pop_front() {
                return Some(Ok(event));
            }
            if let Some(err) = self.pending_error.take() {
                self.halted = true;
                return Some(Err(err));
            }
            if self.halted {
                return None;
            }
            match self.decoder.next_char() {
                Some(dc) => {
                    if let Err(err) = self.step_char(dc) {
                        let fatal = matches!(err, ParseError::FlawedStateHandler);
                        if self.options.record_errors && !fatal {
                            self.record(err);
                            // Best effort: pass the offending character
                            // through and keep going.
                            self.raw_char(dc);
                        } else {
                            self.pending_error = Some(err);
                        }
                    }
                }
                None if self.end_of_input => {
                    if self.finalized {
                        self.flush_raw();
                        if self.events.is_empty() {
                            return None;
                        }
                    } else {
                        self.finalize();
                    }
                }
                None => {
                    // Input exhausted but not finished: surface what we have.
                    self.flush_fragment();
                    self.flush_raw();
                    if self.events.is_empty() {
                        return None;
                    }
                }
            }
        }
    }

    /// Runs the trampoline for one character.
    fn step_char(&mut self, dc: DecodedChar) -> Result<(), ParseError> {
        let mut budget = self.stack.len() + TRAMPOLINE_SLACK;
        loop {
            match self.dispatch(dc)? {
                Step::Forward => return Ok(()),
                Step::Push(state) => self.stack.push(ParseFrame::new(state)),
                Step::PushAdvance(state) => {
                    self.stack.push(ParseFrame::new(state));
                    return Ok(());
                }
                Step::Pop => self.pop_frame()?,
                Step::PopAdvance => {
                    self.pop_frame()?;
                    return Ok(());
                }
            }
            if budget == 0 {
                return Err(ParseError::FlawedStateHandler);
            }
            budget -= 1;
        }
    }

    #[inline(always)]
    fn dispatch(&mut self, dc: DecodedChar) -> Result<Step, ParseError> {
        let state = match self.stack.last() {
            Some(frame) => frame.state,
            None => return Err(ParseError::FlawedStateHandler),
        };
        match state {
            GrammarState::Value => self.on_value(dc),
            GrammarState::Object { phase } => self.on_object(dc, phase),
            GrammarState::ObjectKey { .. } => self.on_object_key(dc),
            GrammarState::Array { phase, next_index } => self.on_array(dc, phase, next_index),
            GrammarState::String => self.on_string(dc),
            GrammarState::Number => self.on_number(dc),
            GrammarState::Literal(kind) => self.on_literal(dc, kind),
            GrammarState::EscapedChar => self.on_escaped_char(dc),
            GrammarState::EscapedUnicodeChar => self.on_escaped_unicode(dc),
        }
    }

    /// Pops the top frame, handing its result to the frame below. A pop into
    /// the root frame completes the document.
    fn pop_frame(&mut self) -> Result<(), ParseError> {
        let child = self.stack.pop().ok_or(ParseError::FlawedStateHandler)?;
        if self.stack.is_empty() {
            // The root frame never pops.
            return Err(ParseError::FlawedStateHandler);
        }
        if self.stack.len() == 1 {
            if let Some(root) = self.stack.last_mut() {
                root.parsed = child.parsed;
            }
            self.done = true;
        } else {
            self.returned = Some(child.parsed);
        }
        Ok(())
    }

    fn emit(&mut self, event: ParserEvent) {
        self.flush_raw();
        if !matches!(event, ParserEvent::Raw { .. } | ParserEvent::End { .. }) {
            self.seen_token = true;
        }
        self.events.push_back(event);
    }

    fn record(&mut self, err: ParseError) {
        if self.recorded_error.is_none() {
            self.recorded_error = Some(err);
        }
    }

    fn raw_char(&mut self, dc: DecodedChar) {
        if self.raw.is_empty() {
            self.raw_from = (dc.offset, dc.byte_offset);
        }
        self.raw.push(dc.ch);
    }

    fn flush_raw(&mut self) {
        if self.raw.is_empty() {
            return;
        }
        let text = core::mem::take(&mut self.raw);
        self.events.push_back(ParserEvent::Raw {
            text,
            offset: self.raw_from.0,
            byte_offset: self.raw_from.1,
        });
    }

    fn set_state(&mut self, state: GrammarState) {
        if let Some(frame) = self.stack.last_mut() {
            frame.state = state;
        }
    }

    fn set_parsed(&mut self, value: Option<Value>) {
        if let Some(frame) = self.stack.last_mut() {
            frame.parsed = value;
        }
    }

    /// Starts a string token: the reported position is the first content
    /// character, one past the opening quote.
    fn begin_text(&mut self, dc: DecodedChar) {
        let start = (dc.offset + 1, dc.byte_offset + 1);
        self.emit(ParserEvent::NodeStart {
            kind: NodeKind::Text,
            offset: start.0,
            byte_offset: start.1,
        });
        self.text_start = start;
        self.fragment_lo = 0;
        self.fragment_from = start;
    }

    /// Emits the not-yet-surfaced tail of an in-progress string as a
    /// `TextChunk`. Called when available input runs out mid-string.
    fn flush_fragment(&mut self) {
        let Some(pos) = self
            .stack
            .iter()
            .rposition(|f| f.state == GrammarState::String)
        else {
            return;
        };
        if self.stack[pos].chunk.len() <= self.fragment_lo {
            return;
        }
        let fragment = self.stack[pos].chunk[self.fragment_lo..].to_string();
        self.fragment_lo = self.stack[pos].chunk.len();
        let (offset, byte_offset) = self.fragment_from;
        self.emit(ParserEvent::TextChunk {
            fragment,
            offset,
            byte_offset,
        });
        self.fragment_from = self.decoder.position();
    }

    #[inline(always)]
    fn on_value(&mut self, dc: DecodedChar) -> Result<Step, ParseError> {
        if let Some(ret) = self.returned.take() {
            // The child this frame pushed has completed.
            self.set_parsed(ret);
            return Ok(Step::Pop);
        }

        let c = dc.ch;
        let at_root = self.stack.len() == 1;

        if at_root && self.done {
            if is_ws(c) {
                return Ok(Step::Forward);
            }
            if self.options.contaminated != Contaminated::No || self.recorded_error.is_some() {
                self.raw_char(dc);
                return Ok(Step::Forward);
            }
            return Err(ParseError::UnexpectedToken {
                ch: c,
                offset: dc.offset,
            });
        }

        // Contaminated hunting: before the embedded value begins, only its
        // opening character is structural; everything else passes through.
        if at_root && !is_ws(c) {
            let opener = match self.options.contaminated {
                Contaminated::No | Contaminated::Any => true,
                Contaminated::Object => c == '{',
                Contaminated::Array => c == '[',
            };
            if !opener {
                self.raw_char(dc);
                return Ok(Step::Forward);
            }
        }

        match c {
            c if is_ws(c) => Ok(Step::Forward),
            '"' => {
                self.begin_text(dc);
                Ok(Step::PushAdvance(GrammarState::String))
            }
            '{' => Ok(Step::Push(GrammarState::Object {
                phase: ObjectPhase::Open,
            })),
            '[' => Ok(Step::Push(GrammarState::Array {
                phase: ArrayPhase::Open,
                next_index: 0,
            })),
            't' | 'T' => Ok(Step::Push(GrammarState::Literal(LiteralKind::True))),
            'f' | 'F' => Ok(Step::Push(GrammarState::Literal(LiteralKind::False))),
            'n' | 'N' => Ok(Step::Push(GrammarState::Literal(LiteralKind::Null))),
            '-' | '0'..='9' => Ok(Step::Push(GrammarState::Number)),
            _ => {
                if at_root && self.options.contaminated != Contaminated::No {
                    self.raw_char(dc);
                    Ok(Step::Forward)
                } else {
                    Err(ParseError::UnexpectedToken {
                        ch: c,
                        offset: dc.offset,
                    })
                }
            }
        }
    }

    #[inline(always)]
    fn on_object(&mut self, dc: DecodedChar, phase: ObjectPhase) -> Result<Step, ParseError> {
        let mut phase = phase;
        if let Some(ret) = self.returned.take() {
            match phase {
                ObjectPhase::Key => {
                    // `None` means the key frame saw `}` instead of a key.
                    phase = if ret.is_some() {
                        ObjectPhase::Colon
                    } else {
                        ObjectPhase::Comma
                    };
                }
                ObjectPhase::Value => {
                    self.emit(ParserEvent::NodeEnd {
                        kind: NodeKind::ObjectValue,
                        value: None,
                        offset: dc.offset,
                        byte_offset: dc.byte_offset,
                    });
                    self.emit(ParserEvent::NodeEnd {
                        kind: NodeKind::ObjectEntry,
                        value: None,
                        offset: dc.offset,
                        byte_offset: dc.byte_offset,
                    });
                    phase = ObjectPhase::Comma;
                }
                _ => return Err(ParseError::FlawedStateHandler),
            }
            self.set_state(GrammarState::Object { phase });
        }

        let c = dc.ch;
        match (phase, c) {
            (ObjectPhase::Open, '{') => {
                self.emit(ParserEvent::NodeStart {
                    kind: NodeKind::Object,
                    offset: dc.offset,
                    byte_offset: dc.byte_offset,
                });
                self.set_state(GrammarState::Object {
                    phase: ObjectPhase::Key,
                });
                Ok(Step::PushAdvance(GrammarState::ObjectKey {
                    started: false,
                }))
            }
            (_, c) if is_ws(c) => Ok(Step::Forward),
            (ObjectPhase::Colon, ':') => {
                self.emit(ParserEvent::NodeStart {
                    kind: NodeKind::ObjectValue,
                    offset: dc.offset,
                    byte_offset: dc.byte_offset,
                });
                self.set_state(GrammarState::Object {
                    phase: ObjectPhase::Value,
                });
                Ok(Step::PushAdvance(GrammarState::Value))
            }
            (ObjectPhase::Comma, ',') => {
                self.set_state(GrammarState::Object {
                    phase: ObjectPhase::Key,
                });
                Ok(Step::PushAdvance(GrammarState::ObjectKey {
                    started: false,
                }))
            }
            (ObjectPhase::Comma, '}') => {
                self.emit(ParserEvent::NodeEnd {
                    kind: NodeKind::Object,
                    value: None,
                    offset: dc.offset + 1,
                    byte_offset: dc.byte_offset + 1,
                });
                Ok(Step::PopAdvance)
            }
            _ => Err(ParseError::UnexpectedToken {
                ch: c,
                offset: dc.offset,
            }),
        }
    }

    #[inline(always)]
    fn on_object_key(&mut self, dc: DecodedChar) -> Result<Step, ParseError> {
        if let Some(ret) = self.returned.take() {
            // The key string completed.
            self.emit(ParserEvent::NodeEnd {
                kind: NodeKind::ObjectKey,
                value: ret.clone(),
                offset: dc.offset,
                byte_offset: dc.byte_offset,
            });
            self.set_parsed(ret);
            return Ok(Step::Pop);
        }
        let c = dc.ch;
        match c {
            c if is_ws(c) => Ok(Step::Forward),
            '"' => {
                self.emit(ParserEvent::NodeStart {
                    kind: NodeKind::ObjectEntry,
                    offset: dc.offset,
                    byte_offset: dc.byte_offset,
                });
                self.emit(ParserEvent::NodeStart {
                    kind: NodeKind::ObjectKey,
                    offset: dc.offset,
                    byte_offset: dc.byte_offset,
                });
                self.set_state(GrammarState::ObjectKey { started: true });
                self.begin_text(dc);
                Ok(Step::PushAdvance(GrammarState::String))
            }
            // Empty object (or trailing comma): give `}` back to the object.
            '}' => Ok(Step::Pop),
            _ => Err(ParseError::UnexpectedToken {
                ch: c,
                offset: dc.offset,
            }),
        }
    }

    #[inline(always)]
    fn on_array(
        &mut self,
        dc: DecodedChar,
        phase: ArrayPhase,
        next_index: usize,
    ) -> Result<Step, ParseError> {
        let mut phase = phase;
        if self.returned.take().is_some() {
            if phase != ArrayPhase::Value {
                return Err(ParseError::FlawedStateHandler);
            }
            self.emit(ParserEvent::NodeEnd {
                kind: NodeKind::ArrayEntry(next_index),
                value: None,
                offset: dc.offset,
                byte_offset: dc.byte_offset,
            });
            phase = ArrayPhase::Comma;
            self.set_state(GrammarState::Array { phase, next_index });
        }

        let c = dc.ch;
        match (phase, c) {
            (ArrayPhase::Open, '[') => {
                self.emit(ParserEvent::NodeStart {
                    kind: NodeKind::Array,
                    offset: dc.offset,
                    byte_offset: dc.byte_offset,
                });
                self.set_state(GrammarState::Array {
                    phase: ArrayPhase::First,
                    next_index,
                });
                Ok(Step::Forward)
            }
            (_, c) if is_ws(c) => Ok(Step::Forward),
            (ArrayPhase::First | ArrayPhase::Comma, ']') => {
                self.emit(ParserEvent::NodeEnd {
                    kind: NodeKind::Array,
                    value: None,
                    offset: dc.offset + 1,
                    byte_offset: dc.byte_offset + 1,
                });
                Ok(Step::PopAdvance)
            }
            (ArrayPhase::First, _) => {
                self.emit(ParserEvent::NodeStart {
                    kind: NodeKind::ArrayEntry(next_index),
                    offset: dc.offset,
                    byte_offset: dc.byte_offset,
                });
                self.set_state(GrammarState::Array {
                    phase: ArrayPhase::Value,
                    next_index,
                });
                Ok(Step::Push(GrammarState::Value))
            }
            (ArrayPhase::Comma, ',') => {
                let index = next_index + 1;
                self.emit(ParserEvent::NodeStart {
                    kind: NodeKind::ArrayEntry(index),
                    offset: dc.offset,
                    byte_offset: dc.byte_offset,
                });
                self.set_state(GrammarState::Array {
                    phase: ArrayPhase::Value,
                    next_index: index,
                });
                Ok(Step::PushAdvance(GrammarState::Value))
            }
            _ => Err(ParseError::UnexpectedToken {
                ch: c,
                offset: dc.offset,
            }),
        }
    }

    #[inline(always)]
    fn on_string(&mut self, dc: DecodedChar) -> Result<Step, ParseError> {
        if let Some(ret) = self.returned.take() {
            // A decoded escape character arrives as a one-character string.
            if let Some(Value::String(s)) = ret {
                if let Some(frame) = self.stack.last_mut() {
                    frame.chunk.push_str(&s);
                }
            }
        }
        let c = dc.ch;
        match c {
            '\\' => Ok(Step::PushAdvance(GrammarState::EscapedChar)),
            '"' => {
                let chunk = match self.stack.last_mut() {
                    Some(frame) => core::mem::take(&mut frame.chunk),
                    None => return Err(ParseError::FlawedStateHandler),
                };
                self.emit(ParserEvent::Text {
                    value: chunk.clone(),
                    offset: self.text_start.0,
                    byte_offset: self.text_start.1,
                });
                self.emit(ParserEvent::NodeEnd {
                    kind: NodeKind::Text,
                    value: Some(Value::String(chunk.clone())),
                    offset: dc.offset,
                    byte_offset: dc.byte_offset,
                });
                self.set_parsed(Some(Value::String(chunk)));
                Ok(Step::PopAdvance)
            }
            c if (c as u32) < 0x20 && !self.options.allow_control_characters_in_strings => {
                Err(ParseError::UnexpectedToken {
                    ch: c,
                    offset: dc.offset,
                })
            }
            c => {
                if let Some(frame) = self.stack.last_mut() {
                    frame.chunk.push(c);
                }
                Ok(Step::Forward)
            }
        }
    }

    #[inline(always)]
    fn on_escaped_char(&mut self, dc: DecodedChar) -> Result<Step, ParseError> {
        if let Some(ret) = self.returned.take() {
            // The unicode escape below completed; pass its character up.
            self.set_parsed(ret);
            return Ok(Step::Pop);
        }
        let mapped = match dc.ch {
            '"' => '"',
            '\\' => '\\',
            '/' => '/',
            'b' => '\u{0008}',
            'f' => '\u{000C}',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'u' => {
                self.unicode_escape.reset();
                return Ok(Step::PushAdvance(GrammarState::EscapedUnicodeChar));
            }
            c => {
                return Err(ParseError::UnexpectedToken {
                    ch: c,
                    offset: dc.offset,
                });
            }
        };
        self.set_parsed(Some(Value::String(mapped.to_string())));
        Ok(Step::PopAdvance)
    }

    #[inline(always)]
    fn on_escaped_unicode(&mut self, dc: DecodedChar) -> Result<Step, ParseError> {
        match self.unicode_escape.feed(dc.ch) {
            EscapeStep::NeedMore => Ok(Step::Forward),
            EscapeStep::Complete(ch) => {
                self.set_parsed(Some(Value::String(ch.to_string())));
                Ok(Step::PopAdvance)
            }
            EscapeStep::Reject => Err(ParseError::UnexpectedToken {
                ch: dc.ch,
                offset: dc.offset,
            }),
            EscapeStep::Unpaired {
                code,
                consumed,
                salvage,
            } => {
                let err = ParseError::InvalidUnicodeEscape { code };
                if self.options.record_errors {
                    self.record(err);
                    let mut text = String::from('\u{FFFD}');
                    if let Some(ch) = salvage {
                        text.push(ch);
                    }
                    self.set_parsed(Some(Value::String(text)));
                    // An unconsumed character belongs to the enclosing
                    // string and is reprocessed there.
                    if consumed {
                        Ok(Step::PopAdvance)
                    } else {
                        Ok(Step::Pop)
                    }
                } else {
                    Err(err)
                }
            }
        }
    }

    #[inline(always)]
    fn on_number(&mut self, dc: DecodedChar) -> Result<Step, ParseError> {
        enum Verdict {
            Accept,
            Reject,
            Terminate,
        }

        let c = dc.ch;
        let (is_empty, last, has_dot, has_exp, zero_prefix) = match self.stack.last() {
            Some(frame) => {
                let chunk = frame.chunk.as_str();
                (
                    chunk.is_empty(),
                    chunk.chars().last(),
                    chunk.contains('.'),
                    chunk.contains(['e', 'E']),
                    chunk == "0" || chunk == "-0",
                )
            }
            None => return Err(ParseError::FlawedStateHandler),
        };

        if is_empty {
            self.emit(ParserEvent::NodeStart {
                kind: NodeKind::Number,
                offset: dc.offset,
                byte_offset: dc.byte_offset,
            });
        }

        let last_is_digit = matches!(last, Some(d) if d.is_ascii_digit());
        let last_is_exp = matches!(last, Some('e' | 'E'));
        let verdict = match c {
            '0'..='9' => {
                if zero_prefix {
                    Verdict::Reject
                } else {
                    Verdict::Accept
                }
            }
            '-' => {
                if is_empty || last_is_exp {
                    Verdict::Accept
                } else {
                    Verdict::Reject
                }
            }
            '+' => {
                if last_is_exp {
                    Verdict::Accept
                } else {
                    Verdict::Reject
                }
            }
            '.' => {
                if !has_dot && !has_exp && last_is_digit {
                    Verdict::Accept
                } else {
                    Verdict::Reject
                }
            }
            'e' | 'E' => {
                if !has_exp && last_is_digit {
                    Verdict::Accept
                } else {
                    Verdict::Reject
                }
            }
            _ => Verdict::Terminate,
        };

        match verdict {
            Verdict::Accept => {
                if let Some(frame) = self.stack.last_mut() {
                    frame.chunk.push(c);
                }
                Ok(Step::Forward)
            }
            Verdict::Reject => Err(ParseError::UnexpectedToken {
                ch: c,
                offset: dc.offset,
            }),
            Verdict::Terminate => {
                // A number may only end after a digit.
                if !last_is_digit {
                    return Err(ParseError::UnexpectedToken {
                        ch: c,
                        offset: dc.offset,
                    });
                }
                let value = self
                    .stack
                    .last()
                    .and_then(|frame| frame.chunk.parse::<f64>().ok())
                    .map(Value::Number);
                self.emit(ParserEvent::NodeEnd {
                    kind: NodeKind::Number,
                    value: value.clone(),
                    offset: dc.offset,
                    byte_offset: dc.byte_offset,
                });
                self.set_parsed(value);
                // The terminator belongs to the parent.
                Ok(Step::Pop)
            }
        }
    }

    #[inline(always)]
    fn on_literal(&mut self, dc: DecodedChar, kind: LiteralKind) -> Result<Step, ParseError> {
        let c = dc.ch;
        let matched = self.stack.last().map_or(0, |frame| frame.chunk.len());
        if matched == 0 {
            self.emit(ParserEvent::NodeStart {
                kind: kind.node_kind(),
                offset: dc.offset,
                byte_offset: dc.byte_offset,
            });
        }
        match literal::step(kind, matched, c, self.options.allow_loose_literal_casing) {
            literal::Step::NeedMore => {
                if let Some(frame) = self.stack.last_mut() {
                    frame.chunk.push(c);
                }
                Ok(Step::Forward)
            }
            literal::Step::Done(value) => {
                self.emit(ParserEvent::NodeEnd {
                    kind: kind.node_kind(),
                    value: Some(value.clone()),
                    offset: dc.offset + 1,
                    byte_offset: dc.byte_offset + 1,
                });
                self.set_parsed(Some(value));
                Ok(Step::PopAdvance)
            }
            literal::Step::Reject => {
                let err = ParseError::UnexpectedToken {
                    ch: c,
                    offset: dc.offset,
                };
                if self.options.record_errors {
                    // Best effort: close the literal as its intended value
                    // and let the parent see the mismatched character.
                    self.record(err);
                    let value = kind.value();
                    self.emit(ParserEvent::NodeEnd {
                        kind: kind.node_kind(),
                        value: Some(value.clone()),
                        offset: dc.offset,
                        byte_offset: dc.byte_offset,
                    });
                    self.set_parsed(Some(value));
                    Ok(Step::Pop)
                } else {
                    Err(err)
                }
            }
        }
    }

    /// Closes every open node at end of input.
    fn finalize(&mut self) {
        self.finalized = true;
        let (offset, byte_offset) = self.decoder.position();

        // A result popped on the last character may still be undelivered.
        if let Some(ret) = self.returned.take() {
            self.deliver(ret, offset, byte_offset);
        }

        // A bare root number can only terminate at end of input.
        if !self.done && self.stack.len() == 2 {
            let complete = matches!(
                self.stack.last(),
                Some(frame) if frame.state == GrammarState::Number
                    && frame.chunk.chars().last().is_some_and(|d| d.is_ascii_digit())
            );
            if complete {
                let value = self
                    .stack
                    .last()
                    .and_then(|frame| frame.chunk.parse::<f64>().ok())
                    .map(Value::Number);
                self.emit(ParserEvent::NodeEnd {
                    kind: NodeKind::Number,
                    value: value.clone(),
                    offset,
                    byte_offset,
                });
                if let Some(frame) = self.stack.last_mut() {
                    frame.parsed = value;
                }
                if self.pop_frame().is_err() {
                    self.pending_error = Some(ParseError::FlawedStateHandler);
                    return;
                }
            }
        }

        if !self.done {
            let err = ParseError::UnexpectedEnd {
                parsed_any: self.seen_token,
            };
            if self.options.allow_truncated {
                // Expected: close everything with what accumulated.
            } else if self.options.record_errors {
                self.record(err);
            } else {
                self.flush_raw();
                self.pending_error = Some(err);
                return;
            }
            self.unwind(offset, byte_offset);
        }

        self.flush_raw();
        self.emit(ParserEvent::End {
            offset,
            byte_offset,
        });
    }

    /// Pops and closes every frame above the root, innermost first.
    fn unwind(&mut self, offset: usize, byte_offset: usize) {
        while self.stack.len() > 1 {
            let Some(frame) = self.stack.pop() else {
                return;
            };
            let result = self.close_frame(frame, offset, byte_offset);
            self.deliver(result, offset, byte_offset);
        }
    }

    /// Synthesizes the closing events for a frame cut off by end of input
    /// and returns the value it accumulated, if usable.
    fn close_frame(
        &mut self,
        frame: ParseFrame,
        offset: usize,
        byte_offset: usize,
    ) -> Option<Value> {
        match frame.state {
            GrammarState::Value => frame.parsed,
            GrammarState::String => {
                let chunk = frame.chunk;
                if chunk.len() > self.fragment_lo {
                    let (o, b) = self.fragment_from;
                    self.emit(ParserEvent::TextChunk {
                        fragment: chunk[self.fragment_lo..].to_string(),
                        offset: o,
                        byte_offset: b,
                    });
                }
                self.emit(ParserEvent::Text {
                    value: chunk.clone(),
                    offset: self.text_start.0,
                    byte_offset: self.text_start.1,
                });
                self.emit(ParserEvent::NodeEnd {
                    kind: NodeKind::Text,
                    value: Some(Value::String(chunk.clone())),
                    offset,
                    byte_offset,
                });
                Some(Value::String(chunk))
            }
            GrammarState::Number => {
                let mut token = frame.chunk;
                while matches!(token.chars().last(), Some('.' | 'e' | 'E' | '+' | '-')) {
                    token.pop();
                }
                let value = if token.is_empty() {
                    None
                } else {
                    token.parse::<f64>().ok().map(Value::Number)
                };
                self.emit(ParserEvent::NodeEnd {
                    kind: NodeKind::Number,
                    value: value.clone(),
                    offset,
                    byte_offset,
                });
                value
            }
            GrammarState::Literal(kind) => {
                let value = kind.value();
                self.emit(ParserEvent::NodeEnd {
                    kind: kind.node_kind(),
                    value: Some(value.clone()),
                    offset,
                    byte_offset,
                });
                Some(value)
            }
            // A half-read escape sequence is discarded.
            GrammarState::EscapedChar | GrammarState::EscapedUnicodeChar => None,
            GrammarState::ObjectKey { started } => {
                if started {
                    self.emit(ParserEvent::NodeEnd {
                        kind: NodeKind::ObjectKey,
                        value: frame.parsed.clone(),
                        offset,
                        byte_offset,
                    });
                }
                frame.parsed
            }
            GrammarState::Object { phase } => {
                match phase {
                    // An entry whose value never arrived: close the entry so
                    // starts and ends stay balanced; the accumulator discards
                    // a key without a value.
                    ObjectPhase::Key | ObjectPhase::Colon => {
                        self.emit(ParserEvent::NodeEnd {
                            kind: NodeKind::ObjectEntry,
                            value: None,
                            offset,
                            byte_offset,
                        });
                    }
                    ObjectPhase::Value => {
                        self.emit(ParserEvent::NodeEnd {
                            kind: NodeKind::ObjectValue,
                            value: None,
                            offset,
                            byte_offset,
                        });
                        self.emit(ParserEvent::NodeEnd {
                            kind: NodeKind::ObjectEntry,
                            value: None,
                            offset,
                            byte_offset,
                        });
                    }
                    ObjectPhase::Open | ObjectPhase::Comma => {}
                }
                self.emit(ParserEvent::NodeEnd {
                    kind: NodeKind::Object,
                    value: None,
                    offset,
                    byte_offset,
                });
                None
            }
            GrammarState::Array { phase, next_index } => {
                if phase == ArrayPhase::Value {
                    self.emit(ParserEvent::NodeEnd {
                        kind: NodeKind::ArrayEntry(next_index),
                        value: None,
                        offset,
                        byte_offset,
                    });
                }
                self.emit(ParserEvent::NodeEnd {
                    kind: NodeKind::Array,
                    value: None,
                    offset,
                    byte_offset,
                });
                None
            }
        }
    }

    /// Hands a closed frame's result to the current top of the stack,
    /// performing the entry bookkeeping its handler would have done.
    fn deliver(&mut self, result: Option<Value>, offset: usize, byte_offset: usize) {
        let state = match self.stack.last() {
            Some(frame) => frame.state,
            None => return,
        };
        match state {
            GrammarState::Value | GrammarState::ObjectKey { .. } => {
                self.set_parsed(result);
            }
            GrammarState::String => {
                if let Some(Value::String(s)) = result {
                    if let Some(frame) = self.stack.last_mut() {
                        frame.chunk.push_str(&s);
                    }
                }
            }
            GrammarState::Object {
                phase: ObjectPhase::Key,
            } => {
                let phase = if result.is_some() {
                    ObjectPhase::Colon
                } else {
                    ObjectPhase::Comma
                };
                self.set_state(GrammarState::Object { phase });
            }
            GrammarState::Object {
                phase: ObjectPhase::Value,
            } => {
                self.emit(ParserEvent::NodeEnd {
                    kind: NodeKind::ObjectValue,
                    value: None,
                    offset,
                    byte_offset,
                });
                self.emit(ParserEvent::NodeEnd {
                    kind: NodeKind::ObjectEntry,
                    value: None,
                    offset,
                    byte_offset,
                });
                self.set_state(GrammarState::Object {
                    phase: ObjectPhase::Comma,
                });
            }
            GrammarState::Array {
                phase: ArrayPhase::Value,
                next_index,
            } => {
                self.emit(ParserEvent::NodeEnd {
                    kind: NodeKind::ArrayEntry(next_index),
                    value: None,
                    offset,
                    byte_offset,
                });
                self.set_state(GrammarState::Array {
                    phase: ArrayPhase::Comma,
                    next_index,
                });
            }
            _ => {}
        }
    }
}

impl Iterator for StreamingParser {
    type Item = Result<ParserEvent, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_event()
    }
}

/// A parser whose input has ended; yields the remaining events.
#[derive(Debug)]
pub struct ClosedStreamingParser {
    parser: StreamingParser,
}

impl ClosedStreamingParser {
    /// The first error encountered, when `record_errors` is set.
    #[must_use]
    pub fn recorded_error(&self) -> Option<&ParseError> {
        self.parser.recorded_error()
    }
}

impl Iterator for ClosedStreamingParser {
    type Item = Result<ParserEvent, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.parser.next_event()
    }
}

/// Parses a complete document in one call.
///
/// # Errors
///
/// Returns the first [`ParseError`] the input produces.
pub fn parse(text: &str, options: ParserOptions) -> Result<Vec<ParserEvent>, ParseError> {
    let mut parser = StreamingParser::new(options);
    parser.feed(text);
    parser.finish().collect()
}

fn is_ws(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}
