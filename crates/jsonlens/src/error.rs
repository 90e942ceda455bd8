//! Parser error types.
use thiserror::Error;

/// Errors produced while parsing a JSON document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A character that no grammar state could accept at its position.
    #[error("unexpected character {ch:?} at offset {offset}")]
    UnexpectedToken {
        /// The offending character.
        ch: char,
        /// Character offset of the offending character within the input.
        offset: usize,
    },

    /// The input ended while a value was still incomplete.
    #[error("unexpected end of input {}", end_of_input_context(.parsed_any))]
    UnexpectedEnd {
        /// Whether any token had been recognized before the input ended.
        parsed_any: bool,
    },

    /// A `\uXXXX` escape named a code point that is not a Unicode scalar
    /// value (for example an unpaired surrogate).
    #[error("invalid unicode escape sequence \\u{code:04X}")]
    InvalidUnicodeEscape {
        /// The four-digit hex value of the escape.
        code: u32,
    },

    /// A state handler neither consumed a character nor changed the stack.
    ///
    /// This indicates a defect in the parser itself, never in the input, and
    /// is always fatal.
    #[error("grammar state handler made no progress")]
    FlawedStateHandler,
}

fn end_of_input_context(parsed_any: &bool) -> &'static str {
    if *parsed_any {
        "while parsing a value"
    } else {
        "before any value was parsed"
    }
}
