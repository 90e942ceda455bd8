//! Configuration options for the streaming parser.

/// Where a JSON value may be embedded inside non-JSON noise.
///
/// In a contaminated mode the parser hunts for the opening character of the
/// expected value, passes everything before it through as raw text, and after
/// the value completes passes the remaining bytes through as raw text too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Contaminated {
    /// The input is pure JSON; anything else is an error.
    #[default]
    No,
    /// A single value of any type is embedded in noise.
    Any,
    /// A single object is embedded in noise; hunt for `{`.
    Object,
    /// A single array is embedded in noise; hunt for `[`.
    Array,
}

/// Options controlling tolerance of the streaming parser.
///
/// All options default to the strictest behavior.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct ParserOptions {
    /// Permit unescaped control characters (U+0000..U+001F) inside string
    /// literals.
    ///
    /// # Default
    ///
    /// `false`: an unescaped control character is an error, as RFC 8259
    /// requires.
    pub allow_control_characters_in_strings: bool,

    /// Accept literals (`true`, `false`, `null`) in any casing, such as
    /// `True` or `NULL`.
    ///
    /// # Default
    ///
    /// `false`: literals must be lowercase.
    pub allow_loose_literal_casing: bool,

    /// Expect the JSON value to be embedded in non-JSON surrounding text.
    ///
    /// # Default
    ///
    /// [`Contaminated::No`].
    pub contaminated: Contaminated,

    /// Treat abrupt end of input as expected: close every open node with
    /// whatever content had accumulated instead of raising
    /// [`ParseError::UnexpectedEnd`](crate::ParseError::UnexpectedEnd).
    ///
    /// # Default
    ///
    /// `false`.
    pub allow_truncated: bool,

    /// Record the first error instead of raising it, and keep parsing on a
    /// best-effort basis. Offending characters are passed through as raw
    /// text. The recorded error is available from
    /// [`StreamingParser::recorded_error`](crate::StreamingParser::recorded_error).
    ///
    /// # Default
    ///
    /// `false`: errors end the parse.
    pub record_errors: bool,
}
