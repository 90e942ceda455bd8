//! An incremental JSON parser that tolerates arbitrary chunk boundaries and
//! reports where every value lives in the source.
//!
//! Input is consumed one character at a time by an explicit stack of grammar
//! frames, so a chunk may end in the middle of a string, a number, an escape
//! sequence, or a multi-byte UTF-8 character without losing state. The
//! parser emits offset-tagged node events; a [`FocusAccumulator`] rebuilds
//! the value under a chosen path from those events and can record a
//! source-span index for every node it reconstructs.
//!
//! ```
//! use jsonlens::{ParserOptions, accumulate, parse, path};
//!
//! let source = r#"{"count":2,"greeting":"hello"}"#;
//! let events = parse(source, ParserOptions::default()).unwrap();
//! let value = accumulate(&events, &path![], false);
//! assert_eq!(value.to_string(), source);
//! ```

#![no_std]
#![allow(missing_docs)]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod decoder;
mod escape;
mod literal;
mod trie;
mod value;

mod accumulator;
mod error;
mod event;
mod offsets;
mod options;
mod parser;
mod path;

#[cfg(test)]
mod tests;

pub use accumulator::{AccumulatorEvent, FocusAccumulator, accumulate};
pub use error::ParseError;
pub use event::{NodeKind, ParserEvent};
pub use offsets::{OffsetIndex, OffsetRecord};
pub use options::{Contaminated, ParserOptions};
pub use parser::{ClosedStreamingParser, StreamingParser, parse};
pub use path::{PathComponent, PathComponentFrom};
pub use trie::{PathTrie, Traverse, TrieNode};
pub use value::{Array, Map, Value};

#[doc(hidden)]
pub use alloc::vec;

/// Macro to build a `Vec<PathComponent>` from a heterogeneous list of keys
/// and indices.
///
/// ```rust
/// extern crate alloc;
/// # use jsonlens::{PathComponent, path};
/// let p = path![0, "foo", 2];
/// assert_eq!(
///     p,
///     vec![
///         PathComponent::Index(0),
///         PathComponent::Key("foo".into()),
///         PathComponent::Index(2)
///     ]
/// );
/// ```
#[macro_export]
macro_rules! path {
    ( $( $elem:expr ),* $(,)? ) => {{
        use $crate::PathComponentFrom;
        $crate::vec![$($crate::PathComponent::from_path_component($elem)),*]
    }};
}
