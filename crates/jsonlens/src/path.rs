//! Path components addressing nodes within a JSON document.
//!
//! A path is a sequence of keys or indices (for objects and arrays,
//! respectively). Paths key the offset index trie and select the focused
//! subtree in [`crate::FocusAccumulator`].
//!
//! # Examples
//!
//! ```
//! use jsonlens::PathComponent;
//!
//! let key = PathComponent::Key("foo".to_string());
//! assert_eq!(key.as_key(), Some(&"foo".to_string()));
//!
//! let idx = PathComponent::Index(3);
//! assert_eq!(idx.as_index(), Some(&3));
//! ```
use alloc::{
    string::{String, ToString},
    vec::Vec,
};

/// A component in the path to a JSON value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PathComponent {
    Key(String),
    Index(usize),
}

// Convenient conversions so users can write `path![0, "foo"]` etc.
macro_rules! impl_from_int_for_pathcomponent {
    ($($t:ty),*) => {
        $(
            impl From<$t> for PathComponent {
                fn from(i: $t) -> Self {
                    #[allow(clippy::cast_possible_truncation)]
                    PathComponent::Index(i as usize)
                }
            }
        )*
    };
}

impl_from_int_for_pathcomponent!(u8, u16, u32, u64, usize);

impl From<&str> for PathComponent {
    fn from(s: &str) -> Self {
        Self::Key(s.to_string())
    }
}

impl From<String> for PathComponent {
    fn from(s: String) -> Self {
        Self::Key(s)
    }
}

#[doc(hidden)]
pub trait PathComponentFrom<T> {
    fn from_path_component(value: T) -> PathComponent;
}

macro_rules! impl_integer_as_path_component {
    ($($t:ty),+) => {
        $(
            impl PathComponentFrom<$t> for PathComponent {
                fn from_path_component(value: $t) -> Self {
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    PathComponent::Index(value as usize)
                }
            }
        )+
    };
}

impl_integer_as_path_component!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl PathComponentFrom<&str> for PathComponent {
    fn from_path_component(value: &str) -> Self {
        PathComponent::Key(value.to_string())
    }
}

impl PathComponentFrom<String> for PathComponent {
    fn from_path_component(value: String) -> Self {
        PathComponent::Key(value)
    }
}

impl PathComponent {
    /// Returns the key if this component is a `Key`, `None` otherwise.
    #[must_use]
    pub fn as_key(&self) -> Option<&String> {
        match self {
            Self::Key(k) => Some(k),
            Self::Index(_) => None,
        }
    }

    /// Returns the index if this component is an `Index`, `None` otherwise.
    #[must_use]
    pub fn as_index(&self) -> Option<&usize> {
        match self {
            Self::Index(i) => Some(i),
            Self::Key(_) => None,
        }
    }

    /// Parses a dotted path string such as `"a.b.0"` into components.
    ///
    /// Segments that parse as an unsigned integer become indices, everything
    /// else becomes a key. The empty string is the root path.
    #[must_use]
    pub fn parse_path(path: &str) -> Vec<PathComponent> {
        if path.is_empty() {
            return Vec::new();
        }
        path.split('.')
            .map(|segment| match segment.parse::<usize>() {
                Ok(index) => PathComponent::Index(index),
                Err(_) => PathComponent::Key(segment.to_string()),
            })
            .collect()
    }
}
