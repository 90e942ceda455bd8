//! Character-at-a-time matching of the JSON literals.
use crate::{event::NodeKind, value::Value};

/// Which literal a frame is matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LiteralKind {
    True,
    False,
    Null,
}

impl LiteralKind {
    pub fn target(self) -> &'static str {
        match self {
            Self::True => "true",
            Self::False => "false",
            Self::Null => "null",
        }
    }

    pub fn value(self) -> Value {
        match self {
            Self::True => Value::Boolean(true),
            Self::False => Value::Boolean(false),
            Self::Null => Value::Null,
        }
    }

    pub fn node_kind(self) -> NodeKind {
        match self {
            Self::True => NodeKind::True,
            Self::False => NodeKind::False,
            Self::Null => NodeKind::Null,
        }
    }
}

/// Outcome of matching one more character of a literal.
#[derive(Debug, PartialEq)]
pub(crate) enum Step {
    /// The character matched; more are needed.
    NeedMore,
    /// The character matched and completed the literal.
    Done(Value),
    /// The character does not continue the literal.
    Reject,
}

/// Matches `c` against position `matched` of the literal's spelling.
pub(crate) fn step(kind: LiteralKind, matched: usize, c: char, loose_casing: bool) -> Step {
    let target = kind.target().as_bytes();
    let Some(&expected) = target.get(matched) else {
        return Step::Reject;
    };
    let expected = expected as char;
    let ok = c == expected || loose_casing && c.eq_ignore_ascii_case(&expected);
    if !ok {
        return Step::Reject;
    }
    if matched + 1 == target.len() {
        Step::Done(kind.value())
    } else {
        Step::NeedMore
    }
}

#[cfg(test)]
mod tests {
    use super::{LiteralKind, Step, step};
    use crate::Value;

    #[test]
    fn matches_true_exactly() {
        assert_eq!(step(LiteralKind::True, 0, 't', false), Step::NeedMore);
        assert_eq!(step(LiteralKind::True, 1, 'r', false), Step::NeedMore);
        assert_eq!(step(LiteralKind::True, 2, 'u', false), Step::NeedMore);
        assert_eq!(
            step(LiteralKind::True, 3, 'e', false),
            Step::Done(Value::Boolean(true))
        );
    }

    #[test]
    fn rejects_wrong_letter() {
        assert_eq!(step(LiteralKind::False, 1, 'x', false), Step::Reject);
        assert_eq!(step(LiteralKind::Null, 0, 'N', false), Step::Reject);
    }

    #[test]
    fn loose_casing_accepts_any_case() {
        assert_eq!(step(LiteralKind::Null, 0, 'N', true), Step::NeedMore);
        assert_eq!(
            step(LiteralKind::Null, 3, 'L', true),
            Step::Done(Value::Null)
        );
    }

    #[test]
    fn rejects_past_the_end() {
        assert_eq!(step(LiteralKind::Null, 4, 'l', true), Step::Reject);
    }
}
