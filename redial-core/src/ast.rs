//! Abstract Syntax Tree (AST) for source patterns
//!
//! This module defines the node vocabulary produced by the parser and
//! consumed by the renderer:
//! - Literals, negated single characters, character classes, wildcards
//! - Repeats with bounded or unbounded upper limits, greedy or lazy
//! - Capturing and non-capturing groups
//! - Alternation and concatenation
//! - Anchors and word-boundary assertions
//! - Lookahead and lookbehind, positive and negative
//! - Numbered backreferences
//!
//! Trees are built once by the parser and never mutated afterwards.

use std::fmt;

/// A node of a parsed pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    /// A single matched character
    Literal(char),

    /// Any character except the given one (`[^x]`)
    NotLiteral(char),

    /// A character class `[abc]`, `[^a-z]`, `[\d_]`
    CharClass(CharClass),

    /// Any character (dot)
    Any,

    /// Start anchor (`^`)
    AnchorStart,

    /// End anchor (`$`)
    AnchorEnd,

    /// Word boundary assertion (`\b`)
    WordBoundary,

    /// Non-word boundary assertion (`\B`)
    NotWordBoundary,

    /// A group; `index` is the capture number, `None` for `(?:...)`
    Group {
        /// Capture number assigned at parse time
        index: Option<u32>,
        /// The pattern inside the group
        body: Box<Pattern>,
    },

    /// Alternation (`a|b|c`), first match wins
    Alternation(Vec<Pattern>),

    /// Implicit sequencing; the empty pattern is an empty concatenation
    Concat(Vec<Pattern>),

    /// Repeated expression (`a*`, `a{3,5}?`, ...)
    Repeat {
        /// Minimum number of repetitions
        min: u32,
        /// Maximum number of repetitions
        max: RepeatMax,
        /// The expression being repeated
        body: Box<Pattern>,
        /// Whether the source quantifier was lazy
        lazy: bool,
    },

    /// Zero-width lookahead or lookbehind assertion
    Lookaround {
        /// Which way the assertion looks
        direction: Direction,
        /// Whether the body must match or must not match
        polarity: Polarity,
        /// The asserted pattern
        body: Box<Pattern>,
    },

    /// Backreference by group number (`\1`, `\2`, ...)
    Backreference(u32),
}

/// Upper bound of a repeat
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RepeatMax {
    /// At most this many repetitions
    Bounded(u32),
    /// No upper limit
    Unbounded,
}

/// Direction of a lookaround
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// `(?=...)` / `(?!...)`
    Ahead,
    /// `(?<=...)` / `(?<!...)`
    Behind,
}

/// Polarity of a lookaround
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// The body must match
    Positive,
    /// The body must not match
    Negative,
}

/// A character class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharClass {
    /// Whether the class is negated `[^...]`
    pub negated: bool,
    /// The members, in source order
    pub members: Vec<ClassMember>,
}

/// A member of a character class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassMember {
    /// A single character
    Literal(char),
    /// An inclusive character range (e.g., `a-z`)
    Range(char, char),
    /// A category shorthand (`\d`, `\w`, ...)
    Category(Category),
}

/// A predefined character-set shorthand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// `\d`
    Digit,
    /// `\D`
    NotDigit,
    /// `\s`
    Space,
    /// `\S`
    NotSpace,
    /// `\w`
    Word,
    /// `\W`
    NotWord,
}

impl Category {
    /// Every category, in escape-letter order
    pub const ALL: [Category; 6] = [
        Category::Digit,
        Category::NotDigit,
        Category::Space,
        Category::NotSpace,
        Category::Word,
        Category::NotWord,
    ];

    /// Category named by a source-grammar escape letter
    pub fn from_escape(c: char) -> Option<Category> {
        match c {
            'd' => Some(Category::Digit),
            'D' => Some(Category::NotDigit),
            's' => Some(Category::Space),
            'S' => Some(Category::NotSpace),
            'w' => Some(Category::Word),
            'W' => Some(Category::NotWord),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Digit => "digit",
            Category::NotDigit => "non-digit",
            Category::Space => "whitespace",
            Category::NotSpace => "non-whitespace",
            Category::Word => "word",
            Category::NotWord => "non-word",
        };
        f.write_str(name)
    }
}

impl Pattern {
    /// Create the empty pattern
    pub fn empty() -> Self {
        Pattern::Concat(Vec::new())
    }

    /// Create a concatenation, unwrapping a single part
    pub fn concat(mut parts: Vec<Pattern>) -> Self {
        if parts.len() == 1 {
            parts.remove(0)
        } else {
            Pattern::Concat(parts)
        }
    }

    /// Create an alternation, unwrapping a single branch
    pub fn alternation(mut branches: Vec<Pattern>) -> Self {
        if branches.len() == 1 {
            branches.remove(0)
        } else {
            Pattern::Alternation(branches)
        }
    }

    /// Create a character class
    pub fn char_class(negated: bool, members: Vec<ClassMember>) -> Self {
        Pattern::CharClass(CharClass { negated, members })
    }

    /// Create a capturing group with the given number
    pub fn capture(index: u32, body: Pattern) -> Self {
        Pattern::Group {
            index: Some(index),
            body: Box::new(body),
        }
    }

    /// Create a non-capturing group
    pub fn non_capturing(body: Pattern) -> Self {
        Pattern::Group {
            index: None,
            body: Box::new(body),
        }
    }

    /// Create a greedy or lazy repeat
    pub fn repeat(body: Pattern, min: u32, max: RepeatMax, lazy: bool) -> Self {
        Pattern::Repeat {
            min,
            max,
            body: Box::new(body),
            lazy,
        }
    }

    /// Create a lookaround assertion
    pub fn lookaround(direction: Direction, polarity: Polarity, body: Pattern) -> Self {
        Pattern::Lookaround {
            direction,
            polarity,
            body: Box::new(body),
        }
    }

    /// Whether this node is zero-width and may not be repeated
    pub(crate) fn is_assertion(&self) -> bool {
        matches!(
            self,
            Pattern::AnchorStart
                | Pattern::AnchorEnd
                | Pattern::WordBoundary
                | Pattern::NotWordBoundary
        )
    }

    /// Number of capturing groups in the tree
    pub fn group_count(&self) -> u32 {
        match self {
            Pattern::Group { index, body } => u32::from(index.is_some()) + body.group_count(),
            Pattern::Alternation(items) | Pattern::Concat(items) => {
                items.iter().map(Pattern::group_count).sum()
            }
            Pattern::Repeat { body, .. } | Pattern::Lookaround { body, .. } => body.group_count(),
            _ => 0,
        }
    }

    /// The fewest and most characters this pattern can match
    ///
    /// `None` as the maximum means there is no upper limit. Backreferences
    /// are treated as unbounded since their width depends on the match.
    pub fn width(&self) -> (u64, Option<u64>) {
        match self {
            Pattern::Literal(_) | Pattern::NotLiteral(_) | Pattern::CharClass(_) | Pattern::Any => {
                (1, Some(1))
            }
            Pattern::AnchorStart
            | Pattern::AnchorEnd
            | Pattern::WordBoundary
            | Pattern::NotWordBoundary
            | Pattern::Lookaround { .. } => (0, Some(0)),
            Pattern::Group { body, .. } => body.width(),
            Pattern::Concat(parts) => parts.iter().fold((0, Some(0)), |(lo, hi), part| {
                let (part_lo, part_hi) = part.width();
                (
                    lo.saturating_add(part_lo),
                    hi.zip(part_hi).map(|(a, b)| a.saturating_add(b)),
                )
            }),
            Pattern::Alternation(branches) => {
                let mut widths = branches.iter().map(Pattern::width);
                let Some(first) = widths.next() else {
                    return (0, Some(0));
                };
                widths.fold(first, |(lo, hi), (b_lo, b_hi)| {
                    (lo.min(b_lo), hi.zip(b_hi).map(|(a, b)| a.max(b)))
                })
            }
            Pattern::Repeat { min, max, body, .. } => {
                let (body_lo, body_hi) = body.width();
                let lo = body_lo.saturating_mul(u64::from(*min));
                let hi = match max {
                    RepeatMax::Bounded(m) => body_hi.map(|h| h.saturating_mul(u64::from(*m))),
                    RepeatMax::Unbounded if body_hi == Some(0) => Some(0),
                    RepeatMax::Unbounded => None,
                };
                (lo, hi)
            }
            Pattern::Backreference(_) => (0, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        assert_eq!(Pattern::empty(), Pattern::Concat(vec![]));
    }

    #[test]
    fn test_concat_unwraps_single_part() {
        assert_eq!(Pattern::concat(vec![Pattern::Any]), Pattern::Any);
        assert_eq!(
            Pattern::concat(vec![Pattern::Any, Pattern::Any]),
            Pattern::Concat(vec![Pattern::Any, Pattern::Any])
        );
    }

    #[test]
    fn test_alternation_unwraps_single_branch() {
        assert_eq!(
            Pattern::alternation(vec![Pattern::Literal('a')]),
            Pattern::Literal('a')
        );
    }

    #[test]
    fn test_category_from_escape() {
        assert_eq!(Category::from_escape('d'), Some(Category::Digit));
        assert_eq!(Category::from_escape('W'), Some(Category::NotWord));
        assert_eq!(Category::from_escape('x'), None);
    }

    #[test]
    fn test_group_count() {
        let pattern = Pattern::concat(vec![
            Pattern::capture(1, Pattern::Literal('a')),
            Pattern::non_capturing(Pattern::capture(2, Pattern::Literal('b'))),
            Pattern::repeat(
                Pattern::capture(3, Pattern::Any),
                0,
                RepeatMax::Unbounded,
                false,
            ),
        ]);
        assert_eq!(pattern.group_count(), 3);
    }

    #[test]
    fn test_width_fixed() {
        let pattern = Pattern::concat(vec![
            Pattern::Literal('f'),
            Pattern::repeat(Pattern::Literal('o'), 2, RepeatMax::Bounded(2), false),
            Pattern::AnchorEnd,
        ]);
        assert_eq!(pattern.width(), (3, Some(3)));
    }

    #[test]
    fn test_width_alternation() {
        let pattern = Pattern::alternation(vec![
            Pattern::Literal('a'),
            Pattern::concat(vec![Pattern::Literal('b'), Pattern::Literal('c')]),
        ]);
        assert_eq!(pattern.width(), (1, Some(2)));
    }

    #[test]
    fn test_width_unbounded() {
        let pattern = Pattern::repeat(Pattern::Any, 1, RepeatMax::Unbounded, true);
        assert_eq!(pattern.width(), (1, None));
        assert_eq!(Pattern::Backreference(1).width(), (0, None));
    }

    #[test]
    fn test_repeat_max_ordering() {
        assert!(RepeatMax::Bounded(u32::MAX) < RepeatMax::Unbounded);
    }
}
