//! Error types for the transpiler
//!
//! This module provides error handling using the `thiserror` crate.
//! Errors are categorized by the stage that produced them: parsing the
//! source pattern, or rendering it under a target dialect.

use thiserror::Error;

use crate::ast::Category;
use crate::dialect::Feature;

/// The main error type for transpilation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TranspileError {
    /// The input is not a well-formed source pattern
    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),

    /// The pattern parsed but the target dialect cannot express it
    #[error("render error: {0}")]
    Render(#[from] RenderError),
}

/// A malformed source pattern, with the offending location
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{kind} at position {}", .span.start)]
pub struct SyntaxError {
    /// What went wrong
    pub kind: SyntaxErrorKind,
    /// Where it went wrong, in characters from the start of the pattern
    pub span: Span,
}

impl SyntaxError {
    /// Create a new syntax error
    pub fn new(kind: SyntaxErrorKind, span: Span) -> Self {
        SyntaxError { kind, span }
    }

    /// Create a syntax error pointing at a single character
    pub fn at(kind: SyntaxErrorKind, position: usize) -> Self {
        SyntaxError::new(kind, Span::single(position))
    }

    /// Human-readable description, without the position
    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    /// Character offset of the error
    pub fn position(&self) -> usize {
        self.span.start
    }
}

/// Specific kinds of syntax errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyntaxErrorKind {
    /// `(` without its `)`
    #[error("missing ), unterminated subpattern")]
    UnterminatedGroup,

    /// `)` without its `(`
    #[error("unbalanced parenthesis")]
    UnbalancedParenthesis,

    /// `[` without its `]`
    #[error("unterminated character set")]
    UnterminatedCharacterSet,

    /// A range with a category endpoint, or with `hi < lo`
    #[error("bad character range {0}")]
    BadCharacterRange(String),

    /// A quantifier with no atom before it
    #[error("nothing to repeat")]
    NothingToRepeat,

    /// A quantifier directly after another quantifier
    #[error("multiple repeat")]
    MultipleRepeat,

    /// `{n,m}` with `m < n`
    #[error("min repeat greater than max repeat")]
    RepeatBoundsInverted,

    /// A repeat bound above `MAX_REPEAT`
    #[error("the repetition number is too large")]
    RepeatTooLarge,

    /// An escape the grammar does not define
    #[error("bad escape {0}")]
    BadEscape(String),

    /// A valid source escape with no counterpart in the pattern tree
    #[error("unsupported escape {0}")]
    UnsupportedEscape(String),

    /// A lone `\` at the end of the pattern
    #[error("bad escape (end of pattern)")]
    DanglingBackslash,

    /// A numbered backreference to a group that does not exist
    #[error("invalid group reference {0}")]
    InvalidGroupReference(u32),

    /// A backreference from inside the group it names
    #[error("cannot refer to an open group")]
    OpenGroupReference,

    /// A named backreference to a name never defined
    #[error("unknown group name '{0}'")]
    UnknownGroupName(String),

    /// A group name that is not an identifier
    #[error("bad character in group name '{0}'")]
    BadGroupName(String),

    /// The same group name defined twice
    #[error("redefinition of group name '{0}'")]
    DuplicateGroupName(String),

    /// `(?P<name` without `>`
    #[error("missing >, unterminated name")]
    UnterminatedName,

    /// `(?#...` without `)`
    #[error("missing ), unterminated comment")]
    UnterminatedComment,

    /// A `(?` form outside the supported grammar
    #[error("unsupported group syntax '(?{0}'")]
    UnsupportedGroupSyntax(String),

    /// A lookbehind whose body can match strings of different lengths
    #[error("look-behind requires fixed-width pattern")]
    VariableWidthLookbehind,

    /// Groups nested beyond the parser's depth ceiling
    #[error("pattern nested deeper than {0} levels")]
    NestingTooDeep(usize),
}

/// Errors raised while rendering a parsed pattern
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    /// The dialect lacks a capability the pattern needs
    #[error("{feature} is not supported in {dialect}")]
    UnsupportedFeature {
        /// The missing capability
        feature: Feature,
        /// Name of the dialect being rendered
        dialect: &'static str,
    },

    /// The dialect has no escape for a category shorthand
    #[error("category {category} has no escape in {dialect}")]
    UnknownCategory {
        /// The category without an escape
        category: Category,
        /// Name of the dialect being rendered
        dialect: &'static str,
    },
}

/// A span representing a location in the pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Start position (inclusive)
    pub start: usize,
    /// End position (exclusive)
    pub end: usize,
}

impl Span {
    /// Create a new span
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    /// Create a span for a single character
    pub fn single(pos: usize) -> Self {
        Span {
            start: pos,
            end: pos + 1,
        }
    }

    /// Get the length of the span
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Check if the span is empty
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Result type alias for transpiler operations
pub type Result<T> = std::result::Result<T, TranspileError>;
