//! Lexer for source patterns
//!
//! The source grammar is context sensitive: the same escape means different
//! things inside and outside a character class (`\b` is a word boundary
//! outside, a backspace inside), and `{` only opens a quantifier when a valid
//! bound follows. The lexer therefore works as a cursor the parser drives,
//! handing out raw characters and decoding escape sequences on request.
//!
//! Positions are character offsets, not byte offsets.

use crate::ast::Category;
use crate::error::{Span, SyntaxError, SyntaxErrorKind};

/// Where an escape sequence appears
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeContext {
    /// Outside any character class
    Pattern,
    /// Between `[` and `]`
    Class,
}

/// A decoded escape sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Escape {
    /// A literal character (`\.`, `\n`, `\x41`, `\101`, ...)
    Literal(char),
    /// A category shorthand (`\d`, `\W`, ...)
    Category(Category),
    /// Word boundary assertion (`\b`, outside classes only)
    WordBoundary,
    /// Non-word boundary assertion (`\B`, outside classes only)
    NotWordBoundary,
    /// Backreference by number (`\1` to `\99`, outside classes only)
    Backreference(u32),
}

/// Character cursor over a pattern
pub struct Lexer {
    chars: Vec<char>,
    position: usize,
}

impl Lexer {
    /// Create a new lexer for the given input string
    pub fn new(input: &str) -> Self {
        Lexer {
            chars: input.chars().collect(),
            position: 0,
        }
    }

    /// Current position, in characters
    pub fn position(&self) -> usize {
        self.position
    }

    /// Move the cursor back to an earlier position
    pub fn rewind(&mut self, position: usize) {
        self.position = position.min(self.chars.len());
    }

    /// Whether the whole input has been consumed
    pub fn is_eof(&self) -> bool {
        self.position >= self.chars.len()
    }

    /// Peek at the current character without consuming it
    pub fn peek(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    /// Peek `offset` characters past the current one
    pub fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.position + offset).copied()
    }

    /// Consume and return the current character
    pub fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.position += 1;
        Some(c)
    }

    /// Consume the current character if it is `expected`
    pub fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    /// Consume a run of ASCII digits
    pub fn read_digits(&mut self) -> String {
        let mut digits = String::new();
        while let Some(c) = self.peek().filter(char::is_ascii_digit) {
            digits.push(c);
            self.position += 1;
        }
        digits
    }

    /// Consume characters up to (not including) `terminator`
    ///
    /// Returns `None` and leaves the cursor at the end of input if the
    /// terminator never appears.
    pub fn read_until(&mut self, terminator: char) -> Option<String> {
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if c == terminator {
                return Some(text);
            }
            text.push(c);
            self.position += 1;
        }
        None
    }

    /// The source text between two positions
    pub fn text(&self, start: usize, end: usize) -> String {
        let end = end.min(self.chars.len());
        self.chars[start.min(end)..end].iter().collect()
    }

    /// Read an escape sequence; the cursor must be on the backslash
    pub fn read_escape(&mut self, context: EscapeContext) -> Result<Escape, SyntaxError> {
        let start = self.position;
        self.bump();
        let Some(c) = self.bump() else {
            return Err(SyntaxError::at(SyntaxErrorKind::DanglingBackslash, start));
        };

        if let Some(category) = Category::from_escape(c) {
            return Ok(Escape::Category(category));
        }

        match c {
            'a' => Ok(Escape::Literal('\u{07}')),
            'f' => Ok(Escape::Literal('\u{0C}')),
            'n' => Ok(Escape::Literal('\n')),
            'r' => Ok(Escape::Literal('\r')),
            't' => Ok(Escape::Literal('\t')),
            'v' => Ok(Escape::Literal('\u{0B}')),
            'b' if context == EscapeContext::Class => Ok(Escape::Literal('\u{08}')),
            'b' => Ok(Escape::WordBoundary),
            'B' if context == EscapeContext::Pattern => Ok(Escape::NotWordBoundary),
            'A' | 'Z' if context == EscapeContext::Pattern => Err(self.error_since(
                start,
                SyntaxErrorKind::UnsupportedEscape(format!("\\{}", c)),
            )),
            'x' => self.read_hex(start, 2),
            'u' => self.read_hex(start, 4),
            'U' => self.read_hex(start, 8),
            '0'..='7' if context == EscapeContext::Class => self.read_octal(start, c),
            '0' => self.read_octal(start, c),
            '1'..='9' if context == EscapeContext::Pattern => self.read_numeric(start, c),
            _ if c.is_ascii_alphanumeric() => Err(self.error_since(
                start,
                SyntaxErrorKind::BadEscape(format!("\\{}", c)),
            )),
            _ => Ok(Escape::Literal(c)),
        }
    }

    /// `\xHH`, `\uHHHH`, `\UHHHHHHHH`: exactly `len` hex digits
    fn read_hex(&mut self, start: usize, len: usize) -> Result<Escape, SyntaxError> {
        let mut value: u32 = 0;
        for _ in 0..len {
            match self.peek().and_then(|c| c.to_digit(16)) {
                Some(digit) => {
                    value = value * 16 + digit;
                    self.position += 1;
                }
                None => return Err(self.bad_escape(start)),
            }
        }
        char::from_u32(value)
            .map(Escape::Literal)
            .ok_or_else(|| self.bad_escape(start))
    }

    /// Octal escape of up to three digits, the first already consumed
    fn read_octal(&mut self, start: usize, first: char) -> Result<Escape, SyntaxError> {
        let mut value = first.to_digit(8).unwrap_or(0);
        for _ in 0..2 {
            match self.peek().and_then(|c| c.to_digit(8)) {
                Some(digit) => {
                    value = value * 8 + digit;
                    self.position += 1;
                }
                None => break,
            }
        }
        self.octal_literal(start, value)
    }

    /// `\N` outside a class: three octal digits make an octal escape,
    /// otherwise one or two digits make a backreference
    fn read_numeric(&mut self, start: usize, first: char) -> Result<Escape, SyntaxError> {
        let mut number = first.to_digit(10).unwrap_or(0);
        if let Some(second) = self.peek().and_then(|c| c.to_digit(10)) {
            self.position += 1;
            let third = self.peek().and_then(|c| c.to_digit(8));
            if let (Some(_), Some(third)) = (first.to_digit(8), third)
                && second < 8
            {
                self.position += 1;
                let value = (number * 8 + second) * 8 + third;
                return self.octal_literal(start, value);
            }
            number = number * 10 + second;
        }
        Ok(Escape::Backreference(number))
    }

    fn octal_literal(&self, start: usize, value: u32) -> Result<Escape, SyntaxError> {
        if value > 0o377 {
            return Err(self.bad_escape(start));
        }
        char::from_u32(value)
            .map(Escape::Literal)
            .ok_or_else(|| self.bad_escape(start))
    }

    fn bad_escape(&self, start: usize) -> SyntaxError {
        let text = self.text(start, self.position);
        self.error_since(start, SyntaxErrorKind::BadEscape(text))
    }

    fn error_since(&self, start: usize, kind: SyntaxErrorKind) -> SyntaxError {
        SyntaxError::new(kind, Span::new(start, self.position))
    }
}
