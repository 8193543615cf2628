//! Parser for source patterns
//!
//! This module provides a recursive descent parser that converts a pattern
//! string into a [`Pattern`] tree.
//!
//! Grammar (in order of precedence, lowest to highest):
//!   pattern     := alternation
//!   alternation := sequence ( '|' sequence )*
//!   sequence    := repeated*
//!   repeated    := atom quantifier*
//!   quantifier  := ( '*' | '+' | '?' | '{' n? ( ',' m? )? '}' ) '?'?
//!   atom        := literal | '.' | '^' | '$' | group | class | escape
//!   group       := '(' ( '?:' | '?=' | '?!' | '?<=' | '?<!' | '?P<' name '>' )? alternation ')'
//!                | '(?P=' name ')' | '(?#' comment ')'
//!   class       := '[' '^'? ']'? class_item* ']'
//!   class_item  := class_atom ( '-' class_atom )?
//!   escape      := '\' ( category | boundary | backref | char )
//!
//! A `{` that does not start a well-formed quantifier is a literal.

use crate::ast::{ClassMember, Direction, Pattern, Polarity, RepeatMax};
use crate::error::{Span, SyntaxError, SyntaxErrorKind};
use crate::groups::GroupRegistry;
use crate::lexer::{Escape, EscapeContext, Lexer};

/// Default ceiling on group nesting
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// A parsed quantifier, before it is attached to its atom
#[derive(Debug, Clone, Copy, PartialEq)]
struct Quantifier {
    min: u32,
    max: RepeatMax,
    lazy: bool,
    span: Span,
}

/// One side of a possible class range
#[derive(Debug, Clone, Copy)]
enum ClassAtom {
    Char(char),
    Category(crate::ast::Category),
}

impl From<ClassAtom> for ClassMember {
    fn from(atom: ClassAtom) -> Self {
        match atom {
            ClassAtom::Char(c) => ClassMember::Literal(c),
            ClassAtom::Category(category) => ClassMember::Category(category),
        }
    }
}

/// Parser for source patterns
pub struct Parser {
    lexer: Lexer,
    groups: GroupRegistry,
    depth: usize,
    max_depth: usize,
}

impl Parser {
    /// Create a new parser for the given input string
    pub fn new(input: &str) -> Self {
        Parser {
            lexer: Lexer::new(input),
            groups: GroupRegistry::new(),
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Set the maximum group nesting depth
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Capture groups registered so far
    pub fn groups(&self) -> &GroupRegistry {
        &self.groups
    }

    /// Parse the entire input and return the pattern tree
    pub fn parse(&mut self) -> Result<Pattern, SyntaxError> {
        let pattern = self.parse_alternation()?;

        // Only a stray ')' can stop the top-level alternation early
        if !self.lexer.is_eof() {
            return Err(SyntaxError::at(
                SyntaxErrorKind::UnbalancedParenthesis,
                self.lexer.position(),
            ));
        }

        Ok(pattern)
    }

    /// alternation := sequence ( '|' sequence )*
    fn parse_alternation(&mut self) -> Result<Pattern, SyntaxError> {
        let mut branches = vec![self.parse_sequence()?];
        while self.lexer.eat('|') {
            branches.push(self.parse_sequence()?);
        }
        Ok(Pattern::alternation(branches))
    }

    /// sequence := repeated*
    fn parse_sequence(&mut self) -> Result<Pattern, SyntaxError> {
        let mut parts: Vec<Pattern> = Vec::new();

        while !self.is_sequence_end() {
            if let Some(quantifier) = self.parse_quantifier()? {
                let Some(last) = parts.pop() else {
                    return Err(SyntaxError::new(
                        SyntaxErrorKind::NothingToRepeat,
                        quantifier.span,
                    ));
                };
                if last.is_assertion() {
                    return Err(SyntaxError::new(
                        SyntaxErrorKind::NothingToRepeat,
                        quantifier.span,
                    ));
                }
                if matches!(last, Pattern::Repeat { .. }) {
                    return Err(SyntaxError::new(
                        SyntaxErrorKind::MultipleRepeat,
                        quantifier.span,
                    ));
                }
                parts.push(Pattern::repeat(
                    last,
                    quantifier.min,
                    quantifier.max,
                    quantifier.lazy,
                ));
                continue;
            }

            if let Some(atom) = self.parse_atom()? {
                parts.push(atom);
            }
        }

        Ok(Pattern::concat(parts))
    }

    /// Check if we've reached the end of a sequence
    fn is_sequence_end(&self) -> bool {
        matches!(self.lexer.peek(), None | Some('|') | Some(')'))
    }

    /// Parse a quantifier if one starts here
    fn parse_quantifier(&mut self) -> Result<Option<Quantifier>, SyntaxError> {
        let start = self.lexer.position();
        let (min, max) = match self.lexer.peek() {
            Some('*') => {
                self.lexer.bump();
                (0, RepeatMax::Unbounded)
            }
            Some('+') => {
                self.lexer.bump();
                (1, RepeatMax::Unbounded)
            }
            Some('?') => {
                self.lexer.bump();
                (0, RepeatMax::Bounded(1))
            }
            Some('{') => match self.parse_braces(start)? {
                Some(bounds) => bounds,
                None => return Ok(None),
            },
            _ => return Ok(None),
        };

        let lazy = self.lexer.eat('?');
        Ok(Some(Quantifier {
            min,
            max,
            lazy,
            span: Span::new(start, self.lexer.position()),
        }))
    }

    /// `{n}`, `{n,}`, `{,m}`, `{n,m}`; anything else rewinds and yields `None`
    fn parse_braces(&mut self, start: usize) -> Result<Option<(u32, RepeatMax)>, SyntaxError> {
        self.lexer.bump();
        if self.lexer.peek() == Some('}') {
            self.lexer.rewind(start);
            return Ok(None);
        }

        let lo = self.lexer.read_digits();
        let hi = if self.lexer.eat(',') {
            Some(self.lexer.read_digits())
        } else {
            None
        };
        if !self.lexer.eat('}') {
            self.lexer.rewind(start);
            return Ok(None);
        }

        let span = Span::new(start, self.lexer.position());
        let min = if lo.is_empty() {
            0
        } else {
            parse_bound(&lo, span)?
        };
        let max = match hi {
            None => RepeatMax::Bounded(min),
            Some(hi) if hi.is_empty() => RepeatMax::Unbounded,
            Some(hi) => {
                let max = parse_bound(&hi, span)?;
                if max < min {
                    return Err(SyntaxError::new(
                        SyntaxErrorKind::RepeatBoundsInverted,
                        span,
                    ));
                }
                RepeatMax::Bounded(max)
            }
        };
        Ok(Some((min, max)))
    }

    /// Parse an atom; comments produce `None`
    fn parse_atom(&mut self) -> Result<Option<Pattern>, SyntaxError> {
        let start = self.lexer.position();
        let Some(c) = self.lexer.peek() else {
            return Ok(None);
        };

        let atom = match c {
            '(' => return self.parse_group(),
            '[' => self.parse_class()?,
            '\\' => match self.lexer.read_escape(EscapeContext::Pattern)? {
                Escape::Literal(c) => Pattern::Literal(c),
                Escape::Category(category) => {
                    Pattern::char_class(false, vec![ClassMember::Category(category)])
                }
                Escape::WordBoundary => Pattern::WordBoundary,
                Escape::NotWordBoundary => Pattern::NotWordBoundary,
                Escape::Backreference(number) => {
                    let span = Span::new(start, self.lexer.position());
                    self.groups
                        .validate_backref_number(number)
                        .map_err(|err| SyntaxError::new(err.into(), span))?;
                    Pattern::Backreference(number)
                }
            },
            _ => {
                self.lexer.bump();
                match c {
                    '.' => Pattern::Any,
                    '^' => Pattern::AnchorStart,
                    '$' => Pattern::AnchorEnd,
                    _ => Pattern::Literal(c),
                }
            }
        };
        Ok(Some(atom))
    }

    /// Parse any parenthesized construct, tracking nesting depth
    fn parse_group(&mut self) -> Result<Option<Pattern>, SyntaxError> {
        let start = self.lexer.position();
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(SyntaxError::at(
                SyntaxErrorKind::NestingTooDeep(self.max_depth),
                start,
            ));
        }
        let result = self.parse_group_inner(start);
        self.depth -= 1;
        result
    }

    fn parse_group_inner(&mut self, start: usize) -> Result<Option<Pattern>, SyntaxError> {
        self.lexer.bump();

        if !self.lexer.eat('?') {
            let index = self
                .groups
                .register_group(None)
                .map_err(|err| SyntaxError::at(err.into(), start))?;
            let body = self.parse_group_body(start)?;
            self.groups.close_group(index);
            return Ok(Some(Pattern::capture(index, body)));
        }

        let marker = self.lexer.position();
        let pattern = match self.lexer.bump() {
            Some(':') => Pattern::non_capturing(self.parse_group_body(start)?),
            Some('=') => self.parse_lookaround(start, Direction::Ahead, Polarity::Positive)?,
            Some('!') => self.parse_lookaround(start, Direction::Ahead, Polarity::Negative)?,
            Some('<') => match self.lexer.bump() {
                Some('=') => self.parse_lookaround(start, Direction::Behind, Polarity::Positive)?,
                Some('!') => self.parse_lookaround(start, Direction::Behind, Polarity::Negative)?,
                _ => return Err(self.unsupported_group(start, marker)),
            },
            Some('P') => match self.lexer.bump() {
                Some('<') => self.parse_named_group(start)?,
                Some('=') => self.parse_named_backref(start)?,
                _ => return Err(self.unsupported_group(start, marker)),
            },
            Some('#') => {
                if self.lexer.read_until(')').is_none() {
                    return Err(SyntaxError::at(
                        SyntaxErrorKind::UnterminatedComment,
                        start,
                    ));
                }
                self.lexer.bump();
                return Ok(None);
            }
            _ => return Err(self.unsupported_group(start, marker)),
        };
        Ok(Some(pattern))
    }

    /// Parse a group body and its closing parenthesis
    fn parse_group_body(&mut self, start: usize) -> Result<Pattern, SyntaxError> {
        let body = self.parse_alternation()?;
        if !self.lexer.eat(')') {
            return Err(SyntaxError::new(
                SyntaxErrorKind::UnterminatedGroup,
                Span::new(start, self.lexer.position()),
            ));
        }
        Ok(body)
    }

    fn parse_lookaround(
        &mut self,
        start: usize,
        direction: Direction,
        polarity: Polarity,
    ) -> Result<Pattern, SyntaxError> {
        let body = self.parse_group_body(start)?;
        if direction == Direction::Behind {
            let (min, max) = body.width();
            if max != Some(min) {
                return Err(SyntaxError::new(
                    SyntaxErrorKind::VariableWidthLookbehind,
                    Span::new(start, self.lexer.position()),
                ));
            }
        }
        Ok(Pattern::lookaround(direction, polarity, body))
    }

    /// `(?P<name>...)`, after the `<`
    fn parse_named_group(&mut self, start: usize) -> Result<Pattern, SyntaxError> {
        let name = self.read_group_name('>', SyntaxErrorKind::UnterminatedName)?;
        let index = self
            .groups
            .register_group(Some(name))
            .map_err(|err| SyntaxError::new(err.into(), Span::new(start, self.lexer.position())))?;
        let body = self.parse_group_body(start)?;
        self.groups.close_group(index);
        Ok(Pattern::capture(index, body))
    }

    /// `(?P=name)`, after the `=`
    fn parse_named_backref(&mut self, start: usize) -> Result<Pattern, SyntaxError> {
        let name = self.read_group_name(')', SyntaxErrorKind::UnterminatedGroup)?;
        let span = Span::new(start, self.lexer.position());
        let number = self
            .groups
            .validate_backref_name(&name)
            .map_err(|err| SyntaxError::new(err.into(), span))?;
        Ok(Pattern::Backreference(number))
    }

    /// Read an identifier up to `terminator` and consume the terminator
    fn read_group_name(
        &mut self,
        terminator: char,
        unterminated: SyntaxErrorKind,
    ) -> Result<String, SyntaxError> {
        let start = self.lexer.position();
        let Some(name) = self.lexer.read_until(terminator) else {
            return Err(SyntaxError::at(unterminated, start));
        };
        let end = self.lexer.position();
        self.lexer.bump();

        if !is_identifier(&name) {
            return Err(SyntaxError::new(
                SyntaxErrorKind::BadGroupName(name),
                Span::new(start, end),
            ));
        }
        Ok(name)
    }

    fn unsupported_group(&self, start: usize, marker: usize) -> SyntaxError {
        let text = self.lexer.text(marker, self.lexer.position());
        SyntaxError::new(
            SyntaxErrorKind::UnsupportedGroupSyntax(text),
            Span::new(start, self.lexer.position()),
        )
    }

    /// class := '[' '^'? ']'? class_item* ']'
    fn parse_class(&mut self) -> Result<Pattern, SyntaxError> {
        let start = self.lexer.position();
        self.lexer.bump();
        let negated = self.lexer.eat('^');

        let mut members = Vec::new();
        let mut first = true;
        loop {
            let item_start = self.lexer.position();
            match self.lexer.peek() {
                None => {
                    return Err(SyntaxError::new(
                        SyntaxErrorKind::UnterminatedCharacterSet,
                        Span::new(start, item_start),
                    ));
                }
                Some(']') if !first => {
                    self.lexer.bump();
                    break;
                }
                _ => {}
            }
            first = false;

            let lo = self.parse_class_atom()?;
            let is_range = self.lexer.peek() == Some('-')
                && !matches!(self.lexer.peek_at(1), None | Some(']'));
            if !is_range {
                members.push(ClassMember::from(lo));
                continue;
            }

            self.lexer.bump();
            let hi = self.parse_class_atom()?;
            let span = Span::new(item_start, self.lexer.position());
            match (lo, hi) {
                (ClassAtom::Char(lo), ClassAtom::Char(hi)) if lo <= hi => {
                    members.push(ClassMember::Range(lo, hi));
                }
                _ => {
                    let text = self.lexer.text(span.start, span.end);
                    return Err(SyntaxError::new(
                        SyntaxErrorKind::BadCharacterRange(text),
                        span,
                    ));
                }
            }
        }

        Ok(match (negated, members.as_slice()) {
            (false, [ClassMember::Literal(c)]) => Pattern::Literal(*c),
            (true, [ClassMember::Literal(c)]) => Pattern::NotLiteral(*c),
            _ => Pattern::char_class(negated, members),
        })
    }

    fn parse_class_atom(&mut self) -> Result<ClassAtom, SyntaxError> {
        let start = self.lexer.position();
        match self.lexer.peek() {
            Some('\\') => match self.lexer.read_escape(EscapeContext::Class)? {
                Escape::Literal(c) => Ok(ClassAtom::Char(c)),
                Escape::Category(category) => Ok(ClassAtom::Category(category)),
                _ => {
                    let text = self.lexer.text(start, self.lexer.position());
                    Err(SyntaxError::new(
                        SyntaxErrorKind::BadEscape(text),
                        Span::new(start, self.lexer.position()),
                    ))
                }
            },
            Some(c) => {
                self.lexer.bump();
                Ok(ClassAtom::Char(c))
            }
            None => Err(SyntaxError::at(
                SyntaxErrorKind::UnterminatedCharacterSet,
                start,
            )),
        }
    }
}

/// Largest repeat bound every target accepts (Java counts with `int`)
pub const MAX_REPEAT: u32 = i32::MAX as u32;

/// Parse a repeat bound, at most [`MAX_REPEAT`]
fn parse_bound(digits: &str, span: Span) -> Result<u32, SyntaxError> {
    digits
        .parse::<u32>()
        .ok()
        .filter(|bound| *bound <= MAX_REPEAT)
        .ok_or(SyntaxError::new(SyntaxErrorKind::RepeatTooLarge, span))
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {
            chars.all(|c| c.is_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Parse a source pattern string into a pattern tree
pub fn parse(input: &str) -> Result<Pattern, SyntaxError> {
    let mut parser = Parser::new(input);
    parser.parse()
}
