//! Rendering pattern trees as dialect source text
//!
//! One walker serves every dialect; the [`Dialect`] record supplies the only
//! variation (lookbehind support, category escapes, extra class escapes).
//!
//! Escaping is uniform and deliberately over-eager. Outside a class every
//! ASCII character other than letters, digits, space, `"` and `;` is
//! backslash-escaped. Inside a class `]`, `[`, `-`, `\` and `^` are always
//! escaped, wherever they sit. Control characters become `\n`, `\r`, `\t`,
//! `\f` or `\xHH`; everything from U+0080 up is emitted raw, except that a
//! dialect matching UTF-16 code units cannot take astral characters in a
//! class.

use std::fmt;

use crate::ast::{CharClass, ClassMember, Direction, Pattern, Polarity, RepeatMax};
use crate::dialect::{Dialect, Feature};
use crate::error::RenderError;

/// Characters every dialect needs escaped inside a class
const CLASS_ESCAPES: [char; 5] = [']', '[', '-', '\\', '^'];

/// Render a pattern tree for the given dialect
///
/// Nothing is returned on failure; there is no partial output.
pub fn render(dialect: &Dialect, pattern: &Pattern) -> Result<String, RenderError> {
    let mut renderer = Renderer::new(dialect);
    renderer.node(pattern)?;
    Ok(renderer.out)
}

struct Renderer<'d> {
    dialect: &'d Dialect,
    out: String,
}

impl<'d> Renderer<'d> {
    fn new(dialect: &'d Dialect) -> Self {
        Renderer {
            dialect,
            out: String::new(),
        }
    }

    fn node(&mut self, pattern: &Pattern) -> Result<(), RenderError> {
        match pattern {
            Pattern::Literal(c) => self.literal(*c),
            Pattern::NotLiteral(c) => {
                self.out.push_str("[^");
                self.class_char(*c)?;
                self.out.push(']');
            }
            Pattern::CharClass(class) => self.char_class(class)?,
            Pattern::Any => self.out.push('.'),
            Pattern::AnchorStart => self.out.push('^'),
            Pattern::AnchorEnd => self.out.push('$'),
            Pattern::WordBoundary => self.out.push_str("\\b"),
            Pattern::NotWordBoundary => self.out.push_str("\\B"),
            Pattern::Group { index, body } => {
                self.out.push_str(if index.is_some() { "(" } else { "(?:" });
                self.node(body)?;
                self.out.push(')');
            }
            Pattern::Alternation(branches) => {
                for (i, branch) in branches.iter().enumerate() {
                    if i > 0 {
                        self.out.push('|');
                    }
                    self.node(branch)?;
                }
            }
            Pattern::Concat(parts) => self.concat(parts)?,
            Pattern::Repeat {
                min,
                max,
                body,
                lazy,
            } => {
                self.wrapped(body, needs_group(body) || self.is_surrogate_pair(body))?;
                self.quantifier(*min, *max);
                if *lazy {
                    self.out.push('?');
                }
            }
            Pattern::Lookaround {
                direction,
                polarity,
                body,
            } => {
                if *direction == Direction::Behind && !self.dialect.supports(Feature::Lookbehind) {
                    return Err(RenderError::UnsupportedFeature {
                        feature: Feature::Lookbehind,
                        dialect: self.dialect.name,
                    });
                }
                self.out.push_str(match (direction, polarity) {
                    (Direction::Ahead, Polarity::Positive) => "(?=",
                    (Direction::Ahead, Polarity::Negative) => "(?!",
                    (Direction::Behind, Polarity::Positive) => "(?<=",
                    (Direction::Behind, Polarity::Negative) => "(?<!",
                });
                self.node(body)?;
                self.out.push(')');
            }
            Pattern::Backreference(number) => {
                self.out.push('\\');
                self.out.push_str(&number.to_string());
            }
        }
        Ok(())
    }

    fn concat(&mut self, parts: &[Pattern]) -> Result<(), RenderError> {
        let mut after_backref = false;
        for part in parts {
            let start = self.out.len();
            self.wrapped(part, matches!(part, Pattern::Alternation(_)))?;

            // `\1` followed by `0` would read back as `\10`
            if after_backref && self.out[start..].starts_with(|c: char| c.is_ascii_digit()) {
                self.out.insert_str(start, "(?:)");
            }
            after_backref = matches!(part, Pattern::Backreference(_));
        }
        Ok(())
    }

    fn wrapped(&mut self, pattern: &Pattern, group: bool) -> Result<(), RenderError> {
        if group {
            self.out.push_str("(?:");
            self.node(pattern)?;
            self.out.push(')');
            Ok(())
        } else {
            self.node(pattern)
        }
    }

    fn quantifier(&mut self, min: u32, max: RepeatMax) {
        match (min, max) {
            (0, RepeatMax::Bounded(1)) => self.out.push('?'),
            (0, RepeatMax::Unbounded) => self.out.push('*'),
            (1, RepeatMax::Unbounded) => self.out.push('+'),
            (n, RepeatMax::Unbounded) => self.out.push_str(&format!("{{{},}}", n)),
            (n, RepeatMax::Bounded(m)) if n == m => self.out.push_str(&format!("{{{}}}", n)),
            (n, RepeatMax::Bounded(m)) => self.out.push_str(&format!("{{{},{}}}", n, m)),
        }
    }

    fn char_class(&mut self, class: &CharClass) -> Result<(), RenderError> {
        self.out.push('[');
        if class.negated {
            self.out.push('^');
        }
        for member in &class.members {
            match member {
                ClassMember::Literal(c) => self.class_char(*c)?,
                ClassMember::Range(lo, hi) => {
                    self.class_char(*lo)?;
                    self.out.push('-');
                    self.class_char(*hi)?;
                }
                ClassMember::Category(category) => {
                    let escape = self.dialect.category_escape(*category).ok_or(
                        RenderError::UnknownCategory {
                            category: *category,
                            dialect: self.dialect.name,
                        },
                    )?;
                    self.out.push_str(escape);
                }
            }
        }
        self.out.push(']');
        Ok(())
    }

    /// A character outside any class
    fn literal(&mut self, c: char) {
        if !c.is_ascii() {
            self.out.push(c);
        } else if !self.control(c) {
            if !is_safe(c) {
                self.out.push('\\');
            }
            self.out.push(c);
        }
    }

    /// A character inside a class
    fn class_char(&mut self, c: char) -> Result<(), RenderError> {
        if is_astral(c) && !self.dialect.supports(Feature::AstralInClass) {
            return Err(RenderError::UnsupportedFeature {
                feature: Feature::AstralInClass,
                dialect: self.dialect.name,
            });
        }
        if !c.is_ascii() {
            self.out.push(c);
        } else if !self.control(c) {
            if CLASS_ESCAPES.contains(&c) || self.dialect.bracket_escapes.contains(&c) {
                self.out.push('\\');
            }
            self.out.push(c);
        }
        Ok(())
    }

    /// A literal the dialect sees as two code units, which a quantifier
    /// would split
    fn is_surrogate_pair(&self, pattern: &Pattern) -> bool {
        matches!(pattern, Pattern::Literal(c) if is_astral(*c))
            && !self.dialect.supports(Feature::AstralInClass)
    }

    /// Emit a control-character escape; false if `c` is not a control character
    fn control(&mut self, c: char) -> bool {
        match c {
            '\n' => self.out.push_str("\\n"),
            '\r' => self.out.push_str("\\r"),
            '\t' => self.out.push_str("\\t"),
            '\u{0C}' => self.out.push_str("\\f"),
            c if c.is_ascii_control() => self.out.push_str(&format!("\\x{:02x}", u32::from(c))),
            _ => return false,
        }
        true
    }
}

fn is_astral(c: char) -> bool {
    u32::from(c) > 0xFFFF
}

fn is_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, ' ' | '"' | ';')
}

/// Whether a repeat body must be grouped to stay a single atom
fn needs_group(body: &Pattern) -> bool {
    match body {
        Pattern::Concat(parts) => match parts.as_slice() {
            [only] => needs_group(only),
            _ => true,
        },
        Pattern::Alternation(_) | Pattern::Repeat { .. } => true,
        other => other.is_assertion(),
    }
}

impl fmt::Display for Pattern {
    /// Renders the pattern back into the source grammar
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = render(&Dialect::PYTHON, self).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}
