//! Target regex dialects
//!
//! A dialect is plain data: a capability flag and two static lookup tables.
//! The renderer consumes every dialect the same way, so adding a target
//! engine means adding a record here, not new rendering code.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::ast::Category;

/// A construct a dialect may be unable to express
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    /// `(?<=...)` and `(?<!...)`
    Lookbehind,
    /// A character above U+FFFF inside `[...]`
    AstralInClass,
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feature::Lookbehind => f.write_str("lookbehind"),
            Feature::AstralInClass => f.write_str("astral character in a character class"),
        }
    }
}

/// Category escapes shared by every supported engine
const STANDARD_CATEGORIES: &[(Category, &str)] = &[
    (Category::Digit, "\\d"),
    (Category::NotDigit, "\\D"),
    (Category::Space, "\\s"),
    (Category::NotSpace, "\\S"),
    (Category::Word, "\\w"),
    (Category::NotWord, "\\W"),
];

/// Rendering configuration for one target regex engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    /// Short name, used in error messages and on the command line
    pub name: &'static str,
    /// Whether `(?<=...)` / `(?<!...)` can be emitted
    pub supports_lookbehind: bool,
    /// Whether classes match code points rather than UTF-16 code units
    pub supports_astral_classes: bool,
    /// Escape token for each category shorthand
    pub categories: &'static [(Category, &'static str)],
    /// Characters escaped inside classes on top of `]`, `[`, `-`, `\` and `^`
    pub bracket_escapes: &'static [char],
}

impl Dialect {
    /// Python `re`: the source grammar itself
    pub const PYTHON: Dialect = Dialect {
        name: "python",
        supports_lookbehind: true,
        supports_astral_classes: true,
        categories: STANDARD_CATEGORIES,
        bracket_escapes: &[],
    };

    /// `java.util.regex`
    ///
    /// Java nests `[...]` inside classes and reads `&&` there as
    /// intersection, so `&` is escaped in classes as well.
    pub const JAVA: Dialect = Dialect {
        name: "java",
        supports_lookbehind: true,
        supports_astral_classes: true,
        categories: STANDARD_CATEGORIES,
        bracket_escapes: &['&'],
    };

    /// ECMAScript `RegExp` without the `u` flag, and without lookbehind
    ///
    /// Without `u` the engine sees UTF-16 code units, so characters above
    /// U+FFFF cannot sit inside a class. Outside classes they are emitted
    /// raw (a surrogate pair) and grouped when repeated. `.` and negated
    /// classes still match a single code unit.
    pub const JAVASCRIPT: Dialect = Dialect {
        name: "javascript",
        supports_lookbehind: false,
        supports_astral_classes: false,
        categories: STANDARD_CATEGORIES,
        bracket_escapes: &[],
    };

    /// Every built-in dialect
    pub const ALL: [Dialect; 3] = [Dialect::PYTHON, Dialect::JAVA, Dialect::JAVASCRIPT];

    /// Look up a built-in dialect by name, ignoring case
    pub fn by_name(name: &str) -> Option<Dialect> {
        let name = name.to_ascii_lowercase();
        let name = match name.as_str() {
            "js" | "ecmascript" => "javascript",
            "py" => "python",
            other => other,
        };
        Dialect::ALL.into_iter().find(|dialect| dialect.name == name)
    }

    /// The dialect's escape token for a category
    pub fn category_escape(&self, category: Category) -> Option<&'static str> {
        self.categories
            .iter()
            .find(|(known, _)| *known == category)
            .map(|(_, escape)| *escape)
    }

    /// Whether the dialect can express a feature
    pub fn supports(&self, feature: Feature) -> bool {
        match feature {
            Feature::Lookbehind => self.supports_lookbehind,
            Feature::AstralInClass => self.supports_astral_classes,
        }
    }
}

impl Default for Dialect {
    fn default() -> Self {
        Dialect::PYTHON
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A dialect name that matches no built-in dialect
#[derive(Error, Debug, Clone, PartialEq)]
#[error("unknown dialect '{0}' (expected one of: python, java, javascript)")]
pub struct UnknownDialect(pub String);

impl FromStr for Dialect {
    type Err = UnknownDialect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dialect::by_name(s).ok_or_else(|| UnknownDialect(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_by_name() {
        assert_eq!(Dialect::by_name("python"), Some(Dialect::PYTHON));
        assert_eq!(Dialect::by_name("Java"), Some(Dialect::JAVA));
        assert_eq!(Dialect::by_name("js"), Some(Dialect::JAVASCRIPT));
        assert_eq!(Dialect::by_name("perl"), None);
    }

    #[test]
    fn test_from_str() {
        let dialect: Dialect = "javascript".parse().unwrap();
        assert_eq!(dialect, Dialect::JAVASCRIPT);

        let err = "sed".parse::<Dialect>().unwrap_err();
        assert_eq!(err, UnknownDialect("sed".to_string()));
    }

    #[test]
    fn test_every_dialect_covers_every_category() {
        for dialect in Dialect::ALL {
            for category in Category::ALL {
                assert!(
                    dialect.category_escape(category).is_some(),
                    "{} lacks {}",
                    dialect,
                    category
                );
            }
        }
    }

    #[test]
    fn test_lookbehind_capability() {
        assert!(Dialect::PYTHON.supports(Feature::Lookbehind));
        assert!(Dialect::JAVA.supports(Feature::Lookbehind));
        assert!(!Dialect::JAVASCRIPT.supports(Feature::Lookbehind));
    }

    #[test]
    fn test_astral_class_capability() {
        assert!(Dialect::PYTHON.supports(Feature::AstralInClass));
        assert!(Dialect::JAVA.supports(Feature::AstralInClass));
        assert!(!Dialect::JAVASCRIPT.supports(Feature::AstralInClass));
    }

    #[test]
    fn test_display() {
        assert_eq!(Dialect::JAVA.to_string(), "java");
        assert_eq!(Feature::Lookbehind.to_string(), "lookbehind");
        assert_eq!(Dialect::default(), Dialect::PYTHON);
    }
}
