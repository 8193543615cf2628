//! Redial Core Library
//!
//! Parses Python-style regular expressions and rewrites them for other
//! regex dialects (Java, JavaScript), so one pattern source can feed
//! code generators for several target languages.

pub mod ast;
pub mod dialect;
pub mod error;
pub mod groups;
pub mod lexer;
pub mod parser;
pub mod render;
pub mod transpiler;

pub use ast::{CharClass, Category, ClassMember, Direction, Pattern, Polarity, RepeatMax};
pub use dialect::{Dialect, Feature, UnknownDialect};
pub use error::{RenderError, Result, Span, SyntaxError, SyntaxErrorKind, TranspileError};
pub use groups::{GroupInfo, GroupRegistry, GroupRegistryError};
pub use lexer::{Escape, EscapeContext, Lexer};
pub use parser::{DEFAULT_MAX_DEPTH, MAX_REPEAT, Parser, parse};
pub use render::render;
pub use transpiler::{TranspileResult, transpile, transpile_debug};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_to_end() {
        // string -> tree -> dialect text
        let pattern = r"(?P<key>\w+)=(?P=key)";
        assert_eq!(transpile(&Dialect::JAVA, pattern).unwrap(), r"([\w]+)\=\1");
    }

    #[test]
    fn test_parse_then_render_for_each_dialect() {
        let ast = parse(r"(?<=\$)\d+(?:\.\d\d)?").unwrap();
        assert_eq!(
            render(&Dialect::PYTHON, &ast).unwrap(),
            r"(?<=\$)[\d]+(?:\.[\d][\d])?"
        );
        assert_eq!(
            render(&Dialect::JAVA, &ast).unwrap(),
            r"(?<=\$)[\d]+(?:\.[\d][\d])?"
        );
        assert!(render(&Dialect::JAVASCRIPT, &ast).is_err());
    }

    #[test]
    fn test_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Dialect>();
        assert_send_sync::<Pattern>();
        assert_send_sync::<TranspileError>();
    }
}
