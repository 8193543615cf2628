//! Integration tests for the full pipeline
//!
//! These tests drive the public API the way a code generator would: one
//! pattern in, one dialect string (or an error) out.

use redial_core::{
    Dialect, Feature, Pattern, RenderError, SyntaxErrorKind, TranspileError, parse, render,
    transpile, transpile_debug,
};

fn python(input: &str) -> String {
    render(&Dialect::PYTHON, &parse(input).unwrap()).unwrap()
}

#[test]
fn test_close_bracket_first_in_class() {
    let ast = parse("[]]").unwrap();
    assert_eq!(ast, Pattern::Literal(']'));
    assert_eq!(render(&Dialect::PYTHON, &ast).unwrap(), r"\]");
}

#[test]
fn test_pass_through_cases() {
    let test_cases = vec![
        ("[^a]", "[^a]"),
        ("foo{3,5}", "foo{3,5}"),
        (r"foo(a)(b)\1\2", r"foo(a)(b)\1\2"),
        ("(foo|bar)foo|bar|baz", "(foo|bar)foo|bar|baz"),
        ("f.*?a??b+?o", "f.*?a??b+?o"),
        ("(?=foo)(?<=foo)(?:foo)", "(?=foo)(?<=foo)(?:foo)"),
    ];

    for (input, expected) in test_cases {
        assert_eq!(python(input), expected, "Failed for input: {}", input);
    }
}

#[test]
fn test_brace_defensive_output() {
    let test_cases = vec![
        ("{I got 99 problems}", r"\{I got 99 problems\}"),
        ("a{", r"a\{"),
        ("a{x}", r"a\{x\}"),
        ("a{1,2", r"a\{1,2"),
        ("}", r"\}"),
    ];

    for (input, expected) in test_cases {
        for dialect in Dialect::ALL {
            let result = transpile(&dialect, input).unwrap();
            assert_eq!(result, expected, "Failed for input: {} ({})", input, dialect);
        }
    }
}

#[test]
fn test_lookbehind_rejected_by_javascript_only() {
    for pattern in ["(?<!foo)", "(?<=foo)bar", "a(?:b(?<=b))"] {
        let err = transpile(&Dialect::JAVASCRIPT, pattern).unwrap_err();
        assert_eq!(
            err,
            TranspileError::Render(RenderError::UnsupportedFeature {
                feature: Feature::Lookbehind,
                dialect: "javascript",
            })
        );
        assert!(transpile(&Dialect::PYTHON, pattern).is_ok());
        assert!(transpile(&Dialect::JAVA, pattern).is_ok());
    }
}

#[test]
fn test_unterminated_group_fails_everywhere() {
    for dialect in Dialect::ALL {
        let err = transpile(&dialect, "(foo").unwrap_err();
        let TranspileError::Syntax(err) = err else {
            panic!("expected a syntax error for {}", dialect);
        };
        assert_eq!(err.kind, SyntaxErrorKind::UnterminatedGroup);
        assert_eq!(err.position(), 0);
    }
}

#[test]
fn test_syntax_error_messages() {
    let test_cases = vec![
        ("(foo", "missing ), unterminated subpattern at position 0"),
        ("foo)", "unbalanced parenthesis at position 3"),
        ("*a", "nothing to repeat at position 0"),
        ("a**", "multiple repeat at position 2"),
        ("[abc", "unterminated character set at position 0"),
        (r"(a)\2", "invalid group reference 2 at position 3"),
    ];

    for (input, expected) in test_cases {
        let err = parse(input).unwrap_err();
        assert_eq!(err.to_string(), expected, "Failed for input: {}", input);
    }
}

#[test]
fn test_named_groups_become_numbered() {
    let result = transpile(&Dialect::JAVASCRIPT, r"(?P<year>\d{4})-(?P<month>\d\d)-(?P=month)").unwrap();
    assert_eq!(result, r"([\d]{4})\-([\d][\d])\-\2");
}

#[test]
fn test_lexer_rule_patterns() {
    // Typical token rules from syntax highlighter definitions
    let test_cases = vec![
        (r"[a-zA-Z_]\w*", r"[a-zA-Z_][\w]*"),
        (r"0[xX][0-9a-fA-F]+[lL]?", r"0[xX][0-9a-fA-F]+[lL]?"),
        (r"//.*?\n", r"\/\/.*?\n"),
        (r#""(\\\\|\\"|[^"])*""#, r#""(\\\\|\\"|[^"])*""#),
        (r"\s+", r"[\s]+"),
        (r"(def)(\s+)", r"(def)([\s]+)"),
    ];

    for (input, expected) in test_cases {
        for dialect in Dialect::ALL {
            let result = transpile(&dialect, input).unwrap();
            assert_eq!(result, expected, "Failed for input: {} ({})", input, dialect);
        }
    }
}

#[test]
fn test_java_and_python_differ_only_in_class_ampersand() {
    let python = transpile(&Dialect::PYTHON, "[&a]&").unwrap();
    let java = transpile(&Dialect::JAVA, "[&a]&").unwrap();
    assert_eq!(python, r"[&a]\&");
    assert_eq!(java, r"[\&a]\&");
}

#[test]
fn test_debug_result() {
    let result = transpile_debug(&Dialect::PYTHON, r"(?P<x>a)|(b)").unwrap();
    assert_eq!(result.output, "(a)|(b)");
    assert_eq!(result.group_count, 2);
}

#[test]
fn test_output_is_reparseable() {
    for pattern in [r"(a)\1[0]", "[]-a]", r"[\x00-\x1f]", "\u{e9}+", "(?#note)x"] {
        let once = python(pattern);
        assert_eq!(python(&once), once, "Failed for input: {}", pattern);
    }
}
