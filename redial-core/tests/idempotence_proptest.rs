//! Property-based tests for render stability
//!
//! Rendering a parsed pattern under the pass-through dialect and parsing the
//! result again must give back the same text.

use proptest::prelude::*;
use redial_core::{Dialect, Parser, parse, render};

fn python(input: &str) -> Option<String> {
    let ast = parse(input).ok()?;
    render(&Dialect::PYTHON, &ast).ok()
}

fn atom_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        // Plain and escaped literals
        "[a-z0-9 ]",
        r"\\[.*+?(){}\[\]|^$\\/-]",
        // Classes
        r"\[\^?[a-z0-9\]\-&^]{1,4}\]",
        r"\\[dDsSwW]",
        // Control and numeric escapes
        r"\\[ntrfav]",
        r"\\x[0-7][0-9a-f]",
        r"\\0[0-7]{0,2}",
        // Dot, anchors, boundaries
        r"[.^$]",
        r"\\[bB]",
        // Literal braces
        r"\{[0-9,a]{0,3}",
    ]
}

fn quantifier_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[*+?]\\??",
        r"\{[0-9]{0,2}(,[0-9]{0,2})?\}\??",
    ]
}

fn pattern_strategy() -> impl Strategy<Value = String> {
    let leaf = prop::collection::vec((atom_strategy(), quantifier_strategy()), 0..5)
        .prop_map(|parts| parts.into_iter().map(|(a, q)| a + &q).collect::<String>());

    leaf.prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("{}|{}", a, b)),
            (inner.clone(), quantifier_strategy()).prop_map(|(a, q)| format!("({}){}", a, q)),
            (inner.clone(), quantifier_strategy()).prop_map(|(a, q)| format!("(?:{}){}", a, q)),
            inner.clone().prop_map(|a| format!("(?={})", a)),
            inner.clone().prop_map(|a| format!("(?!{})", a)),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("{}(?#note){}", a, b)),
            (inner.clone(), "[1-3]").prop_map(|(a, n)| format!("({})x\\{}", a, n)),
        ]
    })
}

#[cfg(test)]
mod idempotence_tests {
    use super::*;

    proptest! {
        #[test]
        fn test_structured_patterns_render_stably(pattern in pattern_strategy()) {
            if let Some(once) = python(&pattern) {
                let twice = python(&once);
                prop_assert_eq!(twice.as_deref(), Some(once.as_str()), "pattern: {}", pattern);
            }
        }

        #[test]
        fn test_arbitrary_ascii_never_panics(pattern in "[ -~\n\t]{0,24}") {
            if let Some(once) = python(&pattern) {
                let twice = python(&once);
                prop_assert_eq!(twice.as_deref(), Some(once.as_str()), "pattern: {}", pattern);
            }
        }

        #[test]
        fn test_group_count_matches_registry(pattern in pattern_strategy()) {
            let mut parser = Parser::new(&pattern);
            if let Ok(ast) = parser.parse() {
                prop_assert_eq!(ast.group_count(), parser.groups().group_count());
            }
        }
    }
}
