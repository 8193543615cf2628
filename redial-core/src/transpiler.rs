//! Transpiler from the source grammar to a target dialect
//!
//! `transpile` is the whole pipeline: parse the pattern, then render the
//! tree under the chosen dialect. Code generators call it once per pattern
//! and splice the result into a string literal; quoting for the host
//! language is left to them.

use crate::dialect::Dialect;
use crate::error::Result;
use crate::parser::Parser;
use crate::render::render;

/// Transpile a source pattern into the given dialect
///
/// # Example
/// ```
/// use redial_core::{Dialect, transpile};
///
/// let result = transpile(&Dialect::JAVA, "{I got 99 problems}").unwrap();
/// assert_eq!(result, r"\{I got 99 problems\}");
/// ```
pub fn transpile(dialect: &Dialect, input: &str) -> Result<String> {
    let ast = Parser::new(input).parse()?;
    Ok(render(dialect, &ast)?)
}

/// Transpile with the intermediate tree kept for debugging
pub fn transpile_debug(dialect: &Dialect, input: &str) -> Result<TranspileResult> {
    let mut parser = Parser::new(input);
    let ast = parser.parse()?;
    let output = render(dialect, &ast)?;

    Ok(TranspileResult {
        input: input.to_string(),
        dialect: *dialect,
        ast: format!("{:?}", ast),
        group_count: parser.groups().group_count(),
        output,
    })
}

/// Result of a transpilation with debug information
#[derive(Debug, Clone)]
pub struct TranspileResult {
    /// The original input pattern
    pub input: String,
    /// The dialect rendered for
    pub dialect: Dialect,
    /// The parsed tree (debug format)
    pub ast: String,
    /// Number of capturing groups in the pattern
    pub group_count: u32,
    /// The transpiled output
    pub output: String,
}

impl TranspileResult {
    /// Print a formatted report of the transpilation
    pub fn report(&self) {
        println!("Transpilation Report");
        println!("====================");
        println!("Dialect: {}", self.dialect);
        println!("Input:   {}", self.input);
        println!("AST:     {}", self.ast);
        println!("Groups:  {}", self.group_count);
        println!("Output:  {}", self.output);
    }
}
