use std::io::Read;

use clap::{Parser, Subcommand};
use colored::Colorize;
use redial_core::{Dialect, Span, TranspileError, transpile, transpile_debug};

#[derive(Parser)]
#[command(name = "redial")]
#[command(about = "Redial - Rewrite Python-style regexes for other regex dialects")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Transpile one pattern into a target dialect
    Convert {
        /// The pattern to convert
        pattern: String,
        /// Target dialect (python, java, javascript)
        #[arg(short, long, default_value = "python")]
        dialect: Dialect,
        /// Show AST debug output
        #[arg(long)]
        debug: bool,
    },
    /// Print the parsed pattern tree
    Parse {
        /// The pattern to parse
        pattern: String,
    },
    /// Transpile one pattern per line from a file, or stdin with `-`
    Batch {
        /// Input file
        file: String,
        /// Target dialect (python, java, javascript)
        #[arg(short, long, default_value = "python")]
        dialect: Dialect,
        /// Report failing lines and continue instead of stopping
        #[arg(short, long)]
        keep_going: bool,
    },
    /// List the built-in dialects
    Dialects,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            pattern,
            dialect,
            debug,
        } => cmd_convert(&pattern, &dialect, debug),
        Commands::Parse { pattern } => cmd_parse(&pattern),
        Commands::Batch {
            file,
            dialect,
            keep_going,
        } => cmd_batch(&file, &dialect, keep_going),
        Commands::Dialects => cmd_dialects(),
    }
}

fn cmd_convert(pattern: &str, dialect: &Dialect, debug: bool) {
    println!("{}", "Converting pattern...".bold());
    println!("  Input:   {}", pattern.cyan());
    println!("  Dialect: {}", dialect.to_string().yellow());
    println!();

    if debug {
        match transpile_debug(dialect, pattern) {
            Ok(result) => {
                result.report();
            }
            Err(e) => {
                eprintln!("{} {}", "Error:".red().bold(), e);
                std::process::exit(1);
            }
        }
    } else {
        match transpile(dialect, pattern) {
            Ok(result) => {
                println!("{}", "Output:".bold());
                println!("  {}", result.green());
            }
            Err(e) => {
                eprintln!("{} {}", "Error:".red().bold(), e);
                std::process::exit(1);
            }
        }
    }
}

fn cmd_parse(pattern: &str) {
    let mut parser = redial_core::Parser::new(pattern);
    let ast = match parser.parse() {
        Ok(ast) => ast,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            eprintln!("  {}", pattern);
            eprintln!("  {}{}", " ".repeat(e.position()), caret(e.span).red().bold());
            std::process::exit(1);
        }
    };

    println!("{}", "AST:".bold());
    println!("{:#?}", ast);
    println!();
    println!(
        "{} {}",
        "Groups:".bold(),
        parser.groups().group_count().to_string().green()
    );
    for group in parser.groups().groups() {
        if let Some(name) = &group.name {
            println!("  Group {}: {}", group.index, name.cyan());
        }
    }
}

fn cmd_batch(file: &str, dialect: &Dialect, keep_going: bool) {
    let text = match read_input(file) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("{} {}: {}", "Error:".red().bold(), file, e);
            std::process::exit(1);
        }
    };

    let outcome = transpile_lines(dialect, &text, keep_going);
    for output in &outcome.outputs {
        println!("{}", output);
    }
    for (line, e) in &outcome.failures {
        eprintln!("{} line {}: {}", "Error:".red().bold(), line, e);
    }

    if !outcome.failures.is_empty() {
        if keep_going {
            eprintln!(
                "{}",
                format!(
                    "{} of {} pattern(s) failed",
                    outcome.failures.len(),
                    outcome.failures.len() + outcome.outputs.len()
                )
                .red()
            );
        }
        std::process::exit(1);
    }
}

fn cmd_dialects() {
    println!("{}", "Dialects:".bold());
    for dialect in Dialect::ALL {
        let lookbehind = if dialect.supports_lookbehind {
            "lookbehind".green()
        } else {
            "no lookbehind".red()
        };
        println!("  {:<12} {}", dialect.name.cyan(), lookbehind);
    }
}

/// Underline for an error span; empty spans still get one caret
fn caret(span: Span) -> String {
    if span.is_empty() {
        "^".to_string()
    } else {
        "^".repeat(span.len())
    }
}

fn read_input(file: &str) -> std::io::Result<String> {
    if file == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        std::fs::read_to_string(file)
    }
}

/// Transpiled lines and the (1-based) line numbers that failed
struct BatchOutcome {
    outputs: Vec<String>,
    failures: Vec<(usize, TranspileError)>,
}

/// Transpile every non-blank line, stopping at the first failure unless
/// `keep_going` is set
fn transpile_lines(dialect: &Dialect, text: &str, keep_going: bool) -> BatchOutcome {
    let mut outcome = BatchOutcome {
        outputs: Vec::new(),
        failures: Vec::new(),
    };

    for (i, line) in text.lines().enumerate() {
        if line.is_empty() {
            continue;
        }
        match transpile(dialect, line) {
            Ok(output) => outcome.outputs.push(output),
            Err(e) => {
                outcome.failures.push((i + 1, e));
                if !keep_going {
                    break;
                }
            }
        }
    }
    outcome
}
